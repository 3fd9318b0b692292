//! Pool allocator statistics.

/// Statistics snapshot for a [`PoolAllocator`](super::PoolAllocator).
#[derive(Debug, Clone, Copy)]
pub struct PoolStats {
    /// Total allocations performed.
    pub total_allocs: u32,
    /// Total deallocations performed.
    pub total_deallocs: u32,
    /// Peak memory usage in bytes.
    pub peak_usage: usize,
    /// Current memory usage in bytes.
    pub current_usage: usize,
    /// Size of each block in bytes.
    pub block_size: usize,
    /// Total number of blocks in the arena, sentinel included.
    pub block_count: usize,
    /// Blocks currently free.
    pub free_blocks: usize,
}
