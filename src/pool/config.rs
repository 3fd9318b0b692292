//! Pool configuration variants.

/// Configuration for a [`PoolAllocator`](super::PoolAllocator).
#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    /// Enable statistics tracking.
    pub track_stats: bool,

    /// Byte pattern written over freshly allocated payload, for debugging.
    pub alloc_pattern: Option<u8>,

    /// Byte pattern written over released runs, for debugging.
    pub dealloc_pattern: Option<u8>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            track_stats: cfg!(debug_assertions),
            alloc_pattern: if cfg!(debug_assertions) { Some(0xBB) } else { None },
            dealloc_pattern: if cfg!(debug_assertions) { Some(0xDD) } else { None },
        }
    }
}

impl PoolConfig {
    /// Production configuration, minimal overhead.
    pub const fn production() -> Self {
        Self {
            track_stats: false,
            alloc_pattern: None,
            dealloc_pattern: None,
        }
    }

    /// Debug configuration, poisons memory and tracks statistics.
    pub const fn debug() -> Self {
        Self {
            track_stats: true,
            alloc_pattern: Some(0xBB),
            dealloc_pattern: Some(0xDD),
        }
    }
}
