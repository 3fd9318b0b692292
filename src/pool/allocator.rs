//! Main free-list pool allocator implementation.
//!
//! # Safety
//!
//! This module implements a single-threaded pool allocator over one
//! contiguous arena of fixed-size blocks:
//! - Free runs form an intrusive singly-linked list threaded through the
//!   arena itself; each free-run head stores its length and next pointer
//!   in the first bytes of the run.
//! - A sentinel block at the physical end of the arena closes the list
//!   into a ring, removing the head-pointer special case.
//! - Allocation is first-fit with the request carved from the low end of
//!   the chosen run; release reinserts in address order and coalesces with
//!   physically adjacent free neighbors.
//!
//! ## Invariants
//!
//! - The free list is address-sorted and terminated by the sentinel;
//!   `sentinel.next == sentinel` iff the arena is fully reserved.
//! - No two free runs are physically adjacent (coalescing at release time
//!   keeps the list canonical).
//! - Free-run lengths plus reserved-run lengths tile blocks `0..N-1`.
//! - Every header access happens at a block boundary inside the arena,
//!   aligned for `FreeRun` because `BLK_SIZE` is a multiple of its
//!   alignment.

use core::cell::Cell;
use core::fmt;
use core::mem;
use core::ptr::{self, NonNull};
use std::alloc::{self, Layout};

use super::{PoolConfig, PoolStats};
use crate::error::{AllocError, AllocResult};
use crate::traits::{MemoryUsage, RawPool, Resettable};
use crate::utils::ceil_div;

/// Header of a free run, stored intrusively in the run's head block.
///
/// While a run is reserved only `length` stays meaningful; the `next` word
/// and everything after it belong to the client payload.
#[repr(C)]
struct FreeRun {
    length: usize,
    next: *mut FreeRun,
}

/// Fixed-capacity pool serving raw byte regions out of one contiguous arena.
///
/// The arena is acquired once at construction and never grows; all
/// bookkeeping lives inside the arena itself, so steady-state operation
/// causes no host-allocator traffic. Regions are handed out at block
/// granularity (`BLK_SIZE` bytes per block, default 16) using a first-fit
/// policy with low-end splitting, and released regions are coalesced with
/// adjacent free neighbors.
///
/// # Memory Layout
/// ```text
/// [run0][run1][run2]...[sentinel]
///   |                      |
///   free or reserved       length 0, next = first free run
/// ```
///
/// # Thread Safety
/// The pool mutates its free list through `&self` without synchronization;
/// it is `Send` but deliberately not `Sync`. Callers sharing one pool
/// across threads must provide external mutual exclusion.
#[derive(Debug)]
pub struct PoolAllocator<const BLK_SIZE: usize = 16> {
    /// Arena base; owned, released in `Drop`.
    arena: NonNull<u8>,

    /// Layout the arena was allocated with.
    layout: Layout,

    /// Number of blocks in the arena, sentinel included.
    n_blocks: usize,

    /// Start address of the arena (cached for bounds checks).
    start_addr: usize,

    /// One past the last arena byte.
    end_addr: usize,

    /// Configuration.
    config: PoolConfig,

    /// Blocks currently reserved.
    used_blocks: Cell<usize>,

    /// Statistics (only tracked if enabled).
    total_allocs: Cell<u32>,
    total_deallocs: Cell<u32>,
    peak_usage: Cell<usize>,
}

impl<const BLK_SIZE: usize> PoolAllocator<BLK_SIZE> {
    /// Size in bytes of the in-arena length field preceding every returned
    /// region.
    pub const HEADER_SIZE: usize = mem::size_of::<usize>();

    /// Block size in bytes, re-exported for metainfo arithmetic.
    pub const BLOCK_SIZE: usize = BLK_SIZE;

    /// Creates a pool able to serve at least `bytes` bytes, with custom
    /// configuration.
    ///
    /// The arena holds `ceil((bytes + HEADER_SIZE) / BLK_SIZE) + 1` blocks;
    /// the extra block is the sentinel.
    ///
    /// # Errors
    /// Returns an error if:
    /// - `BLK_SIZE` cannot hold a run header or is not a multiple of the
    ///   header alignment
    /// - the arena size computation overflows
    /// - the host refuses to provide the backing arena
    pub fn with_config(bytes: usize, config: PoolConfig) -> AllocResult<Self> {
        if BLK_SIZE < mem::size_of::<FreeRun>() {
            return Err(AllocError::invalid_layout("block size cannot hold a run header"));
        }
        if BLK_SIZE % mem::align_of::<FreeRun>() != 0 {
            return Err(AllocError::invalid_layout(
                "block size must be a multiple of the header alignment",
            ));
        }

        let payload = bytes
            .checked_add(Self::HEADER_SIZE)
            .ok_or_else(|| AllocError::size_overflow("capacity computation"))?;
        let n_blocks = ceil_div(payload, BLK_SIZE)
            .checked_add(1)
            .ok_or_else(|| AllocError::size_overflow("capacity computation"))?;
        let arena_bytes = n_blocks
            .checked_mul(BLK_SIZE)
            .ok_or_else(|| AllocError::size_overflow("arena size"))?;
        let layout = Layout::from_size_align(arena_bytes, mem::align_of::<FreeRun>())
            .map_err(|_| AllocError::size_overflow("arena layout"))?;

        // SAFETY: arena_bytes >= 2 * BLK_SIZE > 0, so the layout has
        // non-zero size as `alloc` requires.
        let raw = unsafe { alloc::alloc(layout) };
        let arena = NonNull::new(raw).ok_or_else(|| AllocError::out_of_memory(arena_bytes))?;

        let start_addr = arena.as_ptr() as usize;
        let pool = Self {
            arena,
            layout,
            n_blocks,
            start_addr,
            end_addr: start_addr + arena_bytes,
            config,
            used_blocks: Cell::new(0),
            total_allocs: Cell::new(0),
            total_deallocs: Cell::new(0),
            peak_usage: Cell::new(0),
        };

        // SAFETY: the arena spans n_blocks >= 2 blocks, so the head run and
        // the sentinel are distinct in-bounds blocks.
        unsafe { pool.init_free_list() };

        #[cfg(feature = "logging")]
        tracing::debug!(
            blocks = n_blocks,
            block_size = BLK_SIZE,
            requested = bytes,
            "pool arena reserved"
        );

        Ok(pool)
    }

    /// Creates a pool able to serve at least `bytes` bytes with the default
    /// configuration.
    pub fn new(bytes: usize) -> AllocResult<Self> {
        Self::with_config(bytes, PoolConfig::default())
    }

    /// Allocates a region of at least `bytes` writable bytes.
    ///
    /// The request is rounded up to whole blocks including the in-arena
    /// length field, so the returned slice covers
    /// `k * BLK_SIZE - HEADER_SIZE` usable bytes for the smallest fitting
    /// `k`. A zero-byte request still reserves one block: the length field
    /// must exist for [`deallocate`](Self::deallocate) to recover the run.
    ///
    /// # Errors
    /// Returns an out-of-memory error when no free run of sufficient length
    /// exists; the pool state is unchanged and the caller may retry after
    /// releasing regions.
    pub fn allocate(&self, bytes: usize) -> AllocResult<NonNull<[u8]>> {
        let k = Self::blocks_for(bytes)?;

        // SAFETY: all pointers chased here come from the free list, which
        // by invariant only links in-bounds, block-aligned run heads and
        // the sentinel.
        unsafe {
            let sentinel = self.sentinel();
            let mut prev = sentinel;
            let mut curr = (*sentinel).next;

            // First-fit: stop at the first run long enough.
            while curr != sentinel && (*curr).length < k {
                prev = curr;
                curr = (*curr).next;
            }
            if curr == sentinel {
                return Err(AllocError::out_of_memory(bytes));
            }

            if (*curr).length == k {
                // Exact match: unlink the whole run.
                (*prev).next = (*curr).next;
            } else {
                // Split: carve the request from the low end so the
                // remainder keeps the list address-sorted without a second
                // search.
                let rest = (curr as *mut u8).add(k * BLK_SIZE) as *mut FreeRun;
                (*rest).length = (*curr).length - k;
                (*rest).next = (*curr).next;
                (*prev).next = rest;
                (*curr).length = k;
            }

            self.used_blocks.set(self.used_blocks.get() + k);
            if self.config.track_stats {
                self.total_allocs.set(self.total_allocs.get().wrapping_add(1));
                let used = self.used_memory();
                if used > self.peak_usage.get() {
                    self.peak_usage.set(used);
                }
            }

            let payload = (curr as *mut u8).add(Self::HEADER_SIZE);
            let usable = k * BLK_SIZE - Self::HEADER_SIZE;
            if let Some(pattern) = self.config.alloc_pattern {
                ptr::write_bytes(payload, pattern, usable);
            }

            self.debug_check_invariants();
            Ok(NonNull::slice_from_raw_parts(
                NonNull::new_unchecked(payload),
                usable,
            ))
        }
    }

    /// Releases a region previously returned by [`allocate`](Self::allocate),
    /// coalescing it with any physically adjacent free neighbors.
    ///
    /// # Safety
    /// - `ptr` must be the start address of a region obtained from
    ///   `allocate` on this same pool.
    /// - The region must not have been released already; double release or
    ///   a foreign pointer makes the header recovery read arbitrary bytes.
    /// - After this call the region must not be read or written.
    pub unsafe fn deallocate(&self, ptr: NonNull<u8>) {
        // SAFETY: per the contract above, a reserved-run header sits
        // HEADER_SIZE bytes before `ptr`, and every free-list pointer
        // chased below is an in-bounds run head or the sentinel.
        unsafe {
            let head = ptr.as_ptr().sub(Self::HEADER_SIZE) as *mut FreeRun;
            debug_assert!(
                self.contains(head as *const u8),
                "released pointer does not belong to this pool"
            );
            debug_assert_eq!(
                (head as usize - self.start_addr) % BLK_SIZE,
                0,
                "released pointer is not HEADER_SIZE past a block boundary"
            );
            let run_len = (*head).length;
            debug_assert!(
                run_len >= 1 && run_len <= self.usable_blocks(),
                "released run has a corrupt length"
            );

            // Poison before relinking; surviving header fields are written
            // back below.
            if let Some(pattern) = self.config.dealloc_pattern {
                ptr::write_bytes(head as *mut u8, pattern, run_len * BLK_SIZE);
            }

            // Predecessor search: the last free run with an address below
            // the released head. On an empty list the walk ends
            // immediately with prev == succ == sentinel.
            let sentinel = self.sentinel();
            let mut prev = sentinel;
            let mut curr = (*sentinel).next;
            while curr != sentinel && (curr as usize) < (head as usize) {
                prev = curr;
                curr = (*curr).next;
            }
            let succ = curr;

            // The sentinel sits one block past the last usable block, so a
            // run ending there would otherwise test adjacent; exclude it
            // from both predicates.
            let left_adjacent =
                prev != sentinel && (prev as usize) + (*prev).length * BLK_SIZE == head as usize;
            let right_adjacent =
                succ != sentinel && (head as usize) + run_len * BLK_SIZE == succ as usize;

            match (left_adjacent, right_adjacent) {
                (true, true) => {
                    (*prev).length += run_len + (*succ).length;
                    (*prev).next = (*succ).next;
                }
                (true, false) => {
                    // prev already links to succ; only the length grows.
                    debug_assert_eq!((*prev).next, succ);
                    (*prev).length += run_len;
                }
                (false, true) => {
                    (*head).length = run_len + (*succ).length;
                    (*head).next = (*succ).next;
                    (*prev).next = head;
                }
                (false, false) => {
                    (*head).length = run_len;
                    (*head).next = succ;
                    (*prev).next = head;
                }
            }

            self.used_blocks.set(self.used_blocks.get() - run_len);
            if self.config.track_stats {
                self.total_deallocs
                    .set(self.total_deallocs.get().wrapping_add(1));
            }

            self.debug_check_invariants();
        }
    }

    /// Returns the total number of blocks in the arena, sentinel included.
    pub fn block_count(&self) -> usize {
        self.n_blocks
    }

    /// Returns the number of blocks available to clients.
    pub fn usable_blocks(&self) -> usize {
        self.n_blocks - 1
    }

    /// Returns the number of currently reserved blocks.
    pub fn allocated_blocks(&self) -> usize {
        self.used_blocks.get()
    }

    /// Returns the number of currently free blocks.
    pub fn free_blocks(&self) -> usize {
        self.usable_blocks() - self.used_blocks.get()
    }

    /// Checks whether the arena is fully reserved.
    pub fn is_full(&self) -> bool {
        self.free_blocks() == 0
    }

    /// Checks whether no region is currently reserved.
    pub fn is_empty(&self) -> bool {
        self.used_blocks.get() == 0
    }

    /// Returns the number of runs on the free list.
    pub fn free_run_count(&self) -> usize {
        let mut runs = 0;
        self.for_each_free_run(|_, _| runs += 1);
        runs
    }

    /// Returns the length in blocks of the longest free run.
    pub fn largest_free_run(&self) -> usize {
        let mut largest = 0;
        self.for_each_free_run(|_, len| largest = largest.max(len));
        largest
    }

    /// Checks whether a pointer falls inside this pool's arena.
    pub fn contains(&self, ptr: *const u8) -> bool {
        let addr = ptr as usize;
        addr >= self.start_addr && addr < self.end_addr
    }

    /// Returns a statistics snapshot, or `None` when tracking is disabled.
    pub fn stats(&self) -> Option<PoolStats> {
        if !self.config.track_stats {
            return None;
        }
        Some(PoolStats {
            total_allocs: self.total_allocs.get(),
            total_deallocs: self.total_deallocs.get(),
            peak_usage: self.peak_usage.get(),
            current_usage: self.used_memory(),
            block_size: BLK_SIZE,
            block_count: self.n_blocks,
            free_blocks: self.free_blocks(),
        })
    }

    /// Converts a byte request into a block count, reserving room for the
    /// in-arena length field.
    fn blocks_for(bytes: usize) -> AllocResult<usize> {
        let payload = bytes
            .checked_add(Self::HEADER_SIZE)
            .ok_or_else(|| AllocError::size_overflow("request size"))?;
        Ok(ceil_div(payload, BLK_SIZE))
    }

    /// Marks the whole arena as one free run linked from the sentinel.
    ///
    /// # Safety
    /// The arena must span `n_blocks >= 2` blocks and no client region may
    /// be live.
    unsafe fn init_free_list(&self) {
        // SAFETY: block 0 and block n_blocks - 1 are distinct in-bounds
        // blocks, aligned for FreeRun.
        unsafe {
            let head = self.arena.as_ptr() as *mut FreeRun;
            let sentinel = self.sentinel();
            (*head).length = self.n_blocks - 1;
            (*head).next = sentinel;
            (*sentinel).length = 0;
            (*sentinel).next = head;
        }
    }

    /// Returns the sentinel block at the physical end of the arena.
    fn sentinel(&self) -> *mut FreeRun {
        (self.start_addr + (self.n_blocks - 1) * BLK_SIZE) as *mut FreeRun
    }

    /// Returns the block index of a run head.
    fn block_index(&self, run: *const FreeRun) -> usize {
        (run as usize - self.start_addr) / BLK_SIZE
    }

    /// Visits every free run in list order as `(block index, length)`.
    fn for_each_free_run(&self, mut visit: impl FnMut(usize, usize)) {
        // SAFETY: the free list only links in-bounds run heads and
        // terminates at the sentinel.
        unsafe {
            let sentinel = self.sentinel();
            let mut curr = (*sentinel).next;
            while curr != sentinel {
                visit(self.block_index(curr), (*curr).length);
                curr = (*curr).next;
            }
        }
    }

    #[inline]
    fn debug_check_invariants(&self) {
        #[cfg(debug_assertions)]
        self.check_invariants();
    }

    /// Walks the free list asserting sortedness, canonicalization, the
    /// tile equation and cycle-free termination.
    #[cfg(debug_assertions)]
    fn check_invariants(&self) {
        // SAFETY: same as for_each_free_run; the step bound turns a broken
        // list into an assertion instead of an endless walk.
        unsafe {
            let sentinel = self.sentinel();
            let mut free = 0usize;
            let mut steps = 0usize;
            let mut prev: *mut FreeRun = sentinel;
            let mut curr = (*sentinel).next;
            while curr != sentinel {
                steps += 1;
                assert!(steps <= self.n_blocks, "free list does not terminate");
                assert!(self.contains(curr as *const u8), "free run outside arena");
                let len = (*curr).length;
                assert!(len >= 1, "zero-length free run");
                if prev != sentinel {
                    assert!(
                        (prev as usize) + (*prev).length * BLK_SIZE < curr as usize,
                        "free list unsorted or adjacent runs left uncoalesced"
                    );
                }
                free += len;
                prev = curr;
                curr = (*curr).next;
            }
            assert_eq!(
                free + self.used_blocks.get(),
                self.n_blocks - 1,
                "free and reserved runs do not tile the arena"
            );
            assert_eq!((*sentinel).length, 0, "sentinel length clobbered");
        }
    }
}

// SAFETY: the pool owns its arena exclusively and carries no thread
// affinity, so moving it to another thread is sound. It stays !Sync: the
// free list is mutated through &self without synchronization.
unsafe impl<const BLK_SIZE: usize> Send for PoolAllocator<BLK_SIZE> {}

impl<const BLK_SIZE: usize> Drop for PoolAllocator<BLK_SIZE> {
    fn drop(&mut self) {
        // SAFETY: the arena was allocated in `with_config` with exactly
        // this layout and is released only here.
        unsafe { alloc::dealloc(self.arena.as_ptr(), self.layout) }
    }
}

impl<const BLK_SIZE: usize> fmt::Display for PoolAllocator<BLK_SIZE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PoolAllocator {{ blocks: {}, free: {} }}",
            self.n_blocks,
            self.free_blocks()
        )
    }
}

// SAFETY: allocate hands out in-arena payload regions that stay valid and
// disjoint until released or the pool is dropped; regions start
// HEADER_SIZE past a block boundary and are therefore aligned to
// align_of::<usize>().
unsafe impl<const BLK_SIZE: usize> RawPool for PoolAllocator<BLK_SIZE> {
    fn allocate(&self, bytes: usize) -> AllocResult<NonNull<[u8]>> {
        PoolAllocator::allocate(self, bytes)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>) {
        // SAFETY: forwarded contract.
        unsafe { PoolAllocator::deallocate(self, ptr) }
    }
}

impl<const BLK_SIZE: usize> MemoryUsage for PoolAllocator<BLK_SIZE> {
    fn used_memory(&self) -> usize {
        self.allocated_blocks() * BLK_SIZE
    }

    fn available_memory(&self) -> Option<usize> {
        Some(self.free_blocks() * BLK_SIZE)
    }

    fn total_memory(&self) -> Option<usize> {
        Some(self.usable_blocks() * BLK_SIZE)
    }
}

impl<const BLK_SIZE: usize> Resettable for PoolAllocator<BLK_SIZE> {
    /// # Safety
    /// Caller must ensure no outstanding regions from this pool are in use.
    unsafe fn reset(&self) {
        // SAFETY: the arena geometry is unchanged since construction.
        unsafe { self.init_free_list() };
        self.used_blocks.set(0);
        if self.config.track_stats {
            self.total_allocs.set(0);
            self.total_deallocs.set(0);
            self.peak_usage.set(0);
        }

        #[cfg(feature = "logging")]
        tracing::debug!(blocks = self.n_blocks, "pool reset to a single free run");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const B: usize = 24;
    type Pool = PoolAllocator<B>;

    /// Pool whose arena holds exactly `blocks` usable blocks.
    fn pool_with_blocks(blocks: usize) -> Pool {
        Pool::new(blocks * B - Pool::HEADER_SIZE).expect("pool arena")
    }

    /// Request that consumes exactly `blocks` blocks.
    fn request_for_blocks(blocks: usize) -> usize {
        blocks * B - Pool::HEADER_SIZE
    }

    #[test]
    fn construction_rounds_capacity_up_to_blocks() {
        // 312 + 8 = 320 bytes -> 14 blocks -> 15 with the sentinel.
        let pool = Pool::new(312).unwrap();
        assert_eq!(pool.block_count(), 15);
        assert_eq!(pool.usable_blocks(), 14);
        assert_eq!(pool.free_blocks(), 14);
        assert_eq!(pool.free_run_count(), 1);
        assert!(pool.is_empty());
    }

    #[test]
    fn construction_boundary_request_gets_its_own_block() {
        // A request exactly filling k blocks of payload must not round
        // down: 16 payload bytes + 8 header = one 24-byte block.
        let pool = Pool::new(16).unwrap();
        assert_eq!(pool.usable_blocks(), 1);
        // One byte more spills into a second block.
        let pool = Pool::new(17).unwrap();
        assert_eq!(pool.usable_blocks(), 2);
    }

    #[test]
    fn rejects_block_size_smaller_than_header() {
        let err = PoolAllocator::<4>::new(64).unwrap_err();
        assert_eq!(err.kind(), crate::error::AllocErrorKind::InvalidLayout);
    }

    #[test]
    fn rejects_misaligned_block_size() {
        let err = PoolAllocator::<20>::new(64).unwrap_err();
        assert_eq!(err.kind(), crate::error::AllocErrorKind::InvalidLayout);
    }

    #[test]
    fn overflowing_request_is_reported() {
        let pool = pool_with_blocks(4);
        let err = pool.allocate(usize::MAX).unwrap_err();
        assert_eq!(err.kind(), crate::error::AllocErrorKind::SizeOverflow);
    }

    #[test]
    fn split_carves_from_the_low_end() {
        let pool = pool_with_blocks(14);
        let a = pool.allocate(request_for_blocks(2)).unwrap();
        let b = pool.allocate(request_for_blocks(2)).unwrap();
        let base = a.cast::<u8>().as_ptr() as usize;
        let next = b.cast::<u8>().as_ptr() as usize;
        // Consecutive allocations advance by whole runs.
        assert_eq!(next - base, 2 * B);
        assert_eq!(pool.allocated_blocks(), 4);
        assert_eq!(pool.free_run_count(), 1);
    }

    #[test]
    fn returned_slice_covers_the_rounded_up_region() {
        let pool = pool_with_blocks(4);
        let region = pool.allocate(1).unwrap();
        assert_eq!(region.len(), B - Pool::HEADER_SIZE);
        unsafe { pool.deallocate(region.cast()) };
    }

    #[test]
    fn zero_byte_request_reserves_one_block() {
        let pool = pool_with_blocks(4);
        let region = pool.allocate(0).unwrap();
        assert_eq!(pool.allocated_blocks(), 1);
        unsafe { pool.deallocate(region.cast()) };
        assert!(pool.is_empty());
    }

    #[test]
    fn exact_fit_empties_the_list() {
        let pool = pool_with_blocks(6);
        let region = pool.allocate(request_for_blocks(6)).unwrap();
        assert!(pool.is_full());
        assert_eq!(pool.free_run_count(), 0);
        unsafe { pool.deallocate(region.cast()) };
        assert_eq!(pool.free_run_count(), 1);
        assert_eq!(pool.largest_free_run(), 6);
    }

    #[test]
    fn failed_allocation_leaves_the_pool_unchanged() {
        let pool = pool_with_blocks(4);
        let held = pool.allocate(request_for_blocks(3)).unwrap();
        let free_before = pool.free_blocks();
        let runs_before = pool.free_run_count();

        let err = pool.allocate(request_for_blocks(2)).unwrap_err();
        assert!(err.is_out_of_memory());
        assert_eq!(pool.free_blocks(), free_before);
        assert_eq!(pool.free_run_count(), runs_before);

        unsafe { pool.deallocate(held.cast()) };
    }

    #[test]
    fn address_reuse_after_free() {
        let pool = pool_with_blocks(8);
        let first = pool.allocate(100).unwrap().cast::<u8>();
        let addr = first.as_ptr() as usize;
        unsafe { pool.deallocate(first) };
        let second = pool.allocate(100).unwrap().cast::<u8>();
        assert_eq!(second.as_ptr() as usize, addr);
        unsafe { pool.deallocate(second) };
    }

    #[test]
    fn freeing_between_reserved_neighbors_merges_nothing() {
        let pool = pool_with_blocks(6);
        let regions: Vec<_> = (0..3)
            .map(|_| pool.allocate(request_for_blocks(2)).unwrap())
            .collect();
        unsafe { pool.deallocate(regions[1].cast()) };
        assert_eq!(pool.free_run_count(), 1);
        assert_eq!(pool.largest_free_run(), 2);
        unsafe {
            pool.deallocate(regions[0].cast());
            pool.deallocate(regions[2].cast());
        }
        assert_eq!(pool.free_run_count(), 1);
        assert_eq!(pool.largest_free_run(), 6);
    }

    #[test]
    fn contains_covers_the_arena_only() {
        let pool = pool_with_blocks(4);
        let region = pool.allocate(8).unwrap().cast::<u8>();
        assert!(pool.contains(region.as_ptr()));
        let outside = 0x1usize as *const u8;
        assert!(!pool.contains(outside));
        unsafe { pool.deallocate(region) };
    }

    #[test]
    fn stats_track_allocs_and_peak() {
        let pool = Pool::with_config(
            request_for_blocks(8),
            PoolConfig {
                track_stats: true,
                alloc_pattern: None,
                dealloc_pattern: None,
            },
        )
        .unwrap();

        let a = pool.allocate(request_for_blocks(3)).unwrap();
        let b = pool.allocate(request_for_blocks(2)).unwrap();
        unsafe { pool.deallocate(a.cast()) };

        let stats = pool.stats().expect("tracking enabled");
        assert_eq!(stats.total_allocs, 2);
        assert_eq!(stats.total_deallocs, 1);
        assert_eq!(stats.peak_usage, 5 * B);
        assert_eq!(stats.current_usage, 2 * B);
        assert_eq!(stats.block_size, B);

        unsafe { pool.deallocate(b.cast()) };
    }

    #[test]
    fn stats_disabled_returns_none() {
        let pool = Pool::with_config(256, PoolConfig::production()).unwrap();
        assert!(pool.stats().is_none());
    }

    #[test]
    fn display_reports_block_count() {
        let pool = pool_with_blocks(14);
        let dump = pool.to_string();
        assert_eq!(dump, "PoolAllocator { blocks: 15, free: 14 }");
    }

    #[test]
    fn memory_usage_tracks_reserved_blocks() {
        let pool = pool_with_blocks(8);
        assert_eq!(pool.used_memory(), 0);
        assert_eq!(pool.total_memory(), Some(8 * B));

        let region = pool.allocate(request_for_blocks(3)).unwrap();
        assert_eq!(pool.used_memory(), 3 * B);
        assert_eq!(pool.available_memory(), Some(5 * B));

        unsafe { pool.deallocate(region.cast()) };
        assert_eq!(pool.used_memory(), 0);
    }

    #[test]
    fn reset_restores_the_initial_free_run() {
        let pool = pool_with_blocks(8);
        let _a = pool.allocate(request_for_blocks(2)).unwrap();
        let _b = pool.allocate(request_for_blocks(2)).unwrap();
        assert_eq!(pool.free_blocks(), 4);

        // SAFETY: the regions above are never touched again.
        unsafe { pool.reset() };
        assert!(pool.is_empty());
        assert_eq!(pool.free_run_count(), 1);
        assert_eq!(pool.largest_free_run(), 8);
        assert!(pool.can_reset());
    }

    #[test]
    fn debug_patterns_poison_payload() {
        let pool = Pool::with_config(request_for_blocks(4), PoolConfig::debug()).unwrap();
        let region = pool.allocate(16).unwrap();
        let payload = region.cast::<u8>();
        // SAFETY: region is live and at least 16 bytes long.
        unsafe {
            for i in 0..16 {
                assert_eq!(*payload.as_ptr().add(i), 0xBB);
            }
            pool.deallocate(payload);
        }
    }
}
