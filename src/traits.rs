//! Traits at the pool boundary.
//!
//! `RawPool` is the seam the tagged indirection layer routes through: any
//! storage pool that can hand out and take back raw byte regions. The
//! remaining traits expose the observation and lifecycle surface shared by
//! arena-style allocators.

use core::ptr::NonNull;

use crate::error::AllocResult;

/// A storage pool serving raw byte regions.
///
/// # Safety
///
/// Implementors must ensure that:
/// - A successful `allocate` returns a region of at least the requested
///   number of writable bytes, aligned to at least `align_of::<usize>()`,
///   disjoint from every other live region of the same pool, and valid
///   until the matching `deallocate` or the pool is dropped.
/// - `deallocate` accepts exactly the addresses `allocate` returned and
///   makes the region available for reuse.
pub unsafe trait RawPool {
    /// Allocates a region of at least `bytes` writable bytes.
    ///
    /// The returned slice covers the full usable extent of the region,
    /// which may exceed `bytes` due to block-granular rounding.
    ///
    /// # Errors
    /// Returns an error when no region can be served; the pool state is
    /// unchanged in that case.
    fn allocate(&self, bytes: usize) -> AllocResult<NonNull<[u8]>>;

    /// Releases a region previously returned by `allocate` on this pool.
    ///
    /// # Safety
    /// - `ptr` must be the start address of a region obtained from
    ///   `allocate` on this same pool.
    /// - The region must not have been released already.
    /// - After this call the region must not be read or written.
    unsafe fn deallocate(&self, ptr: NonNull<u8>);
}

/// Memory tracking capabilities.
pub trait MemoryUsage {
    /// Returns currently reserved memory in bytes.
    fn used_memory(&self) -> usize;

    /// Returns memory still available for allocation in bytes.
    ///
    /// `None` means the implementation has no inherent limit.
    fn available_memory(&self) -> Option<usize>;

    /// Returns total memory capacity in bytes.
    ///
    /// Defaults to the sum of used and available memory; `None` when no
    /// inherent limit exists.
    fn total_memory(&self) -> Option<usize> {
        self.available_memory().map(|avail| self.used_memory() + avail)
    }
}

/// Allocator reset capability.
///
/// Resetting invalidates every previous allocation at once and returns the
/// allocator to its freshly constructed state without releasing the backing
/// memory.
pub trait Resettable {
    /// Resets the allocator, invalidating all previous allocations.
    ///
    /// # Safety
    /// - Every pointer previously returned by the allocator becomes invalid
    ///   immediately.
    /// - The caller must ensure no live references into the allocator's
    ///   memory remain.
    unsafe fn reset(&self);

    /// Checks whether the allocator can currently be reset.
    fn can_reset(&self) -> bool {
        true
    }
}
