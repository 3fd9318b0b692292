//! Ownership-tagged acquire/release over pools and the host heap.
//!
//! Callers that mix pool-backed and host-backed regions need release to
//! route each address back to its origin. This module steals a prefix word
//! from every region it hands out: the tag names the owning pool, or is
//! null for host-owned regions. [`deallocate`] reads the tag back and
//! routes to the pool's release or to the host's `free`.
//!
//! The pools themselves never see the tag; [`allocate_in`] adds
//! [`Tag::SIZE`] to the byte count before forwarding, so a pool treats the
//! request verbatim.

use core::mem;
use core::ptr::{self, NonNull};

use libc::c_void;

use crate::error::{AllocError, AllocResult};
use crate::traits::RawPool;

/// Ownership tag stamped immediately before every region handed out by
/// this module.
pub struct Tag {
    owner: Option<NonNull<dyn RawPool>>,
}

impl Tag {
    /// Size of the tag prefix in bytes.
    pub const SIZE: usize = mem::size_of::<Tag>();
}

/// Allocates `bytes` writable bytes from `pool`, tagged with the pool's
/// identity.
///
/// The pool over-allocates by [`Tag::SIZE`]; the returned address points
/// just past the tag.
///
/// # Errors
/// Propagates the pool's allocation failure; the tagged request can also
/// overflow for byte counts near `usize::MAX`.
pub fn allocate_in<P>(pool: &P, bytes: usize) -> AllocResult<NonNull<u8>>
where
    P: RawPool + 'static,
{
    let total = bytes
        .checked_add(Tag::SIZE)
        .ok_or_else(|| AllocError::size_overflow("tagged request"))?;
    let region = pool.allocate(total)?;
    let base = region.cast::<u8>();
    let owner = pool as *const P as *const dyn RawPool as *mut dyn RawPool;

    // SAFETY: `region` covers at least `total >= Tag::SIZE` writable bytes
    // aligned for a pointer word (RawPool contract), so the tag write and
    // the offset stay in bounds.
    unsafe {
        ptr::write(
            base.as_ptr() as *mut Tag,
            Tag {
                owner: Some(NonNull::new_unchecked(owner)),
            },
        );
        Ok(NonNull::new_unchecked(base.as_ptr().add(Tag::SIZE)))
    }
}

/// Allocates `bytes` writable bytes from the host heap, tagged as
/// host-owned.
///
/// # Errors
/// Returns an out-of-memory error when the host refuses the request.
pub fn allocate_host(bytes: usize) -> AllocResult<NonNull<u8>> {
    let total = bytes
        .checked_add(Tag::SIZE)
        .ok_or_else(|| AllocError::size_overflow("tagged request"))?;

    // SAFETY: `total >= Tag::SIZE > 0`; a null return is handled below.
    let raw = unsafe { libc::malloc(total) as *mut u8 };
    let base = NonNull::new(raw).ok_or_else(|| AllocError::out_of_memory(bytes))?;

    // SAFETY: the host region covers `total` bytes with malloc alignment,
    // so the tag write and the offset stay in bounds.
    unsafe {
        ptr::write(base.as_ptr() as *mut Tag, Tag { owner: None });
        Ok(NonNull::new_unchecked(base.as_ptr().add(Tag::SIZE)))
    }
}

/// Releases a tagged region, routing it to its owning pool or to the host
/// heap.
///
/// # Safety
/// - `ptr` must have been returned by [`allocate_in`] or
///   [`allocate_host`] and not released since.
/// - If the region is pool-owned, the owning pool must still be alive.
/// - After this call the region must not be read or written.
pub unsafe fn deallocate(ptr: NonNull<u8>) {
    // SAFETY: per the contract a tag sits immediately before `ptr`; the
    // owner pointer, when present, names a live pool that produced the
    // untagged region starting at the tag.
    unsafe {
        let base = ptr.as_ptr().sub(Tag::SIZE);
        let tag = ptr::read(base as *const Tag);
        match tag.owner {
            Some(pool) => pool.as_ref().deallocate(NonNull::new_unchecked(base)),
            None => libc::free(base as *mut c_void),
        }
    }
}
