//! # blockpool
//!
//! Fixed-capacity, block-granular storage pools for embedded and
//! performance-sensitive contexts.
//!
//! A [`PoolAllocator`] reserves one contiguous arena of equally sized
//! blocks at construction and serves raw byte regions out of it with no
//! further host-allocator traffic. Free space is kept on an intrusive,
//! address-sorted free list threaded through the arena itself and closed
//! by a sentinel block:
//!
//! ```text
//! arena:     [ free run | reserved | free run | reserved | sentinel ]
//! free list: sentinel.next -> free run -> free run -> sentinel
//!            (address-sorted, no two free runs physically adjacent)
//! ```
//!
//! Allocation is first-fit with the request split from the low end of the
//! chosen run; release coalesces with physically adjacent free neighbors,
//! so a drained pool always collapses back to a single run. Address reuse
//! is deterministic, which matters for fragmentation-sensitive workloads.
//!
//! ## Quick Start
//!
//! ```
//! use blockpool::PoolAllocator;
//!
//! let pool = PoolAllocator::<16>::new(256)?;
//! let region = pool.allocate(64)?;
//!
//! // SAFETY: the region is live until deallocated and at least 64 bytes.
//! unsafe {
//!     std::ptr::write_bytes(region.cast::<u8>().as_ptr(), 0xAB, 64);
//!     pool.deallocate(region.cast());
//! }
//! assert!(pool.is_empty());
//! # Ok::<(), blockpool::AllocError>(())
//! ```
//!
//! ## Features
//!
//! - `logging`: emit `tracing` events for pool lifecycle (construction,
//!   reset); the steady-state allocate/release paths never log.
//!
//! ## Thread Safety
//!
//! A pool is owned by one thread at a time (`Send`, not `Sync`). Distinct
//! pools share no state; to share one pool, wrap it in external mutual
//! exclusion covering both allocate and release.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(rust_2018_idioms)]

pub mod error;
pub mod pool;
pub mod tagged;
pub mod traits;
pub mod utils;

// Re-export core types for convenience
pub use crate::error::{AllocError, AllocErrorKind, AllocResult};
pub use crate::pool::{PoolAllocator, PoolConfig, PoolStats};

/// Convenient re-exports of commonly used types and traits.
pub mod prelude {
    pub use crate::error::{AllocError, AllocErrorKind, AllocResult};
    pub use crate::pool::{PoolAllocator, PoolConfig, PoolStats};
    pub use crate::traits::{MemoryUsage, RawPool, Resettable};
}
