//! Allocation error type for storage pool operations.
//!
//! Two situations produce errors: a request that no free run can satisfy
//! (`OutOfMemory`) and size arithmetic or block-geometry problems caught
//! before the arena is touched (`SizeOverflow`, `InvalidLayout`). Errors are
//! returned to the immediate caller; nothing is retried or logged here.

use core::fmt;

/// Categories of allocation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllocErrorKind {
    /// No free run of sufficient length exists, or the host refused to
    /// provide the backing arena.
    OutOfMemory,
    /// Size arithmetic overflowed `usize`.
    SizeOverflow,
    /// The block geometry or requested layout is invalid.
    InvalidLayout,
}

impl AllocErrorKind {
    /// Returns a static string describing the error kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            AllocErrorKind::OutOfMemory => "out of memory",
            AllocErrorKind::SizeOverflow => "size overflow",
            AllocErrorKind::InvalidLayout => "invalid layout",
        }
    }
}

impl fmt::Display for AllocErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by pool construction and allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocError {
    kind: AllocErrorKind,
    requested: Option<usize>,
    detail: Option<&'static str>,
}

impl AllocError {
    /// Creates an out-of-memory error for a request of `requested` bytes.
    pub const fn out_of_memory(requested: usize) -> Self {
        Self {
            kind: AllocErrorKind::OutOfMemory,
            requested: Some(requested),
            detail: None,
        }
    }

    /// Creates a size-overflow error with a short context note.
    pub const fn size_overflow(detail: &'static str) -> Self {
        Self {
            kind: AllocErrorKind::SizeOverflow,
            requested: None,
            detail: Some(detail),
        }
    }

    /// Creates an invalid-layout error with a short context note.
    pub const fn invalid_layout(detail: &'static str) -> Self {
        Self {
            kind: AllocErrorKind::InvalidLayout,
            requested: None,
            detail: Some(detail),
        }
    }

    /// Returns the specific error kind.
    pub const fn kind(&self) -> AllocErrorKind {
        self.kind
    }

    /// Returns the request size that failed, if one was involved.
    pub const fn requested(&self) -> Option<usize> {
        self.requested
    }

    /// Checks whether this is an out-of-memory error.
    pub const fn is_out_of_memory(&self) -> bool {
        matches!(self.kind, AllocErrorKind::OutOfMemory)
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool allocation failed ({})", self.kind)?;
        if let Some(bytes) = self.requested {
            write!(f, ": could not serve {bytes} bytes")?;
        }
        if let Some(detail) = self.detail {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AllocError {}

/// Result type for allocation operations.
pub type AllocResult<T> = Result<T, AllocError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_accessors() {
        let err = AllocError::out_of_memory(48);
        assert_eq!(err.kind(), AllocErrorKind::OutOfMemory);
        assert_eq!(err.requested(), Some(48));
        assert!(err.is_out_of_memory());

        let err = AllocError::invalid_layout("block size too small");
        assert_eq!(err.kind(), AllocErrorKind::InvalidLayout);
        assert!(!err.is_out_of_memory());
    }

    #[test]
    fn display_carries_request_size() {
        let msg = AllocError::out_of_memory(128).to_string();
        assert!(msg.contains("out of memory"));
        assert!(msg.contains("128"));
    }

    #[test]
    fn display_carries_detail() {
        let msg = AllocError::size_overflow("capacity computation").to_string();
        assert!(msg.contains("size overflow"));
        assert!(msg.contains("capacity computation"));
    }
}
