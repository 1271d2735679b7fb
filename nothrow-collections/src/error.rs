//! Error for bulk insertion that stopped early.

use std::fmt;

use nothrow_alloc::AllocError;

/// A best-effort bulk insert ran out of memory part way through.
///
/// Elements inserted before the failure stay in the container; nothing is
/// rolled back. [`inserted`](Self::inserted) tells how many made it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkError {
    inserted: usize,
    error: AllocError,
}

impl BulkError {
    pub(crate) const fn new(inserted: usize, error: AllocError) -> Self {
        Self { inserted, error }
    }

    /// Elements inserted before the failure.
    #[inline]
    pub const fn inserted(&self) -> usize {
        self.inserted
    }

    /// The allocation failure that stopped the insert.
    #[inline]
    pub const fn error(&self) -> AllocError {
        self.error
    }
}

impl fmt::Display for BulkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bulk insert stopped after {} elements: {}",
            self.inserted, self.error
        )
    }
}

impl std::error::Error for BulkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<BulkError> for AllocError {
    #[inline]
    fn from(err: BulkError) -> Self {
        err.error
    }
}
