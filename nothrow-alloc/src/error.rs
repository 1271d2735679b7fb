//! Error types for allocation failure.

use core::alloc::Layout;
use core::fmt;

/// Allocation failed.
///
/// This is the only error the containers report. It covers both an
/// allocator returning `None` and a request larger than
/// [`Allocator::max_size`](crate::Allocator::max_size) (capacity overflow),
/// in which case no layout is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError {
    layout: Option<Layout>,
}

impl AllocError {
    /// An allocator refused a request for `layout`.
    #[inline]
    pub const fn new(layout: Layout) -> Self {
        Self {
            layout: Some(layout),
        }
    }

    /// A request was too large to describe.
    #[inline]
    pub const fn capacity_overflow() -> Self {
        Self { layout: None }
    }

    /// Error for a failed request of `n` values of `T`.
    #[inline]
    pub fn array<T>(n: usize) -> Self {
        match Layout::array::<T>(n) {
            Ok(layout) => Self::new(layout),
            Err(_) => Self::capacity_overflow(),
        }
    }

    /// The layout that could not be satisfied, if the request was representable.
    #[inline]
    pub const fn layout(&self) -> Option<Layout> {
        self.layout
    }

    /// Returns `true` if the request exceeded the addressable maximum.
    #[inline]
    pub const fn is_capacity_overflow(&self) -> bool {
        self.layout.is_none()
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.layout {
            Some(layout) => write!(f, "memory allocation of {} bytes failed", layout.size()),
            None => write!(f, "capacity overflow"),
        }
    }
}

impl std::error::Error for AllocError {}

/// A single-value insertion failed; the value is handed back.
///
/// Returned by `push_back` and friends so the caller keeps ownership of a
/// value that could not be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejected<T> {
    /// The value that could not be inserted.
    pub value: T,
    /// Why the insertion failed.
    pub error: AllocError,
}

impl<T> Rejected<T> {
    /// Pairs a value with the failure that rejected it.
    #[inline]
    pub const fn new(value: T, error: AllocError) -> Self {
        Self { value, error }
    }

    /// Returns the value that could not be inserted.
    #[inline]
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Returns the underlying allocation error.
    #[inline]
    pub const fn error(&self) -> AllocError {
        self.error
    }
}

impl<T> fmt::Display for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value rejected: {}", self.error)
    }
}

impl<T: fmt::Debug> std::error::Error for Rejected<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<T> From<Rejected<T>> for AllocError {
    #[inline]
    fn from(rejected: Rejected<T>) -> Self {
        rejected.error
    }
}
