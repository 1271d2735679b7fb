//! Page-granular memory straight from the OS (internal).

#[cfg(not(unix))]
mod alloc;

#[cfg(unix)]
mod unix;

use std::ptr::NonNull;

#[cfg(not(unix))]
use alloc::{alloc_pages, drop_pages};

#[cfg(unix)]
use unix::{alloc_pages, drop_pages};

/// A page-aligned region backing an [`Arena`](crate::Arena).
///
/// The length is rounded up to whole pages. Memory is returned to the OS
/// when dropped.
#[derive(Debug)]
pub(crate) struct Pages {
    ptr: NonNull<u8>,
    size: usize,
}

impl Pages {
    /// Maps at least `size` bytes. With `populate`, every page is touched
    /// up front so the first allocations do not fault.
    pub(crate) fn alloc(size: usize, populate: bool) -> std::io::Result<Self> {
        alloc_pages(size, populate)
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Mapped length in bytes (a multiple of the page size).
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.size
    }
}

unsafe impl Send for Pages {}

impl Drop for Pages {
    fn drop(&mut self) {
        unsafe { drop_pages(self.ptr, self.size) }
    }
}
