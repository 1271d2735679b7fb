//! Fallback for targets without mmap, using std::alloc.

use std::io;
use std::ptr::NonNull;

use super::Pages;

const PAGE_SIZE: usize = 4096;

pub(crate) fn alloc_pages(size: usize, _populate: bool) -> io::Result<Pages> {
    assert!(size > 0, "region size must be non-zero");

    let size = size
        .checked_add(PAGE_SIZE - 1)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "region size overflow"))?
        & !(PAGE_SIZE - 1);

    let layout = std::alloc::Layout::from_size_align(size, PAGE_SIZE)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // zeroed allocation already touches every page
    let ptr = unsafe { std::alloc::alloc_zeroed(layout) };
    let ptr = NonNull::new(ptr)
        .ok_or_else(|| io::Error::new(io::ErrorKind::OutOfMemory, "region allocation failed"))?;

    Ok(Pages { ptr, size })
}

/// # Safety
/// ptr and size must be from a previous alloc_pages call.
pub(crate) unsafe fn drop_pages(ptr: NonNull<u8>, size: usize) {
    if let Ok(layout) = std::alloc::Layout::from_size_align(size, PAGE_SIZE) {
        unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
    }
}
