//! Unix implementation using mmap.

use std::io;
use std::ptr::NonNull;

use super::Pages;

fn page_size() -> usize {
    #[cfg(miri)]
    {
        4096
    }

    #[cfg(not(miri))]
    {
        static PAGE_SIZE: std::sync::OnceLock<usize> = std::sync::OnceLock::new();
        *PAGE_SIZE.get_or_init(|| {
            let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
            if size > 0 { size as usize } else { 4096 }
        })
    }
}

fn round_to_pages(size: usize) -> io::Result<usize> {
    let page_size = page_size();
    size
        .checked_add(page_size - 1)
        .map(|s| s & !(page_size - 1))
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "region size overflow"))
}

// =============================================================================
// Allocation
// =============================================================================

#[cfg(miri)]
pub(crate) fn alloc_pages(size: usize, _populate: bool) -> io::Result<Pages> {
    assert!(size > 0, "region size must be non-zero");

    let size = round_to_pages(size)?;
    let layout = std::alloc::Layout::from_size_align(size, page_size())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let ptr = unsafe { std::alloc::alloc_zeroed(layout) };
    let ptr = NonNull::new(ptr)
        .ok_or_else(|| io::Error::new(io::ErrorKind::OutOfMemory, "region allocation failed"))?;

    Ok(Pages { ptr, size })
}

#[cfg(not(miri))]
pub(crate) fn alloc_pages(size: usize, populate: bool) -> io::Result<Pages> {
    assert!(size > 0, "region size must be non-zero");

    let size = round_to_pages(size)?;

    let ptr = unsafe {
        libc::mmap(
            std::ptr::null_mut(),
            size,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
            -1,
            0,
        )
    };

    if ptr == libc::MAP_FAILED {
        return Err(io::Error::last_os_error());
    }

    let ptr = NonNull::new(ptr as *mut u8)
        .ok_or_else(|| io::Error::new(io::ErrorKind::OutOfMemory, "mmap returned null"))?;

    // Request THP for regions >= 2MB
    #[cfg(target_os = "linux")]
    if size >= 2 * 1024 * 1024 {
        unsafe {
            libc::madvise(ptr.as_ptr() as *mut libc::c_void, size, libc::MADV_HUGEPAGE);
        }
    }
    if populate {
        for offset in (0..size).step_by(page_size()) {
            unsafe {
                std::ptr::write_volatile(ptr.as_ptr().add(offset), 0);
            }
        }
    }

    Ok(Pages { ptr, size })
}

// =============================================================================
// Deallocation
// =============================================================================

/// # Safety
/// ptr and size must be from a previous alloc_pages call.
pub(crate) unsafe fn drop_pages(ptr: NonNull<u8>, size: usize) {
    #[cfg(miri)]
    if let Ok(layout) = std::alloc::Layout::from_size_align(size, page_size()) {
        unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
    }

    #[cfg(not(miri))]
    unsafe {
        libc::munmap(ptr.as_ptr() as *mut libc::c_void, size);
    }
}
