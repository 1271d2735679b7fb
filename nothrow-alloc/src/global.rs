//! Process heap allocator.

use core::alloc::Layout;
use core::ptr::NonNull;

use crate::Allocator;

/// The process heap, via `std::alloc`.
///
/// A null return from the system allocator becomes `None`; this type never
/// calls `handle_alloc_error`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Global;

impl Allocator for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        debug_assert!(layout.size() != 0, "zero-sized layout reached Global");
        // Safety: layout has non-zero size (trait contract)
        NonNull::new(unsafe { std::alloc::alloc(layout) })
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
    }
}
