//! Allocation capability for containers that never unwind on allocation failure.
//!
//! Containers in `nothrow-collections` obtain and release every byte of
//! memory through the [`Allocator`] trait defined here. The trait differs
//! from `std::alloc::GlobalAlloc` in one important way: failure is a value.
//! `allocate` returns `None`, nothing panics, nothing calls
//! `handle_alloc_error`, and the caller decides whether to retry, degrade
//! or give up.
//!
//! # Example
//!
//! ```
//! use nothrow_alloc::{Allocator, Global};
//!
//! let alloc = Global;
//! let slot = alloc.allocate_one::<u64>().unwrap();
//!
//! unsafe {
//!     alloc.construct(slot, 42);
//!     assert_eq!(*slot.as_ptr(), 42);
//!     alloc.destroy(slot);
//!     alloc.deallocate_one(slot);
//! }
//! ```
//!
//! # Typed Requests
//!
//! Implementors only provide the raw `allocate`/`deallocate` pair over a
//! [`Layout`]. Everything else is derived from it:
//!
//! ```text
//! allocate(layout)            - raw, required
//!     │
//!     ├── allocate_array::<T>(n)  - N elements, rejects n > max_size::<T>()
//!     └── allocate_one::<T>()     - one element (used for list nodes)
//! ```
//!
//! Because requests are typed at the call site, a list asks for storage
//! sized and aligned for one *node* directly; there is no separate
//! "rebound" allocator for node types.
//!
//! # Allocators
//!
//! | Allocator | Backing | Use Case |
//! |-----------|---------|----------|
//! | [`Global`] | `std::alloc` | Default choice |
//! | [`Arena`] | One page-aligned OS region, bump allocated | Short-lived batches |
//! | [`Tracking`] | Wraps another allocator | Leak checks, accounting |
//! | [`Limited`] | Wraps another allocator | Failure injection |
//!
//! # Threading
//!
//! `Arena`, `Tracking` and `Limited` keep their bookkeeping in `Cell`s and
//! are not `Sync`. Share them between threads only behind external
//! synchronization.

#![warn(missing_docs)]

mod arena;
mod error;
mod global;
mod sys;
mod tracking;
mod uninit;

pub use arena::{Arena, ArenaBuilder, ArenaError};
pub use error::{AllocError, Rejected};
pub use global::Global;
pub use tracking::{Limited, Stats, Tracking};
pub use uninit::Uninit;

use core::alloc::Layout;
use core::mem;
use core::ptr::{self, NonNull};

/// Returns the largest number of `T` an allocator can be asked for.
///
/// Zero-sized types report `usize::MAX`.
#[inline]
pub const fn max_elements<T>() -> usize {
    match mem::size_of::<T>() {
        0 => usize::MAX,
        size => usize::MAX / size,
    }
}

/// Raw memory acquisition and release that reports failure as `None`.
///
/// # Requirements
///
/// Implementations must provide:
/// - **No unwinding**: `allocate` returns `None` on failure
/// - **Stable blocks**: a returned block stays valid until deallocated
/// - **Matching release**: `deallocate` accepts any block previously
///   returned by `allocate` on the same allocator with the same layout
///
/// # Implementations
///
/// - [`Global`] - the process heap
/// - [`Arena`] - bump allocation over a single page-aligned region
/// - [`Tracking`] / [`Limited`] - wrappers over another allocator
/// - `&A` for any `A: Allocator`, so containers can share one instance
pub trait Allocator {
    /// Allocates a block fitting `layout`.
    ///
    /// `layout` has a non-zero size; zero-sized requests are answered by the
    /// typed helpers without reaching the allocator.
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Releases a block.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate` on this allocator with the same
    /// `layout`, and must not be used afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Largest element count this allocator accepts for `T`.
    #[inline]
    fn max_size<T>(&self) -> usize {
        max_elements::<T>()
    }

    /// Allocates uninitialized storage for `n` values of `T`.
    ///
    /// Returns `None` if `n` exceeds [`max_size`](Self::max_size) or the
    /// allocator is out of memory. Zero-byte requests return a dangling,
    /// well-aligned pointer.
    #[inline]
    fn allocate_array<T>(&self, n: usize) -> Option<NonNull<T>> {
        if n > self.max_size::<T>() {
            tracing::debug!(
                requested = n,
                max = self.max_size::<T>(),
                elem = core::any::type_name::<T>(),
                "array request exceeds allocator capacity"
            );
            return None;
        }

        let layout = Layout::array::<T>(n).ok()?;
        if layout.size() == 0 {
            return Some(NonNull::dangling());
        }

        let block = self.allocate(layout);
        if block.is_none() {
            tracing::debug!(
                bytes = layout.size(),
                align = layout.align(),
                "allocator refused request"
            );
        }
        block.map(NonNull::cast)
    }

    /// Releases storage obtained from [`allocate_array`](Self::allocate_array).
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate_array::<T>(n)` on this allocator, and
    /// no live values may remain in it.
    #[inline]
    unsafe fn deallocate_array<T>(&self, ptr: NonNull<T>, n: usize) {
        let Ok(layout) = Layout::array::<T>(n) else {
            return;
        };
        if layout.size() != 0 {
            unsafe { self.deallocate(ptr.cast(), layout) }
        }
    }

    /// Allocates uninitialized storage for a single `T`.
    #[inline]
    fn allocate_one<T>(&self) -> Option<NonNull<T>> {
        self.allocate_array(1)
    }

    /// Releases storage obtained from [`allocate_one`](Self::allocate_one).
    ///
    /// # Safety
    ///
    /// Same as [`deallocate_array`](Self::deallocate_array) with `n == 1`.
    #[inline]
    unsafe fn deallocate_one<T>(&self, ptr: NonNull<T>) {
        unsafe { self.deallocate_array(ptr, 1) }
    }

    /// Moves `value` into an uninitialized slot.
    ///
    /// # Safety
    ///
    /// `slot` must be valid for writes and must not hold a live value.
    #[inline]
    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        unsafe { slot.as_ptr().write(value) }
    }

    /// Drops the value in `slot` in place, leaving the storage allocated.
    ///
    /// # Safety
    ///
    /// `slot` must hold a live value that is not used afterwards.
    #[inline]
    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        unsafe { ptr::drop_in_place(slot.as_ptr()) }
    }
}

impl<A: Allocator> Allocator for &A {
    #[inline]
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { (**self).deallocate(ptr, layout) }
    }

    #[inline]
    fn max_size<T>(&self) -> usize {
        (**self).max_size::<T>()
    }

    #[inline]
    fn allocate_array<T>(&self, n: usize) -> Option<NonNull<T>> {
        (**self).allocate_array(n)
    }

    #[inline]
    unsafe fn deallocate_array<T>(&self, ptr: NonNull<T>, n: usize) {
        unsafe { (**self).deallocate_array(ptr, n) }
    }

    #[inline]
    fn allocate_one<T>(&self) -> Option<NonNull<T>> {
        (**self).allocate_one()
    }

    #[inline]
    unsafe fn deallocate_one<T>(&self, ptr: NonNull<T>) {
        unsafe { (**self).deallocate_one(ptr) }
    }

    #[inline]
    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        unsafe { (**self).construct(slot, value) }
    }

    #[inline]
    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        unsafe { (**self).destroy(slot) }
    }
}
