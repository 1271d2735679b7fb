//! Temporary ownership of freshly allocated, not yet initialized storage.

use core::fmt;
use core::mem;
use core::ptr::NonNull;

use crate::Allocator;

/// Storage for one `T` that has been allocated but not yet written.
///
/// If the guard is dropped before [`write`](Self::write) completes (for
/// example because the closure passed to [`write_with`](Self::write_with)
/// panicked), the storage goes back to the allocator. Ownership leaves the
/// guard only once a value has been successfully constructed.
///
/// # Example
///
/// ```
/// use nothrow_alloc::{Allocator, Global, Uninit};
///
/// let alloc = Global;
/// let slot = Uninit::<String, _>::new_in(&alloc).unwrap();
/// let ptr = slot.write_with(|| "built".to_string());
///
/// unsafe {
///     assert_eq!(&*ptr.as_ptr(), "built");
///     alloc.destroy(ptr);
///     alloc.deallocate_one(ptr);
/// }
/// ```
pub struct Uninit<'a, T, A: Allocator> {
    ptr: NonNull<T>,
    alloc: &'a A,
}

impl<'a, T, A: Allocator> Uninit<'a, T, A> {
    /// Allocates storage for one `T`, or `None` if the allocator refuses.
    #[inline]
    pub fn new_in(alloc: &'a A) -> Option<Self> {
        let ptr = alloc.allocate_one::<T>()?;
        Some(Self { ptr, alloc })
    }

    /// Returns the (uninitialized) storage address.
    #[inline]
    pub fn as_ptr(&self) -> NonNull<T> {
        self.ptr
    }

    /// Writes `value` and releases ownership of the initialized storage.
    #[inline]
    pub fn write(self, value: T) -> NonNull<T> {
        let ptr = self.ptr;
        // Safety: ptr is fresh storage for exactly one T
        unsafe { self.alloc.construct(ptr, value) };
        mem::forget(self);
        ptr
    }

    /// Builds the value in place from `f`.
    ///
    /// If `f` panics the storage is released before the panic continues.
    #[inline]
    pub fn write_with<F: FnOnce() -> T>(self, f: F) -> NonNull<T> {
        let value = f();
        self.write(value)
    }
}

impl<T, A: Allocator> Drop for Uninit<'_, T, A> {
    fn drop(&mut self) {
        // Safety: storage came from allocate_one and was never initialized
        unsafe { self.alloc.deallocate_one(self.ptr) }
    }
}

impl<T, A: Allocator> fmt::Debug for Uninit<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Uninit").field("ptr", &self.ptr).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Global, Tracking};

    #[test]
    fn dropped_guard_releases_storage() {
        let alloc = Tracking::new(Global);
        {
            let _slot = Uninit::<u64, _>::new_in(&alloc).unwrap();
            assert_eq!(alloc.stats().live_allocations, 1);
        }
        assert!(alloc.stats().is_balanced());
    }

    #[test]
    fn written_storage_is_kept() {
        let alloc = Tracking::new(Global);
        let ptr = Uninit::<u64, _>::new_in(&alloc).unwrap().write(9);

        assert_eq!(alloc.stats().live_allocations, 1);
        unsafe {
            assert_eq!(*ptr.as_ptr(), 9);
            alloc.destroy(ptr);
            alloc.deallocate_one(ptr);
        }
        assert!(alloc.stats().is_balanced());
    }

    #[test]
    fn panicking_constructor_releases_storage() {
        let alloc = Tracking::new(Global);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let slot = Uninit::<String, _>::new_in(&alloc).unwrap();
            slot.write_with(|| panic!("constructor failed"))
        }));

        assert!(result.is_err());
        assert!(alloc.stats().is_balanced());
    }
}
