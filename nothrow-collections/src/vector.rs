//! Growable array over a pluggable allocator.
//!
//! [`Vector`] keeps its elements in one contiguous buffer obtained from an
//! [`Allocator`]. Growth never panics: a buffer that cannot be obtained is
//! reported as [`AllocError`] and the vector is left exactly as it was.
//!
//! # Growth
//!
//! ```text
//! push into a full buffer:
//!
//!   old  [a b c d]                    capacity 4, len 4
//!   new  [_ _ _ _ _ _ _ _ _ _]        allocate max(4 * 2, 10) slots
//!   new  [a b c d _ _ _ _ _ _]        relocate, counting as we go
//!   swap buffers, release the old one, write e at len
//! ```
//!
//! If the new buffer cannot be allocated nothing has been touched yet.
//! Relocation itself is a bitwise move and cannot fail. Copies (`try_clone`,
//! `try_from_slice_in`) run `T::clone` into a staging buffer whose count only
//! advances after each clone completes, so a panicking clone drops exactly
//! the copies that were made.
//!
//! # Example
//!
//! ```
//! use nothrow_collections::Vector;
//!
//! let mut v: Vector<u32> = Vector::new();
//! v.reserve(5).unwrap();
//! for i in 0..6 {
//!     v.push_back(i).unwrap();
//! }
//!
//! // reserve grew to exactly 5; the sixth push doubled (floor 10)
//! assert_eq!(v.capacity(), 10);
//! assert_eq!(v.erase(0), Some(0));
//! assert_eq!(&v[..], &[1, 2, 3, 4, 5]);
//! ```

use std::cmp::{self, Ordering};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop};
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::slice;

use nothrow_alloc::{AllocError, Allocator, Global, Rejected};

use crate::error::BulkError;

/// Capacity of the first buffer a push allocates.
pub const MIN_NON_ZERO_CAP: usize = 10;

/// Drops `count` initialized slots starting at `first`, through `alloc`.
///
/// # Safety
///
/// Every slot in the run must hold a live value that is not used again.
unsafe fn destroy_slots<T, A: Allocator>(alloc: &A, first: NonNull<T>, count: usize) {
    for i in 0..count {
        unsafe { alloc.destroy(first.add(i)) };
    }
}

// =============================================================================
// Staging buffer
// =============================================================================

/// A buffer under construction: `[0, len)` initialized, the rest not.
///
/// Dropping it drops the initialized prefix and releases the region, so a
/// partially filled buffer never leaks.
struct Staging<'a, T, A: Allocator> {
    ptr: NonNull<T>,
    cap: usize,
    len: usize,
    alloc: &'a A,
}

impl<'a, T, A: Allocator> Staging<'a, T, A> {
    fn new(alloc: &'a A, cap: usize) -> Result<Self, AllocError> {
        let ptr = alloc
            .allocate_array::<T>(cap)
            .ok_or_else(|| AllocError::array::<T>(cap))?;
        Ok(Self {
            ptr,
            cap,
            len: 0,
            alloc,
        })
    }

    /// Bitwise-moves `count` values from `src` to the end of the staged prefix.
    ///
    /// # Safety
    ///
    /// `src` must hold `count` initialized values that the caller will
    /// treat as moved-out; `len + count <= cap`.
    unsafe fn relocate_from(&mut self, src: *const T, count: usize) {
        unsafe { ptr::copy_nonoverlapping(src, self.ptr.as_ptr().add(self.len), count) };
        self.len += count;
    }

    fn clone_from_slice(&mut self, src: &[T])
    where
        T: Clone,
    {
        debug_assert!(self.len + src.len() <= self.cap);
        for item in src {
            // Safety: len < cap by the assertion above
            unsafe { self.alloc.construct(self.ptr.add(self.len), item.clone()) };
            self.len += 1;
        }
    }

    /// Hands the buffer over without dropping anything.
    fn into_parts(self) -> (NonNull<T>, usize, usize) {
        let this = ManuallyDrop::new(self);
        (this.ptr, this.cap, this.len)
    }
}

impl<T, A: Allocator> Drop for Staging<'_, T, A> {
    fn drop(&mut self) {
        unsafe {
            destroy_slots(self.alloc, self.ptr, self.len);
            self.alloc.deallocate_array(self.ptr, self.cap);
        }
    }
}

// =============================================================================
// Vector
// =============================================================================

/// A contiguous growable array that reports allocation failure.
///
/// Derefs to `[T]`, so slicing, indexing, sorting and slice iteration all
/// come from the slice API.
pub struct Vector<T, A: Allocator = Global> {
    ptr: NonNull<T>,
    cap: usize,
    len: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

unsafe impl<T: Send, A: Allocator + Send> Send for Vector<T, A> {}
unsafe impl<T: Sync, A: Allocator + Sync> Sync for Vector<T, A> {}

impl<T> Vector<T, Global> {
    /// Creates an empty vector on the process heap. Does not allocate.
    #[inline]
    pub const fn new() -> Self {
        Self::new_in(Global)
    }

    /// Creates an empty vector with room for exactly `capacity` elements.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        Self::try_with_capacity_in(capacity, Global)
    }

    /// Creates a vector of `count` copies of `value`.
    pub fn try_from_elem(count: usize, value: T) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        Self::try_from_elem_in(count, value, Global)
    }

    /// Creates a vector holding copies of `src`.
    pub fn try_from_slice(src: &[T]) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        Self::try_from_slice_in(src, Global)
    }
}

impl<T, A: Allocator + Default> Default for Vector<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, A: Allocator> Vector<T, A> {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Creates an empty vector using `alloc`. Does not allocate.
    #[inline]
    pub const fn new_in(alloc: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            len: 0,
            alloc,
            _marker: PhantomData,
        }
    }

    /// Creates an empty vector with room for exactly `capacity` elements.
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, AllocError> {
        let mut vector = Self::new_in(alloc);
        vector.reserve(capacity)?;
        Ok(vector)
    }

    /// Creates a vector of `count` copies of `value`.
    pub fn try_from_elem_in(count: usize, value: T, alloc: A) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        let mut vector = Self::try_with_capacity_in(count, alloc)?;
        vector.resize(count, value)?;
        Ok(vector)
    }

    /// Creates a vector holding copies of `src`, with capacity `src.len()`.
    pub fn try_from_slice_in(src: &[T], alloc: A) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        let (ptr, cap, len) = {
            let mut staging = Staging::new(&alloc, src.len())?;
            staging.clone_from_slice(src);
            staging.into_parts()
        };
        Ok(Self {
            ptr,
            cap,
            len,
            alloc,
            _marker: PhantomData,
        })
    }

    /// Creates a vector from every item of `iter`.
    ///
    /// On failure the partial vector is dropped and the error returned.
    pub fn try_from_iter_in<I>(iter: I, alloc: A) -> Result<Self, AllocError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut vector = Self::new_in(alloc);
        vector.try_extend(iter)?;
        Ok(vector)
    }

    /// Deep copy using a clone of the allocator. Capacity equals length.
    pub fn try_clone(&self) -> Result<Self, AllocError>
    where
        T: Clone,
        A: Clone,
    {
        Self::try_from_slice_in(self, self.alloc.clone())
    }

    /// Replaces the contents with a copy of `source`.
    ///
    /// The copy is built first and swapped in, so on failure `self` is
    /// unchanged.
    pub fn try_assign_from(&mut self, source: &[T]) -> Result<(), AllocError>
    where
        T: Clone,
        A: Clone,
    {
        let mut copy = Self::try_from_slice_in(source, self.alloc.clone())?;
        self.swap(&mut copy);
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the current buffer holds without growing.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Largest capacity the allocator can describe.
    #[inline]
    pub fn max_size(&self) -> usize {
        self.alloc.max_size::<T>()
    }

    /// The allocator the buffer comes from.
    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// The elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // Safety: [0, len) is initialized; ptr is dangling-but-aligned when empty
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// The elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// First element.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Last element.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    // ========================================================================
    // Capacity management
    // ========================================================================

    /// Moves the elements into a fresh buffer of exactly `new_cap` slots.
    fn reallocate(&mut self, new_cap: usize) -> Result<(), AllocError> {
        debug_assert!(new_cap >= self.len);

        let mut staging = Staging::new(&self.alloc, new_cap)?;
        // Safety: [0, len) is initialized and is not read from the old buffer again
        unsafe { staging.relocate_from(self.ptr.as_ptr(), self.len) };

        // staging takes the old buffer with nothing left to drop in it
        mem::swap(&mut self.ptr, &mut staging.ptr);
        mem::swap(&mut self.cap, &mut staging.cap);
        staging.len = 0;

        tracing::trace!(
            from = staging.cap,
            to = new_cap,
            len = self.len,
            "vector buffer reallocated"
        );
        Ok(())
    }

    /// Makes room for one more element, doubling with a floor of
    /// [`MIN_NON_ZERO_CAP`].
    fn grow_for_push(&mut self) -> Result<(), AllocError> {
        if self.len < self.cap {
            return Ok(());
        }
        let max = self.max_size();
        if self.cap >= max {
            return Err(AllocError::capacity_overflow());
        }
        let new_cap = cmp::max(self.cap.saturating_mul(2), MIN_NON_ZERO_CAP).min(max);
        self.reallocate(new_cap)
    }

    /// Grows the buffer to exactly `capacity` if it is currently smaller.
    ///
    /// Never shrinks. On failure nothing changes.
    pub fn reserve(&mut self, capacity: usize) -> Result<(), AllocError> {
        if capacity <= self.cap {
            return Ok(());
        }
        self.reallocate(capacity)
    }

    /// Replaces the buffer with one of exactly `len` slots.
    ///
    /// On failure the vector keeps its current buffer.
    pub fn shrink_to_fit(&mut self) -> Result<(), AllocError> {
        if self.cap == self.len {
            return Ok(());
        }
        self.reallocate(self.len)
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Appends `value`.
    ///
    /// On allocation failure the vector is unchanged and `value` is returned.
    pub fn push_back(&mut self, value: T) -> Result<(), Rejected<T>> {
        if let Err(error) = self.grow_for_push() {
            return Err(Rejected::new(value, error));
        }
        // Safety: len < cap after growth
        unsafe { self.alloc.construct(self.ptr.add(self.len), value) };
        self.len += 1;
        Ok(())
    }

    /// Appends the value built by `f` and returns a reference to it.
    ///
    /// `f` runs after capacity is secured; if it panics the vector is
    /// unchanged (apart from any growth).
    pub fn emplace_back_with<F: FnOnce() -> T>(&mut self, f: F) -> Result<&mut T, AllocError> {
        self.grow_for_push()?;
        let value = f();
        unsafe {
            let slot = self.ptr.add(self.len);
            self.alloc.construct(slot, value);
            self.len += 1;
            Ok(&mut *slot.as_ptr())
        }
    }

    /// Inserts `value` at `index`, shifting later elements right.
    ///
    /// On allocation failure the vector is unchanged and `value` is returned.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), Rejected<T>> {
        assert!(
            index <= self.len,
            "insertion index {index} out of bounds for length {}",
            self.len
        );
        if let Err(error) = self.grow_for_push() {
            return Err(Rejected::new(value, error));
        }
        // Safety: len < cap after growth, so [index, len] fits after the shift
        unsafe {
            let slot = self.ptr.add(index);
            ptr::copy(slot.as_ptr(), slot.as_ptr().add(1), self.len - index);
            self.alloc.construct(slot, value);
        }
        self.len += 1;
        Ok(())
    }

    /// Appends every item of `iter`, returning how many were appended.
    ///
    /// Best-effort: on failure the items already appended stay; the item
    /// that could not be stored is dropped.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<usize, BulkError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut appended = 0;
        for value in iter {
            if let Err(rejected) = self.push_back(value) {
                tracing::debug!(appended, "vector extend stopped by allocation failure");
                return Err(BulkError::new(appended, rejected.error()));
            }
            appended += 1;
        }
        Ok(appended)
    }

    /// Resizes to `new_len`, filling with copies of `value` or dropping the tail.
    ///
    /// Growing past capacity first grows the buffer to exactly `new_len`;
    /// if that fails nothing changes.
    pub fn resize(&mut self, new_len: usize, value: T) -> Result<(), AllocError>
    where
        T: Clone,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        self.reserve(new_len)?;

        let extra = new_len - self.len;
        for _ in 1..extra {
            unsafe { self.alloc.construct(self.ptr.add(self.len), value.clone()) };
            self.len += 1;
        }
        unsafe { self.alloc.construct(self.ptr.add(self.len), value) };
        self.len += 1;
        Ok(())
    }

    /// Resizes to `new_len`, filling with values built by `f`.
    pub fn resize_with<F: FnMut() -> T>(&mut self, new_len: usize, mut f: F) -> Result<(), AllocError> {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        self.reserve(new_len)?;

        while self.len < new_len {
            let value = f();
            unsafe { self.alloc.construct(self.ptr.add(self.len), value) };
            self.len += 1;
        }
        Ok(())
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Removes and returns the last element.
    ///
    /// The value is moved out, not destroyed, so the allocator's `destroy`
    /// hook does not run for it.
    #[inline]
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // Safety: slot len was initialized and is now outside [0, len)
        Some(unsafe { self.ptr.as_ptr().add(self.len).read() })
    }

    /// Removes the element at `index`, shifting later elements left.
    ///
    /// Returns `None` if `index` is out of range. Capacity is unchanged.
    /// As with [`pop_back`](Self::pop_back), the value is moved out.
    pub fn erase(&mut self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }
        unsafe {
            let slot = self.ptr.as_ptr().add(index);
            let value = slot.read();
            ptr::copy(slot.add(1), slot, self.len - index - 1);
            self.len -= 1;
            Some(value)
        }
    }

    /// Keeps the first `len` elements and drops the rest.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let count = self.len - len;
        // len first, so a panicking drop cannot double-drop
        self.len = len;
        unsafe { destroy_slots(&self.alloc, self.ptr.add(len), count) };
    }

    /// Drops every element; capacity is kept.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Exchanges contents (and allocators) with `other`.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    // ========================================================================
    // Cursors
    // ========================================================================

    /// Read-only cursor at the first element (end position if empty).
    #[inline]
    pub fn cursor_front(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), 0)
    }

    /// Read-only cursor at the last element (end position if empty).
    #[inline]
    pub fn cursor_back(&self) -> Cursor<'_, T> {
        let len = self.len;
        Cursor::new(self.as_slice(), len.checked_sub(1).unwrap_or(len))
    }

    /// Editing cursor at the first element.
    #[inline]
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T, A> {
        CursorMut { vector: self, index: 0 }
    }

    /// Editing cursor at the last element.
    #[inline]
    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, T, A> {
        let len = self.len;
        CursorMut {
            vector: self,
            index: len.checked_sub(1).unwrap_or(len),
        }
    }
}

impl<T, A: Allocator> Drop for Vector<T, A> {
    fn drop(&mut self) {
        unsafe {
            destroy_slots(&self.alloc, self.ptr, self.len);
            self.alloc.deallocate_array(self.ptr, self.cap);
        }
    }
}

// =============================================================================
// Trait impls
// =============================================================================

impl<T, A: Allocator> Deref for Vector<T, A> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> DerefMut for Vector<T, A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for Vector<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<T: PartialEq, A: Allocator, B: Allocator> PartialEq<Vector<T, B>> for Vector<T, A> {
    fn eq(&self, other: &Vector<T, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: Allocator> Eq for Vector<T, A> {}

impl<T: PartialOrd, A: Allocator> PartialOrd for Vector<T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, A: Allocator> Ord for Vector<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash, A: Allocator> Hash for Vector<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a Vector<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut Vector<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T, A: Allocator> IntoIterator for Vector<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        let this = ManuallyDrop::new(self);
        // Safety: this is never dropped, so alloc is moved out exactly once
        let alloc = unsafe { ptr::read(&this.alloc) };
        IntoIter {
            ptr: this.ptr,
            cap: this.cap,
            start: 0,
            end: this.len,
            alloc,
            _marker: PhantomData,
        }
    }
}

// =============================================================================
// IntoIter
// =============================================================================

/// Owning iterator over a vector's elements.
pub struct IntoIter<T, A: Allocator = Global> {
    ptr: NonNull<T>,
    cap: usize,
    start: usize,
    end: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

impl<T, A: Allocator> IntoIter<T, A> {
    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr().add(self.start), self.end - self.start) }
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        let value = unsafe { self.ptr.as_ptr().add(self.start).read() };
        self.start += 1;
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        Some(unsafe { self.ptr.as_ptr().add(self.end).read() })
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        unsafe {
            destroy_slots(&self.alloc, self.ptr.add(self.start), self.end - self.start);
            self.alloc.deallocate_array(self.ptr, self.cap);
        }
    }
}

// =============================================================================
// Cursors
// =============================================================================

/// A read-only random-access position in a vector.
///
/// Positions run from `0` to `len`; `len` is the end position, where
/// [`current`](Self::current) is `None`. Steps past either edge wrap
/// through the end position, as list cursors do through their ghost.
#[derive(Debug)]
pub struct Cursor<'a, T> {
    elems: &'a [T],
    index: usize,
}

impl<'a, T> Cursor<'a, T> {
    fn new(elems: &'a [T], index: usize) -> Self {
        Self { elems, index }
    }

    /// Element at the cursor, or `None` at the end position.
    #[inline]
    pub fn current(&self) -> Option<&'a T> {
        self.elems.get(self.index)
    }

    /// Position, or `None` at the end position.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        (self.index < self.elems.len()).then_some(self.index)
    }

    /// Returns `true` at the end position.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.index >= self.elems.len()
    }

    /// Steps forward; from the end position, to the first element.
    #[inline]
    pub fn move_next(&mut self) {
        self.index = step_next(self.index, self.elems.len());
    }

    /// Steps back; from the first element, to the end position.
    #[inline]
    pub fn move_prev(&mut self) {
        self.index = step_prev(self.index, self.elems.len());
    }

    /// Moves by `offset`. Landing outside `[0, len)` puts the cursor at the
    /// end position.
    #[inline]
    pub fn seek(&mut self, offset: isize) {
        self.index = seek_index(self.index, offset, self.elems.len());
    }

    /// Element after the cursor without moving.
    #[inline]
    pub fn peek_next(&self) -> Option<&'a T> {
        self.elems.get(step_next(self.index, self.elems.len()))
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.elems, other.elems) && self.index == other.index
    }
}

impl<T> Eq for Cursor<'_, T> {}

/// A random-access position in a vector that can remove elements.
#[derive(Debug)]
pub struct CursorMut<'a, T, A: Allocator = Global> {
    vector: &'a mut Vector<T, A>,
    index: usize,
}

impl<'a, T, A: Allocator> CursorMut<'a, T, A> {
    /// Element at the cursor, or `None` at the end position.
    #[inline]
    pub fn current(&self) -> Option<&T> {
        self.vector.get(self.index)
    }

    /// Element at the cursor, mutably.
    #[inline]
    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.vector.get_mut(self.index)
    }

    /// Position, or `None` at the end position.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        (self.index < self.vector.len).then_some(self.index)
    }

    /// Returns `true` at the end position.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.index >= self.vector.len
    }

    /// Steps forward; from the end position, to the first element.
    #[inline]
    pub fn move_next(&mut self) {
        self.index = step_next(self.index, self.vector.len);
    }

    /// Steps back; from the first element, to the end position.
    #[inline]
    pub fn move_prev(&mut self) {
        self.index = step_prev(self.index, self.vector.len);
    }

    /// Moves by `offset`, as [`Cursor::seek`].
    #[inline]
    pub fn seek(&mut self, offset: isize) {
        self.index = seek_index(self.index, offset, self.vector.len);
    }

    /// Removes the element at the cursor. The cursor then sits on the
    /// element that followed it (or the end position).
    pub fn remove_current(&mut self) -> Option<T> {
        self.vector.erase(self.index)
    }

    /// Read-only view at the same position.
    #[inline]
    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor::new(self.vector.as_slice(), self.index)
    }
}

#[inline]
fn step_next(index: usize, len: usize) -> usize {
    if index >= len { 0 } else { index + 1 }
}

#[inline]
fn step_prev(index: usize, len: usize) -> usize {
    match index {
        0 => len,
        i if i > len => len.saturating_sub(1),
        i => i - 1,
    }
}

#[inline]
fn seek_index(index: usize, offset: isize, len: usize) -> usize {
    match index.checked_add_signed(offset) {
        Some(target) if target < len => target,
        _ => len,
    }
}
