//! Node chain: the list engine behind [`List`] and [`ForwardList`].
//!
//! One body of insert/erase/push/pop logic serves both link shapes. The
//! shape-specific rewiring lives in [`Connector`]; everything here is
//! written against that trait.
//!
//! # Failure Model
//!
//! Every node is allocated through the chain's [`Allocator`]. Single-value
//! inserts are all-or-nothing: the node is allocated and constructed before
//! anything is linked, so a failure leaves the chain untouched and hands the
//! value back in [`Rejected`]. Bulk inserts are best-effort: nodes inserted
//! before the failure stay, and [`BulkError`] reports how many.
//!
//! # Example
//!
//! ```
//! use nothrow_collections::List;
//!
//! let mut list: List<u64> = List::new();
//! list.push_back(1).unwrap();
//! list.push_back(2).unwrap();
//! list.push_front(0).unwrap();
//!
//! assert_eq!(list.len(), 3);
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), [0, 1, 2]);
//!
//! // Erase the middle element through a cursor
//! let mut cursor = list.cursor_front_mut();
//! cursor.move_next();
//! assert_eq!(cursor.remove_current(), Some(1));
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), [0, 2]);
//! ```
//!
//! # Handling Failure
//!
//! ```
//! use nothrow_alloc::{Global, Limited};
//! use nothrow_collections::ForwardList;
//!
//! let alloc = Limited::new(Global, 2);
//! let mut list = ForwardList::new_in(&alloc);
//!
//! list.push_back("a".to_string()).unwrap();
//! list.push_back("b".to_string()).unwrap();
//!
//! // Out of budget: the value comes back, the list is unchanged
//! let rejected = list.push_back("c".to_string()).unwrap_err();
//! assert_eq!(rejected.into_inner(), "c");
//! assert_eq!(list.len(), 2);
//! ```

use std::alloc::Layout;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Index, IndexMut};
use std::ptr::NonNull;

use nothrow_alloc::{AllocError, Allocator, Global, Rejected, Uninit};

use crate::connector::{Bidirectional, Category, Connector, Forward, Link, Node};
use crate::cursor::{Cursor, CursorMut};
use crate::error::BulkError;
use crate::iter::{IntoIter, Iter, IterMut};

/// A doubly-linked list.
pub type List<T, A = Global> = Chain<T, Bidirectional, A>;

/// A singly-linked list.
///
/// `pop_back` and removal at a cursor pay an O(n) scan for the predecessor.
pub type ForwardList<T, A = Global> = Chain<T, Forward, A>;

/// A chain of heap nodes with link shape `L`, allocating through `A`.
///
/// Use the [`List`] and [`ForwardList`] aliases rather than naming this
/// type directly.
///
/// # Invariants
///
/// - `len == 0` iff `head` is null iff `tail` is null
/// - walking `next` from `head` visits exactly `len` nodes and ends at `tail`
/// - for [`Bidirectional`], walking back from `tail` is the exact reverse
pub struct Chain<T, L: Connector, A: Allocator = Global> {
    pub(crate) head: Link<T, L>,
    pub(crate) tail: Link<T, L>,
    pub(crate) len: usize,
    alloc: A,
    _marker: PhantomData<Box<Node<T, L>>>,
}

unsafe impl<T: Send, L: Connector, A: Allocator + Send> Send for Chain<T, L, A> {}
unsafe impl<T: Sync, L: Connector, A: Allocator + Sync> Sync for Chain<T, L, A> {}

impl<T, L: Connector> Chain<T, L, Global> {
    /// Creates an empty chain on the process heap. Does not allocate.
    #[inline]
    pub const fn new() -> Self {
        Self::new_in(Global)
    }
}

impl<T, L: Connector, A: Allocator + Default> Default for Chain<T, L, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

// =============================================================================
// Node lifecycle and linking (shared by every operation)
// =============================================================================

impl<T, L: Connector, A: Allocator> Chain<T, L, A> {
    #[inline]
    fn node_error() -> AllocError {
        AllocError::new(Layout::new::<Node<T, L>>())
    }

    /// Allocates and constructs an unlinked node.
    pub(crate) fn create_node(&self, value: T) -> Result<NonNull<Node<T, L>>, Rejected<T>> {
        match Uninit::new_in(&self.alloc) {
            Some(slot) => Ok(slot.write(Node::new(value))),
            None => Err(Rejected::new(value, Self::node_error())),
        }
    }

    /// Allocates a node and builds its value from `f`.
    ///
    /// `f` is not called if allocation fails; if `f` panics the storage is
    /// released.
    fn create_node_with<F: FnOnce() -> T>(&self, f: F) -> Result<NonNull<Node<T, L>>, AllocError> {
        let slot = Uninit::new_in(&self.alloc).ok_or_else(Self::node_error)?;
        Ok(slot.write_with(|| Node::new(f())))
    }

    /// Moves the value out of an unlinked node and frees it.
    ///
    /// The value leaves alive, so the allocator's `destroy` is not called;
    /// the caller owns it from here.
    ///
    /// # Safety
    ///
    /// `node` must be live, unlinked, and allocated by `self.alloc`.
    pub(crate) unsafe fn destroy_node(&self, node: NonNull<Node<T, L>>) -> T {
        let node_value = unsafe { node.as_ptr().read() };
        unsafe { self.alloc.deallocate_one(node) };
        node_value.value
    }

    /// Drops an unlinked node in place through the allocator and frees it.
    ///
    /// # Safety
    ///
    /// Same as [`destroy_node`](Self::destroy_node).
    unsafe fn free_node(&self, node: NonNull<Node<T, L>>) {
        unsafe {
            self.alloc.destroy(node);
            self.alloc.deallocate_one(node);
        }
    }

    /// Links `node` after `pos`; a null `pos` links it at the front.
    ///
    /// # Safety
    ///
    /// `pos` must be null or a node of this chain; `node` must be unlinked.
    pub(crate) unsafe fn link_after(&mut self, pos: Link<T, L>, node: NonNull<Node<T, L>>) {
        match pos {
            Some(pos) => unsafe {
                let next = (*pos.as_ptr()).next;
                L::connect(Some(pos), Some(node));
                L::connect(Some(node), next);
                if next.is_none() {
                    self.tail = Some(node);
                }
            },
            None => unsafe {
                L::connect(Some(node), self.head);
                self.head = Some(node);
                if self.tail.is_none() {
                    self.tail = Some(node);
                }
            },
        }
        self.len += 1;
    }

    /// Unlinks `node` without freeing it.
    ///
    /// # Safety
    ///
    /// `node` must be a node of this chain.
    pub(crate) unsafe fn unlink(&mut self, node: NonNull<Node<T, L>>) {
        unsafe {
            let next = (*node.as_ptr()).next;
            let prev = L::get_prev(self.head, node);
            // Ends first: the forward shape scans for node to find the new tail
            L::disconnect_ends(&mut self.head, &mut self.tail, node);
            L::disconnect(prev, node, next);
        }
        self.len -= 1;
    }

    /// Removes up to `count` nodes starting at `first`.
    ///
    /// The whole run is spliced out in one step, then freed node by node.
    /// Returns how many nodes were removed and the node that followed the run.
    ///
    /// # Safety
    ///
    /// `first` must be a node of this chain.
    pub(crate) unsafe fn erase_run(
        &mut self,
        first: NonNull<Node<T, L>>,
        count: usize,
    ) -> (usize, Link<T, L>) {
        if count == 0 {
            return (0, Some(first));
        }

        unsafe {
            let prev = L::get_prev(self.head, first);
            let mut last = first;
            let mut removed = 1;
            while removed < count {
                match (*last.as_ptr()).next {
                    Some(next) => {
                        last = next;
                        removed += 1;
                    }
                    None => break,
                }
            }
            let after = (*last.as_ptr()).next;

            if prev.is_none() {
                self.head = after;
            }
            if after.is_none() {
                self.tail = prev;
            }
            L::connect(prev, after);
            (*last.as_ptr()).next = None;
            self.len -= removed;

            let mut curr = Some(first);
            while let Some(node) = curr {
                curr = (*node.as_ptr()).next;
                self.free_node(node);
            }

            (removed, after)
        }
    }

    /// Inserts every item in order, the first after `pos` (or at the front
    /// when `pos` is null), each next one after the previous.
    ///
    /// Stops at the first allocation failure; the item that failed is
    /// dropped and earlier ones stay linked.
    pub(crate) fn insert_seq_after<I>(&mut self, pos: Link<T, L>, items: I) -> Result<usize, BulkError>
    where
        I: Iterator<Item = T>,
    {
        let mut at = pos;
        let mut inserted = 0;
        for value in items {
            match self.create_node(value) {
                Ok(node) => {
                    // Safety: at is pos or a node linked by this loop
                    unsafe { self.link_after(at, node) };
                    at = Some(node);
                    inserted += 1;
                }
                Err(rejected) => {
                    tracing::debug!(inserted, "bulk insert stopped by allocation failure");
                    return Err(BulkError::new(inserted, rejected.error()));
                }
            }
        }
        Ok(inserted)
    }

    fn node_at(&self, index: usize) -> Link<T, L> {
        if index >= self.len {
            return None;
        }
        let mut curr = self.head;
        for _ in 0..index {
            // Safety: index < len, so every step lands on a live node
            curr = curr.and_then(|node| unsafe { (*node.as_ptr()).next });
        }
        curr
    }
}

// =============================================================================
// Public operations
// =============================================================================

impl<T, L: Connector, A: Allocator> Chain<T, L, A> {
    /// Creates an empty chain using `alloc`. Does not allocate.
    #[inline]
    pub const fn new_in(alloc: A) -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
            alloc,
            _marker: PhantomData,
        }
    }

    /// Builds a chain from every item of `iter`.
    ///
    /// On failure the partial chain is dropped and the error returned.
    pub fn try_from_iter_in<I>(iter: I, alloc: A) -> Result<Self, AllocError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut chain = Self::new_in(alloc);
        chain.try_extend(iter)?;
        Ok(chain)
    }

    /// Builds a chain of `count` copies of `value`.
    pub fn try_from_elem_in(count: usize, value: T, alloc: A) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        let mut chain = Self::new_in(alloc);
        chain.insert_seq_after(None, iter::repeat_n(value, count))?;
        Ok(chain)
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the chain holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Largest number of nodes the allocator can describe.
    #[inline]
    pub fn max_size(&self) -> usize {
        self.alloc.max_size::<Node<T, L>>()
    }

    /// Traversal category of this chain's link shape.
    #[inline]
    pub const fn category(&self) -> Category {
        L::CATEGORY
    }

    /// The allocator nodes come from.
    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    // ========================================================================
    // Insert at the ends
    // ========================================================================

    /// Appends `value`.
    ///
    /// On allocation failure the chain is unchanged and `value` is returned.
    #[inline]
    pub fn push_back(&mut self, value: T) -> Result<(), Rejected<T>> {
        let node = self.create_node(value)?;
        let tail = self.tail;
        // Safety: tail is null or our node; node is fresh
        unsafe { self.link_after(tail, node) };
        Ok(())
    }

    /// Prepends `value`.
    ///
    /// On allocation failure the chain is unchanged and `value` is returned.
    #[inline]
    pub fn push_front(&mut self, value: T) -> Result<(), Rejected<T>> {
        let node = self.create_node(value)?;
        // Safety: node is fresh
        unsafe { self.link_after(None, node) };
        Ok(())
    }

    /// Appends the value built by `f` and returns a reference to it.
    ///
    /// `f` runs only after the node's storage has been obtained.
    pub fn emplace_back_with<F: FnOnce() -> T>(&mut self, f: F) -> Result<&mut T, AllocError> {
        let node = self.create_node_with(f)?;
        let tail = self.tail;
        unsafe {
            self.link_after(tail, node);
            Ok(&mut (*node.as_ptr()).value)
        }
    }

    /// Prepends the value built by `f` and returns a reference to it.
    pub fn emplace_front_with<F: FnOnce() -> T>(&mut self, f: F) -> Result<&mut T, AllocError> {
        let node = self.create_node_with(f)?;
        unsafe {
            self.link_after(None, node);
            Ok(&mut (*node.as_ptr()).value)
        }
    }

    // ========================================================================
    // Remove at the ends
    // ========================================================================

    /// Removes and returns the first element.
    #[inline]
    pub fn pop_front(&mut self) -> Option<T> {
        let node = self.head?;
        // Safety: head is a node of this chain
        unsafe {
            self.unlink(node);
            Some(self.destroy_node(node))
        }
    }

    /// Removes and returns the last element.
    ///
    /// O(1) for [`List`], O(n) for [`ForwardList`].
    #[inline]
    pub fn pop_back(&mut self) -> Option<T> {
        let node = self.tail?;
        // Safety: tail is a node of this chain
        unsafe {
            self.unlink(node);
            Some(self.destroy_node(node))
        }
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// First element.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        // Safety: head is live while borrowed
        self.head.map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// First element, mutably.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.head.map(|node| unsafe { &mut (*node.as_ptr()).value })
    }

    /// Last element.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.tail.map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Last element, mutably.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.tail.map(|node| unsafe { &mut (*node.as_ptr()).value })
    }

    /// Element at `index`, walking from the front. O(n).
    pub fn get(&self, index: usize) -> Option<&T> {
        self.node_at(index)
            .map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Element at `index`, mutably. O(n).
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.node_at(index)
            .map(|node| unsafe { &mut (*node.as_ptr()).value })
    }

    /// Returns `true` if some element equals `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|item| item == value)
    }

    // ========================================================================
    // Bulk operations
    // ========================================================================

    /// Removes every element.
    pub fn clear(&mut self) {
        let mut curr = self.head.take();
        self.tail = None;
        self.len = 0;
        while let Some(node) = curr {
            // Safety: the run is detached from self and each node is visited once
            unsafe {
                curr = (*node.as_ptr()).next;
                self.free_node(node);
            }
        }
    }

    /// Keeps the first `len` elements and drops the rest.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        if len == 0 {
            self.clear();
            return;
        }
        if let Some(first) = self.node_at(len) {
            let count = self.len - len;
            // Safety: first is a node of this chain
            unsafe { self.erase_run(first, count) };
        }
    }

    /// Resizes to `new_len`, appending copies of `value` or dropping the tail.
    ///
    /// Growth is best-effort: on failure the copies already appended stay.
    pub fn resize(&mut self, new_len: usize, value: T) -> Result<(), BulkError>
    where
        T: Clone,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        let count = new_len - self.len;
        let tail = self.tail;
        self.insert_seq_after(tail, iter::repeat_n(value, count))
            .map(|_| ())
    }

    /// Resizes to `new_len`, appending values built by `f`.
    ///
    /// Growth is best-effort, as in [`resize`](Self::resize).
    pub fn resize_with<F: FnMut() -> T>(&mut self, new_len: usize, f: F) -> Result<(), BulkError> {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        let count = new_len - self.len;
        let tail = self.tail;
        self.insert_seq_after(tail, iter::repeat_with(f).take(count))
            .map(|_| ())
    }

    /// Appends every item of `iter`, returning how many were appended.
    ///
    /// Best-effort: on failure the items already appended stay.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<usize, BulkError>
    where
        I: IntoIterator<Item = T>,
    {
        let tail = self.tail;
        self.insert_seq_after(tail, iter.into_iter())
    }

    /// Exchanges contents (and allocators) with `other`.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Deep copy, node by node, using a clone of the allocator.
    ///
    /// A partial copy is dropped on failure.
    pub fn try_clone(&self) -> Result<Self, AllocError>
    where
        T: Clone,
        A: Clone,
    {
        let mut copy = Self::new_in(self.alloc.clone());
        copy.try_extend(self.iter().cloned())?;
        Ok(copy)
    }

    /// Replaces the contents with a copy of `source`.
    ///
    /// The copy is built separately and swapped in, so on failure `self` is
    /// left exactly as it was.
    pub fn try_assign_from(&mut self, source: &Self) -> Result<(), AllocError>
    where
        T: Clone,
        A: Clone,
    {
        let mut copy = Self::new_in(self.alloc.clone());
        copy.try_extend(source.iter().cloned())?;
        self.swap(&mut copy);
        Ok(())
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Iterator over references, front to back.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, L> {
        Iter::new(self.head, self.tail, self.len)
    }

    /// Iterator over mutable references, front to back.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T, L> {
        IterMut::new(self.head, self.tail, self.len)
    }

    /// Read-only cursor at the first element (ghost if empty).
    #[inline]
    pub fn cursor_front(&self) -> Cursor<'_, T, L, A> {
        Cursor::new(self, self.head, 0)
    }

    /// Editing cursor at the first element (ghost if empty).
    #[inline]
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T, L, A> {
        let head = self.head;
        CursorMut::new(self, head, 0)
    }
}

impl<T, A: Allocator> Chain<T, Bidirectional, A> {
    /// Read-only cursor at the last element (ghost if empty).
    #[inline]
    pub fn cursor_back(&self) -> Cursor<'_, T, Bidirectional, A> {
        Cursor::new(self, self.tail, self.len.saturating_sub(1))
    }

    /// Editing cursor at the last element (ghost if empty).
    #[inline]
    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, T, Bidirectional, A> {
        let (tail, index) = (self.tail, self.len.saturating_sub(1));
        CursorMut::new(self, tail, index)
    }
}

impl<T, L: Connector, A: Allocator> Drop for Chain<T, L, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

// =============================================================================
// Trait impls
// =============================================================================

impl<T, L: Connector, A: Allocator> Index<usize> for Chain<T, L, A> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!("index {index} out of bounds for length {}", self.len),
        }
    }
}

impl<T, L: Connector, A: Allocator> IndexMut<usize> for Chain<T, L, A> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("index {index} out of bounds for length {len}"),
        }
    }
}

impl<T: fmt::Debug, L: Connector, A: Allocator> fmt::Debug for Chain<T, L, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, L: Connector, A: Allocator> PartialEq for Chain<T, L, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, L: Connector, A: Allocator> Eq for Chain<T, L, A> {}

impl<T: PartialOrd, L: Connector, A: Allocator> PartialOrd for Chain<T, L, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, L: Connector, A: Allocator> Ord for Chain<T, L, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash, L: Connector, A: Allocator> Hash for Chain<T, L, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len);
        for item in self {
            item.hash(state);
        }
    }
}

impl<'a, T, L: Connector, A: Allocator> IntoIterator for &'a Chain<T, L, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, L>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, L: Connector, A: Allocator> IntoIterator for &'a mut Chain<T, L, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T, L>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, L: Connector, A: Allocator> IntoIterator for Chain<T, L, A> {
    type Item = T;
    type IntoIter = IntoIter<T, L, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use nothrow_alloc::{Arena, Limited, Tracking};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Walks the chain checking head/tail/len agree.
    pub(crate) fn check_links<T, L: Connector, A: Allocator>(chain: &Chain<T, L, A>) {
        assert_eq!(chain.len == 0, chain.head.is_none());
        assert_eq!(chain.len == 0, chain.tail.is_none());

        let mut count = 0;
        let mut last = None;
        let mut curr = chain.head;
        while let Some(node) = curr {
            count += 1;
            last = Some(node);
            curr = unsafe { (*node.as_ptr()).next };
        }
        assert_eq!(count, chain.len);
        assert_eq!(last, chain.tail);
    }

    /// Also checks the back links are the exact reverse.
    pub(crate) fn check_back_links<T, A: Allocator>(chain: &Chain<T, Bidirectional, A>) {
        check_links(chain);

        let mut count = 0;
        let mut first = None;
        let mut curr = chain.tail;
        while let Some(node) = curr {
            count += 1;
            first = Some(node);
            curr = unsafe { (*node.as_ptr()).back };
        }
        assert_eq!(count, chain.len);
        assert_eq!(first, chain.head);
    }

    /// Heap allocator that counts the construct/destroy hooks.
    #[derive(Default)]
    pub(crate) struct Hooked {
        pub(crate) constructs: Cell<usize>,
        pub(crate) destroys: Cell<usize>,
    }

    impl Allocator for Hooked {
        fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
            Global.allocate(layout)
        }

        unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
            unsafe { Global.deallocate(ptr, layout) }
        }

        unsafe fn construct<U>(&self, slot: NonNull<U>, value: U) {
            self.constructs.set(self.constructs.get() + 1);
            unsafe { slot.as_ptr().write(value) }
        }

        unsafe fn destroy<U>(&self, slot: NonNull<U>) {
            self.destroys.set(self.destroys.get() + 1);
            unsafe { std::ptr::drop_in_place(slot.as_ptr()) }
        }
    }

    fn values<T: Clone, L: Connector, A: Allocator>(chain: &Chain<T, L, A>) -> Vec<T> {
        chain.iter().cloned().collect()
    }

    #[derive(Clone, Debug)]
    struct DropCounter(Rc<Cell<usize>>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn new_chain_is_empty() {
        let list: List<u64> = List::new();
        assert!(list.is_empty());
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert_eq!(list.category(), Category::Bidirectional);
        check_back_links(&list);

        let forward: ForwardList<u64> = ForwardList::new();
        assert_eq!(forward.len(), 0);
        assert_eq!(forward.category(), Category::Forward);
        check_links(&forward);
    }

    #[test]
    fn push_back_and_front_order() {
        let mut list: List<u64> = List::new();
        list.push_back(2).unwrap();
        list.push_front(1).unwrap();
        list.push_back(3).unwrap();
        list.push_front(0).unwrap();

        assert_eq!(values(&list), vec![0, 1, 2, 3]);
        assert_eq!(list.front(), Some(&0));
        assert_eq!(list.back(), Some(&3));
        check_back_links(&list);

        let mut forward: ForwardList<u64> = ForwardList::new();
        forward.push_back(2).unwrap();
        forward.push_front(1).unwrap();
        forward.push_back(3).unwrap();
        assert_eq!(values(&forward), vec![1, 2, 3]);
        check_links(&forward);
    }

    #[test]
    fn pop_from_both_ends() {
        let mut list = List::try_from_iter_in(0..5u64, Global).unwrap();
        assert_eq!(list.pop_front(), Some(0));
        assert_eq!(list.pop_back(), Some(4));
        assert_eq!(values(&list), vec![1, 2, 3]);
        check_back_links(&list);

        let mut forward = ForwardList::try_from_iter_in(0..5u64, Global).unwrap();
        assert_eq!(forward.pop_back(), Some(4));
        assert_eq!(forward.pop_back(), Some(3));
        assert_eq!(forward.pop_front(), Some(0));
        assert_eq!(values(&forward), vec![1, 2]);
        check_links(&forward);

        assert_eq!(forward.pop_back(), Some(2));
        assert_eq!(forward.pop_back(), Some(1));
        assert_eq!(forward.pop_back(), None);
        assert_eq!(forward.pop_front(), None);
        check_links(&forward);
    }

    #[test]
    fn erase_middle_of_three() {
        let mut list: List<u64> = List::new();
        for i in 0..3 {
            list.push_back(i).unwrap();
        }
        let mut cursor = list.cursor_front_mut();
        cursor.move_next();
        assert_eq!(cursor.remove_current(), Some(1));
        assert_eq!(values(&list), vec![0, 2]);
        assert_eq!(list.len(), 2);
        check_back_links(&list);

        let mut forward: ForwardList<u64> = ForwardList::new();
        for i in 0..3 {
            forward.push_back(i).unwrap();
        }
        let mut cursor = forward.cursor_front_mut();
        cursor.move_next();
        assert_eq!(cursor.remove_current(), Some(1));
        assert_eq!(values(&forward), vec![0, 2]);
        check_links(&forward);
    }

    #[test]
    fn emplace_returns_new_element() {
        let mut list: List<String> = List::new();
        let back = list.emplace_back_with(|| "b".to_string()).unwrap();
        back.push('!');
        let front = list.emplace_front_with(|| "a".to_string()).unwrap();
        front.push('?');

        assert_eq!(values(&list), vec!["a?".to_string(), "b!".to_string()]);
        check_back_links(&list);
    }

    #[test]
    fn push_failure_returns_value_and_leaves_chain_untouched() {
        let alloc = Limited::new(Global, 2);
        let mut list = List::new_in(&alloc);
        list.push_back(1u64).unwrap();
        list.push_back(2).unwrap();

        let rejected = list.push_back(3).unwrap_err();
        assert_eq!(rejected.into_inner(), 3);
        let rejected = list.push_front(0).unwrap_err();
        assert_eq!(rejected.value, 0);

        assert_eq!(values(&list), vec![1, 2]);
        check_back_links(&list);
    }

    #[test]
    fn emplace_failure_skips_constructor() {
        let alloc = Limited::new(Global, 0);
        let mut list: ForwardList<u64, _> = ForwardList::new_in(&alloc);
        let called = Cell::new(false);

        let result = list.emplace_back_with(|| {
            called.set(true);
            7
        });
        assert!(result.is_err());
        assert!(!called.get());
        assert!(list.is_empty());
    }

    #[test]
    fn emplace_panic_releases_node() {
        let alloc = Tracking::new(Global);
        let mut list: List<String, _> = List::new_in(&alloc);
        list.push_back("kept".to_string()).unwrap();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = list.emplace_back_with(|| panic!("constructor failed"));
        }));
        assert!(result.is_err());
        assert_eq!(alloc.stats().live_allocations, 1);
        assert_eq!(values(&list), vec!["kept".to_string()]);

        drop(list);
        assert!(alloc.stats().is_balanced());
    }

    #[test]
    fn indexed_access_walks_from_front() {
        let mut forward = ForwardList::try_from_iter_in([10u64, 20, 30], Global).unwrap();
        assert_eq!(forward.get(0), Some(&10));
        assert_eq!(forward.get(2), Some(&30));
        assert_eq!(forward.get(3), None);
        assert_eq!(forward[1], 20);

        *forward.get_mut(1).unwrap() += 1;
        forward[2] += 2;
        assert_eq!(values(&forward), vec![10, 21, 32]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn index_past_end_panics() {
        let list = List::try_from_iter_in([1u64], Global).unwrap();
        let _value = list[1];
    }

    #[test]
    fn clear_and_drop_release_everything() {
        let alloc = Tracking::new(Global);
        let drops = Rc::new(Cell::new(0));

        let mut list = List::new_in(&alloc);
        for _ in 0..10 {
            list.push_back(DropCounter(Rc::clone(&drops))).unwrap();
        }
        assert_eq!(alloc.stats().live_allocations, 10);

        list.clear();
        assert_eq!(drops.get(), 10);
        assert!(alloc.stats().is_balanced());
        check_back_links(&list);

        for _ in 0..5 {
            list.push_back(DropCounter(Rc::clone(&drops))).unwrap();
        }
        drop(list);
        assert_eq!(drops.get(), 15);
        assert!(alloc.stats().is_balanced());
    }

    #[test]
    fn truncate_keeps_prefix() {
        let alloc = Tracking::new(Global);
        let mut forward = ForwardList::try_from_iter_in(0..10u64, &alloc).unwrap();

        forward.truncate(20);
        assert_eq!(forward.len(), 10);

        forward.truncate(4);
        assert_eq!(values(&forward), vec![0, 1, 2, 3]);
        assert_eq!(forward.back(), Some(&3));
        assert_eq!(alloc.stats().live_allocations, 4);
        check_links(&forward);

        forward.truncate(0);
        assert!(forward.is_empty());
        assert!(alloc.stats().is_balanced());
    }

    #[test]
    fn resize_grows_and_shrinks() {
        let mut list: List<u64> = List::new();
        list.resize(3, 7).unwrap();
        assert_eq!(values(&list), vec![7, 7, 7]);

        let mut next = 0;
        list.resize_with(5, || {
            next += 1;
            next
        })
        .unwrap();
        assert_eq!(values(&list), vec![7, 7, 7, 1, 2]);

        list.resize(2, 0).unwrap();
        assert_eq!(values(&list), vec![7, 7]);
        check_back_links(&list);
    }

    #[test]
    fn resize_is_best_effort() {
        let alloc = Limited::new(Global, 3);
        let mut list = List::new_in(&alloc);

        let err = list.resize(5, 1u64).unwrap_err();
        assert_eq!(err.inserted(), 3);
        assert_eq!(list.len(), 3);
        check_back_links(&list);
    }

    #[test]
    fn try_extend_reports_count() {
        let mut forward: ForwardList<u64> = ForwardList::new();
        forward.push_back(0).unwrap();
        assert_eq!(forward.try_extend(1..4), Ok(3));
        assert_eq!(values(&forward), vec![0, 1, 2, 3]);
        check_links(&forward);
    }

    #[test]
    fn try_from_elem_repeats_value() {
        let list = List::try_from_elem_in(4, "x".to_string(), Global).unwrap();
        assert_eq!(list.len(), 4);
        assert!(list.iter().all(|s| s == "x"));

        let empty = ForwardList::try_from_elem_in(0, 1u8, Global).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn try_clone_is_independent() {
        let mut original = List::try_from_iter_in([1u64, 2, 3], Global).unwrap();
        let mut copy = original.try_clone().unwrap();

        copy.push_back(4).unwrap();
        *original.front_mut().unwrap() = 100;

        assert_eq!(values(&original), vec![100, 2, 3]);
        assert_eq!(values(&copy), vec![1, 2, 3, 4]);
        check_back_links(&copy);
    }

    #[test]
    fn try_clone_failure_frees_partial_copy() {
        let alloc = Tracking::new(Limited::new(Global, 5));
        let original = ForwardList::try_from_iter_in([1u64, 2, 3], &alloc).unwrap();

        let err = original.try_clone().unwrap_err();
        assert!(!err.is_capacity_overflow());
        assert_eq!(alloc.stats().live_allocations, 3);
        assert_eq!(values(&original), vec![1, 2, 3]);
    }

    #[test]
    fn try_assign_from_is_all_or_nothing() {
        let alloc = Limited::new(Global, 5);
        let source = List::try_from_iter_in([1u64, 2, 3], &alloc).unwrap();
        let mut target = List::try_from_iter_in([9u64, 9], &alloc).unwrap();

        assert!(target.try_assign_from(&source).is_err());
        assert_eq!(values(&target), vec![9, 9]);

        alloc.set_budget(3);
        target.try_assign_from(&source).unwrap();
        assert_eq!(values(&target), vec![1, 2, 3]);
        assert_eq!(source, target);
        check_back_links(&target);
    }

    #[test]
    fn swap_exchanges_contents() {
        let mut a = ForwardList::try_from_iter_in([1u64, 2], Global).unwrap();
        let mut b = ForwardList::try_from_iter_in([3u64], Global).unwrap();
        a.swap(&mut b);
        assert_eq!(values(&a), vec![3]);
        assert_eq!(values(&b), vec![1, 2]);
    }

    #[test]
    fn comparison_is_lexicographic() {
        let a = List::try_from_iter_in([1u64, 2, 3], Global).unwrap();
        let b = List::try_from_iter_in([1u64, 2, 4], Global).unwrap();
        let c = List::try_from_iter_in([1u64, 2], Global).unwrap();

        assert!(a < b);
        assert!(c < a);
        assert_ne!(a, c);
        assert_eq!(a, a.try_clone().unwrap());
        assert_eq!(a.cmp(&b), Ordering::Less);
    }

    #[test]
    fn equal_chains_hash_equal() {
        use std::collections::hash_map::DefaultHasher;

        fn hash_of<H: Hash>(value: &H) -> u64 {
            let mut hasher = DefaultHasher::new();
            value.hash(&mut hasher);
            hasher.finish()
        }

        let a = ForwardList::try_from_iter_in([1u64, 2, 3], Global).unwrap();
        let b = a.try_clone().unwrap();
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn debug_lists_elements() {
        let list = List::try_from_iter_in([1u64, 2, 3], Global).unwrap();
        assert_eq!(format!("{list:?}"), "[1, 2, 3]");
    }

    #[test]
    fn contains_finds_elements() {
        let forward = ForwardList::try_from_iter_in(["a", "b"], Global).unwrap();
        assert!(forward.contains(&"b"));
        assert!(!forward.contains(&"c"));
    }

    #[test]
    fn max_size_is_node_sized() {
        let list: List<u64> = List::new();
        assert_eq!(list.max_size(), usize::MAX / mem::size_of::<Node<u64, Bidirectional>>());

        let forward: ForwardList<u64> = ForwardList::new();
        assert!(forward.max_size() > list.max_size());
    }

    #[test]
    fn arena_backed_list() {
        let arena = Arena::with_capacity(4096).unwrap();
        {
            let mut list = List::new_in(&arena);
            for i in 0..10u64 {
                list.push_back(i).unwrap();
            }
            assert_eq!(arena.live_allocations(), 10);
            assert_eq!(list.iter().sum::<u64>(), 45);
        }
        assert_eq!(arena.live_allocations(), 0);
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn node_values_go_through_allocator_hooks() {
        let alloc = Hooked::default();
        {
            let mut list = List::new_in(&alloc);
            list.push_back(1u64).unwrap();
            list.push_back(2).unwrap();
            list.emplace_front_with(|| 0).unwrap();
            assert_eq!(alloc.constructs.get(), 3);

            // moved out, not destroyed
            assert_eq!(list.pop_front(), Some(0));
            assert_eq!(alloc.destroys.get(), 0);
        }
        assert_eq!(alloc.destroys.get(), 2);

        let mut by_value = ForwardList::try_from_iter_in(0..4u64, Hooked::default()).unwrap();
        assert_eq!(by_value.allocator().constructs.get(), 4);
        by_value.truncate(1);
        assert_eq!(by_value.allocator().destroys.get(), 3);
        by_value.clear();
        assert_eq!(by_value.allocator().destroys.get(), 4);
    }

    #[test]
    fn take_moves_contents_and_leaves_reusable_chain() {
        let mut list = List::try_from_iter_in([1u64, 2, 3], Global).unwrap();
        let moved = mem::take(&mut list);

        assert_eq!(values(&moved), vec![1, 2, 3]);
        check_back_links(&moved);
        assert!(list.is_empty());
        check_back_links(&list);

        list.push_back(4).unwrap();
        list.push_front(0).unwrap();
        assert_eq!(values(&list), vec![0, 4]);
        check_back_links(&list);

        let mut forward = ForwardList::try_from_iter_in([5u64, 6], Global).unwrap();
        let moved = mem::take(&mut forward);
        assert_eq!(values(&moved), vec![5, 6]);
        assert_eq!(forward.len(), 0);
        check_links(&forward);

        forward.push_back(7).unwrap();
        assert_eq!(forward.pop_back(), Some(7));
        check_links(&forward);
    }
}
