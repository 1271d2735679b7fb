//! Cursors over node chains.
//!
//! A cursor sits on an element or on the "ghost" position, a non-element
//! between the back and the front. Moving forward from the back lands on
//! the ghost; moving forward from the ghost lands on the front.
//!
//! ```text
//!          ┌──────────────────────────────────┐
//!          ▼                                  │
//!  ghost ──► front ──► ... ──► back ──────────┘
//! ```
//!
//! [`CursorMut`] edits the chain at its position. Removal invalidates only
//! the removed element; the borrow checker rules out any other cursor or
//! reference observing the edit.
//!
//! # Example
//!
//! ```
//! use nothrow_collections::ForwardList;
//!
//! let mut list: ForwardList<u32> = ForwardList::new();
//! list.try_extend([1, 2, 3, 4, 5]).unwrap();
//!
//! // Drop every even value in a single pass
//! let mut cursor = list.cursor_front_mut();
//! while let Some(&value) = cursor.current() {
//!     if value % 2 == 0 {
//!         cursor.remove_current();
//!     } else {
//!         cursor.move_next();
//!     }
//! }
//!
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 3, 5]);
//! ```

use std::fmt;
use std::iter;
use std::ptr;

use nothrow_alloc::{Allocator, Global, Rejected};

use crate::chain::Chain;
use crate::connector::{Bidirectional, Connector, Link};
use crate::error::BulkError;

// =============================================================================
// Cursor
// =============================================================================

/// A read-only position in a chain.
///
/// Two cursors are equal when they sit on the same position of the same chain.
pub struct Cursor<'a, T, L: Connector, A: Allocator = Global> {
    chain: &'a Chain<T, L, A>,
    current: Link<T, L>,
    index: usize,
}

impl<'a, T, L: Connector, A: Allocator> Cursor<'a, T, L, A> {
    pub(crate) fn new(chain: &'a Chain<T, L, A>, current: Link<T, L>, index: usize) -> Self {
        Self {
            chain,
            current,
            index,
        }
    }

    /// Element at the cursor, or `None` on the ghost.
    #[inline]
    pub fn current(&self) -> Option<&'a T> {
        // Safety: current is a live node of the borrowed chain
        self.current
            .map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Zero-based position, or `None` on the ghost.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.current.map(|_| self.index)
    }

    /// Returns `true` on the ghost position.
    #[inline]
    pub fn is_ghost(&self) -> bool {
        self.current.is_none()
    }

    /// Steps toward the back. From the back this reaches the ghost; from the
    /// ghost it reaches the front.
    #[inline]
    pub fn move_next(&mut self) {
        match self.current {
            Some(node) => {
                self.current = unsafe { (*node.as_ptr()).next };
                self.index += 1;
            }
            None => {
                self.current = self.chain.head;
                self.index = 0;
            }
        }
    }

    /// Element after the cursor without moving.
    #[inline]
    pub fn peek_next(&self) -> Option<&'a T> {
        let next = match self.current {
            Some(node) => unsafe { (*node.as_ptr()).next },
            None => self.chain.head,
        };
        next.map(|node| unsafe { &(*node.as_ptr()).value })
    }
}

impl<'a, T, A: Allocator> Cursor<'a, T, Bidirectional, A> {
    /// Steps toward the front. From the front this reaches the ghost; from
    /// the ghost it reaches the back.
    #[inline]
    pub fn move_prev(&mut self) {
        match self.current {
            Some(node) => {
                self.current = unsafe { (*node.as_ptr()).back };
                self.index = self.index.wrapping_sub(1);
            }
            None => {
                self.current = self.chain.tail;
                self.index = self.chain.len.wrapping_sub(1);
            }
        }
    }

    /// Element before the cursor without moving.
    #[inline]
    pub fn peek_prev(&self) -> Option<&'a T> {
        let prev = match self.current {
            Some(node) => unsafe { (*node.as_ptr()).back },
            None => self.chain.tail,
        };
        prev.map(|node| unsafe { &(*node.as_ptr()).value })
    }
}

impl<T, L: Connector, A: Allocator> Clone for Cursor<'_, T, L, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, L: Connector, A: Allocator> Copy for Cursor<'_, T, L, A> {}

impl<T, L: Connector, A: Allocator> PartialEq for Cursor<'_, T, L, A> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.chain, other.chain) && self.current == other.current
    }
}

impl<T, L: Connector, A: Allocator> Eq for Cursor<'_, T, L, A> {}

impl<T: fmt::Debug, L: Connector, A: Allocator> fmt::Debug for Cursor<'_, T, L, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor")
            .field(&self.index())
            .field(&self.current())
            .finish()
    }
}

// =============================================================================
// CursorMut
// =============================================================================

/// A position in a chain that can insert and remove elements.
pub struct CursorMut<'a, T, L: Connector, A: Allocator = Global> {
    chain: &'a mut Chain<T, L, A>,
    current: Link<T, L>,
    index: usize,
}

impl<'a, T, L: Connector, A: Allocator> CursorMut<'a, T, L, A> {
    pub(crate) fn new(chain: &'a mut Chain<T, L, A>, current: Link<T, L>, index: usize) -> Self {
        Self {
            chain,
            current,
            index,
        }
    }

    /// Element at the cursor, or `None` on the ghost.
    #[inline]
    pub fn current(&self) -> Option<&T> {
        self.current
            .map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Element at the cursor, mutably.
    #[inline]
    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.current
            .map(|node| unsafe { &mut (*node.as_ptr()).value })
    }

    /// Zero-based position, or `None` on the ghost.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.current.map(|_| self.index)
    }

    /// Returns `true` on the ghost position.
    #[inline]
    pub fn is_ghost(&self) -> bool {
        self.current.is_none()
    }

    /// Steps toward the back, wrapping through the ghost.
    #[inline]
    pub fn move_next(&mut self) {
        match self.current {
            Some(node) => {
                self.current = unsafe { (*node.as_ptr()).next };
                self.index += 1;
            }
            None => {
                self.current = self.chain.head;
                self.index = 0;
            }
        }
    }

    /// Element after the cursor without moving.
    #[inline]
    pub fn peek_next(&self) -> Option<&T> {
        let next = match self.current {
            Some(node) => unsafe { (*node.as_ptr()).next },
            None => self.chain.head,
        };
        next.map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Read-only view at the same position.
    #[inline]
    pub fn as_cursor(&self) -> Cursor<'_, T, L, A> {
        Cursor::new(self.chain, self.current, self.index)
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Inserts `value` after the cursor; on the ghost, at the front.
    ///
    /// The cursor does not move: the new element is at
    /// [`peek_next`](Self::peek_next), one [`move_next`](Self::move_next)
    /// away. On allocation failure the chain is unchanged and `value` is
    /// returned.
    pub fn insert_after(&mut self, value: T) -> Result<(), Rejected<T>> {
        let node = self.chain.create_node(value)?;
        // Safety: current is null or a node of this chain
        unsafe { self.chain.link_after(self.current, node) };
        Ok(())
    }

    /// Inserts `value` as [`insert_after`](Self::insert_after) does, then
    /// moves onto the new element.
    ///
    /// On failure the cursor stays where it was.
    pub fn insert_after_and_move(&mut self, value: T) -> Result<(), Rejected<T>> {
        self.insert_after(value)?;
        self.move_next();
        Ok(())
    }

    /// Inserts `count` copies of `value` after the cursor, in order.
    ///
    /// Best-effort: copies inserted before a failure stay linked.
    pub fn insert_n_after(&mut self, count: usize, value: T) -> Result<(), BulkError>
    where
        T: Clone,
    {
        self.chain
            .insert_seq_after(self.current, iter::repeat_n(value, count))
            .map(|_| ())
    }

    /// Inserts every item of `iter` after the cursor, in order, and returns
    /// how many were inserted.
    ///
    /// Best-effort: items inserted before a failure stay linked; the item
    /// that could not be stored is dropped.
    pub fn insert_iter_after<I>(&mut self, iter: I) -> Result<usize, BulkError>
    where
        I: IntoIterator<Item = T>,
    {
        self.chain
            .insert_seq_after(self.current, iter.into_iter())
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Removes the element at the cursor and moves to the one after it.
    ///
    /// Returns `None` (and does nothing) on the ghost. O(n) for the forward
    /// shape, which has to find the predecessor.
    pub fn remove_current(&mut self) -> Option<T> {
        let node = self.current?;
        // Safety: node is a live node of this chain
        unsafe {
            self.current = (*node.as_ptr()).next;
            self.chain.unlink(node);
            Some(self.chain.destroy_node(node))
        }
    }

    /// Removes up to `count` elements starting at the cursor, as one splice.
    ///
    /// The cursor moves to the element after the removed run (or the
    /// ghost). Returns how many were removed.
    pub fn remove_range(&mut self, count: usize) -> usize {
        let Some(first) = self.current else {
            return 0;
        };
        // Safety: first is a live node of this chain
        let (removed, after) = unsafe { self.chain.erase_run(first, count) };
        self.current = after;
        removed
    }
}

impl<'a, T, A: Allocator> CursorMut<'a, T, Bidirectional, A> {
    /// Steps toward the front, wrapping through the ghost.
    #[inline]
    pub fn move_prev(&mut self) {
        match self.current {
            Some(node) => {
                self.current = unsafe { (*node.as_ptr()).back };
                self.index = self.index.wrapping_sub(1);
            }
            None => {
                self.current = self.chain.tail;
                self.index = self.chain.len.wrapping_sub(1);
            }
        }
    }

    /// Element before the cursor without moving.
    #[inline]
    pub fn peek_prev(&self) -> Option<&T> {
        let prev = match self.current {
            Some(node) => unsafe { (*node.as_ptr()).back },
            None => self.chain.tail,
        };
        prev.map(|node| unsafe { &(*node.as_ptr()).value })
    }
}

impl<T: fmt::Debug, L: Connector, A: Allocator> fmt::Debug for CursorMut<'_, T, L, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut")
            .field(&self.index())
            .field(&self.current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::chain::tests::{check_back_links, check_links};
    use crate::{BulkError, ForwardList, List};
    use nothrow_alloc::{Global, Limited, Tracking};

    fn values<T: Clone, L: crate::Connector, A: nothrow_alloc::Allocator>(
        chain: &crate::Chain<T, L, A>,
    ) -> Vec<T> {
        chain.iter().cloned().collect()
    }

    #[test]
    fn cursor_walks_through_ghost() {
        let list = ForwardList::try_from_iter_in([1u64, 2], Global).unwrap();
        let mut cursor = list.cursor_front();

        assert_eq!(cursor.current(), Some(&1));
        assert_eq!(cursor.index(), Some(0));
        assert_eq!(cursor.peek_next(), Some(&2));

        cursor.move_next();
        assert_eq!(cursor.index(), Some(1));
        assert_eq!(cursor.peek_next(), None);

        cursor.move_next();
        assert!(cursor.is_ghost());
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.index(), None);
        assert_eq!(cursor.peek_next(), Some(&1));

        cursor.move_next();
        assert_eq!(cursor.current(), Some(&1));
        assert_eq!(cursor.index(), Some(0));
    }

    #[test]
    fn bidirectional_cursor_moves_back() {
        let list = List::try_from_iter_in([1u64, 2, 3], Global).unwrap();
        let mut cursor = list.cursor_back();

        assert_eq!(cursor.current(), Some(&3));
        assert_eq!(cursor.index(), Some(2));
        assert_eq!(cursor.peek_prev(), Some(&2));

        cursor.move_prev();
        cursor.move_prev();
        assert_eq!(cursor.current(), Some(&1));
        assert_eq!(cursor.index(), Some(0));

        cursor.move_prev();
        assert!(cursor.is_ghost());
        assert_eq!(cursor.peek_prev(), Some(&3));

        cursor.move_prev();
        assert_eq!(cursor.current(), Some(&3));
        assert_eq!(cursor.index(), Some(2));
    }

    #[test]
    fn empty_chain_cursor_is_ghost() {
        let list: List<u64> = List::new();
        assert!(list.cursor_front().is_ghost());
        assert!(list.cursor_back().is_ghost());

        let mut cursor = list.cursor_front();
        cursor.move_next();
        assert!(cursor.is_ghost());
    }

    #[test]
    fn cursors_compare_by_position() {
        let list = List::try_from_iter_in([1u64, 2], Global).unwrap();
        let other = List::try_from_iter_in([1u64, 2], Global).unwrap();

        let mut a = list.cursor_front();
        let b = list.cursor_front();
        assert_eq!(a, b);

        a.move_next();
        assert_ne!(a, b);
        a.move_prev();
        assert_eq!(a, b);

        assert_ne!(list.cursor_front(), other.cursor_front());
    }

    #[test]
    fn insert_after_keeps_position() {
        let mut list = List::try_from_iter_in([1u64, 3], Global).unwrap();
        let mut cursor = list.cursor_front_mut();

        cursor.insert_after(2).unwrap();
        assert_eq!(cursor.current(), Some(&1));
        assert_eq!(cursor.peek_next(), Some(&2));

        cursor.move_next();
        cursor.move_next();
        cursor.insert_after(4).unwrap();

        assert_eq!(values(&list), vec![1, 2, 3, 4]);
        assert_eq!(list.back(), Some(&4));
        check_back_links(&list);
    }

    #[test]
    fn insert_after_and_move_lands_on_new_element() {
        let mut forward = ForwardList::try_from_iter_in([1u64, 3], Global).unwrap();
        let mut cursor = forward.cursor_front_mut();

        cursor.insert_after_and_move(2).unwrap();
        assert_eq!(cursor.current(), Some(&2));
        assert_eq!(cursor.index(), Some(1));
        assert_eq!(cursor.peek_next(), Some(&3));

        cursor.move_next();
        cursor.move_next();
        assert!(cursor.is_ghost());
        cursor.insert_after_and_move(0).unwrap();
        assert_eq!(cursor.current(), Some(&0));
        assert_eq!(cursor.index(), Some(0));

        assert_eq!(values(&forward), vec![0, 1, 2, 3]);
        check_links(&forward);
    }

    #[test]
    fn insert_after_and_move_stays_put_on_failure() {
        let alloc = Limited::new(Global, 1);
        let mut list = List::new_in(&alloc);
        list.push_back(1u64).unwrap();

        let mut cursor = list.cursor_front_mut();
        assert_eq!(cursor.insert_after_and_move(2).unwrap_err().into_inner(), 2);
        assert_eq!(cursor.current(), Some(&1));
        assert_eq!(cursor.index(), Some(0));
    }

    #[test]
    fn insert_after_ghost_goes_to_front() {
        let mut forward: ForwardList<u64> = ForwardList::new();
        let mut cursor = forward.cursor_front_mut();
        assert!(cursor.is_ghost());

        cursor.insert_after(2).unwrap();
        cursor.insert_after(1).unwrap();
        assert!(cursor.is_ghost());

        assert_eq!(values(&forward), vec![1, 2]);
        check_links(&forward);
    }

    #[test]
    fn insert_n_after_preserves_order() {
        let mut forward = ForwardList::try_from_iter_in([0u64, 9], Global).unwrap();
        let mut cursor = forward.cursor_front_mut();
        cursor.insert_n_after(3, 5).unwrap();
        assert_eq!(values(&forward), vec![0, 5, 5, 5, 9]);

        let mut cursor = forward.cursor_front_mut();
        cursor.insert_iter_after([1, 2, 3]).unwrap();
        assert_eq!(values(&forward), vec![0, 1, 2, 3, 5, 5, 5, 9]);
        check_links(&forward);
    }

    #[test]
    fn insert_iter_after_is_best_effort() {
        let alloc = Limited::new(Global, 3);
        let mut list = List::new_in(&alloc);
        list.push_back(0u64).unwrap();

        let mut cursor = list.cursor_front_mut();
        let err = cursor.insert_iter_after(1..=5).unwrap_err();
        assert_eq!(err.inserted(), 2);
        assert_eq!(values(&list), vec![0, 1, 2]);
        check_back_links(&list);

        let mut cursor = list.cursor_back_mut();
        assert_eq!(
            cursor.insert_n_after(2, 7),
            Err(BulkError::new(0, err.error()))
        );
    }

    #[test]
    fn insert_after_failure_returns_value() {
        let alloc = Limited::new(Global, 1);
        let mut forward = ForwardList::new_in(&alloc);
        forward.push_back("a".to_string()).unwrap();

        let mut cursor = forward.cursor_front_mut();
        let rejected = cursor.insert_after("b".to_string()).unwrap_err();
        assert_eq!(rejected.into_inner(), "b");
        assert_eq!(forward.len(), 1);
        check_links(&forward);
    }

    #[test]
    fn remove_current_advances() {
        let mut list = List::try_from_iter_in(0..4u64, Global).unwrap();
        let mut cursor = list.cursor_front_mut();
        cursor.move_next();

        assert_eq!(cursor.remove_current(), Some(1));
        assert_eq!(cursor.current(), Some(&2));
        assert_eq!(cursor.index(), Some(1));

        cursor.move_next();
        assert_eq!(cursor.remove_current(), Some(3));
        assert!(cursor.is_ghost());
        assert_eq!(cursor.remove_current(), None);

        assert_eq!(values(&list), vec![0, 2]);
        assert_eq!(list.back(), Some(&2));
        check_back_links(&list);
    }

    #[test]
    fn remove_every_node_through_cursor() {
        let alloc = Tracking::new(Global);
        let mut forward = ForwardList::try_from_iter_in(0..5u64, &alloc).unwrap();

        let mut cursor = forward.cursor_front_mut();
        while cursor.remove_current().is_some() {}

        check_links(&forward);
        assert!(forward.is_empty());
        assert!(alloc.stats().is_balanced());
    }

    #[test]
    fn remove_tail_of_forward_list_fixes_tail() {
        let mut forward = ForwardList::try_from_iter_in(0..3u64, Global).unwrap();
        let mut cursor = forward.cursor_front_mut();
        cursor.move_next();
        cursor.move_next();

        assert_eq!(cursor.remove_current(), Some(2));
        assert!(cursor.is_ghost());
        assert_eq!(forward.back(), Some(&1));
        check_links(&forward);

        forward.push_back(5).unwrap();
        assert_eq!(values(&forward), vec![0, 1, 5]);
    }

    #[test]
    fn remove_range_splices_run() {
        let alloc = Tracking::new(Global);
        let mut list = List::try_from_iter_in(0..10u64, &alloc).unwrap();

        let mut cursor = list.cursor_front_mut();
        cursor.move_next();
        cursor.move_next();
        assert_eq!(cursor.remove_range(3), 3);
        assert_eq!(cursor.current(), Some(&5));

        assert_eq!(values(&list), vec![0, 1, 5, 6, 7, 8, 9]);
        assert_eq!(alloc.stats().live_allocations, 7);
        check_back_links(&list);
    }

    #[test]
    fn remove_range_stops_at_back() {
        let mut forward = ForwardList::try_from_iter_in(0..5u64, Global).unwrap();
        let mut cursor = forward.cursor_front_mut();
        cursor.move_next();
        cursor.move_next();
        cursor.move_next();

        assert_eq!(cursor.remove_range(100), 2);
        assert!(cursor.is_ghost());
        assert_eq!(cursor.remove_range(1), 0);

        assert_eq!(values(&forward), vec![0, 1, 2]);
        assert_eq!(forward.back(), Some(&2));
        check_links(&forward);
    }

    #[test]
    fn remove_range_from_front_empties() {
        let mut list = List::try_from_iter_in(0..4u64, Global).unwrap();
        let mut cursor = list.cursor_front_mut();
        assert_eq!(cursor.remove_range(0), 0);
        assert_eq!(cursor.remove_range(4), 4);
        assert!(list.is_empty());
        check_back_links(&list);
    }

    #[test]
    fn as_cursor_shares_position() {
        let mut list = List::try_from_iter_in([1u64, 2], Global).unwrap();
        let mut cursor = list.cursor_front_mut();
        cursor.move_next();
        if let Some(value) = cursor.current_mut() {
            *value = 20;
        }
        let view = cursor.as_cursor();
        assert_eq!(view.current(), Some(&20));
        assert_eq!(view.index(), Some(1));
        assert_eq!(view.peek_prev(), Some(&1));
    }
}
