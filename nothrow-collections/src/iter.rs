//! Iterators over node chains.
//!
//! All three iterators go front to back. Chains with the
//! [`Bidirectional`] shape also iterate back to front.

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use nothrow_alloc::Allocator;

use crate::chain::Chain;
use crate::connector::{Bidirectional, Connector, Link, Node};

// =============================================================================
// Iter
// =============================================================================

/// Iterator over references to chain elements.
pub struct Iter<'a, T, L: Connector> {
    head: Link<T, L>,
    tail: Link<T, L>,
    len: usize,
    _marker: PhantomData<&'a Node<T, L>>,
}

impl<T, L: Connector> Iter<'_, T, L> {
    pub(crate) fn new(head: Link<T, L>, tail: Link<T, L>, len: usize) -> Self {
        Self {
            head,
            tail,
            len,
            _marker: PhantomData,
        }
    }
}

impl<T, L: Connector> Clone for Iter<'_, T, L> {
    fn clone(&self) -> Self {
        Self::new(self.head, self.tail, self.len)
    }
}

impl<T: fmt::Debug, L: Connector> fmt::Debug for Iter<'_, T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T, L: Connector> Iterator for Iter<'a, T, L> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.head?;
        // Safety: len > 0, so head is a live node borrowed for 'a
        unsafe {
            self.head = (*node.as_ptr()).next;
            self.len -= 1;
            Some(&(*node.as_ptr()).value)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T, Bidirectional> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.tail?;
        // Safety: len > 0, so tail is a live node borrowed for 'a
        unsafe {
            self.tail = (*node.as_ptr()).back;
            self.len -= 1;
            Some(&(*node.as_ptr()).value)
        }
    }
}

impl<T, L: Connector> ExactSizeIterator for Iter<'_, T, L> {}

impl<T, L: Connector> FusedIterator for Iter<'_, T, L> {}

// =============================================================================
// IterMut
// =============================================================================

/// Iterator over mutable references to chain elements.
pub struct IterMut<'a, T, L: Connector> {
    head: Link<T, L>,
    tail: Link<T, L>,
    len: usize,
    _marker: PhantomData<&'a mut Node<T, L>>,
}

impl<T, L: Connector> IterMut<'_, T, L> {
    pub(crate) fn new(head: Link<T, L>, tail: Link<T, L>, len: usize) -> Self {
        Self {
            head,
            tail,
            len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T, L: Connector> Iterator for IterMut<'a, T, L> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.head?;
        // Safety: each node is yielded at most once, so the borrows are disjoint
        unsafe {
            self.head = (*node.as_ptr()).next;
            self.len -= 1;
            Some(&mut (*node.as_ptr()).value)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T, Bidirectional> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.tail?;
        unsafe {
            self.tail = (*node.as_ptr()).back;
            self.len -= 1;
            Some(&mut (*node.as_ptr()).value)
        }
    }
}

impl<T, L: Connector> ExactSizeIterator for IterMut<'_, T, L> {}

impl<T, L: Connector> FusedIterator for IterMut<'_, T, L> {}

// =============================================================================
// IntoIter
// =============================================================================

/// Owning iterator; pops elements off the chain.
pub struct IntoIter<T, L: Connector, A: Allocator> {
    chain: Chain<T, L, A>,
}

impl<T, L: Connector, A: Allocator> IntoIter<T, L, A> {
    pub(crate) fn new(chain: Chain<T, L, A>) -> Self {
        Self { chain }
    }
}

impl<T: fmt::Debug, L: Connector, A: Allocator> fmt::Debug for IntoIter<T, L, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.chain).finish()
    }
}

impl<T, L: Connector, A: Allocator> Iterator for IntoIter<T, L, A> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.chain.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.chain.len(), Some(self.chain.len()))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, Bidirectional, A> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.chain.pop_back()
    }
}

impl<T, L: Connector, A: Allocator> ExactSizeIterator for IntoIter<T, L, A> {}

impl<T, L: Connector, A: Allocator> FusedIterator for IntoIter<T, L, A> {}
