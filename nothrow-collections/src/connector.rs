//! Link shapes for node chains.
//!
//! A [`Connector`] decides which links a node carries and how they are
//! rewired. The list engine in [`chain`](crate::chain) is written once
//! against this trait and serves both shapes:
//!
//! ```text
//! Forward:        head ──► a ──► b ──► c ◄── tail
//!
//! Bidirectional:  head ──► a ◄─► b ◄─► c ◄── tail
//! ```
//!
//! The one asymmetry that matters is [`Connector::get_prev`]: O(1) for
//! [`Bidirectional`], a scan from the head for [`Forward`]. Anything that
//! needs a predecessor (`pop_back`, removal at a cursor) inherits that cost.

use std::ptr::NonNull;

/// A possibly-null link to a node.
pub type Link<T, L> = Option<NonNull<Node<T, L>>>;

/// Traversal capability of a chain, as reported by [`Connector::CATEGORY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Forward traversal only.
    Forward,
    /// Forward and backward traversal.
    Bidirectional,
}

/// A heap node owning one element.
///
/// Created on insertion, freed on removal. Never copied or moved while
/// linked. Users only see the element through the chain's accessors.
pub struct Node<T, L: Connector> {
    pub(crate) next: Link<T, L>,
    pub(crate) back: L::Back<T>,
    pub(crate) value: T,
}

impl<T, L: Connector> Node<T, L> {
    /// Creates an unlinked node.
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Self {
            next: None,
            back: Default::default(),
            value,
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Rewiring policy for one link shape.
///
/// Sealed: only [`Forward`] and [`Bidirectional`] exist.
///
/// # Safety
///
/// All functions take raw links. Callers guarantee every non-null link
/// points at a live node of the same chain.
pub trait Connector: sealed::Sealed + Sized + 'static {
    /// The backward link a node carries: `()` or a [`Link`].
    type Back<T>: Copy + Default;

    /// Traversal category of chains using this shape.
    const CATEGORY: Category;

    /// Makes `b` follow `a`. Either side may be null.
    ///
    /// # Safety
    ///
    /// Non-null links must point at live nodes.
    unsafe fn connect<T>(a: Link<T, Self>, b: Link<T, Self>);

    /// Joins `left` and `right` directly, bypassing `mid`.
    ///
    /// `mid` keeps its own links; [`disconnect_ends`](Self::disconnect_ends)
    /// clears them.
    ///
    /// # Safety
    ///
    /// `left` and `right` must be the neighbours of `mid` (or null).
    unsafe fn disconnect<T>(left: Link<T, Self>, mid: NonNull<Node<T, Self>>, right: Link<T, Self>);

    /// Moves `head`/`tail` off `node` if it is an end, then clears the
    /// node's links.
    ///
    /// Must run while `node` is still reachable from `head`: the forward
    /// shape locates the new tail by scanning for `node`'s predecessor.
    ///
    /// # Safety
    ///
    /// `node` must be linked into the chain described by `head`/`tail`.
    unsafe fn disconnect_ends<T>(
        head: &mut Link<T, Self>,
        tail: &mut Link<T, Self>,
        node: NonNull<Node<T, Self>>,
    );

    /// Returns the node before `node`, or null if `node` is the head.
    ///
    /// # Safety
    ///
    /// `node` must be reachable from `head`.
    unsafe fn get_prev<T>(head: Link<T, Self>, node: NonNull<Node<T, Self>>) -> Link<T, Self>;
}

// =============================================================================
// Forward
// =============================================================================

/// Singly-linked shape: each node knows only its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Forward;

impl sealed::Sealed for Forward {}

impl Connector for Forward {
    type Back<T> = ();

    const CATEGORY: Category = Category::Forward;

    #[inline]
    unsafe fn connect<T>(a: Link<T, Self>, b: Link<T, Self>) {
        if let Some(a) = a {
            unsafe { (*a.as_ptr()).next = b };
        }
    }

    #[inline]
    unsafe fn disconnect<T>(left: Link<T, Self>, _mid: NonNull<Node<T, Self>>, right: Link<T, Self>) {
        if let Some(left) = left {
            unsafe { (*left.as_ptr()).next = right };
        }
    }

    #[inline]
    unsafe fn disconnect_ends<T>(
        head: &mut Link<T, Self>,
        tail: &mut Link<T, Self>,
        node: NonNull<Node<T, Self>>,
    ) {
        // New tail must be found before head moves past node
        if *tail == Some(node) {
            *tail = unsafe { Self::get_prev(*head, node) };
        }
        if *head == Some(node) {
            *head = unsafe { (*node.as_ptr()).next };
        }
        unsafe { (*node.as_ptr()).next = None };
    }

    #[inline]
    unsafe fn get_prev<T>(head: Link<T, Self>, node: NonNull<Node<T, Self>>) -> Link<T, Self> {
        let mut curr = head?;
        if curr == node {
            return None;
        }
        loop {
            // Safety: curr is live; node is reachable so the walk ends before null
            let next = unsafe { (*curr.as_ptr()).next }?;
            if next == node {
                return Some(curr);
            }
            curr = next;
        }
    }
}

// =============================================================================
// Bidirectional
// =============================================================================

/// Doubly-linked shape: each node knows both neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bidirectional;

impl sealed::Sealed for Bidirectional {}

impl Connector for Bidirectional {
    type Back<T> = Link<T, Self>;

    const CATEGORY: Category = Category::Bidirectional;

    #[inline]
    unsafe fn connect<T>(a: Link<T, Self>, b: Link<T, Self>) {
        if let Some(a) = a {
            unsafe { (*a.as_ptr()).next = b };
        }
        if let Some(b) = b {
            unsafe { (*b.as_ptr()).back = a };
        }
    }

    #[inline]
    unsafe fn disconnect<T>(left: Link<T, Self>, _mid: NonNull<Node<T, Self>>, right: Link<T, Self>) {
        unsafe { Self::connect(left, right) }
    }

    #[inline]
    unsafe fn disconnect_ends<T>(
        head: &mut Link<T, Self>,
        tail: &mut Link<T, Self>,
        node: NonNull<Node<T, Self>>,
    ) {
        let raw = node.as_ptr();
        unsafe {
            if *head == Some(node) {
                *head = (*raw).next;
            }
            if *tail == Some(node) {
                *tail = (*raw).back;
            }
            (*raw).next = None;
            (*raw).back = None;
        }
    }

    #[inline]
    unsafe fn get_prev<T>(_head: Link<T, Self>, node: NonNull<Node<T, Self>>) -> Link<T, Self> {
        unsafe { (*node.as_ptr()).back }
    }
}
