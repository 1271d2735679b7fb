//! Containers that report allocation failure instead of panicking.
//!
//! Every container here takes its memory from a [`nothrow_alloc::Allocator`].
//! When the allocator says no, the operation says no: it returns an error,
//! leaves the container in a valid state, and hands back any value it was
//! given.
//!
//! # Containers
//!
//! | Container | Layout | Ends | Notes |
//! |-----------|--------|------|-------|
//! | [`Vector`] | Contiguous buffer | Back | Doubling growth, floor of [`MIN_NON_ZERO_CAP`] |
//! | [`List`] | Doubly-linked nodes | Front and back | O(1) removal at a cursor |
//! | [`ForwardList`] | Singly-linked nodes | Front and back | Smaller nodes; predecessor lookups scan |
//!
//! `List` and `ForwardList` are the same engine, [`Chain`], instantiated
//! with a different [`Connector`]. Operations that only make sense going
//! backwards (`cursor_back`, `move_prev`, reverse iteration) exist only on
//! the [`Bidirectional`] shape, so misuse is a compile error rather than a
//! runtime one.
//!
//! # Failure Contract
//!
//! ```text
//! single-value insert   all-or-nothing   Err(Rejected<T>) returns the value
//! bulk insert           best-effort      Err(BulkError) reports how many landed
//! copy / assign         all-or-nothing   Err(AllocError), target untouched
//! ```
//!
//! # Quick Start
//!
//! ```
//! use nothrow_alloc::{Global, Limited};
//! use nothrow_collections::{List, Vector};
//!
//! let mut v: Vector<u32> = Vector::new();
//! v.push_back(1).unwrap();
//! v.push_back(2).unwrap();
//! assert_eq!(&v[..], &[1, 2]);
//!
//! // One node allowed: the second push is refused and the value returned
//! let alloc = Limited::new(Global, 1);
//! let mut list = List::new_in(&alloc);
//! list.push_back("first").unwrap();
//! let rejected = list.push_back("second").unwrap_err();
//! assert_eq!(rejected.into_inner(), "second");
//! assert_eq!(list.len(), 1);
//! ```
//!
//! # Positions
//!
//! Containers are walked with cursors rather than raw positions. A cursor
//! borrows its container, so a position can never outlive the element it
//! names. Each cursor can also sit on a "ghost" position past the last
//! element; stepping from the ghost wraps to the front (and, for
//! bidirectional lists, stepping back from the ghost reaches the back).
//!
//! ```
//! use nothrow_collections::ForwardList;
//!
//! let mut list = ForwardList::try_from_iter_in(1..=3u32, nothrow_alloc::Global).unwrap();
//! let mut cursor = list.cursor_front_mut();
//! cursor.insert_after(10).unwrap();
//! cursor.move_next();
//! assert_eq!(cursor.current(), Some(&10));
//!
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 10, 2, 3]);
//! ```
//!
//! # Threading
//!
//! Containers are single-threaded data structures with no internal locking.
//! They are `Send`/`Sync` when their elements and allocator are, so shared
//! references may cross threads, but concurrent mutation needs external
//! synchronization (a `Mutex` around the container, for example). The
//! `Arena`, `Tracking` and `Limited` allocators are not `Sync`, so a
//! container holding one cannot be shared at all without such a wrapper.

#![warn(missing_docs)]

pub mod chain;
pub mod connector;
pub mod cursor;
mod error;
pub mod iter;
pub mod vector;

pub use chain::{Chain, ForwardList, List};
pub use connector::{Bidirectional, Category, Connector, Forward, Link, Node};
pub use cursor::{Cursor, CursorMut};
pub use error::BulkError;
pub use vector::{MIN_NON_ZERO_CAP, Vector};

pub use nothrow_alloc::{AllocError, Allocator, Global, Rejected};
