//! Bump allocation over a single OS-backed region.
//!
//! ```text
//! base                     offset                        base + capacity
//!  │ live │ live │ freed │ live │          free              │
//!  └──────────────────────────────┴────────────────────────────┘
//! ```
//!
//! Allocation advances `offset`. Freeing the most recent block moves
//! `offset` back; freeing anything else only decrements the live count. When
//! the live count reaches zero the whole region is reusable again.

use core::alloc::Layout;
use core::cell::Cell;
use core::fmt;
use core::ptr::NonNull;

use crate::Allocator;
use crate::sys::Pages;

// =============================================================================
// Error
// =============================================================================

/// Failure to build an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaError {
    /// Capacity was zero or not specified.
    ZeroCapacity,
    /// The OS refused to map the region.
    AllocationFailed,
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "arena capacity must be non-zero"),
            Self::AllocationFailed => write!(f, "failed to map arena region"),
        }
    }
}

impl std::error::Error for ArenaError {}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`Arena`].
///
/// # Example
///
/// ```
/// use nothrow_alloc::ArenaBuilder;
///
/// let arena = ArenaBuilder::new()
///     .capacity_bytes(64 * 1024)
///     .populate(true)
///     .build()
///     .unwrap();
/// assert!(arena.capacity() >= 64 * 1024);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ArenaBuilder {
    capacity_bytes: Option<usize>,
    populate: bool,
}

impl ArenaBuilder {
    /// Creates a builder with no capacity set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum region size. Rounded up to whole pages.
    pub fn capacity_bytes(mut self, bytes: usize) -> Self {
        self.capacity_bytes = Some(bytes);
        self
    }

    /// Touch every page at build time so allocation never page-faults.
    pub fn populate(mut self, populate: bool) -> Self {
        self.populate = populate;
        self
    }

    /// Maps the region.
    pub fn build(self) -> Result<Arena, ArenaError> {
        let capacity = match self.capacity_bytes {
            Some(0) | None => return Err(ArenaError::ZeroCapacity),
            Some(bytes) => bytes,
        };

        let pages = Pages::alloc(capacity, self.populate).map_err(|err| {
            tracing::warn!(capacity, %err, "arena region mapping failed");
            ArenaError::AllocationFailed
        })?;

        tracing::trace!(
            requested = capacity,
            mapped = pages.len(),
            populate = self.populate,
            "arena built"
        );

        Ok(Arena {
            pages,
            offset: Cell::new(0),
            live: Cell::new(0),
        })
    }
}

// =============================================================================
// Arena
// =============================================================================

/// A fixed-capacity bump allocator.
///
/// Returns `None` once the region is exhausted. The region is never grown.
#[derive(Debug)]
pub struct Arena {
    pages: Pages,
    offset: Cell<usize>,
    live: Cell<usize>,
}

impl Arena {
    /// Returns a builder.
    pub fn builder() -> ArenaBuilder {
        ArenaBuilder::new()
    }

    /// Maps an arena of at least `bytes` without prefaulting.
    pub fn with_capacity(bytes: usize) -> Result<Self, ArenaError> {
        ArenaBuilder::new().capacity_bytes(bytes).build()
    }

    /// Total region size in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.pages.len()
    }

    /// Bytes below the bump pointer, including alignment padding and freed holes.
    #[inline]
    pub fn used(&self) -> usize {
        self.offset.get()
    }

    /// Bytes above the bump pointer.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.used()
    }

    /// Blocks handed out and not yet returned.
    #[inline]
    pub fn live_allocations(&self) -> usize {
        self.live.get()
    }
}

impl Allocator for Arena {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        let base = self.pages.as_ptr() as usize;
        let mask = layout.align() - 1;

        let start = self.offset.get();
        let aligned = (base.checked_add(start)?.checked_add(mask)? & !mask) - base;
        let end = aligned.checked_add(layout.size())?;

        if end > self.capacity() {
            tracing::debug!(
                bytes = layout.size(),
                remaining = self.remaining(),
                "arena exhausted"
            );
            return None;
        }

        self.offset.set(end);
        self.live.set(self.live.get() + 1);

        // Safety: aligned + size <= capacity, so the block lies inside the region
        NonNull::new(unsafe { self.pages.as_ptr().add(aligned) })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        let live = self.live.get().saturating_sub(1);
        self.live.set(live);

        if live == 0 {
            self.offset.set(0);
            return;
        }

        let start = ptr.as_ptr() as usize - self.pages.as_ptr() as usize;
        if start + layout.size() == self.offset.get() {
            self.offset.set(start);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(Arena::builder().build().unwrap_err(), ArenaError::ZeroCapacity);
        assert_eq!(Arena::with_capacity(0).unwrap_err(), ArenaError::ZeroCapacity);
    }

    #[test]
    fn capacity_rounds_to_pages() {
        let arena = Arena::with_capacity(100).unwrap();
        assert!(arena.capacity() >= 4096);
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn allocations_are_aligned_and_disjoint() {
        let arena = Arena::with_capacity(4096).unwrap();

        let byte = arena.allocate_one::<u8>().unwrap();
        let word = arena.allocate_one::<u64>().unwrap();
        assert_eq!(word.as_ptr() as usize % 8, 0);
        assert!(word.as_ptr() as usize > byte.as_ptr() as usize);
        assert_eq!(arena.live_allocations(), 2);

        unsafe {
            arena.deallocate_one(word);
            arena.deallocate_one(byte);
        }
    }

    #[test]
    fn exhaustion_returns_none() {
        let arena = Arena::with_capacity(4096).unwrap();
        let cap = arena.capacity();

        let block = arena.allocate_array::<u8>(cap).unwrap();
        assert_eq!(arena.remaining(), 0);
        assert!(arena.allocate_one::<u8>().is_none());

        unsafe { arena.deallocate_array(block, cap) };
        assert!(arena.allocate_one::<u8>().is_some());
    }

    #[test]
    fn freeing_top_block_rewinds() {
        let arena = Arena::with_capacity(4096).unwrap();

        let a = arena.allocate_array::<u64>(4).unwrap();
        let used = arena.used();
        let b = arena.allocate_array::<u64>(4).unwrap();
        assert_eq!(arena.used(), used + 32);

        unsafe { arena.deallocate_array(b, 4) };
        assert_eq!(arena.used(), used);

        unsafe { arena.deallocate_array(a, 4) };
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn freeing_inner_block_keeps_offset_until_empty() {
        let arena = Arena::with_capacity(4096).unwrap();

        let a = arena.allocate_array::<u64>(4).unwrap();
        let b = arena.allocate_array::<u64>(4).unwrap();
        let used = arena.used();

        unsafe { arena.deallocate_array(a, 4) };
        assert_eq!(arena.used(), used);

        unsafe { arena.deallocate_array(b, 4) };
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.live_allocations(), 0);
    }

    #[test]
    fn error_display() {
        assert_eq!(
            ArenaError::ZeroCapacity.to_string(),
            "arena capacity must be non-zero"
        );
    }
}
