//! Wrapping allocators for accounting and failure injection.

use core::alloc::Layout;
use core::cell::Cell;
use core::ptr::NonNull;

use crate::{Allocator, Global};

// =============================================================================
// Tracking
// =============================================================================

/// Allocation counters kept by [`Tracking`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Blocks handed out and not yet returned.
    pub live_allocations: usize,
    /// Bytes handed out and not yet returned.
    pub live_bytes: usize,
    /// Successful allocations since creation or the last reset.
    pub total_allocations: usize,
    /// High-water mark of `live_bytes`.
    pub peak_bytes: usize,
    /// Requests the inner allocator refused.
    pub failed_allocations: usize,
}

impl Stats {
    /// Returns `true` if every allocated block has been returned.
    #[inline]
    pub const fn is_balanced(&self) -> bool {
        self.live_allocations == 0 && self.live_bytes == 0
    }
}

/// Counts every request that passes through to an inner allocator.
///
/// Useful for asserting that a container released everything it acquired.
///
/// # Example
///
/// ```
/// use nothrow_alloc::{Allocator, Global, Tracking};
///
/// let alloc = Tracking::new(Global);
/// let block = alloc.allocate_array::<u32>(8).unwrap();
/// assert_eq!(alloc.stats().live_bytes, 32);
///
/// unsafe { alloc.deallocate_array(block, 8) };
/// assert!(alloc.stats().is_balanced());
/// ```
#[derive(Debug, Default)]
pub struct Tracking<A = Global> {
    inner: A,
    stats: Cell<Stats>,
}

impl<A> Tracking<A> {
    /// Wraps `inner` with zeroed counters.
    pub const fn new(inner: A) -> Self {
        Self {
            inner,
            stats: Cell::new(Stats {
                live_allocations: 0,
                live_bytes: 0,
                total_allocations: 0,
                peak_bytes: 0,
                failed_allocations: 0,
            }),
        }
    }

    /// Snapshot of the counters.
    #[inline]
    pub fn stats(&self) -> Stats {
        self.stats.get()
    }

    /// Clears the cumulative counters. Live counts are kept.
    pub fn reset_stats(&self) {
        let stats = self.stats.get();
        self.stats.set(Stats {
            total_allocations: 0,
            failed_allocations: 0,
            peak_bytes: stats.live_bytes,
            ..stats
        });
    }

    /// The wrapped allocator.
    #[inline]
    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: Allocator> Allocator for Tracking<A> {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        let block = self.inner.allocate(layout);
        let mut stats = self.stats.get();
        match block {
            Some(_) => {
                stats.live_allocations += 1;
                stats.total_allocations += 1;
                stats.live_bytes += layout.size();
                stats.peak_bytes = stats.peak_bytes.max(stats.live_bytes);
            }
            None => stats.failed_allocations += 1,
        }
        self.stats.set(stats);
        block
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        let mut stats = self.stats.get();
        stats.live_allocations = stats.live_allocations.saturating_sub(1);
        stats.live_bytes = stats.live_bytes.saturating_sub(layout.size());
        self.stats.set(stats);
        unsafe { self.inner.deallocate(ptr, layout) }
    }

    #[inline]
    fn max_size<T>(&self) -> usize {
        self.inner.max_size::<T>()
    }

    #[inline]
    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        unsafe { self.inner.construct(slot, value) }
    }

    #[inline]
    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        unsafe { self.inner.destroy(slot) }
    }
}

// =============================================================================
// Limited
// =============================================================================

/// Grants a fixed number of allocations, then refuses every request.
///
/// Deallocation never restores budget. This makes failure points
/// deterministic: a budget of `n` means the `n + 1`th request fails.
///
/// # Example
///
/// ```
/// use nothrow_alloc::{Allocator, Global, Limited};
///
/// let alloc = Limited::new(Global, 1);
/// let first = alloc.allocate_one::<u64>().unwrap();
/// assert!(alloc.allocate_one::<u64>().is_none());
///
/// alloc.set_budget(1);
/// let second = alloc.allocate_one::<u64>().unwrap();
///
/// unsafe {
///     alloc.deallocate_one(first);
///     alloc.deallocate_one(second);
/// }
/// ```
#[derive(Debug)]
pub struct Limited<A = Global> {
    inner: A,
    remaining: Cell<usize>,
    refused: Cell<usize>,
}

impl<A> Limited<A> {
    /// Wraps `inner`, allowing `budget` successful allocations.
    pub const fn new(inner: A, budget: usize) -> Self {
        Self {
            inner,
            remaining: Cell::new(budget),
            refused: Cell::new(0),
        }
    }

    /// Replaces the remaining budget.
    #[inline]
    pub fn set_budget(&self, budget: usize) {
        self.remaining.set(budget);
    }

    /// Allocations still allowed.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.remaining.get()
    }

    /// Requests refused so far.
    #[inline]
    pub fn refused(&self) -> usize {
        self.refused.get()
    }

    /// The wrapped allocator.
    #[inline]
    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: Allocator> Allocator for Limited<A> {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        let remaining = self.remaining.get();
        if remaining == 0 {
            self.refused.set(self.refused.get() + 1);
            tracing::debug!(bytes = layout.size(), "allocation budget exhausted");
            return None;
        }

        let block = self.inner.allocate(layout)?;
        self.remaining.set(remaining - 1);
        Some(block)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { self.inner.deallocate(ptr, layout) }
    }

    #[inline]
    fn max_size<T>(&self) -> usize {
        self.inner.max_size::<T>()
    }

    #[inline]
    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        unsafe { self.inner.construct(slot, value) }
    }

    #[inline]
    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        unsafe { self.inner.destroy(slot) }
    }
}
