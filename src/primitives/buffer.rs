//! Scratch buffers for the smoothing and variance-adjustment kernels.
//!
//! ## Purpose
//!
//! This module provides reusable workspaces so the hot loops of both
//! kernels never allocate. Each buffer is sized once per invocation (or
//! once per worker thread in parallel mode) and then recycled for every
//! anchor or target cell.
//!
//! ## Design notes
//!
//! * **Explicit ownership**: Buffers are passed down explicitly, one per
//!   thread, instead of being cached globally.
//! * **Lazy expansion**: `ensure_capacity` grows but never shrinks.
//!
//! ## Key concepts
//!
//! * **Slot**: A `Vec` wrapper with capacity management.
//! * **SmoothingBuffer**: Per-anchor distances and column reads.
//! * **AdjustmentBuffer**: Direction, column reads, line-distance workspace
//!   and the (projection, weight) pairs of the reference batch.
//!
//! ## Invariants
//!
//! * Buffers are only logically cleared between iterations.
//!
//! ## Non-goals
//!
//! * Thread-local automatic caching.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::ops::{Deref, DerefMut};
use num_traits::Float;

// ============================================================================
// Slot - Unified Vector Abstraction
// ============================================================================

/// A reusable vector slot with automatic capacity management.
#[derive(Debug, Clone)]
pub struct Slot<T>(Vec<T>);

impl<T> Slot<T> {
    /// Create a new slot with the given initial capacity.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Ensure the slot has at least the given capacity.
    #[inline]
    pub fn ensure_capacity(&mut self, capacity: usize) {
        if self.0.capacity() < capacity {
            self.0.reserve(capacity - self.0.len());
        }
    }
}

impl<T: Clone> Slot<T> {
    /// Reset the slot to `len` copies of `value`, reusing its allocation.
    #[inline]
    pub fn reset(&mut self, len: usize, value: T) {
        self.0.clear();
        self.0.resize(len, value);
    }
}

impl<T> Deref for Slot<T> {
    type Target = Vec<T>;
    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Slot<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

// ============================================================================
// Smoothing Workspace
// ============================================================================

/// Scratch space for the Gaussian kernel smoother.
#[derive(Debug, Clone)]
pub struct SmoothingBuffer<T> {
    /// Squared distances, then log-probabilities, from one anchor to every cell.
    pub log_probs: Slot<T>,
    /// Column read buffer for the anchor cell.
    pub anchor_col: Slot<T>,
    /// Column read buffer for the other cell.
    pub other_col: Slot<T>,
}

impl<T: Float> SmoothingBuffer<T> {
    /// Create a buffer for `n_cells` cells and `n_dist_genes` distance genes.
    pub fn new(n_cells: usize, n_dist_genes: usize) -> Self {
        let mut buf = Self {
            log_probs: Slot::new(n_cells),
            anchor_col: Slot::new(n_dist_genes),
            other_col: Slot::new(n_dist_genes),
        };
        buf.log_probs.reset(n_cells, T::zero());
        buf.anchor_col.reset(n_dist_genes, T::zero());
        buf.other_col.reset(n_dist_genes, T::zero());
        buf
    }
}

// ============================================================================
// Adjustment Workspace
// ============================================================================

/// Scratch space for the variance/quantile adjuster.
#[derive(Debug, Clone)]
pub struct AdjustmentBuffer<T> {
    /// Unit-normalised copy of the current direction row.
    pub grad: Slot<T>,
    /// Line-distance workspace.
    pub working: Slot<T>,
    /// Column read buffer for the target cell.
    pub current: Slot<T>,
    /// Column read buffer for another cell in the target batch.
    pub same: Slot<T>,
    /// Column read buffer for a reference-batch cell.
    pub other: Slot<T>,
    /// (projection, weight) of every reference-batch cell.
    pub reference: Slot<(T, T)>,
}

impl<T: Float> AdjustmentBuffer<T> {
    /// Create a buffer for `n_genes` genes and `n_reference` reference cells.
    pub fn new(n_genes: usize, n_reference: usize) -> Self {
        let mut buf = Self {
            grad: Slot::new(n_genes),
            working: Slot::new(n_genes),
            current: Slot::new(n_genes),
            same: Slot::new(n_genes),
            other: Slot::new(n_genes),
            reference: Slot::new(n_reference),
        };
        for slot in [
            &mut buf.grad,
            &mut buf.working,
            &mut buf.current,
            &mut buf.same,
            &mut buf.other,
        ] {
            slot.reset(n_genes, T::zero());
        }
        buf.reference.ensure_capacity(n_reference);
        buf
    }
}
