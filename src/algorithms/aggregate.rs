//! Per-anchor averaging of MNN correction vectors.
//!
//! ## Purpose
//!
//! Several MNN pairs can share the same anchor cell in the batch being
//! corrected. This module collapses the pair-level correction vectors into
//! one mean vector per distinct anchor.
//!
//! ## Design notes
//!
//! * **Two passes**: Running sums and counts are accumulated per anchor,
//!   then divided once at the end.
//! * **Sorted keys**: Anchors are kept in ascending order, so downstream
//!   folds over the anchor set are deterministic.
//! * **Flat storage**: Averages are stored contiguously, anchor-major.
//!
//! ## Invariants
//!
//! * Only anchors present in the index are populated.
//! * `averages.len() == anchors.len() * n_genes`.
//!
//! ## Non-goals
//!
//! * This module does not check anchors against the expression matrix.
//! * This module does not interpret one-based ids (done by the engine).

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{collections::BTreeMap, vec::Vec};
#[cfg(feature = "std")]
use std::{collections::BTreeMap, vec::Vec};

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::MnnError;
use crate::primitives::matrix::MatrixAccess;

// ============================================================================
// Anchor Averages
// ============================================================================

/// Mean correction vector for every distinct anchor cell.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorAverages<T> {
    anchors: Vec<usize>,
    counts: Vec<usize>,
    averages: Vec<T>,
    n_genes: usize,
}

impl<T: Float> AnchorAverages<T> {
    /// Average the rows of `vect` (pairs × genes) grouped by `index`.
    ///
    /// Fails with `DimensionMismatch` if `vect` does not have one row per
    /// entry of `index`.
    pub fn from_pairs<M: MatrixAccess<T> + ?Sized>(
        vect: &M,
        index: &[usize],
    ) -> Result<Self, MnnError> {
        let n_pairs = vect.nrow();
        if n_pairs != index.len() {
            return Err(MnnError::DimensionMismatch {
                what: "rows of 'vect' vs length of 'index'",
                expected: n_pairs,
                got: index.len(),
            });
        }

        let n_genes = vect.ncol();
        let mut sums: BTreeMap<usize, (Vec<T>, usize)> = BTreeMap::new();
        let mut row_buf = vec![T::zero(); n_genes];

        for (row, &anchor) in index.iter().enumerate() {
            let current = vect.get_row(row, &mut row_buf);
            let (sum, count) = sums
                .entry(anchor)
                .or_insert_with(|| (vec![T::zero(); n_genes], 0));
            for (s, &v) in sum.iter_mut().zip(current) {
                *s = *s + v;
            }
            *count += 1;
        }

        let mut anchors = Vec::with_capacity(sums.len());
        let mut counts = Vec::with_capacity(sums.len());
        let mut averages = Vec::with_capacity(sums.len() * n_genes);
        for (anchor, (sum, count)) in sums {
            let denom = T::from(count).unwrap_or_else(T::one);
            anchors.push(anchor);
            counts.push(count);
            averages.extend(sum.into_iter().map(|s| s / denom));
        }

        Ok(Self {
            anchors,
            counts,
            averages,
            n_genes,
        })
    }

    /// Number of distinct anchors.
    #[inline]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Whether no anchor is present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Length of each average vector.
    #[inline]
    pub fn n_genes(&self) -> usize {
        self.n_genes
    }

    /// Anchor ids in ascending order.
    #[inline]
    pub fn anchors(&self) -> &[usize] {
        &self.anchors
    }

    /// Average vector of the anchor at position `pos` in `anchors()`.
    #[inline]
    pub fn average_at(&self, pos: usize) -> &[T] {
        let start = pos * self.n_genes;
        &self.averages[start..start + self.n_genes]
    }

    /// Average vector for anchor id `anchor`, if it was populated.
    pub fn get(&self, anchor: usize) -> Option<&[T]> {
        self.anchors
            .binary_search(&anchor)
            .ok()
            .map(|pos| self.average_at(pos))
    }

    /// Number of pairs that contributed to anchor id `anchor`.
    pub fn count(&self, anchor: usize) -> Option<usize> {
        self.anchors
            .binary_search(&anchor)
            .ok()
            .map(|pos| self.counts[pos])
    }

    /// Iterate over `(anchor, average)` in ascending anchor order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[T])> {
        self.anchors
            .iter()
            .enumerate()
            .map(move |(pos, &anchor)| (anchor, self.average_at(pos)))
    }
}
