//! Gaussian kernel smoothing of per-anchor correction vectors.
//!
//! ## Purpose
//!
//! Every cell in the batch being corrected receives a correction vector
//! formed as a weighted blend of the anchor averages. The weight of an
//! anchor for a cell is a Gaussian kernel on their squared distance in
//! expression space, divided by the anchor's local density (the kernel
//! mass it places on all anchors), so crowded groups of anchors do not
//! dominate the blend.
//!
//! ## Design notes
//!
//! * **Log space**: Kernel values stay logged until the final `exp`, and
//!   the density is a stable log-sum-exp over the anchor set.
//! * **Independent dimensionalities**: Distances use the rows of the
//!   expression matrix; the blended payload uses the genes of the
//!   correction vectors. The two need not agree.
//! * **Reduction target**: `SmoothingAccumulator` holds the unnormalised
//!   blend and total weights. Partial accumulators can be merged, which
//!   is how the parallel driver combines per-thread results.
//!
//! ## Key concepts
//!
//! * **logp(m, c)** = `-d²(m, c) / σ²`
//! * **density(m)** = `logsumexp_{m'} logp(m, m')`
//! * **w(m, c)** = `exp(logp(m, c) - density(m))`
//! * **output[:, c]** = `Σ_m avg(m) · w(m, c) / Σ_m w(m, c)`
//!
//! ## Invariants
//!
//! * `density(m) >= 0`, since `logp(m, m) == 0`.
//! * Every weight is finite and non-negative for finite inputs.
//!
//! ## Non-goals
//!
//! * This module does not validate inputs (handled by `validator`).
//! * This module does not decide sequential vs parallel execution.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// Internal dependencies
use crate::algorithms::aggregate::AnchorAverages;
use crate::math::distance::DistanceLinalg;
use crate::math::logspace::{gaussian_log_kernel, logsumexp};
use crate::primitives::buffer::SmoothingBuffer;
use crate::primitives::matrix::{DenseMatrix, MatrixAccess};

// ============================================================================
// Accumulator
// ============================================================================

/// Unnormalised smoother output: weighted sums and total weight per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothingAccumulator<T> {
    /// Genes × cells weighted sums of anchor averages.
    pub weighted: DenseMatrix<T>,
    /// Sum of anchor weights per cell.
    pub total_weight: Vec<T>,
}

impl<T: DistanceLinalg> SmoothingAccumulator<T> {
    /// Zeroed accumulator for `n_genes` payload genes and `n_cells` cells.
    pub fn new(n_genes: usize, n_cells: usize) -> Self {
        Self {
            weighted: DenseMatrix::zeros(n_genes, n_cells),
            total_weight: vec![T::zero(); n_cells],
        }
    }

    /// Add the contribution of one anchor with the given log-probabilities.
    pub fn add_anchor(&mut self, average: &[T], log_probs: &[T], density: T) {
        for (cell, &lp) in log_probs.iter().enumerate() {
            let mult = (lp - density).exp();
            self.total_weight[cell] = self.total_weight[cell] + mult;
            for (out, &corval) in self.weighted.column_mut(cell).iter_mut().zip(average) {
                *out = *out + corval * mult;
            }
        }
    }

    /// Merge another partial accumulator into this one.
    pub fn merge(mut self, other: Self) -> Self {
        for (a, &b) in self
            .weighted
            .as_mut_slice()
            .iter_mut()
            .zip(other.weighted.as_slice())
        {
            *a = *a + b;
        }
        for (a, &b) in self.total_weight.iter_mut().zip(&other.total_weight) {
            *a = *a + b;
        }
        self
    }

    /// Divide every column by its total weight.
    ///
    /// Returns the normalised matrix and the total weights. A cell with zero
    /// total weight (no anchors) yields a NaN column.
    pub fn finish(mut self) -> (DenseMatrix<T>, Vec<T>) {
        for (cell, &total) in self.total_weight.iter().enumerate() {
            for val in self.weighted.column_mut(cell) {
                *val = *val / total;
            }
        }
        (self.weighted, self.total_weight)
    }
}

// ============================================================================
// Per-Anchor Steps
// ============================================================================

/// Fill `buf.log_probs` with `-d²(anchor, c) / σ²` for every cell `c`.
pub fn anchor_log_probs<T, M>(data: &M, anchor: usize, sigma: T, buf: &mut SmoothingBuffer<T>)
where
    T: DistanceLinalg,
    M: MatrixAccess<T> + ?Sized,
{
    let SmoothingBuffer {
        log_probs,
        anchor_col,
        other_col,
    } = buf;
    let n_cells = data.ncol();
    log_probs.reset(n_cells, T::zero());

    let anchor_vals = data.get_col(anchor, anchor_col);
    for (other, lp) in log_probs.iter_mut().enumerate() {
        let other_vals = data.get_col(other, other_col);
        let d2 = T::squared_euclidean(anchor_vals, other_vals);
        *lp = gaussian_log_kernel(d2, sigma);
    }
}

/// Log of the total kernel mass an anchor places on the anchor set.
#[inline]
pub fn anchor_density<T: DistanceLinalg>(log_probs: &[T], anchors: &[usize]) -> T {
    logsumexp(anchors.iter().map(|&other| log_probs[other]))
}

/// Add the weighted contribution of the anchor at position `pos` to `acc`.
pub fn smooth_anchor<T, M>(
    data: &M,
    averages: &AnchorAverages<T>,
    pos: usize,
    sigma: T,
    buf: &mut SmoothingBuffer<T>,
    acc: &mut SmoothingAccumulator<T>,
) where
    T: DistanceLinalg,
    M: MatrixAccess<T> + ?Sized,
{
    let anchor = averages.anchors()[pos];
    anchor_log_probs(data, anchor, sigma, buf);
    let density = anchor_density(&buf.log_probs, averages.anchors());
    acc.add_anchor(averages.average_at(pos), &buf.log_probs, density);
}
