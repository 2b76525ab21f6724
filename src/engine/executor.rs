//! Execution engine for the MNN correction kernels.
//!
//! ## Purpose
//!
//! This module orchestrates both operations: it validates inputs, resolves
//! anchor ids, sizes scratch buffers, drives the per-anchor and per-cell
//! kernels either sequentially or in parallel, and assembles the results.
//!
//! ## Design notes
//!
//! * **Fail before work**: All structural checks run before any distance is
//!   computed, so errors never come with partial results.
//! * **Smoother reduction**: In parallel mode every worker owns a private
//!   `SmoothingAccumulator`; partial accumulators are merged by a reduction
//!   tree before normalisation. Output columns are never shared between
//!   workers while accumulating.
//! * **Adjuster fan-out**: Cells are independent; each worker keeps one
//!   `AdjustmentBuffer` for all the cells it processes.
//! * **Feature-gated parallelism**: The `parallel` hint is honoured only
//!   when the crate is built with the `parallel` feature.
//!
//! ## Invariants
//!
//! * Smoother output has one column per column of `data`, in the same order.
//! * Adjuster output has one entry per column of `data2`, in the same order.
//!
//! ## Non-goals
//!
//! * This module does not find MNN pairs.
//! * This module does not combine more than two batches.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{borrow::Cow, vec::Vec};
#[cfg(feature = "std")]
use std::{borrow::Cow, vec::Vec};

// External dependencies
use core::fmt::Debug;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, warn};

// Internal dependencies
use crate::algorithms::aggregate::AnchorAverages;
use crate::algorithms::quantile::{CellAdjustment, adjust_cell};
use crate::algorithms::smoothing::{SmoothingAccumulator, smooth_anchor};
use crate::engine::output::{SmoothedCorrection, VarianceAdjustment};
use crate::engine::validator::Validator;
use crate::math::distance::DistanceLinalg;
use crate::primitives::buffer::{AdjustmentBuffer, SmoothingBuffer};
use crate::primitives::errors::MnnError;
use crate::primitives::matrix::MatrixAccess;

// ============================================================================
// Index Base
// ============================================================================

/// Numbering convention of anchor ids in `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexBase {
    /// Ids start at 0.
    #[default]
    ZeroBased,

    /// Ids start at 1.
    OneBased,
}

impl IndexBase {
    /// Convert ids to zero-based, borrowing when no shift is needed.
    pub fn resolve<'a>(&self, index: &'a [usize]) -> Result<Cow<'a, [usize]>, MnnError> {
        match self {
            IndexBase::ZeroBased => Ok(Cow::Borrowed(index)),
            IndexBase::OneBased => {
                Validator::validate_one_based(index)?;
                Ok(Cow::Owned(index.iter().map(|&i| i - 1).collect()))
            }
        }
    }
}

// ============================================================================
// Executor
// ============================================================================

/// Unified executor for the smoothing and variance-adjustment operations.
#[derive(Debug, Clone)]
pub struct CorrectionExecutor<T> {
    /// Gaussian kernel bandwidth.
    pub sigma: T,

    /// Numbering convention of anchor ids.
    pub index_base: IndexBase,

    /// Whether to use parallel execution.
    pub parallel: bool,

    /// Whether to keep intermediate per-cell quantities in the results.
    pub return_diagnostics: bool,
}

impl<T: DistanceLinalg + Debug + Send + Sync> CorrectionExecutor<T> {
    /// Create an executor with the given bandwidth and default options.
    pub fn new(sigma: T) -> Self {
        Self {
            sigma,
            index_base: IndexBase::default(),
            parallel: false,
            return_diagnostics: false,
        }
    }

    /// Set the anchor id numbering convention.
    pub fn index_base(mut self, base: IndexBase) -> Self {
        self.index_base = base;
        self
    }

    /// Set whether to use parallel execution.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set whether to return diagnostics.
    pub fn return_diagnostics(mut self, enabled: bool) -> Self {
        self.return_diagnostics = enabled;
        self
    }

    #[inline]
    fn use_parallel(&self) -> bool {
        if self.parallel && !cfg!(feature = "parallel") {
            debug!("parallel execution requested without the `parallel` feature");
        }
        self.parallel && cfg!(feature = "parallel")
    }

    // ========================================================================
    // Smoothing
    // ========================================================================

    /// Smooth per-pair correction vectors across every cell of `data`.
    ///
    /// * `vect`: pairs × genes correction vectors.
    /// * `index`: anchor id of each pair, in the configured base.
    /// * `data`: distance genes × cells expression matrix.
    ///
    /// With no anchors the output is all-NaN.
    pub fn smooth<V, D>(
        &self,
        vect: &V,
        index: &[usize],
        data: &D,
    ) -> Result<SmoothedCorrection<T>, MnnError>
    where
        V: MatrixAccess<T> + ?Sized,
        D: MatrixAccess<T> + Sync + ?Sized,
    {
        Validator::validate_pairs(vect.nrow(), index.len())?;
        Validator::validate_sigma(self.sigma)?;
        let index = self.index_base.resolve(index)?;
        Validator::validate_anchor_bounds(&index, data.ncol())?;

        let averages = AnchorAverages::from_pairs(vect, &index)?;
        let n_genes = averages.n_genes();
        let n_cells = data.ncol();
        debug!(
            n_pairs = index.len(),
            n_anchors = averages.len(),
            n_genes,
            n_dist_genes = data.nrow(),
            n_cells,
            sigma = ?self.sigma,
            "smoothing correction vectors"
        );
        if averages.is_empty() {
            warn!(n_cells, "no MNN anchors, smoothed corrections are undefined");
        }

        let acc = if self.use_parallel() {
            Self::smooth_parallel(data, &averages, self.sigma)
        } else {
            Self::smooth_sequential(data, &averages, self.sigma)
        };
        let (correction, total_weight) = acc.finish();

        Ok(SmoothedCorrection {
            correction,
            n_anchors: averages.len(),
            sigma: self.sigma,
            total_weight: self.return_diagnostics.then_some(total_weight),
            anchors: self
                .return_diagnostics
                .then(|| averages.anchors().to_vec()),
        })
    }

    fn smooth_sequential<D>(
        data: &D,
        averages: &AnchorAverages<T>,
        sigma: T,
    ) -> SmoothingAccumulator<T>
    where
        D: MatrixAccess<T> + ?Sized,
    {
        let n_cells = data.ncol();
        let mut buf = SmoothingBuffer::new(n_cells, data.nrow());
        let mut acc = SmoothingAccumulator::new(averages.n_genes(), n_cells);
        for pos in 0..averages.len() {
            smooth_anchor(data, averages, pos, sigma, &mut buf, &mut acc);
        }
        acc
    }

    #[cfg(feature = "parallel")]
    fn smooth_parallel<D>(
        data: &D,
        averages: &AnchorAverages<T>,
        sigma: T,
    ) -> SmoothingAccumulator<T>
    where
        D: MatrixAccess<T> + Sync + ?Sized,
    {
        let n_cells = data.ncol();
        let n_dist = data.nrow();
        let n_genes = averages.n_genes();
        (0..averages.len())
            .into_par_iter()
            .fold(
                || {
                    (
                        SmoothingBuffer::new(n_cells, n_dist),
                        SmoothingAccumulator::new(n_genes, n_cells),
                    )
                },
                |(mut buf, mut acc), pos| {
                    smooth_anchor(data, averages, pos, sigma, &mut buf, &mut acc);
                    (buf, acc)
                },
            )
            .map(|(_, acc)| acc)
            .reduce(
                || SmoothingAccumulator::new(n_genes, n_cells),
                SmoothingAccumulator::merge,
            )
    }

    #[cfg(not(feature = "parallel"))]
    fn smooth_parallel<D>(
        data: &D,
        averages: &AnchorAverages<T>,
        sigma: T,
    ) -> SmoothingAccumulator<T>
    where
        D: MatrixAccess<T> + Sync + ?Sized,
    {
        Self::smooth_sequential(data, averages, sigma)
    }

    // ========================================================================
    // Variance Adjustment
    // ========================================================================

    /// Compute the per-cell scaling of correction directions.
    ///
    /// * `data1`: genes × N₁ reference batch.
    /// * `data2`: genes × N₂ batch being corrected.
    /// * `vect`: N₂ × genes direction rows.
    ///
    /// Cells with a zero direction, and every cell when `data1` is empty,
    /// get a NaN scale.
    pub fn adjust<R, Q, D>(
        &self,
        data1: &R,
        data2: &Q,
        vect: &D,
    ) -> Result<VarianceAdjustment<T>, MnnError>
    where
        R: MatrixAccess<T> + Sync + ?Sized,
        Q: MatrixAccess<T> + Sync + ?Sized,
        D: MatrixAccess<T> + Sync + ?Sized,
    {
        Validator::validate_adjustment_shapes(
            (data1.nrow(), data1.ncol()),
            (data2.nrow(), data2.ncol()),
            (vect.nrow(), vect.ncol()),
        )?;
        Validator::validate_sigma(self.sigma)?;

        debug!(
            n_genes = data1.nrow(),
            n_reference = data1.ncol(),
            n_target = data2.ncol(),
            sigma = ?self.sigma,
            "adjusting shift variance"
        );
        if data1.ncol() == 0 {
            warn!("empty reference batch, all scales are undefined");
        }

        let cells = if self.use_parallel() {
            Self::adjust_parallel(data1, data2, vect, self.sigma)
        } else {
            Self::adjust_sequential(data1, data2, vect, self.sigma)
        };

        let scale = cells.iter().map(|c| c.scale).collect();
        let (probability, quantile) = if self.return_diagnostics {
            (
                Some(cells.iter().map(|c| c.probability).collect()),
                Some(cells.iter().map(|c| c.quantile).collect()),
            )
        } else {
            (None, None)
        };

        Ok(VarianceAdjustment {
            scale,
            sigma: self.sigma,
            probability,
            quantile,
        })
    }

    fn adjust_sequential<R, Q, D>(
        data1: &R,
        data2: &Q,
        vect: &D,
        sigma: T,
    ) -> Vec<CellAdjustment<T>>
    where
        R: MatrixAccess<T> + ?Sized,
        Q: MatrixAccess<T> + ?Sized,
        D: MatrixAccess<T> + ?Sized,
    {
        let mut buf = AdjustmentBuffer::new(data1.nrow(), data1.ncol());
        (0..data2.ncol())
            .map(|cell| adjust_cell(data1, data2, vect, cell, sigma, &mut buf))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn adjust_parallel<R, Q, D>(
        data1: &R,
        data2: &Q,
        vect: &D,
        sigma: T,
    ) -> Vec<CellAdjustment<T>>
    where
        R: MatrixAccess<T> + Sync + ?Sized,
        Q: MatrixAccess<T> + Sync + ?Sized,
        D: MatrixAccess<T> + Sync + ?Sized,
    {
        let n_genes = data1.nrow();
        let n_reference = data1.ncol();
        (0..data2.ncol())
            .into_par_iter()
            .map_init(
                || AdjustmentBuffer::new(n_genes, n_reference),
                |buf, cell| adjust_cell(data1, data2, vect, cell, sigma, buf),
            )
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn adjust_parallel<R, Q, D>(
        data1: &R,
        data2: &Q,
        vect: &D,
        sigma: T,
    ) -> Vec<CellAdjustment<T>>
    where
        R: MatrixAccess<T> + Sync + ?Sized,
        Q: MatrixAccess<T> + Sync + ?Sized,
        D: MatrixAccess<T> + Sync + ?Sized,
    {
        Self::adjust_sequential(data1, data2, vect, sigma)
    }
}
