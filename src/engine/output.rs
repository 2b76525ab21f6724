//! Result types returned by the correction operations.
//!
//! ## Purpose
//!
//! This module defines the owned outputs of the smoothing and variance
//! adjustment operations, with optional diagnostics and a human-readable
//! summary via `Display`.
//!
//! ## Design notes
//!
//! * **Owned**: Results are produced fresh per call and owned by the caller.
//! * **Optional diagnostics**: Intermediate quantities are only kept when
//!   requested, to avoid holding extra per-cell vectors.
//! * **Undefined entries**: NaN marks cells without usable geometry; the
//!   summary reports how many there are.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::fmt::{self, Display};
use num_traits::Float;

// Internal dependencies
use crate::primitives::matrix::DenseMatrix;

// ============================================================================
// Smoothing Result
// ============================================================================

/// Output of the Gaussian kernel smoother.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedCorrection<T> {
    /// Genes × cells smoothed correction vectors, columns in `data` order.
    pub correction: DenseMatrix<T>,

    /// Number of distinct anchors used.
    pub n_anchors: usize,

    /// Kernel bandwidth used.
    pub sigma: T,

    /// Per-cell total anchor weight (diagnostics only).
    pub total_weight: Option<Vec<T>>,

    /// Zero-based anchor ids in ascending order (diagnostics only).
    pub anchors: Option<Vec<usize>>,
}

impl<T: Float> SmoothedCorrection<T> {
    /// Correction vector of cell `cell`.
    #[inline]
    pub fn column(&self, cell: usize) -> &[T] {
        self.correction.column(cell)
    }

    /// Number of cells whose correction is undefined (contains NaN).
    pub fn n_undefined(&self) -> usize {
        self.correction
            .columns()
            .filter(|col| col.iter().any(|v| v.is_nan()))
            .count()
    }
}

impl<T: Float + Display> Display for SmoothedCorrection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  Genes: {}", self.correction.nrow())?;
        writeln!(f, "  Cells: {}", self.correction.ncol())?;
        writeln!(f, "  Anchors: {}", self.n_anchors)?;
        writeln!(f, "  Sigma: {}", self.sigma)?;
        writeln!(f, "  Undefined cells: {}", self.n_undefined())?;

        if let Some(total) = &self.total_weight {
            writeln!(f)?;
            writeln!(f, "Total weight:")?;
            writeln!(f, "  {:>8} {:>12}", "Cell", "Weight")?;
            writeln!(f, "  {}", "-".repeat(21))?;
            for (cell, w) in total.iter().enumerate().take(10) {
                writeln!(f, "  {:>8} {:>12.6}", cell, w)?;
            }
            if total.len() > 10 {
                writeln!(f, "  ... ({} more)", total.len() - 10)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Adjustment Result
// ============================================================================

/// Output of the variance/quantile adjuster.
#[derive(Debug, Clone, PartialEq)]
pub struct VarianceAdjustment<T> {
    /// Per-cell scaling factor, in `data2` column order.
    pub scale: Vec<T>,

    /// Kernel bandwidth used.
    pub sigma: T,

    /// Per-cell cumulative probability in the target batch (diagnostics only).
    pub probability: Option<Vec<T>>,

    /// Per-cell matched reference quantile (diagnostics only).
    pub quantile: Option<Vec<T>>,
}

impl<T: Float> VarianceAdjustment<T> {
    /// Number of cells whose scale is undefined (NaN).
    pub fn n_undefined(&self) -> usize {
        self.scale.iter().filter(|v| v.is_nan()).count()
    }
}

impl<T: Float + Display> Display for VarianceAdjustment<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  Cells: {}", self.scale.len())?;
        writeln!(f, "  Sigma: {}", self.sigma)?;
        writeln!(f, "  Undefined cells: {}", self.n_undefined())?;
        writeln!(f)?;

        let diag = self.probability.as_ref().zip(self.quantile.as_ref());
        match diag {
            Some(_) => writeln!(
                f,
                "  {:>8} {:>12} {:>12} {:>12}",
                "Cell", "Scale", "Prob", "Quantile"
            )?,
            None => writeln!(f, "  {:>8} {:>12}", "Cell", "Scale")?,
        }
        writeln!(f, "  {}", "-".repeat(if diag.is_some() { 47 } else { 21 }))?;

        for (cell, s) in self.scale.iter().enumerate().take(10) {
            match diag {
                Some((p, q)) => writeln!(
                    f,
                    "  {:>8} {:>12.6} {:>12.6} {:>12.6}",
                    cell, s, p[cell], q[cell]
                )?,
                None => writeln!(f, "  {:>8} {:>12.6}", cell, s)?,
            }
        }
        if self.scale.len() > 10 {
            writeln!(f, "  ... ({} more)", self.scale.len() - 10)?;
        }
        Ok(())
    }
}
