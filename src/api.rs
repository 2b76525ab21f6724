//! High-level API for MNN correction kernels.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry points: a fluent
//! builder that validates configuration once and yields a reusable
//! [`MnnKernels`] handle, plus two call-style free functions for one-off
//! use.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder; only `sigma` is required.
//! * **Validated**: Parameters are validated when `.build()` is called;
//!   input shapes are validated on every call.
//! * **Stateless calls**: A built handle keeps no state between calls.
//! * **Type-Safe**: Generic over `Float` types for flexible precision.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`MnnKernelBuilder`] via `MnnKernel::new()`.
//! 2. Chain configuration methods (`.sigma()`, `.index_base()`, etc.).
//! 3. Call `.build()` and run either operation on the resulting handle.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::fmt::Debug;

// Internal dependencies
use crate::engine::executor::CorrectionExecutor;
use crate::engine::validator::Validator;
use crate::math::distance::DistanceLinalg;

// Publicly re-exported types
pub use crate::engine::executor::IndexBase;
pub use crate::engine::output::{SmoothedCorrection, VarianceAdjustment};
pub use crate::primitives::errors::MnnError;
pub use crate::primitives::matrix::{CscMatrix, DenseMatrix, MatrixAccess};

// ============================================================================
// Builder
// ============================================================================

/// Fluent builder for configuring the MNN correction kernels.
#[derive(Debug, Clone)]
pub struct MnnKernelBuilder<T> {
    /// Gaussian kernel bandwidth (required).
    pub sigma: Option<T>,

    /// Anchor id numbering (default: ZeroBased).
    pub index_base: Option<IndexBase>,

    /// Parallel execution (default: false).
    pub parallel: Option<bool>,

    /// Keep per-cell intermediate quantities in the results.
    pub return_diagnostics: Option<bool>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl<T: DistanceLinalg + Debug + Send + Sync> Default for MnnKernelBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DistanceLinalg + Debug + Send + Sync> MnnKernelBuilder<T> {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            sigma: None,
            index_base: None,
            parallel: None,
            return_diagnostics: None,
            duplicate_param: None,
        }
    }

    /// Set the Gaussian kernel bandwidth.
    pub fn sigma(mut self, sigma: T) -> Self {
        if self.sigma.is_some() {
            self.duplicate_param = Some("sigma");
        }
        self.sigma = Some(sigma);
        self
    }

    /// Set the numbering convention of anchor ids.
    pub fn index_base(mut self, base: IndexBase) -> Self {
        if self.index_base.is_some() {
            self.duplicate_param = Some("index_base");
        }
        self.index_base = Some(base);
        self
    }

    /// Enable or disable parallel execution (requires the `parallel` feature).
    pub fn parallel(mut self, parallel: bool) -> Self {
        if self.parallel.is_some() {
            self.duplicate_param = Some("parallel");
        }
        self.parallel = Some(parallel);
        self
    }

    /// Include per-cell diagnostics in the results.
    pub fn return_diagnostics(mut self) -> Self {
        self.return_diagnostics = Some(true);
        self
    }

    /// Validate the configuration and build a reusable handle.
    pub fn build(self) -> Result<MnnKernels<T>, MnnError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;
        let sigma = Validator::validate_required(self.sigma, "sigma")?;
        Validator::validate_sigma(sigma)?;

        let executor = CorrectionExecutor::new(sigma)
            .index_base(self.index_base.unwrap_or_default())
            .parallel(self.parallel.unwrap_or(false))
            .return_diagnostics(self.return_diagnostics.unwrap_or(false));

        Ok(MnnKernels { executor })
    }
}

// ============================================================================
// Built Handle
// ============================================================================

/// Validated, reusable configuration for both correction operations.
#[derive(Debug, Clone)]
pub struct MnnKernels<T> {
    executor: CorrectionExecutor<T>,
}

impl<T: DistanceLinalg + Debug + Send + Sync> MnnKernels<T> {
    /// Kernel bandwidth.
    pub fn sigma(&self) -> T {
        self.executor.sigma
    }

    /// Smooth per-pair correction vectors across all cells of a batch.
    ///
    /// * `vect`: pairs × genes correction vectors.
    /// * `index`: anchor cell of each pair (column of `data`).
    /// * `data`: genes-for-distance × cells expression matrix.
    ///
    /// Returns a genes × cells matrix with columns in `data` order.
    pub fn smooth_gaussian_kernel<V, D>(
        &self,
        vect: &V,
        index: &[usize],
        data: &D,
    ) -> Result<SmoothedCorrection<T>, MnnError>
    where
        V: MatrixAccess<T> + ?Sized,
        D: MatrixAccess<T> + Sync + ?Sized,
    {
        self.executor.smooth(vect, index, data)
    }

    /// Rescale per-cell correction directions by weighted quantile matching.
    ///
    /// * `data1`: genes × N₁ reference batch.
    /// * `data2`: genes × N₂ batch being corrected.
    /// * `vect`: N₂ × genes direction rows.
    ///
    /// Returns one scale per column of `data2`.
    pub fn adjust_shift_variance<R, Q, D>(
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
        self.executor.adjust(data1, data2, vect)
    }
}

// ============================================================================
// Call-Style Operations
// ============================================================================

/// One-off Gaussian kernel smoothing with zero-based anchor ids.
///
/// Returns the genes × cells smoothed correction matrix.
pub fn smooth_gaussian_kernel<T, V, D>(
    vect: &V,
    index: &[usize],
    data: &D,
    sigma: T,
) -> Result<DenseMatrix<T>, MnnError>
where
    T: DistanceLinalg + Debug + Send + Sync,
    V: MatrixAccess<T> + ?Sized,
    D: MatrixAccess<T> + Sync + ?Sized,
{
    Validator::validate_pairs(vect.nrow(), index.len())?;
    let kernels = MnnKernelBuilder::new().sigma(sigma).build()?;
    Ok(kernels.smooth_gaussian_kernel(vect, index, data)?.correction)
}

/// One-off variance adjustment.
///
/// Returns one scale per column of `data2`.
pub fn adjust_shift_variance<T, R, Q, D>(
    data1: &R,
    data2: &Q,
    vect: &D,
    sigma: T,
) -> Result<Vec<T>, MnnError>
where
    T: DistanceLinalg + Debug + Send + Sync,
    R: MatrixAccess<T> + Sync + ?Sized,
    Q: MatrixAccess<T> + Sync + ?Sized,
    D: MatrixAccess<T> + Sync + ?Sized,
{
    Validator::validate_adjustment_shapes(
        (data1.nrow(), data1.ncol()),
        (data2.nrow(), data2.ncol()),
        (vect.nrow(), vect.ncol()),
    )?;
    let kernels = MnnKernelBuilder::new().sigma(sigma).build()?;
    Ok(kernels.adjust_shift_variance(data1, data2, vect)?.scale)
}
