//! # MNN correction kernels for Rust
//!
//! Dense numerical kernels for mutual-nearest-neighbour (MNN) batch
//! correction of single-cell expression matrices:
//!
//! - **Gaussian kernel smoothing**: collapse per-pair correction vectors to
//!   one average per anchor cell, then give every cell a density-normalised,
//!   distance-weighted blend of those averages.
//! - **Variance adjustment**: for every cell, match its weighted cumulative
//!   probability along its correction direction against the reference
//!   batch and return how far the correction should be stretched.
//!
//! ## What is MNN correction?
//!
//! Two batches of cells measured on the same genes differ by a systematic
//! batch effect. Pairs of cells that are each other's nearest neighbour
//! across batches (MNN pairs) are assumed to be the same biological state,
//! so the difference between them estimates the batch effect locally.
//! This crate turns those local estimates into a smooth per-cell correction.
//! Finding the pairs is left to the caller.
//!
//! **How the smoother works:**
//!
//! 1. Average the correction vectors of all pairs sharing an anchor cell.
//! 2. For each anchor, compute `-d²/σ²` to every cell (log space).
//! 3. Divide each anchor's kernel by its mass on the anchor set (density).
//! 4. Blend the anchor averages with these weights and normalise per cell.
//!
//! ## Quick Start
//!
//! ```rust
//! use mnn_rs::prelude::*;
//!
//! // 2 genes × 3 cells, column-major
//! let data = DenseMatrix::from_cols(&[[0.0_f64, 0.0], [1.0, 0.0], [2.0, 0.0]])?;
//! // 2 MNN pairs attached to cell 0 and cell 2, 2 genes each
//! let vect = DenseMatrix::from_rows(&[[1.0, 0.0], [3.0, 0.0]])?;
//!
//! let kernels = MnnKernel::new().sigma(1.0).build()?;
//! let smoothed = kernels.smooth_gaussian_kernel(&vect, &[0, 2], &data)?;
//!
//! // The middle cell is equidistant from both anchors.
//! assert!((smoothed.column(1)[0] - 2.0).abs() < 1e-12);
//! # Result::<(), MnnError>::Ok(())
//! ```
//!
//! ### Variance adjustment
//!
//! ```rust
//! use mnn_rs::prelude::*;
//!
//! let reference = DenseMatrix::from_cols(&[[0.0, 0.0], [2.0, 0.0], [4.0, 0.0]])?;
//! let target = DenseMatrix::from_cols(&[[1.0, 0.0], [1.5, 0.0]])?;
//! let directions = DenseMatrix::from_rows(&[[2.0, 0.0], [2.0, 0.0]])?;
//!
//! let scale = adjust_shift_variance(&reference, &target, &directions, 1.0)?;
//! assert_eq!(scale.len(), 2);
//! # Result::<(), MnnError>::Ok(())
//! ```
//!
//! ## Result and Error Handling
//!
//! Structural problems (mismatched shapes, out-of-range anchors, a
//! non-positive `sigma`) are reported as [`MnnError`](prelude::MnnError)
//! before any computation starts. Degenerate geometry is *not* an error:
//!
//! - no anchors → every smoothed column is NaN;
//! - a zero direction row → that cell's scale is NaN;
//! - an empty reference batch → every scale is NaN.
//!
//! Callers are expected to check for NaN explicitly.
//!
//! ## Sparse and chunked inputs
//!
//! The kernels only need random column and row reads, expressed by the
//! [`MatrixAccess`](prelude::MatrixAccess) trait. [`DenseMatrix`](prelude::DenseMatrix)
//! and [`CscMatrix`](prelude::CscMatrix) implement it; other storages can too.
//!
//! ## Features
//!
//! - `std` (default): standard library support.
//! - `parallel`: rayon-backed execution, enabled per call with `.parallel(true)`.
//!
//! ## Minimal Usage (no_std)
//!
//! ```toml
//! [dependencies]
//! mnn-rs = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]

#[cfg(not(feature = "std"))]
#[macro_use]
extern crate alloc;

// ============================================================================
// Internal Modules
// ============================================================================

// Layer 1: Primitives - data structures and basic utilities.
//
// Contains the error type, matrix storage with its access trait,
// and reusable scratch buffers.
mod primitives;

// Layer 2: Math - pure mathematical functions.
//
// Contains distance geometry and log-space kernel arithmetic.
mod math;

// Layer 3: Algorithms - core kernels.
//
// Contains anchor averaging, Gaussian smoothing and quantile matching.
mod algorithms;

// Layer 4: Engine - orchestration and execution control.
//
// Contains validation, sequential/parallel drivers and result assembly.
mod engine;

// High-level fluent API.
//
// Provides the `MnnKernel` builder and the call-style operations.
mod api;

// ============================================================================
// Prelude
// ============================================================================

/// Standard prelude.
///
/// ```
/// use mnn_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        CscMatrix, DenseMatrix,
        IndexBase::{OneBased, ZeroBased},
        IndexBase, MatrixAccess, MnnError, MnnKernelBuilder as MnnKernel, MnnKernels,
        SmoothedCorrection, VarianceAdjustment, adjust_shift_variance, smooth_gaussian_kernel,
    };
}

pub use api::{adjust_shift_variance, smooth_gaussian_kernel};

// ============================================================================
// Testing re-exports
// ============================================================================

/// Internal modules for development and testing.
///
/// This module re-exports internal modules for development and testing purposes.
/// It is only available with the `dev` feature enabled.
///
/// **Warning**: These are internal implementation details and may change without notice.
/// Do not use in production code.
#[cfg(feature = "dev")]
pub mod internals {
    /// Internal primitive types and utilities.
    pub mod primitives {
        pub use crate::primitives::*;
    }
    /// Internal math functions.
    pub mod math {
        pub use crate::math::*;
    }
    /// Internal core algorithms.
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    /// Internal execution engine.
    pub mod engine {
        pub use crate::engine::*;
    }
    /// Internal API.
    pub mod api {
        pub use crate::api::*;
    }
}
