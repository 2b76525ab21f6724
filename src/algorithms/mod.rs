//! Layer 3: Algorithms
//!
//! Core MNN correction kernels.
//!
//! This layer implements the per-anchor and per-cell logic of the two
//! kernels. It is orchestrated by the engine layer, which owns validation,
//! buffers and the choice between sequential and parallel execution.
//!
//! # Architecture
//!
//! ```text
//! Layer 5: API
//!   ↓
//! Layer 4: Engine (executor, output, validator)
//!   ↓
//! Layer 3: Algorithms ← You are here
//!   ↓
//! Layer 2: Math (distance, logspace)
//!   ↓
//! Layer 1: Primitives (errors, matrix, buffer)
//! ```

/// Per-anchor averaging of correction vectors.
pub mod aggregate;

/// Gaussian kernel smoothing of anchor averages across all cells.
///
/// Provides:
/// - Per-anchor log-probabilities and density
/// - A mergeable accumulator for the weighted blend
pub mod smoothing;

/// Quantile matching along per-cell directions.
///
/// Provides:
/// - Weighted empirical quantile lookup
/// - The per-cell variance adjustment
pub mod quantile;
