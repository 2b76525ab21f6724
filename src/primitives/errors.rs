//! Error types for MNN correction kernels.
//!
//! ## Purpose
//!
//! This module defines the error type returned by every fallible operation
//! in the crate. Errors are raised before any numeric work begins, so a
//! failed call never produces partial results.
//!
//! ## Design notes
//!
//! * **no_std**: `Display` is implemented by hand; `std::error::Error` is
//!   only implemented when the `std` feature is enabled.
//! * **Structured**: Variants carry the quantities that disagreed so callers
//!   can report them without parsing messages.
//!
//! ## Key concepts
//!
//! * **Structural errors**: Shape mismatches between paired inputs.
//! * **Parameter errors**: Non-positive or non-finite bandwidth.
//! * **Soft degeneracy**: Zero-norm directions, empty anchor sets and empty
//!   reference batches are *not* errors; they propagate as NaN.
//!
//! ## Non-goals
//!
//! * This module does not perform validation (handled by `validator`).

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(feature = "std")]
use std::string::String;

use core::fmt;

// ============================================================================
// Error Type
// ============================================================================

/// Errors raised by the smoothing and variance-adjustment operations.
#[derive(Debug, Clone, PartialEq)]
pub enum MnnError {
    /// Two paired quantities disagree (e.g. rows of `vect` vs length of `index`).
    DimensionMismatch {
        /// Description of the two quantities being compared.
        what: &'static str,
        /// Size implied by the first quantity.
        expected: usize,
        /// Size actually observed in the second quantity.
        got: usize,
    },

    /// The kernel bandwidth is not a positive finite number.
    InvalidSigma(f64),

    /// An anchor id does not address a column of the expression matrix.
    AnchorOutOfBounds {
        /// Offending anchor id (after index-base adjustment).
        index: usize,
        /// Number of cells available.
        n_cells: usize,
    },

    /// An anchor id is not valid under the configured index base.
    InvalidIndex(usize),

    /// A required builder parameter was never set.
    MissingParameter(&'static str),

    /// A builder parameter was set more than once.
    DuplicateParameter {
        /// Name of the duplicated parameter.
        parameter: &'static str,
    },

    /// Free-form invalid input.
    InvalidInput(String),
}

impl fmt::Display for MnnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MnnError::DimensionMismatch {
                what,
                expected,
                got,
            } => write!(
                f,
                "Dimension mismatch: {} (expected {}, got {})",
                what, expected, got
            ),
            MnnError::InvalidSigma(sigma) => {
                write!(f, "Invalid sigma: {} (must be > 0 and finite)", sigma)
            }
            MnnError::AnchorOutOfBounds { index, n_cells } => write!(
                f,
                "Anchor index {} out of bounds for {} cells",
                index, n_cells
            ),
            MnnError::InvalidIndex(index) => {
                write!(f, "Invalid anchor index: {} (one-based ids start at 1)", index)
            }
            MnnError::MissingParameter(name) => {
                write!(f, "Missing required parameter: {}", name)
            }
            MnnError::DuplicateParameter { parameter } => write!(
                f,
                "Parameter '{}' was set multiple times. Each parameter can only be configured once.",
                parameter
            ),
            MnnError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MnnError {}
