//! Input validation for MNN correction configuration and data.
//!
//! ## Purpose
//!
//! This module checks the structural preconditions of both operations
//! (paired shapes, anchor ids, bandwidth) so that the kernels never see
//! inconsistent inputs and failed calls never produce partial results.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Efficiency**: Shape checks run before anything that touches data.
//! * **Generics**: Validation is generic over `Float` types.
//!
//! ## Key concepts
//!
//! * **Paired shapes**: `vect` rows vs `index` length; genes and cells
//!   across `data1`, `data2` and `vect`.
//! * **Anchor ids**: Must address a column of the expression matrix.
//!
//! ## Invariants
//!
//! * All validated inputs satisfy their respective constraints.
//! * Validation logic is deterministic and side-effect free.
//!
//! ## Non-goals
//!
//! * This module does not reject NaN in data; degenerate values propagate.
//! * This module does not transform inputs (index-base shifting is done by
//!   the executor).

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::MnnError;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for MNN correction configuration and input data.
///
/// All methods return `Result<(), MnnError>` and fail fast upon identifying
/// the first violation.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Parameter Validation
    // ========================================================================

    /// Validate the Gaussian kernel bandwidth.
    pub fn validate_sigma<T: Float>(sigma: T) -> Result<(), MnnError> {
        if !sigma.is_finite() || sigma <= T::zero() {
            return Err(MnnError::InvalidSigma(sigma.to_f64().unwrap_or(f64::NAN)));
        }
        Ok(())
    }

    /// Validate that a required parameter has been provided.
    pub fn validate_required<V>(value: Option<V>, name: &'static str) -> Result<V, MnnError> {
        value.ok_or(MnnError::MissingParameter(name))
    }

    /// Validate that no parameters were set multiple times in the builder.
    pub fn validate_no_duplicates(duplicate_param: Option<&'static str>) -> Result<(), MnnError> {
        if let Some(param) = duplicate_param {
            return Err(MnnError::DuplicateParameter { parameter: param });
        }
        Ok(())
    }

    // ========================================================================
    // Smoothing Inputs
    // ========================================================================

    /// Validate that there is one correction vector per anchor id.
    pub fn validate_pairs(n_vect_rows: usize, n_index: usize) -> Result<(), MnnError> {
        if n_vect_rows != n_index {
            return Err(MnnError::DimensionMismatch {
                what: "rows of 'vect' vs length of 'index'",
                expected: n_vect_rows,
                got: n_index,
            });
        }
        Ok(())
    }

    /// Validate that one-based anchor ids contain no zero.
    pub fn validate_one_based(index: &[usize]) -> Result<(), MnnError> {
        if let Some(&bad) = index.iter().find(|&&i| i == 0) {
            return Err(MnnError::InvalidIndex(bad));
        }
        Ok(())
    }

    /// Validate that every zero-based anchor id addresses a cell.
    pub fn validate_anchor_bounds(index: &[usize], n_cells: usize) -> Result<(), MnnError> {
        if let Some(&bad) = index.iter().find(|&&i| i >= n_cells) {
            return Err(MnnError::AnchorOutOfBounds {
                index: bad,
                n_cells,
            });
        }
        Ok(())
    }

    // ========================================================================
    // Adjustment Inputs
    // ========================================================================

    /// Validate the shapes of the reference batch, target batch and directions.
    ///
    /// * `reference`: (genes, cells) of `data1`.
    /// * `target`: (genes, cells) of `data2`.
    /// * `directions`: (rows, cols) of `vect`.
    pub fn validate_adjustment_shapes(
        reference: (usize, usize),
        target: (usize, usize),
        directions: (usize, usize),
    ) -> Result<(), MnnError> {
        let n_genes = reference.0;
        if target.0 != n_genes {
            return Err(MnnError::DimensionMismatch {
                what: "genes in 'data1' vs genes in 'data2'",
                expected: n_genes,
                got: target.0,
            });
        }
        if directions.1 != n_genes {
            return Err(MnnError::DimensionMismatch {
                what: "genes in 'data1' vs columns of 'vect'",
                expected: n_genes,
                got: directions.1,
            });
        }
        if directions.0 != target.1 {
            return Err(MnnError::DimensionMismatch {
                what: "cells in 'data2' vs rows of 'vect'",
                expected: target.1,
                got: directions.0,
            });
        }
        Ok(())
    }
}
