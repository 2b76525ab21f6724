#![cfg(feature = "dev")]

use mnn_rs::internals::engine::executor::IndexBase;
use mnn_rs::internals::engine::validator::Validator;
use mnn_rs::internals::primitives::errors::MnnError;

// ============================================================================
// Parameter Validation
// ============================================================================

#[test]
fn test_validate_sigma() {
    assert!(Validator::validate_sigma(1.0).is_ok());
    assert!(Validator::validate_sigma(1e-6f32).is_ok());

    assert_eq!(
        Validator::validate_sigma(0.0),
        Err(MnnError::InvalidSigma(0.0))
    );
    assert_eq!(
        Validator::validate_sigma(-2.0),
        Err(MnnError::InvalidSigma(-2.0))
    );
    assert!(matches!(
        Validator::validate_sigma(f64::NAN),
        Err(MnnError::InvalidSigma(_))
    ));
    assert!(matches!(
        Validator::validate_sigma(f64::INFINITY),
        Err(MnnError::InvalidSigma(_))
    ));
}

#[test]
fn test_validate_required_and_duplicates() {
    assert_eq!(Validator::validate_required(Some(2.0), "sigma"), Ok(2.0));
    assert_eq!(
        Validator::validate_required::<f64>(None, "sigma"),
        Err(MnnError::MissingParameter("sigma"))
    );

    assert!(Validator::validate_no_duplicates(None).is_ok());
    assert_eq!(
        Validator::validate_no_duplicates(Some("parallel")),
        Err(MnnError::DuplicateParameter {
            parameter: "parallel"
        })
    );
}

// ============================================================================
// Smoothing Inputs
// ============================================================================

#[test]
fn test_validate_pairs() {
    assert!(Validator::validate_pairs(2, 2).is_ok());
    assert!(Validator::validate_pairs(0, 0).is_ok());
    assert_eq!(
        Validator::validate_pairs(3, 2),
        Err(MnnError::DimensionMismatch {
            what: "rows of 'vect' vs length of 'index'",
            expected: 3,
            got: 2,
        })
    );
}

#[test]
fn test_validate_anchor_ids() {
    assert!(Validator::validate_one_based(&[1, 5, 2]).is_ok());
    assert_eq!(
        Validator::validate_one_based(&[3, 0, 1]),
        Err(MnnError::InvalidIndex(0))
    );

    assert!(Validator::validate_anchor_bounds(&[0, 4], 5).is_ok());
    assert!(Validator::validate_anchor_bounds(&[], 0).is_ok());
    assert_eq!(
        Validator::validate_anchor_bounds(&[0, 5, 9], 5),
        Err(MnnError::AnchorOutOfBounds {
            index: 5,
            n_cells: 5
        })
    );
}

#[test]
fn test_index_base_resolve() {
    let ids = [1, 3, 3];
    assert_eq!(&*IndexBase::ZeroBased.resolve(&ids).unwrap(), &[1, 3, 3]);
    assert_eq!(&*IndexBase::OneBased.resolve(&ids).unwrap(), &[0, 2, 2]);
    assert_eq!(
        IndexBase::OneBased.resolve(&[0]).unwrap_err(),
        MnnError::InvalidIndex(0)
    );
    assert_eq!(IndexBase::default(), IndexBase::ZeroBased);
}

// ============================================================================
// Adjustment Inputs
// ============================================================================

#[test]
fn test_validate_adjustment_shapes() {
    assert!(Validator::validate_adjustment_shapes((3, 10), (3, 4), (4, 3)).is_ok());
    assert!(Validator::validate_adjustment_shapes((3, 0), (3, 0), (0, 3)).is_ok());

    assert_eq!(
        Validator::validate_adjustment_shapes((3, 10), (2, 4), (4, 3)),
        Err(MnnError::DimensionMismatch {
            what: "genes in 'data1' vs genes in 'data2'",
            expected: 3,
            got: 2,
        })
    );
    assert_eq!(
        Validator::validate_adjustment_shapes((3, 10), (3, 4), (4, 2)),
        Err(MnnError::DimensionMismatch {
            what: "genes in 'data1' vs columns of 'vect'",
            expected: 3,
            got: 2,
        })
    );
    assert_eq!(
        Validator::validate_adjustment_shapes((3, 10), (3, 4), (5, 3)),
        Err(MnnError::DimensionMismatch {
            what: "cells in 'data2' vs rows of 'vect'",
            expected: 4,
            got: 5,
        })
    );
}
