#![cfg(feature = "dev")]

use approx::assert_relative_eq;

use mnn_rs::internals::algorithms::quantile::{
    CellAdjustment, adjust_cell, sort_by_projection, weighted_quantile,
};
use mnn_rs::internals::primitives::buffer::AdjustmentBuffer;
use mnn_rs::internals::primitives::matrix::DenseMatrix;

// ============================================================================
// Weighted Quantiles
// ============================================================================

#[test]
fn test_sort_by_projection() {
    let mut pairs = vec![(2.0, 0.5), (1.0, 1.0), (2.0, 0.1), (-3.0, 0.0)];
    sort_by_projection(&mut pairs);
    assert_eq!(pairs, vec![(-3.0, 0.0), (1.0, 1.0), (2.0, 0.1), (2.0, 0.5)]);
}

#[test]
fn test_weighted_quantile() {
    let sorted = [(1.0, 1.0), (2.0, 1.0), (3.0, 2.0)];
    assert_eq!(weighted_quantile(&sorted, 0.0), 1.0);
    assert_eq!(weighted_quantile(&sorted, 1.0), 1.0);
    assert_eq!(weighted_quantile(&sorted, 1.5), 2.0);
    assert_eq!(weighted_quantile(&sorted, 2.0), 2.0);
    assert_eq!(weighted_quantile(&sorted, 4.0), 3.0);
}

#[test]
fn test_weighted_quantile_falls_back_to_last() {
    let sorted = [(1.0, 1.0), (2.0, 1.0)];
    assert_eq!(weighted_quantile(&sorted, 2.0 + 1e-9), 2.0);
}

#[test]
fn test_weighted_quantile_empty_is_nan() {
    let empty: [(f64, f64); 0] = [];
    assert!(weighted_quantile(&empty, 0.5).is_nan());
}

#[test]
fn test_weighted_quantile_monotone_in_target() {
    let mut pairs = vec![(0.3, 0.2), (-1.0, 0.7), (2.5, 0.05), (1.1, 1.0), (0.0, 0.4)];
    sort_by_projection(&mut pairs);
    let total: f64 = pairs.iter().map(|p| p.1).sum();

    let mut previous = f64::NEG_INFINITY;
    for step in 0..=20 {
        let q = weighted_quantile(&pairs, total * step as f64 / 20.0);
        assert!(q >= previous);
        previous = q;
    }
}

// ============================================================================
// Per-Cell Adjustment
// ============================================================================

#[test]
fn test_adjust_cell_single_gene() {
    // With one gene every cell lies on the line, so all weights are 1.
    let reference = DenseMatrix::<f64>::from_cols(&[[10.0], [20.0], [30.0], [40.0]]).unwrap();
    let target = DenseMatrix::from_cols(&[[1.0], [2.0], [3.0]]).unwrap();
    let directions = DenseMatrix::from_rows(&[[2.0], [2.0], [2.0]]).unwrap();
    let mut buf = AdjustmentBuffer::new(1, 4);

    let expected = [(1.0 / 3.0, 20.0, 9.5), (2.0 / 3.0, 30.0, 14.0), (1.0, 40.0, 18.5)];
    for (cell, &(prob, quan, scale)) in expected.iter().enumerate() {
        let adj = adjust_cell(&reference, &target, &directions, cell, 1.0, &mut buf);
        assert_relative_eq!(adj.probability, prob, epsilon = 1e-12);
        assert_eq!(adj.quantile, quan);
        assert_relative_eq!(adj.scale, scale, epsilon = 1e-12);
    }
}

#[test]
fn test_adjust_cell_far_cells_carry_no_weight() {
    let target = DenseMatrix::<f64>::from_cols(&[[0.0, 0.0], [1.0, 0.0], [5.0, 100.0]]).unwrap();
    let reference = DenseMatrix::from_cols(&[[-1.0, 0.0], [3.0, 0.0], [-50.0, 100.0]]).unwrap();
    let directions = DenseMatrix::from_rows(&[[1.0, 0.0], [1.0, 0.0], [1.0, 0.0]]).unwrap();
    let mut buf = AdjustmentBuffer::new(2, 3);

    let adj = adjust_cell(&reference, &target, &directions, 0, 1.0, &mut buf);
    assert_relative_eq!(adj.probability, 0.5, epsilon = 1e-12);
    assert_eq!(adj.quantile, -1.0);
    assert_relative_eq!(adj.scale, -1.0, epsilon = 1e-12);
}

#[test]
fn test_adjust_cell_scale_uses_raw_norm() {
    let reference = DenseMatrix::<f64>::from_cols(&[[4.0, 0.0]]).unwrap();
    let target = DenseMatrix::from_cols(&[[0.0, 0.0]]).unwrap();
    let directions = DenseMatrix::from_rows(&[[0.0, -8.0]]).unwrap();
    let mut buf = AdjustmentBuffer::new(2, 1);

    // Direction along y: both cells project to 0, so no shift is needed.
    let adj = adjust_cell(&reference, &target, &directions, 0, 1.0, &mut buf);
    assert_eq!(adj.probability, 1.0);
    assert_relative_eq!(adj.scale, 0.0, epsilon = 1e-12);

    let directions = DenseMatrix::from_rows(&[[8.0, 0.0]]).unwrap();
    let adj = adjust_cell(&reference, &target, &directions, 0, 1.0, &mut buf);
    assert_relative_eq!(adj.quantile, 4.0);
    assert_relative_eq!(adj.scale, 0.5, epsilon = 1e-12);
}

#[test]
fn test_adjust_cell_zero_direction() {
    let reference = DenseMatrix::<f64>::from_cols(&[[1.0, 1.0]]).unwrap();
    let target = DenseMatrix::<f64>::from_cols(&[[0.0, 0.0], [1.0, 0.0]]).unwrap();
    let directions = DenseMatrix::<f64>::from_rows(&[[0.0, 0.0], [1.0, 0.0]]).unwrap();
    let mut buf = AdjustmentBuffer::<f64>::new(2, 1);

    let adj = adjust_cell(&reference, &target, &directions, 0, 1.0, &mut buf);
    assert!(adj.scale.is_nan());
    assert!(adj.probability.is_nan());

    // The buffer is still usable for the next cell.
    let adj = adjust_cell(&reference, &target, &directions, 1, 1.0, &mut buf);
    assert!(adj.scale.is_finite());
}

#[test]
fn test_adjust_cell_empty_reference() {
    let reference = DenseMatrix::<f64>::from_col_major(2, 0, vec![]).unwrap();
    let target = DenseMatrix::from_cols(&[[0.0, 0.0], [1.0, 0.0]]).unwrap();
    let directions = DenseMatrix::from_rows(&[[1.0, 0.0], [1.0, 0.0]]).unwrap();
    let mut buf = AdjustmentBuffer::new(2, 0);

    let adj = adjust_cell(&reference, &target, &directions, 1, 1.0, &mut buf);
    assert!(adj.scale.is_nan());
    assert!(adj.quantile.is_nan());
    assert_relative_eq!(adj.probability, 1.0, epsilon = 1e-12);
}

#[test]
fn test_self_weight_keeps_probability_positive() {
    let target = DenseMatrix::<f64>::from_cols(&[[5.0, 0.0], [0.0, 0.0], [1.0, 0.2], [2.0, -0.3]]).unwrap();
    let reference = DenseMatrix::from_cols(&[[0.0, 1.0], [1.0, 1.0]]).unwrap();
    let directions =
        DenseMatrix::from_rows(&[[1.0, 0.0], [1.0, 0.0], [1.0, 0.5], [0.2, 1.0]]).unwrap();
    let mut buf = AdjustmentBuffer::new(2, 2);

    for cell in 0..4 {
        let adj = adjust_cell(&reference, &target, &directions, cell, 1.0, &mut buf);
        assert!(adj.probability > 0.0);
        assert!(adj.probability <= 1.0);
    }

    // The largest projection along +x sees every same-batch cell below it.
    let adj = adjust_cell(&reference, &target, &directions, 0, 1.0, &mut buf);
    assert_relative_eq!(adj.probability, 1.0, epsilon = 1e-12);
}

#[test]
fn test_cell_adjustment_undefined() {
    let adj = CellAdjustment::<f32>::undefined();
    assert!(adj.scale.is_nan() && adj.probability.is_nan() && adj.quantile.is_nan());
}
