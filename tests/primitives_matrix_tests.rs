#![cfg(feature = "dev")]

use mnn_rs::internals::primitives::errors::MnnError;
use mnn_rs::internals::primitives::matrix::{CscMatrix, DenseMatrix, MatrixAccess};

fn sample() -> DenseMatrix<f64> {
    // 3 x 4, row-major input
    DenseMatrix::from_rows(&[
        [1.0, 0.0, 0.0, 2.0],
        [0.0, 0.0, 3.0, 0.0],
        [4.0, 5.0, 0.0, 6.0],
    ])
    .unwrap()
}

// ============================================================================
// Dense Matrix Tests
// ============================================================================

#[test]
fn test_dense_from_rows_is_column_major() {
    let m = sample();
    assert_eq!(m.nrow(), 3);
    assert_eq!(m.ncol(), 4);
    assert_eq!(
        m.as_slice(),
        &[1.0, 0.0, 4.0, 0.0, 0.0, 5.0, 0.0, 3.0, 0.0, 2.0, 0.0, 6.0]
    );
    assert_eq!(m.get(2, 1), 5.0);
    assert_eq!(m.column(3), &[2.0, 0.0, 6.0]);
}

#[test]
fn test_dense_from_cols() {
    let m = DenseMatrix::from_cols(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
    assert_eq!(m.nrow(), 2);
    assert_eq!(m.ncol(), 3);
    assert_eq!(m.get(1, 2), 6.0);
}

#[test]
fn test_dense_access_trait() {
    let m = sample();
    let mut col_buf = vec![0.0; 3];
    let mut row_buf = vec![0.0; 4];

    assert_eq!(MatrixAccess::get_col(&m, 0, &mut col_buf), &[1.0, 0.0, 4.0]);
    assert_eq!(MatrixAccess::get_row(&m, 2, &mut row_buf), &[4.0, 5.0, 0.0, 6.0]);
}

#[test]
fn test_dense_shape_errors() {
    let err = DenseMatrix::from_col_major(2, 3, vec![0.0; 5]).unwrap_err();
    assert_eq!(
        err,
        MnnError::DimensionMismatch {
            what: "buffer length vs nrow * ncol",
            expected: 6,
            got: 5,
        }
    );

    let rows: Vec<Vec<f64>> = vec![vec![1.0, 2.0], vec![3.0]];
    assert!(matches!(
        DenseMatrix::from_rows(&rows),
        Err(MnnError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_dense_zeros_and_mutation() {
    let mut m = DenseMatrix::<f64>::zeros(2, 2);
    m.column_mut(1)[0] = 7.0;
    assert_eq!(m.into_vec(), vec![0.0, 0.0, 7.0, 0.0]);
}

// ============================================================================
// CSC Matrix Tests
// ============================================================================

#[test]
fn test_csc_from_dense_matches_dense() {
    let dense = sample();
    let sparse = CscMatrix::from_dense(&dense);
    assert_eq!(sparse.nnz(), 6);

    let mut a = vec![0.0; 3];
    let mut b = vec![0.0; 3];
    for c in 0..4 {
        assert_eq!(sparse.get_col(c, &mut a), dense.get_col(c, &mut b));
    }

    let mut a = vec![0.0; 4];
    let mut b = vec![0.0; 4];
    for r in 0..3 {
        assert_eq!(sparse.get_row(r, &mut a), dense.get_row(r, &mut b));
    }
}

#[test]
fn test_csc_get_col_clears_previous_contents() {
    let sparse = CscMatrix::from_dense(&sample());
    let mut buf = vec![9.0; 3];
    assert_eq!(sparse.get_col(1, &mut buf), &[0.0, 0.0, 5.0]);
}

#[test]
fn test_csc_validation() {
    // Wrong column pointer length
    assert!(matches!(
        CscMatrix::<f64>::new(2, 2, vec![0, 1], vec![0], vec![1.0]),
        Err(MnnError::DimensionMismatch { .. })
    ));

    // Row index out of range
    assert!(matches!(
        CscMatrix::new(2, 1, vec![0, 1], vec![2], vec![1.0]),
        Err(MnnError::InvalidInput(_))
    ));

    // Unsorted rows within a column
    assert!(matches!(
        CscMatrix::new(3, 1, vec![0, 2], vec![2, 0], vec![1.0, 2.0]),
        Err(MnnError::InvalidInput(_))
    ));

    // Pointers not ending at nnz
    assert!(matches!(
        CscMatrix::new(3, 1, vec![0, 1], vec![0, 1], vec![1.0, 2.0]),
        Err(MnnError::InvalidInput(_))
    ));

    // Decreasing pointers that overshoot nnz mid-array
    assert!(matches!(
        CscMatrix::<f64>::new(2, 2, vec![0, 5, 2], vec![0, 1], vec![1.0, 2.0]),
        Err(MnnError::InvalidInput(_))
    ));
    assert!(matches!(
        CscMatrix::<f64>::new(2, 3, vec![0, 2, 1, 2], vec![0, 1], vec![1.0, 2.0]),
        Err(MnnError::InvalidInput(_))
    ));

    assert!(CscMatrix::new(3, 2, vec![0, 1, 2], vec![0, 2], vec![1.0, 2.0]).is_ok());
}
