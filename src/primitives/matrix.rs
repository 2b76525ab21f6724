//! Matrix storage and access for expression and correction data.
//!
//! ## Purpose
//!
//! This module defines the minimal access capability the kernels need from
//! a matrix (random column read, random row read) and two concrete
//! storages implementing it: a dense column-major buffer and a compressed
//! sparse column buffer.
//!
//! ## Design notes
//!
//! * **Zero-copy where possible**: `get_col`/`get_row` take a caller-owned
//!   work buffer and return a slice that either borrows the matrix storage
//!   directly (dense columns) or the work buffer once filled.
//! * **Column-major**: Cells are columns of the expression matrix, so the
//!   hot loops walk columns.
//! * **Generics**: Storage is generic over the element type; the kernels
//!   further constrain it to `Float`.
//!
//! ## Invariants
//!
//! * `DenseMatrix::data.len() == nrow * ncol`.
//! * `CscMatrix` column pointers are non-decreasing, end at `nnz`, and row
//!   indices are strictly increasing within a column and `< nrow`.
//!
//! ## Non-goals
//!
//! * This module does not provide arithmetic beyond element access.
//! * This module does not read matrices from files.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{format, vec::Vec};
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Zero;

// Internal dependencies
use crate::primitives::errors::MnnError;

// ============================================================================
// Access Capability
// ============================================================================

/// Random row/column read access to a numeric matrix.
///
/// `work` must be at least `nrow()` long for `get_col` and at least
/// `ncol()` long for `get_row`. The returned slice has exactly that length.
pub trait MatrixAccess<T: Copy> {
    /// Number of rows.
    fn nrow(&self) -> usize;

    /// Number of columns.
    fn ncol(&self) -> usize;

    /// Read column `col`, possibly through `work`.
    fn get_col<'a>(&'a self, col: usize, work: &'a mut [T]) -> &'a [T];

    /// Read row `row`, possibly through `work`.
    fn get_row<'a>(&'a self, row: usize, work: &'a mut [T]) -> &'a [T];
}

impl<T: Copy, M: MatrixAccess<T> + ?Sized> MatrixAccess<T> for &M {
    #[inline]
    fn nrow(&self) -> usize {
        (**self).nrow()
    }

    #[inline]
    fn ncol(&self) -> usize {
        (**self).ncol()
    }

    #[inline]
    fn get_col<'a>(&'a self, col: usize, work: &'a mut [T]) -> &'a [T] {
        (**self).get_col(col, work)
    }

    #[inline]
    fn get_row<'a>(&'a self, row: usize, work: &'a mut [T]) -> &'a [T] {
        (**self).get_row(row, work)
    }
}

// ============================================================================
// Dense Column-Major Matrix
// ============================================================================

/// Dense column-major matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T> {
    nrow: usize,
    ncol: usize,
    data: Vec<T>,
}

impl<T: Copy> DenseMatrix<T> {
    /// Wrap a column-major buffer.
    pub fn from_col_major(nrow: usize, ncol: usize, data: Vec<T>) -> Result<Self, MnnError> {
        let expected = nrow * ncol;
        if data.len() != expected {
            return Err(MnnError::DimensionMismatch {
                what: "buffer length vs nrow * ncol",
                expected,
                got: data.len(),
            });
        }
        Ok(Self { nrow, ncol, data })
    }

    /// Build from a row-major buffer, transposing into column-major storage.
    pub fn from_row_major(nrow: usize, ncol: usize, data: &[T]) -> Result<Self, MnnError> {
        let expected = nrow * ncol;
        if data.len() != expected {
            return Err(MnnError::DimensionMismatch {
                what: "buffer length vs nrow * ncol",
                expected,
                got: data.len(),
            });
        }
        let mut out = Vec::with_capacity(expected);
        for c in 0..ncol {
            for r in 0..nrow {
                out.push(data[r * ncol + c]);
            }
        }
        Ok(Self {
            nrow,
            ncol,
            data: out,
        })
    }

    /// Build from a list of equally long rows.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self, MnnError> {
        let nrow = rows.len();
        let ncol = rows.first().map_or(0, |r| r.as_ref().len());
        let mut flat = Vec::with_capacity(nrow * ncol);
        for row in rows {
            let row = row.as_ref();
            if row.len() != ncol {
                return Err(MnnError::DimensionMismatch {
                    what: "row lengths",
                    expected: ncol,
                    got: row.len(),
                });
            }
            flat.extend_from_slice(row);
        }
        Self::from_row_major(nrow, ncol, &flat)
    }

    /// Build from a list of equally long columns.
    pub fn from_cols<C: AsRef<[T]>>(cols: &[C]) -> Result<Self, MnnError> {
        let ncol = cols.len();
        let nrow = cols.first().map_or(0, |c| c.as_ref().len());
        let mut flat = Vec::with_capacity(nrow * ncol);
        for col in cols {
            let col = col.as_ref();
            if col.len() != nrow {
                return Err(MnnError::DimensionMismatch {
                    what: "column lengths",
                    expected: nrow,
                    got: col.len(),
                });
            }
            flat.extend_from_slice(col);
        }
        Ok(Self {
            nrow,
            ncol,
            data: flat,
        })
    }

    /// Element at (`row`, `col`).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[col * self.nrow + row]
    }

    /// Borrow column `col`.
    #[inline]
    pub fn column(&self, col: usize) -> &[T] {
        let start = col * self.nrow;
        &self.data[start..start + self.nrow]
    }

    /// Mutably borrow column `col`.
    #[inline]
    pub fn column_mut(&mut self, col: usize) -> &mut [T] {
        let start = col * self.nrow;
        &mut self.data[start..start + self.nrow]
    }

    /// Iterate over columns.
    pub fn columns(&self) -> impl Iterator<Item = &[T]> {
        (0..self.ncol).map(move |c| self.column(c))
    }

    /// Column-major storage.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable column-major storage.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the matrix and return its column-major storage.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Number of rows.
    #[inline]
    pub fn nrow(&self) -> usize {
        self.nrow
    }

    /// Number of columns.
    #[inline]
    pub fn ncol(&self) -> usize {
        self.ncol
    }
}

impl<T: Copy + Zero> DenseMatrix<T> {
    /// Zero-filled matrix.
    pub fn zeros(nrow: usize, ncol: usize) -> Self {
        Self {
            nrow,
            ncol,
            data: vec![T::zero(); nrow * ncol],
        }
    }
}

impl<T: Copy> MatrixAccess<T> for DenseMatrix<T> {
    #[inline]
    fn nrow(&self) -> usize {
        self.nrow
    }

    #[inline]
    fn ncol(&self) -> usize {
        self.ncol
    }

    #[inline]
    fn get_col<'a>(&'a self, col: usize, _work: &'a mut [T]) -> &'a [T] {
        self.column(col)
    }

    fn get_row<'a>(&'a self, row: usize, work: &'a mut [T]) -> &'a [T] {
        let out = &mut work[..self.ncol];
        for (c, slot) in out.iter_mut().enumerate() {
            *slot = self.data[c * self.nrow + row];
        }
        out
    }
}

// ============================================================================
// Compressed Sparse Column Matrix
// ============================================================================

/// Compressed sparse column matrix.
///
/// Single-cell count matrices are mostly zeros; this storage keeps only the
/// non-zero entries of each cell's column.
#[derive(Debug, Clone, PartialEq)]
pub struct CscMatrix<T> {
    nrow: usize,
    ncol: usize,
    col_ptr: Vec<usize>,
    row_idx: Vec<usize>,
    values: Vec<T>,
}

impl<T: Copy + Zero> CscMatrix<T> {
    /// Build from raw CSC arrays, validating their structure.
    pub fn new(
        nrow: usize,
        ncol: usize,
        col_ptr: Vec<usize>,
        row_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self, MnnError> {
        if col_ptr.len() != ncol + 1 {
            return Err(MnnError::DimensionMismatch {
                what: "column pointer length vs ncol + 1",
                expected: ncol + 1,
                got: col_ptr.len(),
            });
        }
        if row_idx.len() != values.len() {
            return Err(MnnError::DimensionMismatch {
                what: "row indices vs values",
                expected: row_idx.len(),
                got: values.len(),
            });
        }
        if col_ptr[0] != 0 || col_ptr[ncol] != values.len() {
            return Err(MnnError::InvalidInput(format!(
                "column pointers must start at 0 and end at {}",
                values.len()
            )));
        }
        // Pointers must be monotone before any of them is used to slice.
        if let Some(c) = col_ptr.windows(2).position(|w| w[0] > w[1]) {
            return Err(MnnError::InvalidInput(format!(
                "column pointers decrease at column {}",
                c
            )));
        }
        for c in 0..ncol {
            let rows = &row_idx[col_ptr[c]..col_ptr[c + 1]];
            if rows.iter().any(|&r| r >= nrow) || rows.windows(2).any(|w| w[0] >= w[1]) {
                return Err(MnnError::InvalidInput(format!(
                    "row indices of column {} must be strictly increasing and < {}",
                    c, nrow
                )));
            }
        }
        Ok(Self {
            nrow,
            ncol,
            col_ptr,
            row_idx,
            values,
        })
    }

    /// Compress a dense matrix, dropping exact zeros.
    pub fn from_dense(dense: &DenseMatrix<T>) -> Self
    where
        T: PartialEq,
    {
        let mut col_ptr = Vec::with_capacity(dense.ncol() + 1);
        let mut row_idx = Vec::new();
        let mut values = Vec::new();
        col_ptr.push(0);
        for col in dense.columns() {
            for (r, &v) in col.iter().enumerate() {
                if v != T::zero() {
                    row_idx.push(r);
                    values.push(v);
                }
            }
            col_ptr.push(values.len());
        }
        Self {
            nrow: dense.nrow(),
            ncol: dense.ncol(),
            col_ptr,
            row_idx,
            values,
        }
    }

    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }
}

impl<T: Copy + Zero> MatrixAccess<T> for CscMatrix<T> {
    #[inline]
    fn nrow(&self) -> usize {
        self.nrow
    }

    #[inline]
    fn ncol(&self) -> usize {
        self.ncol
    }

    fn get_col<'a>(&'a self, col: usize, work: &'a mut [T]) -> &'a [T] {
        let out = &mut work[..self.nrow];
        out.fill(T::zero());
        let (start, end) = (self.col_ptr[col], self.col_ptr[col + 1]);
        for (&r, &v) in self.row_idx[start..end].iter().zip(&self.values[start..end]) {
            out[r] = v;
        }
        out
    }

    fn get_row<'a>(&'a self, row: usize, work: &'a mut [T]) -> &'a [T] {
        let out = &mut work[..self.ncol];
        for (c, slot) in out.iter_mut().enumerate() {
            let (start, end) = (self.col_ptr[c], self.col_ptr[c + 1]);
            *slot = match self.row_idx[start..end].binary_search(&row) {
                Ok(pos) => self.values[start + pos],
                Err(_) => T::zero(),
            };
        }
        out
    }
}
