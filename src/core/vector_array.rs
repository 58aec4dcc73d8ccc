//! Column-oriented arrays of full-order (or reduced) vectors.
//!
//! A [`VectorArray`] is a `faer::Mat<f64>` whose columns are the vectors of the array. It grows by
//! appending columns and never reorders them, which is what the reduced basis, the residual range
//! and the Riesz-representative blocks of the estimators rely on.

use crate::core::traits::InnerProduct;
use crate::error::RbError;
use faer::{Mat, MatRef};
use std::ops::Range;

/// An ordered collection of vectors of common dimension, stored as matrix columns.
#[derive(Clone, Debug)]
pub struct VectorArray {
    data: Mat<f64>,
}

impl VectorArray {
    /// An array of length zero in a space of dimension `dim`.
    pub fn empty(dim: usize) -> Self {
        Self { data: Mat::zeros(dim, 0) }
    }

    /// Wrap a matrix; its columns become the vectors.
    pub fn from_mat(data: Mat<f64>) -> Self {
        Self { data }
    }

    /// An array holding the single vector `v`.
    pub fn from_vec(v: &[f64]) -> Self {
        Self { data: Mat::from_fn(v.len(), 1, |i, _| v[i]) }
    }

    /// Build an array from explicit columns, all of length `dim`.
    pub fn from_columns(dim: usize, columns: &[Vec<f64>]) -> Result<Self, RbError> {
        if let Some(bad) = columns.iter().find(|c| c.len() != dim) {
            return Err(RbError::DimensionMismatch { expected: dim, found: bad.len() });
        }
        Ok(Self { data: Mat::from_fn(dim, columns.len(), |i, j| columns[j][i]) })
    }

    /// Dimension of the space the vectors live in.
    pub fn dim(&self) -> usize {
        self.data.nrows()
    }

    /// Number of vectors.
    pub fn len(&self) -> usize {
        self.data.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_mat(&self) -> &Mat<f64> {
        &self.data
    }

    pub fn as_ref(&self) -> MatRef<'_, f64> {
        self.data.as_ref()
    }

    pub fn into_mat(self) -> Mat<f64> {
        self.data
    }

    /// Copy of the `j`-th vector.
    pub fn column(&self, j: usize) -> Vec<f64> {
        (0..self.dim()).map(|i| self.data[(i, j)]).collect()
    }

    /// Copy of the vectors with indices in `range`.
    pub fn columns(&self, range: Range<usize>) -> VectorArray {
        let start = range.start;
        let n = range.len();
        Self { data: Mat::from_fn(self.dim(), n, |i, j| self.data[(i, start + j)]) }
    }

    /// Append the vectors of `other` after the existing ones.
    pub fn append(&mut self, other: &VectorArray) -> Result<(), RbError> {
        if other.dim() != self.dim() {
            return Err(RbError::DimensionMismatch { expected: self.dim(), found: other.dim() });
        }
        if other.is_empty() {
            return Ok(());
        }
        let old = self.len();
        let data = &self.data;
        let merged = Mat::from_fn(self.dim(), old + other.len(), |i, j| {
            if j < old { data[(i, j)] } else { other.data[(i, j - old)] }
        });
        self.data = merged;
        Ok(())
    }

    /// Euclidean Gram matrix `selfᵀ · other`.
    pub fn dot(&self, other: &VectorArray) -> Mat<f64> {
        assert_eq!(self.dim(), other.dim(), "VectorArray::dot: dimension mismatch");
        if self.dim() == 0 {
            return Mat::zeros(self.len(), other.len());
        }
        self.data.transpose() * other.data.as_ref()
    }

    /// Euclidean norm of each vector.
    pub fn l2_norms(&self) -> Vec<f64> {
        let ip = ();
        (0..self.len()).map(|j| ip.norm(&self.column(j))).collect()
    }

    /// `alpha` times every vector.
    pub fn scaled(&self, alpha: f64) -> VectorArray {
        Self { data: Mat::from_fn(self.dim(), self.len(), |i, j| alpha * self.data[(i, j)]) }
    }

    /// Linear combination `self · coefficients` of the vectors, one combination per column of
    /// `coefficients`.
    pub fn lincomb(&self, coefficients: MatRef<'_, f64>) -> Result<VectorArray, RbError> {
        if coefficients.nrows() != self.len() {
            return Err(RbError::DimensionMismatch { expected: self.len(), found: coefficients.nrows() });
        }
        if self.is_empty() {
            return Ok(Self { data: Mat::zeros(self.dim(), coefficients.ncols()) });
        }
        Ok(Self { data: self.data.as_ref() * coefficients })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample() -> VectorArray {
        VectorArray::from_columns(3, &[vec![1.0, 0.0, 2.0], vec![0.0, 3.0, 4.0]]).unwrap()
    }

    #[test]
    fn append_keeps_order() {
        let mut a = sample();
        a.append(&VectorArray::from_vec(&[7.0, 8.0, 9.0])).unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(a.column(0), vec![1.0, 0.0, 2.0]);
        assert_eq!(a.column(2), vec![7.0, 8.0, 9.0]);
        assert_eq!(a.columns(1..3).column(0), vec![0.0, 3.0, 4.0]);
    }

    #[test]
    fn append_rejects_other_space() {
        let mut a = sample();
        let err = a.append(&VectorArray::from_vec(&[1.0])).unwrap_err();
        assert_eq!(err, RbError::DimensionMismatch { expected: 3, found: 1 });
    }

    #[test]
    fn dot_is_gram_matrix() {
        let a = sample();
        let g = a.dot(&a);
        assert_abs_diff_eq!(g[(0, 0)], 5.0, epsilon = 1e-14);
        assert_abs_diff_eq!(g[(0, 1)], 8.0, epsilon = 1e-14);
        assert_abs_diff_eq!(g[(1, 0)], 8.0, epsilon = 1e-14);
        assert_abs_diff_eq!(g[(1, 1)], 25.0, epsilon = 1e-14);
        assert_eq!(VectorArray::empty(3).dot(&a).nrows(), 0);
    }

    #[test]
    fn norms_and_lincomb() {
        let a = sample();
        let norms = a.l2_norms();
        assert_abs_diff_eq!(norms[1], 5.0, epsilon = 1e-14);
        let c = Mat::from_fn(2, 1, |i, _| if i == 0 { 2.0 } else { -1.0 });
        let v = a.lincomb(c.as_ref()).unwrap();
        assert_eq!(v.column(0), vec![2.0, -3.0, 0.0]);
        assert_eq!(a.scaled(-1.0).column(0), vec![-1.0, 0.0, -2.0]);
    }
}
