//! Inner-product operators and Riesz representatives.
//!
//! A residual of the full-order system lives in the dual of the state space. Its dual norm with
//! respect to an inner product `(u, v)_P = uᵀ P v` is the `P`-norm of its Riesz representative
//! `P⁻¹ r`, and `rᵀ P⁻¹ r` is the squared dual norm. Without a configured product the Euclidean
//! inner product is used and the Riesz representative is the vector itself.

use crate::context::{RieszContext, RieszSolverKind};
use crate::core::vector_array::VectorArray;
use crate::error::RbError;
use crate::matrix::asymmetry;
use faer::Mat;
use std::fmt;

/// An SPD matrix `P` defining `(u, v)_P = uᵀ P v`, with a prepared inverse.
pub struct InnerProductOperator {
    context: RieszContext,
}

impl InnerProductOperator {
    /// Inner product given by `matrix`, inverted with a cached LU factorization.
    pub fn new(matrix: Mat<f64>) -> Result<Self, RbError> {
        Self::with_solver(matrix, RieszSolverKind::Lu)
    }

    /// Inner product given by `matrix`, inverted with the selected solver.
    pub fn with_solver(matrix: Mat<f64>, kind: RieszSolverKind) -> Result<Self, RbError> {
        if matrix.nrows() != matrix.ncols() {
            return Err(RbError::Precondition(format!(
                "inner product matrix must be square, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            )));
        }
        let scale = (0..matrix.nrows()).fold(0.0_f64, |m, i| m.max(matrix[(i, i)].abs()));
        if asymmetry(&matrix) > 1e-12 * scale.max(1.0) {
            return Err(RbError::Precondition("inner product matrix must be symmetric".into()));
        }
        Ok(Self { context: RieszContext::new(kind, matrix)? })
    }

    pub fn dim(&self) -> usize {
        self.context.matrix().nrows()
    }

    pub fn matrix(&self) -> &Mat<f64> {
        self.context.matrix()
    }

    /// `P · V`.
    pub fn apply(&self, v: &VectorArray) -> Result<VectorArray, RbError> {
        self.check_dim(v)?;
        if v.is_empty() || self.dim() == 0 {
            return Ok(VectorArray::from_mat(Mat::zeros(self.dim(), v.len())));
        }
        Ok(VectorArray::from_mat(self.matrix() * v.as_mat()))
    }

    /// `P⁻¹ · V`, one solve per vector.
    pub fn apply_inverse(&self, v: &VectorArray) -> Result<VectorArray, RbError> {
        self.check_dim(v)?;
        let mut columns = Vec::with_capacity(v.len());
        let mut x = Vec::with_capacity(self.dim());
        for j in 0..v.len() {
            self.context.solve_context(&v.column(j), &mut x)?;
            columns.push(x.clone());
        }
        VectorArray::from_columns(self.dim(), &columns)
    }

    /// Gram matrix `Aᵀ P B`.
    pub fn inner(&self, a: &VectorArray, b: &VectorArray) -> Result<Mat<f64>, RbError> {
        Ok(a.dot(&self.apply(b)?))
    }

    /// `xᵀ P y` for two single vectors.
    pub fn inner_vectors(&self, x: &[f64], y: &[f64]) -> f64 {
        let p = self.matrix();
        let mut sum = 0.0;
        for j in 0..p.ncols() {
            let mut col = 0.0;
            for i in 0..p.nrows() {
                col += x[i] * p[(i, j)];
            }
            sum += col * y[j];
        }
        sum
    }

    /// `P`-norm of each vector.
    pub fn norms(&self, v: &VectorArray) -> Result<Vec<f64>, RbError> {
        self.check_dim(v)?;
        Ok((0..v.len())
            .map(|j| {
                let c = v.column(j);
                self.inner_vectors(&c, &c).max(0.0).sqrt()
            })
            .collect())
    }

    fn check_dim(&self, v: &VectorArray) -> Result<(), RbError> {
        if v.dim() != self.dim() {
            return Err(RbError::DimensionMismatch { expected: self.dim(), found: v.dim() });
        }
        Ok(())
    }
}

impl fmt::Debug for InnerProductOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InnerProductOperator")
            .field("dim", &self.dim())
            .field("solver", &self.context.kind)
            .finish()
    }
}

/// Riesz representatives of the (dual) vectors `v`: `P⁻¹ v`, or a copy of `v` when no inner
/// product is configured.
pub fn riesz_representatives(
    product: Option<&InnerProductOperator>,
    v: &VectorArray,
) -> Result<VectorArray, RbError> {
    match product {
        Some(p) => p.apply_inverse(v),
        None => Ok(v.clone()),
    }
}
