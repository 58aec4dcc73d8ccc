//! Direct dense solver using Faer: LU with partial (row) pivoting.
//!
//! The factorization is computed once and cached, so that the many right-hand sides of a Riesz
//! assembly (one per affine component and basis vector) only pay for triangular solves.
//!
//! # References
//! - Faer documentation: https://github.com/sarah-ek/faer-rs
//! - Golub & Van Loan, Matrix Computations

use crate::error::RbError;
use crate::solver::LinearSolver;
use crate::utils::convergence::SolveStats;
use faer::linalg::solvers::{PartialPivLu, SolveCore};
use faer::traits::ComplexField;
use faer::{Conj, Mat, MatMut};

/// LU solver using partial pivoting from Faer.
///
/// Stores the LU factorization for reuse.
pub struct LuSolver<T: ComplexField> {
    /// Cached LU factorization (if computed)
    factor: Option<PartialPivLu<T>>,
    dim: usize,
}

impl<T: ComplexField + Copy> LuSolver<T> {
    /// Create a new LU solver (no factorization yet).
    pub fn new() -> Self {
        LuSolver { factor: None, dim: 0 }
    }

    /// Factorize `a`, replacing any previous factorization.
    pub fn factorize(&mut self, a: &Mat<T>) -> Result<(), RbError> {
        if a.nrows() != a.ncols() {
            return Err(RbError::FactorError(format!(
                "LU requires a square matrix, got {}x{}",
                a.nrows(),
                a.ncols()
            )));
        }
        self.factor = Some(PartialPivLu::new(a.as_ref()));
        self.dim = a.nrows();
        Ok(())
    }

    /// Solve using the cached LU factorization.
    ///
    /// # Arguments
    /// * `b` - Right-hand side vector
    /// * `x` - Output vector (solution)
    pub fn solve_cached(&self, b: &[T], x: &mut [T]) -> Result<(), RbError> {
        let factor = self
            .factor
            .as_ref()
            .ok_or_else(|| RbError::SolveError("LuSolver: solve_cached called before factorization".into()))?;
        if b.len() != self.dim || x.len() != self.dim {
            return Err(RbError::DimensionMismatch { expected: self.dim, found: b.len().max(x.len()) });
        }
        if self.dim == 0 {
            return Ok(());
        }
        x.copy_from_slice(b);
        let x_mat = MatMut::from_column_major_slice_mut(x, self.dim, 1);
        factor.solve_in_place_with_conj(Conj::No, x_mat);
        Ok(())
    }
}

impl<T: ComplexField + Copy> Default for LuSolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearSolver<Mat<f64>, Vec<f64>> for LuSolver<f64> {
    type Error = RbError;
    type Scalar = f64;

    /// Solve Ax = b using LU factorization (partial pivoting).
    ///
    /// A singular `a` surfaces as a non-finite solution and is reported as a solve error.
    fn solve(&mut self, a: &Mat<f64>, b: &Vec<f64>, x: &mut Vec<f64>) -> Result<SolveStats<f64>, RbError> {
        self.factorize(a)?;
        x.resize(b.len(), 0.0);
        self.solve_cached(b, x)?;
        if x.iter().any(|xi| !xi.is_finite()) {
            return Err(RbError::SolveError("LU solve produced non-finite values (singular matrix?)".into()));
        }
        Ok(SolveStats::direct())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lu_solver_solves_dense_system() {
        // 3x3 system: [[2,1,1],[1,3,2],[1,0,0]] x = [4,5,6]
        // True solution: [6,15,-23]
        let a = Mat::from_fn(3, 3, |i, j| match (i, j) {
            (0, 0) => 2.0, (0, 1) => 1.0, (0, 2) => 1.0,
            (1, 0) => 1.0, (1, 1) => 3.0, (1, 2) => 2.0,
            (2, 0) => 1.0,
            _ => 0.0,
        });
        let b = vec![4.0, 5.0, 6.0];
        let mut x = vec![0.0; 3];
        let mut solver = LuSolver::<f64>::new();
        let stats = solver.solve(&a, &b, &mut x).unwrap();
        let expected = [6.0, 15.0, -23.0];
        for (xi, ei) in x.iter().zip(expected.iter()) {
            assert!((xi - ei).abs() < 1e-10, "xi = {}, expected = {}", xi, ei);
        }
        assert!(stats.converged);
    }

    #[test]
    fn solves_laplacian_with_thirty_unknowns() {
        let n = 30;
        let a = Mat::from_fn(n, n, |i, j| match i.abs_diff(j) {
            0 => 2.0,
            1 => -1.0,
            _ => 0.0,
        });
        let mut x = Vec::new();
        LuSolver::<f64>::new().solve(&a, &vec![1.0; n], &mut x).unwrap();
        // tridiag(-1, 2, -1) x = 1 has x_i = (i + 1)(n - i) / 2
        for (i, xi) in x.iter().enumerate() {
            let exact = ((i + 1) * (n - i)) as f64 / 2.0;
            assert!((xi - exact).abs() < 1e-9 * exact, "x[{i}] = {xi}, expected {exact}");
        }
    }

    #[test]
    fn cached_solve_requires_factorization() {
        let solver = LuSolver::<f64>::new();
        let mut x = vec![0.0; 2];
        assert!(matches!(solver.solve_cached(&[1.0, 2.0], &mut x), Err(RbError::SolveError(_))));
    }

    #[test]
    fn rejects_rectangular_matrix() {
        let mut solver = LuSolver::<f64>::new();
        let a = Mat::<f64>::zeros(2, 3);
        assert!(matches!(solver.factorize(&a), Err(RbError::FactorError(_))));
    }
}
