//! Factory for the inverse of an inner-product operator.
//!
//! This module provides the `RieszContext` struct, which holds an SPD inner-product matrix together
//! with the solver selected to invert it. Every Riesz representative computed by the estimators
//! goes through [`RieszContext::solve_context`].
//!
//! # Supported Solvers
//! - LU with partial pivoting (factorized once at construction)
//! - Conjugate Gradient (matrix-free, one Krylov solve per right-hand side)
//!
//! # References
//! - Saad, Y. (2003). Iterative Methods for Sparse Linear Systems. SIAM.

use crate::error::RbError;
use crate::solver::{CgSolver, LinearSolver, LuSolver};
use crate::utils::convergence::SolveStats;
use faer::Mat;

/// Enum representing the available inverse solvers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RieszSolverKind {
    /// LU factorization, reused for every right-hand side
    #[default]
    Lu,
    /// Conjugate Gradient (for SPD matrices)
    Cg { tol: f64, max_iters: usize },
}

/// The prepared inverse: a cached factorization or an iterative solver.
enum Inverse {
    Lu(LuSolver<f64>),
    Cg(CgSolver),
}

/// Context and configuration for solving `P x = b` with an inner-product matrix `P`.
pub struct RieszContext {
    /// The type of solver to use
    pub kind: RieszSolverKind,
    /// The inner-product matrix
    a: Mat<f64>,
    inverse: Inverse,
}

impl RieszContext {
    /// Set up the context, factorizing `a` when the LU solver is selected.
    pub fn new(kind: RieszSolverKind, a: Mat<f64>) -> Result<Self, RbError> {
        let inverse = match kind {
            RieszSolverKind::Lu => {
                let mut lu = LuSolver::new();
                lu.factorize(&a)?;
                Inverse::Lu(lu)
            }
            RieszSolverKind::Cg { tol, max_iters } => Inverse::Cg(CgSolver::new(tol, max_iters)),
        };
        Ok(Self { kind, a, inverse })
    }

    pub fn matrix(&self) -> &Mat<f64> {
        &self.a
    }

    /// Solve `P x = b` with the configured solver.
    ///
    /// # Returns
    /// * `Ok(SolveStats)` on success
    /// * `Err(RbError)` on breakdown, non-convergence or non-finite results
    pub fn solve_context(&self, b: &[f64], x: &mut Vec<f64>) -> Result<SolveStats<f64>, RbError> {
        x.clear();
        x.resize(b.len(), 0.0);
        let stats = match &self.inverse {
            Inverse::Lu(lu) => {
                lu.solve_cached(b, x)?;
                SolveStats::direct()
            }
            Inverse::Cg(cg) => {
                let mut solver = *cg;
                let stats = solver.solve(&self.a, &b.to_vec(), x)?;
                if !stats.converged {
                    return Err(RbError::SolveError(format!(
                        "CG did not converge in {} iterations (residual {:e})",
                        stats.iterations, stats.final_residual
                    )));
                }
                stats
            }
        };
        if x.iter().any(|xi| !xi.is_finite()) {
            return Err(RbError::SolveError("Riesz solve produced non-finite values".into()));
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::MatVec;
    use approx::assert_abs_diff_eq;

    fn laplace(n: usize) -> Mat<f64> {
        Mat::from_fn(n, n, |i, j| {
            if i == j {
                2.0
            } else if i.abs_diff(j) == 1 {
                -1.0
            } else {
                0.0
            }
        })
    }

    #[test]
    fn lu_and_cg_agree() {
        let a = laplace(8);
        let b: Vec<f64> = (0..8).map(|i| (i as f64).sin()).collect();
        let lu = RieszContext::new(RieszSolverKind::Lu, a.clone()).unwrap();
        let cg = RieszContext::new(RieszSolverKind::Cg { tol: 1e-12, max_iters: 100 }, a).unwrap();
        let mut x_lu = Vec::new();
        let mut x_cg = Vec::new();
        lu.solve_context(&b, &mut x_lu).unwrap();
        let stats = cg.solve_context(&b, &mut x_cg).unwrap();
        assert!(stats.converged);
        for (l, c) in x_lu.iter().zip(&x_cg) {
            assert_abs_diff_eq!(l, c, epsilon = 1e-9);
        }
    }

    #[test]
    fn lu_inverse_is_finite_for_larger_products() {
        let n = 40;
        let a = laplace(n);
        let b: Vec<f64> = (0..n).map(|i| 1.0 + (i as f64).cos()).collect();
        let ctx = RieszContext::new(RieszSolverKind::default(), a.clone()).unwrap();
        let mut x = Vec::new();
        ctx.solve_context(&b, &mut x).unwrap();
        let mut ax = vec![0.0; n];
        a.matvec(&x, &mut ax);
        for (l, r) in ax.iter().zip(&b) {
            assert_abs_diff_eq!(l, r, epsilon = 1e-9);
        }
    }

    #[test]
    fn cg_without_enough_iterations_fails() {
        let a = laplace(20);
        let b = vec![1.0; 20];
        let cg = RieszContext::new(RieszSolverKind::Cg { tol: 1e-14, max_iters: 2 }, a).unwrap();
        let mut x = Vec::new();
        assert!(matches!(cg.solve_context(&b, &mut x), Err(RbError::SolveError(_))));
    }
}
