//! Stopping rule and statistics of the iterative Riesz solves.

use num_traits::Float;

/// Relative-residual stopping rule `‖r_k‖ ≤ tol·‖b‖`, capped at `max_iters` iterations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Convergence<T> {
    pub tol: T,
    pub max_iters: usize,
}

/// Outcome of a solve.
#[derive(Clone, Debug, PartialEq)]
pub struct SolveStats<T> {
    pub iterations: usize,
    pub final_residual: T,
    pub converged: bool,
}

impl<T: Float> SolveStats<T> {
    /// A direct solve: one step, exact up to round-off.
    pub fn direct() -> Self {
        Self { iterations: 1, final_residual: T::zero(), converged: true }
    }
}

impl<T: Float> Convergence<T> {
    pub fn is_satisfied(&self, residual: T, reference: T) -> bool {
        residual == T::zero() || residual <= self.tol * reference
    }

    /// Stats after iteration `k`, or `None` while the iteration should go on.
    ///
    /// Hitting `max_iters` ends the iteration without convergence.
    pub fn step(&self, k: usize, residual: T, reference: T) -> Option<SolveStats<T>> {
        let converged = self.is_satisfied(residual, reference);
        (converged || k >= self.max_iters).then(|| SolveStats { iterations: k, final_residual: residual, converged })
    }
}
