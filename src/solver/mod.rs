//! Direct & Krylov solver interfaces used for Riesz representatives and full-order solves.

use crate::utils::convergence::SolveStats;

/// A solver for `A·x = b` with operator type `M` and vector type `V`.
pub trait LinearSolver<M, V> {
    type Error;
    type Scalar: Copy + PartialOrd + From<f64>;
    /// Writes the solution into `x`. Iterative solvers start from its incoming value.
    fn solve(&mut self, a: &M, b: &V, x: &mut V) -> Result<SolveStats<Self::Scalar>, Self::Error>;
}

pub mod direct_lu;
pub use direct_lu::LuSolver;

pub mod cg;
pub use cg::CgSolver;
