//! Reduced-order model produced by the reductors.

use crate::error::RbError;
use crate::estimator::Estimator;
use crate::model::affine::{ParametrizedFunctional, ParametrizedOperator};
use crate::model::parameter::Parameter;
use crate::solver::LuSolver;
use faer::{Mat, MatRef};

/// Galerkin-projected system `Aᵣ(μ) uᵣ = fᵣ(μ)` with an optional error estimator.
///
/// The projected operator and rhs keep the affine structure (term order and coefficients) of the
/// full-order model.
#[derive(Debug, Clone)]
pub struct ReducedModel {
    operator: ParametrizedOperator,
    rhs: ParametrizedFunctional,
    estimator: Option<Estimator>,
}

impl ReducedModel {
    pub fn new(operator: ParametrizedOperator, rhs: ParametrizedFunctional, estimator: Option<Estimator>) -> Self {
        Self { operator, rhs, estimator }
    }

    pub fn dim(&self) -> usize {
        self.operator.source_dim()
    }

    pub fn operator(&self) -> &ParametrizedOperator {
        &self.operator
    }

    pub fn rhs(&self) -> &ParametrizedFunctional {
        &self.rhs
    }

    pub fn estimator(&self) -> Option<&Estimator> {
        self.estimator.as_ref()
    }

    /// Reduced coordinates `uᵣ(μ)` as a `dim × 1` matrix.
    pub fn solve(&self, mu: &Parameter) -> Result<Mat<f64>, RbError> {
        let n = self.dim();
        if n == 0 {
            return Ok(Mat::zeros(0, 1));
        }
        let mut lu = LuSolver::new();
        lu.factorize(&self.operator.assemble(mu))?;
        let f = self.rhs.as_vector(mu);
        let mut u = vec![0.0; n];
        lu.solve_cached(&f, &mut u)?;
        if u.iter().any(|x| !x.is_finite()) {
            return Err(RbError::SolveError("reduced solve produced non-finite values".into()));
        }
        Ok(Mat::from_fn(n, 1, |i, _| u[i]))
    }

    /// Error estimates for the coordinates `u` (one vector per column).
    pub fn estimate(&self, u: MatRef<'_, f64>, mu: &Parameter) -> Result<Vec<f64>, RbError> {
        let estimator = self
            .estimator
            .as_ref()
            .ok_or(RbError::Unsupported("reduced model has no error estimator"))?;
        estimator.estimate(u, mu, self)
    }

    /// Solve and estimate the error of the solution.
    pub fn solve_and_estimate(&self, mu: &Parameter) -> Result<(Mat<f64>, f64), RbError> {
        let u = self.solve(mu)?;
        let est = self.estimate(u.as_ref(), mu)?;
        Ok((u, est.first().copied().unwrap_or(0.0)))
    }
}
