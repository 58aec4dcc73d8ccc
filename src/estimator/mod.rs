//! A-posteriori error estimators attached to reduced models.

pub mod coercive;
pub mod diagnostics;
pub mod norm;
pub mod simple;

pub use coercive::CoerciveRbEstimator;
pub use diagnostics::{Diagnostic, DiagnosticSink, LogSink};
pub use norm::InducedNorm;
pub use simple::SimpleCoerciveRbEstimator;

use crate::error::RbError;
use crate::model::parameter::{Parameter, ParameterFunctional};
use crate::model::reduced::ReducedModel;
use faer::MatRef;

/// The estimator stored on a [`ReducedModel`].
#[derive(Debug, Clone)]
pub enum Estimator {
    Coercive(CoerciveRbEstimator),
    SimpleCoercive(SimpleCoerciveRbEstimator),
}

impl Estimator {
    /// Error estimates for the reduced coordinates `u` (one vector per column) at `mu`.
    pub fn estimate(&self, u: MatRef<'_, f64>, mu: &Parameter, m: &ReducedModel) -> Result<Vec<f64>, RbError> {
        match self {
            Estimator::Coercive(e) => e.estimate(u, mu, m),
            Estimator::SimpleCoercive(e) => e.estimate(u, mu, m),
        }
    }

    /// The estimator for the first `dim` basis vectors of `m`'s basis.
    pub fn restricted_to_subbasis(&self, dim: usize, m: &ReducedModel) -> Result<Self, RbError> {
        Ok(match self {
            Estimator::Coercive(e) => Estimator::Coercive(e.restricted_to_subbasis(dim, m)?),
            Estimator::SimpleCoercive(e) => Estimator::SimpleCoercive(e.restricted_to_subbasis(dim, m)?),
        })
    }

    pub fn coercivity_estimator(&self) -> Option<&ParameterFunctional> {
        match self {
            Estimator::Coercive(e) => e.coercivity_estimator(),
            Estimator::SimpleCoercive(e) => e.coercivity_estimator(),
        }
    }
}

impl From<CoerciveRbEstimator> for Estimator {
    fn from(e: CoerciveRbEstimator) -> Self {
        Estimator::Coercive(e)
    }
}

impl From<SimpleCoerciveRbEstimator> for Estimator {
    fn from(e: SimpleCoerciveRbEstimator) -> Self {
        Estimator::SimpleCoercive(e)
    }
}

/// `est / α_LB(μ)`, or `est` without a coercivity estimator.
pub(crate) fn scale_by_coercivity(
    est: f64,
    coercivity: Option<&ParameterFunctional>,
    mu: &Parameter,
    validate: bool,
) -> Result<f64, RbError> {
    let Some(alpha) = coercivity else {
        return Ok(est);
    };
    let alpha = alpha.evaluate(mu);
    if validate && !(alpha.is_finite() && alpha > 0.0) {
        return Err(RbError::InvalidCoercivity(alpha));
    }
    Ok(est / alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coercivity_divides_or_fails() {
        let mu = Parameter::from(0.0);
        let two = ParameterFunctional::constant(2.0);
        let zero = ParameterFunctional::constant(0.0);
        assert_eq!(scale_by_coercivity(3.0, None, &mu, true).unwrap(), 3.0);
        assert_eq!(scale_by_coercivity(3.0, Some(&two), &mu, true).unwrap(), 1.5);
        assert_eq!(scale_by_coercivity(3.0, Some(&zero), &mu, true).unwrap_err(), RbError::InvalidCoercivity(0.0));
        assert!(scale_by_coercivity(3.0, Some(&zero), &mu, false).unwrap().is_infinite());
    }
}
