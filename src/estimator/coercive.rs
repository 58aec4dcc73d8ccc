//! Residual-based estimator for coercive problems.

use crate::error::RbError;
use crate::estimator::diagnostics::{Diagnostic, DiagnosticSink, default_sink};
use crate::estimator::scale_by_coercivity;
use crate::model::parameter::{Parameter, ParameterFunctional};
use crate::model::reduced::ReducedModel;
use crate::reductor::residual::ReducedResidual;
use faer::MatRef;
use std::fmt;
use std::sync::Arc;

/// Estimates `‖u(μ) - RB·uᵣ(μ)‖ ≤ ‖r(uᵣ, μ)‖_* / α_LB(μ)` from a reduced residual.
#[derive(Clone)]
pub struct CoerciveRbEstimator {
    residual: ReducedResidual,
    residual_range_dims: Option<Arc<[usize]>>,
    coercivity_estimator: Option<ParameterFunctional>,
    validate_coercivity: bool,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl CoerciveRbEstimator {
    pub fn new(
        residual: ReducedResidual,
        residual_range_dims: Option<Arc<[usize]>>,
        coercivity_estimator: Option<ParameterFunctional>,
    ) -> Self {
        Self {
            residual,
            residual_range_dims,
            coercivity_estimator,
            validate_coercivity: false,
            diagnostics: default_sink(),
        }
    }

    /// Fail with [`RbError::InvalidCoercivity`] instead of dividing by a non-positive bound.
    pub fn with_coercivity_validation(mut self, validate: bool) -> Self {
        self.validate_coercivity = validate;
        self
    }

    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    pub fn residual(&self) -> &ReducedResidual {
        &self.residual
    }

    pub fn residual_range_dims(&self) -> Option<&[usize]> {
        self.residual_range_dims.as_deref()
    }

    pub fn coercivity_estimator(&self) -> Option<&ParameterFunctional> {
        self.coercivity_estimator.as_ref()
    }

    /// One estimate per column of `u`.
    pub fn estimate(&self, u: MatRef<'_, f64>, mu: &Parameter, _m: &ReducedModel) -> Result<Vec<f64>, RbError> {
        self.residual
            .norms(u, mu)?
            .into_iter()
            .map(|est| scale_by_coercivity(est, self.coercivity_estimator.as_ref(), mu, self.validate_coercivity))
            .collect()
    }

    /// An estimator for the reduced model built from the first `dim` basis vectors.
    pub fn restricted_to_subbasis(&self, dim: usize, _m: &ReducedModel) -> Result<Self, RbError> {
        let (residual, dims) = match &self.residual_range_dims {
            Some(dims) => {
                if dim + 1 > dims.len() {
                    return Err(RbError::Precondition(format!(
                        "subbasis dimension {dim} exceeds basis size {}",
                        dims.len() - 1
                    )));
                }
                let dims: Arc<[usize]> = dims[..=dim].into();
                (self.residual.projected_to_subbasis(dims.last().copied(), dim)?, Some(dims))
            }
            None => {
                self.diagnostics.report(&Diagnostic::SlowSubbasisRestriction { dim });
                (self.residual.projected_to_subbasis(None, dim)?, None)
            }
        };
        Ok(Self {
            residual,
            residual_range_dims: dims,
            coercivity_estimator: self.coercivity_estimator.clone(),
            validate_coercivity: self.validate_coercivity,
            diagnostics: Arc::clone(&self.diagnostics),
        })
    }
}

impl fmt::Debug for CoerciveRbEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoerciveRbEstimator")
            .field("residual", &self.residual)
            .field("residual_range_dims", &self.residual_range_dims)
            .field("coercivity_estimator", &self.coercivity_estimator)
            .finish_non_exhaustive()
    }
}
