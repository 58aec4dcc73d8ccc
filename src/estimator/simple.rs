//! Gram-matrix estimator for fully affine problems.
//!
//! The squared dual norm of the residual is the quadratic form `Cᵀ M C`, where `C` stacks the rhs
//! coefficients followed by the products `θ_t(μ)·uᵢ` (operator term major, basis index minor) and
//! `M` is the Gram matrix of the Riesz representatives of the corresponding residual components.
//! The row and column layout of `M` (rhs block first, then one block of stride `dim` per operator
//! term) is fixed at assembly; restriction indexes into it.

use crate::config::InducedNormOptions;
use crate::core::traits::SubmatrixExtract;
use crate::error::RbError;
use crate::estimator::norm::InducedNorm;
use crate::estimator::scale_by_coercivity;
use crate::model::parameter::{Parameter, ParameterFunctional};
use crate::model::reduced::ReducedModel;
use faer::{Mat, MatRef};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SimpleCoerciveRbEstimator {
    estimator_matrix: Arc<Mat<f64>>,
    norm: InducedNorm,
    coercivity_estimator: Option<ParameterFunctional>,
    validate_coercivity: bool,
}

impl SimpleCoerciveRbEstimator {
    pub fn new(estimator_matrix: Mat<f64>, coercivity_estimator: Option<ParameterFunctional>) -> Self {
        Self::with_norm_options(estimator_matrix, coercivity_estimator, InducedNormOptions::default())
    }

    pub fn with_norm_options(
        estimator_matrix: Mat<f64>,
        coercivity_estimator: Option<ParameterFunctional>,
        options: InducedNormOptions,
    ) -> Self {
        let estimator_matrix = Arc::new(estimator_matrix);
        let norm = InducedNorm::new(Arc::clone(&estimator_matrix), options);
        Self { estimator_matrix, norm, coercivity_estimator, validate_coercivity: false }
    }

    pub fn with_coercivity_validation(mut self, validate: bool) -> Self {
        self.validate_coercivity = validate;
        self
    }

    pub fn estimator_matrix(&self) -> &Mat<f64> {
        &self.estimator_matrix
    }

    pub fn coercivity_estimator(&self) -> Option<&ParameterFunctional> {
        self.coercivity_estimator.as_ref()
    }

    /// Estimate for a single reduced coordinate vector.
    ///
    /// # Errors
    /// [`RbError::Unsupported`] when `u` holds more than one vector; evaluate batches one column at
    /// a time. An empty `u` yields no estimates.
    pub fn estimate(&self, u: MatRef<'_, f64>, mu: &Parameter, m: &ReducedModel) -> Result<Vec<f64>, RbError> {
        if u.ncols() > 1 {
            return Err(RbError::Unsupported("simple coercive estimate of more than one vector"));
        }
        if u.ncols() == 0 {
            return Ok(Vec::new());
        }
        let cr = m.rhs().evaluate_coefficients(mu);
        let co = m.operator().evaluate_coefficients(mu);
        let mut c = cr;
        c.reserve(co.len() * u.nrows());
        for theta in &co {
            c.extend((0..u.nrows()).map(|i| theta * u[(i, 0)]));
        }
        let est = self.norm.apply(&c)?;
        Ok(vec![scale_by_coercivity(est, self.coercivity_estimator.as_ref(), mu, self.validate_coercivity)?])
    }

    /// An estimator for the reduced model built from the first `dim` basis vectors of `m`.
    pub fn restricted_to_subbasis(&self, dim: usize, m: &ReducedModel) -> Result<Self, RbError> {
        let cr = m.rhs().num_terms();
        let co = m.operator().num_terms();
        let old_dim = m.dim();
        let size = self.estimator_matrix.nrows();
        if size != cr + co * old_dim {
            return Err(RbError::DimensionMismatch { expected: cr + co * old_dim, found: size });
        }
        if dim > old_dim {
            return Err(RbError::Precondition(format!("subbasis dimension {dim} exceeds basis size {old_dim}")));
        }
        let indices: Vec<usize> = (0..cr)
            .chain((0..co).flat_map(|t| (0..dim).map(move |i| cr + t * old_dim + i)))
            .collect();
        let matrix = SubmatrixExtract::submatrix(&*self.estimator_matrix, &indices);
        Ok(Self::with_norm_options(matrix, self.coercivity_estimator.clone(), self.norm.options())
            .with_coercivity_validation(self.validate_coercivity))
    }
}
