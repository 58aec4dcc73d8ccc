//! Galerkin RB reductor for stationary models.
//!
//! The reductor owns the reduced basis and the inner product, projects the full-order operator
//! and rhs onto the basis, and asks an [`EstimatorHooks`] implementation for the error estimator
//! of the resulting reduced model. The last full reduction is kept so that models for smaller
//! bases can be derived from it without touching the full-order model again.

use crate::algorithms::gram_schmidt;
use crate::config::{GramSchmidtOptions, ReductorOptions};
use crate::core::product::InnerProductOperator;
use crate::core::vector_array::VectorArray;
use crate::error::RbError;
use crate::estimator::Estimator;
use crate::matrix::identity_deviation;
use crate::model::affine::{ParametrizedFunctional, ParametrizedOperator};
use crate::model::reduced::ReducedModel;
use crate::model::stationary::StationaryModel;
use faer::Mat;
use std::sync::Arc;

/// Estimator assembly points of a reduction.
pub trait EstimatorHooks {
    /// Called after projecting onto the whole `basis`, before the reduced model is built.
    fn assemble_estimator(&mut self, basis: &VectorArray) -> Result<Option<Estimator>, RbError>;

    /// Called when a model for the first `dim` basis vectors is derived from `last_rom`.
    fn assemble_estimator_for_subbasis(
        &mut self,
        dim: usize,
        last_rom: &ReducedModel,
    ) -> Result<Option<Estimator>, RbError> {
        last_rom.estimator().map(|e| e.restricted_to_subbasis(dim, last_rom)).transpose()
    }
}

/// Hooks of a plain Galerkin reduction: no estimator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEstimator;

impl EstimatorHooks for NoEstimator {
    fn assemble_estimator(&mut self, _basis: &VectorArray) -> Result<Option<Estimator>, RbError> {
        Ok(None)
    }
}

/// How [`StationaryRbReductor::extend_basis`] adds vectors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ExtensionMethod {
    /// Append as given.
    Trivial,
    /// Append, then orthonormalize the new vectors against the basis in the inner product.
    #[default]
    GramSchmidt,
}

#[derive(Debug)]
pub struct StationaryRbReductor {
    fom: Arc<StationaryModel>,
    basis: VectorArray,
    product: Option<Arc<InnerProductOperator>>,
    options: ReductorOptions,
    last_rom: Option<ReducedModel>,
    last_rom_dim: usize,
}

impl StationaryRbReductor {
    pub fn new(
        fom: Arc<StationaryModel>,
        basis: Option<VectorArray>,
        product: Option<Arc<InnerProductOperator>>,
        options: ReductorOptions,
    ) -> Result<Self, RbError> {
        let basis = basis.unwrap_or_else(|| VectorArray::empty(fom.dim()));
        if basis.dim() != fom.dim() {
            return Err(RbError::DimensionMismatch { expected: fom.dim(), found: basis.dim() });
        }
        if let Some(p) = &product {
            if p.dim() != fom.dim() {
                return Err(RbError::DimensionMismatch { expected: fom.dim(), found: p.dim() });
            }
        }
        Ok(Self { fom, basis, product, options, last_rom: None, last_rom_dim: 0 })
    }

    pub fn fom(&self) -> &Arc<StationaryModel> {
        &self.fom
    }

    pub fn basis(&self) -> &VectorArray {
        &self.basis
    }

    pub fn product(&self) -> Option<&Arc<InnerProductOperator>> {
        self.product.as_ref()
    }

    pub fn options(&self) -> &ReductorOptions {
        &self.options
    }

    /// Append `u` to the basis; returns the number of vectors actually added.
    ///
    /// # Errors
    /// [`RbError::LinearlyDependent`] when Gram-Schmidt removes every new vector.
    pub fn extend_basis(&mut self, u: &VectorArray, method: ExtensionMethod) -> Result<usize, RbError> {
        let old_len = self.basis.len();
        let mut extended = self.basis.clone();
        extended.append(u)?;
        if method == ExtensionMethod::GramSchmidt {
            let options = GramSchmidtOptions::default().with_check_tol(self.options.check_tol);
            extended = gram_schmidt(extended, self.product.as_deref(), old_len, &options)?;
        }
        let added = extended.len() - old_len;
        if added == 0 && !u.is_empty() {
            return Err(RbError::LinearlyDependent);
        }
        log::debug!("extended reduced basis from {old_len} to {} vectors", extended.len());
        self.basis = extended;
        Ok(added)
    }

    /// The reduced model for the first `dim` basis vectors (all of them when `None`).
    pub fn reduce(&mut self, dim: Option<usize>, hooks: &mut dyn EstimatorHooks) -> Result<ReducedModel, RbError> {
        let dim = dim.unwrap_or(self.basis.len());
        if dim > self.basis.len() {
            return Err(RbError::Precondition(format!(
                "cannot reduce to dimension {dim} with a basis of size {}",
                self.basis.len()
            )));
        }
        if self.last_rom.is_none() || dim > self.last_rom_dim {
            let rom = self.reduce_full(hooks)?;
            self.last_rom_dim = self.basis.len();
            self.last_rom = Some(rom);
        }
        let Some(last_rom) = self.last_rom.as_ref() else {
            return Err(RbError::Precondition("no reduced model available".into()));
        };
        if dim == self.last_rom_dim {
            return Ok(last_rom.clone());
        }
        let (operator, rhs) = project_to_subbasis(last_rom, dim);
        let estimator = hooks.assemble_estimator_for_subbasis(dim, last_rom)?;
        Ok(ReducedModel::new(operator, rhs, estimator))
    }

    fn reduce_full(&self, hooks: &mut dyn EstimatorHooks) -> Result<ReducedModel, RbError> {
        if self.options.check_orthonormality && !self.basis.is_empty() {
            let gram = match &self.product {
                Some(p) => p.inner(&self.basis, &self.basis)?,
                None => self.basis.dot(&self.basis),
            };
            let error = identity_deviation(&gram);
            if error >= self.options.check_tol {
                return Err(RbError::Accuracy(format!("reduced basis is not orthonormal (error {error:e})")));
            }
        }
        log::debug!("projecting operators onto {} basis vectors", self.basis.len());
        let (operator, rhs) = self.project_operators();
        let estimator = hooks.assemble_estimator(&self.basis)?;
        Ok(ReducedModel::new(operator, rhs, estimator))
    }

    /// Galerkin projection `RBᵀ A_q RB`, `RBᵀ f_q` of every affine component.
    fn project_operators(&self) -> (ParametrizedOperator, ParametrizedFunctional) {
        let rb = &self.basis;
        let operator = self.fom.operator().map(|a| rb.dot(&VectorArray::from_mat(a.as_ref() * rb.as_ref())));
        let rhs = self.fom.rhs().map(|f| {
            let projected = rb.dot(&VectorArray::from_vec(f));
            (0..rb.len()).map(|i| projected[(i, 0)]).collect::<Vec<f64>>()
        });
        (operator, rhs)
    }
}

fn project_to_subbasis(rom: &ReducedModel, dim: usize) -> (ParametrizedOperator, ParametrizedFunctional) {
    let operator = rom.operator().map(|a| Mat::from_fn(dim, dim, |i, j| a[(i, j)]));
    let rhs = rom.rhs().map(|f| f[..dim].to_vec());
    (operator, rhs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::affine::Affine;
    use crate::model::parameter::{Parameter, ParameterFunctional};
    use approx::assert_abs_diff_eq;
    use faer::mat;

    fn fom() -> Arc<StationaryModel> {
        let op = Affine::lincomb([
            (mat![[2.0, -1.0, 0.0], [-1.0, 2.0, -1.0], [0.0, -1.0, 2.0]], ParameterFunctional::component(0)),
            (mat![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]], ParameterFunctional::constant(1.0)),
        ]);
        Arc::new(StationaryModel::new(op, Affine::NonParametric(vec![1.0, 2.0, 3.0])).unwrap())
    }

    #[test]
    fn full_basis_reproduces_the_full_solution() {
        let fom = fom();
        let mut reductor = StationaryRbReductor::new(Arc::clone(&fom), None, None, ReductorOptions::default()).unwrap();
        let e = VectorArray::from_mat(Mat::identity(3, 3));
        assert_eq!(reductor.extend_basis(&e, ExtensionMethod::GramSchmidt).unwrap(), 3);
        let rom = reductor.reduce(None, &mut NoEstimator).unwrap();
        let mu = Parameter::from(0.5);
        let ur = rom.solve(&mu).unwrap();
        let u = fom.solve(&mu).unwrap();
        for i in 0..3 {
            assert_abs_diff_eq!(ur[(i, 0)], u[i], epsilon = 1e-12);
        }
        assert!(rom.estimator().is_none());
    }

    #[test]
    fn subbasis_model_truncates_projection() {
        let mut reductor = StationaryRbReductor::new(fom(), None, None, ReductorOptions::default()).unwrap();
        reductor.extend_basis(&VectorArray::from_mat(Mat::identity(3, 3)), ExtensionMethod::Trivial).unwrap();
        let full = reductor.reduce(None, &mut NoEstimator).unwrap();
        let sub = reductor.reduce(Some(2), &mut NoEstimator).unwrap();
        assert_eq!(sub.dim(), 2);
        let mu = Parameter::from(1.0);
        assert_eq!(sub.operator().assemble(&mu)[(1, 0)], full.operator().assemble(&mu)[(1, 0)]);
        assert!(reductor.reduce(Some(4), &mut NoEstimator).is_err());
    }

    #[test]
    fn dependent_extension_is_rejected() {
        let mut reductor = StationaryRbReductor::new(fom(), None, None, ReductorOptions::default()).unwrap();
        let v = VectorArray::from_vec(&[1.0, 0.0, 0.0]);
        reductor.extend_basis(&v, ExtensionMethod::GramSchmidt).unwrap();
        assert_eq!(reductor.extend_basis(&v.scaled(2.0), ExtensionMethod::GramSchmidt), Err(RbError::LinearlyDependent));
        assert_eq!(reductor.basis().len(), 1);
    }

    #[test]
    fn non_orthonormal_basis_fails_the_check() {
        let basis = VectorArray::from_vec(&[2.0, 0.0, 0.0]);
        let mut reductor = StationaryRbReductor::new(fom(), Some(basis), None, ReductorOptions::default()).unwrap();
        assert!(matches!(reductor.reduce(None, &mut NoEstimator), Err(RbError::Accuracy(_))));
        let unchecked = ReductorOptions::default().with_check_orthonormality(false);
        let basis = VectorArray::from_vec(&[2.0, 0.0, 0.0]);
        let mut reductor = StationaryRbReductor::new(fom(), Some(basis), None, unchecked).unwrap();
        assert_eq!(reductor.reduce(None, &mut NoEstimator).unwrap().dim(), 1);
    }
}
