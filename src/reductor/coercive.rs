//! RB reductor with a residual-based estimator for coercive problems.

use crate::config::ReductorOptions;
use crate::core::product::InnerProductOperator;
use crate::core::vector_array::VectorArray;
use crate::error::RbError;
use crate::estimator::diagnostics::{Diagnostic, DiagnosticSink, default_sink};
use crate::estimator::{CoerciveRbEstimator, Estimator};
use crate::model::parameter::ParameterFunctional;
use crate::model::reduced::ReducedModel;
use crate::model::stationary::StationaryModel;
use crate::reductor::basic::{EstimatorHooks, ExtensionMethod, StationaryRbReductor};
use crate::reductor::residual::ResidualReductor;
use std::sync::Arc;

/// Reduces a coercive stationary model and attaches a [`CoerciveRbEstimator`] evaluating the dual
/// norm of the residual in the reductor's inner product.
pub struct CoerciveRbReductor {
    base: StationaryRbReductor,
    assembly: ResidualAssembly,
}

struct ResidualAssembly {
    residual_reductor: ResidualReductor,
    coercivity_estimator: Option<ParameterFunctional>,
    validate_coercivity: bool,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl EstimatorHooks for ResidualAssembly {
    fn assemble_estimator(&mut self, basis: &VectorArray) -> Result<Option<Estimator>, RbError> {
        let residual = self.residual_reductor.reduce(basis)?;
        let dims: Option<Arc<[usize]>> = self.residual_reductor.residual_range_dims().map(Arc::from);
        if dims.is_none() {
            self.diagnostics.report(&Diagnostic::ResidualRangeUnavailable);
        }
        let estimator = CoerciveRbEstimator::new(residual, dims, self.coercivity_estimator.clone())
            .with_coercivity_validation(self.validate_coercivity)
            .with_diagnostics(Arc::clone(&self.diagnostics));
        Ok(Some(estimator.into()))
    }
}

impl CoerciveRbReductor {
    pub fn new(
        fom: Arc<StationaryModel>,
        basis: Option<VectorArray>,
        product: Option<Arc<InnerProductOperator>>,
        coercivity_estimator: Option<ParameterFunctional>,
        options: ReductorOptions,
    ) -> Result<Self, RbError> {
        let residual_reductor = ResidualReductor::new(Arc::clone(&fom), product.clone());
        let base = StationaryRbReductor::new(fom, basis, product, options)?;
        Ok(Self {
            base,
            assembly: ResidualAssembly {
                residual_reductor,
                coercivity_estimator,
                validate_coercivity: options.validate_coercivity,
                diagnostics: default_sink(),
            },
        })
    }

    /// Route diagnostics of this reductor and its estimators to `sink`.
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.assembly.diagnostics = sink;
        self
    }

    /// Keep the full-order residual in the estimator. Estimates stay exact, but restriction to
    /// a sub-basis can no longer reuse the residual range.
    pub fn without_residual_range(mut self) -> Self {
        self.assembly.residual_reductor =
            ResidualReductor::new(Arc::clone(self.base.fom()), self.base.product().cloned()).without_range_projection();
        self
    }

    pub fn base(&self) -> &StationaryRbReductor {
        &self.base
    }

    pub fn basis(&self) -> &VectorArray {
        self.base.basis()
    }

    pub fn residual_reductor(&self) -> &ResidualReductor {
        &self.assembly.residual_reductor
    }

    pub fn extend_basis(&mut self, u: &VectorArray, method: ExtensionMethod) -> Result<usize, RbError> {
        self.base.extend_basis(u, method)
    }

    pub fn reduce(&mut self, dim: Option<usize>) -> Result<ReducedModel, RbError> {
        self.base.reduce(dim, &mut self.assembly)
    }
}
