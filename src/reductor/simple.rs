//! RB reductor with a Gram-matrix estimator for affinely decomposed linear models.
//!
//! The residual `f(μ) - A(μ)·RB·u` is a linear combination of the vectors `f_q` and `-A_t·RBᵢ`
//! with coefficients `θ_q(μ)` and `θ_t(μ)·uᵢ`. The reductor computes the Riesz representatives of
//! all these vectors once and stores their Gram matrix in the estimator. When the basis grows, the
//! vectors of the previous assembly are taken from an [`ExtensionCache`] and only those of the new
//! basis vectors are computed.

use crate::config::ReductorOptions;
use crate::core::product::{InnerProductOperator, riesz_representatives};
use crate::core::vector_array::VectorArray;
use crate::error::RbError;
use crate::estimator::{Estimator, SimpleCoerciveRbEstimator};
use crate::matrix::{hstack, vstack};
use crate::model::parameter::ParameterFunctional;
use crate::model::reduced::ReducedModel;
use crate::model::stationary::StationaryModel;
use crate::reductor::basic::{EstimatorHooks, ExtensionMethod, StationaryRbReductor};
use faer::Mat;
use std::sync::Arc;

/// Residual vectors and their Riesz representatives from one estimator assembly.
///
/// Replaced as a whole by every assembly and never modified in place.
#[derive(Debug, Clone)]
pub struct ExtensionCache {
    basis_len: usize,
    r_r: VectorArray,
    rr_r: VectorArray,
    r_os: Vec<VectorArray>,
    rr_os: Vec<VectorArray>,
}

impl ExtensionCache {
    /// Basis size at the time of the assembly.
    pub fn basis_len(&self) -> usize {
        self.basis_len
    }

    /// Rhs components `f_q`.
    pub fn rhs_vectors(&self) -> &VectorArray {
        &self.r_r
    }

    /// Riesz representatives `P⁻¹ f_q` of the rhs components.
    pub fn rhs_riesz(&self) -> &VectorArray {
        &self.rr_r
    }

    /// One block `[-A_t·RB₀, -A_t·RB₁, …]` per operator term.
    pub fn operator_vectors(&self) -> &[VectorArray] {
        &self.r_os
    }

    /// Riesz representatives of [`ExtensionCache::operator_vectors`], block by block.
    pub fn operator_riesz(&self) -> &[VectorArray] {
        &self.rr_os
    }
}

pub struct SimpleCoerciveRbReductor {
    base: StationaryRbReductor,
    assembly: GramAssembly,
}

struct GramAssembly {
    fom: Arc<StationaryModel>,
    product: Option<Arc<InnerProductOperator>>,
    coercivity_estimator: Option<ParameterFunctional>,
    options: ReductorOptions,
    extends: Option<Arc<ExtensionCache>>,
}

impl GramAssembly {
    fn residual_blocks(&self, basis: &VectorArray) -> Result<ExtensionCache, RbError> {
        let product = self.product.as_deref();
        let space = self.fom.dim();
        let old = self.extends.as_deref();
        let old_len = old.map_or(0, |c| c.basis_len);
        if old_len > basis.len() {
            return Err(RbError::Precondition(format!(
                "basis shrank from {old_len} to {} vectors since the last assembly",
                basis.len()
            )));
        }

        let (r_r, rr_r) = match old {
            Some(cache) => (cache.r_r.clone(), cache.rr_r.clone()),
            None => {
                let r = self.fom.rhs().as_range_array();
                let rr = riesz_representatives(product, &r)?;
                (r, rr)
            }
        };

        if basis.is_empty() {
            return Ok(ExtensionCache {
                basis_len: 0,
                r_r,
                rr_r,
                r_os: vec![VectorArray::empty(space)],
                rr_os: vec![VectorArray::empty(space)],
            });
        }

        let new_vectors = basis.columns(old_len..basis.len());
        let components = self.fom.operator().components();
        let mut r_os = Vec::with_capacity(components.len());
        let mut rr_os = Vec::with_capacity(components.len());
        for (t, a) in components.into_iter().enumerate() {
            let (mut r_o, mut rr_o) = match old {
                Some(cache) if old_len > 0 => (cache.r_os[t].clone(), cache.rr_os[t].clone()),
                _ => (VectorArray::empty(space), VectorArray::empty(space)),
            };
            let r = VectorArray::from_mat(a.as_ref() * new_vectors.as_ref()).scaled(-1.0);
            let rr = riesz_representatives(product, &r)?;
            r_o.append(&r)?;
            rr_o.append(&rr)?;
            r_os.push(r_o);
            rr_os.push(rr_o);
        }
        log::debug!(
            "computed Riesz representatives for basis vectors {old_len}..{} of {} operator terms",
            basis.len(),
            r_os.len()
        );
        Ok(ExtensionCache { basis_len: basis.len(), r_r, rr_r, r_os, rr_os })
    }
}

/// The symmetric block matrix `[[R_RR, R_RO], [R_ROᵀ, R_OO]]` of residual inner products.
fn gram_matrix(blocks: &ExtensionCache) -> Mat<f64> {
    let cr = blocks.r_r.len();
    let no: usize = blocks.r_os.iter().map(VectorArray::len).sum();

    let r_rr = blocks.rr_r.dot(&blocks.r_r);
    let r_ro = hstack(cr, &blocks.r_os.iter().map(|r_o| blocks.rr_r.dot(r_o)).collect::<Vec<_>>());
    let r_oo = vstack(
        no,
        &blocks
            .rr_os
            .iter()
            .map(|rr_o| hstack(rr_o.len(), &blocks.r_os.iter().map(|r_o| rr_o.dot(r_o)).collect::<Vec<_>>()))
            .collect::<Vec<_>>(),
    );

    Mat::from_fn(cr + no, cr + no, |i, j| match (i < cr, j < cr) {
        (true, true) => r_rr[(i, j)],
        (true, false) => r_ro[(i, j - cr)],
        (false, true) => r_ro[(j, i - cr)],
        (false, false) => r_oo[(i - cr, j - cr)],
    })
}

impl EstimatorHooks for GramAssembly {
    fn assemble_estimator(&mut self, basis: &VectorArray) -> Result<Option<Estimator>, RbError> {
        let blocks = self.residual_blocks(basis)?;
        let matrix = gram_matrix(&blocks);
        let estimator =
            SimpleCoerciveRbEstimator::with_norm_options(matrix, self.coercivity_estimator.clone(), self.options.norm)
                .with_coercivity_validation(self.options.validate_coercivity);
        self.extends = Some(Arc::new(blocks));
        Ok(Some(estimator.into()))
    }
}

impl SimpleCoerciveRbReductor {
    /// # Errors
    /// [`RbError::Precondition`] if `fom` is not linear.
    pub fn new(
        fom: Arc<StationaryModel>,
        basis: Option<VectorArray>,
        product: Option<Arc<InnerProductOperator>>,
        coercivity_estimator: Option<ParameterFunctional>,
        options: ReductorOptions,
    ) -> Result<Self, RbError> {
        if !fom.is_linear() {
            return Err(RbError::Precondition("simple coercive reduction requires a linear model".into()));
        }
        let assembly = GramAssembly {
            fom: Arc::clone(&fom),
            product: product.clone(),
            coercivity_estimator,
            options,
            extends: None,
        };
        let base = StationaryRbReductor::new(fom, basis, product, options)?;
        Ok(Self { base, assembly })
    }

    pub fn base(&self) -> &StationaryRbReductor {
        &self.base
    }

    pub fn basis(&self) -> &VectorArray {
        self.base.basis()
    }

    /// Blocks of the last estimator assembly, if any.
    pub fn extension_cache(&self) -> Option<&ExtensionCache> {
        self.assembly.extends.as_deref()
    }

    pub fn extend_basis(&mut self, u: &VectorArray, method: ExtensionMethod) -> Result<usize, RbError> {
        self.base.extend_basis(u, method)
    }

    pub fn reduce(&mut self, dim: Option<usize>) -> Result<ReducedModel, RbError> {
        self.base.reduce(dim, &mut self.assembly)
    }

    /// Assemble an estimator for the current basis outside of a reduction.
    pub fn assemble_estimator(&mut self) -> Result<SimpleCoerciveRbEstimator, RbError> {
        match self.assembly.assemble_estimator(self.base.basis())? {
            Some(Estimator::SimpleCoercive(e)) => Ok(e),
            _ => Err(RbError::Precondition("Gram assembly did not produce an estimator".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::asymmetry;
    use crate::model::affine::Affine;
    use crate::model::parameter::ParameterFunctional;
    use approx::assert_abs_diff_eq;
    use faer::mat;

    fn fom(rhs_terms: usize) -> Arc<StationaryModel> {
        let op = Affine::NonParametric(mat![[2.0, -1.0, 0.0], [-1.0, 2.0, -1.0], [0.0, -1.0, 2.0]]);
        let rhs = if rhs_terms == 1 {
            Affine::NonParametric(vec![1.0, 1.0, 1.0])
        } else {
            Affine::lincomb([
                (vec![1.0, 0.0, 0.0], ParameterFunctional::constant(1.0)),
                (vec![0.0, 0.0, 1.0], ParameterFunctional::component(0)),
            ])
        };
        Arc::new(StationaryModel::new(op, rhs).unwrap())
    }

    #[test]
    fn gram_matrix_has_rhs_then_operator_blocks() {
        let mut reductor =
            SimpleCoerciveRbReductor::new(fom(2), None, None, None, ReductorOptions::default()).unwrap();
        reductor.extend_basis(&VectorArray::from_mat(Mat::identity(3, 3)), ExtensionMethod::Trivial).unwrap();
        let est = reductor.assemble_estimator().unwrap();
        let m = est.estimator_matrix();
        assert_eq!((m.nrows(), m.ncols()), (5, 5));
        assert!(asymmetry(m) < 1e-14);
        // rhs block: f_0 · f_1 = 0, f_0 · f_0 = 1
        assert_eq!(m[(0, 0)], 1.0);
        assert_eq!(m[(0, 1)], 0.0);
        // cross block: f_0 · (-A e_0) = -2
        assert_eq!(m[(0, 2)], -2.0);
        let cache = reductor.extension_cache().unwrap();
        assert_eq!(cache.basis_len(), 3);
        assert_eq!(cache.rhs_vectors().len(), 2);
        assert_eq!(cache.operator_vectors().len(), 1);
    }

    #[test]
    fn cache_keeps_riesz_representatives_of_residual_vectors() {
        let product = Arc::new(InnerProductOperator::new(mat![[2.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 1.0]]).unwrap());
        let mut reductor =
            SimpleCoerciveRbReductor::new(fom(2), None, Some(product.clone()), None, ReductorOptions::default())
                .unwrap();
        reductor.extend_basis(&VectorArray::from_mat(Mat::identity(3, 2)), ExtensionMethod::GramSchmidt).unwrap();
        reductor.assemble_estimator().unwrap();
        let cache = reductor.extension_cache().unwrap();

        let rhs = product.apply(cache.rhs_riesz()).unwrap();
        let ops = product.apply(&cache.operator_riesz()[0]).unwrap();
        for (back, original) in [(&rhs, cache.rhs_vectors()), (&ops, &cache.operator_vectors()[0])] {
            assert_eq!(back.len(), original.len());
            for j in 0..back.len() {
                for i in 0..3 {
                    assert_abs_diff_eq!(back.as_mat()[(i, j)], original.as_mat()[(i, j)], epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn empty_basis_gives_rhs_block_only() {
        let mut reductor =
            SimpleCoerciveRbReductor::new(fom(1), None, None, None, ReductorOptions::default()).unwrap();
        let est = reductor.assemble_estimator().unwrap();
        assert_eq!(est.estimator_matrix().nrows(), 1);
        assert_abs_diff_eq!(est.estimator_matrix()[(0, 0)], 3.0, epsilon = 1e-14);
        assert_eq!(reductor.extension_cache().unwrap().operator_vectors()[0].len(), 0);
    }

    #[test]
    fn non_linear_models_are_rejected() {
        let fom = Arc::new((*fom(1)).clone().with_linear(false));
        let err = SimpleCoerciveRbReductor::new(fom, None, None, None, ReductorOptions::default()).err();
        assert!(matches!(err, Some(RbError::Precondition(_))));
    }
}
