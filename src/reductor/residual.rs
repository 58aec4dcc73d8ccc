//! Reduction of the residual `r(u, μ) = f(μ) - A(μ)·RB·u` onto an orthonormal range.
//!
//! The range `W` is built hierarchically from Riesz representatives: first those of the rhs
//! components, then, per basis vector, those of every operator component applied to it. Each
//! group is orthonormalized in the inner product against the range built so far, and
//! `residual_range_dims[k]` is the range size once the first `k` basis vectors were processed.
//! Since `W` is product-orthonormal and spans the Riesz representative of every residual, the
//! Euclidean norm of `Wᵀ r` is the dual norm of `r`, and the leading `residual_range_dims[k]`
//! vectors of `W` suffice for any reduced model of dimension `k`.

use crate::algorithms::gram_schmidt;
use crate::config::GramSchmidtOptions;
use crate::core::product::{InnerProductOperator, riesz_representatives};
use crate::core::traits::InnerProduct;
use crate::core::vector_array::VectorArray;
use crate::error::RbError;
use crate::model::affine::{ParametrizedFunctional, ParametrizedOperator};
use crate::model::parameter::Parameter;
use crate::model::stationary::StationaryModel;
use faer::{Mat, MatRef};
use std::sync::Arc;

/// The residual of a reduced model, evaluable in reduced time.
#[derive(Debug, Clone)]
pub enum ReducedResidual {
    /// `u ↦ Wᵀ f(μ) - Wᵀ A(μ) RB u`, with affine structure kept term by term.
    Projected {
        operator: ParametrizedOperator,
        rhs: ParametrizedFunctional,
    },
    /// The full-order residual, evaluated by lifting `u` with `basis`.
    NonProjected {
        operator: ParametrizedOperator,
        rhs: ParametrizedFunctional,
        basis: VectorArray,
        product: Option<Arc<InnerProductOperator>>,
    },
}

impl ReducedResidual {
    /// Number of reduced coordinates the residual accepts.
    pub fn source_dim(&self) -> usize {
        match self {
            ReducedResidual::Projected { operator, .. } => operator.source_dim(),
            ReducedResidual::NonProjected { basis, .. } => basis.len(),
        }
    }

    /// Dimension of the vectors returned by [`ReducedResidual::apply`].
    pub fn range_dim(&self) -> usize {
        match self {
            ReducedResidual::Projected { rhs, .. } => rhs.dim(),
            ReducedResidual::NonProjected { rhs, .. } => rhs.dim(),
        }
    }

    /// Residual of each column of `u`.
    pub fn apply(&self, u: MatRef<'_, f64>, mu: &Parameter) -> Result<VectorArray, RbError> {
        if u.nrows() != self.source_dim() {
            return Err(RbError::DimensionMismatch { expected: self.source_dim(), found: u.nrows() });
        }
        let (operator, rhs, lifted) = match self {
            ReducedResidual::Projected { operator, rhs } => (operator, rhs, VectorArray::from_mat(u.to_owned())),
            ReducedResidual::NonProjected { operator, rhs, basis, .. } => (operator, rhs, basis.lincomb(u)?),
        };
        let f = rhs.as_vector(mu);
        let au = operator.apply(&lifted, mu)?;
        Ok(VectorArray::from_mat(Mat::from_fn(f.len(), u.ncols(), |i, j| f[i] - au.as_mat()[(i, j)])))
    }

    /// Dual norm of the residual of each column of `u`.
    pub fn norms(&self, u: MatRef<'_, f64>, mu: &Parameter) -> Result<Vec<f64>, RbError> {
        let r = self.apply(u, mu)?;
        match self {
            ReducedResidual::Projected { .. } => Ok(r.l2_norms()),
            ReducedResidual::NonProjected { product, .. } => match product {
                Some(p) => {
                    let rr = p.apply_inverse(&r)?;
                    Ok((0..r.len())
                        .map(|j| ().dot(&r.column(j), &rr.column(j)).max(0.0).sqrt())
                        .collect())
                }
                None => Ok(r.l2_norms()),
            },
        }
    }

    /// The residual of the reduced model using only the first `dim_source` basis vectors.
    ///
    /// For a projected residual `dim_range` selects the leading range vectors to keep (`None`
    /// keeps the whole range). A non-projected residual ignores it and truncates the basis.
    pub fn projected_to_subbasis(&self, dim_range: Option<usize>, dim_source: usize) -> Result<Self, RbError> {
        if dim_source > self.source_dim() {
            return Err(RbError::Precondition(format!(
                "subbasis dimension {dim_source} exceeds basis size {}",
                self.source_dim()
            )));
        }
        match self {
            ReducedResidual::Projected { operator, rhs } => {
                let range = dim_range.unwrap_or(rhs.dim());
                if range > rhs.dim() {
                    return Err(RbError::Precondition(format!(
                        "range dimension {range} exceeds residual range {}",
                        rhs.dim()
                    )));
                }
                Ok(ReducedResidual::Projected {
                    operator: operator.map(|a| Mat::from_fn(range, dim_source, |i, j| a[(i, j)])),
                    rhs: rhs.map(|f| f[..range].to_vec()),
                })
            }
            ReducedResidual::NonProjected { operator, rhs, basis, product } => Ok(ReducedResidual::NonProjected {
                operator: operator.clone(),
                rhs: rhs.clone(),
                basis: basis.columns(0..dim_source),
                product: product.clone(),
            }),
        }
    }
}

/// Incrementally builds the reduced residual of a stationary model as its basis grows.
#[derive(Debug)]
pub struct ResidualReductor {
    fom: Arc<StationaryModel>,
    product: Option<Arc<InnerProductOperator>>,
    project_range: bool,
    orthonormalization: GramSchmidtOptions,
    residual_range: Option<VectorArray>,
    residual_range_dims: Vec<usize>,
}

impl ResidualReductor {
    pub fn new(fom: Arc<StationaryModel>, product: Option<Arc<InnerProductOperator>>) -> Self {
        Self {
            fom,
            product,
            project_range: true,
            orthonormalization: GramSchmidtOptions::default(),
            residual_range: None,
            residual_range_dims: Vec::new(),
        }
    }

    /// Keep the full-order residual instead of projecting it onto an orthonormal range.
    pub fn without_range_projection(mut self) -> Self {
        self.project_range = false;
        self
    }

    pub fn with_orthonormalization(mut self, options: GramSchmidtOptions) -> Self {
        self.orthonormalization = options;
        self
    }

    pub fn projects_range(&self) -> bool {
        self.project_range
    }

    /// Cumulative range sizes, or `None` when the range is not projected.
    pub fn residual_range_dims(&self) -> Option<&[usize]> {
        if self.project_range { Some(&self.residual_range_dims) } else { None }
    }

    /// The orthonormal residual range built so far.
    pub fn residual_range(&self) -> Option<&VectorArray> {
        self.residual_range.as_ref()
    }

    /// Reduce the residual for the reduced space spanned by `basis`.
    pub fn reduce(&mut self, basis: &VectorArray) -> Result<ReducedResidual, RbError> {
        if basis.dim() != self.fom.dim() {
            return Err(RbError::DimensionMismatch { expected: self.fom.dim(), found: basis.dim() });
        }
        if !self.project_range {
            return Ok(ReducedResidual::NonProjected {
                operator: self.fom.operator().clone(),
                rhs: self.fom.rhs().clone(),
                basis: basis.clone(),
                product: self.product.clone(),
            });
        }

        self.extend_range(basis)?;
        let dim_range = self.residual_range_dims[basis.len()];
        let w = match &self.residual_range {
            Some(range) => range.columns(0..dim_range),
            None => VectorArray::empty(basis.dim()),
        };
        let operator = self
            .fom
            .operator()
            .map(|a| w.dot(&VectorArray::from_mat(a.as_ref() * basis.as_ref())));
        let rhs = self.fom.rhs().map(|f| {
            let coefficients = w.dot(&VectorArray::from_vec(f));
            (0..dim_range).map(|i| coefficients[(i, 0)]).collect::<Vec<f64>>()
        });
        Ok(ReducedResidual::Projected { operator, rhs })
    }

    fn extend_range(&mut self, basis: &VectorArray) -> Result<(), RbError> {
        let product = self.product.as_deref();
        let mut range = match self.residual_range.take() {
            Some(range) => range,
            None => {
                let rhs = riesz_representatives(product, &self.fom.rhs().as_range_array())?;
                let range = gram_schmidt(rhs, product, 0, &self.orthonormalization)?;
                self.residual_range_dims = vec![range.len()];
                range
            }
        };
        let processed = self.residual_range_dims.len() - 1;
        for i in processed..basis.len() {
            let v = basis.columns(i..i + 1);
            let mut images = VectorArray::empty(basis.dim());
            for a in self.fom.operator().components() {
                images.append(&VectorArray::from_mat(a.as_ref() * v.as_ref()))?;
            }
            let old_len = range.len();
            range.append(&riesz_representatives(product, &images)?)?;
            range = gram_schmidt(range, product, old_len, &self.orthonormalization)?;
            log::debug!("residual range grew from {old_len} to {} with basis vector {i}", range.len());
            self.residual_range_dims.push(range.len());
        }
        self.residual_range = Some(range);
        Ok(())
    }
}
