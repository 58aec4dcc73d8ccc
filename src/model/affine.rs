//! Affinely decomposed operators and functionals.
//!
//! A parametric object is either a single non-parametric component or a linear combination
//! `Σ_q θ_q(μ) C_q` of non-parametric components with scalar coefficient functionals. The order
//! of the terms is fixed at construction; the estimators index into it.

use crate::core::vector_array::VectorArray;
use crate::error::RbError;
use crate::model::parameter::{Parameter, ParameterFunctional};
use faer::Mat;

/// One term `θ(μ) · component` of an affine decomposition.
#[derive(Clone, Debug)]
pub struct AffineTerm<C> {
    pub component: C,
    pub coefficient: ParameterFunctional,
}

/// A possibly parametric object with affine parameter dependence.
#[derive(Clone, Debug)]
pub enum Affine<C> {
    /// A single component, independent of the parameter.
    NonParametric(C),
    /// `Σ_q θ_q(μ) C_q` in declared order.
    Lincomb(Vec<AffineTerm<C>>),
}

/// Full-order or reduced operator with affine parameter dependence.
pub type ParametrizedOperator = Affine<Mat<f64>>;

/// Right-hand side with affine parameter dependence, represented by its range vectors.
pub type ParametrizedFunctional = Affine<Vec<f64>>;

impl<C> Affine<C> {
    /// Build a linear combination from `(component, coefficient)` pairs.
    pub fn lincomb<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = (C, ParameterFunctional)>,
    {
        Affine::Lincomb(
            terms
                .into_iter()
                .map(|(component, coefficient)| AffineTerm { component, coefficient })
                .collect(),
        )
    }

    pub fn parametric(&self) -> bool {
        matches!(self, Affine::Lincomb(_))
    }

    /// Number of affine terms; a non-parametric object counts as one.
    pub fn num_terms(&self) -> usize {
        match self {
            Affine::NonParametric(_) => 1,
            Affine::Lincomb(terms) => terms.len(),
        }
    }

    /// Components in declared order.
    pub fn components(&self) -> Vec<&C> {
        match self {
            Affine::NonParametric(c) => vec![c],
            Affine::Lincomb(terms) => terms.iter().map(|t| &t.component).collect(),
        }
    }

    /// `[θ_1(μ), …, θ_Q(μ)]`, or `[1]` for a non-parametric object.
    pub fn evaluate_coefficients(&self, mu: &Parameter) -> Vec<f64> {
        match self {
            Affine::NonParametric(_) => vec![1.0],
            Affine::Lincomb(terms) => terms.iter().map(|t| t.coefficient.evaluate(mu)).collect(),
        }
    }

    /// Apply `f` to every component, keeping coefficients and structure.
    pub fn map<D, F>(&self, mut f: F) -> Affine<D>
    where
        F: FnMut(&C) -> D,
    {
        match self {
            Affine::NonParametric(c) => Affine::NonParametric(f(c)),
            Affine::Lincomb(terms) => Affine::Lincomb(
                terms
                    .iter()
                    .map(|t| AffineTerm { component: f(&t.component), coefficient: t.coefficient.clone() })
                    .collect(),
            ),
        }
    }
}

impl Affine<Mat<f64>> {
    /// Number of columns of the components (0 for an empty combination).
    pub fn source_dim(&self) -> usize {
        self.components().first().map_or(0, |c| c.ncols())
    }

    /// Number of rows of the components (0 for an empty combination).
    pub fn range_dim(&self) -> usize {
        self.components().first().map_or(0, |c| c.nrows())
    }

    /// The assembled matrix `Σ_q θ_q(μ) A_q`.
    pub fn assemble(&self, mu: &Parameter) -> Mat<f64> {
        let coefficients = self.evaluate_coefficients(mu);
        let components = self.components();
        Mat::from_fn(self.range_dim(), self.source_dim(), |i, j| {
            components.iter().zip(&coefficients).map(|(a, c)| c * a[(i, j)]).sum::<f64>()
        })
    }

    /// `A(μ) · V`.
    pub fn apply(&self, v: &VectorArray, mu: &Parameter) -> Result<VectorArray, RbError> {
        if v.dim() != self.source_dim() {
            return Err(RbError::DimensionMismatch { expected: self.source_dim(), found: v.dim() });
        }
        VectorArray::from_mat(self.assemble(mu)).lincomb(v.as_ref())
    }
}

impl Affine<Vec<f64>> {
    /// Length of the range vectors (0 for an empty combination).
    pub fn dim(&self) -> usize {
        self.components().first().map_or(0, |c| c.len())
    }

    /// The component vectors as an array, one vector per affine term.
    pub fn as_range_array(&self) -> VectorArray {
        let columns: Vec<Vec<f64>> = self.components().into_iter().cloned().collect();
        VectorArray::from_mat(Mat::from_fn(self.dim(), columns.len(), |i, j| columns[j][i]))
    }

    /// The assembled vector `Σ_q θ_q(μ) f_q`.
    pub fn as_vector(&self, mu: &Parameter) -> Vec<f64> {
        let coefficients = self.evaluate_coefficients(mu);
        let components = self.components();
        (0..self.dim())
            .map(|i| components.iter().zip(&coefficients).map(|(f, c)| c * f[i]).sum::<f64>())
            .collect()
    }
}
