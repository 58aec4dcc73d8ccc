//! Parameters and parameter functionals.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A point `μ` in parameter space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parameter(Vec<f64>);

impl Deref for Parameter {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for Parameter {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl From<&[f64]> for Parameter {
    fn from(values: &[f64]) -> Self {
        Self(values.to_vec())
    }
}

impl From<f64> for Parameter {
    fn from(value: f64) -> Self {
        Self(vec![value])
    }
}

/// A scalar function of the parameter: an affine coefficient `θ_q(μ)` or a coercivity lower
/// bound `α_LB(μ)`. Cheap to clone; the function is shared.
#[derive(Clone)]
pub struct ParameterFunctional {
    f: Arc<dyn Fn(&Parameter) -> f64 + Send + Sync>,
}

impl ParameterFunctional {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Parameter) -> f64 + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// The functional `μ ↦ c`.
    pub fn constant(c: f64) -> Self {
        Self::new(move |_| c)
    }

    /// The functional `μ ↦ μ[index]`.
    ///
    /// # Panics
    /// Evaluation panics if the parameter has fewer than `index + 1` components.
    pub fn component(index: usize) -> Self {
        Self::new(move |mu| mu[index])
    }

    pub fn evaluate(&self, mu: &Parameter) -> f64 {
        (self.f)(mu)
    }
}

impl fmt::Debug for ParameterFunctional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ParameterFunctional(..)")
    }
}
