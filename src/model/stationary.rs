//! Full-order stationary model `A(μ) u(μ) = f(μ)`.

use crate::error::RbError;
use crate::model::affine::{Affine, ParametrizedFunctional, ParametrizedOperator};
use crate::model::parameter::Parameter;
use crate::solver::{LinearSolver, LuSolver};

/// A stationary, affinely parametrized linear system.
#[derive(Clone, Debug)]
pub struct StationaryModel {
    operator: ParametrizedOperator,
    rhs: ParametrizedFunctional,
    linear: bool,
}

impl StationaryModel {
    /// Validates that every operator component is `n×n` and every rhs component has length `n`.
    pub fn new(operator: ParametrizedOperator, rhs: ParametrizedFunctional) -> Result<Self, RbError> {
        check_structure(&operator, &rhs)?;
        Ok(Self { operator, rhs, linear: true })
    }

    /// Flag the model as non-linear, e.g. when `operator` is only a linearization.
    pub fn with_linear(mut self, linear: bool) -> Self {
        self.linear = linear;
        self
    }

    pub fn operator(&self) -> &ParametrizedOperator {
        &self.operator
    }

    pub fn rhs(&self) -> &ParametrizedFunctional {
        &self.rhs
    }

    pub fn is_linear(&self) -> bool {
        self.linear
    }

    /// Dimension of the state space.
    pub fn dim(&self) -> usize {
        self.operator.source_dim()
    }

    /// Solve the full-order system at `mu` by LU.
    pub fn solve(&self, mu: &Parameter) -> Result<Vec<f64>, RbError> {
        let a = self.operator.assemble(mu);
        let f = self.rhs.as_vector(mu);
        let mut u = vec![0.0; f.len()];
        LuSolver::new().solve(&a, &f, &mut u)?;
        Ok(u)
    }
}

pub(crate) fn check_structure(
    operator: &ParametrizedOperator,
    rhs: &ParametrizedFunctional,
) -> Result<(), RbError> {
    if let Affine::Lincomb(terms) = operator {
        if terms.is_empty() {
            return Err(RbError::Precondition("operator has no affine terms".into()));
        }
    }
    if let Affine::Lincomb(terms) = rhs {
        if terms.is_empty() {
            return Err(RbError::Precondition("rhs has no affine terms".into()));
        }
    }
    let n = operator.source_dim();
    for a in operator.components() {
        if a.nrows() != n || a.ncols() != n {
            return Err(RbError::Precondition(format!(
                "operator components must be {n}x{n}, found {}x{}",
                a.nrows(),
                a.ncols()
            )));
        }
    }
    for f in rhs.components() {
        if f.len() != n {
            return Err(RbError::DimensionMismatch { expected: n, found: f.len() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parameter::ParameterFunctional;
    use approx::assert_abs_diff_eq;
    use faer::mat;

    #[test]
    fn solves_assembled_system() {
        let op = Affine::lincomb([
            (mat![[2.0, 0.0], [0.0, 1.0]], ParameterFunctional::component(0)),
            (mat![[1.0, 0.0], [0.0, 1.0]], ParameterFunctional::constant(1.0)),
        ]);
        let m = StationaryModel::new(op, Affine::NonParametric(vec![3.0, 2.0])).unwrap();
        let u = m.solve(&Parameter::from(1.0)).unwrap();
        assert_abs_diff_eq!(u[0], 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(u[1], 1.0, epsilon = 1e-14);
        assert!(m.is_linear());
        assert!(!m.clone().with_linear(false).is_linear());
    }

    #[test]
    fn rejects_inconsistent_components() {
        let op = Affine::NonParametric(mat![[1.0, 0.0], [0.0, 1.0]]);
        let err = StationaryModel::new(op.clone(), Affine::NonParametric(vec![1.0])).unwrap_err();
        assert_eq!(err, RbError::DimensionMismatch { expected: 2, found: 1 });
        let err = StationaryModel::new(op, Affine::Lincomb(Vec::new())).unwrap_err();
        assert!(matches!(err, RbError::Precondition(_)));
    }
}
