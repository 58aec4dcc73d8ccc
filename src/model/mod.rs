//! Parametrized full-order and reduced-order models.

pub mod affine;
pub mod parameter;
pub mod reduced;
pub mod stationary;

pub use affine::{Affine, AffineTerm, ParametrizedFunctional, ParametrizedOperator};
pub use parameter::{Parameter, ParameterFunctional};
pub use reduced::ReducedModel;
pub use stationary::StationaryModel;
