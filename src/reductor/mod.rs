//! Reductors: Galerkin projection onto a reduced basis plus estimator assembly.

pub mod basic;
pub mod coercive;
pub mod residual;
pub mod simple;

pub use basic::{EstimatorHooks, ExtensionMethod, NoEstimator, StationaryRbReductor};
pub use coercive::CoerciveRbReductor;
pub use residual::{ReducedResidual, ResidualReductor};
pub use simple::{ExtensionCache, SimpleCoerciveRbReductor};
