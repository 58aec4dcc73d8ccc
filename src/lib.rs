//! rbest: reduced-basis reduction and a-posteriori error estimation for coercive problems, over Faer
//!
//! This crate projects affinely parametrized stationary linear systems onto a reduced basis and
//! attaches residual-based error estimators to the reduced models: a general estimator built on
//! an orthonormal residual range, and a Gram-matrix estimator for fully affine problems whose
//! assembly is incremental in the basis size. Both can be restricted to sub-bases without
//! touching the full-order model again.

pub mod algorithms;
pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod estimator;
pub mod matrix;
pub mod model;
pub mod reductor;
pub mod solver;
pub mod utils;

// Re-exports for convenience
pub use crate::core::{InnerProductOperator, VectorArray, riesz_representatives};
pub use config::{GramSchmidtOptions, InducedNormOptions, ReductorOptions};
pub use context::RieszSolverKind;
pub use error::RbError;
pub use estimator::{CoerciveRbEstimator, Diagnostic, DiagnosticSink, Estimator, LogSink, SimpleCoerciveRbEstimator};
pub use model::{Affine, Parameter, ParameterFunctional, ReducedModel, StationaryModel};
pub use reductor::{
    CoerciveRbReductor, ExtensionCache, ExtensionMethod, SimpleCoerciveRbReductor, StationaryRbReductor,
};

pub use utils::convergence::SolveStats;
