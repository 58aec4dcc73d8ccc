//! Context module for rbest.
//!
//! Contexts encapsulate solver selection for the inner-product operators whose inverses produce
//! Riesz representatives.
//!
//! Modules:
//! - [`riesz_context`]: Contains the `RieszContext` struct and the `RieszSolverKind` selector.

pub mod riesz_context;
pub use riesz_context::{RieszContext, RieszSolverKind};
