//! Configuration structs.

pub mod options;

pub use options::{GramSchmidtOptions, InducedNormOptions, ReductorOptions};
