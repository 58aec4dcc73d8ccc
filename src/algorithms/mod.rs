//! Basis-processing algorithms.

pub mod gram_schmidt;

pub use gram_schmidt::gram_schmidt;
