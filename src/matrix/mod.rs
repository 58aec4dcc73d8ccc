//! Matrix module: dense layout helpers.

pub mod dense;
pub use dense::{asymmetry, hstack, identity_deviation, vstack};
