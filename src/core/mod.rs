//! Linear-algebra building blocks: kernel traits, vector arrays and inner-product operators.

pub mod product;
pub mod traits;
pub mod vector_array;
pub mod wrappers;

pub use product::{InnerProductOperator, riesz_representatives};
pub use traits::{InnerProduct, MatVec, SubmatrixExtract};
pub use vector_array::VectorArray;
