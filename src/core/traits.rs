//! Kernel traits shared by the solvers, the orthonormalization and the estimators.

/// `y ← A·x` for an operator acting on vectors of type `V`.
pub trait MatVec<V> {
    fn matvec(&self, x: &V, y: &mut V);
}

/// An inner product on vectors of type `V` and the norm it induces.
///
/// `()` is the Euclidean inner product.
pub trait InnerProduct<V> {
    type Scalar: Copy + PartialOrd + From<f64>;
    fn dot(&self, x: &V, y: &V) -> Self::Scalar;
    fn norm(&self, x: &V) -> Self::Scalar;
}

/// The principal submatrix at `indices`: rows and columns in the given order.
pub trait SubmatrixExtract {
    fn submatrix(&self, indices: &[usize]) -> Self;
}
