//! Kernel trait implementations for faer matrices, plain vectors and inner-product operators.
//!
//! `()` is the Euclidean inner product on `Vec<f64>`; its reductions run on Rayon when the `rayon`
//! feature is enabled. An [`InnerProductOperator`] is the inner product `xᵀ P y`.

use crate::core::product::InnerProductOperator;
use crate::core::traits::{InnerProduct, MatVec};
use faer::{Mat, MatRef};

impl MatVec<Vec<f64>> for Mat<f64> {
    fn matvec(&self, x: &Vec<f64>, y: &mut Vec<f64>) {
        assert_eq!(self.ncols(), x.len(), "matvec: input has wrong length");
        assert_eq!(self.nrows(), y.len(), "matvec: output has wrong length");
        if self.ncols() == 0 {
            y.fill(0.0);
            return;
        }
        let ax = self.as_ref() * MatRef::from_column_major_slice(x, x.len(), 1);
        for (i, yi) in y.iter_mut().enumerate() {
            *yi = ax[(i, 0)];
        }
    }
}

impl InnerProduct<Vec<f64>> for () {
    type Scalar = f64;

    fn dot(&self, x: &Vec<f64>, y: &Vec<f64>) -> f64 {
        assert_eq!(x.len(), y.len(), "dot: vectors have different lengths");
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            x.par_iter().zip(y.par_iter()).map(|(a, b)| a * b).sum()
        }
        #[cfg(not(feature = "rayon"))]
        {
            x.iter().zip(y).map(|(a, b)| a * b).sum()
        }
    }

    fn norm(&self, x: &Vec<f64>) -> f64 {
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            x.par_iter().map(|a| a * a).sum::<f64>().sqrt()
        }
        #[cfg(not(feature = "rayon"))]
        {
            x.iter().map(|a| a * a).sum::<f64>().sqrt()
        }
    }
}

impl InnerProduct<Vec<f64>> for InnerProductOperator {
    type Scalar = f64;

    fn dot(&self, x: &Vec<f64>, y: &Vec<f64>) -> f64 {
        self.inner_vectors(x, y)
    }

    /// Round-off below zero is clipped.
    fn norm(&self, x: &Vec<f64>) -> f64 {
        self.inner_vectors(x, x).max(0.0).sqrt()
    }
}
