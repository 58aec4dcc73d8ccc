//! Norm induced by a symmetric positive-semidefinite matrix.

use crate::config::InducedNormOptions;
use crate::core::traits::{InnerProduct, MatVec};
use crate::error::RbError;
use faer::Mat;
use std::sync::Arc;

/// `c ↦ sqrt(cᵀ M c)`.
#[derive(Debug, Clone)]
pub struct InducedNorm {
    matrix: Arc<Mat<f64>>,
    options: InducedNormOptions,
}

impl InducedNorm {
    pub fn new(matrix: Arc<Mat<f64>>, options: InducedNormOptions) -> Self {
        Self { matrix, options }
    }

    pub fn matrix(&self) -> &Mat<f64> {
        &self.matrix
    }

    pub fn options(&self) -> InducedNormOptions {
        self.options
    }

    /// `cᵀ M c`, unclipped.
    pub fn squared(&self, c: &[f64]) -> Result<f64, RbError> {
        if c.len() != self.matrix.ncols() {
            return Err(RbError::DimensionMismatch { expected: self.matrix.ncols(), found: c.len() });
        }
        let c = c.to_vec();
        let mut mc = vec![0.0; c.len()];
        self.matrix.matvec(&c, &mut mc);
        Ok(().dot(&c, &mc))
    }

    /// `sqrt(cᵀ M c)`, with round-off below zero clipped or reported.
    pub fn apply(&self, c: &[f64]) -> Result<f64, RbError> {
        let sq = self.squared(c)?;
        if sq < 0.0 {
            if sq < -self.options.tol && self.options.raise_negative {
                return Err(RbError::NegativeNormSquared(sq));
            }
            return Ok(0.0);
        }
        Ok(sq.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use faer::mat;

    #[test]
    fn evaluates_quadratic_form() {
        let norm = InducedNorm::new(Arc::new(mat![[2.0, 1.0], [1.0, 2.0]]), InducedNormOptions::default());
        assert_abs_diff_eq!(norm.apply(&[1.0, 1.0]).unwrap(), 6.0f64.sqrt(), epsilon = 1e-14);
        assert_eq!(norm.apply(&[0.0, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn evaluates_on_borrowed_slices() {
        let norm = InducedNorm::new(Arc::new(mat![[2.0, 1.0], [1.0, 2.0]]), InducedNormOptions::default());
        let coefficients = [5.0, 1.0, -1.0, 7.0];
        assert_abs_diff_eq!(norm.squared(&coefficients[1..3]).unwrap(), 2.0, epsilon = 1e-14);
        assert_abs_diff_eq!(norm.apply(&coefficients[1..3]).unwrap(), 2.0f64.sqrt(), epsilon = 1e-14);
    }

    #[test]
    fn negative_squares_are_clipped_or_raised() {
        let m = Arc::new(mat![[1.0, 0.0], [0.0, -1.0]]);
        let strict = InducedNorm::new(Arc::clone(&m), InducedNormOptions::default());
        assert!(matches!(strict.apply(&[0.0, 1.0]), Err(RbError::NegativeNormSquared(_))));
        assert_eq!(strict.apply(&[0.0, 1e-6]).unwrap(), 0.0);
        let lenient = InducedNorm::new(m, InducedNormOptions::default().with_raise_negative(false));
        assert_eq!(lenient.apply(&[0.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn rejects_wrong_length() {
        let norm = InducedNorm::new(Arc::new(Mat::identity(3, 3)), InducedNormOptions::default());
        assert_eq!(norm.apply(&[1.0]).unwrap_err(), RbError::DimensionMismatch { expected: 3, found: 1 });
    }
}
