//! Dense-matrix helpers on top of Faer.
//!
//! Block concatenation and principal-submatrix extraction, the two layout operations the Simple
//! estimator needs to assemble and restrict its Gram matrix.

use crate::core::traits::SubmatrixExtract;
use faer::Mat;

impl<T: Copy + num_traits::Float> SubmatrixExtract for Mat<T> {
    fn submatrix(&self, indices: &[usize]) -> Self {
        let n = indices.len();
        Mat::from_fn(n, n, |i, j| self[(indices[i], indices[j])])
    }
}

/// Horizontal concatenation `[B₀ B₁ …]`. All blocks must have `nrows` rows.
pub fn hstack(nrows: usize, blocks: &[Mat<f64>]) -> Mat<f64> {
    assert!(blocks.iter().all(|b| b.nrows() == nrows), "hstack: row counts differ");
    let mut offsets = Vec::with_capacity(blocks.len());
    let mut ncols = 0;
    for b in blocks {
        offsets.push(ncols);
        ncols += b.ncols();
    }
    let mut out = Mat::zeros(nrows, ncols);
    for (b, &off) in blocks.iter().zip(&offsets) {
        for j in 0..b.ncols() {
            for i in 0..nrows {
                out[(i, off + j)] = b[(i, j)];
            }
        }
    }
    out
}

/// Vertical concatenation of blocks with `ncols` columns each.
pub fn vstack(ncols: usize, blocks: &[Mat<f64>]) -> Mat<f64> {
    assert!(blocks.iter().all(|b| b.ncols() == ncols), "vstack: column counts differ");
    let nrows = blocks.iter().map(|b| b.nrows()).sum();
    let mut out = Mat::zeros(nrows, ncols);
    let mut off = 0;
    for b in blocks {
        for j in 0..ncols {
            for i in 0..b.nrows() {
                out[(off + i, j)] = b[(i, j)];
            }
        }
        off += b.nrows();
    }
    out
}

/// Largest entrywise asymmetry `max |A_ij - A_ji|` of a square matrix.
pub fn asymmetry(a: &Mat<f64>) -> f64 {
    assert_eq!(a.nrows(), a.ncols(), "asymmetry: matrix is not square");
    let mut max = 0.0_f64;
    for j in 0..a.ncols() {
        for i in 0..j {
            max = max.max((a[(i, j)] - a[(j, i)]).abs());
        }
    }
    max
}

/// Largest entrywise deviation `max |G_ij - δ_ij|` from the identity.
pub fn identity_deviation(g: &Mat<f64>) -> f64 {
    let mut max = 0.0_f64;
    for j in 0..g.ncols() {
        for i in 0..g.nrows() {
            let target = if i == j { 1.0 } else { 0.0 };
            max = max.max((g[(i, j)] - target).abs());
        }
    }
    max
}
