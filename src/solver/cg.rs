//! Conjugate gradients for the SPD inner-product matrices (Saad §6.7).
//!
//! Riesz representatives of long full-order vectors can be computed without factorizing the
//! product matrix. The iteration starts from the incoming `x`.

use crate::core::traits::{InnerProduct, MatVec};
use crate::error::RbError;
use crate::solver::LinearSolver;
use crate::utils::convergence::{Convergence, SolveStats};

#[derive(Debug, Clone, Copy)]
pub struct CgSolver {
    conv: Convergence<f64>,
}

impl CgSolver {
    pub fn new(tol: f64, max_iters: usize) -> Self {
        Self { conv: Convergence { tol, max_iters } }
    }

    pub fn convergence(&self) -> Convergence<f64> {
        self.conv
    }
}

impl<M: MatVec<Vec<f64>>> LinearSolver<M, Vec<f64>> for CgSolver {
    type Error = RbError;
    type Scalar = f64;

    fn solve(&mut self, a: &M, b: &Vec<f64>, x: &mut Vec<f64>) -> Result<SolveStats<f64>, RbError> {
        let ip = ();
        let n = b.len();
        x.resize(n, 0.0);
        let mut ap = vec![0.0; n];
        a.matvec(x, &mut ap);
        let mut r: Vec<f64> = b.iter().zip(&ap).map(|(bi, ai)| bi - ai).collect();
        let reference = ip.norm(b);
        let mut rr = ip.dot(&r, &r);
        if let Some(stats) = self.conv.step(0, rr.sqrt(), reference) {
            return Ok(stats);
        }

        let mut p = r.clone();
        for k in 1..=self.conv.max_iters {
            a.matvec(&p, &mut ap);
            let curvature = ip.dot(&p, &ap);
            if curvature <= 0.0 {
                return Err(RbError::SolveError(format!(
                    "matrix is not positive definite (pᵀAp = {curvature:e} at iteration {k})"
                )));
            }
            let alpha = rr / curvature;
            x.iter_mut().zip(&p).for_each(|(xi, pi)| *xi += alpha * pi);
            r.iter_mut().zip(&ap).for_each(|(ri, api)| *ri -= alpha * api);
            let rr_new = ip.dot(&r, &r);
            if let Some(stats) = self.conv.step(k, rr_new.sqrt(), reference) {
                return Ok(stats);
            }
            let beta = rr_new / rr;
            p.iter_mut().zip(&r).for_each(|(pi, ri)| *pi = ri + beta * *pi);
            rr = rr_new;
        }
        Ok(SolveStats { iterations: self.conv.max_iters, final_residual: rr.sqrt(), converged: false })
    }
}
