//! Shared fixtures: a 1-D two-subdomain diffusion problem discretized with linear finite elements.
//!
//! `-(κ(x) u')' + 10·u = f` on (0, 1) with homogeneous Dirichlet conditions, where `κ = μ₀` on
//! the left half and `κ = μ₁` on the right half. The operator is `μ₀·A₀ + μ₁·A₁ + 10·M`, the rhs
//! is `f_left + μ₁·f_right`, and with the H¹-seminorm product `A₀ + A₁` the value `min(μ₀, μ₁)`
//! is a coercivity lower bound.

#![allow(dead_code)]

use faer::Mat;
use rbest::model::{Affine, Parameter, ParameterFunctional, StationaryModel};
use rbest::{InnerProductOperator, VectorArray};
use std::sync::Arc;

/// Stiffness contributions of the left and right halves, on `n` interior nodes.
fn stiffness(n: usize) -> (Mat<f64>, Mat<f64>) {
    let h = 1.0 / (n + 1) as f64;
    let mut left = Mat::<f64>::zeros(n, n);
    let mut right = Mat::<f64>::zeros(n, n);
    // element e joins nodes e and e + 1 of the n + 2 nodes; nodes 0 and n + 1 are fixed
    for e in 0..=n {
        let target = if (e as f64 + 0.5) * h < 0.5 { &mut left } else { &mut right };
        let nodes = [e.checked_sub(1), if e < n { Some(e) } else { None }];
        for (a, ia) in nodes.iter().enumerate() {
            for (b, ib) in nodes.iter().enumerate() {
                if let (Some(i), Some(j)) = (ia, ib) {
                    let sign = if a == b { 1.0 } else { -1.0 };
                    target[(*i, *j)] += sign / h;
                }
            }
        }
    }
    (left, right)
}

/// Lumped load vectors of a unit source on the left and on the right half.
fn loads(n: usize) -> (Vec<f64>, Vec<f64>) {
    let h = 1.0 / (n + 1) as f64;
    let x = |i: usize| (i + 1) as f64 * h;
    let left = (0..n).map(|i| if x(i) < 0.5 { h * (1.0 + x(i)) } else { 0.0 }).collect();
    let right = (0..n).map(|i| if x(i) >= 0.5 { h * (2.0 - x(i)) } else { 0.0 }).collect();
    (left, right)
}

/// The full-order model and its energy product.
pub fn thermal_block(n: usize) -> (Arc<StationaryModel>, Arc<InnerProductOperator>) {
    let (a0, a1) = stiffness(n);
    let (f0, f1) = loads(n);
    let h = 1.0 / (n + 1) as f64;
    let mass = Mat::from_fn(n, n, |i, j| if i == j { h } else { 0.0 });
    let product = Arc::new(InnerProductOperator::new(&a0 + &a1).unwrap());
    let operator = Affine::lincomb([
        (a0, ParameterFunctional::component(0)),
        (a1, ParameterFunctional::component(1)),
        (mass, ParameterFunctional::constant(10.0)),
    ]);
    let rhs = Affine::lincomb([(f0, ParameterFunctional::constant(1.0)), (f1, ParameterFunctional::component(1))]);
    (Arc::new(StationaryModel::new(operator, rhs).unwrap()), product)
}

/// `μ ↦ min(μ₀, μ₁)`.
pub fn coercivity() -> ParameterFunctional {
    ParameterFunctional::new(|mu| mu[0].min(mu[1]))
}

pub fn training_set() -> Vec<Parameter> {
    vec![
        Parameter::from(vec![0.1, 1.0]),
        Parameter::from(vec![1.0, 0.1]),
        Parameter::from(vec![0.5, 0.5]),
        Parameter::from(vec![2.0, 0.3]),
    ]
}

pub fn test_set() -> Vec<Parameter> {
    vec![
        Parameter::from(vec![0.2, 0.7]),
        Parameter::from(vec![1.5, 0.15]),
        Parameter::from(vec![0.9, 0.9]),
    ]
}

/// Full-order solutions at `params`, one per column.
pub fn snapshots(fom: &StationaryModel, params: &[Parameter]) -> VectorArray {
    let columns: Vec<Vec<f64>> = params.iter().map(|mu| fom.solve(mu).unwrap()).collect();
    VectorArray::from_columns(fom.dim(), &columns).unwrap()
}

/// `‖u - RB·uᵣ‖` in the product.
pub fn reduction_error(
    product: &InnerProductOperator,
    u: &[f64],
    basis: &VectorArray,
    ur: &Mat<f64>,
) -> f64 {
    let lifted = basis.lincomb(ur.as_ref()).unwrap();
    let e: Vec<f64> = u.iter().zip(lifted.column(0)).map(|(a, b)| a - b).collect();
    product.norms(&VectorArray::from_vec(&e)).unwrap()[0]
}
