//! Modified Gram-Schmidt with re-orthogonalization, w.r.t. an optional inner-product operator.
//!
//! Used to extend reduced bases and to build the orthonormal residual range hierarchically: only
//! the vectors from `offset` on are processed, the leading ones are assumed orthonormal already.

use crate::config::GramSchmidtOptions;
use crate::core::product::InnerProductOperator;
use crate::core::traits::InnerProduct;
use crate::core::vector_array::VectorArray;
use crate::error::RbError;
use crate::matrix::identity_deviation;

fn inner(product: Option<&InnerProductOperator>, x: &Vec<f64>, y: &Vec<f64>) -> f64 {
    match product {
        Some(p) => p.dot(x, y),
        None => ().dot(x, y),
    }
}

fn norm(product: Option<&InnerProductOperator>, x: &Vec<f64>) -> f64 {
    match product {
        Some(p) => p.norm(x),
        None => ().norm(x),
    }
}

/// Orthonormalize the vectors of `a` from index `offset` on.
///
/// Vectors that turn out to be (numerically) linearly dependent on their predecessors are removed,
/// so the result may be shorter than `a`. Removal never touches the first `offset` vectors.
pub fn gram_schmidt(
    a: VectorArray,
    product: Option<&InnerProductOperator>,
    offset: usize,
    options: &GramSchmidtOptions,
) -> Result<VectorArray, RbError> {
    if let Some(p) = product {
        if p.dim() != a.dim() {
            return Err(RbError::DimensionMismatch { expected: p.dim(), found: a.dim() });
        }
    }
    let dim = a.dim();
    let mut cols: Vec<Vec<f64>> = (0..a.len()).map(|j| a.column(j)).collect();
    let mut removed = vec![false; cols.len()];

    for i in offset..cols.len() {
        let initial_norm = norm(product, &cols[i]);
        if initial_norm < options.atol {
            log::debug!("removing vector {i} of norm {initial_norm:e}");
            removed[i] = true;
            continue;
        }

        let mut current = initial_norm;
        let mut first_iteration = true;
        let mut old_norm = current;
        while first_iteration || (options.reiterate && current / old_norm < options.reiteration_threshold) {
            if !first_iteration {
                log::debug!("orthonormalizing vector {i} again");
            }
            first_iteration = false;
            for j in 0..i {
                if removed[j] {
                    continue;
                }
                let p = inner(product, &cols[j], &cols[i]);
                let (head, tail) = cols.split_at_mut(i);
                for (x, y) in tail[0].iter_mut().zip(&head[j]) {
                    *x -= p * y;
                }
            }
            old_norm = current;
            current = norm(product, &cols[i]);
            if current < options.rtol * initial_norm {
                log::debug!("removing linearly dependent vector {i}");
                removed[i] = true;
                break;
            }
        }
        if !removed[i] {
            cols[i].iter_mut().for_each(|x| *x /= current);
        }
    }

    let kept: Vec<Vec<f64>> = cols.into_iter().zip(&removed).filter(|(_, r)| !**r).map(|(c, _)| c).collect();
    let result = VectorArray::from_columns(dim, &kept)?;

    if options.check && result.len() > offset {
        let new = result.columns(offset..result.len());
        let error = match product {
            Some(p) => p.inner(&new, &result)?,
            None => new.dot(&result),
        };
        // the new rows must be the identity shifted by `offset` and vanish on the leading columns
        let shifted = faer::Mat::from_fn(error.nrows(), error.nrows(), |i, j| error[(i, offset + j)]);
        let mut err = identity_deviation(&shifted);
        for j in 0..offset {
            for i in 0..error.nrows() {
                err = err.max(error[(i, j)].abs());
            }
        }
        if err >= options.check_tol {
            return Err(RbError::Accuracy(format!("result not orthonormal (error {err:e})")));
        }
    }

    Ok(result)
}
