//! API options for reductors, induced norms and orthonormalization.
//!
//! All option structs are plain `Copy` values with `Default` impls and builder-style `with_*`
//! setters, so a caller can write `ReductorOptions::default().with_check_tol(1e-6)`.

/// Options shared by every reductor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReductorOptions {
    /// Check that the basis is orthonormal w.r.t. the product before projecting.
    pub check_orthonormality: bool,

    /// Maximum entrywise deviation of the basis Gram matrix from the identity.
    pub check_tol: f64,

    /// Fail instead of dividing when the coercivity estimate is not strictly positive.
    pub validate_coercivity: bool,

    /// Evaluation options of the Simple estimator's quadratic form.
    pub norm: InducedNormOptions,
}

impl Default for ReductorOptions {
    fn default() -> Self {
        Self {
            check_orthonormality: true,
            check_tol: 1e-3,
            validate_coercivity: false,
            norm: InducedNormOptions::default(),
        }
    }
}

impl ReductorOptions {
    pub fn with_check_orthonormality(mut self, check: bool) -> Self {
        self.check_orthonormality = check;
        self
    }
    pub fn with_check_tol(mut self, tol: f64) -> Self {
        self.check_tol = tol;
        self
    }
    pub fn with_coercivity_validation(mut self, validate: bool) -> Self {
        self.validate_coercivity = validate;
        self
    }
    pub fn with_norm(mut self, norm: InducedNormOptions) -> Self {
        self.norm = norm;
        self
    }
}

/// How `sqrt(cᵀ M c)` treats round-off below zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InducedNormOptions {
    /// Raise an error when the squared norm is below `-tol`.
    pub raise_negative: bool,

    /// Squared norms in `[-tol, 0)` are clipped to zero.
    pub tol: f64,
}

impl Default for InducedNormOptions {
    fn default() -> Self {
        Self { raise_negative: true, tol: 1e-10 }
    }
}

impl InducedNormOptions {
    pub fn with_raise_negative(mut self, raise: bool) -> Self {
        self.raise_negative = raise;
        self
    }
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }
}

/// Gram-Schmidt tolerances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GramSchmidtOptions {
    /// Vectors with initial norm below `atol` are removed.
    pub atol: f64,

    /// Vectors whose norm drops below `rtol` times their initial norm are removed.
    pub rtol: f64,

    /// Orthogonalize again when a pass shrinks the norm by more than `reiteration_threshold`.
    pub reiterate: bool,
    pub reiteration_threshold: f64,

    /// Verify the result against the identity Gram matrix.
    pub check: bool,
    pub check_tol: f64,
}

impl Default for GramSchmidtOptions {
    fn default() -> Self {
        Self {
            atol: 1e-13,
            rtol: 1e-13,
            reiterate: true,
            reiteration_threshold: 1e-1,
            check: true,
            check_tol: 1e-3,
        }
    }
}

impl GramSchmidtOptions {
    pub fn with_tolerances(mut self, atol: f64, rtol: f64) -> Self {
        self.atol = atol;
        self.rtol = rtol;
        self
    }
    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }
    pub fn with_check_tol(mut self, tol: f64) -> Self {
        self.check_tol = tol;
        self
    }
}
