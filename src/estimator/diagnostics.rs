//! Non-fatal diagnostics raised while building or restricting estimators.
//!
//! Components never log on their own behalf; they report to the [`DiagnosticSink`] they were
//! constructed with. [`LogSink`] forwards everything to the `log` facade, and any
//! `Fn(&Diagnostic)` closure is a sink as well.

use std::fmt;
use std::sync::Arc;

/// A degraded-but-correct condition worth reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Sub-basis restriction had no residual range dimensions and projected the full residual.
    SlowSubbasisRestriction { dim: usize },
    /// The residual was reduced without an orthonormal range; restrictions will be slow.
    ResidualRangeUnavailable,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::SlowSubbasisRestriction { dim } => {
                write!(f, "cannot efficiently reduce to subbasis of dimension {dim}")
            }
            Diagnostic::ResidualRangeUnavailable => {
                f.write_str("residual range not projected, subbasis restriction will be unoptimized")
            }
        }
    }
}

/// Receiver of [`Diagnostic`]s.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: &Diagnostic);
}

/// Forwards diagnostics to `log::warn!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, diagnostic: &Diagnostic) {
        log::warn!("{diagnostic}");
    }
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic) + Send + Sync,
{
    fn report(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

/// The sink used when none is configured.
pub fn default_sink() -> Arc<dyn DiagnosticSink> {
    Arc::new(LogSink)
}
