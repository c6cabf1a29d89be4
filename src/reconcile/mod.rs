mod reconciler;
mod types;

pub use reconciler::{ReconcileOptions, Reconciler};
pub use types::{DiagnosticSet, ResolvedDiagnostic, Severity};
