//! Maps compiler diagnostics reported against a generated ("shadow") source tree
//! back onto the hand-written files they came from.
//!
//! The generator splices checks into copies of the original files and leaves
//! `// ORIGLINE <path>:<line>` markers behind; [`Reconciler`] reads those markers,
//! the generator's substitution table and the directive comments in the original
//! files to anchor each error where the user wrote the contract.

pub mod config;
pub mod error;
pub mod mapping;
pub mod parser;
pub mod reconcile;

pub use config::ReconcileConfig;
pub use error::{Error, Result};
pub use reconcile::{DiagnosticSet, ReconcileOptions, Reconciler, ResolvedDiagnostic, Severity};

use std::path::Path;

/// One batch with the default configuration and a fresh cache.
pub fn reconcile(output: &str, workspace_root: &Path) -> DiagnosticSet {
    Reconciler::new(ReconcileConfig::default()).reconcile(output, workspace_root)
}
