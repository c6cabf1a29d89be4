use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

/// A diagnostic anchored in the original tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedDiagnostic {
    #[serde(skip)]
    pub file: PathBuf,
    /// 0-based.
    pub line: usize,
    pub message: String,
    pub severity: Severity,
    pub source: String,
}

/// Diagnostics of one batch grouped by original file.
///
/// Files are kept sorted; within a file, entries appear in compiler output order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DiagnosticSet {
    files: BTreeMap<PathBuf, Vec<ResolvedDiagnostic>>,
}

impl DiagnosticSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, diag: ResolvedDiagnostic) {
        self.files.entry(diag.file.clone()).or_default().push(diag);
    }

    pub fn get(&self, file: &Path) -> Option<&[ResolvedDiagnostic]> {
        self.files.get(file).map(Vec::as_slice)
    }

    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[ResolvedDiagnostic])> {
        self.files
            .iter()
            .map(|(file, diags)| (file.as_path(), diags.as_slice()))
    }

    /// Total number of diagnostics across all files.
    pub fn len(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_map(self) -> BTreeMap<PathBuf, Vec<ResolvedDiagnostic>> {
        self.files
    }
}
