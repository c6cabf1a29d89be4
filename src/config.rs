use crate::error::{read_text, Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default distance, in lines, a raw position may sit past a directive and still snap to it.
pub const DEFAULT_MAX_SNAP_DISTANCE: usize = 30;

/// Tunables for one workspace. Every field may be omitted from the JSON form.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Comment leader that introduces a positional marker in generated files.
    pub comment_prefix: String,
    /// Token following the comment leader, e.g. `// ORIGLINE foo.go:42`.
    pub marker_token: String,
    /// Substrings that make an original-tree line a directive line.
    pub directive_markers: Vec<String>,
    pub max_snap_distance: usize,
    /// File suffixes that identify hand-authored sources.
    pub source_suffixes: Vec<String>,
    /// Directory under the workspace root owned by the generator.
    pub cache_dir: String,
    /// Substitution artifact name inside `cache_dir`.
    pub artifact_name: String,
    pub source_tag: String,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            comment_prefix: "//".to_string(),
            marker_token: "ORIGLINE".to_string(),
            directive_markers: vec!["//@".to_string()],
            max_snap_distance: DEFAULT_MAX_SNAP_DISTANCE,
            source_suffixes: vec![".go".to_string()],
            cache_dir: ".shadowmap".to_string(),
            artifact_name: "substitutions.json".to_string(),
            source_tag: "shadowmap".to_string(),
        }
    }
}

impl ReconcileConfig {
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Load a config file. Unlike the substitution artifact, a bad config is a hard error.
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_text(path)?;
        Self::from_json_str(&text).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn is_source_file(&self, path: &Path) -> bool {
        let name = path.to_string_lossy();
        self.source_suffixes
            .iter()
            .any(|suffix| name.ends_with(suffix.as_str()))
    }

    pub fn artifact_path(&self, root: &Path) -> std::path::PathBuf {
        root.join(&self.cache_dir).join(&self.artifact_name)
    }
}
