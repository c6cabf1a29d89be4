use super::paths::normalize;
use crate::config::ReconcileConfig;
use crate::error::{read_text, Error, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SubstitutionArtifact {
    #[serde(default)]
    substitutions: BTreeMap<PathBuf, PathBuf>,
}

/// Original source path → generated (shadow) path, as written by the generator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubstitutionTable {
    entries: BTreeMap<PathBuf, PathBuf>,
}

impl SubstitutionTable {
    pub fn from_entries<I, P, Q>(entries: I) -> Self
    where
        I: IntoIterator<Item = (P, Q)>,
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(orig, generated)| (normalize(orig.as_ref()), normalize(generated.as_ref())))
                .collect(),
        }
    }

    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        let artifact: SubstitutionArtifact = serde_json::from_str(text)?;
        Ok(Self::from_entries(artifact.substitutions))
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = read_text(path)?;
        Self::from_json_str(&text).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the workspace artifact. A missing or corrupt artifact is the normal
    /// state before the generator has run, so it yields `None` instead of an error.
    pub fn load(root: &Path, config: &ReconcileConfig) -> Option<Self> {
        let path = config.artifact_path(root);
        match Self::read(&path) {
            Ok(table) => {
                debug!(path = %path.display(), entries = table.len(), "loaded substitution table");
                Some(table)
            }
            Err(err) => {
                debug!(error = %err, "no usable substitution table");
                None
            }
        }
    }

    pub fn generated_for(&self, original: &Path) -> Option<&Path> {
        self.entries.get(original).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.entries
            .iter()
            .map(|(orig, generated)| (orig.as_path(), generated.as_path()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invert the table. If two originals claim one generated path the first
    /// (in sorted order) wins.
    pub fn reverse(&self) -> ReverseTable {
        let mut entries = HashMap::with_capacity(self.entries.len());
        for (orig, generated) in &self.entries {
            entries.entry(generated.clone()).or_insert_with(|| orig.clone());
        }
        ReverseTable { entries }
    }
}

/// Generated path → original path.
#[derive(Debug, Clone, Default)]
pub struct ReverseTable {
    entries: HashMap<PathBuf, PathBuf>,
}

impl ReverseTable {
    pub fn original_for(&self, generated: &Path) -> Option<&Path> {
        self.entries.get(generated).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
