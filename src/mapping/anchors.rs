use crate::error::{read_text, Result};
use crate::parser::find_directive_lines;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Sorted 0-based directive line numbers of one original file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveAnchorIndex {
    lines: Vec<usize>,
}

impl DirectiveAnchorIndex {
    pub fn from_text(text: &str, markers: &[String]) -> Self {
        Self {
            lines: find_directive_lines(text, markers),
        }
    }

    /// Build from already-known lines; they are sorted and deduplicated.
    pub fn from_lines(mut lines: Vec<usize>) -> Self {
        lines.sort_unstable();
        lines.dedup();
        Self { lines }
    }

    pub fn lines(&self) -> &[usize] {
        &self.lines
    }

    pub fn contains(&self, line: usize) -> bool {
        self.lines.binary_search(&line).is_ok()
    }

    /// Pull `raw_line` back to the nearest directive at or before it.
    ///
    /// Never snaps forward. Returns `None` when no directive precedes the line
    /// or the nearest one is more than `max_distance` lines away.
    pub fn snap(&self, raw_line: usize, max_distance: usize) -> Option<usize> {
        if self.contains(raw_line) {
            return Some(raw_line);
        }
        let preceding = self.lines.partition_point(|&l| l <= raw_line);
        let anchor = *self.lines.get(preceding.checked_sub(1)?)?;
        (raw_line - anchor <= max_distance).then_some(anchor)
    }
}

/// Per-path directive indices, reused within one reconciliation batch.
#[derive(Debug, Default)]
pub struct AnchorCache {
    indices: HashMap<PathBuf, Arc<DirectiveAnchorIndex>>,
}

impl AnchorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached index for `path`, scanning the file on first use.
    /// Read failures are not cached so the next batch retries.
    pub fn get_or_index(
        &mut self,
        path: &Path,
        markers: &[String],
    ) -> Result<Arc<DirectiveAnchorIndex>> {
        if let Some(index) = self.indices.get(path) {
            return Ok(Arc::clone(index));
        }
        let text = read_text(path)?;
        let index = Arc::new(DirectiveAnchorIndex::from_text(&text, markers));
        debug!(path = %path.display(), directives = index.lines().len(), "indexed directives");
        self.indices.insert(path.to_path_buf(), Arc::clone(&index));
        Ok(index)
    }

    pub fn invalidate_all(&mut self) {
        self.indices.clear();
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
