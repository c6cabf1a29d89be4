use super::types::{DiagnosticSet, ResolvedDiagnostic, Severity};
use crate::config::ReconcileConfig;
use crate::error::read_text;
use crate::mapping::{is_within, normalize, resolve, AnchorCache, ReverseTable, SubstitutionTable};
use crate::parser::{find_markers, parse_compiler_output, resolve_line, RawDiagnostic};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info_span, warn};

/// Per-batch knobs that depend on how the compiler was invoked.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    /// Directory the compiler ran in; relative paths in its output are joined to it.
    /// Defaults to the workspace root; a relative value is taken from the workspace root.
    pub compiler_root: Option<PathBuf>,
}

/// Everything that stays fixed while one batch's diagnostics are classified.
struct Batch {
    root: PathBuf,
    compiler_root: PathBuf,
    generated_dir: PathBuf,
    reverse: ReverseTable,
}

fn in_workspace(file: &Path, batch: &Batch) -> bool {
    let inside = is_within(file, &batch.root);
    if !inside {
        debug!(file = %file.display(), "outside workspace, dropped");
    }
    inside
}

/// Maps compiler diagnostics against the generated tree back onto original files.
///
/// Not meant to run concurrently over one workspace; callers coalesce runs.
#[derive(Debug)]
pub struct Reconciler {
    config: ReconcileConfig,
    cache: AnchorCache,
}

impl Reconciler {
    pub fn new(config: ReconcileConfig) -> Self {
        Self::with_cache(config, AnchorCache::new())
    }

    pub fn with_cache(config: ReconcileConfig, cache: AnchorCache) -> Self {
        Self { config, cache }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    pub fn cache(&self) -> &AnchorCache {
        &self.cache
    }

    pub fn reconcile(&mut self, output: &str, workspace_root: &Path) -> DiagnosticSet {
        self.reconcile_with(output, workspace_root, &ReconcileOptions::default())
    }

    /// Run one batch. Never fails as a whole: entries that cannot be attributed
    /// are dropped, entries that cannot be remapped keep their raw line.
    pub fn reconcile_with(
        &mut self,
        output: &str,
        workspace_root: &Path,
        options: &ReconcileOptions,
    ) -> DiagnosticSet {
        let span = info_span!("reconcile", root = %workspace_root.display());
        let _enter = span.enter();

        // Files may have been edited since the last run.
        self.cache.invalidate_all();

        let root = normalize(workspace_root);
        let compiler_root = match &options.compiler_root {
            Some(dir) => resolve(dir, &root),
            None => root.clone(),
        };
        let reverse = SubstitutionTable::load(&root, &self.config)
            .map(|table| table.reverse())
            .unwrap_or_default();
        let batch = Batch {
            generated_dir: root.join(&self.config.cache_dir),
            root,
            compiler_root,
            reverse,
        };

        let mut seen = HashSet::new();
        let mut out = DiagnosticSet::new();
        for raw in parse_compiler_output(output) {
            let Some(diag) = self.resolve_one(&raw, &batch) else {
                continue;
            };
            if seen.insert((diag.file.clone(), diag.line, diag.message.clone())) {
                out.push(diag);
            }
        }
        debug!(files = out.files().count(), diagnostics = out.len(), "batch reconciled");
        out
    }

    fn resolve_one(&mut self, raw: &RawDiagnostic, batch: &Batch) -> Option<ResolvedDiagnostic> {
        let reported = resolve(&raw.file, &batch.compiler_root);
        let raw_line = raw.line0();

        let (file, line) = if let Some(original) = batch.reverse.original_for(&reported) {
            let original = original.to_path_buf();
            if !in_workspace(&original, batch) {
                return None;
            }
            let line = match self.map_generated_line(&reported, raw_line) {
                Some(mapped) => self.snap_or_keep(&original, mapped),
                None => raw_line,
            };
            (original, line)
        } else if is_within(&reported, &batch.generated_dir) {
            debug!(file = %reported.display(), "generated file without substitution entry");
            return None;
        } else if self.config.is_source_file(&reported) {
            if !in_workspace(&reported, batch) {
                return None;
            }
            let line = self.snap_or_keep(&reported, raw_line);
            (reported, line)
        } else {
            debug!(file = %reported.display(), "not a tracked source file");
            return None;
        };

        Some(ResolvedDiagnostic {
            file,
            line,
            message: raw.message.clone(),
            severity: Severity::Error,
            source: self.config.source_tag.clone(),
        })
    }

    /// Markers are read fresh every time; generated files change on every run.
    fn map_generated_line(&self, generated: &Path, phys_line: usize) -> Option<usize> {
        match read_text(generated) {
            Ok(text) => resolve_line(&find_markers(&text, &self.config), phys_line),
            Err(err) => {
                warn!(error = %err, "keeping raw line");
                None
            }
        }
    }

    fn snap_or_keep(&mut self, file: &Path, line: usize) -> usize {
        match self.cache.get_or_index(file, &self.config.directive_markers) {
            Ok(index) => index
                .snap(line, self.config.max_snap_distance)
                .unwrap_or(line),
            Err(err) => {
                warn!(error = %err, "directive index unavailable, keeping raw line");
                line
            }
        }
    }
}
