//! Directory-to-namespace sync walker
//!
//! `root/pkg/sub/mod.py` becomes qualified name `pkg.sub.mod` in namespace
//! `<prefix>_pkg`. Only top-level directories map to namespaces; files
//! sitting directly in the root are never pushed. Hidden entries are never
//! visited. A top-level directory whose namespace is missing from the
//! snapshot is pruned whole, so no store call is made for anything beneath
//! it. A namespace the store reports missing mid-run is pruned the same way.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path};

use walkdir::{DirEntry, WalkDir};

use crate::document::{namespace_for, QualifiedName};
use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::resolver::NamespaceSnapshot;
use crate::store::{StoreError, StoreResult};
use crate::version_store::{PushOutcome, VersionStore};

use super::report::{SkipReason, SyncReport, SyncedUnit};

/// Leading character of names the walker never visits
pub const HIDDEN_MARKER: char = '.';

/// Default source-file extension
pub const DEFAULT_SOURCE_SUFFIX: &str = "py";

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map_or(false, |name| name.starts_with(HIDDEN_MARKER))
}

fn log_skip(path: &Path, reason: &str) {
    log_event_with_fields(
        Event::SyncSkipped,
        &[("path", path.display().to_string().as_str()), ("reason", reason)],
    );
}

/// Walks a local tree and pushes every matching source file
pub struct SyncWalker<'a> {
    versions: VersionStore<'a>,
    snapshot: &'a NamespaceSnapshot,
    prefix: &'a str,
    source_suffix: &'a str,
}

impl<'a> SyncWalker<'a> {
    pub fn new(versions: VersionStore<'a>, snapshot: &'a NamespaceSnapshot, prefix: &'a str) -> Self {
        Self {
            versions,
            snapshot,
            prefix,
            source_suffix: DEFAULT_SOURCE_SUFFIX,
        }
    }

    /// Use a different source extension (without the dot)
    pub fn with_source_suffix(mut self, suffix: &'a str) -> Self {
        self.source_suffix = suffix;
        self
    }

    /// Namespace a top-level segment maps to, if the store has it
    fn gate(&self, top_level: &str) -> Option<String> {
        let namespace = namespace_for(self.prefix, top_level);
        self.snapshot.contains(&namespace).then_some(namespace)
    }

    /// Sync every source file under `root`.
    ///
    /// Skipped entries are recorded in the report. Store failures other
    /// than an update conflict abort the run.
    pub fn sync_tree(&self, root: &Path) -> StoreResult<SyncReport> {
        let root_display = root.display().to_string();
        let scope = ObservationScope::with_fields("SYNC", &[("root", root_display.as_str())]);

        match self.walk(root) {
            Ok(report) => {
                scope.complete_with_fields(&[
                    ("updated", report.updated.len().to_string().as_str()),
                    ("unchanged", report.unchanged.len().to_string().as_str()),
                    ("skipped", report.skipped.len().to_string().as_str()),
                ]);
                Ok(report)
            }
            Err(e) => {
                scope.fail(&e.to_string());
                Err(e)
            }
        }
    }

    fn walk(&self, root: &Path) -> StoreResult<SyncReport> {
        let mut report = SyncReport::default();
        let mut pruned = Vec::new();
        let mut gone = BTreeSet::new();

        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if is_hidden(entry) {
                    log_skip(entry.path(), "hidden");
                    return false;
                }
                if entry.depth() == 1 && !entry.file_type().is_dir() {
                    log_skip(entry.path(), "outside namespace directory");
                    return false;
                }
                if entry.depth() == 1 {
                    let top = entry.file_name().to_string_lossy();
                    match self.gate(&top) {
                        Some(namespace) => {
                            let path = entry.path().display().to_string();
                            log_event_with_fields(
                                Event::SyncNamespace,
                                &[("namespace", namespace.as_str()), ("path", path.as_str())],
                            );
                        }
                        None => {
                            log_skip(entry.path(), "no namespace");
                            pruned.push((
                                entry.path().to_path_buf(),
                                namespace_for(self.prefix, &top),
                            ));
                            return false;
                        }
                    }
                }
                true
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                    log_skip(&path, "walk error");
                    report.skip(path, SkipReason::Walk(e.to_string()));
                    continue;
                }
            };

            if entry.file_type().is_file() {
                self.sync_file(root, &entry, &mut gone, &mut report)?;
            }
        }

        for (path, namespace) in pruned {
            report.skip(path, SkipReason::NoNamespace(namespace));
        }

        Ok(report)
    }

    fn sync_file(
        &self,
        root: &Path,
        entry: &DirEntry,
        gone: &mut BTreeSet<String>,
        report: &mut SyncReport,
    ) -> StoreResult<()> {
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) != Some(self.source_suffix) {
            log_skip(path, "extension");
            return Ok(());
        }

        let name = match qualified_name_for(root, path) {
            Ok(name) => name,
            Err(reason) => {
                log_skip(path, "invalid name");
                report.skip(path, SkipReason::InvalidName(reason));
                return Ok(());
            }
        };

        // The top-level directory already passed the snapshot gate
        let namespace = name.namespace(self.prefix);
        if gone.contains(&namespace) {
            log_skip(path, "no namespace");
            return Ok(());
        }

        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                log_skip(path, "unreadable");
                report.skip(path, SkipReason::Unreadable(e.to_string()));
                return Ok(());
            }
        };

        match self.versions.push(&namespace, &name, &source) {
            Ok(PushOutcome::Updated(version_id)) => report.updated.push(SyncedUnit {
                name: name.to_string(),
                namespace,
                version_id,
            }),
            Ok(PushOutcome::Unchanged) => report.unchanged.push(name.to_string()),
            Err(StoreError::Conflict { .. }) => report.conflicts.push(name.to_string()),
            // Listed in the snapshot but dropped from the store since
            Err(StoreError::NamespaceNotFound(missing)) => {
                let top = root.join(name.top_level());
                log_skip(&top, "no namespace");
                report.skip(top, SkipReason::NoNamespace(missing.clone()));
                gone.insert(missing);
            }
            Err(e) => return Err(e),
        }

        Ok(())
    }
}

/// Qualified name for a file: directories joined by `.`, then the file stem
pub fn qualified_name_for(root: &Path, path: &Path) -> Result<QualifiedName, String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| format!("{} is outside {}", path.display(), root.display()))?;

    let mut segments = Vec::new();
    if let Some(parent) = relative.parent() {
        for component in parent.components() {
            match component {
                Component::Normal(part) => segments.push(
                    part.to_str()
                        .ok_or_else(|| format!("non UTF-8 path component in {}", relative.display()))?
                        .to_string(),
                ),
                _ => return Err(format!("unexpected path component in {}", relative.display())),
            }
        }
    }

    let stem = relative
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| format!("no file name in {}", relative.display()))?;
    segments.push(stem.to_string());

    QualifiedName::from_segments(&segments).map_err(|e| e.to_string())
}
