//! Finder backed by a local source directory
//!
//! `a.b.c` is looked up as `<root>/a/b/c.<suffix>`, then as the package
//! `<root>/a/b/c/__init__.<suffix>`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::document::QualifiedName;
use crate::sync::DEFAULT_SOURCE_SUFFIX;

use super::errors::{PipelineError, PipelineResult};
use super::{LoadedUnit, UnitFinder};

const PACKAGE_FILE_STEM: &str = "__init__";

/// Plain filesystem finder
#[derive(Debug, Clone)]
pub struct DirectoryFinder {
    root: PathBuf,
    suffix: String,
}

impl DirectoryFinder {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            suffix: DEFAULT_SOURCE_SUFFIX.to_string(),
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, path: &Path) -> PipelineResult<String> {
        fs::read_to_string(path).map_err(|e| PipelineError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

impl UnitFinder for DirectoryFinder {
    fn label(&self) -> &str {
        "directory"
    }

    fn find(&mut self, name: &QualifiedName) -> PipelineResult<Option<LoadedUnit>> {
        let mut base = self.root.clone();
        for segment in name.segments() {
            base.push(segment);
        }

        let module = base.with_extension(&self.suffix);
        let package = base.join(PACKAGE_FILE_STEM).with_extension(&self.suffix);

        for (path, is_package) in [(module, false), (package, true)] {
            if path.is_file() {
                return Ok(Some(LoadedUnit {
                    name: name.to_string(),
                    origin: path.display().to_string(),
                    is_package,
                    source: self.read(&path)?,
                }));
            }
        }

        Ok(None)
    }
}
