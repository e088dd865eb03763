//! Finder backed by the document store

use crate::document::QualifiedName;
use crate::loader;
use crate::resolver::Resolution;
use crate::session::Session;

use super::errors::PipelineResult;
use super::{LoadedUnit, UnitFinder};

/// Resolves names through a `Session`
#[derive(Debug)]
pub struct StoreFinder {
    session: Session,
}

impl StoreFinder {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}

impl UnitFinder for StoreFinder {
    fn label(&self) -> &str {
        "store"
    }

    fn find(&mut self, name: &QualifiedName) -> PipelineResult<Option<LoadedUnit>> {
        let unit = match self.session.resolve(name.as_str())? {
            Resolution::Found(unit) => unit,
            Resolution::NotFound => return Ok(None),
        };

        // A shell document is an error, not a fallthrough
        let source = loader::load(&unit)?.to_string();

        Ok(Some(LoadedUnit {
            name: name.to_string(),
            origin: loader::origin(&unit),
            is_package: unit.is_package,
            source,
        }))
    }

    fn invalidate_caches(&mut self) -> PipelineResult<()> {
        self.session.invalidate_caches()?;
        Ok(())
    }
}
