//! # Load Pipeline
//!
//! The host's "load a named unit" path with a pluggable strategy chain.
//! Finders are asked in registration order; the first one that returns a
//! unit wins. A finder that does not know a name returns `None` so the
//! next finder gets a chance.

mod directory;
mod errors;
mod store_finder;

pub use directory::DirectoryFinder;
pub use errors::{PipelineError, PipelineResult};
pub use store_finder::StoreFinder;

use serde::Serialize;

use crate::document::QualifiedName;
use crate::observability::{log_event_with_fields, Event};

/// Source text ready for the host to execute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedUnit {
    pub name: String,
    /// Where the source came from, e.g. `x-couchload:pkg.util` or a file path
    pub origin: String,
    pub is_package: bool,
    pub source: String,
}

/// A code-resolution strategy
pub trait UnitFinder: std::fmt::Debug {
    /// Short label used in logs
    fn label(&self) -> &str;

    /// Load `name`, or `None` to fall through
    fn find(&mut self, name: &QualifiedName) -> PipelineResult<Option<LoadedUnit>>;

    /// Drop anything cached about earlier lookups
    fn invalidate_caches(&mut self) -> PipelineResult<()> {
        Ok(())
    }
}

/// Ordered chain of finders
#[derive(Debug, Default)]
pub struct LoadPipeline {
    finders: Vec<Box<dyn UnitFinder>>,
}

impl LoadPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finder at the end of the chain
    pub fn register(&mut self, finder: Box<dyn UnitFinder>) {
        self.finders.push(finder);
    }

    /// Builder form of `register`
    pub fn with_finder(mut self, finder: Box<dyn UnitFinder>) -> Self {
        self.register(finder);
        self
    }

    pub fn len(&self) -> usize {
        self.finders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.finders.is_empty()
    }

    /// Load a unit through the first finder that knows it
    pub fn load(&mut self, name: &str) -> PipelineResult<LoadedUnit> {
        let qualified = QualifiedName::parse(name)?;

        for finder in self.finders.iter_mut() {
            if let Some(unit) = finder.find(&qualified)? {
                log_event_with_fields(
                    Event::UnitLoaded,
                    &[
                        ("finder", finder.label()),
                        ("name", name),
                        ("origin", unit.origin.as_str()),
                    ],
                );
                return Ok(unit);
            }
        }

        Err(PipelineError::UnitNotFound(name.to_string()))
    }

    /// Invalidate every finder
    pub fn invalidate_caches(&mut self) -> PipelineResult<()> {
        for finder in self.finders.iter_mut() {
            finder.invalidate_caches()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Fixed {
        label: &'static str,
        knows: &'static str,
        calls: usize,
    }

    impl UnitFinder for Fixed {
        fn label(&self) -> &str {
            self.label
        }

        fn find(&mut self, name: &QualifiedName) -> PipelineResult<Option<LoadedUnit>> {
            self.calls += 1;
            if name.as_str() != self.knows {
                return Ok(None);
            }
            Ok(Some(LoadedUnit {
                name: name.to_string(),
                origin: self.label.to_string(),
                is_package: false,
                source: String::new(),
            }))
        }
    }

    fn fixed(label: &'static str, knows: &'static str) -> Box<dyn UnitFinder> {
        Box::new(Fixed {
            label,
            knows,
            calls: 0,
        })
    }

    #[test]
    fn test_first_finder_wins() {
        let mut pipeline = LoadPipeline::new()
            .with_finder(fixed("first", "a.b"))
            .with_finder(fixed("second", "a.b"));

        assert_eq!(pipeline.load("a.b").unwrap().origin, "first");
    }

    #[test]
    fn test_falls_through_to_later_finder() {
        let mut pipeline = LoadPipeline::new()
            .with_finder(fixed("first", "x"))
            .with_finder(fixed("second", "a.b"));

        assert_eq!(pipeline.load("a.b").unwrap().origin, "second");
    }

    #[test]
    fn test_no_finder_knows_name() {
        let mut pipeline = LoadPipeline::new().with_finder(fixed("first", "x"));
        assert!(matches!(
            pipeline.load("a.b"),
            Err(PipelineError::UnitNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_name() {
        let mut pipeline = LoadPipeline::new().with_finder(fixed("first", "x"));
        assert!(matches!(
            pipeline.load("a b"),
            Err(PipelineError::InvalidName(_))
        ));
    }

    #[test]
    fn test_empty_pipeline() {
        let mut pipeline = LoadPipeline::new();
        assert!(pipeline.is_empty());
        assert!(pipeline.invalidate_caches().is_ok());
        assert!(pipeline.load("a").is_err());
    }
}
