//! Qualified names and the namespace they select

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::errors::{DocumentError, DocumentResult};

/// Separator between segments of a qualified name
pub const NAME_SEPARATOR: char = '.';

/// Joins a namespace prefix to the top-level segment
pub const NAMESPACE_JOINER: char = '_';

fn segment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("segment pattern is a valid regex")
    })
}

/// A dotted identifier naming a program unit, e.g. `pkg.util.strings`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    full: String,
}

impl QualifiedName {
    /// Parse and validate a dotted name.
    ///
    /// Every segment must be a non-empty identifier.
    pub fn parse(name: &str) -> DocumentResult<Self> {
        if name.is_empty() {
            return Err(DocumentError::InvalidName {
                name: name.to_string(),
                reason: "name is empty".to_string(),
            });
        }

        for segment in name.split(NAME_SEPARATOR) {
            if !segment_pattern().is_match(segment) {
                return Err(DocumentError::InvalidName {
                    name: name.to_string(),
                    reason: format!("invalid segment '{}'", segment),
                });
            }
        }

        Ok(Self {
            full: name.to_string(),
        })
    }

    /// Build a name from already-split segments
    pub fn from_segments<I, S>(segments: I) -> DocumentResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = segments
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(&NAME_SEPARATOR.to_string());
        Self::parse(&joined)
    }

    /// The full dotted form
    pub fn as_str(&self) -> &str {
        &self.full
    }

    /// Iterate over the segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.full.split(NAME_SEPARATOR)
    }

    /// The first segment, which selects the namespace
    pub fn top_level(&self) -> &str {
        self.full
            .split(NAME_SEPARATOR)
            .next()
            .unwrap_or(&self.full)
    }

    /// Namespace key `<prefix>_<topLevelSegment>`
    pub fn namespace(&self, prefix: &str) -> String {
        namespace_for(prefix, self.top_level())
    }
}

/// Namespace key for a top-level segment
pub fn namespace_for(prefix: &str, top_level: &str) -> String {
    format!("{}{}{}", prefix, NAMESPACE_JOINER, top_level)
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl AsRef<str> for QualifiedName {
    fn as_ref(&self) -> &str {
        &self.full
    }
}
