//! Class-name filtering for test discovery
//!
//! Discovery scans classpath roots for every artifact present; the filter
//! narrows that down to the test naming convention. The standard include
//! pattern accepts the conventional shapes `Test*`, `*Test`, `*Tests` and
//! `*TestCase`.

use std::sync::LazyLock;

use regex::Regex;

/// The standard include pattern applied when no custom patterns are given.
///
/// Matches artifact names of the form `Test*`, `*Test`, `*Tests`, `*TestCase`.
pub const STANDARD_INCLUDE_PATTERN: &str = r"^(Test.*|.*Tests?|.*TestCase)$";

static STANDARD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(STANDARD_INCLUDE_PATTERN).expect("standard include pattern is a valid regex")
});

/// An include filter over artifact names.
///
/// A name is accepted when it matches at least one of the filter's patterns.
#[derive(Debug, Clone)]
pub struct ClassNameFilter {
    patterns: Vec<Regex>,
}

impl ClassNameFilter {
    /// The filter for the standard test naming convention.
    pub fn standard() -> Self {
        Self {
            patterns: vec![STANDARD_REGEX.clone()],
        }
    }

    /// A filter accepting names that match any of the given patterns.
    pub fn include_patterns<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Whether the given artifact name passes the filter.
    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(name))
    }
}

impl Default for ClassNameFilter {
    fn default() -> Self {
        Self::standard()
    }
}
