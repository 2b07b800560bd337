//! Pattern matching for naming conventions and group id filters
//!
//! Architectural Principle: Value Objects - compiled patterns are immutable and cheap to clone
//! - NamingPattern implements the convention matcher used by the project type registry
//! - PatternList holds the "evaluate" / "don't evaluate" group id filters used by the rules
//! - Both match the whole candidate, never a substring

use crate::domain::violations::{CodestyleError, CodestyleResult};
use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use std::fmt;

/// Pattern used when a naming rule does not constrain a value
pub const MATCH_ANYTHING: &str = ".*";

lazy_static! {
    static ref ANYTHING: Regex = Regex::new("^(?s:.*)$").expect("literal pattern compiles");
}

/// A naming convention, compiled case-insensitively in extended mode
#[derive(Debug, Clone)]
pub struct NamingPattern {
    source: String,
    regex: Regex,
}

impl NamingPattern {
    /// Compile a naming pattern. An absent pattern matches everything.
    pub fn new(pattern: Option<&str>) -> CodestyleResult<Self> {
        let source = pattern.unwrap_or(MATCH_ANYTHING).to_string();

        // The newline ends a trailing `#` comment before the anchors are closed.
        let regex = RegexBuilder::new(&format!("^(?:{source}\n)$"))
            .case_insensitive(true)
            .ignore_whitespace(true)
            .build()
            .map_err(|e| CodestyleError::pattern(format!("Invalid naming pattern '{source}': {e}")))?;

        Ok(Self { source, regex })
    }

    /// Pattern accepting any value
    pub fn any() -> Self {
        Self {
            source: MATCH_ANYTHING.to_string(),
            regex: ANYTHING.clone(),
        }
    }

    /// The pattern as written (or `.*` when it was absent)
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the entire candidate matches
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    /// Match an optional candidate; an absent one yields `accept_null`
    pub fn matches(&self, candidate: Option<&str>, accept_null: bool) -> bool {
        match candidate {
            None => accept_null,
            Some(value) => self.is_match(value),
        }
    }
}

impl PartialEq for NamingPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for NamingPattern {}

impl fmt::Display for NamingPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Ordered list of group id filter expressions
#[derive(Debug, Clone, Default)]
pub struct PatternList {
    patterns: Vec<(String, Regex)>,
}

impl PatternList {
    /// Compile a list of filter expressions; each must match the whole value
    pub fn new<I, S>(patterns: I) -> CodestyleResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::compile(patterns, false)
    }

    /// Compile filter expressions the way naming patterns are compiled:
    /// case-insensitive, with whitespace and `#` comments ignored
    pub fn naming<I, S>(patterns: I) -> CodestyleResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::compile(patterns, true)
    }

    fn compile<I, S>(patterns: I, naming: bool) -> CodestyleResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            let wrapped = if naming {
                format!("^(?:{pattern}\n)$")
            } else {
                format!("^(?:{pattern})$")
            };
            let regex = RegexBuilder::new(&wrapped)
                .case_insensitive(naming)
                .ignore_whitespace(naming)
                .build()
                .map_err(|e| CodestyleError::pattern(format!("Invalid group id pattern '{pattern}': {e}")))?;
            compiled.push((pattern.to_string(), regex));
        }

        Ok(Self { patterns: compiled })
    }

    /// A list matching nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether any expression matches the whole value
    pub fn matches_any(&self, value: &str) -> bool {
        self.patterns.iter().any(|(_, regex)| regex.is_match(value))
    }

    /// The expressions as written
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|(source, _)| source.as_str())
    }
}

impl fmt::Display for PatternList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.sources().collect::<Vec<_>>().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_match_required() {
        let pattern = NamingPattern::new(Some(".*-api$")).unwrap();

        assert!(pattern.is_match("foo-api"));
        assert!(!pattern.is_match("foo-api-x"));
        assert!(!pattern.is_match("api-test"));

        let packaging = NamingPattern::new(Some("bundle|jar")).unwrap();
        assert!(packaging.is_match("jar"));
        assert!(!packaging.is_match("jarx"));
        assert!(!packaging.is_match("a-bundle"));
    }

    #[test]
    fn test_case_insensitive_and_extended() {
        let pattern = NamingPattern::new(Some(".*-reactor$  # aggregator only")).unwrap();

        assert!(pattern.is_match("FOO-Reactor"));
        assert!(!pattern.is_match("foo-reactor  # aggregator only"));
    }

    #[test]
    fn test_absent_pattern_matches_everything() {
        let pattern = NamingPattern::new(None).unwrap();

        assert_eq!(pattern.as_str(), MATCH_ANYTHING);
        assert!(pattern.is_match(""));
        assert!(pattern.is_match("anything.at.all"));
        assert_eq!(pattern, NamingPattern::any());
    }

    #[test]
    fn test_null_candidate_uses_acceptance_flag() {
        let pattern = NamingPattern::any();

        assert!(pattern.matches(None, true));
        assert!(!pattern.matches(None, false));
        assert!(pattern.matches(Some("x"), false));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let result = NamingPattern::new(Some("(unclosed"));
        assert!(matches!(result, Err(CodestyleError::Pattern { .. })));

        let result = PatternList::new(["[broken"]);
        assert!(matches!(result, Err(CodestyleError::Pattern { .. })));
    }

    #[test]
    fn test_pattern_list() {
        let list = PatternList::new([r"^se\.jguru\..*\.generated\..*", r"^se\.jguru\.codestyle\..*"])
            .unwrap();

        assert_eq!(list.len(), 2);
        assert!(list.matches_any("se.jguru.foo.generated.model"));
        assert!(list.matches_any("se.jguru.codestyle.poms"));
        assert!(!list.matches_any("se.jguru.foo.api"));
        assert!(!PatternList::empty().matches_any("anything"));
        assert_eq!(
            list.to_string(),
            r"[^se\.jguru\..*\.generated\..*, ^se\.jguru\.codestyle\..*]"
        );
    }

    #[test]
    fn test_naming_pattern_list_ignores_case_and_comments() {
        let list = PatternList::naming([r"se\.acme\.codestyle\..*  # shared build tooling"]).unwrap();

        assert!(list.matches_any("se.acme.codestyle.poms"));
        assert!(list.matches_any("SE.Acme.Codestyle.poms"));
        assert!(!list.matches_any("se.acme.foo"));
        assert_eq!(list.sources().next(), Some(r"se\.acme\.codestyle\..*  # shared build tooling"));
    }

    #[test]
    fn test_pattern_list_is_case_sensitive() {
        let list = PatternList::new([r"se\.acme\..*"]).unwrap();

        assert!(list.matches_any("se.acme.foo"));
        assert!(!list.matches_any("SE.ACME.foo"));
    }
}
