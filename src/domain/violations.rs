//! Core domain models for rule violations and validation results
//!
//! Architecture: Rich Domain Models - Violations are entities with behavior, not just data
//! - Violations know which project (and optionally which dependency) offended a rule
//! - ValidationReport acts as an aggregate root managing collections of violations
//! - Rendering of the classic "structure rule failure" block lives with the violation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity levels for rule violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational messages and suggestions
    Info,
    /// Warnings that should be addressed but don't block builds
    Warning,
    /// Errors that fail the build
    Error,
}

impl Severity {
    /// Whether this severity level should cause validation to fail
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Convert to string for display
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A rule violation detected while validating a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Identifier of the rule that detected this violation
    pub rule_id: String,
    /// Short, human-readable description of the rule
    pub rule_description: String,
    /// Severity level of this violation
    pub severity: Severity,
    /// Coordinate of the project which failed the rule
    pub project: String,
    /// Coordinate of the dependency which triggered the failure, if any
    pub offending_artifact: Option<String>,
    /// Diagnostic message
    pub message: String,
    /// Suggested fix for the violation (if available)
    pub suggested_fix: Option<String>,
    /// When this violation was detected
    pub detected_at: DateTime<Utc>,
}

impl Violation {
    /// Create a new violation
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        project: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            rule_description: String::new(),
            severity,
            project: project.into(),
            offending_artifact: None,
            message: message.into(),
            suggested_fix: None,
            detected_at: Utc::now(),
        }
    }

    /// Set the short rule description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.rule_description = description.into();
        self
    }

    /// Record the dependency which triggered this violation
    pub fn with_offending_artifact(mut self, artifact: impl Into<String>) -> Self {
        self.offending_artifact = Some(artifact.into());
        self
    }

    /// Add a suggested fix
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggested_fix = Some(suggestion.into());
        self
    }

    /// Whether this violation is blocking (fails the build)
    pub fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }

    /// Format violation for single-line display
    pub fn format_display(&self) -> String {
        let artifact = match &self.offending_artifact {
            Some(artifact) => format!(" ({artifact})"),
            None => String::new(),
        };

        format!(
            "{}{} [{}] {}",
            self.project,
            artifact,
            self.severity.as_str(),
            self.message
        )
    }

    /// Render the verbose structure rule failure block
    pub fn format_failure_block(&self) -> String {
        let mut block = String::from("\n#\n# Structure rule failure:\n");
        block.push_str(&format!("# {}\n#\n", self.rule_description));
        block.push_str(&format!("# Message: {}\n#\n", self.message));
        block.push_str(&format!("# Offending project [{}]\n#", self.project));

        match &self.offending_artifact {
            Some(artifact) => block.push_str(&format!("\n# Offending artifact [{artifact}]\n#\n")),
            None => block.push('\n'),
        }

        block
    }
}

/// Summary statistics for a validation report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Total number of projects validated
    pub total_projects: usize,
    /// Number of violations by severity level
    pub violations_by_severity: ViolationCounts,
    /// Total execution time in milliseconds
    pub execution_time_ms: u64,
    /// Timestamp when validation was performed
    pub validated_at: DateTime<Utc>,
}

/// Count of violations by severity level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViolationCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl ViolationCounts {
    /// Total number of violations across all severities
    pub fn total(&self) -> usize {
        self.error + self.warning + self.info
    }

    /// Whether there are any blocking violations
    pub fn has_blocking(&self) -> bool {
        self.error > 0
    }

    /// Add a violation to the counts
    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.error += 1,
            Severity::Warning => self.warning += 1,
            Severity::Info => self.info += 1,
        }
    }
}

/// Complete validation report containing all violations and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// All violations found during validation
    pub violations: Vec<Violation>,
    /// Summary statistics
    pub summary: ValidationSummary,
    /// Configuration used for this validation
    pub config_fingerprint: Option<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            violations: Vec::new(),
            summary: ValidationSummary {
                validated_at: Utc::now(),
                ..Default::default()
            },
            config_fingerprint: None,
        }
    }

    /// Add a violation to the report
    pub fn add_violation(&mut self, violation: Violation) {
        self.summary.violations_by_severity.add(violation.severity);
        self.violations.push(violation);
    }

    /// Whether the report contains any violations
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Whether the report contains blocking violations (errors)
    pub fn has_errors(&self) -> bool {
        self.summary.violations_by_severity.has_blocking()
    }

    /// Get violations of a specific severity
    pub fn violations_by_severity(&self, severity: Severity) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(move |v| v.severity == severity)
    }

    /// Set the number of projects validated
    pub fn set_projects_validated(&mut self, count: usize) {
        self.summary.total_projects = count;
    }

    /// Set the execution time
    pub fn set_execution_time(&mut self, duration_ms: u64) {
        self.summary.execution_time_ms = duration_ms;
    }

    /// Set the configuration fingerprint
    pub fn set_config_fingerprint(&mut self, fingerprint: impl Into<String>) {
        self.config_fingerprint = Some(fingerprint.into());
    }

    /// Sort violations by project, rule and offending artifact for consistent output
    pub fn sort_violations(&mut self) {
        self.violations.sort_by(|a, b| {
            a.project
                .cmp(&b.project)
                .then_with(|| a.rule_id.cmp(&b.rule_id))
                .then_with(|| a.offending_artifact.cmp(&b.offending_artifact))
                .then_with(|| b.severity.cmp(&a.severity))
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Error types that can occur during validation
#[derive(Debug, thiserror::Error)]
pub enum CodestyleError {
    /// Configuration file could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File could not be read or accessed
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Pattern compilation failed
    #[error("Pattern error: {message}")]
    Pattern { message: String },

    /// A project descriptor could not be read
    #[error("Descriptor error in {file}: {message}")]
    Descriptor { file: String, message: String },

    /// Validation operation failed
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl CodestyleError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a pattern error
    pub fn pattern(message: impl Into<String>) -> Self {
        Self::Pattern {
            message: message.into(),
        }
    }

    /// Create a descriptor error
    pub fn descriptor(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Descriptor {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Result type for codestyle operations
pub type CodestyleResult<T> = Result<T, CodestyleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_creation() {
        let violation = Violation::new(
            "test_rule",
            Severity::Error,
            "se.acme.foo:foo-api:1.0",
            "Test message",
        );

        assert_eq!(violation.rule_id, "test_rule");
        assert_eq!(violation.severity, Severity::Error);
        assert_eq!(violation.project, "se.acme.foo:foo-api:1.0");
        assert_eq!(violation.message, "Test message");
        assert!(violation.offending_artifact.is_none());
        assert!(violation.is_blocking());
    }

    #[test]
    fn test_failure_block_includes_offending_artifact() {
        let violation = Violation::new(
            "correct_dependencies",
            Severity::Warning,
            "se.acme.foo.api:foo-api:1.0",
            "Don't use IMPLEMENTATION dependencies outside of application projects.",
        )
        .with_description("Incorrect Dependency found within project.")
        .with_offending_artifact("se.acme.foo.impl.x : foo-impl-x : 1.0");

        let block = violation.format_failure_block();

        assert!(block.contains("# Structure rule failure:"));
        assert!(block.contains("# Incorrect Dependency found within project."));
        assert!(block.contains("# Offending project [se.acme.foo.api:foo-api:1.0]"));
        assert!(block.contains("# Offending artifact [se.acme.foo.impl.x : foo-impl-x : 1.0]"));
        assert!(!violation.is_blocking());
    }

    #[test]
    fn test_validation_report() {
        let mut report = ValidationReport::new();

        report.add_violation(Violation::new(
            "rule1",
            Severity::Error,
            "a:b:1",
            "Error message",
        ));

        report.add_violation(Violation::new(
            "rule2",
            Severity::Warning,
            "a:c:1",
            "Warning message",
        ));

        assert!(report.has_violations());
        assert!(report.has_errors());
        assert_eq!(report.summary.violations_by_severity.total(), 2);
        assert_eq!(report.summary.violations_by_severity.error, 1);
        assert_eq!(report.summary.violations_by_severity.warning, 1);
        assert_eq!(report.violations_by_severity(Severity::Warning).count(), 1);
    }

    #[test]
    fn test_sort_by_project() {
        let mut report = ValidationReport::new();
        report.add_violation(Violation::new("r", Severity::Error, "z:z:1", "late"));
        report.add_violation(Violation::new("r", Severity::Error, "a:a:1", "early"));
        report.set_projects_validated(2);
        report.sort_violations();

        assert_eq!(report.summary.total_projects, 2);
        assert_eq!(report.violations[0].message, "early");
        assert_eq!(report.summary.violations_by_severity.error, 2);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert!(Severity::Error.is_blocking());
        assert!(!Severity::Warning.is_blocking());
    }
}
