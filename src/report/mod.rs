//! Report generation with multiple output formats
//!
//! CDD Principle: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - ValidationReport (domain) is converted to various external representations
//! - The human format renders the classic structure rule failure blocks per project
//! - Domain logic remains pure while supporting multiple presentation needs

use crate::domain::violations::{CodestyleError, CodestyleResult, Severity, ValidationReport, Violation};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::io::Write;
use std::str::FromStr;

/// Supported output formats for validation reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format with failure blocks
    Human,
    /// JSON format for programmatic consumption
    Json,
    /// JUnit XML format for CI/CD integration
    Junit,
    /// GitHub Actions format for workflow integration
    GitHub,
}

impl OutputFormat {
    /// Get all available format names
    pub fn all_formats() -> &'static [&'static str] {
        &["human", "json", "junit", "github"]
    }
}

impl FromStr for OutputFormat {
    type Err = CodestyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "junit" => Ok(Self::Junit),
            "github" => Ok(Self::GitHub),
            other => Err(CodestyleError::config(format!(
                "Unknown output format '{other}'. Available formats: {}",
                Self::all_formats().join(", ")
            ))),
        }
    }
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to use colored output (for human format)
    pub use_colors: bool,
    /// Whether to render full failure blocks instead of one line per violation
    pub show_details: bool,
    /// Whether to show violation suggestions
    pub show_suggestions: bool,
    /// Maximum number of violations to include
    pub max_violations: Option<usize>,
    /// Minimum severity level to include
    pub min_severity: Option<Severity>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            use_colors: true,
            show_details: true,
            show_suggestions: true,
            max_violations: None,
            min_severity: None,
        }
    }
}

/// Main report formatter that dispatches to specific formatters
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    /// Create a new report formatter with options
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Format a validation report in the specified format
    pub fn format_report(&self, report: &ValidationReport, format: OutputFormat) -> CodestyleResult<String> {
        let filtered_violations = self.filter_violations(&report.violations);

        match format {
            OutputFormat::Human => Ok(self.format_human(report, &filtered_violations)),
            OutputFormat::Json => self.format_json(report, &filtered_violations),
            OutputFormat::Junit => Ok(self.format_junit(report, &filtered_violations)),
            OutputFormat::GitHub => Ok(self.format_github(&filtered_violations)),
        }
    }

    /// Write a formatted report to a writer
    pub fn write_report<W: Write>(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
        mut writer: W,
    ) -> CodestyleResult<()> {
        let formatted = self.format_report(report, format)?;
        writer.write_all(formatted.as_bytes())?;
        Ok(())
    }

    /// Filter violations based on report options
    fn filter_violations<'a>(&self, violations: &'a [Violation]) -> Vec<&'a Violation> {
        let mut filtered: Vec<&Violation> = violations
            .iter()
            .filter(|v| match self.options.min_severity {
                Some(min_severity) => v.severity >= min_severity,
                None => true,
            })
            .collect();

        if let Some(max) = self.options.max_violations {
            filtered.truncate(max);
        }

        filtered
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.options.use_colors {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    /// Format report in human-readable format
    fn format_human(&self, report: &ValidationReport, violations: &[&Violation]) -> String {
        let mut output = String::new();

        if violations.is_empty() {
            output.push_str(&format!("✅ {}\n", self.paint("32", "No codestyle violations found")));
        } else {
            let (icon, color) = if report.has_errors() { ("❌", "31") } else { ("⚠️", "33") };
            output.push_str(&format!("{icon} {}\n\n", self.paint(color, "Codestyle Violations Found")));

            let mut by_project: BTreeMap<&str, Vec<&Violation>> = BTreeMap::new();
            for violation in violations {
                by_project.entry(violation.project.as_str()).or_default().push(violation);
            }

            for (project, project_violations) in by_project {
                output.push_str(&format!("📦 {project}\n"));

                for violation in project_violations {
                    let severity_color = match violation.severity {
                        Severity::Error => "31",
                        Severity::Warning => "33",
                        Severity::Info => "36",
                    };

                    output.push_str(&format!(
                        "  {} [{}] {}\n",
                        self.paint("2", &violation.rule_id),
                        self.paint(severity_color, violation.severity.as_str()),
                        violation.rule_description
                    ));

                    if self.options.show_details {
                        for line in violation.format_failure_block().lines() {
                            output.push_str(&format!("    {line}\n"));
                        }
                    } else {
                        output.push_str(&format!("    {}\n", violation.format_display()));
                    }

                    if self.options.show_suggestions {
                        if let Some(suggestion) = &violation.suggested_fix {
                            output.push_str(&format!("    💡 {}\n", self.paint("32", suggestion)));
                        }
                    }

                    output.push('\n');
                }
            }
        }

        output.push_str(&self.format_summary(report));
        output
    }

    /// Format report in JSON format
    fn format_json(&self, report: &ValidationReport, violations: &[&Violation]) -> CodestyleResult<String> {
        let json_violations: Vec<JsonValue> = violations
            .iter()
            .map(|v| {
                serde_json::json!({
                    "rule_id": v.rule_id,
                    "rule_description": v.rule_description,
                    "severity": v.severity.as_str(),
                    "project": v.project,
                    "offending_artifact": v.offending_artifact,
                    "message": v.message,
                    "suggested_fix": v.suggested_fix,
                    "detected_at": v.detected_at.to_rfc3339()
                })
            })
            .collect();

        let json_report = serde_json::json!({
            "violations": json_violations,
            "summary": {
                "total_projects": report.summary.total_projects,
                "violations_by_severity": {
                    "error": report.summary.violations_by_severity.error,
                    "warning": report.summary.violations_by_severity.warning,
                    "info": report.summary.violations_by_severity.info
                },
                "execution_time_ms": report.summary.execution_time_ms,
                "validated_at": report.summary.validated_at.to_rfc3339()
            },
            "config_fingerprint": report.config_fingerprint
        });

        serde_json::to_string_pretty(&json_report)
            .map_err(|e| CodestyleError::config(format!("JSON serialization failed: {e}")))
    }

    /// Format report in JUnit XML format
    fn format_junit(&self, report: &ValidationReport, violations: &[&Violation]) -> String {
        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

        let failures = violations.iter().filter(|v| v.is_blocking()).count();
        let execution_time = (report.summary.execution_time_ms as f64) / 1000.0;

        xml.push_str(&format!(
            "<testsuite name=\"codestyle-guardian\" tests=\"{}\" failures=\"{}\" errors=\"0\" time=\"{:.3}\">\n",
            violations.len(),
            failures,
            execution_time
        ));

        for violation in violations {
            xml.push_str(&format!(
                "  <testcase classname=\"{}\" name=\"{}\">\n",
                violation.rule_id,
                escape_xml(&violation.project)
            ));

            if violation.is_blocking() {
                xml.push_str(&format!("    <failure message=\"{}\">\n", escape_xml(&violation.message)));
                xml.push_str(&format!("      Project: {}\n", escape_xml(&violation.project)));
                if let Some(artifact) = &violation.offending_artifact {
                    xml.push_str(&format!("      Artifact: {}\n", escape_xml(artifact)));
                }
                xml.push_str("    </failure>\n");
            }

            xml.push_str("  </testcase>\n");
        }

        xml.push_str("</testsuite>\n");
        xml
    }

    /// Format report for GitHub Actions
    fn format_github(&self, violations: &[&Violation]) -> String {
        let mut output = String::new();

        for violation in violations {
            let level = match violation.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::Info => "notice",
            };

            let artifact = match &violation.offending_artifact {
                Some(artifact) => format!(" (artifact {artifact})"),
                None => String::new(),
            };

            // Workflow commands are single-line; newlines must be URL-encoded.
            let message = format!("{}{}: {}", violation.project, artifact, violation.message)
                .replace('%', "%25")
                .replace('\r', "%0D")
                .replace('\n', "%0A");

            output.push_str(&format!("::{level} title={}::{message}\n", violation.rule_id));
        }

        output
    }

    /// Format the summary section
    fn format_summary(&self, report: &ValidationReport) -> String {
        let counts = &report.summary.violations_by_severity;
        let execution_time = (report.summary.execution_time_ms as f64) / 1000.0;
        let projects = report.summary.total_projects;

        let mut summary = format!("📊 {} ", self.paint("1", "Summary:"));

        if counts.total() == 0 {
            summary.push_str(&format!(
                "{} in {projects} projects ({execution_time:.1}s)\n",
                self.paint("32", "0 violations")
            ));
            return summary;
        }

        let mut parts = Vec::new();
        if counts.error > 0 {
            let text = format!("{} error{}", counts.error, if counts.error == 1 { "" } else { "s" });
            parts.push(self.paint("31", &text));
        }
        if counts.warning > 0 {
            let text = format!("{} warning{}", counts.warning, if counts.warning == 1 { "" } else { "s" });
            parts.push(self.paint("33", &text));
        }
        if counts.info > 0 {
            parts.push(self.paint("36", &format!("{} info", counts.info)));
        }

        summary.push_str(&format!(
            "{} in {projects} projects ({execution_time:.1}s)\n",
            parts.join(", ")
        ));
        summary
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(ReportOptions::default())
    }
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
