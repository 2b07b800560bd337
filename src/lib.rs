//! Codestyle Guardian - project type and reactor structure enforcement
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Pure classification and policy engines separated from descriptor loading
//! - Clean boundaries between the rule engines and the host build that supplies projects
//! - Build integration API provides whole-reactor validation workflows

pub mod archetypes;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod loader;
pub mod patterns;
pub mod policy;
pub mod report;

// Re-export main types for convenient access
pub use domain::project::{ArtifactCoordinate, Dependency, ProjectDescriptor};
pub use domain::violations::{
    CodestyleError, CodestyleResult, Severity, ValidationReport, ValidationSummary, Violation,
};

pub use archetypes::{Archetype, ArchetypeRegistry, ProjectTypeRule, StructureCheck};

pub use classifier::{ClassificationError, Classifier, ComplianceStatus};

pub use config::{CodestyleConfig, ConfigBuilder};

pub use policy::{EnforcementOptions, Enforcer, ProjectRule, RuleStats};

pub use report::{OutputFormat, ReportFormatter, ReportOptions};

use std::path::Path;

/// Main validator providing high-level validation operations
pub struct CodestyleValidator {
    enforcer: Enforcer,
    report_formatter: ReportFormatter,
}

/// Options for reactor validation workflows
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Output format for results
    pub output_format: OutputFormat,
    /// Report options
    pub report_options: ReportOptions,
    /// Enforcement options
    pub enforcement_options: EnforcementOptions,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Human,
            report_options: ReportOptions::default(),
            enforcement_options: EnforcementOptions::default(),
        }
    }
}

impl CodestyleValidator {
    /// Create a new validator with the given configuration
    pub fn new_with_config(config: CodestyleConfig) -> CodestyleResult<Self> {
        let enforcer = Enforcer::new(config)?;
        let report_formatter = ReportFormatter::default();

        Ok(Self { enforcer, report_formatter })
    }

    /// Create a validator with default configuration
    pub fn new() -> CodestyleResult<Self> {
        Self::new_with_config(CodestyleConfig::default())
    }

    /// Create a validator loading configuration from file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> CodestyleResult<Self> {
        let config = CodestyleConfig::load_from_file(path)?;
        Self::new_with_config(config)
    }

    /// Set custom report formatter
    pub fn with_report_formatter(mut self, formatter: ReportFormatter) -> Self {
        self.report_formatter = formatter;
        self
    }

    /// Classify a project against the full archetype registry
    pub fn classify(&self, project: &ProjectDescriptor) -> Result<Archetype, ClassificationError> {
        Classifier::new(self.enforcer.registry()).classify(project)
    }

    /// Validate a single project
    pub fn validate_project(&self, project: &ProjectDescriptor) -> ValidationReport {
        let mut report = ValidationReport::new();
        for violation in self.enforcer.enforce_project(project) {
            report.add_violation(violation);
        }
        report.set_projects_validated(1);
        report.set_config_fingerprint(self.enforcer.config_fingerprint());
        report.sort_violations();

        report
    }

    /// Validate every project of a reactor
    pub fn validate_reactor(&self, projects: &[ProjectDescriptor], options: &EnforcementOptions) -> ValidationReport {
        self.enforcer.enforce_reactor(projects, options)
    }

    /// Load descriptors from a file or directory and validate them as one reactor
    pub fn validate_path<P: AsRef<Path>>(
        &self,
        path: P,
        options: &EnforcementOptions,
    ) -> CodestyleResult<ValidationReport> {
        let projects = loader::load_path(path)?;
        Ok(self.validate_reactor(&projects, options))
    }

    /// Format a validation report for output
    pub fn format_report(&self, report: &ValidationReport, format: OutputFormat) -> CodestyleResult<String> {
        self.report_formatter.format_report(report, format)
    }

    /// Get rule statistics
    pub fn rule_statistics(&self) -> RuleStats {
        self.enforcer.rule_stats()
    }
}

/// Convenience function to create a validator with default settings
pub fn create_validator() -> CodestyleResult<CodestyleValidator> {
    CodestyleValidator::new()
}

/// Convenience function to validate a reactor with default settings
pub fn validate_reactor(projects: &[ProjectDescriptor]) -> CodestyleResult<ValidationReport> {
    let validator = CodestyleValidator::new()?;
    Ok(validator.validate_reactor(projects, &EnforcementOptions::default()))
}

/// Convenience function to validate descriptors below a path with default settings
pub fn validate_path<P: AsRef<Path>>(path: P) -> CodestyleResult<ValidationReport> {
    let validator = CodestyleValidator::new()?;
    validator.validate_path(path, &EnforcementOptions::default())
}

/// Build integration utilities
pub mod build {
    use super::*;

    /// Gate for a build: fails if any blocking violation is found
    pub fn enforce_reactor(config: CodestyleConfig, projects: &[ProjectDescriptor]) -> CodestyleResult<ValidationReport> {
        let validator = CodestyleValidator::new_with_config(config)?;
        let report = validator.validate_reactor(projects, &EnforcementOptions::default());

        if report.has_errors() {
            let error_count = report.summary.violations_by_severity.error;
            return Err(CodestyleError::validation(format!(
                "Reactor validation failed: {} blocking violation{} found",
                error_count,
                if error_count == 1 { "" } else { "s" }
            )));
        }

        Ok(report)
    }

    /// Lenient check for development workflows: every rule only warns
    pub fn development_check(projects: &[ProjectDescriptor]) -> CodestyleResult<ValidationReport> {
        let config = ConfigBuilder::new().severity(Severity::Warning).build()?;
        let validator = CodestyleValidator::new_with_config(config)?;
        Ok(validator.validate_reactor(projects, &EnforcementOptions::default()))
    }
}
