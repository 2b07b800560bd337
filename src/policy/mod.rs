//! Rule orchestration for Codestyle Guardian
//!
//! CDD Principle: Domain Services - the Enforcer runs every enabled rule over every project
//! - Rules share one archetype registry and classifier
//! - Each rule failure becomes a Violation carrying the rule's short description
//! - Reactors are processed in parallel; results are merged and sorted deterministically

pub mod dependencies;
pub mod packaging;
pub mod permitted;

use crate::archetypes::ArchetypeRegistry;
use crate::classifier::Classifier;
use crate::config::CodestyleConfig;
use crate::domain::project::ProjectDescriptor;
use crate::domain::violations::{CodestyleResult, Severity, ValidationReport, Violation};
use rayon::prelude::*;
use std::time::Instant;

pub use dependencies::{DependencyPolicy, DependencyViolation};
pub use packaging::PackagingPolicy;
pub use permitted::PermittedTypePolicy;

/// A rule evaluated once per project
pub trait ProjectRule: Send + Sync {
    /// Stable identifier, used in reports and configuration
    fn id(&self) -> &'static str;

    /// One-line description shown in failure blocks
    fn short_description(&self) -> &'static str;

    /// Evaluate a project; an empty result means the project complies
    fn enforce(&self, project: &ProjectDescriptor, classifier: &Classifier<'_>) -> Vec<RuleFailure>;
}

/// A single failed rule evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFailure {
    pub message: String,
    /// Coordinate of the dependency which caused the failure
    pub offending_artifact: Option<String>,
    pub suggestion: Option<String>,
}

impl RuleFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            offending_artifact: None,
            suggestion: None,
        }
    }

    pub fn with_offending_artifact(mut self, artifact: impl Into<String>) -> Self {
        self.offending_artifact = Some(artifact.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Options for customizing enforcement behavior
#[derive(Debug, Clone)]
pub struct EnforcementOptions {
    /// Whether to evaluate projects in parallel
    pub parallel: bool,
    /// Maximum number of projects to evaluate
    pub max_projects: Option<usize>,
    /// Stop at the first project with blocking violations (implies sequential evaluation)
    pub fail_fast: bool,
}

impl Default for EnforcementOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            max_projects: None,
            fail_fast: false,
        }
    }
}

struct ConfiguredRule {
    rule: Box<dyn ProjectRule>,
    severity: Severity,
}

/// Runs the configured rules against projects
pub struct Enforcer {
    config: CodestyleConfig,
    registry: ArchetypeRegistry,
    rules: Vec<ConfiguredRule>,
}

impl Enforcer {
    /// Create an enforcer with the given configuration
    pub fn new(config: CodestyleConfig) -> CodestyleResult<Self> {
        config.validate()?;

        let mut rules = Vec::new();

        if config.permitted_types.enabled {
            rules.push(ConfiguredRule {
                rule: Box::new(config.permitted_types.to_policy()?),
                severity: config.permitted_types.severity,
            });
        }
        if config.dependencies.enabled {
            rules.push(ConfiguredRule {
                rule: Box::new(config.dependencies.to_policy()?),
                severity: config.dependencies.severity,
            });
        }
        if config.packaging.enabled {
            rules.push(ConfiguredRule {
                rule: Box::new(PackagingPolicy::new()),
                severity: config.packaging.severity,
            });
        }

        tracing::debug!("Enforcer created with {} enabled rules", rules.len());

        Ok(Self {
            config,
            registry: ArchetypeRegistry::common(),
            rules,
        })
    }

    /// Create an enforcer with default configuration
    pub fn with_defaults() -> CodestyleResult<Self> {
        Self::new(CodestyleConfig::default())
    }

    pub fn registry(&self) -> &ArchetypeRegistry {
        &self.registry
    }

    /// Identifiers of the enabled rules, in evaluation order
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|configured| configured.rule.id()).collect()
    }

    /// Evaluate every enabled rule against one project
    pub fn enforce_project(&self, project: &ProjectDescriptor) -> Vec<Violation> {
        let classifier = Classifier::new(&self.registry);
        let coordinate = project.coordinate();

        self.rules
            .iter()
            .flat_map(|configured| {
                let rule = &configured.rule;
                rule.enforce(project, &classifier)
                    .into_iter()
                    .map(|failure| {
                        let mut violation =
                            Violation::new(rule.id(), configured.severity, &coordinate, failure.message)
                                .with_description(rule.short_description());
                        if let Some(artifact) = failure.offending_artifact {
                            violation = violation.with_offending_artifact(artifact);
                        }
                        if let Some(suggestion) = failure.suggestion {
                            violation = violation.with_suggestion(suggestion);
                        }
                        violation
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Evaluate every project of a reactor and return a complete validation report
    pub fn enforce_reactor(&self, projects: &[ProjectDescriptor], options: &EnforcementOptions) -> ValidationReport {
        let start_time = Instant::now();

        let projects = match options.max_projects {
            Some(max_projects) => &projects[..projects.len().min(max_projects)],
            None => projects,
        };

        let (evaluated, violations) = if options.fail_fast {
            self.enforce_sequential_fail_fast(projects)
        } else if options.parallel && projects.len() > 1 {
            let violations: Vec<Violation> = projects
                .par_iter()
                .flat_map_iter(|project| self.enforce_project(project))
                .collect();
            (projects.len(), violations)
        } else {
            let violations = projects.iter().flat_map(|project| self.enforce_project(project)).collect();
            (projects.len(), violations)
        };

        let mut report = ValidationReport::new();
        for violation in violations {
            report.add_violation(violation);
        }

        report.set_projects_validated(evaluated);
        report.set_execution_time(start_time.elapsed().as_millis() as u64);
        report.set_config_fingerprint(self.config.fingerprint());
        report.sort_violations();

        report
    }

    fn enforce_sequential_fail_fast(&self, projects: &[ProjectDescriptor]) -> (usize, Vec<Violation>) {
        let mut all_violations = Vec::new();

        for (index, project) in projects.iter().enumerate() {
            let violations = self.enforce_project(project);
            let blocking = violations.iter().any(Violation::is_blocking);
            all_violations.extend(violations);

            if blocking {
                tracing::warn!(
                    "Stopping after [{}]: blocking violations found ({} of {} projects evaluated)",
                    project.coordinate(),
                    index + 1,
                    projects.len()
                );
                return (index + 1, all_violations);
            }
        }

        (projects.len(), all_violations)
    }

    /// Get configuration fingerprint
    pub fn config_fingerprint(&self) -> String {
        self.config.fingerprint()
    }

    /// Get statistics about the configured rules
    pub fn rule_stats(&self) -> RuleStats {
        let config = &self.config;
        let enabled_rules = self.rules.len();

        RuleStats {
            enabled_rules,
            disabled_rules: 3 - enabled_rules,
            permitted_types: if config.permitted_types.types.is_empty() {
                self.registry.len()
            } else {
                config.permitted_types.types.len()
            },
            ignored_project_types: config.dependencies.ignored_project_types.len(),
            known_project_types: self.registry.len(),
        }
    }
}

/// Statistics about configured rules
#[derive(Debug, Default)]
pub struct RuleStats {
    pub enabled_rules: usize,
    pub disabled_rules: usize,
    pub permitted_types: usize,
    pub ignored_project_types: usize,
    pub known_project_types: usize,
}

impl RuleStats {
    pub fn total_rules(&self) -> usize {
        self.enabled_rules + self.disabled_rules
    }
}
