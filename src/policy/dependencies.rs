//! Dependency edge policy between archetypes
//!
//! Library-style projects must not depend on implementation, test, application
//! or bill-of-materials artifacts. Test-scoped dependencies are exempt.

use super::{ProjectRule, RuleFailure};
use crate::archetypes::Archetype;
use crate::classifier::{ClassificationError, Classifier};
use crate::domain::project::{ArtifactCoordinate, Dependency, ProjectDescriptor};
use crate::domain::violations::CodestyleResult;
use crate::patterns::PatternList;
use tracing::debug;

/// Archetypes whose own dependencies are never evaluated
pub const DEFAULT_IGNORED_PROJECT_TYPES: [Archetype; 9] = [
    Archetype::JeeApplication,
    Archetype::Parent,
    Archetype::Assembly,
    Archetype::Reactor,
    Archetype::ProofOfConcept,
    Archetype::Example,
    Archetype::Test,
    Archetype::JavaAgent,
    Archetype::StandaloneApplication,
];

/// Group ids included in evaluation unless stated otherwise
pub const DEFAULT_EVALUATE_GROUP_IDS: [&str; 1] = [r"^se\.jguru\..*"];

/// Group ids excluded from evaluation unless stated otherwise
pub const DEFAULT_DONT_EVALUATE_GROUP_IDS: [&str; 2] =
    [r"^se\.jguru\..*\.generated\..*", r"^se\.jguru\.codestyle\..*"];

pub const RULE_ID: &str = "correct_dependencies";

const SHORT_DESCRIPTION: &str = "Incorrect Dependency found within project.";

/// One forbidden dependency edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyViolation {
    /// Archetype of the offending dependency
    pub archetype: Archetype,
    pub dependency: Dependency,
    pub message: String,
}

/// Forbidden archetype edges for non-application projects
#[derive(Debug, Clone)]
pub struct DependencyPolicy {
    ignored_project_types: Vec<Archetype>,
    evaluate_group_ids: PatternList,
    dont_evaluate_group_ids: PatternList,
}

impl DependencyPolicy {
    pub fn new<S: AsRef<str>>(
        ignored_project_types: Vec<Archetype>,
        evaluate_group_ids: &[S],
        dont_evaluate_group_ids: &[S],
    ) -> CodestyleResult<Self> {
        Ok(Self {
            ignored_project_types,
            evaluate_group_ids: PatternList::new(evaluate_group_ids)?,
            dont_evaluate_group_ids: PatternList::new(dont_evaluate_group_ids)?,
        })
    }

    pub fn with_defaults() -> CodestyleResult<Self> {
        Ok(Self {
            ignored_project_types: DEFAULT_IGNORED_PROJECT_TYPES.to_vec(),
            evaluate_group_ids: PatternList::new(DEFAULT_EVALUATE_GROUP_IDS)?,
            dont_evaluate_group_ids: PatternList::new(DEFAULT_DONT_EVALUATE_GROUP_IDS)?,
        })
    }

    pub fn ignored_project_types(&self) -> &[Archetype] {
        &self.ignored_project_types
    }

    /// Check the dependencies of a project already classified as `archetype`.
    ///
    /// Every offending dependency yields one violation. A dependency that cannot
    /// be classified aborts the check.
    pub fn check<F>(
        &self,
        project: &ProjectDescriptor,
        archetype: Archetype,
        classify_artifact: F,
    ) -> Result<Vec<DependencyViolation>, ClassificationError>
    where
        F: Fn(&ArtifactCoordinate) -> Result<Archetype, ClassificationError>,
    {
        if self.ignored_project_types.contains(&archetype) {
            debug!("Ignored [{}] since {} projects are not evaluated.", project.coordinate(), archetype);
            return Ok(Vec::new());
        }

        if self.is_exempt(project) {
            return Ok(Vec::new());
        }

        let mut violations = Vec::new();

        for dependency in &project.dependencies {
            if dependency.is_test_scoped() || !self.is_evaluated(&dependency.group_id) {
                continue;
            }

            let dependency_type = classify_artifact(&dependency.coordinate())?;
            if let Some(reason) = forbidden_reason(dependency_type) {
                violations.push(DependencyViolation {
                    archetype: dependency_type,
                    dependency: dependency.clone(),
                    message: format!("Don't use {dependency_type} dependencies {reason}"),
                });
            }
        }

        Ok(violations)
    }

    /// Whether the group filters exempt the project itself
    fn is_exempt(&self, project: &ProjectDescriptor) -> bool {
        let group_id = project.group_id_or_empty();
        if self.dont_evaluate_group_ids.matches_any(group_id) {
            debug!(
                "Ignored [{}] since its groupId was excluded from enforcement.",
                project.coordinate()
            );
            return true;
        }
        if !self.evaluate_group_ids.matches_any(group_id) {
            debug!(
                "Ignored [{}] since its groupId was not included in enforcement.",
                project.coordinate()
            );
            return true;
        }
        false
    }

    fn is_evaluated(&self, group_id: &str) -> bool {
        self.evaluate_group_ids.matches_any(group_id) && !self.dont_evaluate_group_ids.matches_any(group_id)
    }
}

fn forbidden_reason(dependency_type: Archetype) -> Option<&'static str> {
    match dependency_type {
        Archetype::Implementation => Some("outside of application projects."),
        Archetype::Test => Some("in compile scope for non-test artifacts."),
        Archetype::JeeApplication | Archetype::ProofOfConcept => Some("in bundles."),
        Archetype::BillOfMaterials => {
            Some("in Dependency block. (Use only as DependencyManagement import-scoped dependencies).")
        }
        _ => None,
    }
}

impl ProjectRule for DependencyPolicy {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn short_description(&self) -> &'static str {
        SHORT_DESCRIPTION
    }

    fn enforce(&self, project: &ProjectDescriptor, classifier: &Classifier<'_>) -> Vec<RuleFailure> {
        if self.is_exempt(project) {
            return Vec::new();
        }

        let archetype = match classifier.classify_with(project, &self.dont_evaluate_group_ids) {
            Ok(archetype) => archetype,
            Err(e) => return vec![RuleFailure::new(e.to_string())],
        };

        match self.check(project, archetype, |artifact| classifier.classify_artifact(artifact)) {
            Ok(violations) => violations
                .into_iter()
                .map(|v| RuleFailure::new(v.message).with_offending_artifact(v.dependency.coordinate().to_string()))
                .collect(),
            Err(e) => vec![RuleFailure::new(e.to_string())],
        }
    }
}
