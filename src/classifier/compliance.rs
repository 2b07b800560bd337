//! Per-archetype compliance verdicts and near-miss ranking

use crate::archetypes::{ArchetypeRegistry, ProjectTypeRule};
use crate::domain::project::ProjectDescriptor;
use crate::patterns::PatternList;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of evaluating one project against one archetype
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceStatus {
    pub group_id_failure: Option<String>,
    pub artifact_id_failure: Option<String>,
    pub packaging_failure: Option<String>,
    pub structure_failure: Option<String>,
}

impl ComplianceStatus {
    /// Status without any failures
    pub const OK: ComplianceStatus = ComplianceStatus {
        group_id_failure: None,
        artifact_id_failure: None,
        packaging_failure: None,
        structure_failure: None,
    };

    pub fn is_compliant(&self) -> bool {
        self.group_id_failure.is_none()
            && self.artifact_id_failure.is_none()
            && self.packaging_failure.is_none()
            && self.structure_failure.is_none()
    }

    /// 2 per naming failure, 1 for a structural failure
    pub fn distance(&self) -> u32 {
        let naming = [&self.group_id_failure, &self.artifact_id_failure, &self.packaging_failure]
            .iter()
            .filter(|failure| failure.is_some())
            .count() as u32;

        naming * 2 + u32::from(self.structure_failure.is_some())
    }

    fn failures(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("GroupId", &self.group_id_failure),
            ("ArtifactId", &self.artifact_id_failure),
            ("Packaging", &self.packaging_failure),
            ("Internal structure", &self.structure_failure),
        ]
        .into_iter()
        .filter_map(|(facet, failure)| failure.as_deref().map(|message| (facet, message)))
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_compliant() {
            return f.write_str("Fully Compliant");
        }

        let failures: Vec<String> = self
            .failures()
            .map(|(facet, message)| format!("{facet} {message}"))
            .collect();

        write!(f, "[{}] differences: {}", self.distance(), failures.join(", "))
    }
}

/// Evaluate a project against one rule.
///
/// A project whose group id matches `ignore_group_ids` is fully compliant. The
/// same list is handed to the structural check.
pub fn evaluate(
    project: &ProjectDescriptor,
    rule: &ProjectTypeRule,
    ignore_group_ids: Option<&PatternList>,
) -> ComplianceStatus {
    let empty = PatternList::empty();
    let ignore = ignore_group_ids.unwrap_or(&empty);

    if project
        .group_id
        .as_deref()
        .is_some_and(|group_id| ignore.matches_any(group_id))
    {
        return ComplianceStatus::OK;
    }

    ComplianceStatus {
        group_id_failure: rule.group_id_non_compliance(project.group_id.as_deref()),
        artifact_id_failure: rule.artifact_id_non_compliance(project.artifact_id.as_deref()),
        packaging_failure: rule.packaging_non_compliance(project.packaging.as_deref()),
        structure_failure: rule.structural_non_compliance(project, ignore),
    }
}

/// Rules sharing the lowest compliance distance, in registry order
pub fn closest_matches<'r>(
    project: &ProjectDescriptor,
    registry: &'r ArchetypeRegistry,
    ignore_group_ids: Option<&PatternList>,
) -> Vec<(&'r ProjectTypeRule, ComplianceStatus)> {
    let evaluated: Vec<_> = registry
        .rules()
        .iter()
        .map(|rule| (rule, evaluate(project, rule, ignore_group_ids)))
        .collect();

    let Some(lowest) = evaluated.iter().map(|(_, status)| status.distance()).min() else {
        return Vec::new();
    };

    evaluated
        .into_iter()
        .filter(|(_, status)| status.distance() == lowest)
        .collect()
}
