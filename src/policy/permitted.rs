//! Permitted project type rule
//!
//! A project must match exactly one archetype out of a configured subset.

use super::{ProjectRule, RuleFailure};
use crate::archetypes::{Archetype, ArchetypeRegistry};
use crate::classifier::{closest_matches, ClassificationError, Classifier};
use crate::domain::project::ProjectDescriptor;
use crate::domain::violations::CodestyleResult;
use crate::patterns::PatternList;
use std::fmt;
use tracing::debug;

pub const RULE_ID: &str = "permitted_project_type";

const SHORT_DESCRIPTION: &str = "POM groupId, artifactId and packaging must comply with defined standard";

/// Restricts projects to a subset of the archetype registry
#[derive(Debug, Clone)]
pub struct PermittedTypePolicy {
    permitted: ArchetypeRegistry,
    dont_evaluate_group_ids: PatternList,
}

impl PermittedTypePolicy {
    pub fn new<S: AsRef<str>>(permitted: &[Archetype], dont_evaluate_group_ids: &[S]) -> CodestyleResult<Self> {
        Ok(Self {
            permitted: ArchetypeRegistry::with_archetypes(permitted),
            dont_evaluate_group_ids: PatternList::naming(dont_evaluate_group_ids)?,
        })
    }

    /// Every built-in archetype is permitted and no group is ignored
    pub fn all() -> Self {
        Self {
            permitted: ArchetypeRegistry::common(),
            dont_evaluate_group_ids: PatternList::empty(),
        }
    }

    pub fn permitted(&self) -> &ArchetypeRegistry {
        &self.permitted
    }

    /// The matching permitted archetype, `Ok(None)` for projects in ignored groups
    pub fn check(&self, project: &ProjectDescriptor) -> Result<Option<Archetype>, String> {
        self.evaluate(project).map_err(|failure| failure.message)
    }

    fn evaluate(&self, project: &ProjectDescriptor) -> Result<Option<Archetype>, RuleFailure> {
        if project
            .group_id
            .as_deref()
            .is_some_and(|group_id| self.dont_evaluate_group_ids.matches_any(group_id))
        {
            debug!(
                "Ignored [{}:{}] since its groupId was excluded from enforcement.",
                project.group_id_or_empty(),
                project.artifact_id.as_deref().unwrap_or("null")
            );
            return Ok(None);
        }

        let classifier = Classifier::new(&self.permitted);
        match classifier.classify_with(project, &self.dont_evaluate_group_ids) {
            Ok(archetype) => {
                debug!("Found matching ProjectType [{}] for project {}", archetype, project.pretty_print());
                Ok(Some(archetype))
            }
            Err(ClassificationError::Ambiguous { matches, .. }) => Err(RuleFailure::new(format!(
                "Several permitted ProjectTypes matched {}: ({}).",
                project.pretty_print(),
                matches.iter().map(|a| a.name()).collect::<Vec<_>>().join(", ")
            ))),
            Err(_) => {
                let closest = closest_matches(project, &self.permitted, Some(&self.dont_evaluate_group_ids));
                let reasons: Vec<String> = closest
                    .iter()
                    .map(|(rule, status)| format!(" [{}]: {}", rule.name(), status))
                    .collect();

                let failure = RuleFailure::new(format!(
                    "None of the permitted ProjectTypes matched {}. \n Failure reasons per similar ProjectType:\n{}",
                    project.pretty_print(),
                    reasons.join("\n")
                ));

                let names: Vec<&str> = closest.iter().map(|(rule, _)| rule.name()).collect();
                Err(match names.as_slice() {
                    [] => failure,
                    [name] => failure.with_suggestion(format!("Closest permitted project type: {name}")),
                    _ => failure.with_suggestion(format!("Closest permitted project types: {}", names.join(", "))),
                })
            }
        }
    }
}

impl fmt::Display for PermittedTypePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dont_evaluate_group_ids.is_empty() {
            write!(f, "PermittedProjectTypeRule ignoring no artifacts.")?;
        } else {
            write!(
                f,
                "PermittedProjectTypeRule ignoring artifacts matching [{}] groupIDs: {}",
                self.dont_evaluate_group_ids.len(),
                self.dont_evaluate_group_ids
            )?;
        }

        write!(f, "\n[{}] known project types: ", self.permitted.len())?;
        for (index, rule) in self.permitted.rules().iter().enumerate() {
            write!(f, "\n[{index}/{}]: {rule}", self.permitted.len())?;
        }
        Ok(())
    }
}

impl ProjectRule for PermittedTypePolicy {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn short_description(&self) -> &'static str {
        SHORT_DESCRIPTION
    }

    fn enforce(&self, project: &ProjectDescriptor, _classifier: &Classifier<'_>) -> Vec<RuleFailure> {
        match self.evaluate(project) {
            Ok(_) => Vec::new(),
            Err(failure) => vec![failure],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::Dependency;

    #[test]
    fn test_all_types_permitted() {
        let policy = PermittedTypePolicy::all();
        let project = ProjectDescriptor::new("se.acme.foo.api", "foo-api", "jar");

        assert_eq!(policy.check(&project), Ok(Some(Archetype::Api)));
    }

    #[test]
    fn test_type_outside_subset_fails_with_reasons() {
        let policy = PermittedTypePolicy::new(&[Archetype::Api, Archetype::Model], &[] as &[&str]).unwrap();
        let project = ProjectDescriptor::new("se.acme.foo.impl.jpa", "foo-impl-jpa", "jar");

        let message = policy.check(&project).unwrap_err();
        assert!(message.starts_with(
            "None of the permitted ProjectTypes matched GAV [se.acme.foo.impl.jpa:foo-impl-jpa:jar]. \n Failure reasons per similar ProjectType:\n"
        ));
        assert!(message.contains(" [API]: [4] differences: GroupId"));
        assert!(message.contains(" [MODEL]: [4] differences: GroupId"));
    }

    #[test]
    fn test_ignored_group_is_skipped() {
        let policy = PermittedTypePolicy::new(&[Archetype::Api], &[r"se\.acme\.generated\..*"]).unwrap();
        let project = ProjectDescriptor::new("se.acme.generated.stuff", "whatever", "war");

        assert_eq!(policy.check(&project), Ok(None));
    }

    #[test]
    fn test_ignored_group_matching_ignores_case_and_comments() {
        let policy =
            PermittedTypePolicy::new(&[Archetype::Api], &[r"SE\.ACME\.generated\..*  # generated sources"]).unwrap();
        let project = ProjectDescriptor::new("se.acme.generated.stuff", "whatever", "war");

        assert_eq!(policy.check(&project), Ok(None));
    }

    #[test]
    fn test_failure_suggests_closest_permitted_types() {
        let registry = ArchetypeRegistry::common();
        let classifier = Classifier::new(&registry);
        let policy = PermittedTypePolicy::new(&[Archetype::Api, Archetype::Model], &[] as &[&str]).unwrap();

        let project = ProjectDescriptor::new("se.acme.foo.impl.jpa", "foo-impl-jpa", "jar");
        let failures = policy.enforce(&project, &classifier);
        assert_eq!(failures.len(), 1);
        assert_eq!(
            failures[0].suggestion.as_deref(),
            Some("Closest permitted project types: MODEL, API")
        );

        let project = ProjectDescriptor::new("se.acme.foo.api", "foo-api", "war");
        let failures = policy.enforce(&project, &classifier);
        assert_eq!(failures[0].suggestion.as_deref(), Some("Closest permitted project type: API"));
    }

    #[test]
    fn test_ambiguity_carries_no_suggestion() {
        let registry = ArchetypeRegistry::common();
        let classifier = Classifier::new(&registry);
        let project = ProjectDescriptor::new("se.acme.test.web", "web-test", "war");

        let failures = PermittedTypePolicy::all().enforce(&project, &classifier);
        assert_eq!(failures.len(), 1);
        assert!(failures[0].suggestion.is_none());
    }

    #[test]
    fn test_structural_failure_lists_reason() {
        let policy = PermittedTypePolicy::all();
        let project = ProjectDescriptor::new("se.acme.foo", "foo-reactor", "pom")
            .with_dependency(Dependency::new("x", "y"));

        let message = policy.check(&project).unwrap_err();
        assert!(message.contains(" [REACTOR]: [1] differences: Internal structure REACTOR projects"));
    }

    #[test]
    fn test_ignore_list_applies_to_structure() {
        let policy = PermittedTypePolicy::new(&[Archetype::BillOfMaterials], &[r"se\.acme\.codestyle\..*"]).unwrap();
        let project = ProjectDescriptor::new("se.acme.foo", "foo-bom", "pom")
            .with_dependency(Dependency::new("se.acme.codestyle.poms", "lib"));

        assert_eq!(policy.check(&project), Ok(Some(Archetype::BillOfMaterials)));
    }

    #[test]
    fn test_ambiguity_is_reported() {
        let policy = PermittedTypePolicy::all();
        let project = ProjectDescriptor::new("se.acme.test.web", "web-test", "war");

        let message = policy.check(&project).unwrap_err();
        assert_eq!(
            message,
            "Several permitted ProjectTypes matched GAV [se.acme.test.web:web-test:war]: (JEE_APPLICATION, TEST)."
        );
    }

    #[test]
    fn test_display_lists_known_types() {
        let policy = PermittedTypePolicy::new(&[Archetype::Api], &[r"a\..*"]).unwrap();
        let rendered = policy.to_string();

        assert!(rendered.starts_with("PermittedProjectTypeRule ignoring artifacts matching [1] groupIDs: [a\\..*]"));
        assert!(rendered.contains("[0/1]: [ProjectType: API]"));
    }
}
