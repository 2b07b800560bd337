//! Source packages must live below the project's group id

use super::{ProjectRule, RuleFailure};
use crate::classifier::Classifier;
use crate::domain::project::ProjectDescriptor;
use std::collections::BTreeMap;

pub const RULE_ID: &str = "correct_packaging";

const SHORT_DESCRIPTION: &str = "Topmost source package must be identical to project groupId.";

/// Checks the package to source file map supplied with a project
#[derive(Debug, Clone, Copy, Default)]
pub struct PackagingPolicy;

impl PackagingPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Projects without sources always pass
    pub fn check(&self, project: &ProjectDescriptor) -> Result<(), String> {
        if project.source_packages.is_empty() {
            return Ok(());
        }

        let group_id = match project.group_id.as_deref() {
            Some(group_id) if !group_id.is_empty() => group_id,
            _ => return Err("Maven groupId cannot be null or empty.".to_string()),
        };

        let incorrect: BTreeMap<&str, Vec<&str>> = project
            .source_packages
            .iter()
            .filter(|(package, _)| !package.starts_with(group_id))
            .map(|(package, files)| (package.as_str(), files.iter().map(String::as_str).collect()))
            .collect();

        if incorrect.is_empty() {
            return Ok(());
        }

        let rendered: Vec<String> = incorrect
            .iter()
            .map(|(package, files)| format!("{package}=[{}]", files.join(", ")))
            .collect();

        Err(format!(
            "Incorrect packaging detected; required [{group_id}] but found package to file names: {{{}}}",
            rendered.join(", ")
        ))
    }
}

impl ProjectRule for PackagingPolicy {
    fn id(&self) -> &'static str {
        RULE_ID
    }

    fn short_description(&self) -> &'static str {
        SHORT_DESCRIPTION
    }

    fn enforce(&self, project: &ProjectDescriptor, _classifier: &Classifier<'_>) -> Vec<RuleFailure> {
        match self.check(project) {
            Ok(()) => Vec::new(),
            Err(message) => vec![RuleFailure::new(message)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_sources_passes() {
        let project = ProjectDescriptor {
            group_id: None,
            ..Default::default()
        };
        assert_eq!(PackagingPolicy::new().check(&project), Ok(()));
    }

    #[test]
    fn test_packages_below_group_id_pass() {
        let project = ProjectDescriptor::new("se.acme.foo", "foo-api", "jar")
            .with_source_file("se.acme.foo", "Foo.java")
            .with_source_file("se.acme.foo.api.spi", "Bar.java");

        assert_eq!(PackagingPolicy::new().check(&project), Ok(()));
    }

    #[test]
    fn test_foreign_package_is_reported() {
        let project = ProjectDescriptor::new("se.acme.foo", "foo-api", "jar")
            .with_source_file("se.acme.foo", "Foo.java")
            .with_source_file("org.other", "B.java")
            .with_source_file("org.other", "A.java");

        assert_eq!(
            PackagingPolicy::new().check(&project),
            Err("Incorrect packaging detected; required [se.acme.foo] but found package to file names: \
                 {org.other=[A.java, B.java]}"
                .to_string())
        );
    }

    #[test]
    fn test_missing_group_id_fails() {
        let mut project = ProjectDescriptor::new("", "foo-api", "jar").with_source_file("a", "A.java");
        assert_eq!(
            PackagingPolicy::new().check(&project),
            Err("Maven groupId cannot be null or empty.".to_string())
        );

        project.group_id = None;
        assert!(PackagingPolicy::new().check(&project).is_err());
    }
}
