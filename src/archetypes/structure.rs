//! Structural checks over a project's module and dependency lists
//!
//! Each check yields `None` when the project is well formed, or a message
//! describing the offending modules or dependencies.

use crate::domain::project::{Dependency, ProjectDescriptor};
use crate::patterns::PatternList;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The closed set of structural checks an archetype can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureCheck {
    /// Always passes
    None,
    /// Only modules; no dependencies or dependency management
    Reactor,
    /// Only dependency management; no modules or own dependencies
    BillOfMaterials,
    /// No modules
    NoModules,
}

impl StructureCheck {
    /// Run this check against a project
    pub fn non_compliance(
        self,
        archetype_name: &str,
        project: &ProjectDescriptor,
        ignore_group_ids: &PatternList,
    ) -> Option<String> {
        match self {
            Self::None => check_none(project),
            Self::Reactor => check_reactor(project, ignore_group_ids),
            Self::BillOfMaterials => check_bill_of_materials(project, ignore_group_ids),
            Self::NoModules => check_no_modules(archetype_name, project),
        }
    }

    /// One-line description for listings
    pub fn describe(self) -> &'static str {
        match self {
            Self::None => "no structural requirements",
            Self::Reactor => "module definitions only; no Dependency or DependencyManagement",
            Self::BillOfMaterials => "DependencyManagement only; no Modules or own Dependencies",
            Self::NoModules => "no module definitions",
        }
    }
}

/// Always passes
pub fn check_none(_project: &ProjectDescriptor) -> Option<String> {
    None
}

/// Reactors hold modules only. Dependencies are reserved for parent projects.
pub fn check_reactor(project: &ProjectDescriptor, ignore_group_ids: &PatternList) -> Option<String> {
    let dependencies = evaluated(&project.dependencies, ignore_group_ids);
    let managed = evaluated(&project.dependency_management, ignore_group_ids);

    if dependencies.is_empty() && managed.is_empty() {
        return None;
    }

    let mut found: Vec<String> = dependencies.iter().map(|d| d.canonical()).collect();
    found.extend(managed.iter().map(|d| d.canonical()));

    Some(format!(
        "REACTOR projects should not contain Dependency or DependencyManagement - only Modules. \
         (Dependencies should be defined within parent projects; found: [{}])",
        found.join(", ")
    ))
}

/// Bills of materials hold dependency management only.
///
/// Dependencies inherited from the parent (by canonical equality) and dependencies
/// whose group id is ignored do not count as own dependencies.
pub fn check_bill_of_materials(
    project: &ProjectDescriptor,
    ignore_group_ids: &PatternList,
) -> Option<String> {
    if !project.modules.is_empty() {
        return Some(format!(
            "BILL_OF_MATERIALS projects should not contain Modules (Child Projects). (Found: [{}])",
            project.modules.join(", ")
        ));
    }

    let inherited: HashSet<String> = project
        .parent_dependencies()
        .iter()
        .map(Dependency::canonical)
        .collect();

    let own: Vec<String> = evaluated(&project.dependencies, ignore_group_ids)
        .into_iter()
        .map(Dependency::canonical)
        .filter(|canonical| !inherited.contains(canonical))
        .collect();

    if own.is_empty() {
        None
    } else {
        Some(format!(
            "BILL_OF_MATERIALS projects should not contain Dependency definitions - only \
             DependencyManagement definitions. (Found: [{}])",
            own.join(", ")
        ))
    }
}

/// Module lists are reserved for reactor projects
pub fn check_no_modules(archetype_name: &str, project: &ProjectDescriptor) -> Option<String> {
    if project.modules.is_empty() {
        None
    } else {
        Some(format!(
            "{archetype_name} projects should not contain Modules (Child Projects). \
             (Modules are reserved for reactor projects; found: [{}])",
            project.modules.join(", ")
        ))
    }
}

fn evaluated<'a>(dependencies: &'a [Dependency], ignore_group_ids: &PatternList) -> Vec<&'a Dependency> {
    dependencies
        .iter()
        .filter(|d| !ignore_group_ids.matches_any(&d.group_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bom() -> ProjectDescriptor {
        ProjectDescriptor::new("se.acme.foo", "foo-bom", "pom")
    }

    #[test]
    fn test_reactor_with_modules_only_passes() {
        let reactor = ProjectDescriptor::new("se.acme.foo", "foo-reactor", "pom")
            .with_module("foo-api")
            .with_module("foo-impl-x");

        assert_eq!(check_reactor(&reactor, &PatternList::empty()), None);
    }

    #[test]
    fn test_reactor_rejects_dependencies_and_management() {
        let with_dependency = ProjectDescriptor::new("se.acme.foo", "foo-reactor", "pom")
            .with_dependency(Dependency::new("x", "y").with_scope("compile"));
        let with_management = ProjectDescriptor::new("se.acme.foo", "foo-reactor", "pom")
            .with_managed_dependency(Dependency::new("x", "y"));

        let message = check_reactor(&with_dependency, &PatternList::empty()).unwrap();
        assert!(message.contains("x:y::compile:jar:"));
        assert!(check_reactor(&with_management, &PatternList::empty()).is_some());
    }

    #[test]
    fn test_reactor_ignores_filtered_group_ids() {
        let reactor = ProjectDescriptor::new("se.acme.foo", "foo-reactor", "pom")
            .with_dependency(Dependency::new("se.acme.codestyle.x", "y"));
        let ignore = PatternList::new([r"se\.acme\.codestyle\..*"]).unwrap();

        assert_eq!(check_reactor(&reactor, &ignore), None);
    }

    #[test]
    fn test_bom_rejects_modules() {
        let message = check_bill_of_materials(&bom().with_module("child"), &PatternList::empty());
        assert!(message.unwrap().contains("Modules"));
    }

    #[test]
    fn test_bom_rejects_own_dependency() {
        let project = bom().with_dependency(Dependency::new("org.other", "lib").with_version("1.0"));

        let message = check_bill_of_materials(&project, &PatternList::empty()).unwrap();
        assert!(message.contains("org.other:lib:1.0"));
    }

    #[test]
    fn test_bom_tolerates_inherited_dependency() {
        let inherited = Dependency::new("org.other", "lib").with_version("1.0");
        let parent = ProjectDescriptor::new("se.acme.foo", "foo-parent", "pom")
            .with_dependency(inherited.clone());
        let project = bom().with_parent(parent).with_dependency(inherited);

        assert_eq!(check_bill_of_materials(&project, &PatternList::empty()), None);
    }

    #[test]
    fn test_bom_inheritance_uses_all_fields() {
        let parent = ProjectDescriptor::new("se.acme.foo", "foo-parent", "pom")
            .with_dependency(Dependency::new("org.other", "lib").with_version("1.0"));
        let project = bom()
            .with_parent(parent)
            .with_dependency(Dependency::new("org.other", "lib").with_version("2.0"));

        assert!(check_bill_of_materials(&project, &PatternList::empty()).is_some());
    }

    #[test]
    fn test_bom_tolerates_ignored_dependency() {
        let project = bom().with_dependency(Dependency::new("se.acme.codestyle.poms", "lib"));
        let ignore = PatternList::new([r"^se\.acme\.codestyle\..*"]).unwrap();

        assert_eq!(check_bill_of_materials(&project, &ignore), None);
    }

    #[test]
    fn test_no_modules() {
        let parent = ProjectDescriptor::new("se.acme.foo", "foo-parent", "pom");

        assert_eq!(check_no_modules("PARENT", &parent), None);
        let message = check_no_modules("PARENT", &parent.with_module("child")).unwrap();
        assert!(message.starts_with("PARENT projects should not contain Modules"));
    }

    #[test]
    fn test_dispatch() {
        let project = ProjectDescriptor::new("g", "a-assembly", "pom").with_module("m");
        let ignore = PatternList::empty();

        assert!(StructureCheck::None.non_compliance("ASSEMBLY", &project, &ignore).is_none());
        assert!(StructureCheck::NoModules
            .non_compliance("ASSEMBLY", &project, &ignore)
            .unwrap()
            .starts_with("ASSEMBLY"));
    }
}
