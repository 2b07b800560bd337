//! Project model handed to the engines by the host build
//!
//! Descriptors are plain, immutable values. Every field a build tool might leave
//! unset is optional, since the naming rules decide per archetype whether a
//! missing value is tolerated.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Scope name of dependencies which are only visible to tests
pub const SCOPE_TEST: &str = "test";

/// Scope used when a dependency declares none
pub const DEFAULT_SCOPE: &str = "compile";

/// Type used when a dependency declares none
pub const DEFAULT_TYPE: &str = "jar";

/// One build module of a reactor.
///
/// Descriptor files may use either snake_case or the camelCase names of a POM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectDescriptor {
    #[serde(alias = "groupId")]
    pub group_id: Option<String>,
    #[serde(alias = "artifactId")]
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,
    /// Child module names, order irrelevant
    pub modules: Vec<String>,
    pub dependencies: Vec<Dependency>,
    /// Entries of the dependency management block
    #[serde(alias = "dependencyManagement")]
    pub dependency_management: Vec<Dependency>,
    /// Parent project, used to tell inherited dependencies from own ones
    pub parent: Option<Box<ProjectDescriptor>>,
    /// Source package name to source file names, as found by an external scanner
    #[serde(alias = "sourcePackages")]
    pub source_packages: BTreeMap<String, BTreeSet<String>>,
}

impl ProjectDescriptor {
    /// Create a descriptor from its naming coordinate
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        packaging: impl Into<String>,
    ) -> Self {
        Self {
            group_id: Some(group_id.into()),
            artifact_id: Some(artifact_id.into()),
            packaging: Some(packaging.into()),
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.modules.push(module.into());
        self
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_managed_dependency(mut self, dependency: Dependency) -> Self {
        self.dependency_management.push(dependency);
        self
    }

    pub fn with_parent(mut self, parent: ProjectDescriptor) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Register a source file found in the given package
    pub fn with_source_file(mut self, package: impl Into<String>, file: impl Into<String>) -> Self {
        self.source_packages
            .entry(package.into())
            .or_default()
            .insert(file.into());
        self
    }

    /// Group id, or the empty string when absent
    pub fn group_id_or_empty(&self) -> &str {
        self.group_id.as_deref().unwrap_or("")
    }

    /// `group :: artifact :: version` coordinate used in diagnostics
    pub fn gav(&self) -> String {
        format!(
            "{} :: {} :: {}",
            display_or_null(&self.group_id),
            display_or_null(&self.artifact_id),
            display_or_null(&self.version)
        )
    }

    /// `group:artifact:version` coordinate used to identify the project in reports
    pub fn coordinate(&self) -> String {
        format!(
            "{}:{}:{}",
            display_or_null(&self.group_id),
            display_or_null(&self.artifact_id),
            display_or_null(&self.version)
        )
    }

    /// `GAV [group:artifact:packaging]`, the form used by the permitted type rule
    pub fn pretty_print(&self) -> String {
        format!(
            "GAV [{}:{}:{}]",
            display_or_null(&self.group_id),
            display_or_null(&self.artifact_id),
            display_or_null(&self.packaging)
        )
    }

    /// Dependencies declared by the parent project, if any
    pub fn parent_dependencies(&self) -> &[Dependency] {
        match &self.parent {
            Some(parent) => &parent.dependencies,
            None => &[],
        }
    }
}

/// A declared dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dependency {
    #[serde(alias = "groupId")]
    pub group_id: String,
    #[serde(alias = "artifactId")]
    pub artifact_id: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default, rename = "type")]
    pub dependency_type: Option<String>,
    #[serde(default)]
    pub classifier: Option<String>,
}

impl Dependency {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
            scope: None,
            dependency_type: None,
            classifier: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_type(mut self, dependency_type: impl Into<String>) -> Self {
        self.dependency_type = Some(dependency_type.into());
        self
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    /// Effective scope
    pub fn scope(&self) -> &str {
        self.scope.as_deref().unwrap_or(DEFAULT_SCOPE)
    }

    /// Effective type
    pub fn dependency_type(&self) -> &str {
        self.dependency_type.as_deref().unwrap_or(DEFAULT_TYPE)
    }

    pub fn is_test_scoped(&self) -> bool {
        self.scope().eq_ignore_ascii_case(SCOPE_TEST)
    }

    /// Canonical representation used to compare dependencies for inheritance.
    ///
    /// Field order: group, artifact, version, scope, type, classifier.
    pub fn canonical(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}:{}",
            self.group_id,
            self.artifact_id,
            self.version.as_deref().unwrap_or(""),
            self.scope(),
            self.dependency_type(),
            self.classifier.as_deref().unwrap_or("")
        )
    }

    /// What the artifact classifier gets to see of this dependency
    pub fn coordinate(&self) -> ArtifactCoordinate {
        ArtifactCoordinate {
            group_id: Some(self.group_id.clone()),
            artifact_id: Some(self.artifact_id.clone()),
            version: self.version.clone(),
            packaging: Some(self.dependency_type().to_string()),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

/// Coordinate of a resolved artifact, without any project structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactCoordinate {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    /// Packaging of a project, or type of a dependency
    pub packaging: Option<String>,
}

impl ArtifactCoordinate {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        packaging: impl Into<String>,
    ) -> Self {
        Self {
            group_id: Some(group_id.into()),
            artifact_id: Some(artifact_id.into()),
            version: None,
            packaging: Some(packaging.into()),
        }
    }

    pub fn gav(&self) -> String {
        format!(
            "{} :: {} :: {}",
            display_or_null(&self.group_id),
            display_or_null(&self.artifact_id),
            display_or_null(&self.version)
        )
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : {} : {}",
            display_or_null(&self.group_id),
            display_or_null(&self.artifact_id),
            display_or_null(&self.version)
        )
    }
}

impl From<&ProjectDescriptor> for ArtifactCoordinate {
    fn from(project: &ProjectDescriptor) -> Self {
        Self {
            group_id: project.group_id.clone(),
            artifact_id: project.artifact_id.clone(),
            version: project.version.clone(),
            packaging: project.packaging.clone(),
        }
    }
}

fn display_or_null(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("null")
}
