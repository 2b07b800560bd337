//! Configuration loading and management for Codestyle Guardian
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are converted to the policy objects the engines consume
//! - Defaults are the rule defaults of the enforcement rules themselves
//! - Every group id expression is compiled during validation, not at first use

use crate::archetypes::Archetype;
use crate::domain::violations::{CodestyleError, CodestyleResult, Severity};
use crate::patterns::PatternList;
use crate::policy::dependencies::{
    DependencyPolicy, DEFAULT_DONT_EVALUATE_GROUP_IDS, DEFAULT_EVALUATE_GROUP_IDS,
    DEFAULT_IGNORED_PROJECT_TYPES,
};
use crate::policy::permitted::PermittedTypePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Supported configuration format versions
const SUPPORTED_VERSIONS: [&str; 1] = ["1.0"];

/// Main configuration structure for Codestyle Guardian
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodestyleConfig {
    /// Configuration format version
    pub version: String,
    /// Which project types a project may be
    #[serde(default)]
    pub permitted_types: PermittedTypesConfig,
    /// Which dependencies a project may declare
    #[serde(default)]
    pub dependencies: DependenciesConfig,
    /// Whether source packages must start with the group id
    #[serde(default)]
    pub packaging: PackagingConfig,
}

/// Settings of the permitted project type rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermittedTypesConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_severity")]
    pub severity: Severity,
    /// Permitted archetypes; empty means every known archetype
    #[serde(default)]
    pub types: Vec<Archetype>,
    /// Group ids exempt from the rule
    #[serde(default)]
    pub dont_evaluate_group_ids: Vec<String>,
}

/// Settings of the dependency rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependenciesConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_severity")]
    pub severity: Severity,
    /// Archetypes whose dependencies are not evaluated
    #[serde(default = "default_ignored_project_types")]
    pub ignored_project_types: Vec<Archetype>,
    /// Group ids included in evaluation
    #[serde(default = "default_evaluate_group_ids")]
    pub evaluate_group_ids: Vec<String>,
    /// Group ids excluded from evaluation
    #[serde(default = "default_dont_evaluate_group_ids")]
    pub dont_evaluate_group_ids: Vec<String>,
}

/// Settings of the packaging rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_severity")]
    pub severity: Severity,
}

impl Default for PermittedTypesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: Severity::Error,
            types: Vec::new(),
            dont_evaluate_group_ids: Vec::new(),
        }
    }
}

impl Default for DependenciesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: Severity::Error,
            ignored_project_types: default_ignored_project_types(),
            evaluate_group_ids: default_evaluate_group_ids(),
            dont_evaluate_group_ids: default_dont_evaluate_group_ids(),
        }
    }
}

impl Default for PackagingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: Severity::Error,
        }
    }
}

impl PermittedTypesConfig {
    /// Build the rule described by this section
    pub fn to_policy(&self) -> CodestyleResult<PermittedTypePolicy> {
        let types = if self.types.is_empty() {
            Archetype::ALL.to_vec()
        } else {
            self.types.clone()
        };
        PermittedTypePolicy::new(&types, &self.dont_evaluate_group_ids)
    }
}

impl DependenciesConfig {
    /// Build the rule described by this section
    pub fn to_policy(&self) -> CodestyleResult<DependencyPolicy> {
        DependencyPolicy::new(
            self.ignored_project_types.clone(),
            &self.evaluate_group_ids,
            &self.dont_evaluate_group_ids,
        )
    }
}

impl CodestyleConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> CodestyleResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            CodestyleError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            CodestyleError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> CodestyleResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| CodestyleError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Default configuration: all rules enabled with their built-in defaults
    pub fn with_defaults() -> Self {
        Self {
            version: "1.0".to_string(),
            permitted_types: PermittedTypesConfig::default(),
            dependencies: DependenciesConfig::default(),
            packaging: PackagingConfig::default(),
        }
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> CodestyleResult<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version.as_str()) {
            return Err(CodestyleError::config(format!(
                "Unsupported configuration version: {}. Supported versions: {}",
                self.version,
                SUPPORTED_VERSIONS.join(", ")
            )));
        }

        PatternList::naming(&self.permitted_types.dont_evaluate_group_ids).map_err(|e| {
            CodestyleError::config(format!("Invalid entry in 'permitted_types.dont_evaluate_group_ids': {e}"))
        })?;

        let groups = [
            ("dependencies.evaluate_group_ids", &self.dependencies.evaluate_group_ids),
            ("dependencies.dont_evaluate_group_ids", &self.dependencies.dont_evaluate_group_ids),
        ];
        for (key, patterns) in groups {
            PatternList::new(patterns)
                .map_err(|e| CodestyleError::config(format!("Invalid entry in '{key}': {e}")))?;
        }

        for (index, archetype) in self.permitted_types.types.iter().enumerate() {
            if self.permitted_types.types[..index].contains(archetype) {
                return Err(CodestyleError::config(format!(
                    "Duplicate project type '{archetype}' in 'permitted_types.types'"
                )));
            }
        }

        Ok(())
    }

    /// Number of enabled rules
    pub fn enabled_rule_count(&self) -> usize {
        [self.permitted_types.enabled, self.dependencies.enabled, self.packaging.enabled]
            .iter()
            .filter(|enabled| **enabled)
            .count()
    }

    /// Convert to JSON for serialization
    pub fn to_json(&self) -> CodestyleResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CodestyleError::config(format!("Failed to serialize config: {e}")))
    }

    /// Stable fingerprint of the configuration, recorded in reports
    pub fn fingerprint(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        self.version.hash(&mut hasher);

        let permitted = &self.permitted_types;
        permitted.enabled.hash(&mut hasher);
        permitted.severity.hash(&mut hasher);
        permitted.types.hash(&mut hasher);
        permitted.dont_evaluate_group_ids.hash(&mut hasher);

        let dependencies = &self.dependencies;
        dependencies.enabled.hash(&mut hasher);
        dependencies.severity.hash(&mut hasher);
        dependencies.ignored_project_types.hash(&mut hasher);
        dependencies.evaluate_group_ids.hash(&mut hasher);
        dependencies.dont_evaluate_group_ids.hash(&mut hasher);

        self.packaging.enabled.hash(&mut hasher);
        self.packaging.severity.hash(&mut hasher);

        format!("{:x}", hasher.finish())
    }
}

impl Default for CodestyleConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_true() -> bool {
    true
}

fn default_severity() -> Severity {
    Severity::Error
}

fn default_ignored_project_types() -> Vec<Archetype> {
    DEFAULT_IGNORED_PROJECT_TYPES.to_vec()
}

fn default_evaluate_group_ids() -> Vec<String> {
    DEFAULT_EVALUATE_GROUP_IDS.iter().map(|s| s.to_string()).collect()
}

fn default_dont_evaluate_group_ids() -> Vec<String> {
    DEFAULT_DONT_EVALUATE_GROUP_IDS.iter().map(|s| s.to_string()).collect()
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: CodestyleConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self { config: CodestyleConfig::default() }
    }

    /// Restrict the permitted project types
    pub fn permit(mut self, archetype: Archetype) -> Self {
        self.config.permitted_types.types.push(archetype);
        self
    }

    /// Exempt a group id expression from the permitted type rule
    pub fn dont_evaluate_for_types(mut self, pattern: impl Into<String>) -> Self {
        self.config.permitted_types.dont_evaluate_group_ids.push(pattern.into());
        self
    }

    /// Replace the group ids evaluated by the dependency rule
    pub fn evaluate_group_ids<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.dependencies.evaluate_group_ids = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the group ids excluded by the dependency rule
    pub fn dont_evaluate_group_ids<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.dependencies.dont_evaluate_group_ids = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the archetypes whose dependencies are not evaluated
    pub fn ignored_project_types(mut self, archetypes: Vec<Archetype>) -> Self {
        self.config.dependencies.ignored_project_types = archetypes;
        self
    }

    pub fn packaging_enabled(mut self, enabled: bool) -> Self {
        self.config.packaging.enabled = enabled;
        self
    }

    /// Severity used by every rule
    pub fn severity(mut self, severity: Severity) -> Self {
        self.config.permitted_types.severity = severity;
        self.config.dependencies.severity = severity;
        self.config.packaging.severity = severity;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> CodestyleResult<CodestyleConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_reproduce_rule_defaults() {
        let config = CodestyleConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.enabled_rule_count(), 3);
        assert_eq!(config.dependencies.ignored_project_types.len(), 9);
        assert_eq!(config.dependencies.evaluate_group_ids, vec![r"^se\.jguru\..*".to_string()]);
        assert!(config.permitted_types.types.is_empty());
        assert_eq!(config.permitted_types.to_policy().unwrap().permitted().len(), 19);
    }

    #[test]
    fn test_load_partial_yaml() -> CodestyleResult<()> {
        let config = CodestyleConfig::load_from_str(
            r#"
version: "1.0"
permitted_types:
  types: [API, IMPLEMENTATION, MODEL]
  dont_evaluate_group_ids: ['se\.acme\.generated\..*']
dependencies:
  severity: warning
  evaluate_group_ids: ['^se\.acme\..*']
packaging:
  enabled: false
"#,
        )?;

        assert_eq!(
            config.permitted_types.types,
            vec![Archetype::Api, Archetype::Implementation, Archetype::Model]
        );
        assert_eq!(config.dependencies.severity, Severity::Warning);
        assert_eq!(config.dependencies.dont_evaluate_group_ids.len(), 2);
        assert!(!config.packaging.enabled);
        assert_eq!(config.enabled_rule_count(), 2);
        Ok(())
    }

    #[test]
    fn test_load_from_file() -> CodestyleResult<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("codestyle_guardian.yaml");
        fs::write(&path, "version: \"1.0\"\n")?;

        let config = CodestyleConfig::load_from_file(&path)?;
        assert_eq!(config.fingerprint(), CodestyleConfig::default().fingerprint());

        let missing = CodestyleConfig::load_from_file(temp_dir.path().join("missing.yaml"));
        assert!(matches!(missing, Err(CodestyleError::Configuration { .. })));
        Ok(())
    }

    #[test]
    fn test_rejects_invalid_content() {
        assert!(CodestyleConfig::load_from_str("version: \"2.0\"\n").is_err());
        assert!(CodestyleConfig::load_from_str(
            "version: \"1.0\"\ndependencies:\n  evaluate_group_ids: ['(broken']\n"
        )
        .is_err());
        assert!(CodestyleConfig::load_from_str(
            "version: \"1.0\"\npermitted_types:\n  types: [NOT_A_TYPE]\n"
        )
        .is_err());
        assert!(CodestyleConfig::load_from_str(
            "version: \"1.0\"\npermitted_types:\n  types: [API, API]\n"
        )
        .is_err());
    }

    #[test]
    fn test_builder_and_fingerprint() -> CodestyleResult<()> {
        let config = ConfigBuilder::new()
            .permit(Archetype::Api)
            .evaluate_group_ids([r"^se\.acme\..*"])
            .severity(Severity::Warning)
            .build()?;

        assert_eq!(config.permitted_types.to_policy()?.permitted().len(), 1);
        assert_eq!(config.packaging.severity, Severity::Warning);
        assert_ne!(config.fingerprint(), CodestyleConfig::default().fingerprint());
        assert_eq!(config.fingerprint(), config.clone().fingerprint());
        assert!(config.to_json()?.contains("\"evaluate_group_ids\""));
        Ok(())
    }
}
