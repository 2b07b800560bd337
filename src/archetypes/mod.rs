//! Project type registry: the closed taxonomy of project archetypes
//!
//! Architecture: Repository - the registry owns the ordered set of naming rules
//! - Each Archetype carries a group id, artifact id and packaging pattern
//! - A null-acceptance flag and a structural check complete each rule
//! - Registries are explicit values handed to the engines; subsets are cheap to build

pub mod structure;

use crate::domain::project::{ArtifactCoordinate, ProjectDescriptor};
use crate::domain::violations::{CodestyleError, CodestyleResult};
use crate::patterns::{NamingPattern, PatternList};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use structure::StructureCheck;

/// Known project archetypes, in registry order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Archetype {
    /// Aggregator of type pom. May contain nothing except module definitions.
    Reactor,
    /// Parent pom defining dependencies and/or build life cycles. No modules.
    Parent,
    /// Pom defining DependencyManagement entries only.
    BillOfMaterials,
    /// Pom defining assemblies and/or aggregation projects. No modules.
    Assembly,
    /// Publicly available aspect implementations.
    Aspect,
    /// Entity definitions.
    Model,
    /// JEE-deployable artifacts. May inject implementation projects.
    JeeApplication,
    /// Runnable (micro)service. May inject implementation projects.
    Microservice,
    /// Runnable standalone application. May inject implementation projects.
    StandaloneApplication,
    /// Runnable example code with documentation. No dependency rules.
    Example,
    /// In-process JVM agent. Considered an application entry point.
    JavaAgent,
    /// Service interaction, abstract implementations and exceptions.
    Api,
    /// Service provider interfaces on top of an API project.
    Spi,
    /// Implementation of an API or SPI project.
    Implementation,
    /// Libraries facilitating tests within other projects. No dependency rules.
    Test,
    /// Automated tests spanning several projects. No dependency rules.
    IntegrationTest,
    /// Build definition helpers such as checkstyle configurations or custom rules.
    Codestyle,
    /// A build tool plugin.
    Plugin,
    /// Proof of concept implementations. No dependency rules.
    ProofOfConcept,
}

impl Archetype {
    /// All archetypes, in registry order
    pub const ALL: [Archetype; 19] = [
        Self::Reactor,
        Self::Parent,
        Self::BillOfMaterials,
        Self::Assembly,
        Self::Aspect,
        Self::Model,
        Self::JeeApplication,
        Self::Microservice,
        Self::StandaloneApplication,
        Self::Example,
        Self::JavaAgent,
        Self::Api,
        Self::Spi,
        Self::Implementation,
        Self::Test,
        Self::IntegrationTest,
        Self::Codestyle,
        Self::Plugin,
        Self::ProofOfConcept,
    ];

    /// Identifier of this archetype
    pub fn name(self) -> &'static str {
        match self {
            Self::Reactor => "REACTOR",
            Self::Parent => "PARENT",
            Self::BillOfMaterials => "BILL_OF_MATERIALS",
            Self::Assembly => "ASSEMBLY",
            Self::Aspect => "ASPECT",
            Self::Model => "MODEL",
            Self::JeeApplication => "JEE_APPLICATION",
            Self::Microservice => "MICROSERVICE",
            Self::StandaloneApplication => "STANDALONE_APPLICATION",
            Self::Example => "EXAMPLE",
            Self::JavaAgent => "JAVA_AGENT",
            Self::Api => "API",
            Self::Spi => "SPI",
            Self::Implementation => "IMPLEMENTATION",
            Self::Test => "TEST",
            Self::IntegrationTest => "INTEGRATION_TEST",
            Self::Codestyle => "CODESTYLE",
            Self::Plugin => "PLUGIN",
            Self::ProofOfConcept => "PROOF_OF_CONCEPT",
        }
    }

    /// Built-in naming rule definition: artifact id, group id, packaging, accept nulls, structure
    fn definition(
        self,
    ) -> (
        Option<&'static str>,
        Option<&'static str>,
        Option<&'static str>,
        bool,
        StructureCheck,
    ) {
        use StructureCheck as S;

        match self {
            Self::Reactor => (Some(".*-reactor$"), None, Some("pom"), false, S::Reactor),
            Self::Parent => (Some(".*-parent$"), None, Some("pom"), false, S::NoModules),
            Self::BillOfMaterials => (Some(".*-bom$"), None, Some("pom"), false, S::BillOfMaterials),
            Self::Assembly => (Some(".*-assembly$"), None, Some("pom"), true, S::NoModules),
            Self::Aspect => (Some(".*-aspect$"), Some(r".*\.aspect$"), Some("bundle|jar"), false, S::None),
            Self::Model => (Some(".*-model$"), Some(r".*\.model$"), Some("bundle|jar"), true, S::None),
            Self::JeeApplication => (None, None, Some("war|ear|ejb"), false, S::None),
            Self::Microservice => (
                Some(".*-service$"),
                Some(r".*\.service$"),
                Some("bundle|jar"),
                false,
                S::None,
            ),
            Self::StandaloneApplication => (
                Some(".*-application$"),
                Some(r".*\.application$"),
                Some("bundle|jar"),
                false,
                S::None,
            ),
            Self::Example => (Some(".*-example$"), Some(r".*\.example$"), None, true, S::None),
            Self::JavaAgent => (Some(".*-agent$"), Some(r".*\.agent$"), Some("bundle|jar"), true, S::None),
            Self::Api => (Some(".*-api$"), Some(r".*\.api$"), Some("bundle|jar"), false, S::None),
            Self::Spi => (Some(r".*-spi-\w*$"), Some(r".*\.spi\.\w*$"), Some("bundle|jar"), false, S::None),
            Self::Implementation => (
                Some(r".*-impl-\w*$"),
                Some(r".*\.impl\.\w*$"),
                Some("bundle|jar"),
                false,
                S::None,
            ),
            Self::Test => (Some(".*-test$"), Some(r".*\.test\.\w*$"), None, true, S::None),
            Self::IntegrationTest => (Some(".*-it$"), Some(r".*\.it\.\w*$"), None, true, S::None),
            Self::Codestyle => (
                Some(".*-codestyle$"),
                Some(r".*\.codestyle$"),
                Some("jar|bundle"),
                true,
                S::None,
            ),
            Self::Plugin => (Some(".*-maven-plugin$"), None, Some("maven-plugin"), true, S::None),
            Self::ProofOfConcept => (Some(".*-poc$"), Some(r".*\.poc\.\w*$"), None, true, S::None),
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Archetype {
    type Err = CodestyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| CodestyleError::config(format!("Unknown project type '{s}'")))
    }
}

/// One entry of the archetype taxonomy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTypeRule {
    archetype: Archetype,
    artifact_id: NamingPattern,
    group_id: NamingPattern,
    packaging: NamingPattern,
    accept_null_values: bool,
    structure: StructureCheck,
}

impl ProjectTypeRule {
    /// Build a rule from explicit patterns
    pub fn new(
        archetype: Archetype,
        artifact_id_pattern: Option<&str>,
        group_id_pattern: Option<&str>,
        packaging_pattern: Option<&str>,
        accept_null_values: bool,
        structure: StructureCheck,
    ) -> CodestyleResult<Self> {
        Ok(Self {
            archetype,
            artifact_id: NamingPattern::new(artifact_id_pattern)?,
            group_id: NamingPattern::new(group_id_pattern)?,
            packaging: NamingPattern::new(packaging_pattern)?,
            accept_null_values,
            structure,
        })
    }

    /// The built-in rule for an archetype
    pub fn builtin(archetype: Archetype) -> CodestyleResult<Self> {
        let (artifact_id, group_id, packaging, accept_null_values, structure) = archetype.definition();
        Self::new(archetype, artifact_id, group_id, packaging, accept_null_values, structure)
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn name(&self) -> &'static str {
        self.archetype.name()
    }

    pub fn artifact_id_pattern(&self) -> &NamingPattern {
        &self.artifact_id
    }

    pub fn group_id_pattern(&self) -> &NamingPattern {
        &self.group_id
    }

    pub fn packaging_pattern(&self) -> &NamingPattern {
        &self.packaging
    }

    pub fn accepts_null_values(&self) -> bool {
        self.accept_null_values
    }

    pub fn structure(&self) -> StructureCheck {
        self.structure
    }

    /// `None` when the artifact id complies, else the reason
    pub fn artifact_id_non_compliance(&self, artifact_id: Option<&str>) -> Option<String> {
        self.facet_non_compliance("ArtifactId", &self.artifact_id, artifact_id)
    }

    /// `None` when the group id complies, else the reason
    pub fn group_id_non_compliance(&self, group_id: Option<&str>) -> Option<String> {
        self.facet_non_compliance("GroupId", &self.group_id, group_id)
    }

    /// `None` when the packaging complies, else the reason
    pub fn packaging_non_compliance(&self, packaging: Option<&str>) -> Option<String> {
        self.facet_non_compliance("Packaging", &self.packaging, packaging)
    }

    /// `None` when the module/dependency structure complies, else the reason
    pub fn structural_non_compliance(
        &self,
        project: &ProjectDescriptor,
        ignore_group_ids: &PatternList,
    ) -> Option<String> {
        self.structure.non_compliance(self.name(), project, ignore_group_ids)
    }

    /// Whether group id, artifact id and packaging of the coordinate all comply
    pub fn matches_coordinate(&self, coordinate: &ArtifactCoordinate) -> bool {
        self.artifact_id_non_compliance(coordinate.artifact_id.as_deref()).is_none()
            && self.group_id_non_compliance(coordinate.group_id.as_deref()).is_none()
            && self.packaging_non_compliance(coordinate.packaging.as_deref()).is_none()
    }

    fn facet_non_compliance(
        &self,
        facet: &str,
        pattern: &NamingPattern,
        value: Option<&str>,
    ) -> Option<String> {
        if pattern.matches(value, self.accept_null_values) {
            return None;
        }

        Some(match value {
            None => format!(
                "{facet} not provided, but {} requires a value matching [{pattern}]",
                self.name()
            ),
            Some(value) => format!("[{value}] does not match required pattern [{pattern}]"),
        })
    }
}

impl fmt::Display for ProjectTypeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ProjectType: {}] - GroupIdRegex: {}, ArtifactIdRegex: {}, PackagingRegex: {}",
            self.name(),
            self.group_id,
            self.artifact_id,
            self.packaging
        )
    }
}

lazy_static! {
    static ref COMMON_RULES: Vec<ProjectTypeRule> = Archetype::ALL
        .iter()
        .map(|archetype| ProjectTypeRule::builtin(*archetype).expect("built-in patterns compile"))
        .collect();
}

/// Ordered, immutable set of project type rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchetypeRegistry {
    rules: Vec<ProjectTypeRule>,
}

impl ArchetypeRegistry {
    /// Registry holding the given rules, in the given order
    pub fn new(rules: Vec<ProjectTypeRule>) -> Self {
        Self { rules }
    }

    /// The full built-in taxonomy
    pub fn common() -> Self {
        Self::new(COMMON_RULES.clone())
    }

    /// Built-in rules for the given archetypes only, kept in registry order
    pub fn with_archetypes(archetypes: &[Archetype]) -> Self {
        Self::new(
            COMMON_RULES
                .iter()
                .filter(|rule| archetypes.contains(&rule.archetype()))
                .cloned()
                .collect(),
        )
    }

    pub fn rules(&self) -> &[ProjectTypeRule] {
        &self.rules
    }

    pub fn rule(&self, archetype: Archetype) -> Option<&ProjectTypeRule> {
        self.rules.iter().find(|rule| rule.archetype() == archetype)
    }

    pub fn archetypes(&self) -> impl Iterator<Item = Archetype> + '_ {
        self.rules.iter().map(ProjectTypeRule::archetype)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for ArchetypeRegistry {
    fn default() -> Self {
        Self::common()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn rule(archetype: Archetype) -> ProjectTypeRule {
        ProjectTypeRule::builtin(archetype).unwrap()
    }

    #[test]
    fn test_common_registry_order() {
        let registry = ArchetypeRegistry::common();

        assert_eq!(registry.len(), 19);
        assert_eq!(registry.rules()[0].archetype(), Archetype::Reactor);
        assert_eq!(registry.rules()[2].archetype(), Archetype::BillOfMaterials);
        assert_eq!(registry.rules()[18].archetype(), Archetype::ProofOfConcept);
        assert_eq!(registry.archetypes().collect::<Vec<_>>(), Archetype::ALL.to_vec());
    }

    #[test]
    fn test_subset_keeps_registry_order() {
        let registry = ArchetypeRegistry::with_archetypes(&[Archetype::Api, Archetype::Reactor]);

        assert_eq!(
            registry.archetypes().collect::<Vec<_>>(),
            vec![Archetype::Reactor, Archetype::Api]
        );
        assert!(registry.rule(Archetype::Model).is_none());
    }

    #[rstest]
    #[case(Archetype::Model, "test-foo-model", true)]
    #[case(Archetype::Model, "model-test", false)]
    #[case(Archetype::Model, "foo-model-test", false)]
    #[case(Archetype::Reactor, "test-foo-reactor", true)]
    #[case(Archetype::Reactor, "foo-reactor-test", false)]
    #[case(Archetype::Assembly, "test-foo-assembly", true)]
    #[case(Archetype::Assembly, "assembly-test", false)]
    #[case(Archetype::Plugin, "test-foo-maven-plugin", true)]
    #[case(Archetype::Plugin, "foo-plugin-test", false)]
    #[case(Archetype::Api, "test-foo-api", true)]
    #[case(Archetype::Api, "test-api-foo", false)]
    #[case(Archetype::Spi, "test-spi-foo", true)]
    #[case(Archetype::Spi, "test-foo-spi", false)]
    #[case(Archetype::Implementation, "test-impl-foo", true)]
    #[case(Archetype::Implementation, "test-foo-impl", false)]
    #[case(Archetype::Test, "nazgul-core-osgi-test", true)]
    #[case(Archetype::Test, "test-impl-foo", false)]
    #[case(Archetype::IntegrationTest, "foo-it", true)]
    #[case(Archetype::IntegrationTest, "test-it-foo", false)]
    #[case(Archetype::ProofOfConcept, "foo-poc", true)]
    #[case(Archetype::ProofOfConcept, "test-poc-foo", false)]
    #[case(Archetype::Codestyle, "foo-codestyle", true)]
    #[case(Archetype::Codestyle, "codestyle-foo", false)]
    #[case(Archetype::Example, "codestyle-foo-example", true)]
    #[case(Archetype::Example, "example-codestyle", false)]
    #[case(Archetype::JeeApplication, "anything-at-all", true)]
    fn test_artifact_id_patterns(#[case] archetype: Archetype, #[case] artifact_id: &str, #[case] compliant: bool) {
        let result = rule(archetype).artifact_id_non_compliance(Some(artifact_id));
        assert_eq!(result.is_none(), compliant, "{archetype} / {artifact_id}: {result:?}");
    }

    #[rstest]
    #[case(Archetype::Model, "test.foo.model", true)]
    #[case(Archetype::Model, "foo.model.test", false)]
    #[case(Archetype::Reactor, "reactor.test", true)]
    #[case(Archetype::Api, "test.api", true)]
    #[case(Archetype::Api, "api.test", false)]
    #[case(Archetype::Spi, "test.spi.foo", true)]
    #[case(Archetype::Spi, "test.spi", false)]
    #[case(Archetype::Implementation, "test.impl.foo", true)]
    #[case(Archetype::Implementation, "test.impl", false)]
    #[case(Archetype::Test, "some.test.foo", true)]
    #[case(Archetype::Test, "se.jguru.nazgul.test.osgi", true)]
    #[case(Archetype::Test, "test.foo", false)]
    #[case(Archetype::IntegrationTest, "some.it.foo", true)]
    #[case(Archetype::IntegrationTest, "impl.it", false)]
    #[case(Archetype::ProofOfConcept, "some.poc.foo", true)]
    #[case(Archetype::ProofOfConcept, "impl.poc", false)]
    #[case(Archetype::Codestyle, "foo.codestyle", true)]
    #[case(Archetype::Codestyle, "codestyle.foo", false)]
    #[case(Archetype::Example, "codestyle.foo.example", true)]
    #[case(Archetype::Example, "foo.example.codestyle", false)]
    fn test_group_id_patterns(#[case] archetype: Archetype, #[case] group_id: &str, #[case] compliant: bool) {
        let result = rule(archetype).group_id_non_compliance(Some(group_id));
        assert_eq!(result.is_none(), compliant, "{archetype} / {group_id}: {result:?}");
    }

    #[rstest]
    #[case(Archetype::Model, "jar", true)]
    #[case(Archetype::Model, "bundle", true)]
    #[case(Archetype::Model, "pom", false)]
    #[case(Archetype::Model, "war", false)]
    #[case(Archetype::Reactor, "pom", true)]
    #[case(Archetype::Reactor, "jar", false)]
    #[case(Archetype::Plugin, "maven-plugin", true)]
    #[case(Archetype::Plugin, "bundle", false)]
    #[case(Archetype::JeeApplication, "ejb", true)]
    #[case(Archetype::JeeApplication, "jar", false)]
    #[case(Archetype::Test, "war", true)]
    #[case(Archetype::Codestyle, "JAR", true)]
    fn test_packaging_patterns(#[case] archetype: Archetype, #[case] packaging: &str, #[case] compliant: bool) {
        let result = rule(archetype).packaging_non_compliance(Some(packaging));
        assert_eq!(result.is_none(), compliant, "{archetype} / {packaging}: {result:?}");
    }

    #[test]
    fn test_null_acceptance() {
        for archetype in Archetype::ALL {
            let rule = rule(archetype);
            let accepted = rule.artifact_id_non_compliance(None).is_none();
            assert_eq!(accepted, rule.accepts_null_values(), "{archetype}");
        }

        assert!(rule(Archetype::Api).artifact_id_non_compliance(None).is_some());
        assert!(rule(Archetype::Api).packaging_non_compliance(None).is_some());
        assert!(rule(Archetype::Model).group_id_non_compliance(None).is_none());
        assert!(rule(Archetype::Assembly).packaging_non_compliance(None).is_none());
    }

    #[test]
    fn test_non_compliance_message_names_pattern() {
        let message = rule(Archetype::Api).artifact_id_non_compliance(Some("foo-impl")).unwrap();
        assert_eq!(message, "[foo-impl] does not match required pattern [.*-api$]");

        let message = rule(Archetype::Api).group_id_non_compliance(None).unwrap();
        assert!(message.contains("GroupId not provided"));
    }

    #[test]
    fn test_structural_delegation() {
        let parent = ProjectDescriptor::new("se.acme", "acme-parent", "pom").with_module("m");

        assert!(rule(Archetype::Parent)
            .structural_non_compliance(&parent, &PatternList::empty())
            .is_some());
        assert!(rule(Archetype::Api)
            .structural_non_compliance(&parent, &PatternList::empty())
            .is_none());
    }

    #[test]
    fn test_archetype_parsing() {
        assert_eq!("BILL_OF_MATERIALS".parse::<Archetype>().unwrap(), Archetype::BillOfMaterials);
        assert_eq!("proof-of-concept".parse::<Archetype>().unwrap(), Archetype::ProofOfConcept);
        assert!("NOT_A_TYPE".parse::<Archetype>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let yaml = serde_yaml::to_string(&vec![Archetype::JeeApplication]).unwrap();
        assert!(yaml.contains("JEE_APPLICATION"));
    }
}
