//! Project classification against the archetype registry
//!
//! Architecture: Domain Service - maps a project onto exactly one archetype
//! - Candidates are the rules whose group id, artifact id and packaging patterns accept
//! - Structural checks then narrow the candidates to matches
//! - Zero or several matches are errors, reported with the closest archetypes

pub mod compliance;

use crate::archetypes::{Archetype, ArchetypeRegistry, ProjectTypeRule};
use crate::domain::project::{ArtifactCoordinate, ProjectDescriptor};
use crate::patterns::PatternList;
use thiserror::Error;
use tracing::{debug, warn};

pub use compliance::{closest_matches, evaluate, ComplianceStatus};

/// Why a project or artifact could not be mapped onto exactly one archetype
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("Incorrect {subject} type definition for [{coordinate}]: Not matching any project types.{}", render_closest(.closest))]
    NoMatch {
        subject: &'static str,
        coordinate: String,
        /// Closest archetypes with their compliance status, lowest distance first
        closest: Vec<(Archetype, ComplianceStatus)>,
    },

    #[error("Incorrect {subject} type definition for [{coordinate}]: Matching several project types ({}).", render_names(.matches))]
    Ambiguous {
        subject: &'static str,
        coordinate: String,
        matches: Vec<Archetype>,
    },

    #[error("Incorrect {subject} type definition for [{coordinate}]: {message}")]
    Structural {
        subject: &'static str,
        coordinate: String,
        archetype: Archetype,
        message: String,
    },
}

impl ClassificationError {
    pub fn coordinate(&self) -> &str {
        match self {
            Self::NoMatch { coordinate, .. }
            | Self::Ambiguous { coordinate, .. }
            | Self::Structural { coordinate, .. } => coordinate,
        }
    }
}

const PROJECT_SUBJECT: &str = "project";
const ARTIFACT_SUBJECT: &str = "Artifact";

fn render_names(archetypes: &[Archetype]) -> String {
    archetypes
        .iter()
        .map(|a| a.name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_closest(closest: &[(Archetype, ComplianceStatus)]) -> String {
    closest
        .iter()
        .map(|(archetype, status)| format!("\n [{archetype}]: {status}"))
        .collect()
}

/// Classifies projects and artifacts against a registry
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'r> {
    registry: &'r ArchetypeRegistry,
}

impl<'r> Classifier<'r> {
    pub fn new(registry: &'r ArchetypeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r ArchetypeRegistry {
        self.registry
    }

    /// Find the single archetype matching the project
    pub fn classify(&self, project: &ProjectDescriptor) -> Result<Archetype, ClassificationError> {
        self.classify_with(project, &PatternList::empty())
    }

    /// Same as [`Classifier::classify`], with `ignore_group_ids` applied to the structural checks
    pub fn classify_with(
        &self,
        project: &ProjectDescriptor,
        ignore_group_ids: &PatternList,
    ) -> Result<Archetype, ClassificationError> {
        let coordinate = project.gav();
        let naming = ArtifactCoordinate::from(project);

        let candidates: Vec<&ProjectTypeRule> = self
            .registry
            .rules()
            .iter()
            .filter(|rule| rule.matches_coordinate(&naming))
            .collect();

        let mut structural_failures = Vec::new();
        let mut matches = Vec::new();
        for rule in &candidates {
            match rule.structural_non_compliance(project, ignore_group_ids) {
                None => matches.push(rule.archetype()),
                Some(message) => structural_failures.push((rule.archetype(), message)),
            }
        }

        match matches.as_slice() {
            [archetype] => {
                debug!("Classified [{}] as {}", coordinate, archetype);
                Ok(*archetype)
            }
            [] if candidates.len() == 1 => {
                let (archetype, message) = structural_failures.remove(0);
                warn!("[{}] matches {} by name but not by structure", coordinate, archetype);
                Err(ClassificationError::Structural {
                    subject: PROJECT_SUBJECT,
                    coordinate,
                    archetype,
                    message,
                })
            }
            [] => {
                let closest = closest_matches(project, self.registry, Some(ignore_group_ids))
                    .into_iter()
                    .map(|(rule, status)| (rule.archetype(), status))
                    .collect();
                warn!("[{}] matches no project type", coordinate);
                Err(ClassificationError::NoMatch {
                    subject: PROJECT_SUBJECT,
                    coordinate,
                    closest,
                })
            }
            _ => {
                warn!("[{}] matches several project types: {:?}", coordinate, matches);
                Err(ClassificationError::Ambiguous {
                    subject: PROJECT_SUBJECT,
                    coordinate,
                    matches: matches.to_vec(),
                })
            }
        }
    }

    /// Classify a resolved dependency. Only naming patterns apply; the type stands in for packaging.
    pub fn classify_artifact(&self, artifact: &ArtifactCoordinate) -> Result<Archetype, ClassificationError> {
        let matches: Vec<Archetype> = self
            .registry
            .rules()
            .iter()
            .filter(|rule| rule.matches_coordinate(artifact))
            .map(ProjectTypeRule::archetype)
            .collect();

        match matches.as_slice() {
            [archetype] => {
                debug!("Classified artifact [{}] as {}", artifact, archetype);
                Ok(*archetype)
            }
            [] => {
                let project = ProjectDescriptor {
                    group_id: artifact.group_id.clone(),
                    artifact_id: artifact.artifact_id.clone(),
                    version: artifact.version.clone(),
                    packaging: artifact.packaging.clone(),
                    ..Default::default()
                };
                let closest = closest_matches(&project, self.registry, None)
                    .into_iter()
                    .map(|(rule, status)| (rule.archetype(), status))
                    .collect();

                Err(ClassificationError::NoMatch {
                    subject: ARTIFACT_SUBJECT,
                    coordinate: artifact.gav(),
                    closest,
                })
            }
            _ => Err(ClassificationError::Ambiguous {
                subject: ARTIFACT_SUBJECT,
                coordinate: artifact.gav(),
                matches: matches.to_vec(),
            }),
        }
    }
}
