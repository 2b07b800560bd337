//! Project descriptor loading
//!
//! Architecture: Anti-Corruption Layer - descriptor files are the boundary to the host build
//! - A descriptor file holds one project, or a reactor as a `projects:` list
//! - YAML and JSON are accepted, chosen by file extension
//! - Directory trees are walked for descriptor files; build output is skipped

use crate::domain::project::ProjectDescriptor;
use crate::domain::violations::{CodestyleError, CodestyleResult};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// File names recognised as project descriptors when walking a directory
pub const DESCRIPTOR_FILE_NAMES: [&str; 3] = [
    "codestyle-project.yaml",
    "codestyle-project.yml",
    "codestyle-project.json",
];

/// Directories never descended into
const SKIPPED_DIRECTORIES: [&str; 3] = ["target", "node_modules", "build"];

/// Serialization format of a descriptor file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorFormat {
    Yaml,
    Json,
}

impl DescriptorFormat {
    /// Format implied by a file extension; anything but `.json` is read as YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(extension) if extension.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// A reactor document: every project of a build in one file
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ReactorDocument {
    projects: Vec<ProjectDescriptor>,
}

fn descriptor_error(origin: &str, error: impl fmt::Display) -> CodestyleError {
    CodestyleError::descriptor(origin, error.to_string())
}

/// Parse descriptor content; `origin` names the source in errors.
///
/// A document with a top-level `projects` key is a reactor, anything else a single project.
pub fn load_str(content: &str, format: DescriptorFormat, origin: &str) -> CodestyleResult<Vec<ProjectDescriptor>> {
    let projects = match format {
        DescriptorFormat::Yaml => {
            let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| descriptor_error(origin, e))?;
            if value.get("projects").is_some() {
                serde_yaml::from_value::<ReactorDocument>(value).map(|document| document.projects)
            } else {
                serde_yaml::from_value::<ProjectDescriptor>(value).map(|project| vec![project])
            }
            .map_err(|e| descriptor_error(origin, e))?
        }
        DescriptorFormat::Json => {
            let value: serde_json::Value = serde_json::from_str(content).map_err(|e| descriptor_error(origin, e))?;
            if value.get("projects").is_some() {
                serde_json::from_value::<ReactorDocument>(value).map(|document| document.projects)
            } else {
                serde_json::from_value::<ProjectDescriptor>(value).map(|project| vec![project])
            }
            .map_err(|e| descriptor_error(origin, e))?
        }
    };

    tracing::debug!("Loaded {} project descriptors from {}", projects.len(), origin);
    Ok(projects)
}

/// Load every project described by one file
pub fn load_file<P: AsRef<Path>>(path: P) -> CodestyleResult<Vec<ProjectDescriptor>> {
    let path = path.as_ref();
    let origin = path.display().to_string();

    let content = fs::read_to_string(path)
        .map_err(|e| CodestyleError::descriptor(&origin, format!("Failed to read file: {e}")))?;

    load_str(&content, DescriptorFormat::from_path(path), &origin)
}

/// Find descriptor files below `root`, in path order
pub fn discover<P: AsRef<Path>>(root: P) -> CodestyleResult<Vec<PathBuf>> {
    let mut found = Vec::new();

    let walker = WalkDir::new(root.as_ref())
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_directory(entry));

    for entry in walker {
        let entry = entry.map_err(|e| {
            CodestyleError::descriptor(root.as_ref().display().to_string(), format!("Failed to walk directory: {e}"))
        })?;

        if entry.file_type().is_file() && is_descriptor_file(entry.path()) {
            found.push(entry.into_path());
        }
    }

    Ok(found)
}

/// Load a descriptor file, or every descriptor file below a directory
pub fn load_path<P: AsRef<Path>>(path: P) -> CodestyleResult<Vec<ProjectDescriptor>> {
    let path = path.as_ref();

    if path.is_file() {
        return load_file(path);
    }
    if !path.is_dir() {
        return Err(CodestyleError::descriptor(
            path.display().to_string(),
            "No such file or directory",
        ));
    }

    let mut projects = Vec::new();
    for file in discover(path)? {
        projects.extend(load_file(&file)?);
    }

    if projects.is_empty() {
        tracing::warn!(
            "No project descriptors ({}) found below {}",
            DESCRIPTOR_FILE_NAMES.join(", "),
            path.display()
        );
    }

    Ok(projects)
}

fn is_descriptor_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| DESCRIPTOR_FILE_NAMES.contains(&name))
}

fn is_skipped_directory(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.') || SKIPPED_DIRECTORIES.contains(&name))
}
