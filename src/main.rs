//! Codestyle Guardian CLI - Command-line interface for reactor structure enforcement
//!
//! CDD Principle: Application Layer - CLI coordinates user interactions with domain services
//! - Translates user commands to classification and enforcement operations
//! - Handles external concerns like descriptor files, process exit codes, and terminal output
//! - Provides clean separation between user interface and the rule engines

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use codestyle_guardian::{
    loader, Archetype, ArchetypeRegistry, ArtifactCoordinate, Classifier, CodestyleConfig, CodestyleValidator,
    EnforcementOptions, OutputFormat, ProjectDescriptor, ReportFormatter, ReportOptions, Severity,
    ValidationOptions,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// Configuration files looked up in the working directory when `--config` is absent
const DEFAULT_CONFIGS: [&str; 3] = [
    "codestyle_guardian.yaml",
    "codestyle_guardian.yml",
    ".codestyle_guardian.yaml",
];

/// Codestyle Guardian - project type and reactor structure enforcement
#[derive(Parser)]
#[command(name = "codestyle-guardian")]
#[command(version = "0.1.0")]
#[command(about = "Classifies reactor projects into project types and enforces dependency and packaging rules")]
#[command(
    long_about = "Codestyle Guardian classifies every project of a multi-module build into one project type by its naming coordinate, checks the structure each type demands, and enforces which project types may depend on which. Designed for CI/CD integration."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check project descriptors for rule violations
    Check {
        /// Descriptor files or directories to scan
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormatArg,

        /// Minimum severity level to report
        #[arg(short, long, value_enum)]
        severity: Option<SeverityArg>,

        /// Maximum number of violations to report
        #[arg(long)]
        max_violations: Option<usize>,

        /// One line per violation instead of failure blocks
        #[arg(long)]
        compact: bool,

        /// Disable parallel processing
        #[arg(long)]
        no_parallel: bool,

        /// Stop after the first project with blocking violations
        #[arg(long)]
        fail_fast: bool,
    },

    /// Classify a naming coordinate or the projects of a descriptor file
    Classify {
        /// Group id of the project
        group_id: Option<String>,

        /// Artifact id of the project
        artifact_id: Option<String>,

        /// Packaging of the project
        packaging: Option<String>,

        /// Classify every project of this descriptor file instead
        #[arg(short, long, conflicts_with_all = ["group_id", "artifact_id", "packaging"])]
        descriptor: Option<PathBuf>,
    },

    /// List the known project types
    Types,

    /// Explain the naming and structure requirements of a project type
    Explain {
        /// Project type name, e.g. API or bill-of-materials
        project_type: String,
    },

    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config_file: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, ValueEnum, PartialEq)]
enum OutputFormatArg {
    Human,
    Json,
    Junit,
    Github,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Junit => OutputFormat::Junit,
            OutputFormatArg::Github => OutputFormat::GitHub,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum SeverityArg {
    Info,
    Warning,
    Error,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Info => Severity::Info,
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Error => Severity::Error,
        }
    }
}

/// Arguments of the `check` command
struct CheckArgs {
    paths: Vec<PathBuf>,
    format: OutputFormatArg,
    severity: Option<SeverityArg>,
    max_violations: Option<usize>,
    compact: bool,
    no_parallel: bool,
    fail_fast: bool,
    use_colors: bool,
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run_command(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

fn run_command(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Check {
            paths,
            format,
            severity,
            max_violations,
            compact,
            no_parallel,
            fail_fast,
        } => run_check(
            cli.config.as_deref(),
            CheckArgs {
                paths,
                format,
                severity,
                max_violations,
                compact,
                no_parallel,
                fail_fast,
                use_colors: !cli.no_color,
            },
        ),
        Commands::Classify {
            group_id,
            artifact_id,
            packaging,
            descriptor,
        } => match descriptor {
            Some(path) => run_classify_descriptor(&path),
            None => run_classify(group_id, artifact_id, packaging),
        },
        Commands::Types => run_list_types(),
        Commands::Explain { project_type } => run_explain(&project_type),
        Commands::ValidateConfig { config_file } => run_validate_config(config_file.or(cli.config)),
    }
}

/// Load the configuration named on the command line, a default file, or the built-in defaults
fn load_config(config_path: Option<&Path>) -> Result<CodestyleConfig> {
    if let Some(path) = config_path {
        return CodestyleConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()));
    }

    for config_name in DEFAULT_CONFIGS {
        if Path::new(config_name).exists() {
            tracing::debug!("Using configuration file {}", config_name);
            return CodestyleConfig::load_from_file(config_name)
                .with_context(|| format!("Failed to load configuration from {config_name}"));
        }
    }

    Ok(CodestyleConfig::default())
}

fn run_check(config_path: Option<&Path>, args: CheckArgs) -> Result<i32> {
    let config = load_config(config_path)?;

    let options = ValidationOptions {
        output_format: args.format.into(),
        report_options: ReportOptions {
            use_colors: args.use_colors,
            show_details: !args.compact,
            max_violations: args.max_violations,
            min_severity: args.severity.map(Into::into),
            ..Default::default()
        },
        enforcement_options: EnforcementOptions {
            parallel: !args.no_parallel,
            fail_fast: args.fail_fast,
            ..Default::default()
        },
    };

    let validator = CodestyleValidator::new_with_config(config)
        .context("Invalid configuration")?
        .with_report_formatter(ReportFormatter::new(options.report_options.clone()));

    // Use current directory if no paths specified
    let paths = if args.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        args.paths
    };

    // All paths form one reactor
    let mut projects = Vec::new();
    for path in &paths {
        let loaded =
            loader::load_path(path).with_context(|| format!("Failed to load descriptors from {}", path.display()))?;
        projects.extend(loaded);
    }

    if projects.is_empty() {
        bail!("No project descriptors found");
    }

    let report = validator.validate_reactor(&projects, &options.enforcement_options);

    let formatted = validator.format_report(&report, options.output_format)?;
    println!("{formatted}");

    // Return appropriate exit code
    if report.has_errors() {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn run_classify(group_id: Option<String>, artifact_id: Option<String>, packaging: Option<String>) -> Result<i32> {
    let registry = ArchetypeRegistry::common();
    let coordinate = ArtifactCoordinate {
        group_id,
        artifact_id,
        version: None,
        packaging,
    };

    match Classifier::new(&registry).classify_artifact(&coordinate) {
        Ok(archetype) => {
            println!("✅ [{coordinate}] is a {archetype} project");
            Ok(0)
        }
        Err(e) => {
            eprintln!("❌ {e}");
            Ok(1)
        }
    }
}

fn run_classify_descriptor(path: &Path) -> Result<i32> {
    let projects: Vec<ProjectDescriptor> =
        loader::load_file(path).with_context(|| format!("Failed to load descriptor {}", path.display()))?;

    let registry = ArchetypeRegistry::common();
    let classifier = Classifier::new(&registry);
    let mut failures = 0;

    for project in &projects {
        match classifier.classify(project) {
            Ok(archetype) => println!("✅ {} -> {}", project.coordinate(), archetype),
            Err(e) => {
                failures += 1;
                println!("❌ {} -> {}", project.coordinate(), e);
            }
        }
    }

    println!("\n📊 Classified {} of {} projects", projects.len() - failures, projects.len());

    Ok(if failures == 0 { 0 } else { 1 })
}

fn run_list_types() -> Result<i32> {
    let registry = ArchetypeRegistry::common();

    println!("📋 Known Project Types\n");

    for rule in registry.rules() {
        println!(
            "  🔍 {:<24} artifactId [{}]  groupId [{}]  packaging [{}]",
            rule.name(),
            rule.artifact_id_pattern(),
            rule.group_id_pattern(),
            rule.packaging_pattern()
        );
    }

    Ok(0)
}

fn run_explain(project_type: &str) -> Result<i32> {
    let archetype: Archetype = match project_type.parse() {
        Ok(archetype) => archetype,
        Err(e) => {
            eprintln!("❌ {e}");
            println!();
            println!("Available project types:");
            for archetype in Archetype::ALL {
                println!("    - {archetype}");
            }
            return Ok(1);
        }
    };

    let registry = ArchetypeRegistry::common();
    let rule = registry
        .rule(archetype)
        .with_context(|| format!("Project type {archetype} missing from the registry"))?;

    println!("📖 Project type: {}", rule.name());
    println!();
    println!("🔎 Naming patterns:");
    println!("   artifactId: {}", rule.artifact_id_pattern());
    println!("   groupId:    {}", rule.group_id_pattern());
    println!("   packaging:  {}", rule.packaging_pattern());
    println!(
        "   Missing values {}",
        if rule.accepts_null_values() { "are accepted" } else { "are rejected" }
    );
    println!();
    println!("🏗️  Structure: {}", rule.structure().describe());

    Ok(0)
}

fn run_validate_config(config_path: Option<PathBuf>) -> Result<i32> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIGS[0]));

    println!("Validating configuration: {}", config_path.display());

    match CodestyleConfig::load_from_file(&config_path) {
        Ok(config) => {
            println!("✅ Configuration is valid");

            let permitted = if config.permitted_types.types.is_empty() {
                "all".to_string()
            } else {
                config.permitted_types.types.len().to_string()
            };

            println!("📊 Configuration summary:");
            println!("  Rules: 3 total, {} enabled", config.enabled_rule_count());
            println!("  Permitted project types: {permitted}");
            println!(
                "  Ignored project types for dependency checks: {}",
                config.dependencies.ignored_project_types.len()
            );
            println!("  Fingerprint: {}", config.fingerprint());

            Ok(0)
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed: {e}");
            Ok(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const LEAKY_REACTOR: &str = r#"
projects:
  - group_id: se.acme.foo
    artifact_id: foo-reactor
    packaging: pom
    modules: [foo-api, foo-impl-jpa]
  - group_id: se.acme.foo.api
    artifact_id: foo-api
    packaging: jar
    dependencies:
      - {group_id: se.acme.foo.impl.jpa, artifact_id: foo-impl-jpa}
  - group_id: se.acme.foo.impl.jpa
    artifact_id: foo-impl-jpa
    packaging: jar
"#;

    fn check_args(paths: Vec<PathBuf>) -> CheckArgs {
        CheckArgs {
            paths,
            format: OutputFormatArg::Json,
            severity: None,
            max_violations: None,
            compact: false,
            no_parallel: false,
            fail_fast: false,
            use_colors: false,
        }
    }

    fn write_config(dir: &Path) -> PathBuf {
        let config_file = dir.join("codestyle_guardian.yaml");
        fs::write(
            &config_file,
            "version: \"1.0\"\ndependencies:\n  evaluate_group_ids: ['^se\\.acme\\..*']\n",
        )
        .unwrap();
        config_file
    }

    #[test]
    fn test_check_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = write_config(temp_dir.path());
        let descriptor = temp_dir.path().join("codestyle-project.yaml");
        fs::write(&descriptor, LEAKY_REACTOR).unwrap();

        // The API project depends on an implementation project
        let result = run_check(Some(&config_file), check_args(vec![temp_dir.path().to_path_buf()]));
        assert_eq!(result.unwrap(), 1);
    }

    #[test]
    fn test_check_command_passes_clean_reactor() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = write_config(temp_dir.path());
        let descriptor = temp_dir.path().join("reactor.yaml");
        fs::write(
            &descriptor,
            "projects:\n  - {group_id: se.acme.foo.api, artifact_id: foo-api, packaging: jar}\n",
        )
        .unwrap();

        let result = run_check(Some(&config_file), check_args(vec![descriptor]));
        assert_eq!(result.unwrap(), 0);
    }

    #[test]
    fn test_check_command_without_descriptors() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = write_config(temp_dir.path());

        assert!(run_check(Some(&config_file), check_args(vec![temp_dir.path().to_path_buf()])).is_err());
    }

    #[test]
    fn test_classify() {
        let result = run_classify(
            Some("se.acme.foo.api".to_string()),
            Some("foo-api".to_string()),
            Some("jar".to_string()),
        );
        assert_eq!(result.unwrap(), 0);

        let result = run_classify(
            Some("se.acme.foo".to_string()),
            Some("foo-utils".to_string()),
            Some("jar".to_string()),
        );
        assert_eq!(result.unwrap(), 1);
    }

    #[test]
    fn test_classify_descriptor() {
        let temp_dir = TempDir::new().unwrap();
        let descriptor = temp_dir.path().join("reactor.yaml");
        fs::write(&descriptor, LEAKY_REACTOR).unwrap();

        assert_eq!(run_classify_descriptor(&descriptor).unwrap(), 0);
        assert!(run_classify_descriptor(&temp_dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_validate_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("test_config.yaml");

        let config = CodestyleConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        fs::write(&config_file, yaml).unwrap();

        assert_eq!(run_validate_config(Some(config_file)).unwrap(), 0);

        let broken = temp_dir.path().join("broken.yaml");
        fs::write(&broken, "permitted_types:\n  types: [NOT_A_TYPE]\n").unwrap();
        assert_eq!(run_validate_config(Some(broken)).unwrap(), 1);
    }

    #[test]
    fn test_explain_project_type() {
        assert_eq!(run_explain("bill-of-materials").unwrap(), 0);
        assert_eq!(run_explain("API").unwrap(), 0);
        assert_eq!(run_explain("nonexistent").unwrap(), 1);
    }

    #[test]
    fn test_list_types() {
        assert_eq!(run_list_types().unwrap(), 0);
    }
}
