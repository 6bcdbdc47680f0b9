use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use api_types::Pod;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(about, long_about, version)]
pub struct Cli {
    /// Default log level, refined by `RUST_LOG`
    #[arg(long, global = true, default_value = "info", env = "POD_REGISTRY_LOG_LEVEL")]
    pub log_level: LevelFilter,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create every pod in a manifest and print the registry contents
    Apply(ManifestArgs),
    /// Create every pod in a manifest and print the pods awaiting a scheduler
    Unassigned(ManifestArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ManifestArgs {
    /// Path to a YAML or JSON list of pods
    #[arg(short = 'f', long, env = "POD_REGISTRY_MANIFEST")]
    pub manifest: PathBuf,

    /// Output format for the resulting pod list
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml, env = "POD_REGISTRY_OUTPUT")]
    pub output: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Read a pod manifest; `.json` files are parsed as JSON, anything else as YAML.
pub fn load_manifest(path: &Path) -> Result<Vec<Pod>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON manifest {}", path.display()))
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML manifest {}", path.display()))
    }
}

pub fn render_pods(pods: &[Pod], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(pods).context("failed to encode pods"),
        OutputFormat::Yaml => serde_yaml::to_string(pods).context("failed to encode pods"),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use api_types::PodStatus;
    use clap::CommandFactory;
    use similar_asserts::assert_eq;

    use super::*;

    fn write_manifest(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("should create temp manifest");
        file.write_all(content.as_bytes())
            .expect("should write manifest");
        file
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_apply_arguments() {
        let cli = Cli::try_parse_from(["pod-registry", "apply", "-f", "pods.yaml", "-o", "json"])
            .expect("should parse");
        match cli.command {
            Commands::Apply(args) => {
                assert_eq!(args.manifest, PathBuf::from("pods.yaml"));
                assert_eq!(args.output, OutputFormat::Json);
            }
            Commands::Unassigned(_) => panic!("expected apply"),
        }
        assert_eq!(cli.log_level, LevelFilter::INFO);
    }

    #[test]
    fn parses_global_log_level() {
        let cli = Cli::try_parse_from([
            "pod-registry",
            "unassigned",
            "--manifest",
            "pods.json",
            "--log-level",
            "debug",
        ])
        .expect("should parse");
        assert_eq!(cli.log_level, LevelFilter::DEBUG);
        assert!(matches!(cli.command, Commands::Unassigned(_)));
    }

    #[test]
    fn loads_yaml_manifest() {
        let file = write_manifest(
            ".yaml",
            r#"
- name: web
  spec:
    replicas: 2
    containers:
      - image: nginx
        name: web
- name: batch
  spec:
    replicas: 1
    containers:
      - image: busybox
        command: ["sh", "-c"]
  status: Running
"#,
        );

        let pods = load_manifest(file.path()).expect("should load manifest");
        assert_eq!(pods.len(), 2);
        assert_eq!(pods[0].name, "web");
        assert!(pods[0].status.is_empty());
        assert_eq!(pods[1].status, PodStatus::from("Running"));
        assert_eq!(pods[1].spec.containers[0].command, vec!["sh", "-c"]);
    }

    #[test]
    fn loads_json_manifest() {
        let file = write_manifest(
            ".json",
            r#"[{"name":"a","spec":{"replicas":1,"containers":[{"image":"nginx"}]}}]"#,
        );

        let pods = load_manifest(file.path()).expect("should load manifest");
        assert_eq!(pods[0].spec.containers[0].image, "nginx");
    }

    #[test]
    fn missing_manifest_reports_path() {
        let err = load_manifest(Path::new("/nonexistent/pods.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/pods.yaml"));
    }

    #[test]
    fn renders_json_list() {
        let pods = vec![Pod::default().with_status(PodStatus::unassigned())];
        let rendered = render_pods(&pods, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value[0]["status"], "Unassigned");
    }
}
