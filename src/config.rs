use crate::{Args, exporter::ExportOptions};
use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable holding the API token when none is configured
pub const DEFAULT_TOKEN_ENV: &str = "GRAFANA_API_KEY";

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

impl Config {
    /// Set the output directory for the generated file
    pub fn with_output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = output_dir;
        self
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub grafana: Grafana,
    #[serde(default)]
    pub export: Export,
    #[serde(skip)]
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Grafana {
    pub url: String,
    pub token: String,
    pub insecure: bool,
    pub timeout_seconds: u64,
}

/// Naming and layout of the generated document. Empty strings fall back to
/// the exporter defaults.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Export {
    #[serde(default)]
    pub folder_title: String,
    #[serde(default)]
    pub rule_group: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
    #[serde(default)]
    pub strict: bool,
}

fn default_interval_seconds() -> u64 {
    crate::exporter::DEFAULT_INTERVAL_SECONDS
}

impl Default for Export {
    fn default() -> Self {
        Self {
            folder_title: String::new(),
            rule_group: String::new(),
            filename: String::new(),
            interval_seconds: default_interval_seconds(),
            strict: false,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::info!("Loading config from file");

        let config = std::fs::read_to_string(path)?;
        Ok(serde_norway::from_str(&config)?)
    }

    /// Resolve the configuration from an optional config file and the command line.
    /// Flags given on the command line win over the file.
    pub fn load(args: &Args) -> Result<Self> {
        let config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => {
                let url = args
                    .hostname
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("Hostname is required"))?;

                Self {
                    grafana: Grafana::new(url, None, None, false, None)?,
                    export: Export::default(),
                    output_dir: PathBuf::new(),
                }
            }
        };

        Ok(config.with_args(args))
    }

    fn with_args(mut self, args: &Args) -> Self {
        if let Some(hostname) = &args.hostname {
            self.grafana.url = hostname.clone();
        }
        self.grafana.insecure |= args.insecure;

        if let Some(folder_title) = &args.folder_title {
            self.export.folder_title = folder_title.clone();
        }
        if let Some(rule_group) = &args.rule_group {
            self.export.rule_group = rule_group.clone();
        }
        if let Some(filename) = &args.filename {
            self.export.filename = filename.clone();
        }
        if let Some(interval_seconds) = args.interval_seconds {
            self.export.interval_seconds = interval_seconds;
        }
        self.export.strict |= args.strict;

        self.with_output_dir(args.output_dir.clone())
    }

    /// Build the exporter options for this configuration
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions::new(
            &self.export.filename,
            &self.export.folder_title,
            &self.export.rule_group,
        )
        .with_output_dir(self.output_dir.clone())
        .with_interval_seconds(self.export.interval_seconds)
        .with_strict(self.export.strict)
    }
}

impl Grafana {
    /// Create a new Grafana instance, resolving token from environment variable if needed
    pub fn new(
        url: String,
        token: Option<String>,
        token_from: Option<String>,
        insecure: bool,
        timeout_seconds: Option<u64>,
    ) -> anyhow::Result<Self> {
        let token = match (token, token_from) {
            (Some(token), _) => token,
            (None, Some(var)) => std::env::var(&var)
                .map_err(|e| anyhow::anyhow!("Failed to read token from '{}': {}", var, e))?,
            (None, None) => std::env::var(DEFAULT_TOKEN_ENV).unwrap_or_default(),
        };

        Ok(Self {
            url,
            token,
            insecure,
            timeout_seconds: timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        })
    }
}

impl<'de> Deserialize<'de> for Grafana {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct GrafanaRaw {
            url: String,
            token: Option<String>,
            #[serde(rename = "tokenFrom")]
            token_from: Option<String>,
            #[serde(default)]
            insecure: Option<bool>,
            #[serde(rename = "timeoutSeconds")]
            timeout_seconds: Option<u64>,
        }

        let raw = GrafanaRaw::deserialize(deserializer)?;
        Grafana::new(
            raw.url,
            raw.token,
            raw.token_from,
            raw.insecure.unwrap_or(false),
            raw.timeout_seconds,
        )
        .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, content).unwrap();
        (temp_dir, path)
    }

    #[test]
    fn test_config_from_file() {
        let (_dir, path) = write_config(
            r#"
            grafana:
              url: "https://grafana.example.com"
              token: "secret"
              insecure: true
            export:
              folderTitle: "Platform Alerts"
              ruleGroup: "ECS"
              filename: "alerts.tf"
              intervalSeconds: 60
            "#,
        );

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.grafana.url, "https://grafana.example.com");
        assert_eq!(config.grafana.token, "secret");
        assert!(config.grafana.insecure);
        assert_eq!(config.grafana.timeout_seconds, 10);
        assert_eq!(config.export.folder_title, "Platform Alerts");
        assert_eq!(config.export.rule_group, "ECS");
        assert_eq!(config.export.filename, "alerts.tf");
        assert_eq!(config.export.interval_seconds, 60);
        assert!(!config.export.strict);
    }

    #[test]
    fn test_export_section_is_optional() {
        let (_dir, path) = write_config(
            r#"
            grafana:
              url: "https://grafana.example.com"
              token: "secret"
              timeoutSeconds: 3
            "#,
        );

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.grafana.timeout_seconds, 3);
        assert_eq!(config.export.interval_seconds, 240);
        assert!(config.export.filename.is_empty());
    }

    #[test]
    fn test_missing_token_from_variable_is_an_error() {
        let (_dir, path) = write_config(
            r#"
            grafana:
              url: "https://grafana.example.com"
              tokenFrom: "GRAFANA_ALERT_TF_TEST_UNSET_VARIABLE"
            "#,
        );

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("GRAFANA_ALERT_TF_TEST_UNSET_VARIABLE"));
    }

    #[test]
    fn test_hostname_is_required_without_config_file() {
        let args = Args {
            alert_id: "abc".to_string(),
            ..Default::default()
        };

        let err = Config::load(&args).unwrap_err();
        assert_eq!(err.to_string(), "Hostname is required");
    }

    #[test]
    fn test_flags_override_config_file() {
        let (dir, path) = write_config(
            r#"
            grafana:
              url: "https://grafana.example.com"
              token: "secret"
            export:
              folderTitle: "From File"
              ruleGroup: "From File"
            "#,
        );

        let args = Args::parse_from([
            "grafana-alert-tf",
            "--config",
            path.to_str().unwrap(),
            "--alert-id",
            "abc",
            "--folder-title",
            "My Folder",
            "--output-dir",
            dir.path().to_str().unwrap(),
            "--strict",
        ]);

        let config = Config::load(&args).unwrap();
        assert_eq!(config.export.folder_title, "My Folder");
        assert_eq!(config.export.rule_group, "From File");
        assert!(config.export.strict);

        let options = config.export_options();
        assert_eq!(options.folder_title(), "My Folder");
        assert_eq!(options.output_path(), dir.path().join("grafana-alert.txt"));
    }
}
