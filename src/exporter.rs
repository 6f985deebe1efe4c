use crate::grafana::alert::Alert;
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub mod literal;
mod render;

pub const DEFAULT_FILENAME: &str = "grafana-alert.txt";
pub const DEFAULT_FOLDER_TITLE: &str = "New Folder";
pub const DEFAULT_RULE_GROUP: &str = "New Rule";
pub const DEFAULT_INTERVAL_SECONDS: u64 = 240;

/// Errors produced while exporting an alert rule
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing a fragment of the document failed
    #[error("Failed to render document: {0}")]
    Render(#[from] std::fmt::Error),

    /// Two queries of the same rule share a ref id
    #[error("Duplicate ref id '{0}'")]
    DuplicateRefId(String),

    /// Something refers to a query the rule does not have
    #[error("{location} references unknown ref id '{ref_id}'")]
    UnresolvedReference { location: String, ref_id: String },

    /// The rendered document could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Naming and output settings for an export
#[derive(Debug, Clone)]
pub struct ExportOptions {
    output_dir: PathBuf,
    filename: String,
    folder_title: String,
    rule_group: String,
    interval_seconds: u64,
    strict: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::new("", "", "")
    }
}

impl ExportOptions {
    /// Create options, falling back to the defaults for every empty value
    pub fn new(filename: &str, folder_title: &str, rule_group: &str) -> Self {
        Self {
            output_dir: PathBuf::new(),
            filename: or_default(filename, DEFAULT_FILENAME),
            folder_title: or_default(folder_title, DEFAULT_FOLDER_TITLE),
            rule_group: or_default(rule_group, DEFAULT_RULE_GROUP),
            interval_seconds: DEFAULT_INTERVAL_SECONDS,
            strict: false,
        }
    }

    /// Set the directory the document is written to
    pub fn with_output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = output_dir;
        self
    }

    /// Set the evaluation interval of the rule group
    pub fn with_interval_seconds(mut self, interval_seconds: u64) -> Self {
        self.interval_seconds = interval_seconds;
        self
    }

    /// Reject unresolved ref ids instead of passing them through
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn folder_title(&self) -> &str {
        &self.folder_title
    }

    pub fn rule_group(&self) -> &str {
        &self.rule_group
    }

    pub fn interval_seconds(&self) -> u64 {
        self.interval_seconds
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    /// Full path of the generated file
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.filename)
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Renders alert rules as Terraform `grafana_folder` and `grafana_rule_group` resources
pub struct Exporter {
    options: ExportOptions,
}

impl Exporter {
    /// Create a new Exporter instance
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    /// Render the alert into Terraform source text
    #[tracing::instrument(skip(self, alert), fields(uid = %alert.uid))]
    pub fn render(&self, alert: &Alert) -> Result<String, ExportError> {
        for problem in check_references(alert) {
            if self.options.strict {
                return Err(problem);
            }

            tracing::warn!("{}", problem);
        }

        let document = render::document(alert, &self.options)?;
        tracing::debug!("Rendered {} bytes", document.len());

        Ok(document)
    }

    /// Render the alert and write it to the configured output path
    #[tracing::instrument(skip(self, alert), fields(uid = %alert.uid))]
    pub fn export(&self, alert: &Alert) -> Result<PathBuf, ExportError> {
        let document = self.render(alert)?;
        let path = self.options.output_path();

        write_document(&path, &document)?;
        tracing::info!("Wrote alert '{}' to {}", alert.title, path.display());

        Ok(path)
    }
}

fn write_document(path: &Path, document: &str) -> Result<(), ExportError> {
    std::fs::write(path, document).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Find duplicate ref ids and references to queries the alert does not define.
/// Problems are returned in document order.
pub fn check_references(alert: &Alert) -> Vec<ExportError> {
    let mut problems = Vec::new();
    let mut ref_ids = HashSet::new();

    for entry in &alert.data {
        if !ref_ids.insert(entry.ref_id.as_str()) {
            problems.push(ExportError::DuplicateRefId(entry.ref_id.clone()));
        }
    }

    if !ref_ids.contains(alert.condition.as_str()) {
        problems.push(ExportError::UnresolvedReference {
            location: "Rule condition".to_string(),
            ref_id: alert.condition.clone(),
        });
    }

    for entry in &alert.data {
        for condition in &entry.model.conditions {
            for param in &condition.query.params {
                if !ref_ids.contains(param.as_str()) {
                    problems.push(ExportError::UnresolvedReference {
                        location: format!("Condition in query '{}'", entry.ref_id),
                        ref_id: param.clone(),
                    });
                }
            }
        }
    }

    problems
}
