use clap::{Parser, ValueEnum};
use std::path::PathBuf;

pub mod config;
pub mod exporter;
pub mod grafana;

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Grafana base URL, e.g. https://grafana.example.com
    #[arg(long, env = "GRAFANA_URL")]
    pub hostname: Option<String>,

    /// The Grafana resource to export
    #[arg(long, value_enum, default_value_t = Resource::Alert)]
    pub resource: Resource,

    /// UID of the alert rule to export
    #[arg(long = "alert-id")]
    pub alert_id: String,

    /// Directory the generated file is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Name of the generated file (default: grafana-alert.txt)
    #[arg(short, long)]
    pub filename: Option<String>,

    /// Title of the generated folder resource (default: New Folder)
    #[arg(long)]
    pub folder_title: Option<String>,

    /// Name of the generated rule group (default: New Rule)
    #[arg(long)]
    pub rule_group: Option<String>,

    /// Evaluation interval of the generated rule group (default: 240)
    #[arg(long)]
    pub interval_seconds: Option<u64>,

    /// Fail when a condition references a query that does not exist
    #[arg(long)]
    pub strict: bool,

    /// Accept invalid TLS certificates from Grafana
    #[arg(long)]
    pub insecure: bool,

    /// Print the generated document instead of writing a file
    #[arg(long)]
    pub stdout: bool,
}

/// Resource kinds that can be exported
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resource {
    #[default]
    Alert,
}
