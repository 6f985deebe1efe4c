use crate::{config::Grafana as GrafanaConfig, grafana::alert::Alert};
use reqwest::{StatusCode, Url};
use std::time::Duration;

pub mod alert;

pub struct Grafana {
    config: GrafanaConfig,
    client: reqwest::Client,
}

impl Grafana {
    /// Create a new Grafana instance
    pub fn new(config: GrafanaConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, client })
    }

    /// Get a single alert rule from Grafana by its UID
    #[tracing::instrument(skip(self))]
    pub async fn get_alert(&self, uid: &str) -> anyhow::Result<Alert> {
        tracing::info!("Fetching alert rule from Grafana");

        let response = self
            .client
            .get(self.alert_url(uid)?)
            .bearer_auth(&self.config.token)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(anyhow::anyhow!(
                "Failed to get alert '{}': HTTP {}",
                uid,
                response.status()
            ));
        }

        let body = response.text().await?;
        let alert: Alert = serde_json::from_str(&body)
            .map_err(|e| anyhow::anyhow!("Failed to decode alert '{}': {}", uid, e))?;

        tracing::debug!("Fetched alert '{}' with {} queries", alert.title, alert.data.len());

        Ok(alert)
    }

    /// Build the provisioning URL for an alert rule, encoding the uid as a single path segment
    fn alert_url(&self, uid: &str) -> anyhow::Result<Url> {
        let mut url = Url::parse(&self.config.url)?;

        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Invalid Grafana URL '{}'", self.config.url))?
            .pop_if_empty()
            .extend(["api", "v1", "provisioning", "alert-rules", uid]);

        Ok(url)
    }
}
