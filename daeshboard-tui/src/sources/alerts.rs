//! Alertmanager v2 source.

use crate::config::{AlertsConfig, ConfigError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use daeshboard_core::{Item, SourceAdapter, SourceError};
use reqwest::{StatusCode, Url};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Alert {
    #[serde(default)]
    pub annotations: Annotations,
    #[serde(rename = "startsAt")]
    pub starts_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub description: String,
}

/// Active, unsilenced, uninhibited alerts routed to one receiver.
pub struct AlertmanagerAlerts {
    http: reqwest::Client,
    api_url: Url,
    ui_url: String,
}

impl AlertmanagerAlerts {
    pub fn new(http: reqwest::Client, config: &AlertsConfig) -> Result<Self, ConfigError> {
        let server = config.server.trim_end_matches('/');
        let mut api_url = Url::parse(&format!("{server}/api/v2/alerts")).map_err(|err| {
            ConfigError::InvalidValue {
                field: "alerts.server",
                reason: err.to_string(),
            }
        })?;
        api_url
            .query_pairs_mut()
            .append_pair("receiver", &config.receiver)
            .append_pair("silenced", "false")
            .append_pair("inhibited", "false");
        let query = api_url.query().unwrap_or_default();
        let ui_url = format!("{server}/#/alerts?{query}");

        Ok(Self {
            http,
            api_url,
            ui_url,
        })
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_str()
    }

    /// Every alert links to the same filtered alert list in the UI.
    pub fn ui_url(&self) -> &str {
        &self.ui_url
    }

    pub fn items(&self, mut alerts: Vec<Alert>) -> Vec<Item> {
        alerts.sort_by(|a, b| b.starts_at.cmp(&a.starts_at));
        alerts
            .into_iter()
            .map(|alert| Item::new(alert.annotations.description).with_url(self.ui_url.clone()))
            .collect()
    }
}

#[async_trait]
impl SourceAdapter for AlertmanagerAlerts {
    fn name(&self) -> &str {
        "alertmanager"
    }

    async fn fetch(&self) -> Result<Vec<Item>, SourceError> {
        let url = self.api_url.to_string();
        let response = self
            .http
            .get(self.api_url.clone())
            .send()
            .await
            .map_err(|err| SourceError::Http {
                url: url.clone(),
                reason: err.to_string(),
            })?;
        if response.status() != StatusCode::OK {
            return Err(SourceError::Status {
                url,
                status: response.status().as_u16(),
            });
        }
        let alerts = response
            .json::<Vec<Alert>>()
            .await
            .map_err(|err| SourceError::Decode {
                url,
                reason: err.to_string(),
            })?;
        Ok(self.items(alerts))
    }
}
