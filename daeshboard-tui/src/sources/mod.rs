//! Source adapters for every tab kind.

pub mod alerts;
pub mod github;

pub use alerts::AlertmanagerAlerts;
pub use github::{GithubClient, GithubIssues, GithubPulls, GithubWorkflowRuns};

use crate::config::{ConfigError, DashboardConfig};
use crate::error::TuiError;
use daeshboard_core::{SourceAdapter, TabId};

const USER_AGENT: &str = concat!("daeshboard/", env!("CARGO_PKG_VERSION"));

pub fn http_client(config: &DashboardConfig) -> Result<reqwest::Client, TuiError> {
    Ok(reqwest::Client::builder()
        .timeout(config.request_timeout())
        .user_agent(USER_AGENT)
        .build()?)
}

/// One adapter per enabled tab, in display order.
pub fn build_sources(
    config: &DashboardConfig,
    http: reqwest::Client,
) -> Result<Vec<(TabId, Box<dyn SourceAdapter>)>, TuiError> {
    let github = GithubClient::new(http.clone(), config.github_token.clone());
    let mut sources: Vec<(TabId, Box<dyn SourceAdapter>)> = Vec::new();

    for tab in &config.tabs {
        let adapter: Box<dyn SourceAdapter> = match tab {
            TabId::Prs => Box::new(GithubPulls::new(github.clone(), config.repos.clone())),
            TabId::Issues => Box::new(GithubIssues::new(github.clone(), config.repos.clone())),
            TabId::Workflows => {
                Box::new(GithubWorkflowRuns::new(github.clone(), config.repos.clone()))
            }
            TabId::Alerts => {
                let alerts = config.alerts.as_ref().ok_or(ConfigError::InvalidValue {
                    field: "alerts",
                    reason: "required when the alerts tab is enabled".to_string(),
                })?;
                Box::new(AlertmanagerAlerts::new(http.clone(), alerts)?)
            }
        };
        sources.push((*tab, adapter));
    }

    Ok(sources)
}
