//! Configuration loading for the dashboard.
//!
//! The file is TOML and is read once at startup. Unknown keys are rejected so
//! typos fail loudly instead of silently falling back to a default.

use daeshboard_core::{NotifyFailure, PollerConfig, RetryPolicy, TabId, TabOrder};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const CONFIG_ENV: &str = "DAESHBOARD_CONFIG";
pub const TOKEN_ENV: &str = "GH_TOKEN";
pub const DEFAULT_CONFIG_FILE: &str = "daeshboard.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    #[serde(default)]
    pub repos: Vec<Repo>,
    #[serde(default = "default_tabs")]
    pub tabs: Vec<TabId>,
    #[serde(default = "default_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_interval_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
    pub alerts: Option<AlertsConfig>,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Read from `GH_TOKEN`, never from the file.
    #[serde(skip)]
    pub github_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlertsConfig {
    pub server: String,
    #[serde(default)]
    pub receiver: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    pub initial_ms: u64,
    pub max_ms: u64,
    pub multiplier: f64,
    pub escalate_after: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_ms: 10_000,
            max_ms: 300_000,
            multiplier: 2.0,
            escalate_after: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationsConfig {
    pub enabled: bool,
    #[serde(default)]
    pub escalate_failures: bool,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            escalate_failures: false,
        }
    }
}

/// A GitHub repository written as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Repo {
    pub owner: String,
    pub name: String,
}

impl FromStr for Repo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name))
                if !owner.trim().is_empty() && !name.trim().is_empty() && !name.contains('/') =>
            {
                Ok(Self {
                    owner: owner.trim().to_string(),
                    name: name.trim().to_string(),
                })
            }
            _ => Err(format!("repository '{s}' must be written as owner/name")),
        }
    }
}

impl TryFrom<String> for Repo {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path after --config")]
    MissingConfigPath,
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl DashboardConfig {
    /// Resolve the config path, read, validate and pick up the token.
    pub fn load() -> Result<Self, ConfigError> {
        let path = match config_path_from_args(std::env::args().skip(1))? {
            Some(path) => path,
            None => config_path_from_env().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
        };
        let mut config = Self::from_path(&path)?;
        config.github_token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty());
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        contents.parse()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let tabs = self.tab_order().map_err(|err| ConfigError::InvalidValue {
            field: "tabs",
            reason: err.to_string(),
        })?;
        let github_tab = [TabId::Prs, TabId::Issues, TabId::Workflows]
            .into_iter()
            .any(|tab| tabs.contains(tab));
        if github_tab && self.repos.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "repos",
                reason: "at least one owner/name is required for the GitHub tabs".to_string(),
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_path",
                reason: "must not be empty".to_string(),
            });
        }
        if tabs.contains(TabId::Alerts) {
            match &self.alerts {
                None => {
                    return Err(ConfigError::InvalidValue {
                        field: "alerts",
                        reason: "required when the alerts tab is enabled".to_string(),
                    })
                }
                Some(alerts) if alerts.server.trim().is_empty() => {
                    return Err(ConfigError::InvalidValue {
                        field: "alerts.server",
                        reason: "must not be empty".to_string(),
                    })
                }
                Some(_) => {}
            }
        }
        if self.retry.initial_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.initial_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.retry.max_ms < self.retry.initial_ms {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_ms",
                reason: "must be >= initial_ms".to_string(),
            });
        }
        if self.retry.multiplier.is_nan() || self.retry.multiplier < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.multiplier",
                reason: "must be >= 1.0".to_string(),
            });
        }
        if self.retry.escalate_after == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.escalate_after",
                reason: "must be >= 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn tab_order(&self) -> Result<TabOrder, daeshboard_core::TabOrderError> {
        TabOrder::new(self.tabs.clone())
    }

    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            interval: Duration::from_millis(self.poll_interval_ms),
            retry: RetryPolicy {
                initial: Duration::from_millis(self.retry.initial_ms),
                max: Duration::from_millis(self.retry.max_ms),
                multiplier: self.retry.multiplier,
                escalate_after: self.retry.escalate_after,
            },
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn notify_failure(&self) -> NotifyFailure {
        if self.notifications.escalate_failures {
            NotifyFailure::Escalate
        } else {
            NotifyFailure::LogAndContinue
        }
    }
}

impl FromStr for DashboardConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

fn default_tabs() -> Vec<TabId> {
    TabId::all().to_vec()
}

fn default_interval_ms() -> u64 {
    10_000
}

fn default_log_path() -> PathBuf {
    PathBuf::from("daeshboard.log")
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

/// `Ok(None)` when `--config` is absent; an error when it has no value.
pub fn config_path_from_args(
    args: impl IntoIterator<Item = String>,
) -> Result<Option<PathBuf>, ConfigError> {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args
                .next()
                .map(|path| Some(PathBuf::from(path)))
                .ok_or(ConfigError::MissingConfigPath);
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Ok(Some(PathBuf::from(path)));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn config_flag_takes_the_next_argument() {
        let path = config_path_from_args(args(&["--config", "/tmp/d.toml"])).unwrap();
        assert_eq!(path, Some(PathBuf::from("/tmp/d.toml")));
    }

    #[test]
    fn config_flag_accepts_equals_form() {
        let path = config_path_from_args(args(&["--config=/tmp/d.toml"])).unwrap();
        assert_eq!(path, Some(PathBuf::from("/tmp/d.toml")));
    }

    #[test]
    fn dangling_config_flag_is_an_error() {
        assert!(matches!(
            config_path_from_args(args(&["--config"])),
            Err(ConfigError::MissingConfigPath)
        ));
    }

    #[test]
    fn no_flag_means_no_path() {
        assert_eq!(config_path_from_args(args(&["-v"])).unwrap(), None);
    }

    #[test]
    fn repo_parsing() {
        let repo: Repo = "rust-lang/rust".parse().unwrap();
        assert_eq!(repo.owner, "rust-lang");
        assert_eq!(repo.name, "rust");
        assert_eq!(repo.to_string(), "rust-lang/rust");
        assert!("rust".parse::<Repo>().is_err());
        assert!("/rust".parse::<Repo>().is_err());
        assert!("a/b/c".parse::<Repo>().is_err());
    }
}
