//! Displayable items produced by source adapters.

use serde::{Deserialize, Serialize};

/// One displayable unit within a tab: a review, issue, alert or run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub value: String,
    /// Opened in the browser on activate.
    pub url: Option<String>,
    /// Launched instead of `url` when set.
    pub application: Option<String>,
}

impl Item {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            url: None,
            application: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_application(mut self, application: impl Into<String>) -> Self {
        self.application = Some(application.into());
        self
    }
}
