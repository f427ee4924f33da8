// Construction parameters for a remote tool

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_NAME: &str = "remote_tool";
pub const DEFAULT_DESCRIPTION: &str = "External API tool based on OpenAPI schema";

/// Configuration for a schema-backed remote tool
///
/// `name` and `description` are only fallbacks: the selected operation's
/// `operationId` and `description` replace them when the schema declares them.
#[derive(Clone, Serialize, Deserialize)]
pub struct RemoteToolConfig {
    /// URL of the OpenAPI schema document
    pub url: String,

    /// Bearer token sent on every operation call (never on the schema fetch)
    pub api_key: String,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_description")]
    pub description: String,

    /// Transport timeout in seconds. Unset means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for RemoteToolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteToolConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

impl RemoteToolConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            name: default_name(),
            description: default_description(),
            timeout_secs: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
