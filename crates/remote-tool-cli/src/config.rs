use ::config::{Config as ConfigLoader, ConfigError, Environment, File};
use remote_tool::RemoteToolConfig;
use serde::Deserialize;
use std::fmt;

#[derive(Clone, Deserialize)]
pub struct Config {
    pub tool: ToolConfig,
    pub logging: LoggingConfig,

    // Secret (from ENV only)
    #[serde(default)]
    pub api_key: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("tool", &self.tool)
            .field("logging", &self.logging)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolConfig {
    #[serde(default)]
    pub url: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. built-in defaults
    /// 2. config/default.toml
    /// 3. config/{ENV}.toml (if ENV is set)
    /// 4. REMOTE_TOOL_* environment variables, `__` between nested keys
    ///    (e.g. REMOTE_TOOL_TOOL__URL, REMOTE_TOOL_LOGGING__LEVEL)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .set_default("tool.url", "")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("REMOTE_TOOL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        cfg.api_key = std::env::var("REMOTE_TOOL_API_KEY").map_err(|_| {
            ConfigError::Message("REMOTE_TOOL_API_KEY environment variable is required".to_string())
        })?;

        Ok(cfg)
    }

    /// Library configuration for the tool described by this config
    pub fn tool_config(&self) -> RemoteToolConfig {
        let mut config = RemoteToolConfig::new(self.tool.url.clone(), self.api_key.clone());
        if let Some(name) = &self.tool.name {
            config = config.with_name(name);
        }
        if let Some(description) = &self.tool.description {
            config = config.with_description(description);
        }
        if let Some(secs) = self.tool.timeout_secs {
            config = config.with_timeout_secs(secs);
        }
        config
    }
}
