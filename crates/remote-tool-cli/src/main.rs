use anyhow::{Context, Result};
use clap::Parser;
use remote_tool::RemoteTool;
use serde_json::{Map, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;

use crate::config::Config;

/// Invoke an OpenAPI-described operation as a tool
#[derive(Debug, Parser)]
#[command(name = "remote-tool", version)]
struct Cli {
    /// Free-text input bound to the operation's first required string parameter
    input: Option<String>,

    /// Schema URL (overrides configuration)
    #[arg(long)]
    url: Option<String>,

    /// Extra payload field as key=value; value is parsed as JSON when possible
    #[arg(short = 'p', long = "param", value_parser = parse_param)]
    params: Vec<(String, Value)>,

    /// Print the tool definition instead of invoking it
    #[arg(long)]
    describe: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    if let Some(url) = cli.url {
        config.tool.url = url;
    }
    if config.tool.url.is_empty() {
        anyhow::bail!("No schema URL configured (use --url or REMOTE_TOOL_TOOL__URL)");
    }

    init_logging(&config);

    tracing::info!("Loading remote tool from {}", config.tool.url);
    let tool = RemoteTool::load(config.tool_config())
        .await
        .context("Failed to load remote tool")?;

    if cli.describe {
        println!("{}", serde_json::to_string_pretty(&tool.definition())?);
        return Ok(());
    }

    let extra: Map<String, Value> = cli.params.into_iter().collect();
    let input = cli.input.unwrap_or_default();

    let result = tool
        .invoke(&input, extra)
        .await
        .with_context(|| format!("Tool '{}' failed", tool.name()))?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

fn parse_param(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;

    if key.is_empty() {
        return Err(format!("empty key in '{}'", raw));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // Logs go to stderr so stdout stays parseable JSON
    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
