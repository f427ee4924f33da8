// Schema-backed remote tool

use crate::binding::{build_payload, FirstRequiredString, InputBinder};
use crate::config::{RemoteToolConfig, DEFAULT_DESCRIPTION, DEFAULT_NAME};
use crate::error::{RemoteToolError, Result};
use crate::schema::{select_operation, OpenApiDocument, Operation, SelectedOperation};
use crate::tool::{Tool, ToolDefinition};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Map, Value};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Tool backed by the first operation of an OpenAPI schema
///
/// The schema is fetched once when the tool is built. Every invocation POSTs
/// a JSON payload to the selected operation's path on the schema's origin,
/// authenticated with a static bearer token.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> remote_tool::Result<()> {
/// use remote_tool::RemoteTool;
/// use serde_json::Map;
///
/// let tool = RemoteTool::builder()
///     .url("https://api.example.com/api/v1/tools/md-to-docx/openapi.json")
///     .api_key("secret")
///     .build()
///     .await?;
///
/// let result = tool.invoke("# Title", Map::new()).await?;
/// println!("{}", result);
/// # Ok(())
/// # }
/// ```
pub struct RemoteTool {
    name: String,
    description: String,
    schema_url: Url,
    origin: Url,
    endpoint: Url,
    document: OpenApiDocument,
    selected: SelectedOperation,
    http_client: reqwest::Client,
    binder: Arc<dyn InputBinder>,
}

impl RemoteTool {
    pub fn builder() -> RemoteToolBuilder {
        RemoteToolBuilder::default()
    }

    /// Fetch the schema described by `config` and build the tool
    pub async fn load(config: RemoteToolConfig) -> Result<Self> {
        RemoteToolBuilder::from_config(config).build().await
    }

    /// Invoke the remote operation
    ///
    /// `input` is bound by the tool's binder; `extra` entries are merged on
    /// top and win on key collision.
    pub async fn invoke(&self, input: &str, extra: Map<String, Value>) -> Result<Value> {
        let body = self.selected.operation.body_schema();
        let payload = build_payload(
            self.binder.as_ref(),
            input,
            &body.required,
            &body.properties,
            extra,
        );

        tracing::debug!(
            tool = %self.name,
            "POST {} with {} payload field(s)",
            self.endpoint,
            payload.len()
        );

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn handle_response(&self, response: reqwest::Response) -> Result<Value> {
        let status = response.status();

        if status.is_success() {
            tracing::debug!(tool = %self.name, "Remote operation successful: {}", status);
            Ok(response.json::<Value>().await?)
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());

            tracing::error!(
                tool = %self.name,
                "Remote operation failed: status={}, body={}",
                status,
                body
            );

            Err(RemoteToolError::RemoteOperation { status, body })
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn schema_url(&self) -> &Url {
        &self.schema_url
    }

    /// `scheme://host[:port]` of the schema URL
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Absolute URL the operation is POSTed to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn path(&self) -> &str {
        &self.selected.path
    }

    /// Method the operation was declared under (calls are always POST)
    pub fn method(&self) -> &str {
        &self.selected.method
    }

    pub fn operation(&self) -> &Operation {
        &self.selected.operation
    }

    pub fn schema(&self) -> &OpenApiDocument {
        &self.document
    }

    pub fn definition(&self) -> ToolDefinition {
        let parameters = self
            .selected
            .operation
            .json_body_schema()
            .cloned()
            .unwrap_or_else(|| json!({ "type": "object", "properties": {} }));

        ToolDefinition::new(&self.name, &self.description, parameters)
    }
}

impl fmt::Debug for RemoteTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteTool")
            .field("name", &self.name)
            .field("schema_url", &self.schema_url.as_str())
            .field("endpoint", &self.endpoint.as_str())
            .field("method", &self.selected.method)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Tool for RemoteTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn definition(&self) -> ToolDefinition {
        RemoteTool::definition(self)
    }

    fn run(&self, _input: &str, _extra: Map<String, Value>) -> Result<Value> {
        Err(RemoteToolError::UnsupportedMode)
    }

    async fn arun(&self, input: &str, extra: Map<String, Value>) -> Result<Value> {
        self.invoke(input, extra).await
    }
}

/// Builder for [`RemoteTool`]
pub struct RemoteToolBuilder {
    url: Option<String>,
    api_key: Option<String>,
    name: String,
    description: String,
    timeout: Option<Duration>,
    binder: Arc<dyn InputBinder>,
}

impl Default for RemoteToolBuilder {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            name: DEFAULT_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            timeout: None,
            binder: Arc::new(FirstRequiredString),
        }
    }
}

impl RemoteToolBuilder {
    pub fn from_config(config: RemoteToolConfig) -> Self {
        let timeout = config.timeout();
        Self {
            url: Some(config.url),
            api_key: Some(config.api_key),
            name: config.name,
            description: config.description,
            timeout,
            ..Self::default()
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn binder(mut self, binder: impl InputBinder + 'static) -> Self {
        self.binder = Arc::new(binder);
        self
    }

    /// Fetch the schema, select its operation and set up the authenticated client
    pub async fn build(self) -> Result<RemoteTool> {
        let url = self
            .url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| RemoteToolError::InvalidConfig("Schema URL is required".to_string()))?;
        let api_key = self
            .api_key
            .ok_or_else(|| RemoteToolError::InvalidConfig("API key is required".to_string()))?;

        let schema_url = Url::parse(&url)
            .map_err(|e| RemoteToolError::InvalidConfig(format!("Invalid schema URL '{}': {}", url, e)))?;
        let origin = derive_origin(&schema_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|_| RemoteToolError::InvalidConfig("Invalid API key format".to_string()))?,
        );
        let http_client = build_http_client(headers, self.timeout)?;

        let schema_client = build_http_client(HeaderMap::new(), self.timeout)?;
        let document = fetch_schema(&schema_client, &schema_url).await?;

        let selected = select_operation(&document)?;
        let endpoint = origin.join(&selected.path).map_err(|e| {
            RemoteToolError::InvalidConfig(format!("Invalid operation path '{}': {}", selected.path, e))
        })?;

        let mut name = self.name;
        let mut description = self.description;
        if let Some(operation_id) = &selected.operation.operation_id {
            name = operation_id.clone();
        }
        if let Some(operation_description) = &selected.operation.description {
            description = operation_description.clone();
        }

        tracing::info!(
            tool = %name,
            "Loaded remote tool: {} {}",
            selected.method,
            endpoint
        );

        Ok(RemoteTool {
            name,
            description,
            schema_url,
            origin,
            endpoint,
            document,
            selected,
            http_client,
            binder: self.binder,
        })
    }
}

fn build_http_client(headers: HeaderMap, timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().default_headers(headers);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| RemoteToolError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))
}

async fn fetch_schema(client: &reqwest::Client, url: &Url) -> Result<OpenApiDocument> {
    tracing::debug!("Fetching OpenAPI schema from {}", url);

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| RemoteToolError::schema_fetch(url.as_str(), e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(RemoteToolError::schema_fetch(
            url.as_str(),
            format!("unexpected status {}", status),
        ));
    }

    let value = response
        .json::<Value>()
        .await
        .map_err(|e| RemoteToolError::schema_fetch(url.as_str(), e))?;

    Ok(OpenApiDocument::from_value(value))
}

/// Reduce a URL to its `scheme://host[:port]` origin
pub(crate) fn derive_origin(url: &Url) -> Result<Url> {
    if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
        return Err(RemoteToolError::InvalidConfig(format!(
            "Schema URL must be an http(s) URL with a host: {}",
            url
        )));
    }

    let origin = url.origin().ascii_serialization();
    Url::parse(&origin)
        .map_err(|e| RemoteToolError::InvalidConfig(format!("Invalid origin '{}': {}", origin, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin_of(url: &str) -> String {
        derive_origin(&Url::parse(url).unwrap()).unwrap().to_string()
    }

    #[test]
    fn test_origin_drops_path_and_query() {
        assert_eq!(
            origin_of("https://www.middleman-ai.com/api/v1/tools/md-to-docx/openapi.json?v=2"),
            "https://www.middleman-ai.com/"
        );
    }

    #[test]
    fn test_origin_keeps_explicit_port() {
        assert_eq!(origin_of("http://127.0.0.1:8080/openapi.json"), "http://127.0.0.1:8080/");
        assert_eq!(origin_of("https://example.com:443/openapi.json"), "https://example.com/");
    }

    #[test]
    fn test_origin_rejects_non_http() {
        let url = Url::parse("file:///tmp/openapi.json").unwrap();
        assert!(matches!(
            derive_origin(&url),
            Err(RemoteToolError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_builder_requires_url() {
        let result = RemoteTool::builder().api_key("key").build().await;
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Schema URL"));
    }

    #[tokio::test]
    async fn test_builder_requires_api_key() {
        let result = RemoteTool::builder()
            .url("https://example.com/openapi.json")
            .build()
            .await;
        let err = result.unwrap_err().to_string();
        assert!(err.contains("API key"));
    }

    #[tokio::test]
    async fn test_builder_rejects_unparsable_url() {
        let result = RemoteTool::builder()
            .url("not a url")
            .api_key("key")
            .build()
            .await;
        assert!(matches!(result, Err(RemoteToolError::InvalidConfig(_))));
    }
}
