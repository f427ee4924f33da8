use crate::error::{RemoteToolError, Result};
use crate::tool::{Tool, ToolDefinition};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Registry of tools, dispatching executions by tool name
#[derive(Clone, Default)]
pub struct RemoteToolExecutor {
    tools: Arc<RwLock<HashMap<String, Arc<dyn Tool>>>>,
}

impl RemoteToolExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name, replacing any tool with the same name
    pub async fn add_tool(&self, tool: impl Tool + 'static) {
        let name = tool.name().to_string();
        let mut tools = self.tools.write().await;
        if tools.insert(name.clone(), Arc::new(tool)).is_some() {
            tracing::warn!("Replaced existing tool: {}", name);
        }
    }

    /// Names of registered tools, sorted
    pub async fn list_tools(&self) -> Vec<String> {
        let tools = self.tools.read().await;
        let mut names: Vec<String> = tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Definitions of registered tools, sorted by name
    pub async fn definitions(&self) -> Vec<ToolDefinition> {
        let tools = self.tools.read().await;
        let mut definitions: Vec<ToolDefinition> = tools.values().map(|t| t.definition()).collect();
        definitions.sort_by(|a, b| a.name().cmp(b.name()));
        definitions
    }

    /// Execute a tool by name
    pub async fn execute(
        &self,
        tool_name: &str,
        input: &str,
        extra: Map<String, Value>,
    ) -> Result<Value> {
        let tool = {
            let tools = self.tools.read().await;
            tools
                .get(tool_name)
                .cloned()
                .ok_or_else(|| RemoteToolError::ToolNotFound(tool_name.to_string()))?
        };

        tool.arun(input, extra).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes input"
        }

        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("echo", "Echoes input", json!({ "type": "object" }))
        }

        fn run(&self, _input: &str, _extra: Map<String, Value>) -> Result<Value> {
            Err(RemoteToolError::UnsupportedMode)
        }

        async fn arun(&self, input: &str, extra: Map<String, Value>) -> Result<Value> {
            Ok(json!({ "input": input, "extra": extra }))
        }
    }

    #[tokio::test]
    async fn test_executor_creation() {
        let executor = RemoteToolExecutor::new();
        assert!(executor.list_tools().await.is_empty());
        assert!(executor.definitions().await.is_empty());
    }

    #[tokio::test]
    async fn test_execute_registered_tool() {
        let executor = RemoteToolExecutor::new();
        executor.add_tool(EchoTool).await;

        assert_eq!(executor.list_tools().await, vec!["echo".to_string()]);

        let mut extra = Map::new();
        extra.insert("lang".to_string(), json!("en"));
        let result = executor.execute("echo", "hi", extra).await.unwrap();
        assert_eq!(result, json!({ "input": "hi", "extra": { "lang": "en" } }));
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let executor = RemoteToolExecutor::new();
        let result = executor.execute("missing", "hi", Map::new()).await;
        assert!(matches!(result, Err(RemoteToolError::ToolNotFound(name)) if name == "missing"));
    }
}
