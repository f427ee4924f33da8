// OpenAPI document model and operation selection

use crate::error::{RemoteToolError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Keys of a path item that name operations. Anything else on a path item
/// (`parameters`, `summary`, `servers`, ...) is skipped during selection.
const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// OpenAPI schema document
///
/// Kept as the raw JSON value; only `paths` is interpreted. Path and method
/// order follow the document because `serde_json` is built with
/// `preserve_order`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpenApiDocument {
    value: Value,
}

impl OpenApiDocument {
    pub fn from_value(value: Value) -> Self {
        Self { value }
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }

    pub fn openapi(&self) -> Option<&str> {
        self.value.get("openapi").and_then(Value::as_str)
    }

    /// The `paths` mapping. Missing or non-object `paths` reads as no paths.
    pub fn paths(&self) -> Option<&Map<String, Value>> {
        self.value.get("paths").and_then(Value::as_object)
    }
}

/// Operation descriptor for one method on one path
///
/// Fields of an unexpected JSON type read as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operation {
    pub operation_id: Option<String>,
    pub description: Option<String>,
    pub request_body: Option<Value>,
}

impl Operation {
    pub fn from_value(descriptor: &Value) -> Self {
        let text = |key: &str| {
            descriptor
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Self {
            operation_id: text("operationId"),
            description: text("description"),
            request_body: descriptor.get("requestBody").cloned(),
        }
    }

    /// Raw `requestBody.content["application/json"].schema`, if declared
    pub fn json_body_schema(&self) -> Option<&Value> {
        self.request_body
            .as_ref()?
            .get("content")?
            .get(JSON_CONTENT_TYPE)?
            .get("schema")
    }

    /// Required names and properties of the JSON body.
    /// Missing pieces come back empty.
    pub fn body_schema(&self) -> BodySchema {
        self.json_body_schema()
            .map(BodySchema::from_value)
            .unwrap_or_default()
    }
}

/// The parts of a JSON body schema used for input binding
///
/// `required` keeps its entries as declared, including non-string ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodySchema {
    pub required: Vec<Value>,
    pub properties: Map<String, Value>,
}

impl BodySchema {
    pub fn from_value(schema: &Value) -> Self {
        let required = schema
            .get("required")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let properties = schema
            .get("properties")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        Self {
            required,
            properties,
        }
    }
}

/// The operation a tool is bound to, with the path and method it was found under
#[derive(Debug, Clone)]
pub struct SelectedOperation {
    pub path: String,
    pub method: String,
    pub operation: Operation,
}

/// Select the first operation in document order (paths, then methods).
pub fn select_operation(document: &OpenApiDocument) -> Result<SelectedOperation> {
    let paths = document.paths().ok_or(RemoteToolError::NoOperationFound)?;

    for (path, item) in paths {
        let Some(methods) = item.as_object() else {
            continue;
        };

        let first = methods
            .iter()
            .find(|(method, _)| HTTP_METHODS.contains(&method.to_ascii_lowercase().as_str()));

        if let Some((method, descriptor)) = first {
            return Ok(SelectedOperation {
                path: path.clone(),
                method: method.to_ascii_uppercase(),
                operation: Operation::from_value(descriptor),
            });
        }
    }

    Err(RemoteToolError::NoOperationFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: Value) -> OpenApiDocument {
        OpenApiDocument::from_value(value)
    }

    #[test]
    fn test_selects_first_path_and_method_in_document_order() {
        let doc = document(json!({
            "paths": {
                "/zeta": { "put": { "operationId": "first" }, "get": { "operationId": "second" } },
                "/alpha": { "post": { "operationId": "third" } }
            }
        }));

        let selected = select_operation(&doc).unwrap();
        assert_eq!(selected.path, "/zeta");
        assert_eq!(selected.method, "PUT");
        assert_eq!(selected.operation.operation_id.as_deref(), Some("first"));
    }

    #[test]
    fn test_skips_path_level_fields() {
        let doc = document(json!({
            "paths": {
                "/items": {
                    "summary": "Items",
                    "parameters": [],
                    "post": { "operationId": "createItem" }
                }
            }
        }));

        let selected = select_operation(&doc).unwrap();
        assert_eq!(selected.operation.operation_id.as_deref(), Some("createItem"));
    }

    #[test]
    fn test_mistyped_first_operation_is_still_selected() {
        let doc = document(json!({
            "paths": {
                "/first": { "post": { "operationId": 42, "description": ["not", "text"] } },
                "/second": { "post": { "operationId": "second" } }
            }
        }));

        let selected = select_operation(&doc).unwrap();
        assert_eq!(selected.path, "/first");
        assert_eq!(selected.operation.operation_id, None);
        assert_eq!(selected.operation.description, None);
    }

    #[test]
    fn test_non_object_operation_reads_as_empty() {
        let doc = document(json!({ "paths": { "/p": { "post": "oops" }, "/q": { "post": {} } } }));

        let selected = select_operation(&doc).unwrap();
        assert_eq!(selected.path, "/p");
        assert_eq!(selected.operation, Operation::default());
    }

    #[test]
    fn test_unread_fields_keep_any_type() {
        let doc = document(json!({ "openapi": 3.1, "info": 7, "paths": { "/p": { "post": {} } } }));

        assert_eq!(doc.openapi(), None);
        assert_eq!(doc.as_value()["info"], 7);
        assert_eq!(select_operation(&doc).unwrap().path, "/p");
    }

    #[test]
    fn test_empty_paths() {
        let doc = document(json!({ "openapi": "3.0.0", "paths": {} }));
        assert!(matches!(
            select_operation(&doc),
            Err(RemoteToolError::NoOperationFound)
        ));
    }

    #[test]
    fn test_missing_or_invalid_paths() {
        for value in [json!({ "openapi": "3.0.0" }), json!({ "paths": [] }), json!([1, 2])] {
            assert!(matches!(
                select_operation(&document(value)),
                Err(RemoteToolError::NoOperationFound)
            ));
        }
    }

    #[test]
    fn test_paths_without_methods() {
        let doc = document(json!({ "paths": { "/a": {}, "/b": { "summary": "nothing" } } }));
        assert!(matches!(
            select_operation(&doc),
            Err(RemoteToolError::NoOperationFound)
        ));
    }

    #[test]
    fn test_body_schema_extraction() {
        let operation = Operation::from_value(&json!({
            "requestBody": {
                "content": {
                    "application/json": {
                        "schema": {
                            "type": "object",
                            "required": [3, "markdown"],
                            "properties": { "markdown": { "type": "string" } }
                        }
                    }
                }
            }
        }));

        let body = operation.body_schema();
        assert_eq!(body.required, vec![json!(3), json!("markdown")]);
        assert_eq!(body.properties["markdown"]["type"], "string");
    }

    #[test]
    fn test_body_schema_absent() {
        let operation = Operation::default();
        assert_eq!(operation.body_schema(), BodySchema::default());

        let form_only = Operation::from_value(&json!({
            "requestBody": { "content": { "multipart/form-data": { "schema": {} } } }
        }));
        assert!(form_only.json_body_schema().is_none());
        assert!(form_only.body_schema().required.is_empty());
    }
}
