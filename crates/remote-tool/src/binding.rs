use serde_json::{Map, Value};

/// Strategy for placing free-text tool input into a request payload
pub trait InputBinder: Send + Sync {
    /// Returns the payload fragment produced from `input`.
    /// An empty map means the input was not bound.
    fn bind(&self, input: &str, required: &[Value], properties: &Map<String, Value>)
        -> Map<String, Value>;
}

/// Binds input to the first required parameter when it is declared as a string.
///
/// Any other shape (no required names, no properties, a first required entry
/// that is not a name, a non-string first parameter) drops the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstRequiredString;

impl InputBinder for FirstRequiredString {
    fn bind(
        &self,
        input: &str,
        required: &[Value],
        properties: &Map<String, Value>,
    ) -> Map<String, Value> {
        let mut fragment = Map::new();

        if properties.is_empty() {
            return fragment;
        }

        if let Some(first) = required.first().and_then(Value::as_str) {
            let declared_type = properties
                .get(first)
                .and_then(|p| p.get("type"))
                .and_then(Value::as_str);

            if declared_type == Some("string") {
                fragment.insert(first.to_string(), Value::String(input.to_string()));
            }
        }

        fragment
    }
}

/// Build the outgoing payload: bound fragment first, then `extra` on top.
pub fn build_payload(
    binder: &dyn InputBinder,
    input: &str,
    required: &[Value],
    properties: &Map<String, Value>,
    extra: Map<String, Value>,
) -> Map<String, Value> {
    let mut payload = binder.bind(input, required, properties);
    payload.extend(extra);
    payload
}
