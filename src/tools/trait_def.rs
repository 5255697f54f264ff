use async_trait::async_trait;
use serde_json::{json, Value};

use super::error::ToolError;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn schema(&self) -> Value;
    async fn execute(&self, arguments: Value) -> Result<Value, ToolError>;
}

/// JSON schema shared by tools that take a single place name
pub fn destination_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "destination": {
                "type": "string",
                "description": description
            }
        },
        "required": ["destination"]
    })
}

/// Pulls a non-blank `destination` string out of tool arguments
pub fn destination_arg(arguments: &Value) -> Result<String, ToolError> {
    let destination = arguments
        .get("destination")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();

    if destination.is_empty() {
        return Err(ToolError::InvalidArguments(
            "'destination' must be a non-empty string".to_string(),
        ));
    }

    Ok(destination.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_arg_trims() {
        let dest = destination_arg(&json!({"destination": "  New York "})).unwrap();
        assert_eq!(dest, "New York");
    }

    #[test]
    fn test_destination_arg_rejects_missing_and_blank() {
        assert!(matches!(
            destination_arg(&json!({})),
            Err(ToolError::InvalidArguments(_))
        ));
        assert!(matches!(
            destination_arg(&json!({"destination": "   "})),
            Err(ToolError::InvalidArguments(_))
        ));
        assert!(matches!(
            destination_arg(&json!({"destination": 42})),
            Err(ToolError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_destination_schema_requires_destination() {
        let schema = destination_schema("City name");
        assert_eq!(schema["required"][0], "destination");
        assert_eq!(schema["properties"]["destination"]["type"], "string");
    }
}
