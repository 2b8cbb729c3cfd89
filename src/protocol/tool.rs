//! The single tool declared in tool-use requests and the prompts that go
//! with each scenario.
//!
//! Every protocol declares the same `get_weather` function so results are
//! comparable across protocols.

use super::Scenario;
use serde_json::{json, Value};

pub const TOOL_NAME: &str = "get_weather";
pub const TOOL_DESCRIPTION: &str = "Get the current weather for a specific location";

pub const TEXT_PROMPT: &str = "Hello, say 'Hi'";
/// Explicit instruction so the backend model reliably calls the tool.
pub const TOOL_PROMPT: &str = "Get weather for New York. Use the get_weather tool.";

/// Input text for embedding probes.
pub const EMBED_INPUT: &str = "hello";

/// JSON Schema for the tool's parameters: one required string `loc`.
pub fn parameters_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "loc": {
                "type": "string",
                "description": "The city and state, e.g. New York, NY"
            }
        },
        "required": ["loc"]
    })
}

pub fn prompt(scenario: Scenario) -> &'static str {
    match scenario {
        Scenario::Text => TEXT_PROMPT,
        Scenario::ToolUse => TOOL_PROMPT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_requires_loc() {
        let schema = parameters_schema();
        assert_eq!(schema["required"], json!(["loc"]));
        assert_eq!(schema["properties"]["loc"]["type"], "string");
    }

    #[test]
    fn test_prompt_per_scenario() {
        assert_eq!(prompt(Scenario::Text), "Hello, say 'Hi'");
        assert!(prompt(Scenario::ToolUse).contains(TOOL_NAME));
    }
}
