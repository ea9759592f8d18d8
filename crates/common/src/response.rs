//! The uniform envelope returned by every dispatch path.

use {
    serde::{Deserialize, Serialize},
    serde_json::{Map, Value},
};

/// Message returned when no active plugin accepts a command.
pub const NO_HANDLER_MESSAGE: &str = "No plugin available to handle this command";

/// `{success, message, type?, timestamp?, error?, ...unit-specific fields}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    pub message: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Unit-specific fields, flattened into the envelope on serialization.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Response {
    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(true, message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(false, message)
    }

    fn new(success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
            kind: None,
            timestamp: None,
            error: None,
            extra: Map::new(),
        }
    }

    /// The dispatch-miss response.
    pub fn no_handler() -> Self {
        Self::failure(NO_HANDLER_MESSAGE)
    }

    /// A fault caught at the registry boundary. Carries no `error` field,
    /// unlike the unit-level conversion.
    pub fn plugin_fault(text: impl std::fmt::Display) -> Self {
        Self::failure(format!("Plugin error: {text}"))
    }

    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Stamp with the current local time in RFC 3339.
    pub fn with_timestamp(mut self) -> Self {
        self.timestamp = Some(chrono::Local::now().to_rfc3339());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}
