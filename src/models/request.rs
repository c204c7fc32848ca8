use serde_json::Value;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Missing userRequest string")]
pub struct InputValidationError;

/// Free-text trip description as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRequest {
    text: String,
}

impl RawRequest {
    /// Whitespace-only text is rejected; otherwise the text is kept verbatim.
    pub fn new(text: impl Into<String>) -> Result<Self, InputValidationError> {
        let text = text.into();
        // Deliberately stricter than an emptiness check: "   " carries no request.
        if text.trim().is_empty() {
            return Err(InputValidationError);
        }
        Ok(Self { text })
    }

    /// Pulls `userRequest` out of a `/parse-trip` body.
    pub fn from_body(body: &Value) -> Result<Self, InputValidationError> {
        match body.get("userRequest") {
            Some(Value::String(s)) => Self::new(s.as_str()),
            _ => Err(InputValidationError),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
