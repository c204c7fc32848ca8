use chrono::NaiveDateTime;
use serde::Serialize;

/// One row of the trip audit log. `intent` holds the normalized intent as
/// JSON, or `{}` when extraction never completed. `extraction_policy` is the
/// prompt version the intent was extracted under; rows not produced by an
/// extraction attempt have none.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AuditRecord {
    pub id: String,
    pub created_at: NaiveDateTime,
    pub caller_identity: String,
    pub raw_text: String,
    pub intent: serde_json::Value,
    pub extraction_policy: Option<String>,
}

impl AuditRecord {
    pub fn has_intent(&self) -> bool {
        self.intent.as_object().is_some_and(|o| !o.is_empty())
    }
}
