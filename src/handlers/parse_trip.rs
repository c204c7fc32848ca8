use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{AuditRecord, InputValidationError, Intent};
use crate::services::trip_parser::ParseOutcome;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseTripResponse {
    pub parsed: Intent,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_row: Option<AuditRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_error: Option<String>,
}

impl From<ParseOutcome> for ParseTripResponse {
    fn from(outcome: ParseOutcome) -> Self {
        match outcome {
            ParseOutcome::Completed { intent, record } => Self {
                parsed: intent,
                success: true,
                saved_row: Some(record),
                db_error: None,
            },
            ParseOutcome::CompletedDegraded {
                intent,
                store_error,
            } => Self {
                parsed: intent,
                success: false,
                saved_row: None,
                db_error: Some(store_error),
            },
        }
    }
}

// POST /parse-trip
// The body is read raw so that non-JSON input takes the same 400 path as a
// missing field.
pub async fn parse_trip(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ParseTripResponse>, AppError> {
    let payload: serde_json::Value =
        serde_json::from_slice(&body).map_err(|_| InputValidationError)?;

    let outcome = state.parser.parse(&payload).await?;
    Ok(Json(outcome.into()))
}
