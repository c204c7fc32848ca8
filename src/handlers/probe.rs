use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::models::AuditRecord;
use crate::state::AppState;

pub const PROBE_CALLER: &str = "probe@pilotprompt.local";
pub const PROBE_TEXT: &str = "test from /test-supabase";

#[derive(Serialize)]
pub struct ProbeResponse {
    pub data: Option<Vec<AuditRecord>>,
    pub error: Option<String>,
}

// GET /test-supabase
// Liveness check for the audit store: writes a sentinel row and echoes it.
pub async fn store_probe(State(state): State<Arc<AppState>>) -> Json<ProbeResponse> {
    let empty = serde_json::Value::Object(Default::default());
    match state.store.save(PROBE_TEXT, &empty, PROBE_CALLER, None).await {
        Ok(record) => Json(ProbeResponse {
            data: Some(vec![record]),
            error: None,
        }),
        Err(e) => {
            tracing::warn!(error = %e, "store probe failed");
            Json(ProbeResponse {
                data: None,
                error: Some(e.to_string()),
            })
        }
    }
}
