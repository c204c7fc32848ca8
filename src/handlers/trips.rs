use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::AuditRecord;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

#[derive(Deserialize)]
pub struct TripsQuery {
    pub limit: Option<i64>,
}

// GET /api/trips
pub async fn list_trips(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TripsQuery>,
) -> Result<Json<Vec<AuditRecord>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let trips = state.store.list_recent(limit).await?;
    Ok(Json(trips))
}

// GET /api/trips/:id
pub async fn get_trip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AuditRecord>, AppError> {
    state
        .store
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("trip {id}")))
}
