pub mod sqlite;

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::models::AuditRecord;

/// Durable audit log of parsed trips. Records are append-only.
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Writes one record; the store assigns `id` and `created_at`.
    async fn save(
        &self,
        raw_text: &str,
        intent: &serde_json::Value,
        caller_identity: &str,
        extraction_policy: Option<&str>,
    ) -> Result<AuditRecord, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<AuditRecord>, StoreError>;

    /// Newest first.
    async fn list_recent(&self, limit: i64) -> Result<Vec<AuditRecord>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
