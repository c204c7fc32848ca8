use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::Connection;
use uuid::Uuid;

use super::TripStore;
use crate::db::queries;
use crate::errors::StoreError;
use crate::models::AuditRecord;

pub struct SqliteTripStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteTripStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.db
            .lock()
            .map_err(|_| StoreError::Unavailable("database lock poisoned".to_string()))
    }
}

#[async_trait]
impl TripStore for SqliteTripStore {
    async fn save(
        &self,
        raw_text: &str,
        intent: &serde_json::Value,
        caller_identity: &str,
        extraction_policy: Option<&str>,
    ) -> Result<AuditRecord, StoreError> {
        let id = Uuid::new_v4().to_string();
        let conn = self.conn()?;
        queries::insert_trip(&conn, &id, caller_identity, raw_text, intent, extraction_policy)
    }

    async fn get(&self, id: &str) -> Result<Option<AuditRecord>, StoreError> {
        let conn = self.conn()?;
        queries::get_trip(&conn, id)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<AuditRecord>, StoreError> {
        let conn = self.conn()?;
        queries::list_trips(&conn, limit)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;
        queries::ping(&conn)
    }
}
