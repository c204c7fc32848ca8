use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::{AuditRecord, Intent, RawRequest};
use crate::services::ai::extraction::{extract_trip_intent, EXTRACTION_POLICY_VERSION};
use crate::services::ai::LlmProvider;
use crate::services::storage::TripStore;

#[derive(Debug, Clone)]
pub struct ParserSettings {
    pub caller_identity: String,
    pub extraction_timeout: Duration,
    /// Keep the caller's text in the audit log even when extraction fails.
    pub persist_failed_extractions: bool,
}

impl From<&AppConfig> for ParserSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            caller_identity: config.caller_identity.clone(),
            extraction_timeout: config.extraction_timeout(),
            persist_failed_extractions: config.persist_failed_extractions,
        }
    }
}

/// Terminal states of a parse that produced an intent.
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Completed {
        intent: Intent,
        record: AuditRecord,
    },
    /// The intent is valid but the audit record was not written.
    CompletedDegraded { intent: Intent, store_error: String },
}

pub struct TripParser {
    llm: Arc<dyn LlmProvider>,
    store: Arc<dyn TripStore>,
    settings: ParserSettings,
}

impl TripParser {
    pub fn new(llm: Arc<dyn LlmProvider>, store: Arc<dyn TripStore>, settings: ParserSettings) -> Self {
        Self {
            llm,
            store,
            settings,
        }
    }

    /// Validate, extract, persist. Runs each step at most once.
    pub async fn parse(&self, body: &Value) -> Result<ParseOutcome, AppError> {
        let request_id = Uuid::new_v4();
        self.run(body)
            .instrument(tracing::info_span!("parse_trip", %request_id))
            .await
    }

    async fn run(&self, body: &Value) -> Result<ParseOutcome, AppError> {
        let request =
            RawRequest::from_body(body).inspect_err(|_| tracing::info!("rejected input"))?;

        tracing::debug!(text = request.text(), "extracting trip intent");

        let intent = match extract_trip_intent(
            self.llm.as_ref(),
            request.text(),
            self.settings.extraction_timeout,
        )
        .await
        {
            Ok(intent) => intent,
            Err(e) => {
                tracing::warn!(error = %e, "extraction failed");
                if self.settings.persist_failed_extractions {
                    self.save_raw_only(&request).await;
                }
                return Err(e.into());
            }
        };

        tracing::info!(
            trip_type = intent.trip_type.as_str(),
            cabin = intent.cabin_preference.as_str(),
            hotel_type = intent.hotel_type_preference.as_str(),
            destinations = intent.destination_cities.len(),
            "extracted trip intent"
        );

        let intent_json =
            serde_json::to_value(&intent).map_err(|e| AppError::Unexpected(e.to_string()))?;

        match self
            .store
            .save(
                request.text(),
                &intent_json,
                &self.settings.caller_identity,
                Some(EXTRACTION_POLICY_VERSION),
            )
            .await
        {
            Ok(record) => {
                tracing::info!(record_id = %record.id, "completed");
                Ok(ParseOutcome::Completed { intent, record })
            }
            Err(e) => {
                tracing::warn!(error = %e, "completed degraded: audit record not saved");
                Ok(ParseOutcome::CompletedDegraded {
                    intent,
                    store_error: e.to_string(),
                })
            }
        }
    }

    async fn save_raw_only(&self, request: &RawRequest) {
        let empty = Value::Object(Default::default());
        match self
            .store
            .save(
                request.text(),
                &empty,
                &self.settings.caller_identity,
                Some(EXTRACTION_POLICY_VERSION),
            )
            .await
        {
            Ok(record) => tracing::info!(record_id = %record.id, "saved raw text without intent"),
            Err(e) => tracing::error!(error = %e, "failed to save raw text after extraction failure"),
        }
    }
}
