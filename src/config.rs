use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub llm_provider: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub extraction_timeout_secs: u64,
    /// Stored with every audit record until callers carry a real identity.
    pub caller_identity: String,
    pub persist_failed_extractions: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: var("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: var("DATABASE_URL").unwrap_or_else(|| "pilotprompt.db".to_string()),
            llm_provider: var("LLM_PROVIDER").unwrap_or_else(|| "openai".to_string()),
            openai_api_key: var("OPENAI_API_KEY").unwrap_or_default(),
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| "gpt-4.1-mini".to_string()),
            openai_base_url: var("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            ollama_url: var("OLLAMA_URL").unwrap_or_else(|| "http://localhost:11434".to_string()),
            ollama_model: var("OLLAMA_MODEL").unwrap_or_else(|| "llama3.2".to_string()),
            // A zero timeout would fail every extraction, so the floor is one second.
            extraction_timeout_secs: var("EXTRACTION_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(30)
                .max(1),
            caller_identity: var("CALLER_IDENTITY")
                .unwrap_or_else(|| "anonymous@pilotprompt.local".to_string()),
            persist_failed_extractions: var("PERSIST_FAILED_EXTRACTIONS")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
