use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use pilotprompt::app;
use pilotprompt::config::AppConfig;
use pilotprompt::db;
use pilotprompt::services::ai::ollama::OllamaProvider;
use pilotprompt::services::ai::openai::OpenAiProvider;
use pilotprompt::services::ai::LlmProvider;
use pilotprompt::services::storage::sqlite::SqliteTripStore;
use pilotprompt::services::storage::TripStore;
use pilotprompt::services::trip_parser::{ParserSettings, TripParser};
use pilotprompt::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    let store: Arc<dyn TripStore> = Arc::new(SqliteTripStore::new(conn));

    let llm: Arc<dyn LlmProvider> = match config.llm_provider.as_str() {
        "ollama" => {
            tracing::info!(
                "using Ollama LLM provider (url: {}, model: {})",
                config.ollama_url,
                config.ollama_model
            );
            Arc::new(OllamaProvider::new(
                config.ollama_url.clone(),
                config.ollama_model.clone(),
            ))
        }
        _ => {
            anyhow::ensure!(
                !config.openai_api_key.is_empty(),
                "OPENAI_API_KEY must be set when LLM_PROVIDER=openai"
            );
            tracing::info!("using OpenAI-compatible LLM provider (model: {})", config.openai_model);
            Arc::new(OpenAiProvider::new(
                config.openai_api_key.clone(),
                config.openai_model.clone(),
                config.openai_base_url.clone(),
            ))
        }
    };

    let parser = TripParser::new(llm, store.clone(), ParserSettings::from(&config));
    let state = Arc::new(AppState { parser, store });

    let app = app::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
