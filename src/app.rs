use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::{CaptionUseCase, PlaceInfoUseCase};
use crate::domain::error::Result;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::llm_clients::gemini::GeminiClient;
use crate::infrastructure::llm_clients::LLMClient;
use crate::interfaces::http::{start_server, HttpState};

fn init_tracing(config: &AppConfig) {
    // RUST_LOG wins over the configured filter when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub async fn run() -> Result<()> {
    let _ = dotenvy::dotenv();

    let config = Arc::new(AppConfig::load()?);
    init_tracing(&config);

    let llm_client: Arc<dyn LLMClient + Send + Sync> =
        Arc::new(GeminiClient::new(config.request_timeout())?);

    let state = HttpState {
        config: config.clone(),
        caption_use_case: Arc::new(CaptionUseCase::new(
            llm_client.clone(),
            config.output_language.clone(),
        )),
        place_info_use_case: Arc::new(PlaceInfoUseCase::new(
            llm_client,
            config.output_language.clone(),
        )),
    };

    let server = start_server(state, &config.host, config.port).map_err(|err| {
        error!(error = %err, host = %config.host, port = config.port, "Failed to bind HTTP server");
        err
    })?;

    info!(
        address = %format!("http://{}:{}", config.host, config.port),
        model = %config.model,
        "Caption relay is up"
    );

    server.await?;
    Ok(())
}
