pub mod handlers;
mod types;

pub use types::{ErrorResponse, QueryRequest, WelcomeResponse};

use crate::{
    Error, Result,
    assistant::Assistant,
    config::{Config, CorsConfig, ServerConfig},
    llm::OpenAiClient,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

pub async fn run(config: Config) -> Result<()> {
    let llm = Arc::new(OpenAiClient::new(&config.llm)?);
    let assistant = Assistant::new(llm, &config.llm);

    let app_state = handlers::AppState {
        assistant: Arc::new(assistant),
    };

    let app = router(app_state, &config.server)?;

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: handlers::AppState, server: &ServerConfig) -> Result<Router> {
    Ok(Router::new()
        .route("/", get(handlers::welcome))
        .route("/daparato-assistant/", post(handlers::daparto_assistant))
        .route("/suggest-questions/", post(handlers::suggest_questions))
        .route("/find-answer/", post(handlers::find_answer))
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .layer(cors_layer(&server.cors)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn cors_layer(cors: &CorsConfig) -> Result<CorsLayer> {
    let origin = if cors.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        let origins = cors
            .allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| Error::config(format!("Invalid CORS origin: {}", origin)))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}
