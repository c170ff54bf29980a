use {
    axum::{
        Json, Router,
        extract::{DefaultBodyLimit, State},
        response::IntoResponse,
        routing::{get, post},
    },
    tower_http::{
        cors::{Any, CorsLayer},
        trace::TraceLayer,
    },
    tracing::info,
    voira_config::VoiraConfig,
};

use crate::{api_routes, onboarding_routes, state::GatewayState};

/// Uploads carry whole documents inline.
const INGEST_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Build the gateway router (shared between production startup and tests).
pub fn build_gateway_app(state: GatewayState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/allocate-phone", post(api_routes::allocate_phone))
        .route("/api/scrape-website", post(api_routes::scrape_website))
        .route("/api/trigger-call", post(api_routes::trigger_call))
        .route(
            "/api/ingest",
            post(api_routes::ingest).layer(DefaultBodyLimit::max(INGEST_BODY_LIMIT)),
        )
        .route(
            "/api/onboarding",
            get(onboarding_routes::onboarding_get).delete(onboarding_routes::onboarding_reset),
        )
        .route("/api/onboarding/next", post(onboarding_routes::onboarding_next))
        .route("/api/onboarding/back", post(onboarding_routes::onboarding_back))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the gateway HTTP server and serve until the process exits.
pub async fn start_gateway(bind: &str, port: u16, config: &VoiraConfig) -> anyhow::Result<()> {
    let state = GatewayState::from_config(config).await;
    if !state.services.ingest.is_configured() {
        info!("POST /api/ingest will answer 500 until ingestion is configured");
    }
    let app = build_gateway_app(state);

    let listener = tokio::net::TcpListener::bind((bind, port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, version = env!("CARGO_PKG_VERSION"), "gateway listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_handler(State(state): State<GatewayState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": state.version,
        "ingestConfigured": state.services.ingest.is_configured(),
    }))
}
