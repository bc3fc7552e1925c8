//! Local development server: serves the static front end and mounts the
//! coaching pipeline at `/api/coach`, mirroring the serverless deployment.
//! Run: cargo run --bin dev-server, then open http://127.0.0.1:3000

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use coach_api::{
    http::{cors::cors_headers, handle},
    telemetry, CoachConfig, CoachService,
};
use tower_http::services::ServeDir;

const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let service = Arc::new(CoachService::from_config(CoachConfig::from_env()));
    let static_dir = std::env::var("PUBLIC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(
        %addr,
        static_dir = %static_dir.display(),
        api_key_configured = service.is_configured(),
        "coach dev server listening"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(service, static_dir)).await?;
    Ok(())
}

fn app(service: Arc<CoachService>, static_dir: PathBuf) -> Router {
    Router::new()
        .route("/api/coach", any(coach))
        .route("/health", get(health))
        .with_state(service)
        .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
}

async fn coach(
    State(service): State<Arc<CoachService>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let reply = handle(&service, method.as_str(), content_type, &body).await;

    let mut builder = axum::http::Response::builder().status(reply.status);
    for (name, value) in cors_headers(&service.config().allowed_origin) {
        builder = builder.header(name, value);
    }
    let built = match reply.body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string())),
        None => builder.body(Body::empty()),
    };
    built.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to build coach response");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}

async fn health(State(service): State<Arc<CoachService>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "OK",
        "apiKeyConfigured": service.is_configured(),
    }))
}
