//! REST API routes configuration

use crate::api::handlers::{self, ApiState};
use axum::{
    body::Body,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Fallback handler for unknown routes
async fn fallback_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "application/json")],
        Body::from(r#"{"error":"Not Found"}"#),
    )
        .into_response()
}

/// Create the API router with all routes
pub fn create_router(state: ApiState) -> Router {
    // Configure CORS for browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Stateless recommendation
        .route("/api/recommend", post(handlers::recommend))
        // Sessions
        .route(
            "/api/sessions",
            get(handlers::list_sessions).post(handlers::create_session),
        )
        .route(
            "/api/sessions/{id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/api/sessions/{id}/config", put(handlers::set_config))
        .route(
            "/api/sessions/{id}/distribution",
            put(handlers::set_distribution),
        )
        .route(
            "/api/sessions/{id}/validate",
            post(handlers::validate_distribution),
        )
        .route("/api/sessions/{id}/score", get(handlers::get_score))
        .route("/api/sessions/{id}/summary", get(handlers::get_summary))
        .route(
            "/api/sessions/{id}/keys/{key}/sign",
            post(handlers::sign_key),
        )
        .fallback(fallback_handler)
        // Add state and middleware
        .with_state(state)
        .layer(cors)
}

/// Route table printed by the `api start` command
pub const ENDPOINTS: &[(&str, &str, &str)] = &[
    ("GET", "/health", "Health check"),
    ("POST", "/api/recommend", "Recommend a configuration"),
    ("GET", "/api/sessions", "List sessions"),
    ("POST", "/api/sessions", "Start a session"),
    ("GET", "/api/sessions/{id}", "Session details"),
    ("DELETE", "/api/sessions/{id}", "End a session"),
    ("PUT", "/api/sessions/{id}/config", "Set M-of-N configuration"),
    ("PUT", "/api/sessions/{id}/distribution", "Store key distribution"),
    ("POST", "/api/sessions/{id}/validate", "Validate a distribution"),
    ("GET", "/api/sessions/{id}/score", "Security score"),
    ("GET", "/api/sessions/{id}/summary", "Configuration summary"),
    ("POST", "/api/sessions/{id}/keys/{key}/sign", "Simulate a signature"),
];
