pub mod posts;

use axum::{
    http::{HeaderValue, StatusCode},
    routing::{get, put},
    Json, Router,
};
use configs::{AppConfig, CorsConfig};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::observability;
use crate::openapi::{ApiDoc, OPENAPI_JSON_PATH, SWAGGER_UI_PATH};
use crate::state::AppState;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn metrics() -> (StatusCode, String) {
    observability::encode_metrics()
}

/// CORS for `/api/*`: any origin when the list holds `*`, otherwise exactly the listed ones.
pub fn build_cors(cfg: &CorsConfig) -> CorsLayer {
    let origin = if cfg.allows_any() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = cfg
            .allowed_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o.trim()) {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the full application router: post API (with CORS), docs, health and metrics.
pub fn build_router(state: AppState, cfg: &AppConfig) -> Router {
    let mut api = Router::new()
        .route("/api/posts", get(posts::list).post(posts::create))
        .route("/api/posts/search", get(posts::search))
        .route("/api/posts/:id", put(posts::update).delete(posts::delete));

    if cfg.docs.enabled {
        api = api.merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi()));
    }

    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics));

    public
        .merge(api.layer(build_cors(&cfg.cors)))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
