//! Common routes: index, health, readiness, version, API docs (Swagger UI and raw OpenAPI JSON).

use crate::docs;
use crate::response::error_body;
use crate::sql::Statement;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

pub const DOCS_PATH: &str = "/api-docs";
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

const SWAGGER_UI_VERSION: &str = "5.17.14";

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    database: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyBody>) {
    match state.gateway.execute(&Statement::raw("SELECT 1")).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ReadyBody {
                status: "ok",
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!("readiness check failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyBody {
                    status: "degraded",
                    database: "unavailable",
                }),
            )
        }
    }
}

async fn version() -> Json<Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn index(State(state): State<AppState>) -> Json<Value> {
    let resources: Vec<String> = state
        .registry
        .resources()
        .iter()
        .map(|r| format!("/{}", r.path_segment))
        .collect();
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "resources": resources,
        "docs": OPENAPI_PATH
    }))
}

async fn openapi(State(state): State<AppState>) -> Json<utoipa::openapi::OpenApi> {
    Json(docs::openapi(&state.registry))
}

/// Swagger UI page, loaded from the swagger-ui-dist CDN and pointed at the generated document.
async fn swagger_ui() -> Html<String> {
    Html(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Resume API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@{v}/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@{v}/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({{ url: "{document}", dom_id: "#swagger-ui" }});
  </script>
</body>
</html>
"##,
        v = SWAGGER_UI_VERSION,
        document = OPENAPI_PATH
    ))
}

pub(crate) async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(error_body("not_found", "Route not found", None)))
}

/// GET /, /health, /ready, /version, /info, the API docs page and the OpenAPI document.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .route("/info", get(version))
        .route(DOCS_PATH, get(swagger_ui))
        .route(OPENAPI_PATH, get(openapi))
        .with_state(state)
}
