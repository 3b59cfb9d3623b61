//! Route assembly: common routes, resource routes, and the request-rate and body-size caps.

pub mod common;
pub mod resource;

pub use common::{common_routes, DOCS_PATH, OPENAPI_PATH};
pub use resource::resource_routes;

use crate::response::error_body;
use crate::state::AppState;
use axum::{error_handling::HandleErrorLayer, http::StatusCode, Json, Router};
use serde_json::Value;
use std::time::Duration;
use tower::{
    buffer::BufferLayer, limit::RateLimitLayer, load_shed::error::Overloaded,
    load_shed::LoadShedLayer, BoxError, ServiceBuilder,
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

const RATE_WINDOW: Duration = Duration::from_secs(60);
const BUFFER_CAPACITY: usize = 1024;

#[derive(Clone, Copy, Debug)]
pub struct Limits {
    pub requests_per_minute: u64,
    pub body_limit_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            requests_per_minute: 100,
            body_limit_bytes: 64 * 1024,
        }
    }
}

/// Full application router. The rate limit wraps the whole inner router as one service so
/// every route draws from the same budget; requests over budget are shed with 429.
/// Must be called inside a tokio runtime (the buffer spawns its worker).
pub fn app(state: AppState, limits: Limits) -> Router {
    let inner = common_routes(state.clone())
        .merge(resource_routes(state))
        .fallback(common::not_found);
    let limited = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .layer(BufferLayer::new(BUFFER_CAPACITY))
        .layer(LoadShedLayer::new())
        .layer(RateLimitLayer::new(limits.requests_per_minute, RATE_WINDOW))
        .service(inner);
    Router::new()
        .fallback_service(limited)
        .layer(RequestBodyLimitLayer::new(limits.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, Json<Value>) {
    if err.is::<Overloaded>() {
        tracing::warn!("rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(error_body("rate_limited", "Too many requests", None)),
        );
    }
    tracing::error!("middleware error: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(error_body("internal_error", "An internal error occurred", None)),
    )
}
