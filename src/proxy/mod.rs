//! The gateway: a stateless path-prefix router in front of every
//! resource service. It authenticates nothing and owns no data; its
//! whole job is resolve → rewrite → forward → relay.

pub mod handler;
pub mod routes;
pub mod upstream;

use std::sync::Arc;

use axum::routing::{any, get};
use axum::{Json, Router};
use serde_json::json;

use handler::GatewayState;

pub fn router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .fallback(any(handler::proxy_handler))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "message": "API Gateway is running" }))
}
