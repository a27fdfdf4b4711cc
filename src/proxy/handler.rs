use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::Response;

use crate::errors::AppError;
use crate::proxy::routes::RouteTable;
use crate::proxy::upstream::UpstreamClient;

/// Per-process gateway state: the immutable routing table and the shared
/// downstream HTTP client. The gateway holds no business data.
pub struct GatewayState {
    pub routes: RouteTable,
    pub upstream: UpstreamClient,
    /// Mirrors the client timeout; used as an outer safety net.
    pub upstream_timeout: Duration,
}

/// The fallback handler for every proxied request.
///
/// Resolves the path against the route table, strips the matched prefix,
/// forwards method/headers/body/query to the downstream and relays its
/// response without inspecting or rewriting the body. Downstream errors
/// pass through as-is; only reachability failures become gateway errors.
#[tracing::instrument(skip(state, headers, body), fields(method = %method, path = %uri.path()))]
pub async fn proxy_handler(
    State(state): State<Arc<GatewayState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let path = uri.path();
    let (route, rewritten) = state
        .routes
        .resolve(path)
        .ok_or_else(|| AppError::RouteNotFound(path.to_string()))?;

    let base = route.target.trim_end_matches('/');
    let target_url = match uri.query() {
        Some(q) => format!("{}{}?{}", base, rewritten, q),
        None => format!("{}{}", base, rewritten),
    };

    // Carry request headers over, minus Host and connection framing,
    // which the downstream client sets itself.
    let mut upstream_headers = reqwest::header::HeaderMap::new();
    for (name, value) in headers.iter() {
        if is_request_hop_header(name.as_str()) {
            continue;
        }
        if let Ok(n) = reqwest::header::HeaderName::from_bytes(name.as_str().as_bytes()) {
            if let Ok(v) = reqwest::header::HeaderValue::from_bytes(value.as_bytes()) {
                upstream_headers.insert(n, v);
            }
        }
    }

    let reqwest_method = reqwest::Method::from_bytes(method.as_str().as_bytes())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid method: {}", e)))?;

    tracing::debug!(target = %target_url, "forwarding request");

    // The client enforces its own timeout; the outer wrapper guarantees the
    // handler can never hang past the bound even if the client misbehaves.
    let upstream_resp = match tokio::time::timeout(
        state.upstream_timeout + Duration::from_secs(2),
        state
            .upstream
            .forward(reqwest_method, &target_url, upstream_headers, body.to_vec()),
    )
    .await
    {
        Ok(res) => res?,
        Err(_) => return Err(AppError::UpstreamTimeout),
    };

    let status = upstream_resp.status();
    let resp_headers = upstream_resp.headers().clone();
    let resp_body = upstream_resp
        .bytes()
        .await
        .map_err(|e| AppError::Upstream(format!("upstream body read failed: {}", e)))?;

    let axum_status = axum::http::StatusCode::from_u16(status.as_u16())
        .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);

    let mut response = Response::builder().status(axum_status);
    for (key, value) in resp_headers.iter() {
        // Framing headers are recomputed for the relayed body.
        if matches!(
            key.as_str(),
            "content-length" | "transfer-encoding" | "connection"
        ) {
            continue;
        }
        if let Ok(name) = axum::http::HeaderName::from_bytes(key.as_str().as_bytes()) {
            if let Ok(val) = axum::http::HeaderValue::from_bytes(value.as_bytes()) {
                response = response.header(name, val);
            }
        }
    }

    response
        .body(Body::from(resp_body))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("response build failed: {}", e)))
}

fn is_request_hop_header(name: &str) -> bool {
    matches!(
        name,
        "host"
            | "content-length"
            | "transfer-encoding"
            | "connection"
            | "upgrade"
            | "keep-alive"
            | "expect"
    )
}
