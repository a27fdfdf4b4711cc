use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use clap::Parser;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ordergate::auth::{self, AuthState};
use ordergate::proxy::handler::GatewayState;
use ordergate::proxy::routes::RouteTable;
use ordergate::proxy::upstream::UpstreamClient;
use ordergate::services::customer::CustomerState;
use ordergate::services::invoice::InvoiceState;
use ordergate::services::product::ProductState;
use ordergate::services::sales::SalesState;
use ordergate::services::{customer, invoice, product, sales};
use ordergate::{cli, config, proxy};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "ordergate=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = config::load()?;
    let args = cli::Cli::parse();

    let result = match args.command {
        Some(cli::Commands::Gateway { port }) => run_gateway(cfg, port).await,
        Some(cli::Commands::Auth { port }) => run_auth(cfg, port).await,
        Some(cli::Commands::Customer { port }) => {
            let state = Arc::new(CustomerState::new());
            serve(customer::router(state), port, "Customer Service").await
        }
        Some(cli::Commands::Product { port }) => {
            let state = Arc::new(ProductState::new());
            serve(product::router(state), port, "Product Service").await
        }
        Some(cli::Commands::Sales { port }) => {
            let state = Arc::new(SalesState::new());
            serve(sales::router(state), port, "Sales Service").await
        }
        Some(cli::Commands::Invoice { port }) => {
            let state = Arc::new(InvoiceState::new());
            serve(invoice::router(state), port, "Invoice Service").await
        }
        None => run_gateway(cfg, 8000).await,
    };

    if let Err(ref e) = result {
        eprintln!("Error: {:?}", e);
    }
    result
}

async fn run_gateway(cfg: config::Config, port: u16) -> anyhow::Result<()> {
    let upstream_timeout = Duration::from_secs(cfg.upstream_timeout_secs);
    let state = Arc::new(GatewayState {
        routes: RouteTable::from_config(&cfg),
        upstream: UpstreamClient::new(upstream_timeout)?,
        upstream_timeout,
    });

    let app = proxy::router(state)
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(axum::middleware::from_fn(security_headers_middleware));

    serve(app, port, "Gateway Service").await
}

async fn run_auth(cfg: config::Config, port: u16) -> anyhow::Result<()> {
    let state = Arc::new(AuthState::new(cfg.jwt_secret));
    serve(auth::router(state), port, "Auth Service").await
}

/// Bind and serve a service router with the shared middleware stack.
async fn serve(app: axum::Router, port: u16, name: &str) -> anyhow::Result<()> {
    let app = app
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(request_id_middleware));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("{} listening on {}", name, addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Middleware: injects a unique X-Request-Id into every response.
/// This allows clients to correlate errors with service logs.
async fn request_id_middleware(
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let req_id = uuid::Uuid::new_v4().to_string();
    let mut resp = next.run(req).await;
    if let Ok(val) = axum::http::HeaderValue::from_str(&req_id) {
        resp.headers_mut().insert("x-request-id", val);
    }
    resp
}

/// Middleware: security headers on every gateway response.
async fn security_headers_middleware(
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let mut resp = next.run(req).await;
    let headers = resp.headers_mut();

    headers.insert("X-Content-Type-Options", "nosniff".parse().unwrap());
    headers.insert("X-Frame-Options", "DENY".parse().unwrap());
    headers.insert("Referrer-Policy", "no-referrer".parse().unwrap());
    headers.remove("Server");

    resp
}
