/// Environment-driven configuration shared by every service subcommand.
/// Loaded once at startup; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret for signing and verifying auth tokens.
    pub jwt_secret: String,
    /// Downstream base URLs the gateway routes to.
    pub auth_url: String,
    pub customer_url: String,
    pub product_url: String,
    pub sales_url: String,
    pub invoice_url: String,
    /// Total per-request bound on gateway → downstream calls, in seconds.
    pub upstream_timeout_secs: u64,
}

/// Dev-only token secret. Refused outright in production.
pub const INSECURE_SECRET_PLACEHOLDER: &str = "supersecretkey";

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let jwt_secret =
        std::env::var("JWT_SECRET").unwrap_or_else(|_| INSECURE_SECRET_PLACEHOLDER.into());

    if jwt_secret == INSECURE_SECRET_PLACEHOLDER {
        let env_mode = std::env::var("APP_ENV")
            .or_else(|_| std::env::var("RUST_ENV"))
            .unwrap_or_default();
        if env_mode == "production" {
            anyhow::bail!(
                "JWT_SECRET is still the insecure placeholder. \
                 Set a proper secret before running in production."
            );
        }
        eprintln!("⚠️  JWT_SECRET is not set — using insecure placeholder. Set a real secret for production.");
    }

    Ok(Config {
        jwt_secret,
        auth_url: std::env::var("AUTH_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8001".into()),
        customer_url: std::env::var("CUSTOMER_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8002".into()),
        product_url: std::env::var("PRODUCT_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8003".into()),
        sales_url: std::env::var("SALES_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8004".into()),
        invoice_url: std::env::var("INVOICE_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8005".into()),
        upstream_timeout_secs: std::env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5),
    })
}
