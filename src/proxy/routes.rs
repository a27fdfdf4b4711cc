use crate::config::Config;

/// One gateway routing rule: requests whose path starts with `prefix`
/// are forwarded to `target` with the prefix removed.
#[derive(Debug, Clone)]
pub struct Route {
    pub prefix: String,
    pub target: String,
}

/// Static path-prefix → downstream routing table.
///
/// Built once at startup and never mutated, so lookups need no locking.
/// When prefixes nest (e.g. `/products` and `/products/admin`), the
/// longest prefix wins: entries are sorted by descending prefix length
/// and matching stops at the first hit.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(mut routes: Vec<Route>) -> Self {
        routes.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        Self { routes }
    }

    /// The default table: one resource service per top-level path segment.
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(vec![
            Route { prefix: "/auth".into(), target: cfg.auth_url.clone() },
            Route { prefix: "/customers".into(), target: cfg.customer_url.clone() },
            Route { prefix: "/products".into(), target: cfg.product_url.clone() },
            Route { prefix: "/sales".into(), target: cfg.sales_url.clone() },
            Route { prefix: "/invoices".into(), target: cfg.invoice_url.clone() },
        ])
    }

    /// Find the route for `path` and rewrite the path by stripping the
    /// prefix exactly once. An empty remainder becomes `/`.
    pub fn resolve(&self, path: &str) -> Option<(&Route, String)> {
        let route = self
            .routes
            .iter()
            .find(|r| prefix_matches(&r.prefix, path))?;
        let rest = &path[route.prefix.len()..];
        let rewritten = if rest.is_empty() { "/".to_string() } else { rest.to_string() };
        Some((route, rewritten))
    }
}

/// A prefix only matches on a segment boundary: `/customers` matches
/// `/customers` and `/customers/5`, never `/customersX`.
fn prefix_matches(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
