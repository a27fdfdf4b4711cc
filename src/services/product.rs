use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::AppError;
use crate::store::Table;

/// Stock defaults to 0 when omitted on create.
pub const DEFAULT_STOCK: i64 = 0;
/// Per-record reorder trigger; create default when omitted.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub image_url: Option<String>,
    pub low_stock_threshold: i64,
}

impl Product {
    /// Per-row predicate, boundary inclusive: a product sitting exactly
    /// at its own threshold counts as low stock.
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub image_url: Option<String>,
    pub low_stock_threshold: Option<i64>,
}

pub struct ProductState {
    pub products: Table<Product>,
}

impl ProductState {
    pub fn new() -> Self {
        Self {
            products: Table::new(),
        }
    }
}

impl Default for ProductState {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn list(State(state): State<Arc<ProductState>>) -> Json<Vec<Product>> {
    Json(state.products.list())
}

/// GET /low-stock — every product at or below its own threshold.
pub async fn low_stock(State(state): State<Arc<ProductState>>) -> Json<Vec<Product>> {
    Json(state.products.filter(Product::is_low_stock))
}

pub async fn get_by_id(
    State(state): State<Arc<ProductState>>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, AppError> {
    state
        .products
        .get(id)
        .map(Json)
        .ok_or(AppError::NotFound("Product"))
}

pub async fn create(
    State(state): State<Arc<ProductState>>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let (name, price) = match (input.name, input.price) {
        (Some(n), Some(p)) if !n.is_empty() => (n, p),
        _ => return Err(AppError::InvalidInput("name and price are required".into())),
    };

    let product = state.products.insert_with(|id| Product {
        id,
        name: name.clone(),
        description: input.description.clone(),
        price,
        stock: input.stock.unwrap_or(DEFAULT_STOCK),
        image_url: input.image_url.clone(),
        low_stock_threshold: input
            .low_stock_threshold
            .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD),
    });
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update(
    State(state): State<Arc<ProductState>>,
    Path(id): Path<i64>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Product>, AppError> {
    state
        .products
        .update(id, |p| {
            if let Some(name) = input.name {
                p.name = name;
            }
            if let Some(description) = input.description {
                p.description = Some(description);
            }
            if let Some(price) = input.price {
                p.price = price;
            }
            if let Some(stock) = input.stock {
                p.stock = stock;
            }
            if let Some(image_url) = input.image_url {
                p.image_url = Some(image_url);
            }
            if let Some(threshold) = input.low_stock_threshold {
                p.low_stock_threshold = threshold;
            }
        })
        .map(Json)
        .ok_or(AppError::NotFound("Product"))
}

pub async fn delete(
    State(state): State<Arc<ProductState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .products
        .remove(id)
        .ok_or(AppError::NotFound("Product"))?;
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "Product Service is running" }))
}

pub fn router(state: Arc<ProductState>) -> Router {
    // "/low-stock" is a static segment, so axum matches it ahead of "/:id".
    Router::new()
        .route("/health", get(health))
        .route("/low-stock", get(low_stock))
        .route("/", get(list).post(create))
        .route("/:id", get(get_by_id).put(update).delete(delete))
        .with_state(state)
}
