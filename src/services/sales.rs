use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::AppError;
use crate::store::Table;

/// `customer_id` and `product_id` are soft references into the customer
/// and product services. They are stored exactly as given — no
/// cross-service existence check, by design.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i64,
    pub product_id: i64,
    pub customer_id: i64,
    pub quantity: i64,
    pub total: f64,
    pub status: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleInput {
    pub product_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub quantity: Option<i64>,
    pub total: Option<f64>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusInput {
    pub status: Option<String>,
}

pub struct SalesState {
    pub sales: Table<Sale>,
}

impl SalesState {
    pub fn new() -> Self {
        Self {
            sales: Table::new(),
        }
    }
}

impl Default for SalesState {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn list(State(state): State<Arc<SalesState>>) -> Json<Vec<Sale>> {
    Json(state.sales.list())
}

pub async fn get_by_id(
    State(state): State<Arc<SalesState>>,
    Path(id): Path<i64>,
) -> Result<Json<Sale>, AppError> {
    state
        .sales
        .get(id)
        .map(Json)
        .ok_or(AppError::NotFound("Sale"))
}

pub async fn create(
    State(state): State<Arc<SalesState>>,
    Json(input): Json<SaleInput>,
) -> Result<(StatusCode, Json<Sale>), AppError> {
    let (product_id, customer_id, quantity, total) =
        match (input.product_id, input.customer_id, input.quantity, input.total) {
            (Some(p), Some(c), Some(q), Some(t)) => (p, c, q, t),
            _ => {
                return Err(AppError::InvalidInput(
                    "productId, customerId, quantity and total are required".into(),
                ))
            }
        };

    let sale = state.sales.insert_with(|id| Sale {
        id,
        product_id,
        customer_id,
        quantity,
        total,
        status: input.status.clone().unwrap_or_else(|| "new".into()),
    });
    Ok((StatusCode::CREATED, Json(sale)))
}

/// PUT /:id/status — the only mutation a sale supports.
pub async fn update_status(
    State(state): State<Arc<SalesState>>,
    Path(id): Path<i64>,
    Json(input): Json<StatusInput>,
) -> Result<Json<Sale>, AppError> {
    let status = match input.status {
        Some(s) if !s.is_empty() => s,
        _ => return Err(AppError::InvalidInput("status is required".into())),
    };

    state
        .sales
        .update(id, |s| s.status = status)
        .map(Json)
        .ok_or(AppError::NotFound("Sale"))
}

/// GET /customer/:customerId — all sales recorded against one customer id.
/// The id is not checked against the customer service; an unknown customer
/// simply yields an empty list.
pub async fn by_customer(
    State(state): State<Arc<SalesState>>,
    Path(customer_id): Path<i64>,
) -> Json<Vec<Sale>> {
    Json(state.sales.filter(|s| s.customer_id == customer_id))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "Sales Service is running" }))
}

pub fn router(state: Arc<SalesState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(list).post(create))
        .route("/customer/:customer_id", get(by_customer))
        .route("/:id", get(get_by_id))
        .route("/:id/status", put(update_status))
        .with_state(state)
}
