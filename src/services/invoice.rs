use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::AppError;
use crate::store::Table;

/// `sale_id` is a soft reference into the sales service, stored as given.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: i64,
    pub sale_id: i64,
    pub amount: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceInput {
    pub sale_id: Option<i64>,
    pub amount: Option<f64>,
}

pub struct InvoiceState {
    pub invoices: Table<Invoice>,
}

impl InvoiceState {
    pub fn new() -> Self {
        Self {
            invoices: Table::new(),
        }
    }
}

impl Default for InvoiceState {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn list(State(state): State<Arc<InvoiceState>>) -> Json<Vec<Invoice>> {
    Json(state.invoices.list())
}

pub async fn get_by_id(
    State(state): State<Arc<InvoiceState>>,
    Path(id): Path<i64>,
) -> Result<Json<Invoice>, AppError> {
    state
        .invoices
        .get(id)
        .map(Json)
        .ok_or(AppError::NotFound("Invoice"))
}

pub async fn create(
    State(state): State<Arc<InvoiceState>>,
    Json(input): Json<InvoiceInput>,
) -> Result<(StatusCode, Json<Invoice>), AppError> {
    let (sale_id, amount) = match (input.sale_id, input.amount) {
        (Some(s), Some(a)) => (s, a),
        _ => {
            return Err(AppError::InvalidInput(
                "saleId and amount are required".into(),
            ))
        }
    };

    let invoice = state.invoices.insert_with(|id| Invoice {
        id,
        sale_id,
        amount,
    });
    Ok((StatusCode::CREATED, Json(invoice)))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "Invoice Service is running" }))
}

pub fn router(state: Arc<InvoiceState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(list).post(create))
        .route("/:id", get(get_by_id))
        .with_state(state)
}
