use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::AppError;
use crate::store::Table;

#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Create and update share one input shape; update treats every field as
/// optional and leaves absent ones untouched.
#[derive(Deserialize)]
pub struct CustomerInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub struct CustomerState {
    pub customers: Table<Customer>,
    /// email → customer id. Claimed through the entry API so create and
    /// update enforce uniqueness atomically under concurrent requests.
    pub emails: DashMap<String, i64>,
}

impl CustomerState {
    pub fn new() -> Self {
        Self {
            customers: Table::new(),
            emails: DashMap::new(),
        }
    }
}

impl Default for CustomerState {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn list(State(state): State<Arc<CustomerState>>) -> Json<Vec<Customer>> {
    Json(state.customers.list())
}

pub async fn get_by_id(
    State(state): State<Arc<CustomerState>>,
    Path(id): Path<i64>,
) -> Result<Json<Customer>, AppError> {
    state
        .customers
        .get(id)
        .map(Json)
        .ok_or(AppError::NotFound("Customer"))
}

pub async fn create(
    State(state): State<Arc<CustomerState>>,
    Json(input): Json<CustomerInput>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let (name, email) = match (input.name, input.email) {
        (Some(n), Some(e)) if !n.is_empty() && !e.is_empty() => (n, e),
        _ => return Err(AppError::InvalidInput("name and email are required".into())),
    };

    // The entry claim is the atomicity point; a find-then-insert pair
    // would let concurrent creates of the same email both pass.
    let customer = match state.emails.entry(email.clone()) {
        Entry::Occupied(_) => {
            return Err(AppError::DuplicateIdentity("email already exists".into()))
        }
        Entry::Vacant(slot) => {
            let customer = state.customers.insert_with(|id| Customer {
                id,
                name: name.clone(),
                email: email.clone(),
                phone: input.phone.clone(),
                address: input.address.clone(),
            });
            slot.insert(customer.id);
            customer
        }
    };
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn update(
    State(state): State<Arc<CustomerState>>,
    Path(id): Path<i64>,
    Json(input): Json<CustomerInput>,
) -> Result<Json<Customer>, AppError> {
    let current = state.customers.get(id).ok_or(AppError::NotFound("Customer"))?;

    // An email change must claim the new address before the old one is
    // released; otherwise PUT could steal an email another record holds.
    if let Some(new_email) = &input.email {
        if *new_email != current.email {
            match state.emails.entry(new_email.clone()) {
                Entry::Occupied(_) => {
                    return Err(AppError::DuplicateIdentity("email already exists".into()))
                }
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
            state.emails.remove(&current.email);
        }
    }

    state
        .customers
        .update(id, |c| {
            if let Some(name) = input.name {
                c.name = name;
            }
            if let Some(email) = input.email {
                c.email = email;
            }
            if let Some(phone) = input.phone {
                c.phone = Some(phone);
            }
            if let Some(address) = input.address {
                c.address = Some(address);
            }
        })
        .map(Json)
        .ok_or(AppError::NotFound("Customer"))
}

pub async fn delete(
    State(state): State<Arc<CustomerState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = state
        .customers
        .remove(id)
        .ok_or(AppError::NotFound("Customer"))?;
    // free the address for reuse
    state.emails.remove(&removed.email);
    Ok(Json(json!({ "message": "Customer deleted successfully" })))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "Customer Service is running" }))
}

pub fn router(state: Arc<CustomerState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(list).post(create))
        .route("/:id", get(get_by_id).put(update).delete(delete))
        .with_state(state)
}
