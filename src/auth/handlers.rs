use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::{password, token};
use crate::errors::AppError;
use crate::store::Table;

/// A stored credential. The hash never leaves this service: `User` is not
/// serializable, and responses go through `UserSummary`.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
}

pub struct AuthState {
    pub users: Table<User>,
    /// email → user id. Uniqueness is enforced through this index: an
    /// email is claimed atomically via the map's entry API before the
    /// (slow) password hash runs, so concurrent registrations of the
    /// same address cannot both pass a check-then-insert window.
    pub emails: DashMap<String, i64>,
    pub jwt_secret: String,
}

impl AuthState {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            users: Table::new(),
            emails: DashMap::new(),
            jwt_secret: jwt_secret.into(),
        }
    }
}

// ── Request / Response DTOs ──────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public-safe view of a user: id, email, name — never the hash.
#[derive(Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

// ── Handlers ─────────────────────────────────────────────────

/// POST /register — create a credential if the email is free.
pub async fn register(
    State(state): State<Arc<AuthState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let (email, plain) = match (req.email, req.password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => {
            return Err(AppError::InvalidInput(
                "email and password are required".into(),
            ))
        }
    };

    // Claim the email before hashing; the entry operation is the
    // atomicity point, and hashing takes long enough for a plain
    // check-then-insert to race.
    match state.emails.entry(email.clone()) {
        Entry::Occupied(_) => {
            return Err(AppError::DuplicateIdentity("user already exists".into()))
        }
        Entry::Vacant(slot) => {
            slot.insert(0);
        }
    }

    let password_hash = match password::hash(&plain) {
        Ok(h) => h,
        Err(e) => {
            // release the claim so the address stays usable
            state.emails.remove(&email);
            return Err(e);
        }
    };
    let user = state.users.insert_with(|id| User {
        id,
        email: email.clone(),
        password_hash,
        name: req.name.clone(),
    });
    state.emails.insert(email, user.id);

    tracing::info!(user_id = user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".into(),
            user_id: user.id,
        }),
    ))
}

/// POST /login — exchange credentials for a one-hour token.
///
/// Unknown email and wrong password return the identical error, so the
/// endpoint cannot be used to probe which addresses are registered.
pub async fn login(
    State(state): State<Arc<AuthState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (email, plain) = match (req.email, req.password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => {
            return Err(AppError::InvalidInput(
                "email and password are required".into(),
            ))
        }
    };

    let user = state
        .users
        .find(|u| u.email == email)
        .ok_or(AppError::InvalidCredentials)?;

    if !password::verify(&plain, &user.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let token = token::issue(user.id, &user.email, &state.jwt_secret)?;
    Ok(Json(LoginResponse {
        token,
        user: UserSummary {
            id: user.id,
            email: user.email,
            name: user.name,
        },
    }))
}

/// POST /validate — verification oracle for the gateway and peer services.
///
/// Beyond signature and expiry, the decoded userId must still resolve to a
/// stored credential: there is no revocation list, so this existence check
/// is what bounds the blast radius of a token outliving its account.
pub async fn validate(
    State(state): State<Arc<AuthState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let bearer = extract_bearer_token(&headers)?;
    let claims = token::verify(&bearer, &state.jwt_secret)?;

    if state.users.get(claims.user_id).is_none() {
        return Err(AppError::IdentityNotFound);
    }

    Ok(Json(json!({ "valid": true, "user": claims })))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "Auth Service is running" }))
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::InvalidToken)?;

    let token = auth.strip_prefix("Bearer ").ok_or(AppError::InvalidToken)?;
    if token.trim().is_empty() {
        return Err(AppError::InvalidToken);
    }
    Ok(token.trim().to_string())
}

pub fn router(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/validate", post(validate))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_extraction_requires_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Token abc".parse().unwrap());
        assert!(extract_bearer_token(&headers).is_err());

        headers.insert("authorization", "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_authorization_header_is_invalid_token() {
        let headers = HeaderMap::new();
        assert!(matches!(
            extract_bearer_token(&headers),
            Err(AppError::InvalidToken)
        ));
    }
}
