use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Tokens are valid for one hour from issuance.
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Claims carried in an issued token. Self-contained: verification needs
/// only the shared secret, no session store. There is no revocation list;
/// a deleted user's unexpired token stays cryptographically valid and is
/// only caught by the validate endpoint's existence check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: i64,
    pub email: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Mint an HS256 token for the given identity.
pub fn issue(user_id: i64, email: &str, secret: &str) -> Result<String, AppError> {
    issue_at(user_id, email, Utc::now().timestamp(), secret)
}

/// Mint with an explicit issue time. Exposed so tests can construct
/// already-expired tokens.
pub fn issue_at(user_id: i64, email: &str, iat: i64, secret: &str) -> Result<String, AppError> {
    let claims = Claims {
        user_id,
        email: email.to_string(),
        iat,
        exp: iat + TOKEN_TTL_SECS,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to encode token: {}", e)))
}

/// Verify signature and expiry; any failure collapses to `InvalidToken`
/// so callers learn nothing about why a bad token is bad.
pub fn verify(token: &str, secret: &str) -> Result<Claims, AppError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issue_then_verify_round_trips_identity() {
        let token = issue(7, "a@x.com", SECRET).unwrap();
        let claims = verify(&token, SECRET).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn expired_token_is_rejected() {
        // well past expiry plus the verifier's default leeway
        let iat = Utc::now().timestamp() - TOKEN_TTL_SECS - 300;
        let token = issue_at(7, "a@x.com", iat, SECRET).unwrap();
        assert!(matches!(verify(&token, SECRET), Err(AppError::InvalidToken)));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = issue(7, "a@x.com", "other-secret").unwrap();
        assert!(matches!(verify(&token, SECRET), Err(AppError::InvalidToken)));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = issue(7, "a@x.com", SECRET).unwrap();
        // flip a character in the payload segment
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let mut payload: Vec<u8> = parts[1].clone().into_bytes();
        payload[0] = if payload[0] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).unwrap();
        let tampered = parts.join(".");
        assert!(matches!(verify(&tampered, SECRET), Err(AppError::InvalidToken)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(verify("not-a-token", SECRET), Err(AppError::InvalidToken)));
    }

    #[test]
    fn claims_serialize_with_wire_field_names() {
        let claims = Claims {
            user_id: 3,
            email: "b@x.com".into(),
            iat: 100,
            exp: 3700,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userId"], 3);
        assert_eq!(json["email"], "b@x.com");
    }
}
