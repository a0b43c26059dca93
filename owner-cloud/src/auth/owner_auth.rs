//! Owner JWT authentication for the management API

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Owner,
    Admin,
}

/// JWT claims issued by the identity service
#[derive(Debug, Serialize, Deserialize)]
pub struct OwnerClaims {
    /// User ID
    pub sub: String,
    pub role: Role,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated owner extracted from JWT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerIdentity {
    pub user_id: i64,
    pub role: Role,
}

const JWT_EXPIRY_HOURS: i64 = 24;

/// Sign a token the way the identity service does (tests and local tooling)
pub fn create_token(
    user_id: i64,
    role: Role,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = OwnerClaims {
        sub: user_id.to_string(),
        role,
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<OwnerClaims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    jsonwebtoken::decode::<OwnerClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

/// Verify a token and require the owner role
pub fn authenticate_owner(token: &str, secret: &str) -> Result<OwnerIdentity, AppError> {
    let claims = verify_token(token, secret).map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            ErrorKind::ExpiredSignature => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid or expired token"),
        }
    })?;

    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::invalid_token("Invalid subject claim"))?;

    if claims.role != Role::Owner {
        return Err(AppError::with_message(
            ErrorCode::RoleRequired,
            "Restaurant owner access required",
        ));
    }

    Ok(OwnerIdentity {
        user_id,
        role: claims.role,
    })
}

/// Middleware that extracts and verifies the owner JWT from the Authorization header
pub async fn owner_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::NotAuthenticated, "Missing Authorization header")
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::with_message(ErrorCode::NotAuthenticated, "Invalid Authorization format")
    })?;

    let identity = authenticate_owner(token, &state.jwt_secret)?;
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn owner_token_round_trip() {
        let token = create_token(77, Role::Owner, SECRET).unwrap();
        let identity = authenticate_owner(&token, SECRET).unwrap();
        assert_eq!(identity.user_id, 77);
        assert_eq!(identity.role, Role::Owner);
    }

    #[test]
    fn non_owner_role_is_forbidden() {
        let token = create_token(77, Role::User, SECRET).unwrap();
        let err = authenticate_owner(&token, SECRET).unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleRequired);
        assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_token(77, Role::Owner, SECRET).unwrap();
        let err = authenticate_owner(&token, "other").unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn expired_token_is_reported() {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = OwnerClaims {
            sub: "5".to_string(),
            role: Role::Owner,
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        let err = authenticate_owner(&token, SECRET).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenExpired);
    }
}
