//! Authentication Middleware
//!
//! JWT validation middleware. Token issuance belongs to the external
//! account service; this middleware only validates bearer tokens signed
//! with the shared secret.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;
use crate::startup::AppState;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// Authenticated caller extension
#[derive(Debug, Clone, Copy)]
pub struct AuthAccount {
    pub account_id: i64,
}

/// The caller's identity as seen by routes that accept both
/// authenticated and anonymous requests. Inserted by
/// [`optional_auth_middleware`] on every request it passes through.
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuthAccount(pub Option<AuthAccount>);

fn decode_bearer(state: &AppState, auth_header: &str) -> Result<AuthAccount, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header format".into()))?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.settings.jwt.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("Token expired".into())
        }
        _ => AppError::Unauthorized("Invalid token".into()),
    })?;

    let account_id: i64 = token_data
        .claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid token claims".into()))?;

    Ok(AuthAccount { account_id })
}

/// Authentication middleware that requires a valid JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".into()))?
        .to_owned();

    let account = decode_bearer(&state, &auth_header)?;
    request.extensions_mut().insert(account);

    Ok(next.run(request).await)
}

/// Optional authentication middleware: attaches the caller's identity
/// when a valid token is present and passes anonymous requests through.
/// The listing endpoint's capability check decides whether anonymity is
/// acceptable for the requested filters.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let account = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|header| decode_bearer(&state, header).ok());

    request.extensions_mut().insert(MaybeAuthAccount(account));

    next.run(request).await
}
