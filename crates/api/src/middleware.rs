use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use entitle_auth::{AuthError, TokenVerifier, VerifiedIdentity};

use crate::app::errors;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
}

/// Bearer-token authentication.
///
/// - No `Authorization` header, or one that is not `Bearer <token>` shaped:
///   the request proceeds anonymous, with no identity attached.
/// - A present bearer token that fails verification terminates the request
///   with 401 before any handler runs (fail-closed).
/// - A verified token attaches [`VerifiedIdentity`] to the request
///   extensions for exactly this request.
///
/// The raw token value is never logged.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if let Some(token) = extract_bearer(req.headers()) {
        match state.verifier.verify(token, Utc::now()) {
            Ok(claims) => {
                req.extensions_mut().insert(VerifiedIdentity::new(claims));
            }
            Err(err) => return reject(err),
        }
    }

    next.run(req).await
}

/// Pull the token out of a well-formed `Bearer` header; anything else is
/// treated as no credential at all.
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() { None } else { Some(token) }
}

fn reject(err: AuthError) -> Response {
    let code = match &err {
        AuthError::InvalidToken => {
            tracing::warn!("rejected bearer token: invalid");
            "invalid_token"
        }
        AuthError::TokenExpired => {
            tracing::warn!("rejected bearer token: expired");
            "token_expired"
        }
        AuthError::Unverifiable(detail) => {
            tracing::error!(%detail, "token verification failed unexpectedly");
            "unverifiable"
        }
    };

    errors::json_error(StatusCode::UNAUTHORIZED, code, err.to_string())
}
