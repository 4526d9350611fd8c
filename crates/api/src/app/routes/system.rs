use axum::{Extension, Json, http::StatusCode, response::IntoResponse};

use entitle_auth::VerifiedIdentity;

use crate::app::errors;

pub async fn health() -> axum::response::Response {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" }))).into_response()
}

/// Echo the verified identity; 401 when anonymous.
pub async fn whoami(identity: Option<Extension<VerifiedIdentity>>) -> axum::response::Response {
    let Some(Extension(identity)) = identity else {
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "authentication required",
        );
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "subject_id": identity.subject_id(),
            "expires_at": identity.claims().expires_at,
        })),
    )
        .into_response()
}
