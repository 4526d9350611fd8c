use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use entitle_auth::VerifiedIdentity;

use crate::app::errors;
use crate::app::services::AppServices;

/// Evaluate eligibility for the authenticated subject.
///
/// The subject comes from the verified identity, never from the request
/// body; anonymous callers get 401.
pub async fn check_eligibility(
    Extension(services): Extension<AppServices>,
    identity: Option<Extension<VerifiedIdentity>>,
    Path(content_id): Path<String>,
) -> axum::response::Response {
    let Some(Extension(identity)) = identity else {
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "authentication required",
        );
    };

    match services
        .engine
        .evaluate(identity.subject_id(), &content_id, Utc::now())
    {
        Ok(decision) => (StatusCode::OK, Json(decision)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
