use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use uuid::Uuid;

use entitle_core::LicenseRecord;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_licenses).post(create_license))
        .route(
            "/:content_id",
            get(get_license).put(update_license).delete(delete_license),
        )
}

pub async fn list_licenses(Extension(services): Extension<AppServices>) -> axum::response::Response {
    match services.engine.get_all_licenses() {
        Ok(licenses) => (StatusCode::OK, Json(licenses)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_license(
    Extension(services): Extension<AppServices>,
    Path(content_id): Path<String>,
) -> axum::response::Response {
    match services.engine.get_license(&content_id) {
        Ok(license) => (StatusCode::OK, Json(license)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_license(
    Extension(services): Extension<AppServices>,
    Json(body): Json<dto::CreateLicenseRequest>,
) -> axum::response::Response {
    match services
        .engine
        .create_license(&body.content_id, &body.subject_id)
    {
        Ok(license) => (StatusCode::CREATED, Json(license)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_license(
    Extension(services): Extension<AppServices>,
    Path(content_id): Path<String>,
    Json(body): Json<dto::UpdateLicenseRequest>,
) -> axum::response::Response {
    // Placeholder id/created_at; the engine preserves the stored ones.
    let input = LicenseRecord {
        id: Uuid::nil(),
        content_id,
        owner_subject_id: body.owner_subject_id,
        created_at: Utc::now(),
        expiry_at: body.expiry_at,
    };

    match services.engine.update_license(input) {
        Ok(license) => (StatusCode::OK, Json(license)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_license(
    Extension(services): Extension<AppServices>,
    Path(content_id): Path<String>,
) -> axum::response::Response {
    match services.engine.delete_license(&content_id) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "deleted": content_id })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
