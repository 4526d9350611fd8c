//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store construction and engine wiring
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs
//! - `errors.rs`: consistent error responses

use axum::{Router, routing::get};
use std::sync::Arc;
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, build_services};

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(jwt_secret: String) -> Router {
    build_app_with_services(jwt_secret, build_services())
}

/// Build the router around externally constructed services.
///
/// Tests and embedders use this to seed identity/rule data before serving
/// (provisioning has no HTTP surface here).
pub fn build_app_with_services(jwt_secret: String, services: AppServices) -> Router {
    let verifier = Arc::new(entitle_auth::Hs256TokenVerifier::new(jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState { verifier };

    // Everything behind the authenticator; it passes anonymous requests
    // through and only rejects failed bearer credentials.
    let authenticated = Router::new()
        .nest("/licenses", routes::licenses::router())
        .route(
            "/eligibility/:content_id",
            get(routes::eligibility::check_eligibility),
        )
        .route("/whoami", get(routes::system::whoami))
        .layer(axum::Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(authenticated)
        .layer(ServiceBuilder::new())
}
