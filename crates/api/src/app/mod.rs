//! HTTP API application wiring (Axum router + service wiring).
//!
//! Folder structure:
//! - `services.rs`: infrastructure wiring (store, delivery channel, marketplace)
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: Arc<services::AppServices>) -> Router {
    // Protected routes: require a verified actor identity.
    let protected = routes::protected_router()
        .layer(axum::middleware::from_fn(middleware::actor_middleware));

    let api = routes::public_router()
        .merge(protected)
        .layer(Extension(services));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/v1", api)
}
