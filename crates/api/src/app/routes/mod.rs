use axum::Router;

pub mod business;
pub mod crew;
pub mod registry;
pub mod system;

/// Routes that require a verified actor identity.
pub fn protected_router() -> Router {
    Router::new()
        .merge(crew::router())
        .merge(business::router())
        .merge(registry::protected_router())
}

/// Routes reachable without an actor (account creation).
pub fn public_router() -> Router {
    registry::public_router()
}
