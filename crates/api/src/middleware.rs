use axum::{
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use crewmarket_core::UserId;

use crate::context::ActorContext;

/// Header carrying the verified actor id, set by the authenticating gateway.
const ACTOR_HEADER: &str = "x-user-id";

pub async fn actor_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let actor = extract_actor(req.headers())?;

    req.extensions_mut().insert(ActorContext::new(actor));

    Ok(next.run(req).await)
}

fn extract_actor(headers: &HeaderMap) -> Result<UserId, StatusCode> {
    let header = headers.get(ACTOR_HEADER).ok_or(StatusCode::UNAUTHORIZED)?;

    let value = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    value
        .trim()
        .parse::<UserId>()
        .map_err(|_| StatusCode::UNAUTHORIZED)
}
