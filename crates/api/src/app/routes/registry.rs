//! Registration routes: users, businesses, job postings.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::json;

use crewmarket_accounts::EmailAddress;
use crewmarket_core::BusinessId;
use crewmarket_infra::{NewBusiness, NewJob, NewUser};

use crate::app::{dto, errors, services::AppServices};
use crate::context::ActorContext;

/// Account creation is the system's entrypoint and carries no actor yet.
pub fn public_router() -> Router {
    Router::new()
        .route("/users", post(register_user))
        .route("/business", post(register_business))
}

/// Posting a job requires an authenticated business member.
pub fn protected_router() -> Router {
    Router::new().route("/jobs", post(post_job))
}

pub async fn register_user(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterUserRequest>,
) -> axum::response::Response {
    let email = match EmailAddress::parse(&body.email) {
        Ok(email) => email,
        Err(e) => return errors::transition_error_to_response(e.into()),
    };

    let mut roles = Vec::with_capacity(body.roles.len());
    for raw in &body.roles {
        match errors::parse_role(raw) {
            Ok(role) => roles.push(role),
            Err(resp) => return resp,
        }
    }

    let business = match body.business_id.as_deref() {
        Some(raw) => match raw.parse::<BusinessId>() {
            Ok(id) => Some(id),
            Err(_) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_id",
                    "invalid business id",
                )
            }
        },
        None => None,
    };

    match services.marketplace.register_user(NewUser {
        username: body.username,
        email,
        roles,
        business,
    }) {
        Ok(user) => (StatusCode::CREATED, Json(json!({ "user": user }))).into_response(),
        Err(e) => errors::transition_error_to_response(e),
    }
}

pub async fn register_business(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterBusinessRequest>,
) -> axum::response::Response {
    let contact_email = match EmailAddress::parse(&body.contact_email) {
        Ok(email) => email,
        Err(e) => return errors::transition_error_to_response(e.into()),
    };

    match services.marketplace.register_business(NewBusiness {
        name: body.name,
        contact_email,
    }) {
        Ok(business) => {
            (StatusCode::CREATED, Json(json!({ "business": business }))).into_response()
        }
        Err(e) => errors::transition_error_to_response(e),
    }
}

pub async fn post_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Json(body): Json<dto::PostJobRequest>,
) -> axum::response::Response {
    let business_id: BusinessId = match body.business_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid business id")
        }
    };

    match services.marketplace.post_job(
        actor.user_id(),
        NewJob {
            business_id,
            title: body.title,
            job_function: body.job_function,
        },
    ) {
        Ok(job) => (StatusCode::CREATED, Json(json!({ "job": job }))).into_response(),
        Err(e) => errors::transition_error_to_response(e),
    }
}
