//! Business-facing routes: reviewing applications, offering jobs, invitations.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::json;

use crewmarket_accounts::EmailAddress;
use crewmarket_core::{ApplicationId, BusinessId, JobId};
use crewmarket_notify::DeliveryStatus;

use crate::app::{dto, errors, services::AppServices};
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route("/business/crew/active", get(active_crew))
        .route("/business/jobs/:id/offer", post(offer_job))
        .route("/business/applications/:id/accept", patch(accept_application))
        .route("/business/applications/:id/reject", patch(reject_application))
        .route("/business/:id/applications", get(list_applications))
        .route("/business/:id/invite", post(invite_employee))
}

fn parse_business_id(raw: &str) -> Result<BusinessId, axum::response::Response> {
    raw.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid business id")
    })
}

pub async fn list_applications(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let business_id = match parse_business_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services
        .marketplace
        .list_business_applications(actor.user_id(), business_id)
    {
        Ok(applications) => {
            (StatusCode::OK, Json(json!({ "applications": applications }))).into_response()
        }
        Err(e) => errors::transition_error_to_response(e),
    }
}

pub async fn offer_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::OfferJobRequest>,
) -> axum::response::Response {
    let job_id: JobId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid job id")
        }
    };

    let email = match EmailAddress::parse(&body.email) {
        Ok(email) => email,
        Err(e) => return errors::transition_error_to_response(e.into()),
    };

    match services
        .marketplace
        .offer_job(job_id, actor.user_id(), &email)
    {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "message": "job offered successfully",
                "data": { "job": outcome.value },
                "notification": outcome.delivery,
            })),
        )
            .into_response(),
        Err(e) => errors::transition_error_to_response(e),
    }
}

pub async fn accept_application(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let application_id: ApplicationId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid application id",
            )
        }
    };

    match services
        .marketplace
        .accept_application(application_id, actor.user_id())
    {
        Ok(application) => (
            StatusCode::OK,
            Json(json!({
                "message": "application accepted successfully",
                "application": application,
            })),
        )
            .into_response(),
        Err(e) => errors::transition_error_to_response(e),
    }
}

pub async fn reject_application(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let application_id: ApplicationId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid application id",
            )
        }
    };

    match services
        .marketplace
        .reject_application(application_id, actor.user_id())
    {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "application rejected successfully" })),
        )
            .into_response(),
        Err(e) => errors::transition_error_to_response(e),
    }
}

pub async fn active_crew(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.marketplace.active_crew() {
        Ok(crew) => {
            (StatusCode::OK, Json(json!({ "active_crew_members": crew }))).into_response()
        }
        Err(e) => errors::transition_error_to_response(e),
    }
}

pub async fn invite_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::InviteRequest>,
) -> axum::response::Response {
    let business_id = match parse_business_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let email = match EmailAddress::parse(&body.email) {
        Ok(email) => email,
        Err(e) => return errors::transition_error_to_response(e.into()),
    };

    match services
        .marketplace
        .invite_employee(actor.user_id(), business_id, &email)
    {
        // The invitation's whole purpose is the email, so a delivery failure is
        // the operation's failure here, unlike transition notifications.
        Ok(DeliveryStatus::Delivered) => (
            StatusCode::OK,
            Json(json!({ "message": "invitation sent successfully" })),
        )
            .into_response(),
        Ok(DeliveryStatus::Failed(reason)) => {
            errors::json_error(StatusCode::BAD_GATEWAY, "delivery_failed", reason)
        }
        Err(e) => errors::transition_error_to_response(e),
    }
}
