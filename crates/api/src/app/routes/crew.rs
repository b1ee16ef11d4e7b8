//! Crew-facing routes: applying, withdrawing, saving, and listing jobs.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crewmarket_core::{ApplicationId, JobId};

use crate::app::{errors, services::AppServices};
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route("/jobs/applications", get(my_applications))
        .route(
            "/jobs/applications/:id",
            get(application_by_id).delete(withdraw_application),
        )
        .route("/jobs/saved", get(saved_jobs))
        .route("/jobs/saved/:id", get(saved_job_by_id))
        .route("/jobs/:id/apply", post(apply_to_job))
        .route("/jobs/:id/save", post(save_job).delete(unsave_job))
}

fn parse_job_id(raw: &str) -> Result<JobId, axum::response::Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid job id"))
}

fn parse_application_id(raw: &str) -> Result<ApplicationId, axum::response::Response> {
    raw.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid application id")
    })
}

pub async fn apply_to_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let job_id = match parse_job_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.marketplace.apply_to_job(job_id, actor.user_id()) {
        Ok(outcome) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "job application submitted successfully",
                "application": outcome.value,
                "notification": outcome.delivery,
            })),
        )
            .into_response(),
        Err(e) => errors::transition_error_to_response(e),
    }
}

pub async fn my_applications(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
) -> axum::response::Response {
    match services.marketplace.my_applications(actor.user_id()) {
        Ok(applications) => {
            (StatusCode::OK, Json(json!({ "applications": applications }))).into_response()
        }
        Err(e) => errors::transition_error_to_response(e),
    }
}

pub async fn application_by_id(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let application_id = match parse_application_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services
        .marketplace
        .application_by_id(actor.user_id(), application_id)
    {
        Ok(application) => {
            (StatusCode::OK, Json(json!({ "application": application }))).into_response()
        }
        Err(e) => errors::transition_error_to_response(e),
    }
}

pub async fn withdraw_application(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let application_id = match parse_application_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services
        .marketplace
        .withdraw_application(application_id, actor.user_id())
    {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "job application deleted successfully" })),
        )
            .into_response(),
        Err(e) => errors::transition_error_to_response(e),
    }
}

pub async fn saved_jobs(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
) -> axum::response::Response {
    match services.marketplace.saved_jobs(actor.user_id()) {
        Ok(jobs) => (StatusCode::OK, Json(json!({ "saved_jobs": jobs }))).into_response(),
        Err(e) => errors::transition_error_to_response(e),
    }
}

pub async fn saved_job_by_id(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let job_id = match parse_job_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.marketplace.saved_job_by_id(actor.user_id(), job_id) {
        Ok(job) => (StatusCode::OK, Json(json!({ "saved_job": job }))).into_response(),
        Err(e) => errors::transition_error_to_response(e),
    }
}

pub async fn save_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let job_id = match parse_job_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.marketplace.save_job(job_id, actor.user_id()) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "message": "job saved successfully",
                "saved_job_id": job_id,
            })),
        )
            .into_response(),
        Err(e) => errors::transition_error_to_response(e),
    }
}

pub async fn unsave_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let job_id = match parse_job_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.marketplace.unsave_job(job_id, actor.user_id()) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "job removed from saved jobs" })),
        )
            .into_response(),
        Err(e) => errors::transition_error_to_response(e),
    }
}
