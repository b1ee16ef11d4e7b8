use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crewmarket_accounts::Role;
use crewmarket_infra::TransitionError;

pub fn transition_error_to_response(err: TransitionError) -> axum::response::Response {
    match err {
        TransitionError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        TransitionError::NotFound(what) => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("{what} not found"))
        }
        TransitionError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        TransitionError::Forbidden(msg) => json_error(StatusCode::FORBIDDEN, "forbidden", msg),
        TransitionError::Partial(partial) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({
                "error": "partial_failure",
                "message": partial.to_string(),
                "retriable": true,
            })),
        )
            .into_response(),
        TransitionError::Store(e) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            e.to_string(),
        ),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn parse_role(s: &str) -> Result<Role, axum::response::Response> {
    match s.to_lowercase().as_str() {
        "crew" => Ok(Role::Crew),
        "business" => Ok(Role::Business),
        _ => Err(json_error(
            StatusCode::BAD_REQUEST,
            "invalid_role",
            "role must be one of: crew, business",
        )),
    }
}
