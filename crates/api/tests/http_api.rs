//! Black-box tests against the assembled HTTP router.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use crewmarket_api::app::{build_app, services::AppServices};
use crewmarket_infra::{InMemoryMarketStore, Marketplace};
use crewmarket_notify::{Dispatcher, RecordingChannel};

fn test_app() -> Router {
    let channel = Arc::new(RecordingChannel::new());
    let services = AppServices::new(Marketplace::new(
        InMemoryMarketStore::new(),
        Dispatcher::new(channel),
    ));
    build_app(Arc::new(services))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    actor: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder.header("x-user-id", actor);
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

struct SeededIds {
    business_id: String,
    owner_id: String,
    crew_id: String,
    job_id: String,
}

async fn seed(app: &Router) -> SeededIds {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/business",
        None,
        Some(json!({
            "name": "Night Shoot Ltd",
            "contact_email": "booking@nightshoot.example",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let business_id = body["business"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/users",
        None,
        Some(json!({
            "username": "producer",
            "email": "producer@nightshoot.example",
            "roles": ["business"],
            "business_id": business_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let owner_id = body["user"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/users",
        None,
        Some(json!({
            "username": "deckhand",
            "email": "deckhand@kroo.site",
            "roles": ["crew"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let crew_id = body["user"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/jobs",
        Some(&owner_id),
        Some(json!({
            "business_id": business_id,
            "title": "Gaffer",
            "job_function": "lighting",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let job_id = body["job"]["id"].as_str().unwrap().to_string();

    SeededIds {
        business_id,
        owner_id,
        crew_id,
        job_id,
    }
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn protected_routes_require_a_verified_actor() {
    let app = test_app();

    let (status, _) = send(&app, Method::GET, "/api/v1/jobs/applications", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/v1/jobs/applications",
        Some("not-a-uuid"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn application_flow_end_to_end() {
    let app = test_app();
    let ids = seed(&app).await;

    // Crew applies.
    let uri = format!("/api/v1/jobs/{}/apply", ids.job_id);
    let (status, body) = send(&app, Method::POST, &uri, Some(&ids.crew_id), None).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["notification"]["status"], "delivered");
    let application_id = body["application"]["id"].as_str().unwrap().to_string();

    // A second apply for the same pair conflicts.
    let (status, _) = send(&app, Method::POST, &uri, Some(&ids.crew_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The business sees one flattened application row.
    let uri = format!("/api/v1/business/{}/applications", ids.business_id);
    let (status, body) = send(&app, Method::GET, &uri, Some(&ids.owner_id), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let rows = body["applications"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["job_title"], "Gaffer");
    assert_eq!(rows[0]["user"]["username"], "deckhand");

    // The owning business accepts; the crew member shows up as active.
    let uri = format!("/api/v1/business/applications/{application_id}/accept");
    let (status, body) = send(&app, Method::PATCH, &uri, Some(&ids.owner_id), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["application"]["status"], "accepted");

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/business/crew/active",
        Some(&ids.owner_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let members = body["active_crew_members"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["username"], "deckhand");

    // Accepting twice conflicts.
    let uri = format!("/api/v1/business/applications/{application_id}/accept");
    let (status, _) = send(&app, Method::PATCH, &uri, Some(&ids.owner_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn offer_flow_end_to_end() {
    let app = test_app();
    let ids = seed(&app).await;

    let uri = format!("/api/v1/business/jobs/{}/offer", ids.job_id);
    let body = json!({ "email": "deckhand@kroo.site" });

    let (status, response) = send(
        &app,
        Method::POST,
        &uri,
        Some(&ids.owner_id),
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{response}");
    assert_eq!(response["data"]["job"]["placement"]["state"], "offered");

    // Offering the same job to the same user again conflicts.
    let (status, _) = send(&app, Method::POST, &uri, Some(&ids.owner_id), Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // A non-member cannot offer on behalf of the business.
    let uri = format!("/api/v1/business/jobs/{}/offer", ids.job_id);
    let (status, _) = send(
        &app,
        Method::POST,
        &uri,
        Some(&ids.crew_id),
        Some(json!({ "email": "deckhand@kroo.site" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn save_and_withdraw_flows() {
    let app = test_app();
    let ids = seed(&app).await;

    let save_uri = format!("/api/v1/jobs/{}/save", ids.job_id);
    let (status, _) = send(&app, Method::POST, &save_uri, Some(&ids.crew_id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::POST, &save_uri, Some(&ids.crew_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/jobs/saved",
        Some(&ids.crew_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["saved_jobs"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, &save_uri, Some(&ids.crew_id), None).await;
    assert_eq!(status, StatusCode::OK);

    // Apply then withdraw.
    let apply_uri = format!("/api/v1/jobs/{}/apply", ids.job_id);
    let (_, body) = send(&app, Method::POST, &apply_uri, Some(&ids.crew_id), None).await;
    let application_id = body["application"]["id"].as_str().unwrap().to_string();

    let withdraw_uri = format!("/api/v1/jobs/applications/{application_id}");
    // Someone else's withdrawal attempt is refused.
    let (status, _) = send(&app, Method::DELETE, &withdraw_uri, Some(&ids.owner_id), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::DELETE, &withdraw_uri, Some(&ids.crew_id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/jobs/applications",
        Some(&ids.crew_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["applications"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_ids_are_rejected_up_front() {
    let app = test_app();
    let ids = seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/jobs/not-a-uuid/apply",
        Some(&ids.crew_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_id");
}
