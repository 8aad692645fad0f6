use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::donations::router::{error_response, submit_handler};
use crate::workflows::donations::{DonationService, DonationServiceError};
use crate::workflows::matching::DonorId;

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn register_route_returns_created_profile() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/donors",
            serde_json::to_value(donor_registration("route@example.org")).unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["email"], "route@example.org");
    assert_eq!(body["donation_count"], 0);
    assert!(body.get("password_digest").is_none());
}

#[tokio::test]
async fn login_route_rejects_bad_password() {
    let (service, _) = build_service();
    service
        .register_donor(donor_registration("login@example.org"))
        .unwrap();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/donors/login",
            json!({"email": "login@example.org", "password": "nope"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "invalid credentials");
}

#[tokio::test]
async fn unknown_donor_profile_is_not_found() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/donors/donor-000000"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn inbox_route_filters_by_status() {
    let (service, _) = build_service();
    let (donor, organization) = register_pair(&service);
    let first = service
        .submit_donation(submission(&donor.id, "Hope Shelter"))
        .unwrap();
    service
        .submit_donation(submission(&donor.id, "Hope Shelter"))
        .unwrap();
    let router = router_with_service(service);

    let accept_uri = format!(
        "/api/v1/organizations/{}/donations/{}/accept",
        organization.id.0, first.order_id.0
    );
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            &accept_uri,
            json!({"pickup_time": "2024-05-01T18:00"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let accepted = read_json_body(response).await;
    assert_eq!(accepted["status"], "Accepted");

    let pending = router
        .clone()
        .oneshot(get(&format!(
            "/api/v1/organizations/{}/donations",
            organization.id.0
        )))
        .await
        .unwrap();
    let pending = read_json_body(pending).await;
    assert_eq!(pending.as_array().map(Vec::len), Some(1));

    let processed = router
        .oneshot(get(&format!(
            "/api/v1/organizations/{}/donations?status=processed",
            organization.id.0
        )))
        .await
        .unwrap();
    let processed = read_json_body(processed).await;
    assert_eq!(processed[0]["order_id"], first.order_id.0);
}

#[tokio::test]
async fn collecting_a_pending_offer_conflicts() {
    let (service, _) = build_service();
    let (donor, organization) = register_pair(&service);
    let offer = service
        .submit_donation(submission(&donor.id, "Hope Shelter"))
        .unwrap();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!(
                    "/api/v1/organizations/{}/donations/{}/collect",
                    organization.id.0, offer.order_id.0
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn recommendation_route_ranks_nearest_first() {
    let (service, _) = build_service();
    register_pair(&service);
    let mut distant = organization_registration("Akshaya Patra", "akshaya@example.org");
    distant.location = Some(crate::workflows::matching::GeoPoint::new(12.9716, 77.5946));
    service.register_organization(distant).unwrap();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/recommendations",
            json!({
                "location": {"lat": 13.0827, "lng": 80.2707},
                "donation_type": "Food"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body[0]["name"], "Hope Shelter");
    assert_eq!(body[1]["factors"]["proximity"], 0.0);
    assert_eq!(body[1]["score"], 20.0);
}

#[tokio::test]
async fn conversation_route_lists_messages() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let sent = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/messages",
            json!({"sender": "priya", "receiver": "hope", "content": "Hello"}),
        ))
        .await
        .unwrap();
    assert_eq!(sent.status(), StatusCode::CREATED);

    let response = router
        .oneshot(get("/api/v1/messages/hope/priya"))
        .await
        .unwrap();
    let body = read_json_body(response).await;
    assert_eq!(body[0]["content"], "Hello");
}

#[tokio::test]
async fn submit_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(DonationService::new(Arc::new(UnavailableRepository)));

    let response = submit_handler::<UnavailableRepository>(
        State(service),
        axum::Json(submission(&DonorId("donor-1".to_string()), "Hope Shelter")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn validation_errors_are_unprocessable() {
    let response = error_response(DonationServiceError::Validation(
        "pickup_time is required".to_string(),
    ));

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "pickup_time is required");
}
