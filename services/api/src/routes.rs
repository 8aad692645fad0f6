use crate::infra::AppState;
use axum::extract::Multipart;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use food_share::workflows::donations::{donation_router, DonationRepository, DonationService};
use food_share::workflows::quality::{content_type_for, is_image_content_type, ImageClassifier};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

const IMAGE_FIELD: &str = "image";

pub(crate) fn with_donation_routes<R>(service: Arc<DonationService<R>>) -> axum::Router
where
    R: DonationRepository + 'static,
{
    donation_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/quality/analyze",
            axum::routing::post(quality_analyze_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Accepts a multipart upload with an `image` field and returns its quality assessment.
pub(crate) async fn quality_analyze_endpoint(
    Extension(state): Extension<AppState>,
    mut multipart: Multipart,
) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return bad_request(StatusCode::BAD_REQUEST, "no image uploaded"),
            Err(err) => return bad_request(err.status(), &err.body_text()),
        };

        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| content_type_for(&filename).to_string());

        if !is_image_content_type(&content_type) {
            return bad_request(StatusCode::BAD_REQUEST, "only image uploads are accepted");
        }

        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => return bad_request(err.status(), &err.body_text()),
        };

        let result = state.classifier.classify(&bytes, &filename).await;
        info!(
            filename = %filename,
            size = bytes.len(),
            quality = result.quality.label(),
            "food photo analyzed"
        );
        return (StatusCode::OK, Json(result)).into_response();
    }
}

fn bad_request(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
