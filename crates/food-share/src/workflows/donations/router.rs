use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{
    DonationFilter, DonationSubmission, DonorCredentials, DonorRegistration, MessageDraft,
    NearbyQuery, OrderId, OrganizationCredentials, OrganizationRegistration,
};
use super::repository::DonationRepository;
use super::service::{DonationService, DonationServiceError};
use crate::workflows::matching::{DonorId, OrganizationId};

/// Router builder exposing account, donation, chat, and recommendation endpoints.
pub fn donation_router<R>(service: Arc<DonationService<R>>) -> Router
where
    R: DonationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/donors",
            post(register_donor_handler::<R>).get(list_donors_handler::<R>),
        )
        .route("/api/v1/donors/login", post(donor_login_handler::<R>))
        .route("/api/v1/donors/:donor_id", get(donor_profile_handler::<R>))
        .route(
            "/api/v1/donors/:donor_id/history",
            get(donor_history_handler::<R>),
        )
        .route(
            "/api/v1/donors/:donor_id/recommendations",
            get(donor_recommendations_handler::<R>),
        )
        .route(
            "/api/v1/organizations",
            post(register_organization_handler::<R>).get(list_organizations_handler::<R>),
        )
        .route(
            "/api/v1/organizations/login",
            post(organization_login_handler::<R>),
        )
        .route(
            "/api/v1/organizations/:organization_id",
            get(organization_profile_handler::<R>),
        )
        .route(
            "/api/v1/organizations/:organization_id/donations",
            get(organization_donations_handler::<R>),
        )
        .route(
            "/api/v1/organizations/:organization_id/donations/:order_id/accept",
            post(accept_handler::<R>),
        )
        .route(
            "/api/v1/organizations/:organization_id/donations/:order_id/collect",
            post(collect_handler::<R>),
        )
        .route("/api/v1/recommendations", post(nearby_handler::<R>))
        .route("/api/v1/donations", post(submit_handler::<R>))
        .route("/api/v1/messages", post(send_message_handler::<R>))
        .route(
            "/api/v1/messages/:user1/:user2",
            get(conversation_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct InboxQuery {
    #[serde(default)]
    status: Option<DonationFilter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AcceptRequest {
    pub pickup_time: String,
}

pub(crate) async fn register_donor_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    Json(registration): Json<DonorRegistration>,
) -> Response
where
    R: DonationRepository + 'static,
{
    respond(StatusCode::CREATED, service.register_donor(registration))
}

pub(crate) async fn donor_login_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    Json(credentials): Json<DonorCredentials>,
) -> Response
where
    R: DonationRepository + 'static,
{
    respond(StatusCode::OK, service.authenticate_donor(credentials))
}

pub(crate) async fn list_donors_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
) -> Response
where
    R: DonationRepository + 'static,
{
    respond(StatusCode::OK, service.list_donors())
}

pub(crate) async fn donor_profile_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    Path(donor_id): Path<String>,
) -> Response
where
    R: DonationRepository + 'static,
{
    respond(StatusCode::OK, service.donor_profile(&DonorId(donor_id)))
}

pub(crate) async fn donor_history_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    Path(donor_id): Path<String>,
) -> Response
where
    R: DonationRepository + 'static,
{
    respond(StatusCode::OK, service.donor_history(&DonorId(donor_id)))
}

pub(crate) async fn donor_recommendations_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    Path(donor_id): Path<String>,
) -> Response
where
    R: DonationRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.recommend_for_donor(&DonorId(donor_id)),
    )
}

pub(crate) async fn register_organization_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    Json(registration): Json<OrganizationRegistration>,
) -> Response
where
    R: DonationRepository + 'static,
{
    respond(
        StatusCode::CREATED,
        service.register_organization(registration),
    )
}

pub(crate) async fn organization_login_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    Json(credentials): Json<OrganizationCredentials>,
) -> Response
where
    R: DonationRepository + 'static,
{
    respond(StatusCode::OK, service.authenticate_organization(credentials))
}

pub(crate) async fn list_organizations_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
) -> Response
where
    R: DonationRepository + 'static,
{
    respond(StatusCode::OK, service.list_organizations())
}

pub(crate) async fn organization_profile_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    Path(organization_id): Path<String>,
) -> Response
where
    R: DonationRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.organization_profile(&OrganizationId(organization_id)),
    )
}

pub(crate) async fn organization_donations_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    Path(organization_id): Path<String>,
    Query(query): Query<InboxQuery>,
) -> Response
where
    R: DonationRepository + 'static,
{
    let filter = query.status.unwrap_or_default();
    respond(
        StatusCode::OK,
        service.organization_donations(&OrganizationId(organization_id), filter),
    )
}

pub(crate) async fn accept_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    Path((organization_id, order_id)): Path<(String, String)>,
    Json(request): Json<AcceptRequest>,
) -> Response
where
    R: DonationRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.accept_donation(
            &OrganizationId(organization_id),
            &OrderId(order_id),
            request.pickup_time,
        ),
    )
}

pub(crate) async fn collect_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    Path((organization_id, order_id)): Path<(String, String)>,
) -> Response
where
    R: DonationRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.collect_donation(&OrganizationId(organization_id), &OrderId(order_id)),
    )
}

pub(crate) async fn nearby_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    Json(query): Json<NearbyQuery>,
) -> Response
where
    R: DonationRepository + 'static,
{
    respond(StatusCode::OK, service.recommend_nearby(query))
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    Json(submission): Json<DonationSubmission>,
) -> Response
where
    R: DonationRepository + 'static,
{
    respond(StatusCode::CREATED, service.submit_donation(submission))
}

pub(crate) async fn send_message_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    Json(draft): Json<MessageDraft>,
) -> Response
where
    R: DonationRepository + 'static,
{
    respond(StatusCode::CREATED, service.send_message(draft))
}

pub(crate) async fn conversation_handler<R>(
    State(service): State<Arc<DonationService<R>>>,
    Path((first, second)): Path<(String, String)>,
) -> Response
where
    R: DonationRepository + 'static,
{
    respond(StatusCode::OK, service.conversation(&first, &second))
}

fn respond<T: Serialize>(success: StatusCode, result: Result<T, DonationServiceError>) -> Response {
    match result {
        Ok(body) => (success, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn error_response(error: DonationServiceError) -> Response {
    let status = match &error {
        DonationServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DonationServiceError::Conflict(_) => StatusCode::CONFLICT,
        DonationServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        DonationServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        DonationServiceError::InvalidTransition { .. } => StatusCode::CONFLICT,
        DonationServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
