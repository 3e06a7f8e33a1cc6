use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ClaimId, ClaimSubmission, TenancyMode, WorkflowState};
use super::repository::{
    ClaimRepository, NotificationPublisher, ProfileRepository, RepositoryError,
};
use super::service::{ClaimService, ClaimServiceError};
use super::workflow::WorkflowError;

/// Router builder exposing the claim intake, scoring, and review endpoints.
pub fn claims_router<R, P, N>(service: Arc<ClaimService<R, P, N>>) -> Router
where
    R: ClaimRepository + 'static,
    P: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route("/api/v1/claims", post(submit_handler::<R, P, N>))
        .route("/api/v1/claims/:claim_id", get(claim_handler::<R, P, N>))
        .route(
            "/api/v1/claims/:claim_id/score",
            post(score_handler::<R, P, N>),
        )
        .route(
            "/api/v1/claims/:claim_id/assign",
            post(assign_handler::<R, P, N>),
        )
        .route(
            "/api/v1/claims/:claim_id/forward",
            post(forward_handler::<R, P, N>),
        )
        .route(
            "/api/v1/claims/:claim_id/agent-reject",
            post(agent_reject_handler::<R, P, N>),
        )
        .route(
            "/api/v1/claims/:claim_id/approve",
            post(approve_handler::<R, P, N>),
        )
        .route(
            "/api/v1/claims/:claim_id/reject",
            post(reject_handler::<R, P, N>),
        )
        .route(
            "/api/v1/claims/:claim_id/request-info",
            post(request_info_handler::<R, P, N>),
        )
        .route(
            "/api/v1/claims/:claim_id/resume",
            post(resume_handler::<R, P, N>),
        )
        .route(
            "/api/v1/claims/:claim_id/explanation",
            get(explanation_handler::<R, P, N>),
        )
        .route(
            "/api/v1/queues/:state",
            get(queue_handler::<R, P, N>),
        )
        .route(
            "/api/v1/claimants/:claimant_id/profile",
            get(profile_handler::<R, P, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct SubmitClaimRequest {
    pub mode: TenancyMode,
    #[serde(flatten)]
    pub submission: ClaimSubmission,
}

#[derive(Debug, Deserialize)]
pub struct ActorRequest {
    pub actor: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub agent: String,
}

#[derive(Debug, Deserialize)]
pub struct ForwardRequest {
    pub actor: String,
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub actor: String,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub actor: String,
    pub sanction_amount: u64,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RequestInfoRequest {
    pub actor: String,
    pub message: String,
}

pub(crate) async fn submit_handler<R, P, N>(
    State(service): State<Arc<ClaimService<R, P, N>>>,
    axum::Json(request): axum::Json<SubmitClaimRequest>,
) -> Response
where
    R: ClaimRepository + 'static,
    P: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.submit(request.submission, request.mode) {
        Ok(claim) => (StatusCode::ACCEPTED, axum::Json(claim.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn claim_handler<R, P, N>(
    State(service): State<Arc<ClaimService<R, P, N>>>,
    Path(claim_id): Path<String>,
) -> Response
where
    R: ClaimRepository + 'static,
    P: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.claim(&ClaimId(claim_id)) {
        Ok(claim) => (StatusCode::OK, axum::Json(claim)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn score_handler<R, P, N>(
    State(service): State<Arc<ClaimService<R, P, N>>>,
    Path(claim_id): Path<String>,
    axum::Json(request): axum::Json<ActorRequest>,
) -> Response
where
    R: ClaimRepository + 'static,
    P: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.score(&ClaimId(claim_id), &request.actor) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn assign_handler<R, P, N>(
    State(service): State<Arc<ClaimService<R, P, N>>>,
    Path(claim_id): Path<String>,
    axum::Json(request): axum::Json<AssignRequest>,
) -> Response
where
    R: ClaimRepository + 'static,
    P: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    respond_claim(service.assign_agent(&ClaimId(claim_id), &request.agent))
}

pub(crate) async fn forward_handler<R, P, N>(
    State(service): State<Arc<ClaimService<R, P, N>>>,
    Path(claim_id): Path<String>,
    axum::Json(request): axum::Json<ForwardRequest>,
) -> Response
where
    R: ClaimRepository + 'static,
    P: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    respond_claim(service.agent_forward(&ClaimId(claim_id), &request.actor, &request.notes))
}

pub(crate) async fn agent_reject_handler<R, P, N>(
    State(service): State<Arc<ClaimService<R, P, N>>>,
    Path(claim_id): Path<String>,
    axum::Json(request): axum::Json<RejectRequest>,
) -> Response
where
    R: ClaimRepository + 'static,
    P: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    respond_claim(service.agent_reject(&ClaimId(claim_id), &request.actor, &request.reason))
}

pub(crate) async fn approve_handler<R, P, N>(
    State(service): State<Arc<ClaimService<R, P, N>>>,
    Path(claim_id): Path<String>,
    axum::Json(request): axum::Json<ApproveRequest>,
) -> Response
where
    R: ClaimRepository + 'static,
    P: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    respond_claim(service.admin_approve(
        &ClaimId(claim_id),
        &request.actor,
        request.sanction_amount,
        request.notes.as_deref(),
    ))
}

pub(crate) async fn reject_handler<R, P, N>(
    State(service): State<Arc<ClaimService<R, P, N>>>,
    Path(claim_id): Path<String>,
    axum::Json(request): axum::Json<RejectRequest>,
) -> Response
where
    R: ClaimRepository + 'static,
    P: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    respond_claim(service.admin_reject(&ClaimId(claim_id), &request.actor, &request.reason))
}

pub(crate) async fn request_info_handler<R, P, N>(
    State(service): State<Arc<ClaimService<R, P, N>>>,
    Path(claim_id): Path<String>,
    axum::Json(request): axum::Json<RequestInfoRequest>,
) -> Response
where
    R: ClaimRepository + 'static,
    P: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    respond_claim(service.request_info(&ClaimId(claim_id), &request.actor, &request.message))
}

pub(crate) async fn resume_handler<R, P, N>(
    State(service): State<Arc<ClaimService<R, P, N>>>,
    Path(claim_id): Path<String>,
    axum::Json(request): axum::Json<ActorRequest>,
) -> Response
where
    R: ClaimRepository + 'static,
    P: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    respond_claim(service.resume_review(&ClaimId(claim_id), &request.actor))
}

pub(crate) async fn explanation_handler<R, P, N>(
    State(service): State<Arc<ClaimService<R, P, N>>>,
    Path(claim_id): Path<String>,
) -> Response
where
    R: ClaimRepository + 'static,
    P: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.explanation(&ClaimId(claim_id)) {
        Ok(explanation) => (StatusCode::OK, axum::Json(explanation)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn queue_handler<R, P, N>(
    State(service): State<Arc<ClaimService<R, P, N>>>,
    Path(state): Path<String>,
) -> Response
where
    R: ClaimRepository + 'static,
    P: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(state) = WorkflowState::parse(&state) else {
        let body = axum::Json(json!({ "error": format!("unknown workflow state '{state}'") }));
        return (StatusCode::BAD_REQUEST, body).into_response();
    };

    match service.claims_in_state(state) {
        Ok(claims) => {
            let views: Vec<_> = claims.iter().map(|claim| claim.status_view()).collect();
            (
                StatusCode::OK,
                axum::Json(json!({ "state": state.label(), "total": views.len(), "claims": views })),
            )
                .into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn profile_handler<R, P, N>(
    State(service): State<Arc<ClaimService<R, P, N>>>,
    Path(claimant_id): Path<String>,
) -> Response
where
    R: ClaimRepository + 'static,
    P: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.gamification_profile(&claimant_id) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(err) => error_response(err),
    }
}

fn respond_claim(
    result: Result<super::domain::Claim, ClaimServiceError>,
) -> Response {
    match result {
        Ok(claim) => (StatusCode::OK, axum::Json(claim.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: ClaimServiceError) -> Response {
    let status = match &err {
        ClaimServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ClaimServiceError::Workflow(WorkflowError::TerminalState(_)) => StatusCode::CONFLICT,
        ClaimServiceError::Workflow(WorkflowError::InvalidTransition { .. }) => {
            StatusCode::CONFLICT
        }
        ClaimServiceError::Workflow(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ClaimServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ClaimServiceError::Repository(RepositoryError::Conflict)
        | ClaimServiceError::Repository(RepositoryError::Duplicate) => StatusCode::CONFLICT,
        ClaimServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        ClaimServiceError::NotScored(_) => StatusCode::NOT_FOUND,
    };

    let body = axum::Json(json!({ "error": err.to_string() }));
    (status, body).into_response()
}
