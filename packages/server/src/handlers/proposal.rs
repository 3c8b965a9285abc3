use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use common::ReviewDecision;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppQuery;
use crate::models::auth::Role;
use crate::models::hackathon::HackathonSummary;
use crate::models::registration::{ProposalListQuery, RegistrationResponse};
use crate::services::registration::JoinedRegistration;
use crate::state::AppState;
use crate::utils::ids::parse_id;

fn joined_response((reg, hackathon): JoinedRegistration, now: chrono::DateTime<Utc>) -> RegistrationResponse {
    let response = RegistrationResponse::from(reg);
    match hackathon {
        Some(h) => response.with_hackathon(HackathonSummary::at(&h, now)),
        None => response,
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Proposals",
    operation_id = "listProposals",
    summary = "List proposals addressed to an organizer",
    description = "Returns every registration for the organizer's hackathons, newest first, joined with hackathon display fields. \
        Organizers see their own proposals; admins must pass `organizerId`.",
    params(ProposalListQuery),
    responses(
        (status = 200, description = "Proposals", body = Vec<RegistrationResponse>),
        (status = 400, description = "Missing or malformed organizer ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = %auth_user.user_id))]
pub async fn list_proposals(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ProposalListQuery>,
) -> Result<Json<Vec<RegistrationResponse>>, AppError> {
    auth_user.require_any_role(&[Role::Organizer, Role::Admin])?;

    let organizer_id = match query.organizer_id.as_deref() {
        Some(raw) => parse_id(raw, "organizer ID")?,
        None if auth_user.role == Role::Organizer => auth_user.user_id,
        None => return Err(AppError::Validation("Organizer ID is missing or invalid.".into())),
    };
    auth_user.require_self_or_admin(Role::Organizer, organizer_id)?;

    let now = Utc::now();
    let rows = state.registrations().find_by_organizer(organizer_id).await?;
    Ok(Json(rows.into_iter().map(|r| joined_response(r, now)).collect()))
}

async fn review(
    auth_user: AuthUser,
    state: AppState,
    id: String,
    decision: ReviewDecision,
) -> Result<Json<RegistrationResponse>, AppError> {
    auth_user.require_any_role(&[Role::Organizer, Role::Admin])?;
    let id = parse_id(&id, "proposal ID")?;
    let reviewer = (!auth_user.is_admin()).then_some(auth_user.user_id);

    let joined = state.registrations().set_status(id, decision, reviewer).await?;
    tracing::info!(registration_id = %id, %decision, "Proposal reviewed");
    Ok(Json(joined_response(joined, Utc::now())))
}

#[utoipa::path(
    put,
    path = "/{id}/approve",
    tag = "Proposals",
    operation_id = "approveProposal",
    summary = "Approve a proposal",
    description = "Sets the registration status to `approved`. Re-approving is a no-op; earlier decisions are overwritten.",
    params(("id" = uuid::Uuid, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "Updated registration", body = RegistrationResponse),
        (status = 400, description = "Malformed ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Proposal not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn approve_proposal(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RegistrationResponse>, AppError> {
    review(auth_user, state, id, ReviewDecision::Approve).await
}

#[utoipa::path(
    put,
    path = "/{id}/reject",
    tag = "Proposals",
    operation_id = "rejectProposal",
    summary = "Reject a proposal",
    description = "Sets the registration status to `rejected`. Re-rejecting is a no-op; earlier decisions are overwritten.",
    params(("id" = uuid::Uuid, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "Updated registration", body = RegistrationResponse),
        (status = 400, description = "Malformed ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Proposal not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn reject_proposal(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RegistrationResponse>, AppError> {
    review(auth_user, state, id, ReviewDecision::Reject).await
}
