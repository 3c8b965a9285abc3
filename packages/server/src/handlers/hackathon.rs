use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use chrono::Utc;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{hackathon, organizer_user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::{AppJson, AppQuery};
use crate::models::auth::Role;
use crate::models::hackathon::*;
use crate::report::HackathonReport;
use crate::state::AppState;
use crate::utils::ids::parse_id;

#[utoipa::path(
    get,
    path = "/",
    tag = "Hackathons",
    operation_id = "listHackathons",
    summary = "List hackathons",
    description = "Returns all hackathons ordered by date. `status` narrows the list to `upcoming` or `conducted` events, derived from the event date at request time.",
    params(HackathonListQuery),
    responses(
        (status = 200, description = "List of hackathons", body = Vec<HackathonResponse>),
        (status = 400, description = "Invalid status filter (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(status = ?query.status))]
pub async fn list_hackathons(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<HackathonListQuery>,
) -> Result<Json<Vec<HackathonResponse>>, AppError> {
    let phase = query.status.as_deref().map(parse_phase).transpose()?;

    let now = Utc::now();
    let rows = hackathon::Entity::find()
        .order_by_asc(hackathon::Column::Date)
        .all(&state.db)
        .await?;

    Ok(Json(
        rows.into_iter()
            .map(|m| HackathonResponse::at(m, now))
            .filter(|h| phase.is_none_or(|p| h.status == p))
            .collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Hackathons",
    operation_id = "createHackathon",
    summary = "Create a hackathon",
    description = "Creates a hackathon owned by the calling organizer. The organizer's display name is copied onto the event.",
    request_body = CreateHackathonRequest,
    responses(
        (status = 201, description = "Hackathon created", body = HackathonResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(organizer_id = %auth_user.user_id))]
pub async fn create_hackathon(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateHackathonRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_role(Role::Organizer)?;
    let new = validate_create_hackathon(&payload)?;

    let organizer = organizer_user::Entity::find_by_id(auth_user.user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Organizer not found".into()))?;

    let model = hackathon::ActiveModel {
        id: Set(Uuid::now_v7()),
        organizer_id: Set(Some(organizer.id)),
        organizer_name: Set(organizer.name),
        kind: Set(new.kind),
        name: Set(new.name),
        venue: Set(new.venue),
        date: Set(new.date),
        registration_start: Set(new.registration_start),
        registration_end: Set(new.registration_end),
        details: Set(new.details),
        duration: Set(new.duration),
        prize: Set(new.prize),
        is_team_hackathon: Set(new.is_team_hackathon),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    tracing::info!(hackathon_id = %model.id, "Hackathon created");
    Ok((StatusCode::CREATED, Json(HackathonResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Hackathons",
    operation_id = "getHackathon",
    summary = "Get a hackathon by ID",
    params(("id" = Uuid, Path, description = "Hackathon ID")),
    responses(
        (status = 200, description = "Hackathon details", body = HackathonResponse),
        (status = 400, description = "Malformed ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Hackathon not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_hackathon(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HackathonResponse>, AppError> {
    let id = parse_id(&id, "hackathon ID")?;
    Ok(Json(find_hackathon(&state.db, id).await?.into()))
}

#[utoipa::path(
    get,
    path = "/{id}/report",
    tag = "Hackathons",
    operation_id = "downloadHackathonReport",
    summary = "Download a PDF report for a hackathon",
    description = "Renders the event report with the live registration count. Only the owning organizer or an admin may download it.",
    params(("id" = Uuid, Path, description = "Hackathon ID")),
    responses(
        (status = 200, description = "PDF report", content_type = "application/pdf", body = Vec<u8>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Hackathon not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn hackathon_report(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "hackathon ID")?;
    let model = find_hackathon(&state.db, id).await?;
    match model.organizer_id {
        Some(owner) => auth_user.require_self_or_admin(Role::Organizer, owner)?,
        None => auth_user.require_role(Role::Admin)?,
    }

    let report = HackathonReport {
        total_registrations: state.registrations().count_for_hackathon(id).await?,
        name: model.name,
        date: model.date,
        venue: model.venue,
        is_team: model.is_team_hackathon,
    };
    let pdf = state.reports.render(&report)?;
    let disposition = format!("attachment; filename=\"{}\"", report.filename());

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    ))
}

#[utoipa::path(
    get,
    path = "/organizer/{organizer_id}",
    tag = "Hackathons",
    operation_id = "listOrganizerHackathons",
    summary = "List an organizer's hackathons",
    description = "Returns the organizer's `upcoming` or `conducted` hackathons, selected by `type`.",
    params(
        ("organizer_id" = Uuid, Path, description = "Organizer ID"),
        OrganizerHackathonsQuery,
    ),
    responses(
        (status = 200, description = "List of hackathons", body = Vec<HackathonResponse>),
        (status = 400, description = "Invalid ID or type (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(kind = ?query.kind))]
pub async fn list_organizer_hackathons(
    State(state): State<AppState>,
    Path(organizer_id): Path<String>,
    AppQuery(query): AppQuery<OrganizerHackathonsQuery>,
) -> Result<Json<Vec<HackathonResponse>>, AppError> {
    let organizer_id = parse_id(&organizer_id, "organizer ID")?;
    let phase = parse_phase(query.kind.as_deref().unwrap_or_default())?;

    let now = Utc::now();
    let rows = hackathon::Entity::find()
        .filter(hackathon::Column::OrganizerId.eq(organizer_id))
        .order_by_asc(hackathon::Column::Date)
        .all(&state.db)
        .await?;

    Ok(Json(
        rows.into_iter()
            .map(|m| HackathonResponse::at(m, now))
            .filter(|h| h.status == phase)
            .collect(),
    ))
}

/// Look up a hackathon or return 404.
pub async fn find_hackathon<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<hackathon::Model, AppError> {
    hackathon::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Hackathon not found".into()))
}
