use axum::Json;
use axum::extract::State;
use chrono::Utc;
use common::HackathonPhase;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{hackathon, organizer_user, student_user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::admin::{EventCountsResponse, UserCountsResponse, UserSummary};
use crate::models::auth::Role;
use crate::models::hackathon::HackathonResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/user-counts",
    tag = "Admin",
    operation_id = "adminUserCounts",
    summary = "Count student and organizer accounts",
    responses(
        (status = 200, description = "Account counts", body = UserCountsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn user_counts(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserCountsResponse>, AppError> {
    auth_user.require_role(Role::Admin)?;

    let students = student_user::Entity::find().count(&state.db).await?;
    let organizers = organizer_user::Entity::find().count(&state.db).await?;

    Ok(Json(UserCountsResponse {
        students,
        organizers,
        total: students + organizers,
    }))
}

#[utoipa::path(
    get,
    path = "/event-counts",
    tag = "Admin",
    operation_id = "adminEventCounts",
    summary = "Count hackathons by derived status",
    responses(
        (status = 200, description = "Event counts", body = EventCountsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn event_counts(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<EventCountsResponse>, AppError> {
    auth_user.require_role(Role::Admin)?;

    let now = Utc::now();
    let dates: Vec<chrono::NaiveDate> = hackathon::Entity::find()
        .select_only()
        .column(hackathon::Column::Date)
        .into_tuple()
        .all(&state.db)
        .await?;

    let upcoming = dates
        .iter()
        .filter(|d| HackathonPhase::at(**d, now) == HackathonPhase::Upcoming)
        .count() as u64;
    let total = dates.len() as u64;

    Ok(Json(EventCountsResponse {
        total,
        upcoming,
        conducted: total - upcoming,
        active: upcoming,
    }))
}

#[utoipa::path(
    get,
    path = "/hackathons",
    tag = "Admin",
    operation_id = "adminListHackathons",
    summary = "List all hackathons by date",
    responses(
        (status = 200, description = "All hackathons, earliest first", body = Vec<HackathonResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_hackathons(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<HackathonResponse>>, AppError> {
    auth_user.require_role(Role::Admin)?;

    let now = Utc::now();
    let rows = hackathon::Entity::find()
        .order_by_asc(hackathon::Column::Date)
        .all(&state.db)
        .await?;
    Ok(Json(
        rows.into_iter().map(|m| HackathonResponse::at(m, now)).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/students",
    tag = "Admin",
    operation_id = "adminListStudents",
    summary = "List student accounts",
    responses(
        (status = 200, description = "Students", body = Vec<UserSummary>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_students(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    auth_user.require_role(Role::Admin)?;

    let rows = student_user::Entity::find()
        .order_by_asc(student_user::Column::CreatedAt)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(UserSummary::from).collect()))
}

#[utoipa::path(
    get,
    path = "/organizers",
    tag = "Admin",
    operation_id = "adminListOrganizers",
    summary = "List organizer accounts",
    responses(
        (status = 200, description = "Organizers", body = Vec<UserSummary>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_organizers(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    auth_user.require_role(Role::Admin)?;

    let rows = organizer_user::Entity::find()
        .order_by_asc(organizer_user::Column::CreatedAt)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(UserSummary::from).collect()))
}
