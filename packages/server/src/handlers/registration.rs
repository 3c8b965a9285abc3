use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppQuery;
use crate::handlers::hackathon::find_hackathon;
use crate::models::auth::Role;
use crate::models::hackathon::HackathonSummary;
use crate::models::registration::*;
use crate::state::AppState;
use crate::utils::filename::clean_upload_name;
use crate::utils::ids::parse_id;

/// Room for the form fields on top of the proposal itself.
const FORM_OVERHEAD: usize = 64 * 1024;

pub fn register_body_limit(max_upload_size: u64) -> DefaultBodyLimit {
    let limit = usize::try_from(max_upload_size).unwrap_or(usize::MAX);
    DefaultBodyLimit::max(limit.saturating_add(FORM_OVERHEAD))
}

/// Read the multipart registration form. Unknown fields are ignored.
async fn read_form(
    mut multipart: Multipart,
) -> Result<(RegistrationForm, Option<ProposalFile>), AppError> {
    let mut form = RegistrationForm::default();
    let mut proposal = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let original_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file: {}", e)))?;
            // Browsers send an empty part when no file was chosen.
            if original_name.is_empty() && data.is_empty() {
                continue;
            }
            let original_name = clean_upload_name(&original_name)
                .map_err(|e| AppError::Validation(e.message().into()))?;
            proposal = Some(ProposalFile {
                original_name,
                content_type,
                data: data.to_vec(),
            });
            continue;
        }

        let slot = match name.as_str() {
            "hackathonId" => &mut form.hackathon_id,
            "studentId" => &mut form.student_id,
            "isTeam" => &mut form.is_team,
            "leaderName" => &mut form.leader_name,
            "leaderEmail" => &mut form.leader_email,
            "teamName" => &mut form.team_name,
            "members" => &mut form.members,
            "name" => &mut form.name,
            "email" => &mut form.email,
            "dob" => &mut form.dob,
            "phone" => &mut form.phone,
            "education" => &mut form.education,
            "hasParticipated" => &mut form.has_participated,
            _ => continue,
        };
        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read field '{}': {}", name, e)))?;
        *slot = Some(value);
    }

    Ok((form, proposal))
}

#[utoipa::path(
    post,
    path = "/register",
    tag = "Registrations",
    operation_id = "registerForHackathon",
    summary = "Register for a hackathon",
    description = "Registers the calling student for a hackathon as a solo participant or a team. \
        `isTeam` selects the required participant fields. An optional PDF proposal may be attached as `file`; \
        non-PDF files are rejected and removed from storage.",
    request_body(content = RegistrationMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Registration created", body = RegistrationResponse),
        (status = 400, description = "Validation error, already registered, or hackathon without organizer (VALIDATION_ERROR, ALREADY_REGISTERED, INVALID_STATE)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Hackathon or student not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(student_id = %auth_user.user_id))]
pub async fn register(
    auth_user: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_role(Role::Student)?;
    let (form, proposal) = read_form(multipart).await?;

    let hackathon_id = parse_id(form.hackathon_id.as_deref().unwrap_or_default(), "hackathon ID")?;
    if let Some(Ok(claimed)) = form.student_id.as_deref().map(|s| Uuid::parse_str(s.trim())) {
        if claimed != auth_user.user_id {
            return Err(AppError::PermissionDenied);
        }
    }

    let model = state
        .registrations()
        .create(hackathon_id, &form, proposal.as_ref())
        .await?;

    Ok((StatusCode::CREATED, Json(RegistrationResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/hackathon/{hackathon_id}",
    tag = "Registrations",
    operation_id = "listHackathonRegistrations",
    summary = "List the registrations of a hackathon",
    description = "Visible to the owning organizer and admins.",
    params(("hackathon_id" = Uuid, Path, description = "Hackathon ID")),
    responses(
        (status = 200, description = "Registrations", body = Vec<RegistrationResponse>),
        (status = 400, description = "Malformed ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Hackathon not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_by_hackathon(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(hackathon_id): Path<String>,
) -> Result<Json<Vec<RegistrationResponse>>, AppError> {
    let hackathon_id = parse_id(&hackathon_id, "hackathon ID")?;
    let hackathon = find_hackathon(&state.db, hackathon_id).await?;
    match hackathon.organizer_id {
        Some(owner) => auth_user.require_self_or_admin(Role::Organizer, owner)?,
        None => auth_user.require_role(Role::Admin)?,
    }

    let rows = state.registrations().find_by_hackathon(hackathon_id).await?;
    Ok(Json(rows.into_iter().map(RegistrationResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/registeredhackathons/{student_id}",
    tag = "Registrations",
    operation_id = "listStudentRegistrations",
    summary = "List a student's registrations",
    description = "Returns the student's registrations for `upcoming` hackathons or the ones already held (`participated`), each joined with its hackathon.",
    params(
        ("student_id" = Uuid, Path, description = "Student ID"),
        StudentRegistrationsQuery,
    ),
    responses(
        (status = 200, description = "Registrations", body = Vec<RegistrationResponse>),
        (status = 400, description = "Invalid ID or type (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = %auth_user.user_id, kind = ?query.kind))]
pub async fn list_by_student(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    AppQuery(query): AppQuery<StudentRegistrationsQuery>,
) -> Result<Json<Vec<RegistrationResponse>>, AppError> {
    let student_id = parse_id(&student_id, "student ID")?;
    auth_user.require_self_or_admin(Role::Student, student_id)?;
    let filter = StudentFilter::parse(query.kind.as_deref())?;

    let now = Utc::now();
    let rows = state
        .registrations()
        .find_by_student(student_id, filter, now)
        .await?;

    Ok(Json(
        rows.into_iter()
            .map(|(reg, hackathon)| {
                RegistrationResponse::from(reg).with_hackathon(HackathonSummary::at(&hackathon, now))
            })
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/check/{hackathon_id}",
    tag = "Registrations",
    operation_id = "checkRegistration",
    summary = "Check whether the caller is registered",
    params(("hackathon_id" = Uuid, Path, description = "Hackathon ID")),
    responses(
        (status = 200, description = "Registration state", body = CheckResponse),
        (status = 400, description = "Malformed ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(student_id = %auth_user.user_id))]
pub async fn check_registration(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(hackathon_id): Path<String>,
) -> Result<Json<CheckResponse>, AppError> {
    auth_user.require_role(Role::Student)?;
    let hackathon_id = parse_id(&hackathon_id, "hackathon ID")?;

    let is_registered = state
        .registrations()
        .exists_for_student(hackathon_id, auth_user.user_id)
        .await?;
    Ok(Json(CheckResponse { is_registered }))
}
