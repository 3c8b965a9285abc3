use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{admin, organizer_user, student_user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::{
    AccountResponse, AdminLoginRequest, AuthResponse, LoginRequest, MeResponse,
    RegisterOrganizerRequest, RegisterStudentRequest, Role, validate_login,
    validate_register_organizer, validate_register_student,
};
use crate::state::AppState;
use crate::utils::{hash, jwt};

fn issue_token(state: &AppState, id: Uuid, username: &str, role: Role) -> Result<String, AppError> {
    jwt::sign(
        id,
        username,
        role,
        state.config.auth.token_ttl_hours,
        &state.config.auth.jwt_secret,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))
}

fn hash_new_password(password: &str) -> Result<String, AppError> {
    hash::hash_password(password).map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))
}

fn check_password(password: &str, stored: &str) -> Result<(), AppError> {
    let is_valid = hash::verify_password(password, stored)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;
    if is_valid {
        Ok(())
    } else {
        Err(AppError::InvalidCredentials)
    }
}

fn map_unique_violation(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            tracing::debug!("Sign-up race condition: unique constraint caught on insert");
            AppError::Conflict("Email or username already in use".into())
        }
        _ => AppError::from(e),
    }
}

#[utoipa::path(
    post,
    path = "/register/student",
    tag = "Auth",
    operation_id = "registerStudent",
    summary = "Register a student account",
    description = "Creates a student account and returns a session token. Email and username must be unused.",
    request_body = RegisterStudentRequest,
    responses(
        (status = 201, description = "Student registered", body = AuthResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Email or username taken (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn register_student(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_register_student(&payload)?;

    let email = payload.email.trim().to_lowercase();
    let username = payload.username.trim().to_string();

    let email_taken = student_user::Entity::find()
        .filter(student_user::Column::Email.eq(&email))
        .one(&state.db)
        .await?
        .is_some();
    if email_taken {
        return Err(AppError::Conflict("Email already in use".into()));
    }
    let username_taken = student_user::Entity::find()
        .filter(student_user::Column::Username.eq(&username))
        .one(&state.db)
        .await?
        .is_some();
    if username_taken {
        return Err(AppError::Conflict("Username already taken".into()));
    }

    let new_student = student_user::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(payload.name.trim().to_string()),
        email: Set(email),
        username: Set(username),
        password: Set(hash_new_password(&payload.password)?),
        created_at: Set(chrono::Utc::now()),
    };
    let student = new_student
        .insert(&state.db)
        .await
        .map_err(map_unique_violation)?;

    let token = issue_token(&state, student.id, &student.username, Role::Student)?;
    tracing::info!(student_id = %student.id, "Student registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: AccountResponse::from(student),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/register/organizer",
    tag = "Auth",
    operation_id = "registerOrganizer",
    summary = "Register an organizer account",
    description = "Creates an organizer account and returns a session token. An address is required; a certificate reference is optional.",
    request_body = RegisterOrganizerRequest,
    responses(
        (status = 201, description = "Organizer registered", body = AuthResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Email or username taken (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn register_organizer(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterOrganizerRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_register_organizer(&payload)?;

    let email = payload.email.trim().to_lowercase();
    let username = payload.username.trim().to_string();

    let email_taken = organizer_user::Entity::find()
        .filter(organizer_user::Column::Email.eq(&email))
        .one(&state.db)
        .await?
        .is_some();
    if email_taken {
        return Err(AppError::Conflict("Email already in use".into()));
    }
    let username_taken = organizer_user::Entity::find()
        .filter(organizer_user::Column::Username.eq(&username))
        .one(&state.db)
        .await?
        .is_some();
    if username_taken {
        return Err(AppError::Conflict("Username already taken".into()));
    }

    let new_organizer = organizer_user::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(payload.name.trim().to_string()),
        email: Set(email),
        username: Set(username),
        password: Set(hash_new_password(&payload.password)?),
        address: Set(payload.address.as_deref().unwrap_or_default().trim().to_string()),
        certificate: Set(payload
            .certificate
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())),
        created_at: Set(chrono::Utc::now()),
    };
    let organizer = new_organizer
        .insert(&state.db)
        .await
        .map_err(map_unique_violation)?;

    let token = issue_token(&state, organizer.id, &organizer.username, Role::Organizer)?;
    tracing::info!(organizer_id = %organizer.id, "Organizer registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: AccountResponse::from(organizer),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Log in as a student or organizer",
    description = "Authenticates against the account table selected by `userType` and returns a session token.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid credentials (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username, user_type = %payload.user_type))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    validate_login(&payload.username, &payload.password)?;
    let username = payload.username.trim();

    let (id, account) = match payload.user_type {
        Role::Student => {
            let student = student_user::Entity::find()
                .filter(student_user::Column::Username.eq(username))
                .one(&state.db)
                .await?
                .ok_or(AppError::InvalidCredentials)?;
            check_password(&payload.password, &student.password)?;
            (student.id, AccountResponse::from(student))
        }
        Role::Organizer => {
            let organizer = organizer_user::Entity::find()
                .filter(organizer_user::Column::Username.eq(username))
                .one(&state.db)
                .await?
                .ok_or(AppError::InvalidCredentials)?;
            check_password(&payload.password, &organizer.password)?;
            (organizer.id, AccountResponse::from(organizer))
        }
        Role::Admin => {
            return Err(AppError::Validation(
                "userType must be 'student' or 'organizer'".into(),
            ));
        }
    };

    let token = issue_token(&state, id, &account.username, payload.user_type)?;
    Ok(Json(AuthResponse {
        token,
        user: account,
    }))
}

#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "Auth",
    operation_id = "adminLogin",
    summary = "Log in as an administrator",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid credentials (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn admin_login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AdminLoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    validate_login(&payload.username, &payload.password)?;

    let account = admin::Entity::find()
        .filter(admin::Column::Username.eq(payload.username.trim()))
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;
    check_password(&payload.password, &account.password)?;

    let token = issue_token(&state, account.id, &account.username, Role::Admin)?;
    Ok(Json(AuthResponse {
        token,
        user: AccountResponse::from(account),
    }))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    operation_id = "getCurrentUser",
    summary = "Get current authenticated account",
    responses(
        (status = 200, description = "Current account", body = MeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user), fields(user_id = %auth_user.user_id))]
pub async fn me(auth_user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: auth_user.user_id,
        username: auth_user.username,
        user_type: auth_user.role,
    })
}
