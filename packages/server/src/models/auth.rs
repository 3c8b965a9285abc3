use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::shared::is_valid_email;
use crate::entity::{admin, organizer_user, student_user};
use crate::error::AppError;

/// Kind of account a session belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Organizer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Organizer => "organizer",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for student sign-up.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterStudentRequest {
    #[schema(example = "Ann Lee")]
    pub name: String,
    #[schema(example = "ann@x.com")]
    pub email: String,
    /// Unique username (at least 4 characters).
    #[schema(example = "annlee")]
    pub username: String,
    /// Password (8-128 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

/// Request body for organizer sign-up.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterOrganizerRequest {
    #[schema(example = "Spark Club")]
    pub name: String,
    #[schema(example = "club@x.com")]
    pub email: String,
    #[schema(example = "sparkclub")]
    pub username: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
    /// Postal address, required for organizers.
    #[schema(example = "1 Campus Road")]
    pub address: Option<String>,
    /// Optional certificate reference.
    pub certificate: Option<String>,
}

fn validate_account_fields(
    name: &str,
    email: &str,
    username: &str,
    password: &str,
) -> Result<(), AppError> {
    if name.trim().chars().count() < 2 {
        return Err(AppError::Validation(
            "Name must be at least 2 characters".into(),
        ));
    }
    if !is_valid_email(email.trim()) {
        return Err(AppError::Validation("Valid email is required".into()));
    }
    let username = username.trim();
    if username.chars().count() < 4 || username.chars().count() > 32 {
        return Err(AppError::Validation(
            "Username must be 4-32 characters".into(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        return Err(AppError::Validation(
            "Username must contain only letters, digits, dots, and underscores".into(),
        ));
    }
    if password.len() < 8 || password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_register_student(payload: &RegisterStudentRequest) -> Result<(), AppError> {
    validate_account_fields(
        &payload.name,
        &payload.email,
        &payload.username,
        &payload.password,
    )
}

pub fn validate_register_organizer(payload: &RegisterOrganizerRequest) -> Result<(), AppError> {
    validate_account_fields(
        &payload.name,
        &payload.email,
        &payload.username,
        &payload.password,
    )?;
    if payload
        .address
        .as_deref()
        .is_none_or(|a| a.trim().is_empty())
    {
        return Err(AppError::Validation(
            "Address is required for organizers".into(),
        ));
    }
    Ok(())
}

/// Request body for student/organizer login.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "annlee")]
    pub username: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
    /// `student` or `organizer`. Admins use the admin login.
    pub user_type: Role,
}

/// Request body for admin login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

pub fn validate_login(username: &str, password: &str) -> Result<(), AppError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".into(),
        ));
    }
    Ok(())
}

/// Public profile of an account.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: Uuid,
    pub username: String,
    pub user_type: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,
}

impl From<student_user::Model> for AccountResponse {
    fn from(m: student_user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            user_type: Role::Student,
            name: Some(m.name),
            email: Some(m.email),
            address: None,
            certificate: None,
        }
    }
}

impl From<organizer_user::Model> for AccountResponse {
    fn from(m: organizer_user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            user_type: Role::Organizer,
            name: Some(m.name),
            email: Some(m.email),
            address: Some(m.address),
            certificate: m.certificate,
        }
    }
}

impl From<admin::Model> for AccountResponse {
    fn from(m: admin::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            user_type: Role::Admin,
            name: None,
            email: None,
            address: None,
            certificate: None,
        }
    }
}

/// Successful sign-up or login.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    /// JWT bearer token.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub user: AccountResponse,
}

/// Current authenticated identity.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: Uuid,
    pub username: String,
    pub user_type: Role,
}
