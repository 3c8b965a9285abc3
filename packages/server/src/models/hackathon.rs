use chrono::{DateTime, NaiveDate, Utc};
use common::{HackathonKind, HackathonPhase};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::shared::{required_date, required_text};
use crate::entity::hackathon;
use crate::error::AppError;

/// Request body for creating a hackathon. All fields are required.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateHackathonRequest {
    #[serde(rename = "type")]
    pub kind: Option<HackathonKind>,
    #[schema(example = "Spark 2025")]
    pub name: Option<String>,
    #[schema(example = "Main Hall")]
    pub venue: Option<String>,
    /// Event date (YYYY-MM-DD).
    #[schema(example = "2025-03-10")]
    pub date: Option<String>,
    /// Registration opens (YYYY-MM-DD).
    pub regstart: Option<String>,
    /// Registration closes (YYYY-MM-DD).
    pub regend: Option<String>,
    pub details: Option<String>,
    #[schema(example = "24 hours")]
    pub duration: Option<String>,
    #[schema(example = "$1000")]
    pub prize: Option<String>,
    pub is_team_hackathon: Option<bool>,
}

/// A validated hackathon ready to be persisted.
pub struct NewHackathon {
    pub kind: HackathonKind,
    pub name: String,
    pub venue: String,
    pub date: NaiveDate,
    pub registration_start: NaiveDate,
    pub registration_end: NaiveDate,
    pub details: String,
    pub duration: String,
    pub prize: String,
    pub is_team_hackathon: bool,
}

pub fn validate_create_hackathon(payload: &CreateHackathonRequest) -> Result<NewHackathon, AppError> {
    let kind = payload
        .kind
        .ok_or_else(|| AppError::Validation("Hackathon type is required".into()))?;
    let name = required_text(payload.name.as_deref(), "Name", 200)?;
    let venue = required_text(payload.venue.as_deref(), "Venue", 200)?;
    let date = required_date(payload.date.as_deref(), "Date")?;
    let registration_start = required_date(payload.regstart.as_deref(), "Registration start")?;
    let registration_end = required_date(payload.regend.as_deref(), "Registration end")?;
    if registration_start > registration_end {
        return Err(AppError::Validation(
            "Registration start must not be after registration end".into(),
        ));
    }
    let details = required_text(payload.details.as_deref(), "Details", 10_000)?;
    let duration = required_text(payload.duration.as_deref(), "Duration", 100)?;
    let prize = required_text(payload.prize.as_deref(), "Prize", 200)?;
    let is_team_hackathon = payload
        .is_team_hackathon
        .ok_or_else(|| AppError::Validation("isTeamHackathon is required".into()))?;

    Ok(NewHackathon {
        kind,
        name,
        venue,
        date,
        registration_start,
        registration_end,
        details,
        duration,
        prize,
        is_team_hackathon,
    })
}

/// Parse an `upcoming` / `conducted` filter value.
pub fn parse_phase(raw: &str) -> Result<HackathonPhase, AppError> {
    match raw.trim() {
        "upcoming" => Ok(HackathonPhase::Upcoming),
        "conducted" => Ok(HackathonPhase::Conducted),
        _ => Err(AppError::Validation(
            "Invalid type. Use 'upcoming' or 'conducted'.".into(),
        )),
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HackathonListQuery {
    /// Optional `upcoming` or `conducted` filter.
    pub status: Option<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrganizerHackathonsQuery {
    /// `upcoming` or `conducted`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HackathonResponse {
    pub id: Uuid,
    pub organizer_id: Option<Uuid>,
    pub organizer_name: String,
    #[serde(rename = "type")]
    pub kind: HackathonKind,
    pub name: String,
    pub venue: String,
    pub date: NaiveDate,
    pub regstart: NaiveDate,
    pub regend: NaiveDate,
    pub details: String,
    pub duration: String,
    pub prize: String,
    pub is_team_hackathon: bool,
    /// Derived from `date` at read time.
    pub status: HackathonPhase,
    pub created_at: DateTime<Utc>,
}

impl HackathonResponse {
    pub fn at(m: hackathon::Model, now: DateTime<Utc>) -> Self {
        Self {
            id: m.id,
            organizer_id: m.organizer_id,
            organizer_name: m.organizer_name,
            kind: m.kind,
            name: m.name,
            venue: m.venue,
            status: HackathonPhase::at(m.date, now),
            date: m.date,
            regstart: m.registration_start,
            regend: m.registration_end,
            details: m.details,
            duration: m.duration,
            prize: m.prize,
            is_team_hackathon: m.is_team_hackathon,
            created_at: m.created_at,
        }
    }
}

impl From<hackathon::Model> for HackathonResponse {
    fn from(m: hackathon::Model) -> Self {
        Self::at(m, Utc::now())
    }
}

/// Hackathon display fields attached to registration responses.
#[derive(Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HackathonSummary {
    pub id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub venue: String,
    pub is_team_hackathon: bool,
    pub status: HackathonPhase,
}

impl HackathonSummary {
    pub fn at(m: &hackathon::Model, now: DateTime<Utc>) -> Self {
        Self {
            id: m.id,
            name: m.name.clone(),
            date: m.date,
            venue: m.venue.clone(),
            is_team_hackathon: m.is_team_hackathon,
            status: HackathonPhase::at(m.date, now),
        }
    }
}
