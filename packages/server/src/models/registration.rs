use chrono::{DateTime, NaiveDate, Utc};
use common::RegistrationStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::hackathon::HackathonSummary;
use super::shared::{parse_date, required_date, required_email, required_text};
use crate::entity::registered_hackathon::{self, PriorParticipation, TeamMember};
use crate::error::AppError;

/// Raw multipart registration form. Every field arrives as text.
#[derive(Debug, Default, Clone)]
pub struct RegistrationForm {
    pub hackathon_id: Option<String>,
    pub student_id: Option<String>,
    pub is_team: Option<String>,
    pub leader_name: Option<String>,
    pub leader_email: Option<String>,
    pub team_name: Option<String>,
    /// JSON array of `{name, email, dob}`.
    pub members: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub dob: Option<String>,
    pub phone: Option<String>,
    pub education: Option<String>,
    pub has_participated: Option<String>,
}

/// Uploaded proposal file, buffered in memory.
#[derive(Debug, Clone)]
pub struct ProposalFile {
    pub original_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Multipart schema of the registration endpoint, for the API docs only.
#[allow(dead_code)]
#[derive(utoipa::ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct RegistrationMultipart {
    pub hackathon_id: Uuid,
    pub student_id: Uuid,
    /// `true` for team entries, `false` for solo entries.
    pub is_team: bool,
    pub leader_name: Option<String>,
    pub leader_email: Option<String>,
    pub team_name: Option<String>,
    /// JSON-encoded array of `{name, email, dob}`.
    pub members: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    /// Date of birth (YYYY-MM-DD).
    pub dob: String,
    pub phone: String,
    pub education: String,
    /// `yes` or `no`.
    pub has_participated: String,
    /// Optional PDF proposal.
    #[schema(value_type = Option<String>, format = Binary)]
    pub file: Option<Vec<u8>>,
}

/// Solo or team shape of a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Participation {
    Solo {
        name: String,
        email: String,
    },
    Team {
        leader_name: String,
        leader_email: String,
        team_name: String,
        members: Vec<TeamMember>,
    },
}

impl Participation {
    pub fn is_team(&self) -> bool {
        matches!(self, Self::Team { .. })
    }
}

/// Registration fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDetails {
    pub participation: Participation,
    pub date_of_birth: NaiveDate,
    pub phone: String,
    pub education: String,
    pub has_participated: PriorParticipation,
}

fn parse_bool(raw: Option<&str>, field: &str) -> Result<bool, AppError> {
    match raw.map(str::trim) {
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(_) => Err(AppError::Validation(format!("{field} must be true or false"))),
        None => Err(AppError::Validation(format!("{field} is required"))),
    }
}

fn parse_prior_participation(raw: Option<&str>) -> Result<PriorParticipation, AppError> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("yes") => Ok(PriorParticipation::Yes),
        Some("no") => Ok(PriorParticipation::No),
        Some(_) => Err(AppError::Validation(
            "hasParticipated must be 'yes' or 'no'".into(),
        )),
        None => Err(AppError::Validation("hasParticipated is required".into())),
    }
}

/// Decode the `members` JSON string and check every entry.
pub fn parse_members(raw: Option<&str>) -> Result<Vec<TeamMember>, AppError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    let members: Vec<TeamMember> = serde_json::from_str(raw).map_err(|e| {
        AppError::Validation(format!(
            "members must be a JSON array of {{name, email, dob}}: {e}"
        ))
    })?;

    members
        .into_iter()
        .enumerate()
        .map(|(i, m)| {
            let n = i + 1;
            let name = required_text(Some(&m.name), &format!("Member {n} name"), 100)?;
            let email = required_email(Some(&m.email), &format!("Member {n} email"))?;
            let dob = parse_date(&m.dob, &format!("Member {n} date of birth"))?;
            Ok(TeamMember {
                name,
                email,
                dob: dob.to_string(),
            })
        })
        .collect()
}

fn is_filled(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl RegistrationForm {
    /// Check the participant fields against the `isTeam` flag and the common fields.
    pub fn details(&self) -> Result<RegistrationDetails, AppError> {
        let is_team = parse_bool(self.is_team.as_deref(), "isTeam")?;

        let participation = if is_team {
            if is_filled(&self.name) || is_filled(&self.email) {
                return Err(AppError::Validation(
                    "Team registrations use leader fields, not name or email".into(),
                ));
            }
            Participation::Team {
                leader_name: required_text(self.leader_name.as_deref(), "Leader name", 100)?,
                leader_email: required_email(self.leader_email.as_deref(), "Leader email")?,
                team_name: required_text(self.team_name.as_deref(), "Team name", 100)?,
                members: parse_members(self.members.as_deref())?,
            }
        } else {
            if is_filled(&self.leader_name)
                || is_filled(&self.leader_email)
                || is_filled(&self.team_name)
            {
                return Err(AppError::Validation(
                    "Solo registrations cannot include team fields".into(),
                ));
            }
            if !parse_members(self.members.as_deref())?.is_empty() {
                return Err(AppError::Validation(
                    "Solo registrations cannot include team members".into(),
                ));
            }
            Participation::Solo {
                name: required_text(self.name.as_deref(), "Name", 100)?,
                email: required_email(self.email.as_deref(), "Email")?,
            }
        };

        Ok(RegistrationDetails {
            participation,
            date_of_birth: required_date(self.dob.as_deref(), "Date of birth")?,
            phone: required_text(self.phone.as_deref(), "Phone", 32)?,
            education: required_text(self.education.as_deref(), "Education", 200)?,
            has_participated: parse_prior_participation(self.has_participated.as_deref())?,
        })
    }
}

/// Which half of a student's registrations to return.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StudentFilter {
    /// Hackathons that have not happened yet.
    Upcoming,
    /// Hackathons already held.
    Participated,
}

impl StudentFilter {
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(str::trim) {
            Some("upcoming") => Ok(Self::Upcoming),
            Some("participated") => Ok(Self::Participated),
            _ => Err(AppError::Validation(
                "Invalid type. Use 'upcoming' or 'participated'.".into(),
            )),
        }
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentRegistrationsQuery {
    /// `upcoming` or `participated`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ProposalListQuery {
    /// Defaults to the caller when omitted.
    pub organizer_id: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposalResponse {
    pub url: String,
    pub public_id: String,
    pub original_name: Option<String>,
    pub thumbnail_url: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub id: Uuid,
    pub hackathon_id: Uuid,
    pub student_id: Uuid,
    pub organizer_id: Uuid,
    pub organizer_name: String,
    pub is_team: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    pub members: Vec<TeamMember>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub dob: NaiveDate,
    pub phone: String,
    pub education: String,
    pub has_participated: PriorParticipation,
    pub proposal: Option<ProposalResponse>,
    pub status: RegistrationStatus,
    pub registration_date: DateTime<Utc>,
    /// Joined hackathon display fields, where the endpoint provides them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hackathon: Option<HackathonSummary>,
}

impl RegistrationResponse {
    pub fn with_hackathon(mut self, summary: HackathonSummary) -> Self {
        self.hackathon = Some(summary);
        self
    }
}

impl From<registered_hackathon::Model> for RegistrationResponse {
    fn from(m: registered_hackathon::Model) -> Self {
        let members = serde_json::from_value(m.members).unwrap_or_else(|e| {
            tracing::warn!(registration_id = %m.id, "Unreadable members column: {}", e);
            Vec::new()
        });
        let proposal = match (m.proposal_url, m.proposal_public_id) {
            (Some(url), Some(public_id)) => Some(ProposalResponse {
                url,
                public_id,
                original_name: m.proposal_original_name,
                thumbnail_url: m.proposal_thumbnail_url,
            }),
            _ => None,
        };
        Self {
            id: m.id,
            hackathon_id: m.hackathon_id,
            student_id: m.student_id,
            organizer_id: m.organizer_id,
            organizer_name: m.organizer_name,
            is_team: m.is_team,
            leader_name: m.leader_name,
            leader_email: m.leader_email,
            team_name: m.team_name,
            members,
            name: m.name,
            email: m.email,
            dob: m.date_of_birth,
            phone: m.phone,
            education: m.education,
            has_participated: m.has_participated,
            proposal,
            status: m.status,
            registration_date: m.registration_date,
            hackathon: None,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub is_registered: bool,
}
