use common::RegistrationStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether the registrant has taken part in a hackathon before.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(3))")]
#[serde(rename_all = "lowercase")]
pub enum PriorParticipation {
    #[sea_orm(string_value = "yes")]
    Yes,
    #[sea_orm(string_value = "no")]
    No,
}

/// A single team member. Stored as JSON array in the database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TeamMember {
    pub name: String,
    pub email: String,
    /// Date of birth (YYYY-MM-DD).
    pub dob: String,
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "registered_hackathon")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    // (hackathon_id, student_id) is unique, see `seed::ensure_indexes`.
    pub hackathon_id: Uuid,
    #[sea_orm(belongs_to, from = "hackathon_id", to = "id")]
    pub hackathon: HasOne<super::hackathon::Entity>,

    pub student_id: Uuid,
    #[sea_orm(belongs_to, from = "student_id", to = "id")]
    pub student: HasOne<super::student_user::Entity>,

    pub organizer_id: Uuid,
    #[sea_orm(belongs_to, from = "organizer_id", to = "id")]
    pub organizer: HasOne<super::organizer_user::Entity>,
    pub organizer_name: String,

    /// Discriminates the team columns from the solo columns.
    pub is_team: bool,
    pub leader_name: Option<String>,
    pub leader_email: Option<String>,
    pub team_name: Option<String>,
    /// Team members as JSON array of {name, email, dob}. Empty for solo entries.
    #[sea_orm(column_type = "Json")]
    pub members: Json,
    pub name: Option<String>,
    pub email: Option<String>,

    pub date_of_birth: Date,
    pub phone: String,
    pub education: String,
    pub has_participated: PriorParticipation,

    pub proposal_url: Option<String>,
    pub proposal_public_id: Option<String>,
    pub proposal_original_name: Option<String>,
    pub proposal_thumbnail_url: Option<String>,

    pub status: RegistrationStatus,
    pub registration_date: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
