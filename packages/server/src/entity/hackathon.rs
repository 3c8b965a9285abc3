use common::HackathonKind;
use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "hackathon")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// NULL only for rows whose organizer reference was lost.
    pub organizer_id: Option<Uuid>,
    #[sea_orm(belongs_to, from = "organizer_id", to = "id")]
    pub organizer: HasOne<super::organizer_user::Entity>,

    /// Organizer display name at creation time. Never re-synced.
    pub organizer_name: String,
    pub kind: HackathonKind,
    pub name: String,
    pub venue: String,
    pub date: Date,
    pub registration_start: Date,
    pub registration_end: Date,
    #[sea_orm(column_type = "Text")]
    pub details: String,
    pub duration: String,
    pub prize: String,
    pub is_team_hackathon: bool,

    #[sea_orm(has_many)]
    pub registrations: HasMany<super::registered_hackathon::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
