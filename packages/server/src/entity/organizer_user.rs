use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "organizer_user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Display name, copied onto hackathons at creation time.
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    pub password: String,
    pub address: String,
    /// Reference to an accreditation certificate, if one was supplied.
    pub certificate: Option<String>,

    #[sea_orm(has_many)]
    pub hackathons: HasMany<super::hackathon::Entity>,

    #[sea_orm(has_many)]
    pub registrations: HasMany<super::registered_hackathon::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
