use serde::Serialize;
use uuid::Uuid;

use crate::entity::{organizer_user, student_user};

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserCountsResponse {
    pub students: u64,
    pub organizers: u64,
    pub total: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventCountsResponse {
    pub total: u64,
    pub upcoming: u64,
    pub conducted: u64,
    /// Events still open, i.e. upcoming ones.
    pub active: u64,
}

/// Directory entry for the admin student/organizer lists.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
}

impl From<student_user::Model> for UserSummary {
    fn from(m: student_user::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            username: m.username,
            email: m.email,
        }
    }
}

impl From<organizer_user::Model> for UserSummary {
    fn from(m: organizer_user::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            username: m.username,
            email: m.email,
        }
    }
}
