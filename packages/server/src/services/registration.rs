use chrono::{DateTime, Utc};
use common::storage::{ObjectStore, StoredObject, Upload, is_pdf_content_type};
use common::{HackathonPhase, RegistrationStatus, ReviewDecision};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{hackathon, registered_hackathon, student_user};
use crate::error::AppError;
use crate::models::registration::{Participation, ProposalFile, RegistrationForm, StudentFilter};
use crate::utils::ids::parse_id;

/// A registration together with the hackathon it belongs to.
pub type JoinedRegistration = (registered_hackathon::Model, Option<hackathon::Model>);

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Registration lifecycle: create, review, and the read-side queries.
///
/// Proposal files go to `store` under `folder`. File and row writes are not
/// atomic together; a file whose row never lands is deleted best-effort.
pub struct RegistrationService<'a, C: ConnectionTrait> {
    conn: &'a C,
    store: &'a dyn ObjectStore,
    folder: &'a str,
}

impl<'a, C: ConnectionTrait> RegistrationService<'a, C> {
    pub fn new(conn: &'a C, store: &'a dyn ObjectStore, folder: &'a str) -> Self {
        Self {
            conn,
            store,
            folder,
        }
    }

    /// Register `student_id` for `hackathon_id`, storing the optional proposal.
    #[instrument(skip(self, form, proposal), fields(student_id = ?form.student_id))]
    pub async fn create(
        &self,
        hackathon_id: Uuid,
        form: &RegistrationForm,
        proposal: Option<&ProposalFile>,
    ) -> Result<registered_hackathon::Model, AppError> {
        let hackathon = hackathon::Entity::find_by_id(hackathon_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Hackathon not found".into()))?;

        let organizer_id = hackathon.organizer_id.ok_or_else(|| {
            AppError::InvalidState("Organizer ID is missing for the selected hackathon.".into())
        })?;

        let student_id = parse_id(form.student_id.as_deref().unwrap_or_default(), "student ID")?;
        student_user::Entity::find_by_id(student_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".into()))?;

        if self.exists_for_student(hackathon_id, student_id).await? {
            return Err(AppError::AlreadyRegistered);
        }

        let details = form.details()?;

        let stored = match proposal {
            Some(file) => Some(self.store_proposal(file).await?),
            None => None,
        };

        let members = match &details.participation {
            Participation::Team { members, .. } => serde_json::to_value(members)
                .map_err(|e| AppError::Internal(format!("Members encode error: {e}")))?,
            Participation::Solo { .. } => serde_json::Value::Array(Vec::new()),
        };
        let is_team = details.participation.is_team();
        let (leader_name, leader_email, team_name, name, email) = match details.participation {
            Participation::Team {
                leader_name,
                leader_email,
                team_name,
                ..
            } => (Some(leader_name), Some(leader_email), Some(team_name), None, None),
            Participation::Solo { name, email } => (None, None, None, Some(name), Some(email)),
        };

        let model = registered_hackathon::ActiveModel {
            id: Set(Uuid::now_v7()),
            hackathon_id: Set(hackathon.id),
            student_id: Set(student_id),
            organizer_id: Set(organizer_id),
            organizer_name: Set(hackathon.organizer_name.clone()),
            is_team: Set(is_team),
            leader_name: Set(leader_name),
            leader_email: Set(leader_email),
            team_name: Set(team_name),
            members: Set(members),
            name: Set(name),
            email: Set(email),
            date_of_birth: Set(details.date_of_birth),
            phone: Set(details.phone),
            education: Set(details.education),
            has_participated: Set(details.has_participated),
            proposal_url: Set(stored.as_ref().map(|s| s.url.clone())),
            proposal_public_id: Set(stored.as_ref().map(|s| s.public_id.clone())),
            proposal_original_name: Set(stored.as_ref().map(|s| s.original_name.clone())),
            proposal_thumbnail_url: Set(stored.as_ref().and_then(|s| s.thumbnail_url.clone())),
            status: Set(RegistrationStatus::Pending),
            registration_date: Set(Utc::now()),
        };

        match model.insert(self.conn).await {
            Ok(inserted) => {
                tracing::info!(
                    registration_id = %inserted.id,
                    is_team,
                    with_proposal = stored.is_some(),
                    "Registration created"
                );
                Ok(inserted)
            }
            Err(e) => {
                if let Some(stored) = &stored {
                    self.discard(&stored.public_id).await;
                }
                match e.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => {
                        tracing::debug!("Duplicate registration caught by unique index");
                        Err(AppError::AlreadyRegistered)
                    }
                    _ => Err(e.into()),
                }
            }
        }
    }

    /// Store a proposal and keep it only if it is a PDF.
    async fn store_proposal(&self, file: &ProposalFile) -> Result<StoredObject, AppError> {
        let stored = self
            .store
            .put(Upload {
                folder: self.folder,
                original_name: &file.original_name,
                content_type: file.content_type.as_deref(),
                data: &file.data,
            })
            .await?;

        let is_pdf = is_pdf_content_type(stored.content_type.as_deref())
            && file.data.starts_with(PDF_MAGIC);
        if !is_pdf {
            self.discard(&stored.public_id).await;
            return Err(AppError::Validation(
                "Only PDF files are allowed for proposals".into(),
            ));
        }
        Ok(stored)
    }

    /// Best-effort removal of an orphaned upload.
    async fn discard(&self, public_id: &str) {
        match self.store.delete(public_id).await {
            Ok(_) => tracing::debug!(public_id, "Discarded uploaded proposal"),
            Err(e) => tracing::warn!(public_id, "Failed to delete uploaded proposal: {}", e),
        }
    }

    /// Record an organizer's verdict.
    ///
    /// With `reviewer` set, only that organizer's registrations may be reviewed.
    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        registration_id: Uuid,
        decision: ReviewDecision,
        reviewer: Option<Uuid>,
    ) -> Result<JoinedRegistration, AppError> {
        let (existing, hackathon) = registered_hackathon::Entity::find_by_id(registration_id)
            .find_also_related(hackathon::Entity)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Proposal not found".into()))?;

        if reviewer.is_some_and(|org| org != existing.organizer_id) {
            return Err(AppError::PermissionDenied);
        }

        let next = existing.status.apply(decision);
        if existing.status.is_reviewed() && existing.status != next {
            tracing::info!(
                from = %existing.status,
                to = %next,
                "Overwriting an earlier review decision"
            );
        }

        let mut active: registered_hackathon::ActiveModel = existing.into();
        active.status = Set(next);
        let updated = active.update(self.conn).await?;

        Ok((updated, hackathon))
    }

    /// All registrations of a hackathon, oldest first.
    #[instrument(skip(self))]
    pub async fn find_by_hackathon(
        &self,
        hackathon_id: Uuid,
    ) -> Result<Vec<registered_hackathon::Model>, AppError> {
        Ok(registered_hackathon::Entity::find()
            .filter(registered_hackathon::Column::HackathonId.eq(hackathon_id))
            .order_by_asc(registered_hackathon::Column::RegistrationDate)
            .order_by_asc(registered_hackathon::Column::Id)
            .all(self.conn)
            .await?)
    }

    /// A student's registrations whose hackathon falls on the `filter` side of `now`.
    #[instrument(skip(self))]
    pub async fn find_by_student(
        &self,
        student_id: Uuid,
        filter: StudentFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<(registered_hackathon::Model, hackathon::Model)>, AppError> {
        let wanted = match filter {
            StudentFilter::Upcoming => HackathonPhase::Upcoming,
            StudentFilter::Participated => HackathonPhase::Conducted,
        };

        let rows = registered_hackathon::Entity::find()
            .filter(registered_hackathon::Column::StudentId.eq(student_id))
            .find_also_related(hackathon::Entity)
            .order_by_desc(registered_hackathon::Column::RegistrationDate)
            .order_by_desc(registered_hackathon::Column::Id)
            .all(self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(reg, hackathon)| match hackathon {
                Some(h) => Some((reg, h)),
                None => {
                    tracing::warn!(registration_id = %reg.id, "Registration without hackathon");
                    None
                }
            })
            .filter(|(_, h)| HackathonPhase::at(h.date, now) == wanted)
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn exists_for_student(
        &self,
        hackathon_id: Uuid,
        student_id: Uuid,
    ) -> Result<bool, AppError> {
        let found = registered_hackathon::Entity::find()
            .filter(registered_hackathon::Column::HackathonId.eq(hackathon_id))
            .filter(registered_hackathon::Column::StudentId.eq(student_id))
            .one(self.conn)
            .await?;
        Ok(found.is_some())
    }

    /// Proposals addressed to an organizer, newest first.
    #[instrument(skip(self))]
    pub async fn find_by_organizer(
        &self,
        organizer_id: Uuid,
    ) -> Result<Vec<JoinedRegistration>, AppError> {
        Ok(registered_hackathon::Entity::find()
            .filter(registered_hackathon::Column::OrganizerId.eq(organizer_id))
            .find_also_related(hackathon::Entity)
            .order_by_desc(registered_hackathon::Column::RegistrationDate)
            .order_by_desc(registered_hackathon::Column::Id)
            .all(self.conn)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn count_for_hackathon(&self, hackathon_id: Uuid) -> Result<u64, AppError> {
        Ok(registered_hackathon::Entity::find()
            .filter(registered_hackathon::Column::HackathonId.eq(hackathon_id))
            .count(self.conn)
            .await?)
    }
}
