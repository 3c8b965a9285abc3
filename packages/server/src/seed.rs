use sea_orm::sea_query::Index;
use sea_orm::*;
use tracing::info;

use crate::config::AdminBootstrapConfig;
use crate::entity::{admin, registered_hackathon};
use crate::utils::hash;

/// Create the bootstrap admin account if configured and not yet present.
pub async fn seed_admin(db: &DatabaseConnection, config: &AdminBootstrapConfig) -> Result<(), DbErr> {
    let (Some(username), Some(password)) = (&config.username, &config.password) else {
        return Ok(());
    };
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        tracing::warn!("Admin bootstrap skipped: empty username or password");
        return Ok(());
    }

    let existing = admin::Entity::find()
        .filter(admin::Column::Username.eq(username))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let password_hash = hash::hash_password(password)
        .map_err(|e| DbErr::Custom(format!("Password hash error: {e}")))?;

    let model = admin::ActiveModel {
        id: Set(uuid::Uuid::now_v7()),
        username: Set(username.to_string()),
        password: Set(password_hash),
        created_at: Set(chrono::Utc::now()),
    };

    let result = admin::Entity::insert(model)
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(admin::Column::Username)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(_) => {
            info!("Seeded admin account '{}'", username);
            Ok(())
        }
        Err(DbErr::RecordNotInserted) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // One registration per student per hackathon. Closes the race between
    // the duplicate check and the insert.
    let stmt = Index::create()
        .if_not_exists()
        .unique()
        .name("idx_registration_hackathon_student")
        .table(registered_hackathon::Entity)
        .col(registered_hackathon::Column::HackathonId)
        .col(registered_hackathon::Column::StudentId)
        .to_owned();
    let backend = db.get_database_backend();
    db.execute_raw(backend.build(&stmt)).await?;
    info!("Ensured index idx_registration_hackathon_student exists");

    // Proposal listing: WHERE organizer_id = ? ORDER BY registration_date DESC
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_registration_organizer_date")
        .table(registered_hackathon::Entity)
        .col(registered_hackathon::Column::OrganizerId)
        .col(registered_hackathon::Column::RegistrationDate)
        .to_owned();

    match db.execute_raw(backend.build(&stmt)).await {
        Ok(_) => {
            info!("Ensured index idx_registration_organizer_date exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_registration_organizer_date: {}", e);
        }
    }

    Ok(())
}
