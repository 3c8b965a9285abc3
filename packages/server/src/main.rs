use std::sync::Arc;

use anyhow::Context;
use common::storage::ObjectStore;
use common::storage::filesystem::FilesystemObjectStore;
use tracing::{Level, info};

use server::config::{AppConfig, StorageBackend, StorageConfig};
use server::report::PdfReportRenderer;
use server::state::AppState;

async fn object_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn ObjectStore>> {
    match config.backend {
        StorageBackend::Filesystem => {
            let store = FilesystemObjectStore::new(
                config.root.clone(),
                config.public_base_url.clone(),
                config.max_upload_size,
            )
            .await
            .context("failed to open upload directory")?;
            info!("Storing uploads under {}", config.root.display());
            Ok(Arc::new(store))
        }
        #[cfg(feature = "s3")]
        StorageBackend::S3 => {
            let s3 = config
                .s3
                .as_ref()
                .context("storage.s3 must be set for the s3 backend")?;
            let store = common::storage::s3::S3ObjectStore::new(
                s3,
                config.public_base_url.clone(),
                config.max_upload_size,
            )
            .context("failed to configure S3 bucket")?;
            info!("Storing uploads in bucket {}", s3.bucket);
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "s3"))]
        StorageBackend::S3 => {
            anyhow::bail!("storage.backend = \"s3\" requires building with the `s3` feature")
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = server::database::init_db(&config.database.url).await?;
    server::seed::ensure_indexes(&db).await?;
    server::seed::seed_admin(&db, &config.auth.admin).await?;

    let state = AppState {
        db,
        object_store: object_store(&config.storage).await?,
        reports: Arc::new(PdfReportRenderer),
        config: config.clone(),
    };

    let app = server::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);
    info!("API docs at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
