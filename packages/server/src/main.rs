use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use storage::PhotoStore;
use storage::cloudinary::{CloudinaryCredentials, CloudinaryPhotoStore};
use storage::filesystem::FilesystemPhotoStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dating_server::config::{AppConfig, StorageBackend, StorageConfig};
use dating_server::state::AppState;
use dating_server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    if config.auth.jwt_secret.is_empty() {
        anyhow::bail!("auth.jwt_secret must be set (e.g. DATINGAPP__AUTH__JWT_SECRET)");
    }

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    seed::ensure_indexes(&db).await?;

    if config.seed.enabled {
        seed::seed_users(&db, &config.seed.path)
            .await
            .context("Failed to seed users")?;
    }

    let photo_store = build_photo_store(&config.storage).await?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState {
        db,
        config: Arc::new(config),
        photo_store,
    };
    let app = build_router(state);

    info!("Server running at http://{}", addr);
    info!("API docs at http://{}/scalar", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_photo_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn PhotoStore>> {
    match config.backend {
        StorageBackend::Filesystem => {
            let store = FilesystemPhotoStore::new(
                config.filesystem.path.clone(),
                config.filesystem.public_url.clone(),
                config.max_upload_size,
            )
            .await
            .context("Failed to initialise filesystem photo store")?;
            info!(path = %store.base_path().display(), "Using filesystem photo store");
            Ok(Arc::new(store))
        }
        StorageBackend::Cloudinary => {
            let c = &config.cloudinary;
            if c.cloud_name.is_empty() || c.api_key.is_empty() || c.api_secret.is_empty() {
                anyhow::bail!(
                    "storage.cloudinary.cloud_name, api_key and api_secret must be set for the cloudinary backend"
                );
            }
            info!(cloud = %c.cloud_name, "Using Cloudinary photo store");
            Ok(Arc::new(
                CloudinaryPhotoStore::new(CloudinaryCredentials {
                    cloud_name: c.cloud_name.clone(),
                    api_key: c.api_key.clone(),
                    api_secret: c.api_secret.clone(),
                })
                .with_signature_algorithm(c.signature_algorithm),
            ))
        }
    }
}
