use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use storage::cloudinary::SignatureAlgorithm;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// HMAC key for signing bearer tokens. Left empty, token issuing fails.
    #[serde(default)]
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Filesystem,
    Cloudinary,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FilesystemStorageConfig {
    pub path: PathBuf,
    /// URL prefix the stored files are reachable under.
    pub public_url: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CloudinaryConfig {
    #[serde(default)]
    pub cloud_name: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
    /// `sha1` (Cloudinary's default) or `sha256`.
    #[serde(default)]
    pub signature_algorithm: SignatureAlgorithm,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Maximum accepted photo upload in bytes.
    pub max_upload_size: u64,
    pub filesystem: FilesystemStorageConfig,
    #[serde(default)]
    pub cloudinary: CloudinaryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    pub enabled: bool,
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub seed: SeedConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.cors.allow_origins", vec!["http://localhost:4200"])?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "sqlite://datingapp.db?mode=rwc")?
            .set_default("storage.backend", "filesystem")?
            .set_default("storage.max_upload_size", 10 * 1024 * 1024)?
            .set_default("storage.filesystem.path", "./data/photos")?
            .set_default(
                "storage.filesystem.public_url",
                "http://127.0.0.1:5000/media",
            )?
            .set_default("seed.enabled", false)?
            .set_default("seed.path", "./seed/users.json")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., DATINGAPP__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("DATINGAPP").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
