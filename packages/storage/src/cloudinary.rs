use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use super::error::StorageError;
use super::traits::{DestroyStatus, PhotoStore, StoredImage};
use super::transform::Transformation;

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

/// Credentials for a Cloudinary account.
#[derive(Debug, Clone)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Digest used for request signatures. Cloudinary accounts verify SHA-1
/// unless switched to SHA-256 in their security settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

/// Photo store backed by the Cloudinary image upload API.
///
/// One instance holds one pooled HTTP client and is meant to be shared for
/// the lifetime of the process.
pub struct CloudinaryPhotoStore {
    client: reqwest::Client,
    credentials: CloudinaryCredentials,
    api_base: String,
    signature_algorithm: SignatureAlgorithm,
}

#[derive(Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
    #[serde(default)]
    bytes: u64,
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl CloudinaryPhotoStore {
    pub fn new(credentials: CloudinaryCredentials) -> Self {
        Self::with_api_base(credentials, DEFAULT_API_BASE)
    }

    /// Point the store at a different API host (used for proxies and tests).
    pub fn with_api_base(credentials: CloudinaryCredentials, api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            signature_algorithm: SignatureAlgorithm::default(),
        }
    }

    pub fn with_signature_algorithm(mut self, algorithm: SignatureAlgorithm) -> Self {
        self.signature_algorithm = algorithm;
        self
    }

    fn sign(&self, params: &[(&str, &str)]) -> String {
        sign(params, &self.credentials.api_secret, self.signature_algorithm)
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1_1/{}/image/{}",
            self.api_base, self.credentials.cloud_name, action
        )
    }

    async fn read_json<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, StorageError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        serde_json::from_str(&body)
            .map_err(|e| StorageError::Transport(format!("unexpected response body: {e}")))
    }
}

fn unix_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
        .to_string()
}

/// Compute the request signature: parameters sorted by name, joined as
/// `k=v&k=v`, secret appended, digested, lowercase hex.
fn sign(params: &[(&str, &str)], api_secret: &str, algorithm: SignatureAlgorithm) -> String {
    let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let payload = format!("{to_sign}{api_secret}");
    match algorithm {
        SignatureAlgorithm::Sha1 => hex::encode(Sha1::digest(payload.as_bytes())),
        SignatureAlgorithm::Sha256 => hex::encode(Sha256::digest(payload.as_bytes())),
    }
}

#[async_trait]
impl PhotoStore for CloudinaryPhotoStore {
    async fn upload(
        &self,
        data: &[u8],
        file_name: &str,
        transformation: &Transformation,
    ) -> Result<StoredImage, StorageError> {
        let timestamp = unix_timestamp();
        let transformation = transformation.to_string();
        let signature = self.sign(&[
            ("timestamp", timestamp.as_str()),
            ("transformation", transformation.as_str()),
        ]);

        let form = Form::new()
            .part(
                "file",
                Part::bytes(data.to_vec()).file_name(file_name.to_string()),
            )
            .text("api_key", self.credentials.api_key.clone())
            .text("timestamp", timestamp)
            .text("transformation", transformation)
            .text("signature", signature);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadResponse = Self::read_json(response).await?;

        Ok(StoredImage {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
            bytes: uploaded.bytes,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<DestroyStatus, StorageError> {
        let timestamp = unix_timestamp();
        let signature = self.sign(&[("public_id", public_id), ("timestamp", timestamp.as_str())]);

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .form(&[
                ("public_id", public_id),
                ("api_key", self.credentials.api_key.as_str()),
                ("timestamp", timestamp.as_str()),
                ("signature", signature.as_str()),
            ])
            .send()
            .await?;
        let destroyed: DestroyResponse = Self::read_json(response).await?;

        if destroyed.result == "ok" {
            Ok(DestroyStatus::Ok)
        } else {
            Ok(DestroyStatus::Other(destroyed.result))
        }
    }
}
