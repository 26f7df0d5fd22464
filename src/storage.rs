//! Object-storage client behind the upload proxy.
//!
//! The frontend never talks to the storage service directly; uploads pass
//! through our backend which attaches the service key and hands back the
//! public URL of the stored object.

use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("object store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores the bytes under `key` and returns the object's public URL.
    async fn put(&self, key: &str, content_type: &str, body: Bytes)
        -> Result<String, StorageError>;
}

pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    service_key: String,
}

impl HttpObjectStore {
    pub fn new(base_url: &str, bucket: &str, service_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            service_key: service_key.to_string(),
        }
    }

    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{key}",
            self.base_url, self.bucket
        )
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<String, StorageError> {
        let url = format!("{}/storage/v1/object/{}/{key}", self.base_url, self.bucket);

        self.client
            .post(&url)
            .bearer_auth(&self.service_key)
            .header("content-type", content_type)
            .header("x-upsert", "true")
            .body(body)
            .send()
            .await?
            .error_for_status()?;

        Ok(self.public_url(key))
    }
}
