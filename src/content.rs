//! Content lookups against the hosted backend's REST endpoint.
//!
//! Entities carry only what resolution needs: the slug and an optional
//! category reference. Lookups are read-only and keyed by slug.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("content request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("content store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Deserialize, Debug, Clone)]
pub struct ContentEntity {
    pub slug: String,
    pub category_slug: Option<String>,
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn product_by_slug(&self, slug: &str) -> Result<Option<ContentEntity>, StoreError>;

    async fn blog_post_by_slug(&self, slug: &str) -> Result<Option<ContentEntity>, StoreError>;
}

pub struct RestContentStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestContentStore {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn fetch_by_slug(
        &self,
        table: &str,
        slug: &str,
    ) -> Result<Option<ContentEntity>, StoreError> {
        let url = format!("{}/rest/v1/{table}", self.base_url);

        let rows: Vec<ContentEntity> = self
            .client
            .get(&url)
            .query(&[
                ("slug", format!("eq.{slug}")),
                ("select", "slug,category_slug".to_string()),
                ("limit", "1".to_string()),
            ])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl ContentStore for RestContentStore {
    async fn product_by_slug(&self, slug: &str) -> Result<Option<ContentEntity>, StoreError> {
        self.fetch_by_slug("products", slug).await
    }

    async fn blog_post_by_slug(&self, slug: &str) -> Result<Option<ContentEntity>, StoreError> {
        self.fetch_by_slug("blog_posts", slug).await
    }
}
