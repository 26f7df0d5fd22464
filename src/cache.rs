//! # Staleness markers
//!
//! Marking a page stale records its path in a Redis hash; the renderer picks
//! markers up on the next request for that path and regenerates the page from
//! the content store. Recording the marker is the only thing this service
//! waits for, regeneration itself is never awaited here.
//!
//! - Redis hash `stale_paths`: path (**string**) to marked-at epoch seconds (**int**)
//! - Re-marking an already stale path just refreshes the timestamp

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use thiserror::Error;

pub const STALE_PATHS_KEY: &str = "stale_paths";

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("page cache unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait PageCache: Send + Sync {
    async fn mark_stale(&self, path: &str) -> Result<(), CacheError>;
}

pub async fn init_redis(redis_url: &str) -> ConnectionManager {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url).unwrap();
    let connection_manager = client
        .get_connection_manager_with_config(config)
        .await
        .unwrap();

    connection_manager
}

pub struct RedisPageCache {
    connection: ConnectionManager,
}

impl RedisPageCache {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl PageCache for RedisPageCache {
    async fn mark_stale(&self, path: &str) -> Result<(), CacheError> {
        let mut connection = self.connection.clone();

        let _: () = connection
            .hset(STALE_PATHS_KEY, path, Utc::now().timestamp())
            .await?;

        Ok(())
    }
}
