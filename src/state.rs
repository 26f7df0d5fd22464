use std::sync::Arc;

use crate::{
    cache::{PageCache, RedisPageCache, init_redis},
    config::Config,
    content::{ContentStore, RestContentStore},
    storage::{HttpObjectStore, ObjectStore},
};

pub struct State {
    pub config: Config,
    pub content: Arc<dyn ContentStore>,
    pub cache: Arc<dyn PageCache>,
    pub storage: Arc<dyn ObjectStore>,
}

impl State {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let redis_connection = init_redis(&config.redis_url).await;
        let cache = Arc::new(RedisPageCache::new(redis_connection));

        let content = Arc::new(RestContentStore::new(
            &config.content_api_url,
            &config.content_api_key,
        ));

        let storage = Arc::new(HttpObjectStore::new(
            &config.storage_url,
            &config.storage_bucket,
            &config.content_api_key,
        ));

        Arc::new(Self {
            config,
            content,
            cache,
            storage,
        })
    }
}
