//! In-memory fakes for the capability traits, shared by the unit tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use axum::body::Bytes;

use crate::{
    cache::{CacheError, PageCache},
    content::{ContentEntity, ContentStore, StoreError},
    storage::{ObjectStore, StorageError},
};

#[derive(Default)]
pub struct FakeContentStore {
    pub products: Mutex<HashMap<String, Option<String>>>,
    pub posts: Mutex<HashMap<String, Option<String>>>,
    pub fail_lookups: AtomicBool,
    pub lookup_calls: AtomicU64,
}

impl FakeContentStore {
    pub fn insert_product(&self, slug: &str, category: Option<&str>) {
        self.products
            .lock()
            .unwrap()
            .insert(slug.to_string(), category.map(str::to_string));
    }

    pub fn insert_post(&self, slug: &str, category: Option<&str>) {
        self.posts
            .lock()
            .unwrap()
            .insert(slug.to_string(), category.map(str::to_string));
    }

    fn lookup(
        &self,
        map: &Mutex<HashMap<String, Option<String>>>,
        slug: &str,
    ) -> Result<Option<ContentEntity>, StoreError> {
        self.lookup_calls.fetch_add(1, Ordering::Relaxed);

        if self.fail_lookups.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("store down".to_string()));
        }

        Ok(map.lock().unwrap().get(slug).map(|category| ContentEntity {
            slug: slug.to_string(),
            category_slug: category.clone(),
        }))
    }
}

#[async_trait]
impl ContentStore for FakeContentStore {
    async fn product_by_slug(&self, slug: &str) -> Result<Option<ContentEntity>, StoreError> {
        self.lookup(&self.products, slug)
    }

    async fn blog_post_by_slug(&self, slug: &str) -> Result<Option<ContentEntity>, StoreError> {
        self.lookup(&self.posts, slug)
    }
}

#[derive(Default)]
pub struct FakePageCache {
    pub marks: Mutex<Vec<String>>,
    pub fail_paths: Mutex<HashSet<String>>,
    pub mark_calls: AtomicU64,
}

impl FakePageCache {
    pub fn marked(&self) -> Vec<String> {
        self.marks.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageCache for FakePageCache {
    async fn mark_stale(&self, path: &str) -> Result<(), CacheError> {
        self.mark_calls.fetch_add(1, Ordering::Relaxed);

        if self.fail_paths.lock().unwrap().contains(path) {
            return Err(CacheError::Unavailable("cache down".to_string()));
        }

        self.marks.lock().unwrap().push(path.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeObjectStore {
    pub objects: Mutex<HashMap<String, (String, Bytes)>>,
    pub fail_puts: AtomicBool,
    pub put_calls: AtomicU64,
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<String, StorageError> {
        self.put_calls.fetch_add(1, Ordering::Relaxed);

        if self.fail_puts.load(Ordering::Relaxed) {
            return Err(StorageError::Unavailable("storage down".to_string()));
        }

        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (content_type.to_string(), body));

        Ok(format!("http://storage.local/public/media/{key}"))
    }
}
