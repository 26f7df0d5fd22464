//! # Revalidation cascade
//!
//! One changed path in, an ordered deduplicated list of stale-marked paths
//! out. The primary path is always marked first and a failure there fails the
//! whole request; everything derived from it is best effort. Dependents come
//! from a single store lookup per request (product or blog post by slug), so
//! the cascade is exactly two levels deep and never recurses.

use tracing::warn;

use crate::{cache::PageCache, content::ContentStore, error::AppError};

pub const PRODUCT_INDEX: &str = "/products";
pub const PRODUCT_PREFIX: &str = "/products/";
pub const PRODUCT_CATEGORY_PREFIX: &str = "/products/category/";

pub const BLOG_INDEX: &str = "/blog";
pub const BLOG_PREFIX: &str = "/blog/";
pub const BLOG_CATEGORY_PREFIX: &str = "/blog/category/";

/// Normalizes raw caller input into a lookup key: surrounding whitespace and
/// trailing slashes dropped, leading slash enforced. Returns `None` when
/// nothing usable remains.
pub fn normalize_path(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');

    if trimmed.is_empty() || trimmed == "/" {
        return if raw.trim().is_empty() {
            None
        } else {
            Some("/".to_string())
        };
    }

    if trimmed.starts_with('/') {
        Some(trimmed.to_string())
    } else {
        Some(format!("/{trimmed}"))
    }
}

/// Marks `path` stale, then derives and marks its dependent pages.
///
/// Returns the paths actually marked, in issuance order with `path` first.
/// Only the primary mark is fatal; dependent lookups and marks are logged and
/// skipped on failure.
pub async fn invalidate_cascade(
    content: &dyn ContentStore,
    cache: &dyn PageCache,
    path: &str,
) -> Result<Vec<String>, AppError> {
    cache
        .mark_stale(path)
        .await
        .map_err(|e| {
            warn!("Failed to mark primary path {path} stale: {e}");
            AppError::Invalidation(path.to_string())
        })?;

    let mut marked = vec![path.to_string()];

    for dependent in dependent_paths(content, path).await {
        if marked.contains(&dependent) {
            continue;
        }

        match cache.mark_stale(&dependent).await {
            Ok(()) => marked.push(dependent),
            Err(e) => warn!("Skipping dependent {dependent}: {e}"),
        }
    }

    Ok(marked)
}

/// Derives the dependent listing pages for a changed path.
///
/// Longest-prefix classification: category listings match before detail
/// pages and derive nothing themselves. Index pages are pushed before the
/// store is consulted, so a lookup failure still leaves them in the set.
async fn dependent_paths(content: &dyn ContentStore, path: &str) -> Vec<String> {
    let mut dependents = Vec::new();

    if let Some(slug) = detail_slug(path, PRODUCT_PREFIX, PRODUCT_CATEGORY_PREFIX) {
        dependents.push(PRODUCT_INDEX.to_string());

        match content.product_by_slug(slug).await {
            Ok(Some(product)) => {
                if let Some(category) = product.category_slug {
                    dependents.push(format!("{PRODUCT_CATEGORY_PREFIX}{category}"));
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Product lookup for {slug} failed: {e}"),
        }
    } else if let Some(slug) = detail_slug(path, BLOG_PREFIX, BLOG_CATEGORY_PREFIX) {
        dependents.push(BLOG_INDEX.to_string());

        match content.blog_post_by_slug(slug).await {
            Ok(Some(post)) => {
                if let Some(category) = post.category_slug {
                    dependents.push(format!("{BLOG_CATEGORY_PREFIX}{category}"));
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Blog post lookup for {slug} failed: {e}"),
        }
    }

    dependents
}

/// The final path segment of a detail page, or `None` when the path is not a
/// detail page under `prefix` (including when it is a category listing).
fn detail_slug<'a>(path: &'a str, prefix: &str, category_prefix: &str) -> Option<&'a str> {
    if !path.starts_with(prefix) || path.starts_with(category_prefix) {
        return None;
    }

    let slug = path.rsplit('/').next()?;

    if slug.is_empty() { None } else { Some(slug) }
}
