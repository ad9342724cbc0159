use std::sync::Arc;

use crate::{error::AppResult, services::providers::CatalogClient};

const LOW_RES_TOKEN: &str = "100x100";
const LOW_RES_TOKEN_BB: &str = "100x100bb";
const HIGH_RES_TOKEN: &str = "600x900bb";
const SEARCH_LIMIT: u32 = 1;

/// Resolves display posters through a two-tier catalog search
pub struct PosterResolver {
    catalog: Arc<dyn CatalogClient>,
}

impl PosterResolver {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self { catalog }
    }

    /// Resolves a high-resolution poster URL. Never fails; `None` means no image.
    ///
    /// Searches `"{title} {year}"` first and falls back to the bare title only
    /// when the first search has zero hits.
    pub async fn resolve_poster(&self, title: &str, year: i32) -> Option<String> {
        match self.try_resolve(title, year).await {
            Ok(Some(url)) => Some(url),
            Ok(None) => {
                tracing::debug!(title = %title, year = year, "No poster found in catalog");
                None
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    title = %title,
                    year = year,
                    provider = self.catalog.name(),
                    "Poster lookup failed"
                );
                None
            }
        }
    }

    async fn try_resolve(&self, title: &str, year: i32) -> AppResult<Option<String>> {
        let mut results = self
            .catalog
            .search_movies(&format!("{} {}", title, year), SEARCH_LIMIT)
            .await?;

        if results.is_empty() {
            tracing::debug!(title = %title, "No hit with year, retrying with title only");
            results = self.catalog.search_movies(title, SEARCH_LIMIT).await?;
        }

        Ok(results
            .into_iter()
            .next()
            .and_then(|item| item.artwork_url100)
            .map(|url| upscale_artwork_url(&url)))
    }
}

/// Rewrites the catalog's 100x100 artwork token into a 600x900 portrait one
pub fn upscale_artwork_url(url: &str) -> String {
    if url.contains(LOW_RES_TOKEN_BB) {
        url.replace(LOW_RES_TOKEN_BB, HIGH_RES_TOKEN)
    } else {
        url.replace(LOW_RES_TOKEN, HIGH_RES_TOKEN)
    }
}

/// Deterministic placeholder image for titles without a poster
pub fn placeholder_poster_url(title: &str) -> String {
    let hash = title
        .encode_utf16()
        .fold(0i32, |hash, unit| {
            i32::from(unit)
                .wrapping_add(hash.wrapping_shl(5))
                .wrapping_sub(hash)
        });

    format!("https://picsum.photos/seed/{}/400/600", hash.unsigned_abs())
}
