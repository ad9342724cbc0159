/// iTunes Search API provider
///
/// Used for poster artwork only. Searches are restricted to the movie media
/// type and entity; results expose a 100x100 artwork URL.
use crate::{
    error::{AppError, AppResult},
    models::{CatalogItem, CatalogSearchResponse},
    services::providers::CatalogClient,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

const MEDIA_TYPE: &str = "movie";

#[derive(Clone)]
pub struct ItunesCatalog {
    http_client: HttpClient,
    api_url: String,
}

impl ItunesCatalog {
    pub fn new(api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_url,
        })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.api_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl CatalogClient for ItunesCatalog {
    async fn search_movies(&self, term: &str, limit: u32) -> AppResult<Vec<CatalogItem>> {
        let limit = limit.to_string();

        let response = self
            .http_client
            .get(self.search_url())
            .query(&[
                ("term", term),
                ("media", MEDIA_TYPE),
                ("entity", MEDIA_TYPE),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "iTunes API returned status {}: {}",
                status, body
            )));
        }

        // The endpoint answers with a text/javascript content type, so parse the body ourselves
        let response_text = response.text().await?;
        let search: CatalogSearchResponse = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                response = %response_text,
                "Failed to deserialize iTunes response"
            );
            AppError::ExternalApi(format!("Failed to parse iTunes response: {}", e))
        })?;

        tracing::debug!(
            term = %term,
            results = search.results.len(),
            provider = "itunes",
            "Catalog search completed"
        );

        Ok(search.results)
    }

    fn name(&self) -> &'static str {
        "itunes"
    }
}
