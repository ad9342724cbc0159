/// Upstream provider abstraction
///
/// The pipeline talks to two external systems: a generative model that answers
/// with schema-constrained JSON, and a media catalog used for poster artwork.
/// Each sits behind a trait so engines can be built against fakes in tests.
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::CatalogItem,
};

pub mod gemini;
pub mod itunes;

pub use gemini::GeminiClient;
pub use itunes::ItunesCatalog;

/// Trait for generative model backends
///
/// Implementations send one generation request whose output is constrained to
/// `schema` and return the raw JSON text of the answer.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Issue a single schema-constrained generation call
    async fn generate_json(&self, prompt: &str, schema: &Value) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Trait for media catalog search backends
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Search movies by free-text term, returning at most `limit` hits
    async fn search_movies(&self, term: &str, limit: u32) -> AppResult<Vec<CatalogItem>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Runs a generation call and parses the answer into `T`
pub async fn generate_structured<T: DeserializeOwned>(
    client: &dyn GenerativeClient,
    prompt: &str,
    schema: &Value,
) -> AppResult<T> {
    let text = client.generate_json(prompt, schema).await?;

    if text.trim().is_empty() {
        return Err(AppError::EmptyResponse(format!(
            "{} returned no content",
            client.name()
        )));
    }

    serde_json::from_str(&text).map_err(|e| {
        tracing::warn!(
            error = %e,
            provider = client.name(),
            "Generated content does not match the requested schema"
        );
        AppError::SchemaViolation(e.to_string())
    })
}
