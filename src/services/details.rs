use std::sync::Arc;

use serde_json::{json, Value};

use crate::{
    db::DetailsCache,
    error::AppResult,
    models::{details_key, MovieDetails},
    services::providers::{generate_structured, GenerativeClient},
};

/// Upper bound on the cast list kept from a generated answer
const MAX_CAST: usize = 4;

/// Generates rich movie metadata behind a memoizing cache
pub struct DetailsEngine {
    client: Arc<dyn GenerativeClient>,
    cache: Arc<DetailsCache>,
}

impl DetailsEngine {
    pub fn new(client: Arc<dyn GenerativeClient>, cache: Arc<DetailsCache>) -> Self {
        Self { client, cache }
    }

    pub fn cache(&self) -> &Arc<DetailsCache> {
        &self.cache
    }

    /// Returns details for a movie. Never fails.
    ///
    /// A failed generation yields [`MovieDetails::unavailable`], which is not
    /// cached, so a later call for the same movie tries upstream again.
    pub async fn get_details(&self, title: &str, year: i32) -> MovieDetails {
        let key = details_key(title, year);

        match self
            .cache
            .get_or_load(&key, || self.generate_details(title, year))
            .await
        {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    title = %title,
                    year = year,
                    "Details unavailable, returning placeholder"
                );
                MovieDetails::unavailable()
            }
        }
    }

    async fn generate_details(&self, title: &str, year: i32) -> AppResult<MovieDetails> {
        let mut details: MovieDetails = generate_structured(
            self.client.as_ref(),
            &details_prompt(title, year),
            &details_schema(),
        )
        .await?;

        details.cast.truncate(MAX_CAST);

        tracing::info!(
            title = %title,
            year = year,
            provider = self.client.name(),
            "Movie details generated"
        );

        Ok(details)
    }
}

fn details_prompt(title: &str, year: i32) -> String {
    format!(
        "Provide details for the movie \"{}\" ({}). \
         Include a concise synopsis (max 60 words), the 3-4 main cast members, \
         the director's name, and an estimated rating (e.g. \"8.5/10\").",
        title, year
    )
}

fn details_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "synopsis": { "type": "STRING", "description": "A concise synopsis, at most 60 words." },
            "cast": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "The 3-4 principal cast members."
            },
            "director": { "type": "STRING", "description": "The director's name." },
            "rating": { "type": "STRING", "description": "An estimated rating, e.g. 8.5/10." }
        },
        "required": ["synopsis", "cast", "director", "rating"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, services::providers::MockGenerativeClient};

    const ARRIVAL_BODY: &str = r#"{
        "synopsis": "A linguist is recruited to communicate with alien visitors.",
        "cast": ["Amy Adams", "Jeremy Renner", "Forest Whitaker", "Michael Stuhlbarg", "Tzi Ma"],
        "director": "Denis Villeneuve",
        "rating": "7.9/10"
    }"#;

    #[tokio::test]
    async fn test_get_details_parses_and_caches() {
        let mut client = MockGenerativeClient::new();
        client
            .expect_generate_json()
            .withf(|prompt, _| prompt.contains("\"Arrival\" (2016)"))
            .times(1)
            .returning(|_, _| Ok(ARRIVAL_BODY.to_string()));
        client.expect_name().return_const("mock");

        let cache = Arc::new(DetailsCache::new());
        let engine = DetailsEngine::new(Arc::new(client), cache.clone());

        let details = engine.get_details("Arrival", 2016).await;
        assert_eq!(details.director, "Denis Villeneuve");
        assert_eq!(details.cast.len(), 4);
        assert_eq!(details.stars().unwrap().filled(), 4);

        // Served from cache; the mock would panic on a second call
        let again = engine.get_details("Arrival", 2016).await;
        assert_eq!(again, details);
        assert!(cache.get("Arrival-2016").is_some());
    }

    #[tokio::test]
    async fn test_failure_returns_placeholder_and_is_not_cached() {
        let mut client = MockGenerativeClient::new();
        let mut seq = mockall::Sequence::new();
        client
            .expect_generate_json()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(AppError::ExternalApi("status 500".to_string())));
        client
            .expect_generate_json()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(ARRIVAL_BODY.to_string()));
        client.expect_name().return_const("mock");

        let cache = Arc::new(DetailsCache::new());
        let engine = DetailsEngine::new(Arc::new(client), cache.clone());

        let placeholder = engine.get_details("Arrival", 2016).await;
        assert_eq!(placeholder, MovieDetails::unavailable());
        assert_eq!(
            placeholder.synopsis,
            "Details currently unavailable for this title."
        );
        assert!(cache.is_empty());

        let details = engine.get_details("Arrival", 2016).await;
        assert_eq!(details.director, "Denis Villeneuve");
    }

    #[tokio::test]
    async fn test_malformed_body_returns_placeholder() {
        let mut client = MockGenerativeClient::new();
        client
            .expect_generate_json()
            .times(1)
            .returning(|_, _| Ok(r#"{"synopsis": "Missing everything else"}"#.to_string()));
        client.expect_name().return_const("mock");

        let engine = DetailsEngine::new(Arc::new(client), Arc::new(DetailsCache::new()));
        assert_eq!(
            engine.get_details("Arrival", 2016).await,
            MovieDetails::unavailable()
        );
    }

    #[test]
    fn test_details_schema_requires_all_fields() {
        assert_eq!(
            details_schema()["required"],
            json!(["synopsis", "cast", "director", "rating"])
        );
    }
}
