use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{GeneratedMovie, GeneratedRecommendations, Movie},
    services::{
        identity::assign_id,
        providers::{generate_structured, GenerativeClient},
    },
};

/// Number of movies in every recommendation batch
pub const BATCH_SIZE: usize = 3;

/// Where a recommendation batch came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendationOrigin {
    Generated,
    Fallback { reason: String },
}

/// One recommendation batch: always exactly [`BATCH_SIZE`] movies
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendations {
    pub movies: Vec<Movie>,
    pub origin: RecommendationOrigin,
}

impl Recommendations {
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, RecommendationOrigin::Fallback { .. })
    }
}

/// Turns a mood description into movie recommendations
pub struct RecommendationEngine {
    client: Arc<dyn GenerativeClient>,
}

impl RecommendationEngine {
    pub fn new(client: Arc<dyn GenerativeClient>) -> Self {
        Self { client }
    }

    /// Recommends movies for a mood. Never fails.
    ///
    /// Any upstream failure (transport, status, parse, schema, too few items)
    /// is logged and replaced by the fixed fallback batch.
    pub async fn recommend(&self, mood: &str) -> Recommendations {
        match self.try_recommend(mood).await {
            Ok(movies) => {
                tracing::info!(
                    provider = self.client.name(),
                    count = movies.len(),
                    "Recommendations generated"
                );
                Recommendations {
                    movies,
                    origin: RecommendationOrigin::Generated,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Recommendation generation failed, using fallback set");
                Recommendations {
                    movies: fallback_movies(),
                    origin: RecommendationOrigin::Fallback {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }

    /// Single generation attempt, surfacing the failure reason
    pub async fn try_recommend(&self, mood: &str) -> AppResult<Vec<Movie>> {
        let mood = mood.trim();
        if mood.is_empty() {
            return Err(AppError::InvalidInput("Mood cannot be empty".to_string()));
        }

        let generated: GeneratedRecommendations = generate_structured(
            self.client.as_ref(),
            &recommendation_prompt(mood),
            &recommendation_schema(),
        )
        .await?;

        into_batch(generated.recommendations)
    }
}

/// Validates generated items and assigns ids by position
fn into_batch(items: Vec<GeneratedMovie>) -> AppResult<Vec<Movie>> {
    if items.is_empty() {
        return Err(AppError::EmptyResponse(
            "No recommendations in generated content".to_string(),
        ));
    }

    if items.len() < BATCH_SIZE {
        return Err(AppError::SchemaViolation(format!(
            "Expected {} recommendations, got {}",
            BATCH_SIZE,
            items.len()
        )));
    }

    items
        .into_iter()
        .take(BATCH_SIZE)
        .enumerate()
        .map(|(index, item)| {
            if item.title.trim().is_empty()
                || item.genre.trim().is_empty()
                || item.reason.trim().is_empty()
            {
                return Err(AppError::SchemaViolation(format!(
                    "Recommendation {} has a blank field",
                    index
                )));
            }

            Ok(Movie {
                id: assign_id(&item.title, item.year, index),
                title: item.title,
                year: item.year,
                genre: item.genre,
                reason: item.reason,
            })
        })
        .collect()
}

fn recommendation_prompt(mood: &str) -> String {
    format!(
        "Suggest {} movies for a user who describes their current mood as: \"{}\". \
         Focus on a diverse selection (mix of classics and modern). \
         Ensure the tone matches the mood perfectly.",
        BATCH_SIZE, mood
    )
}

fn recommendation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "recommendations": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING", "description": "The exact title of the movie." },
                        "year": { "type": "INTEGER", "description": "The release year." },
                        "genre": { "type": "STRING", "description": "Main genre of the movie." },
                        "reason": {
                            "type": "STRING",
                            "description": "A short, engaging explanation of why this movie fits the specific mood. Keep it under 2 sentences."
                        }
                    },
                    "required": ["title", "year", "genre", "reason"]
                }
            }
        },
        "required": ["recommendations"]
    })
}

/// Fixed batch served whenever live generation fails
pub fn fallback_movies() -> Vec<Movie> {
    vec![
        Movie {
            id: "error-fallback-1".to_string(),
            title: "The Secret Life of Walter Mitty".to_string(),
            year: 2013,
            genre: "Adventure/Drama".to_string(),
            reason: "A great pick for almost any mood that involves seeking purpose.".to_string(),
        },
        Movie {
            id: "error-fallback-2".to_string(),
            title: "Paddington 2".to_string(),
            year: 2017,
            genre: "Family/Comedy".to_string(),
            reason: "The cinematic equivalent of a warm hug when you need to feel better."
                .to_string(),
        },
        Movie {
            id: "error-fallback-3".to_string(),
            title: "Arrival".to_string(),
            year: 2016,
            genre: "Sci-Fi".to_string(),
            reason: "A masterpiece about communication and understanding.".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockGenerativeClient;

    fn engine_returning(body: AppResult<String>) -> RecommendationEngine {
        let mut client = MockGenerativeClient::new();
        let mut body = Some(body);
        client
            .expect_generate_json()
            .times(1)
            .returning(move |_, _| body.take().unwrap());
        client.expect_name().return_const("mock");
        RecommendationEngine::new(Arc::new(client))
    }

    fn assert_fallback(recommendations: &Recommendations) {
        assert!(recommendations.is_fallback());
        let titles: Vec<(&str, i32)> = recommendations
            .movies
            .iter()
            .map(|m| (m.title.as_str(), m.year))
            .collect();
        assert_eq!(
            titles,
            vec![
                ("The Secret Life of Walter Mitty", 2013),
                ("Paddington 2", 2017),
                ("Arrival", 2016),
            ]
        );
    }

    const LIVE_BODY: &str = r#"{
        "recommendations": [
            { "title": "Amélie", "year": 2001, "genre": "Romance", "reason": "Whimsical warmth." },
            { "title": "The Grand Budapest Hotel", "year": 2014, "genre": "Comedy", "reason": "Playful and bright." },
            { "title": "Singin' in the Rain", "year": 1952, "genre": "Musical", "reason": "Pure joy." }
        ]
    }"#;

    #[tokio::test]
    async fn test_recommend_maps_generated_items_in_order() {
        let engine = engine_returning(Ok(LIVE_BODY.to_string()));
        let recommendations = engine.recommend("cheerful and cozy").await;

        assert_eq!(recommendations.origin, RecommendationOrigin::Generated);
        assert_eq!(recommendations.movies.len(), 3);
        assert_eq!(recommendations.movies[0].title, "Amélie");
        assert_eq!(recommendations.movies[0].id, "amélie-2001-0");
        assert_eq!(
            recommendations.movies[1].id,
            "the-grand-budapest-hotel-2014-1"
        );
        assert_eq!(recommendations.movies[2].year, 1952);
    }

    #[tokio::test]
    async fn test_recommend_prompt_embeds_mood_and_schema() {
        let mut client = MockGenerativeClient::new();
        client
            .expect_generate_json()
            .withf(|prompt, schema| {
                prompt.contains("\"rainy sunday\"")
                    && schema["properties"]["recommendations"]["items"]["required"]
                        == json!(["title", "year", "genre", "reason"])
            })
            .times(1)
            .returning(|_, _| Ok(LIVE_BODY.to_string()));
        client.expect_name().return_const("mock");

        let engine = RecommendationEngine::new(Arc::new(client));
        let recommendations = engine.recommend("  rainy sunday ").await;
        assert!(!recommendations.is_fallback());
    }

    #[tokio::test]
    async fn test_recommend_truncates_to_batch_size() {
        let body = r#"{
            "recommendations": [
                { "title": "A", "year": 2000, "genre": "Drama", "reason": "One." },
                { "title": "B", "year": 2001, "genre": "Drama", "reason": "Two." },
                { "title": "C", "year": 2002, "genre": "Drama", "reason": "Three." },
                { "title": "D", "year": 2003, "genre": "Drama", "reason": "Four." }
            ]
        }"#;
        let engine = engine_returning(Ok(body.to_string()));
        let recommendations = engine.recommend("anything").await;

        let titles: Vec<&str> = recommendations.movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_network_failure_uses_fallback() {
        let engine = engine_returning(Err(AppError::ExternalApi(
            "Gemini API returned status 503".to_string(),
        )));
        assert_fallback(&engine.recommend("melancholy").await);
    }

    #[tokio::test]
    async fn test_malformed_json_uses_fallback() {
        let engine = engine_returning(Ok("{ not json".to_string()));
        assert_fallback(&engine.recommend("melancholy").await);
    }

    #[tokio::test]
    async fn test_schema_mismatch_uses_fallback() {
        let body = r#"{"recommendations": [{ "title": "A", "year": "two thousand" }]}"#;
        let engine = engine_returning(Ok(body.to_string()));
        assert_fallback(&engine.recommend("melancholy").await);
    }

    #[tokio::test]
    async fn test_empty_array_uses_fallback() {
        let engine = engine_returning(Ok(r#"{"recommendations": []}"#.to_string()));
        assert_fallback(&engine.recommend("melancholy").await);
    }

    #[tokio::test]
    async fn test_too_few_items_uses_fallback() {
        let body = r#"{"recommendations": [
            { "title": "A", "year": 2000, "genre": "Drama", "reason": "One." }
        ]}"#;
        let engine = engine_returning(Ok(body.to_string()));
        assert_fallback(&engine.recommend("melancholy").await);
    }

    #[tokio::test]
    async fn test_blank_field_uses_fallback() {
        let body = r#"{"recommendations": [
            { "title": "A", "year": 2000, "genre": "Drama", "reason": "One." },
            { "title": " ", "year": 2001, "genre": "Drama", "reason": "Two." },
            { "title": "C", "year": 2002, "genre": "Drama", "reason": "Three." }
        ]}"#;
        let engine = engine_returning(Ok(body.to_string()));
        assert_fallback(&engine.recommend("melancholy").await);
    }

    #[tokio::test]
    async fn test_blank_mood_skips_upstream() {
        let mut client = MockGenerativeClient::new();
        client.expect_generate_json().times(0);
        client.expect_name().return_const("mock");

        let engine = RecommendationEngine::new(Arc::new(client));
        assert_fallback(&engine.recommend("   ").await);
    }

    #[test]
    fn test_fallback_movies_are_complete() {
        let movies = fallback_movies();
        assert_eq!(movies.len(), BATCH_SIZE);
        for movie in movies {
            assert!(!movie.id.is_empty());
            assert!(!movie.title.is_empty());
            assert!(!movie.genre.is_empty());
            assert!(!movie.reason.is_empty());
        }
    }
}
