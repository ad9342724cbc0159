use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod rating;

pub use rating::StarRating;

/// A single movie recommendation returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    /// Derived identifier, unique within one recommendation batch
    pub id: String,
    pub title: String,
    pub year: i32,
    pub genre: String,
    /// Why this movie fits the requested mood
    pub reason: String,
}

impl Movie {
    /// Correlation key shared by the details cache and enrichment results
    pub fn cache_key(&self) -> String {
        details_key(&self.title, self.year)
    }
}

/// Builds the `title-year` key used to memoize details and correlate enrichment
pub fn details_key(title: &str, year: i32) -> String {
    format!("{}-{}", title, year)
}

/// A movie the user chose to keep
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SavedMovie {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(with = "chrono::serde::ts_milliseconds", default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
}

impl SavedMovie {
    pub fn new(movie: Movie) -> Self {
        Self {
            movie,
            saved_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.movie.id
    }
}

/// Rich metadata for one (title, year)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieDetails {
    pub synopsis: String,
    pub cast: Vec<String>,
    pub director: String,
    /// Free-form score such as "8.6/10" or "4.2"
    pub rating: String,
}

impl MovieDetails {
    /// Well-formed record returned when details cannot be generated
    pub fn unavailable() -> Self {
        Self {
            synopsis: "Details currently unavailable for this title.".to_string(),
            cast: Vec::new(),
            director: "Unknown".to_string(),
            rating: "N/A".to_string(),
        }
    }

    /// Star rendering for the rating, if it parses
    pub fn stars(&self) -> Option<StarRating> {
        StarRating::from_rating_str(&self.rating)
    }
}

// ============================================================================
// Generation payloads (shape of the JSON the model is constrained to)
// ============================================================================

/// Structured output of a recommendation generation call
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedRecommendations {
    #[serde(default)]
    pub recommendations: Vec<GeneratedMovie>,
}

/// One recommendation item as produced by the model
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedMovie {
    pub title: String,
    pub year: i32,
    pub genre: String,
    pub reason: String,
}

// ============================================================================
// Gemini API Types
// ============================================================================

/// Raw response from `models/{model}:generateContent`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiContent {
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiPart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate, if it has any
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// ============================================================================
// Catalog (iTunes Search) API Types
// ============================================================================

/// Response from the catalog `/search` endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSearchResponse {
    #[serde(default)]
    pub result_count: usize,
    #[serde(default)]
    pub results: Vec<CatalogItem>,
}

/// A single catalog hit
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(default)]
    pub track_name: Option<String>,
    #[serde(default)]
    pub artwork_url100: Option<String>,
}
