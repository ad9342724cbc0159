use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::Movie,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub mood: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub movies: Vec<Movie>,
    /// True when live generation failed and the fixed set was served
    pub fallback: bool,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    if request.mood.trim().is_empty() {
        return Err(AppError::InvalidInput("Mood cannot be empty".to_string()));
    }

    tracing::info!(request_id = %request_id, "Processing recommendation request");

    let recommendations = state.recommendations.recommend(&request.mood).await;

    tracing::info!(
        request_id = %request_id,
        fallback = recommendations.is_fallback(),
        "Recommendations ready"
    );

    Ok(Json(RecommendationResponse {
        fallback: recommendations.is_fallback(),
        movies: recommendations.movies,
    }))
}
