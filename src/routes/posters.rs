use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{routes::AppState, services::posters::placeholder_poster_url};

#[derive(Debug, Deserialize)]
pub struct MovieQuery {
    pub title: String,
    pub year: i32,
}

#[derive(Debug, Serialize)]
pub struct PosterResponse {
    pub poster_url: Option<String>,
    /// Content-derived image to show when `poster_url` is absent
    pub placeholder_url: String,
}

/// Handler for poster lookup endpoint
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MovieQuery>,
) -> Json<PosterResponse> {
    let poster_url = state.posters.resolve_poster(&query.title, query.year).await;

    Json(PosterResponse {
        poster_url,
        placeholder_url: placeholder_poster_url(&query.title),
    })
}
