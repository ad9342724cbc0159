use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{models::MovieDetails, routes::posters::MovieQuery, routes::AppState};

#[derive(Debug, Serialize)]
pub struct DetailsResponse {
    #[serde(flatten)]
    pub details: MovieDetails,
    /// Filled stars out of five, absent when the rating does not parse
    pub stars: Option<u8>,
}

/// Handler for movie details endpoint
pub async fn get_details(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MovieQuery>,
) -> Json<DetailsResponse> {
    let details = state.details.get_details(&query.title, query.year).await;
    let stars = details.stars().map(|rating| rating.filled());

    Json(DetailsResponse { details, stars })
}
