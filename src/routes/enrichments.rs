use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::{models::Movie, routes::AppState, services::EnrichedMovie};

#[derive(Debug, Deserialize)]
pub struct EnrichmentRequest {
    pub movies: Vec<Movie>,
}

/// Handler for batch enrichment endpoint
///
/// All lookups start before any is awaited; results come back in request order.
pub async fn enrich(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EnrichmentRequest>,
) -> Json<Vec<EnrichedMovie>> {
    let pending = state.enricher.enrich_batch(&request.movies);

    let mut enriched = Vec::with_capacity(pending.len());
    for enrichment in pending {
        enriched.push(enrichment.join().await);
    }

    Json(enriched)
}
