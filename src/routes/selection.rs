use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Movie, SavedMovie},
    routes::AppState,
};

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub selected: bool,
    pub count: usize,
}

/// Lists the saved selection
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<SavedMovie>> {
    let selection = state.selection.read().await;
    Json(selection.movies().to_vec())
}

/// Adds the movie if absent, removes it if present
pub async fn toggle(
    State(state): State<Arc<AppState>>,
    Json(movie): Json<Movie>,
) -> AppResult<Json<ToggleResponse>> {
    let mut selection = state.selection.write().await;

    let mut next = selection.clone();
    let selected = next.toggle(movie);
    state.selection_store.save(&next).await?;
    *selection = next;

    Ok(Json(ToggleResponse {
        selected,
        count: selection.len(),
    }))
}

/// Removes a saved movie by id
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let mut selection = state.selection.write().await;

    let mut next = selection.clone();
    if !next.remove(&id) {
        return Err(AppError::NotFound(format!("No saved movie with id {}", id)));
    }
    state.selection_store.save(&next).await?;
    *selection = next;

    Ok(StatusCode::NO_CONTENT)
}
