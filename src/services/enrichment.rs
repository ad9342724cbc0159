//! Per-movie enrichment fan-out.
//!
//! Every movie gets its own poster and details tasks. Handles are joined
//! individually and carry the movie's `title-year` key so results are matched
//! by key rather than by completion order. Dropping or cancelling a handle
//! aborts its task, so late results are never delivered.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::{
    models::{Movie, MovieDetails},
    services::{details::DetailsEngine, posters::PosterResolver},
};

/// A cancellable enrichment task for one movie
pub struct EnrichmentHandle<T> {
    key: String,
    task: Option<JoinHandle<T>>,
}

impl<T> EnrichmentHandle<T> {
    /// Correlation key of the movie this task enriches
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Abandons the task; its result will be discarded
    pub fn cancel(&self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }

    /// Waits for the result. `None` when the task was cancelled or died.
    pub async fn join(mut self) -> Option<T> {
        let task = self.task.take()?;
        match task.await {
            Ok(value) => Some(value),
            Err(e) if e.is_cancelled() => {
                tracing::debug!(key = %self.key, "Enrichment cancelled, discarding result");
                None
            }
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "Enrichment task failed");
                None
            }
        }
    }
}

impl<T> Drop for EnrichmentHandle<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Both enrichment tasks for one movie
pub struct MovieEnrichment {
    pub movie_id: String,
    pub poster: EnrichmentHandle<Option<String>>,
    pub details: EnrichmentHandle<MovieDetails>,
}

impl MovieEnrichment {
    /// Cancels both tasks
    pub fn cancel(&self) {
        self.poster.cancel();
        self.details.cancel();
    }

    /// Waits for both tasks
    pub async fn join(self) -> EnrichedMovie {
        let key = self.poster.key().to_string();
        let (poster_url, details) = tokio::join!(self.poster.join(), self.details.join());

        EnrichedMovie {
            id: self.movie_id,
            key,
            poster_url: poster_url.flatten(),
            details,
        }
    }
}

/// Joined enrichment results for one movie
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedMovie {
    pub id: String,
    pub key: String,
    pub poster_url: Option<String>,
    /// `None` only if the details task was cancelled
    pub details: Option<MovieDetails>,
}

/// Spawns independent poster and details lookups per movie
#[derive(Clone)]
pub struct Enricher {
    posters: Arc<PosterResolver>,
    details: Arc<DetailsEngine>,
}

impl Enricher {
    pub fn new(posters: Arc<PosterResolver>, details: Arc<DetailsEngine>) -> Self {
        Self { posters, details }
    }

    pub fn spawn_poster(&self, movie: &Movie) -> EnrichmentHandle<Option<String>> {
        let posters = self.posters.clone();
        let title = movie.title.clone();
        let year = movie.year;

        EnrichmentHandle {
            key: movie.cache_key(),
            task: Some(tokio::spawn(async move {
                posters.resolve_poster(&title, year).await
            })),
        }
    }

    pub fn spawn_details(&self, movie: &Movie) -> EnrichmentHandle<MovieDetails> {
        let details = self.details.clone();
        let title = movie.title.clone();
        let year = movie.year;

        EnrichmentHandle {
            key: movie.cache_key(),
            task: Some(tokio::spawn(async move {
                details.get_details(&title, year).await
            })),
        }
    }

    /// Starts poster and details resolution for one movie
    pub fn enrich(&self, movie: &Movie) -> MovieEnrichment {
        MovieEnrichment {
            movie_id: movie.id.clone(),
            poster: self.spawn_poster(movie),
            details: self.spawn_details(movie),
        }
    }

    /// Starts every movie's tasks before any of them is awaited
    pub fn enrich_batch(&self, movies: &[Movie]) -> Vec<MovieEnrichment> {
        tracing::debug!(count = movies.len(), "Starting enrichment batch");
        movies.iter().map(|movie| self.enrich(movie)).collect()
    }
}
