//! Process-lifetime memo store for generated movie details.
//!
//! Entries are keyed by `title-year` and never evicted. Loads are coordinated
//! per key: the first caller for a missing key runs the upstream call, and
//! concurrent callers for the same key wait for that outcome instead of
//! issuing their own. Failed loads are never cached.

use std::future::Future;

use dashmap::{mapref::entry::Entry, DashMap};
use tokio::sync::watch;

use crate::{
    error::{AppError, AppResult},
    models::MovieDetails,
};

/// Progress of an in-flight load, observed by waiting callers
#[derive(Debug, Clone)]
enum LoadState {
    Pending,
    Loaded(MovieDetails),
    Failed,
}

/// Keyed details store with single-flight loading
#[derive(Default)]
pub struct DetailsCache {
    entries: DashMap<String, MovieDetails>,
    in_flight: DashMap<String, watch::Receiver<LoadState>>,
}

/// Clears the in-flight marker when the owning load finishes or is dropped
struct InFlightGuard<'a> {
    in_flight: &'a DashMap<String, watch::Receiver<LoadState>>,
    key: &'a str,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(self.key);
    }
}

impl DetailsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed entry for `key`, if any
    pub fn get(&self, key: &str) -> Option<MovieDetails> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Number of completed entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of keys with a load currently running
    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    /// Returns the cached value for `key`, or runs `load` to produce it.
    ///
    /// At most one `load` runs per key at a time. Callers that arrive while a
    /// load is running share its result; if that load fails they get an error
    /// without starting another one. Only successful values are stored.
    pub async fn get_or_load<F, Fut>(&self, key: &str, load: F) -> AppResult<MovieDetails>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<MovieDetails>>,
    {
        if let Some(hit) = self.get(key) {
            tracing::debug!(key = %key, "Details cache hit");
            return Ok(hit);
        }

        let sender = match self.in_flight.entry(key.to_string()) {
            Entry::Occupied(entry) => {
                let receiver = entry.get().clone();
                drop(entry);
                return self.wait_for_leader(key, receiver).await;
            }
            Entry::Vacant(entry) => {
                let (sender, receiver) = watch::channel(LoadState::Pending);
                entry.insert(receiver);
                sender
            }
        };
        let _guard = InFlightGuard {
            in_flight: &self.in_flight,
            key,
        };

        // A previous leader stores its value before clearing its marker, so a
        // vacant marker may still mean the value just landed
        if let Some(hit) = self.get(key) {
            sender.send_replace(LoadState::Loaded(hit.clone()));
            return Ok(hit);
        }

        tracing::debug!(key = %key, "Details cache miss, loading");

        let result = load().await;
        match &result {
            Ok(details) => {
                self.entries.insert(key.to_string(), details.clone());
                sender.send_replace(LoadState::Loaded(details.clone()));
            }
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "Details load failed, not caching");
                sender.send_replace(LoadState::Failed);
            }
        }

        result
    }

    async fn wait_for_leader(
        &self,
        key: &str,
        mut receiver: watch::Receiver<LoadState>,
    ) -> AppResult<MovieDetails> {
        tracing::debug!(key = %key, "Joining in-flight details load");

        let state = receiver
            .wait_for(|state| !matches!(state, LoadState::Pending))
            .await
            .map(|state| state.clone());

        match state {
            Ok(LoadState::Loaded(details)) => Ok(details),
            Ok(_) => Err(AppError::ExternalApi(format!(
                "Shared details load for {} failed",
                key
            ))),
            // Leader was dropped before publishing an outcome
            Err(_) => self.get(key).ok_or_else(|| {
                AppError::Internal(format!("Shared details load for {} was cancelled", key))
            }),
        }
    }
}
