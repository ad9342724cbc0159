use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::{
    config::{Config, SelectionBackend},
    db::{create_redis_client, DetailsCache, FileSlot, MemorySlot, RedisSlot, SelectionStore, SlotStorage},
    services::{
        providers::{CatalogClient, GeminiClient, GenerativeClient, ItunesCatalog},
        DetailsEngine, Enricher, PosterResolver, RecommendationEngine, Selection,
    },
};

/// Shared application state
pub struct AppState {
    pub recommendations: RecommendationEngine,
    pub posters: Arc<PosterResolver>,
    pub details: Arc<DetailsEngine>,
    pub enricher: Enricher,
    /// In-memory selection, persisted through `selection_store` on every change
    pub selection: RwLock<Selection>,
    pub selection_store: SelectionStore,
}

impl AppState {
    /// Wires the pipeline around the given providers and loads the saved selection
    pub async fn new(
        generator: Arc<dyn GenerativeClient>,
        catalog: Arc<dyn CatalogClient>,
        selection_store: SelectionStore,
    ) -> Self {
        let posters = Arc::new(PosterResolver::new(catalog));
        let details = Arc::new(DetailsEngine::new(
            generator.clone(),
            Arc::new(DetailsCache::new()),
        ));
        let selection = selection_store.load().await;

        Self {
            recommendations: RecommendationEngine::new(generator),
            enricher: Enricher::new(posters.clone(), details.clone()),
            posters,
            details,
            selection: RwLock::new(selection),
            selection_store,
        }
    }

    /// Builds the production state from configuration
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs);

        let generator = GeminiClient::new(
            config.gemini_api_key.clone(),
            config.gemini_api_url.clone(),
            config.gemini_model.clone(),
            timeout,
        )?;
        let catalog = ItunesCatalog::new(config.catalog_api_url.clone(), timeout)?;

        let slot: Arc<dyn SlotStorage> = match config.selection_backend()? {
            SelectionBackend::File => Arc::new(FileSlot::new(&config.selection_path)),
            SelectionBackend::Redis => Arc::new(RedisSlot::new(
                create_redis_client(&config.redis_url)?,
                config.selection_key.clone(),
            )),
            SelectionBackend::Memory => Arc::new(MemorySlot::new()),
        };

        tracing::info!(
            model = %config.gemini_model,
            selection_storage = slot.name(),
            "Pipeline configured"
        );

        Ok(Self::new(Arc::new(generator), Arc::new(catalog), SelectionStore::new(slot)).await)
    }
}
