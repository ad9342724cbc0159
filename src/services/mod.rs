pub mod details;
pub mod enrichment;
pub mod identity;
pub mod posters;
pub mod providers;
pub mod recommendations;
pub mod selection;

pub use details::DetailsEngine;
pub use enrichment::{EnrichedMovie, Enricher};
pub use posters::PosterResolver;
pub use recommendations::{RecommendationEngine, Recommendations};
pub use selection::Selection;
