pub mod details_cache;
pub mod redis;
pub mod selection_store;

pub use details_cache::DetailsCache;
pub use redis::create_redis_client;
pub use selection_store::{FileSlot, MemorySlot, RedisSlot, SelectionStore, SlotStorage};
