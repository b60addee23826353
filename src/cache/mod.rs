//! Cache
//!
//! Este módulo contiene el cache de consultas: resultados por clave,
//! deduplicación de peticiones en curso e invalidación por prefijo.

pub mod cache_config;
pub mod query_cache;
pub mod query_key;

pub use cache_config::CacheConfig;
pub use query_cache::{
    CacheStats, Fetcher, ObserverHandle, QueryCache, QueryEvent, QuerySnapshot, QueryStatus,
};
pub use query_key::QueryKey;
