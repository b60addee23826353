//! Configuración de cache
//!
//! Este módulo contiene la configuración para el cache de consultas.

use std::time::Duration;

use crate::config::EnvironmentConfig;

/// Configuración del cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Tiempo durante el cual un resultado se considera fresco
    pub stale_time: Duration,
    /// Antigüedad a partir de la cual se eliminan entradas sin observadores
    pub gc_time: Duration,
    pub event_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(30),
            gc_time: Duration::from_secs(300), // 5 minutos
            event_capacity: 64,
        }
    }
}

impl From<&EnvironmentConfig> for CacheConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            stale_time: Duration::from_secs(config.query_stale_time_secs),
            gc_time: Duration::from_secs(config.query_gc_time_secs),
            ..Self::default()
        }
    }
}
