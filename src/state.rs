//! Estado compartido de la consola
//!
//! Este módulo define el estado que comparten todas las vistas: la
//! configuración, el transporte HTTP, el cache de consultas y el canal de
//! notificaciones.

use std::sync::Arc;

use crate::cache::{CacheConfig, QueryCache};
use crate::clients::Transport;
use crate::config::environment::EnvironmentConfig;
use crate::models::Resource;
use crate::repositories::EntityRepository;
use crate::services::Notifier;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub transport: Arc<dyn Transport>,
    pub cache: QueryCache,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let cache = QueryCache::new(CacheConfig::from(&config));
        Self {
            config,
            transport,
            cache,
            notifier,
        }
    }

    pub fn repository<R: Resource>(&self) -> EntityRepository<R> {
        EntityRepository::new(Arc::clone(&self.transport))
    }
}
