//! Cache de consultas en memoria
//!
//! Guarda el resultado de cada consulta por clave, deduplica las
//! peticiones que ya están en curso y, al invalidar un prefijo, vuelve a
//! pedir los datos de las claves que tienen observadores montados.
//!
//! Ciclo de vida de una entrada:
//! idle → fetching → success | error → fetching (cambio de clave o invalidación)

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::future::{join_all, BoxFuture, FutureExt, Shared};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use super::cache_config::CacheConfig;
use super::query_key::QueryKey;
use crate::utils::errors::{AppError, AppResult};

/// Función que trae los datos de una clave desde el backend
pub type Fetcher = Arc<dyn Fn() -> BoxFuture<'static, AppResult<Value>> + Send + Sync>;

type SharedFetch = Shared<BoxFuture<'static, Result<Value, String>>>;

/// Estado de una consulta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Fetching,
    Success,
    Error,
}

/// Foto del estado de una entrada, para pintar cargas y errores
#[derive(Debug, Clone)]
pub struct QuerySnapshot {
    pub status: QueryStatus,
    pub data: Option<Value>,
    pub error: Option<String>,
    pub stale: bool,
    pub updated_at: Option<DateTime<Utc>>,
    pub fetch_count: u64,
}

/// Eventos que reciben los suscriptores para volver a pintar
#[derive(Debug, Clone, PartialEq)]
pub enum QueryEvent {
    Fetched(QueryKey),
    Failed { key: QueryKey, message: String },
    Invalidated(QueryKey),
}

/// Estadísticas del cache
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Lecturas servidas desde datos frescos
    pub hits: u64,
    /// Lecturas que tuvieron que ir al backend
    pub misses: u64,
    /// Lecturas que se unieron a una petición ya en curso
    pub deduplicated: u64,
    pub invalidations: u64,
    pub entries_collected: u64,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    deduplicated: AtomicU64,
    invalidations: AtomicU64,
    entries_collected: AtomicU64,
}

struct CacheEntry {
    status: QueryStatus,
    data: Option<Value>,
    error: Option<String>,
    stale: bool,
    updated_at: Option<DateTime<Utc>>,
    fetched_at: Option<Instant>,
    last_used: Instant,
    fetch_count: u64,
    /// Número de la petición vigente; las respuestas de peticiones anteriores se descartan
    generation: u64,
    in_flight: Option<SharedFetch>,
}

impl CacheEntry {
    fn new() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            stale: false,
            updated_at: None,
            fetched_at: None,
            last_used: Instant::now(),
            fetch_count: 0,
            generation: 0,
            in_flight: None,
        }
    }

    fn fresh_data(&self, config: &CacheConfig) -> Option<Value> {
        let fetched_at = self.fetched_at?;
        if self.status != QueryStatus::Success
            || self.stale
            || fetched_at.elapsed() >= config.stale_time
        {
            return None;
        }
        self.data.clone()
    }

    fn snapshot(&self) -> QuerySnapshot {
        QuerySnapshot {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            stale: self.stale,
            updated_at: self.updated_at,
            fetch_count: self.fetch_count,
        }
    }
}

struct CacheInner {
    config: CacheConfig,
    entries: RwLock<HashMap<QueryKey, CacheEntry>>,
    observers: Mutex<HashMap<QueryKey, Vec<(u64, Fetcher)>>>,
    next_observer: AtomicU64,
    counters: Counters,
    events: broadcast::Sender<QueryEvent>,
}

impl CacheInner {
    fn observers(&self) -> MutexGuard<'_, HashMap<QueryKey, Vec<(u64, Fetcher)>>> {
        self.observers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Guardar el resultado de una petición si sigue siendo la vigente
    async fn settle(&self, key: &QueryKey, generation: u64, result: &AppResult<Value>) {
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.get_mut(key) else {
            return;
        };
        if entry.generation != generation {
            debug!("Respuesta descartada para {} (petición reemplazada)", key);
            return;
        }

        entry.in_flight = None;
        match result {
            Ok(value) => {
                entry.status = QueryStatus::Success;
                entry.data = Some(value.clone());
                entry.error = None;
                entry.stale = false;
                entry.updated_at = Some(Utc::now());
                entry.fetched_at = Some(Instant::now());
                entry.fetch_count += 1;
                let _ = self.events.send(QueryEvent::Fetched(key.clone()));
            }
            Err(e) => {
                // Se conservan los datos anteriores, solo cambia el estado
                entry.status = QueryStatus::Error;
                entry.error = Some(e.to_string());
                let _ = self.events.send(QueryEvent::Failed {
                    key: key.clone(),
                    message: e.to_string(),
                });
            }
        }
    }
}

/// Cache de consultas compartido por todas las vistas
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<CacheInner>,
}

impl QueryCache {
    /// Crear nuevo cache de consultas
    pub fn new(config: CacheConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            inner: Arc::new(CacheInner {
                config,
                entries: RwLock::new(HashMap::new()),
                observers: Mutex::new(HashMap::new()),
                next_observer: AtomicU64::new(1),
                counters: Counters::default(),
                events,
            }),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    /// Obtener los datos de una clave, del cache si están frescos o del backend
    pub async fn fetch<T: DeserializeOwned>(&self, key: &QueryKey, fetcher: Fetcher) -> AppResult<T> {
        let value = self.fetch_value(key, fetcher).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn fetch_value(&self, key: &QueryKey, fetcher: Fetcher) -> AppResult<Value> {
        let shared = {
            let mut entries = self.inner.entries.write().await;
            let entry = entries.entry(key.clone()).or_insert_with(CacheEntry::new);
            entry.last_used = Instant::now();

            if let Some(data) = entry.fresh_data(&self.inner.config) {
                self.inner.counters.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit para {}", key);
                return Ok(data);
            }

            match &entry.in_flight {
                Some(in_flight) => {
                    self.inner.counters.deduplicated.fetch_add(1, Ordering::Relaxed);
                    debug!("Petición en curso reutilizada para {}", key);
                    in_flight.clone()
                }
                None => {
                    self.inner.counters.misses.fetch_add(1, Ordering::Relaxed);
                    debug!("Cache miss para {}", key);
                    entry.generation += 1;
                    entry.status = QueryStatus::Fetching;
                    let shared = self.start_fetch(key.clone(), entry.generation, fetcher);
                    entry.in_flight = Some(shared.clone());
                    shared
                }
            }
        };

        shared.await.map_err(|message| AppError::Query {
            key: key.to_string(),
            message,
        })
    }

    fn start_fetch(&self, key: QueryKey, generation: u64, fetcher: Fetcher) -> SharedFetch {
        let inner = Arc::clone(&self.inner);
        async move {
            let result = fetcher().await;
            inner.settle(&key, generation, &result).await;
            result.map_err(|e| e.to_string())
        }
        .boxed()
        .shared()
    }

    /// Registrar un consumidor montado; se da de baja al soltar el handle
    pub fn observe(&self, key: QueryKey, fetcher: Fetcher) -> ObserverHandle {
        let id = self.inner.next_observer.fetch_add(1, Ordering::Relaxed);
        self.inner
            .observers()
            .entry(key.clone())
            .or_default()
            .push((id, fetcher));
        debug!("Observador {} montado en {}", id, key);

        ObserverHandle {
            cache: Arc::downgrade(&self.inner),
            key,
            id,
        }
    }

    pub fn observer_count(&self, key: &QueryKey) -> usize {
        self.inner.observers().get(key).map_or(0, Vec::len)
    }

    /// Marcar como obsoletas las claves con ese prefijo y volver a pedir las observadas
    pub async fn invalidate(&self, prefix: &QueryKey) -> usize {
        self.inner.counters.invalidations.fetch_add(1, Ordering::Relaxed);

        {
            let mut entries = self.inner.entries.write().await;
            for (key, entry) in entries.iter_mut().filter(|(key, _)| key.starts_with(prefix)) {
                entry.stale = true;
                if entry.in_flight.take().is_some() {
                    // La respuesta en curso puede ser anterior a la mutación
                    entry.generation += 1;
                    entry.status = if entry.data.is_some() {
                        QueryStatus::Success
                    } else {
                        QueryStatus::Idle
                    };
                }
                let _ = self.inner.events.send(QueryEvent::Invalidated(key.clone()));
            }
        }

        let targets: Vec<(QueryKey, Fetcher)> = self
            .inner
            .observers()
            .iter()
            .filter(|(key, observers)| key.starts_with(prefix) && !observers.is_empty())
            .map(|(key, observers)| (key.clone(), Arc::clone(&observers[0].1)))
            .collect();

        let refetched = targets.len();
        let results = join_all(
            targets
                .into_iter()
                .map(|(key, fetcher)| async move {
                    let result = self.fetch_value(&key, fetcher).await;
                    (key, result)
                }),
        )
        .await;

        for (key, result) in results {
            if let Err(e) = result {
                warn!("⚠️ Error al volver a pedir {} tras invalidar: {}", key, e);
            }
        }

        info!("♻️ Invalidado {} ({} consultas observadas recargadas)", prefix, refetched);
        refetched
    }

    /// Datos en cache (frescos u obsoletos) de una clave
    pub async fn get_data<T: DeserializeOwned>(&self, key: &QueryKey) -> AppResult<Option<T>> {
        let entries = self.inner.entries.read().await;
        match entries.get(key).and_then(|entry| entry.data.clone()) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn snapshot(&self, key: &QueryKey) -> Option<QuerySnapshot> {
        let entries = self.inner.entries.read().await;
        entries.get(key).map(CacheEntry::snapshot)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueryEvent> {
        self.inner.events.subscribe()
    }

    /// Eliminar entradas sin observadores que no se usan desde hace `gc_time`
    pub async fn garbage_collect(&self) -> usize {
        let observed: Vec<QueryKey> = self
            .inner
            .observers()
            .iter()
            .filter(|(_, observers)| !observers.is_empty())
            .map(|(key, _)| key.clone())
            .collect();

        let mut entries = self.inner.entries.write().await;
        let initial_size = entries.len();
        let gc_time = self.inner.config.gc_time;
        entries.retain(|key, entry| {
            observed.contains(key)
                || entry.in_flight.is_some()
                || entry.last_used.elapsed() < gc_time
        });

        let collected = initial_size - entries.len();
        if collected > 0 {
            self.inner
                .counters
                .entries_collected
                .fetch_add(collected as u64, Ordering::Relaxed);
            info!("Cache cleanup: {} entradas sin uso eliminadas", collected);
        }
        collected
    }

    /// Obtener estadísticas del cache
    pub fn stats(&self) -> CacheStats {
        let counters = &self.inner.counters;
        CacheStats {
            hits: counters.hits.load(Ordering::Relaxed),
            misses: counters.misses.load(Ordering::Relaxed),
            deduplicated: counters.deduplicated.load(Ordering::Relaxed),
            invalidations: counters.invalidations.load(Ordering::Relaxed),
            entries_collected: counters.entries_collected.load(Ordering::Relaxed),
        }
    }

    /// Obtener tamaño actual del cache
    pub async fn size(&self) -> usize {
        self.inner.entries.read().await.len()
    }
}

/// Consumidor montado de una clave; se desmonta al soltarlo
pub struct ObserverHandle {
    cache: Weak<CacheInner>,
    key: QueryKey,
    id: u64,
}

impl ObserverHandle {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        let Some(inner) = self.cache.upgrade() else {
            return;
        };
        let mut observers = inner.observers();
        if let Some(list) = observers.get_mut(&self.key) {
            list.retain(|(id, _)| *id != self.id);
            if list.is_empty() {
                observers.remove(&self.key);
            }
        }
        debug!("Observador {} desmontado de {}", self.id, self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn counting_fetcher(calls: Arc<AtomicUsize>, delay: Duration) -> Fetcher {
        Arc::new(move || {
            let calls = Arc::clone(&calls);
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                tokio::time::sleep(delay).await;
                Ok(json!({ "call": n }))
            }
            .boxed()
        })
    }

    fn key(search: &str) -> QueryKey {
        QueryKey::new("vehicles").with(search)
    }

    #[tokio::test]
    async fn test_fresh_data_is_served_from_cache() {
        let cache = QueryCache::new(CacheConfig::default());
        let calls = Arc::new(AtomicUsize::new(0));

        let first: Value = cache
            .fetch(&key(""), counting_fetcher(calls.clone(), Duration::ZERO))
            .await
            .unwrap();
        let second: Value = cache
            .fetch(&key(""), counting_fetcher(calls.clone(), Duration::ZERO))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_concurrent_fetches_are_deduplicated() {
        let cache = QueryCache::new(CacheConfig::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(calls.clone(), Duration::from_millis(30));

        let abc = key("ABC");
        let (a, b) = tokio::join!(
            cache.fetch_value(&abc, fetcher.clone()),
            cache.fetch_value(&abc, fetcher.clone()),
        );

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().deduplicated, 1);
    }

    #[tokio::test]
    async fn test_invalidate_refetches_observed_keys_only() {
        let cache = QueryCache::new(CacheConfig::default());
        let observed_calls = Arc::new(AtomicUsize::new(0));
        let unobserved_calls = Arc::new(AtomicUsize::new(0));
        let observed = counting_fetcher(observed_calls.clone(), Duration::ZERO);
        let unobserved = counting_fetcher(unobserved_calls.clone(), Duration::ZERO);

        cache.fetch_value(&key("A"), observed.clone()).await.unwrap();
        cache.fetch_value(&key("B"), unobserved.clone()).await.unwrap();
        let _handle = cache.observe(key("A"), observed.clone());

        let refetched = cache.invalidate(&QueryKey::new("vehicles")).await;

        assert_eq!(refetched, 1);
        assert_eq!(observed_calls.load(Ordering::SeqCst), 2);
        assert_eq!(unobserved_calls.load(Ordering::SeqCst), 1);

        let a = cache.snapshot(&key("A")).await.unwrap();
        assert_eq!(a.status, QueryStatus::Success);
        assert!(!a.stale);
        assert_eq!(a.data, Some(json!({ "call": 2 })));

        // La clave sin observador queda obsoleta hasta la próxima lectura
        let b = cache.snapshot(&key("B")).await.unwrap();
        assert!(b.stale);
        cache.fetch_value(&key("B"), unobserved).await.unwrap();
        assert_eq!(unobserved_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_dropping_handle_unmounts_observer() {
        let cache = QueryCache::new(CacheConfig::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(calls.clone(), Duration::ZERO);

        let handle = cache.observe(key(""), fetcher.clone());
        assert_eq!(cache.observer_count(&key("")), 1);
        drop(handle);
        assert_eq!(cache.observer_count(&key("")), 0);

        assert_eq!(cache.invalidate(&QueryKey::new("vehicles")).await, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_error_keeps_previous_data() {
        let cache = QueryCache::new(CacheConfig {
            stale_time: Duration::ZERO,
            ..CacheConfig::default()
        });
        let ok: Fetcher = Arc::new(|| async { Ok(json!([1, 2])) }.boxed());
        let failing: Fetcher = Arc::new(|| {
            async {
                Err(AppError::Api {
                    status: http::StatusCode::BAD_GATEWAY,
                    message: "down".to_string(),
                })
            }
            .boxed()
        });

        cache.fetch_value(&key(""), ok).await.unwrap();
        let mut events = cache.subscribe();
        let error = cache.fetch_value(&key(""), failing).await.unwrap_err();
        assert!(matches!(error, AppError::Query { .. }));

        let snapshot = cache.snapshot(&key("")).await.unwrap();
        assert_eq!(snapshot.status, QueryStatus::Error);
        assert_eq!(snapshot.data, Some(json!([1, 2])));
        assert!(matches!(events.recv().await.unwrap(), QueryEvent::Failed { .. }));
    }

    #[tokio::test]
    async fn test_invalidate_discards_in_flight_response() {
        let cache = QueryCache::new(CacheConfig::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let slow = counting_fetcher(calls.clone(), Duration::from_millis(50));
        let _handle = cache.observe(key(""), slow.clone());

        let pending = {
            let cache = cache.clone();
            let slow = slow.clone();
            tokio::spawn(async move { cache.fetch_value(&key(""), slow).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        cache.invalidate(&QueryKey::new("vehicles")).await;
        pending.await.unwrap().unwrap();

        let snapshot = cache.snapshot(&key("")).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(snapshot.data, Some(json!({ "call": 2 })));
    }

    #[tokio::test]
    async fn test_garbage_collect_keeps_observed_entries() {
        let cache = QueryCache::new(CacheConfig {
            gc_time: Duration::ZERO,
            ..CacheConfig::default()
        });
        let fetcher: Fetcher = Arc::new(|| async { Ok(json!([])) }.boxed());
        cache.fetch_value(&key("A"), fetcher.clone()).await.unwrap();
        cache.fetch_value(&key("B"), fetcher.clone()).await.unwrap();
        let _handle = cache.observe(key("A"), fetcher);

        assert_eq!(cache.garbage_collect().await, 1);
        assert_eq!(cache.size().await, 1);
        assert!(cache.snapshot(&key("A")).await.is_some());
        assert_eq!(cache.stats().entries_collected, 1);
    }
}
