//! Debounce del campo de búsqueda
//!
//! Cada cambio del término abre una nueva generación; solo la última
//! generación que sobrevive al retardo llega a consultar el backend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::debug;

#[derive(Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    generation: AtomicU64,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Esperar el retardo; devuelve `false` si llegó un término más nuevo
    pub async fn settle(&self) -> bool {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if self.delay.is_zero() {
            return true;
        }
        tokio::time::sleep(self.delay).await;
        let latest = self.generation.load(Ordering::SeqCst) == generation;
        if !latest {
            debug!("Búsqueda {} descartada por un término más nuevo", generation);
        }
        latest
    }
}
