//! Vista de lista genérica
//!
//! Una sola vista parametrizada por `Resource` para las cuatro entidades.
//! La lista se guarda en el cache bajo `[<plural>, <busca>]`; la vista se
//! registra como observador de esa clave para volver a pedirla cuando una
//! mutación la invalida.

use std::sync::{Mutex, MutexGuard};

use tracing::{debug, error};

use super::confirm_delete_controller::DeleteGate;
use super::edit_panel_controller::EditPanel;
use crate::cache::{ObserverHandle, QueryKey, QuerySnapshot, QueryStatus};
use crate::models::{EntityId, Resource};
use crate::repositories::EntityRepository;
use crate::services::SearchDebouncer;
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::utils::format::render_table;

pub struct EntityListView<R: Resource> {
    state: AppState,
    repository: EntityRepository<R>,
    search: Mutex<String>,
    debouncer: SearchDebouncer,
    observer: Mutex<Option<ObserverHandle>>,
}

impl<R: Resource> EntityListView<R> {
    pub fn new(state: AppState) -> Self {
        let repository = state.repository::<R>();
        let debouncer = SearchDebouncer::new(state.config.search_debounce());
        Self {
            state,
            repository,
            search: Mutex::new(String::new()),
            debouncer,
            observer: Mutex::new(None),
        }
    }

    fn search_lock(&self) -> MutexGuard<'_, String> {
        self.search
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn observer_lock(&self) -> MutexGuard<'_, Option<ObserverHandle>> {
        self.observer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn search_term(&self) -> String {
        self.search_lock().clone()
    }

    pub fn query_key(&self) -> QueryKey {
        QueryKey::list::<R>(&self.search_term())
    }

    /// Fijar el término sin esperar ni consultar
    pub fn set_search(&self, term: &str) {
        *self.search_lock() = term.trim().to_string();
    }

    /// Cambiar el término de búsqueda; devuelve `false` si otro término más nuevo lo reemplazó
    pub async fn search(&self, term: &str) -> AppResult<bool> {
        self.set_search(term);
        if !self.debouncer.settle().await {
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }

    /// Leer la lista de la clave actual y montarse como su observador
    pub async fn refresh(&self) -> AppResult<Vec<R>> {
        let search = self.search_term();
        let key = QueryKey::list::<R>(&search);
        let fetcher = self.repository.list_fetcher(&search);

        {
            let mut observer = self.observer_lock();
            if observer.as_ref().map(ObserverHandle::key) != Some(&key) {
                debug!("Vista de {} montada en {}", R::KIND, key);
                // Reemplazar el handle desmonta la clave anterior
                *observer = Some(self.state.cache.observe(key.clone(), fetcher.clone()));
            }
        }

        self.state.cache.fetch(&key, fetcher).await
    }

    /// Desmontar la vista
    pub fn unmount(&self) {
        self.observer_lock().take();
    }

    pub async fn status(&self) -> Option<QuerySnapshot> {
        self.state.cache.snapshot(&self.query_key()).await
    }

    /// Registros en cache para la clave actual
    pub async fn records(&self) -> AppResult<Vec<R>> {
        Ok(self
            .state
            .cache
            .get_data::<Vec<R>>(&self.query_key())
            .await?
            .unwrap_or_default())
    }

    pub async fn rows(&self) -> AppResult<Vec<Vec<String>>> {
        Ok(self.records().await?.iter().map(Resource::row).collect())
    }

    pub async fn render(&self) -> AppResult<String> {
        let snapshot = self.status().await;
        let has_data = snapshot.as_ref().is_some_and(|s| s.data.is_some());
        match snapshot {
            Some(QuerySnapshot { status: QueryStatus::Error, .. }) if !has_data => {
                Ok("Erro ao carregar os dados.".to_string())
            }
            _ if !has_data => Ok("Carregando...".to_string()),
            _ => Ok(render_table(R::COLUMNS, &self.rows().await?)),
        }
    }

    pub fn open_create(&self) -> EditPanel<R> {
        EditPanel::create(self.state.clone())
    }

    pub fn open_edit(&self, id: EntityId) -> EditPanel<R> {
        EditPanel::edit(self.state.clone(), id)
    }

    /// Abrir el diálogo de borrado de una fila
    pub fn request_delete(&self, id: EntityId) -> DeleteRequest<R> {
        let gate = DeleteGate::new();
        gate.activate();
        DeleteRequest {
            id,
            gate,
            state: self.state.clone(),
            repository: self.repository.clone(),
        }
    }
}

/// Borrado pendiente de confirmación para una fila concreta
pub struct DeleteRequest<R: Resource> {
    id: EntityId,
    gate: DeleteGate,
    state: AppState,
    repository: EntityRepository<R>,
}

impl<R: Resource> DeleteRequest<R> {
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn gate(&self) -> &DeleteGate {
        &self.gate
    }

    pub fn cancel(&self) {
        self.gate.cancel();
    }

    /// DELETE, invalidación de las listas y notificación
    pub async fn confirm(&self) -> AppResult<()> {
        let id = self.id;
        self.gate
            .confirm(|| async move {
                if let Err(e) = self.repository.delete(id).await {
                    error!("❌ Error al eliminar {} {}: {}", R::KIND, id, e);
                    self.state
                        .notifier
                        .error(&format!("Erro ao deletar {} {}. {}", R::LABEL, id, e.user_message()));
                    return Err(e);
                }
                self.state.cache.invalidate(&QueryKey::list_root::<R>()).await;
                self.state.cache.invalidate(&QueryKey::detail::<R>(id)).await;
                self.state.notifier.success(&R::success_message("deletado", Some(id)));
                Ok(())
            })
            .await
    }
}
