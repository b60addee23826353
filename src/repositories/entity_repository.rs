//! Repositorio REST genérico
//!
//! Un único repositorio parametrizado por `Resource` cubre las cuatro
//! entidades: `GET /<path>?<param>=<busca>`, `GET /<path>/<id>`,
//! `POST /<path>`, `PUT /<path>/<id>` y `DELETE /<path>/<id>`.

use std::marker::PhantomData;
use std::sync::Arc;

use futures::future::FutureExt;
use serde_json::Value;
use tracing::{debug, info};
use validator::Validate;

use crate::cache::Fetcher;
use crate::clients::{ApiRequest, Transport};
use crate::models::{EntityId, Resource};
use crate::utils::errors::{not_found_error, AppResult};

pub struct EntityRepository<R: Resource> {
    transport: Arc<dyn Transport>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for EntityRepository<R> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.transport))
    }
}

impl<R: Resource> EntityRepository<R> {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            _resource: PhantomData,
        }
    }

    fn collection_path() -> String {
        format!("/{}", R::KIND.path())
    }

    fn item_path(id: EntityId) -> String {
        format!("/{}/{}", R::KIND.path(), id)
    }

    /// Lista sin tipar, tal como la guarda el cache
    pub async fn list_value(&self, search: &str) -> AppResult<Value> {
        let mut request = ApiRequest::get(Self::collection_path());
        let search = search.trim();
        if !search.is_empty() {
            request = request.with_query(R::SEARCH_PARAM, search);
        }
        debug!("Listando {} (busca: '{}')", R::KIND.list_key(), search);
        let value = self.transport.send(request).await?;
        // Un cuerpo vacío equivale a una lista vacía
        Ok(if value.is_null() { Value::Array(Vec::new()) } else { value })
    }

    pub async fn list(&self, search: &str) -> AppResult<Vec<R>> {
        Ok(serde_json::from_value(self.list_value(search).await?)?)
    }

    pub async fn find_value(&self, id: EntityId) -> AppResult<Value> {
        let value = self.transport.send(ApiRequest::get(Self::item_path(id))).await?;
        if value.is_null() {
            return Err(not_found_error(R::KIND.path(), &id.to_string()));
        }
        Ok(value)
    }

    pub async fn find_by_id(&self, id: EntityId) -> AppResult<R> {
        Ok(serde_json::from_value(self.find_value(id).await?)?)
    }

    /// Fetcher de la lista para el cache de consultas
    pub fn list_fetcher(&self, search: &str) -> Fetcher {
        let repository = self.clone();
        let search = search.to_string();
        Arc::new(move || {
            let repository = repository.clone();
            let search = search.clone();
            async move { repository.list_value(&search).await }.boxed()
        })
    }

    pub fn detail_fetcher(&self, id: EntityId) -> Fetcher {
        let repository = self.clone();
        Arc::new(move || {
            let repository = repository.clone();
            async move { repository.find_value(id).await }.boxed()
        })
    }

    /// Crear registro; devuelve el cuerpo de la respuesta (puede ser `Null`)
    /// Los borradores inválidos no llegan a la red
    pub async fn create(&self, input: &R::Input) -> AppResult<Value> {
        input.validate()?;
        let body = serde_json::to_value(input)?;
        let created = self
            .transport
            .send(ApiRequest::post(Self::collection_path(), body))
            .await?;
        info!("✅ {} creado", R::KIND);
        Ok(created)
    }

    pub async fn update(&self, id: EntityId, input: &R::Input) -> AppResult<Value> {
        input.validate()?;
        let body = serde_json::to_value(input)?;
        let updated = self
            .transport
            .send(ApiRequest::put(Self::item_path(id), body))
            .await?;
        info!("✅ {} {} actualizado", R::KIND, id);
        Ok(updated)
    }

    pub async fn delete(&self, id: EntityId) -> AppResult<()> {
        self.transport.send(ApiRequest::delete(Self::item_path(id))).await?;
        info!("🗑️ {} {} eliminado", R::KIND, id);
        Ok(())
    }
}
