//! Backend REST en memoria para los tests unitarios

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use http::{Method, StatusCode};
use serde_json::{json, Value};

use super::api_client::{ApiRequest, Transport};
use crate::utils::errors::{AppError, AppResult};

#[derive(Default)]
struct Store {
    records: HashMap<String, BTreeMap<i64, Value>>,
    next_id: i64,
    requests: Vec<ApiRequest>,
    fail_next: Option<StatusCode>,
    delay: Duration,
}

/// Guarda los registros por ruta y anota cada petición recibida
#[derive(Default)]
pub struct MemoryTransport {
    store: Mutex<Store>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, path: &str, record: Value) {
        let mut store = self.store.lock().unwrap();
        let id = record["id"].as_i64().unwrap();
        store.next_id = store.next_id.max(id);
        store.records.entry(path.to_string()).or_default().insert(id, record);
    }

    /// La próxima petición falla con ese status
    pub fn fail_next(&self, status: StatusCode) {
        self.store.lock().unwrap().fail_next = Some(status);
    }

    pub fn set_delay(&self, delay: Duration) {
        self.store.lock().unwrap().delay = delay;
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.store.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.store.lock().unwrap().requests.last().cloned()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.store
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn handle(&self, request: &ApiRequest) -> AppResult<Value> {
        let mut store = self.store.lock().unwrap();
        store.requests.push(request.clone());
        if let Some(status) = store.fail_next.take() {
            return Err(AppError::Api {
                status,
                message: "falha simulada".to_string(),
            });
        }

        let segments: Vec<&str> = request.path.trim_start_matches('/').split('/').collect();
        let collection = segments[0].to_string();
        let id: Option<i64> = segments.get(1).and_then(|s| s.parse().ok());
        let not_found = || AppError::Api {
            status: StatusCode::NOT_FOUND,
            message: "not found".to_string(),
        };

        match (request.method.clone(), id) {
            (Method::GET, None) => {
                let needle = request.query.first().map(|(_, v)| v.to_lowercase());
                let records = store.records.get(&collection).cloned().unwrap_or_default();
                let list: Vec<Value> = records
                    .into_values()
                    .filter(|record| match &needle {
                        Some(needle) => record
                            .as_object()
                            .map(|o| {
                                o.values().any(|v| {
                                    v.as_str().is_some_and(|s| s.to_lowercase().contains(needle))
                                })
                            })
                            .unwrap_or(false),
                        None => true,
                    })
                    .collect();
                Ok(Value::Array(list))
            }
            (Method::GET, Some(id)) => store
                .records
                .get(&collection)
                .and_then(|records| records.get(&id))
                .cloned()
                .ok_or_else(not_found),
            (Method::POST, None) => {
                store.next_id += 1;
                let id = store.next_id;
                let record = store.materialize(id, request.body.clone().unwrap_or(Value::Null));
                store.records.entry(collection).or_default().insert(id, record.clone());
                Ok(record)
            }
            (Method::PUT, Some(id)) => {
                let exists = store
                    .records
                    .get(&collection)
                    .is_some_and(|records| records.contains_key(&id));
                if !exists {
                    return Err(not_found());
                }
                let record = store.materialize(id, request.body.clone().unwrap_or(Value::Null));
                store.records.entry(collection).or_default().insert(id, record.clone());
                Ok(record)
            }
            (Method::DELETE, Some(id)) => store
                .records
                .get_mut(&collection)
                .and_then(|records| records.remove(&id))
                .map(|_| Value::Null)
                .ok_or_else(not_found),
            _ => Err(AppError::Api {
                status: StatusCode::METHOD_NOT_ALLOWED,
                message: request.path.clone(),
            }),
        }
    }
}

impl Store {
    /// Convierte `transporter_id`/`driver_id` en los objetos anidados que devuelve la API
    fn materialize(&self, id: i64, body: Value) -> Value {
        let mut record = body;
        record["id"] = json!(id);
        for (field, collection, nested) in [
            ("transporter_id", "transporter", "transporter"),
            ("driver_id", "driver", "driver"),
        ] {
            if let Some(ref_id) = record.get(field).and_then(Value::as_i64) {
                let referenced = self
                    .records
                    .get(collection)
                    .and_then(|records| records.get(&ref_id))
                    .cloned()
                    .unwrap_or_else(|| json!({ "id": ref_id, "name": "" }));
                record[nested] = referenced;
            }
        }
        record
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, request: ApiRequest) -> AppResult<Value> {
        let delay = self.store.lock().unwrap().delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.handle(&request)
    }
}
