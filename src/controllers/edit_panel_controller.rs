//! Panel lateral de creación y edición
//!
//! Un único panel genérico por entidad. En modo edición carga el registro
//! bajo la clave `[<entidad>, <id>]` y solo entonces reinicia el borrador
//! con los valores recibidos. Al enviar valida todo el borrador antes de
//! tocar la red; tras un éxito invalida las listas, notifica y se cierra.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;
use tracing::{debug, error, info, warn};
use validator::Validate;

use crate::cache::QueryKey;
use crate::dto::form::{canonical_field, field_errors};
use crate::dto::{FieldErrors, FormInput};
use crate::models::{Driver, EntityId, EntityKind, Freight, Resource, SelectOption, Transporter, Vehicle};
use crate::repositories::EntityRepository;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

/// Modo del panel
#[derive(Debug, Clone, PartialEq)]
pub enum PanelMode<R> {
    Create,
    Edit { id: EntityId, loaded: Option<R> },
}

/// Resultado de un envío
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<R> {
    /// El backend puede responder sin cuerpo; en ese caso no hay registro
    Created(Option<R>),
    Updated(Option<R>),
    /// Validación fallida; no se hizo ninguna petición
    Invalid(FieldErrors),
}

struct PanelState<R: Resource> {
    mode: PanelMode<R>,
    open: bool,
    draft: R::Input,
    /// Errores de validación del último envío
    errors: FieldErrors,
    /// Valores que no se pudieron interpretar al asignarlos
    parse_errors: FieldErrors,
    references: BTreeMap<EntityKind, Vec<SelectOption>>,
    /// Listas de referencia que no se pudieron cargar
    reference_errors: BTreeMap<EntityKind, String>,
}

pub struct EditPanel<R: Resource> {
    state: AppState,
    repository: EntityRepository<R>,
    inner: Mutex<PanelState<R>>,
    submitting: AtomicBool,
}

impl<R: Resource> EditPanel<R> {
    pub fn create(state: AppState) -> Self {
        Self::with_mode(state, PanelMode::Create)
    }

    pub fn edit(state: AppState, id: EntityId) -> Self {
        Self::with_mode(state, PanelMode::Edit { id, loaded: None })
    }

    fn with_mode(state: AppState, mode: PanelMode<R>) -> Self {
        let repository = state.repository::<R>();
        Self {
            state,
            repository,
            inner: Mutex::new(PanelState {
                mode,
                open: true,
                draft: R::Input::default(),
                errors: FieldErrors::new(),
                parse_errors: FieldErrors::new(),
                references: BTreeMap::new(),
                reference_errors: BTreeMap::new(),
            }),
            submitting: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PanelState<R>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn mode(&self) -> PanelMode<R> {
        self.lock().mode.clone()
    }

    pub fn id(&self) -> Option<EntityId> {
        match self.lock().mode {
            PanelMode::Create => None,
            PanelMode::Edit { id, .. } => Some(id),
        }
    }

    pub fn title(&self) -> String {
        match self.id() {
            Some(id) => format!("Editar {} {}", R::LABEL, id),
            None => format!("Cadastrar {}", R::LABEL),
        }
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    pub fn draft(&self) -> R::Input {
        self.lock().draft.clone()
    }

    /// Campos con su valor actual, en el orden del formulario
    pub fn values(&self) -> Vec<(&'static str, String)> {
        self.lock().draft.values()
    }

    /// Errores por campo (interpretación y validación)
    pub fn field_errors(&self) -> FieldErrors {
        let inner = self.lock();
        merge_errors(&inner.parse_errors, &inner.errors)
    }

    pub fn references(&self, kind: EntityKind) -> Vec<SelectOption> {
        self.lock().references.get(&kind).cloned().unwrap_or_default()
    }

    pub fn reference_error(&self, kind: EntityKind) -> Option<String> {
        self.lock().reference_errors.get(&kind).cloned()
    }

    /// Cargar listas de referencia y, en modo edición, el registro.
    /// Una lista de referencia que falla no impide cargar el registro.
    pub async fn load(&self) -> AppResult<Option<R>> {
        self.load_references().await;

        let Some(id) = self.id() else {
            return Ok(None);
        };

        let key = QueryKey::detail::<R>(id);
        let record: R = self
            .state
            .cache
            .fetch(&key, self.repository.detail_fetcher(id))
            .await
            .map_err(|e| {
                error!("❌ Error cargando {} {}: {}", R::KIND, id, e);
                e
            })?;

        let mut inner = self.lock();
        inner.draft = record.to_input();
        inner.errors.clear();
        inner.parse_errors.clear();
        inner.mode = PanelMode::Edit {
            id,
            loaded: Some(record.clone()),
        };
        debug!("Borrador de {} {} reiniciado con los datos del servidor", R::KIND, id);
        Ok(Some(record))
    }

    /// Listas de selección (transportadoras, motoristas) que necesita el formulario.
    /// Cada lista se carga por separado; los fallos quedan anotados por tipo.
    pub async fn load_references(&self) {
        for kind in R::REFERENCES {
            match reference_options(&self.state, *kind).await {
                Ok(options) => {
                    let mut inner = self.lock();
                    inner.reference_errors.remove(kind);
                    inner.references.insert(*kind, options);
                }
                Err(e) => {
                    warn!("⚠️ Lista de {} no disponible para {}: {}", kind, R::KIND, e);
                    self.lock().reference_errors.insert(*kind, e.user_message());
                }
            }
        }
    }

    /// Asignar un campo desde texto; los valores inválidos quedan como error del campo
    pub fn set_field(&self, field: &str, value: &str) -> AppResult<()> {
        let mut inner = self.lock();
        let name = canonical_field(R::Input::FIELDS, field).unwrap_or(field).to_string();

        match inner.draft.set_field(field, value) {
            Ok(()) => {
                inner.parse_errors.remove(&name);
                inner.errors.remove(&name);
                Ok(())
            }
            Err(e) => {
                let message = match &e {
                    AppError::InvalidField { message, .. } => message.clone(),
                    other => other.to_string(),
                };
                inner.parse_errors.insert(name, vec![message]);
                Err(e)
            }
        }
    }

    /// Validar y enviar el borrador (POST en creación, PUT en edición)
    pub async fn submit(&self) -> AppResult<SubmitOutcome<R>> {
        if self.submitting.swap(true, Ordering::SeqCst) {
            return Err(AppError::Busy(format!("{} em envio", R::LABEL)));
        }
        let _guard = SubmittingGuard(&self.submitting);
        self.submit_inner().await
    }

    async fn submit_inner(&self) -> AppResult<SubmitOutcome<R>> {
        let (draft, id) = {
            let mut inner = self.lock();
            inner.errors = match inner.draft.validate() {
                Ok(()) => FieldErrors::new(),
                Err(errors) => field_errors(R::Input::FIELDS, &errors),
            };
            let all = merge_errors(&inner.parse_errors, &inner.errors);
            if !all.is_empty() {
                debug!("Envío de {} bloqueado por validación: {:?}", R::KIND, all);
                return Ok(SubmitOutcome::Invalid(all));
            }
            let id = match inner.mode {
                PanelMode::Create => None,
                PanelMode::Edit { id, .. } => Some(id),
            };
            (inner.draft.clone(), id)
        };

        let response = match id {
            None => self.repository.create(&draft).await,
            Some(id) => self.repository.update(id, &draft).await,
        };

        let body = match response {
            Ok(body) => body,
            Err(e) => {
                error!("❌ Error al guardar {}: {}", R::KIND, e);
                self.state.notifier.error(&e.user_message());
                return Err(e);
            }
        };
        let record = decode_record::<R>(body);

        let outcome = match id {
            None => {
                self.lock().draft = R::Input::default();
                self.state.cache.invalidate(&QueryKey::list_root::<R>()).await;
                self.state.notifier.success(&R::success_message("criado", None));
                SubmitOutcome::Created(record)
            }
            Some(id) => {
                self.state.cache.invalidate(&QueryKey::list_root::<R>()).await;
                self.state.cache.invalidate(&QueryKey::detail::<R>(id)).await;
                self.state.notifier.success(&R::success_message("atualizado", Some(id)));
                SubmitOutcome::Updated(record)
            }
        };

        info!("💾 {} guardado, cerrando panel", R::KIND);
        self.close();
        Ok(outcome)
    }

    /// Cerrar el panel descartando el borrador
    pub fn close(&self) {
        let mut inner = self.lock();
        inner.open = false;
        inner.draft = R::Input::default();
        inner.errors.clear();
        inner.parse_errors.clear();
    }
}

/// Libera el envío aunque el futuro se abandone a mitad
struct SubmittingGuard<'a>(&'a AtomicBool);

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

fn merge_errors(first: &FieldErrors, second: &FieldErrors) -> FieldErrors {
    let mut merged = first.clone();
    for (field, messages) in second {
        merged.entry(field.clone()).or_default().extend(messages.iter().cloned());
    }
    merged
}

fn decode_record<R: Resource>(body: Value) -> Option<R> {
    if body.is_null() {
        return None;
    }
    serde_json::from_value(body)
        .map_err(|e| debug!("Respuesta de {} sin registro legible: {}", R::KIND, e))
        .ok()
}

async fn reference_options(state: &AppState, kind: EntityKind) -> AppResult<Vec<SelectOption>> {
    match kind {
        EntityKind::Driver => options_for::<Driver>(state).await,
        EntityKind::Transporter => options_for::<Transporter>(state).await,
        EntityKind::Vehicle => options_for::<Vehicle>(state).await,
        EntityKind::Freight => options_for::<Freight>(state).await,
    }
}

/// Las referencias comparten la clave de la lista sin búsqueda (`["transporters", ""]`)
async fn options_for<T: Resource>(state: &AppState) -> AppResult<Vec<SelectOption>> {
    let key = QueryKey::list::<T>("");
    let fetcher = state.repository::<T>().list_fetcher("");
    let records: Vec<T> = state.cache.fetch(&key, fetcher).await?;
    Ok(records.iter().map(Resource::to_option).collect())
}
