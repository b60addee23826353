//! Ejecución de los comandos de la CLI sobre las vistas de la consola
//!
//! Cada comando devuelve el texto que el binario imprime; las
//! notificaciones quedan en el `Notifier` del estado.

use serde::Serialize;
use tracing::info;

use crate::cli::{Commands, EntityAction, OutputFormat};
use crate::controllers::{EntityListView, Layout, SubmitOutcome};
use crate::dto::{FieldErrors, FormInput};
use crate::models::{Driver, EntityId, EntityKind, Freight, Resource, Transporter, Vehicle};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::format::render_table;

/// Confirmación interactiva del diálogo de borrado
pub trait ConfirmPrompt {
    fn confirm(&self, title: &str, description: &str) -> bool;
}

/// Confirma siempre (equivalente a `--yes`)
pub struct AssumeYes;

impl ConfirmPrompt for AssumeYes {
    fn confirm(&self, _title: &str, _description: &str) -> bool {
        true
    }
}

pub async fn run(
    command: &Commands,
    format: OutputFormat,
    state: &AppState,
    prompt: &dyn ConfirmPrompt,
) -> AppResult<String> {
    if let Some((kind, action)) = command.entity() {
        return match kind {
            EntityKind::Driver => run_entity::<Driver>(action, format, state, prompt).await,
            EntityKind::Transporter => {
                run_entity::<Transporter>(action, format, state, prompt).await
            }
            EntityKind::Vehicle => run_entity::<Vehicle>(action, format, state, prompt).await,
            EntityKind::Freight => run_entity::<Freight>(action, format, state, prompt).await,
        };
    }

    let mut layout = Layout::new(state.clone());
    match command {
        Commands::Page { path } => {
            layout.navigate(path).await?;
            let mut lines = layout.sidebar();
            lines.push(String::new());
            lines.push(layout.render().await?);
            Ok(lines.join("\n"))
        }
        _ => Ok(layout.sidebar().join("\n")),
    }
}

async fn run_entity<R: Resource>(
    action: &EntityAction,
    format: OutputFormat,
    state: &AppState,
    prompt: &dyn ConfirmPrompt,
) -> AppResult<String> {
    let view = EntityListView::<R>::new(state.clone());

    match action {
        EntityAction::List { search } => {
            view.set_search(search);
            let records = view.refresh().await?;
            info!("📋 {} registros de {}", records.len(), R::KIND);
            match format {
                OutputFormat::Json => to_json(&records),
                OutputFormat::Table => view.render().await,
            }
        }
        EntityAction::Show { id } => {
            let panel = view.open_edit(*id);
            let record = panel
                .load()
                .await?
                .ok_or_else(|| AppError::NotFound(format!("{} {}", R::KIND, id)))?;
            match format {
                OutputFormat::Json => to_json(&record),
                OutputFormat::Table => Ok(render_fields::<R>(&panel.values())),
            }
        }
        EntityAction::Create { fields } => {
            let panel = view.open_create();
            panel.load_references().await;
            apply_fields(fields, |field, value| panel.set_field(field, value));
            let outcome = panel.submit().await?;
            render_outcome::<R>(outcome, None, format)
        }
        EntityAction::Update { id, fields } => {
            let panel = view.open_edit(*id);
            panel.load().await?;
            apply_fields(fields, |field, value| panel.set_field(field, value));
            let outcome = panel.submit().await?;
            render_outcome::<R>(outcome, Some(*id), format)
        }
        EntityAction::Delete { id, yes } => {
            let request = view.request_delete(*id);
            let gate = request.gate();
            if !*yes && !prompt.confirm(gate.title(), gate.description()) {
                request.cancel();
                return Ok("Operação cancelada.".to_string());
            }
            request.confirm().await?;
            // El aviso de éxito ya sale por el notificador
            match format {
                OutputFormat::Json => to_json(&serde_json::json!({ "id": id, "deleted": true })),
                OutputFormat::Table => Ok(String::new()),
            }
        }
    }
}

/// Los errores de interpretación quedan en el panel y bloquean el envío
fn apply_fields<F>(fields: &[(String, String)], mut set: F)
where
    F: FnMut(&str, &str) -> AppResult<()>,
{
    for (field, value) in fields {
        if let Err(e) = set(field, value) {
            info!("Campo '{}' rechazado: {}", field, e);
        }
    }
}

fn render_outcome<R: Resource>(
    outcome: SubmitOutcome<R>,
    id: Option<EntityId>,
    format: OutputFormat,
) -> AppResult<String> {
    let record = match outcome {
        SubmitOutcome::Invalid(errors) => return Err(invalid_form(&errors)),
        SubmitOutcome::Created(record) | SubmitOutcome::Updated(record) => record,
    };
    match (record, format) {
        (Some(record), OutputFormat::Json) => to_json(&record),
        (Some(record), OutputFormat::Table) => Ok(render_table(R::COLUMNS, &[record.row()])),
        (None, OutputFormat::Json) => to_json(&serde_json::json!({ "id": id })),
        (None, OutputFormat::Table) => Ok(String::new()),
    }
}

fn invalid_form(errors: &FieldErrors) -> AppError {
    let fields: Vec<&str> = errors.keys().map(String::as_str).collect();
    let message = errors
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join("; ")))
        .collect::<Vec<_>>()
        .join(", ");
    AppError::InvalidField {
        field: fields.join(", "),
        message,
    }
}

fn render_fields<R: Resource>(values: &[(&'static str, String)]) -> String {
    let rows: Vec<Vec<String>> = values
        .iter()
        .map(|(name, value)| {
            let label = R::Input::FIELDS
                .iter()
                .find(|f| f.name == *name)
                .map_or(*name, |f| f.label);
            vec![label.to_string(), value.clone()]
        })
        .collect();
    render_table(&["Campo", "Valor"], &rows)
}

fn to_json<T: Serialize>(value: &T) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
