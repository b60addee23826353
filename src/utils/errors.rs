//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores de la consola
//! y su conversión a mensajes de notificación para el usuario.

use http::StatusCode;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid value for field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Query {key} failed: {message}")]
    Query { key: String, message: String },

    #[error("Operation already in progress: {0}")]
    Busy(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Texto que se muestra en la notificación de error
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(_) | AppError::InvalidField { .. } => {
                "Verifique os campos do formulário.".to_string()
            }
            AppError::Api { status, .. } if *status == StatusCode::NOT_FOUND => {
                "Registro não encontrado.".to_string()
            }
            AppError::NotFound(_) => "Registro não encontrado.".to_string(),
            AppError::Busy(_) => "Aguarde a operação em andamento.".to_string(),
            _ => "Não foi possível completar a operação.".to_string(),
        }
    }

    /// Indica si el error vino del backend o del transporte
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            AppError::Http(_) | AppError::Api { .. } | AppError::Query { .. }
        )
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de campo inválido
pub fn invalid_field(field: &str, message: impl Into<String>) -> AppError {
    AppError::InvalidField {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Función helper para crear errores internos
pub fn internal_error(message: &str) -> AppError {
    AppError::Internal(message.to_string())
}
