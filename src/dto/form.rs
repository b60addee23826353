//! Borradores de formulario
//!
//! Un `FormInput` es el estado transitorio de un panel de edición: se
//! rellena campo a campo desde texto, se valida con `validator` y se
//! serializa tal cual como cuerpo de POST/PUT.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::{Validate, ValidationErrors};

use crate::utils::errors::{invalid_field, AppError, AppResult};
use crate::utils::validation::{validate_date, validate_positive};

/// Campo de un formulario: nombre en el JSON y etiqueta visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str) -> Self {
        Self { name, label, required: true }
    }

    pub const fn optional(name: &'static str, label: &'static str) -> Self {
        Self { name, label, required: false }
    }
}

/// Errores por campo tal como se muestran junto a cada input
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub trait FormInput:
    Serialize + Validate + Default + Clone + Debug + PartialEq + Send + Sync + 'static
{
    const FIELDS: &'static [FieldSpec];

    /// Asignar un campo a partir de su valor textual
    fn set_field(&mut self, field: &str, value: &str) -> AppResult<()>;

    /// Valor actual de un campo, tal como se mostraría en el input
    fn field_value(&self, field: &str) -> Option<String>;

    /// Todos los campos con su valor actual, en el orden del formulario
    fn values(&self) -> Vec<(&'static str, String)> {
        Self::FIELDS
            .iter()
            .map(|spec| (spec.name, self.field_value(spec.name).unwrap_or_default()))
            .collect()
    }
}

/// Resolver el nombre canónico de un campo (`transporter_id`, `transporterId`, ...)
pub fn canonical_field(fields: &'static [FieldSpec], field: &str) -> AppResult<&'static str> {
    let wanted = normalize(field);
    fields
        .iter()
        .find(|spec| normalize(spec.name) == wanted)
        .map(|spec| spec.name)
        .ok_or_else(|| invalid_field(field, "campo desconhecido"))
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Convertir los errores de `validator` en mensajes por campo (con el nombre del JSON)
pub fn field_errors(fields: &'static [FieldSpec], errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            let name = canonical_field(fields, field).unwrap_or(field);
            (name.to_string(), messages)
        })
        .collect()
}

pub fn parse_text(value: &str) -> String {
    value.trim().to_string()
}

pub fn parse_enum<T>(field: &str, value: &str) -> AppResult<Option<T>>
where
    T: FromStr<Err = AppError>,
{
    if value.trim().is_empty() {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|e| match e {
        AppError::InvalidField { message, .. } => invalid_field(field, message),
        other => other,
    })
}

pub fn parse_id(field: &str, value: &str) -> AppResult<Option<i64>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let id: i64 = value
        .parse()
        .map_err(|_| invalid_field(field, "identificador inválido"))?;
    validate_positive(id).map_err(|_| invalid_field(field, "identificador deve ser positivo"))?;
    Ok(Some(id))
}

pub fn parse_date(field: &str, value: &str) -> AppResult<Option<NaiveDate>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    validate_date(value)
        .map(Some)
        .map_err(|_| invalid_field(field, "data inválida, use AAAA-MM-DD"))
}

/// Acepta `1200.50`, `1.200,50` y `R$ 1.200,50`
pub fn parse_amount(field: &str, value: &str) -> AppResult<Option<Decimal>> {
    let cleaned: String = value
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Ok(None);
    }
    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };
    Decimal::from_str(&normalized)
        .map(Some)
        .map_err(|_| invalid_field(field, "valor monetário inválido"))
}
