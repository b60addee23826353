//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de los valores de texto de los formularios.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

lazy_static! {
    static ref PLATE_CHARS: Regex = Regex::new(r"^[A-Z0-9]{5,10}$").unwrap();
}

/// Validar y convertir string a fecha (acepta `YYYY-MM-DD` y `DD/MM/YYYY`)
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .map_err(|_| {
            let mut error = ValidationError::new("date");
            error.message = Some("Data inválida".into());
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"YYYY-MM-DD".to_string());
            error
        })
}

/// Validar CNPJ: 14 dígitos una vez eliminada la puntuación
pub fn validate_cnpj(value: &str) -> Result<(), ValidationError> {
    let digits = strip_non_digits(value);
    let only_allowed = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '/' | '-' | ' '));

    if digits.len() != 14 || !only_allowed {
        let mut error = ValidationError::new("cnpj");
        error.message = Some("CNPJ deve conter 14 dígitos".into());
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de placa de vehículo (ABC-1234, ABC1D23, ...)
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    let clean_plate = normalize_plate(value);
    if !PLATE_CHARS.is_match(&clean_plate) {
        let mut error = ValidationError::new("license_plate");
        error.message = Some("Placa inválida".into());
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.message = Some("Valor deve ser positivo".into());
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un importe no sea negativo
pub fn validate_non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.message = Some("Valor não pode ser negativo".into());
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Eliminar todo lo que no sea dígito
pub fn strip_non_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn normalize_plate(value: &str) -> String {
    value
        .replace([' ', '-', '_'], "")
        .to_ascii_uppercase()
}
