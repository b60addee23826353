use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::form::{canonical_field, parse_date, parse_text, FieldSpec, FormInput};
use crate::models::iso_date;
use crate::utils::errors::AppResult;

// Borrador para crear o actualizar un motorista
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DriverInput {
    #[validate(length(min = 1, max = 120, message = "Informe o nome completo"))]
    pub full_name: String,

    #[validate(length(min = 1, max = 20, message = "Informe o número da CNH"))]
    pub license_number: String,

    #[validate(required(message = "Informe a validade da CNH"))]
    #[serde(
        with = "iso_date::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub license_expiration_date: Option<NaiveDate>,
}

impl FormInput for DriverInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("fullName", "Nome completo"),
        FieldSpec::required("licenseNumber", "Número da CNH"),
        FieldSpec::required("licenseExpirationDate", "Validade da CNH"),
    ];

    fn set_field(&mut self, field: &str, value: &str) -> AppResult<()> {
        match canonical_field(Self::FIELDS, field)? {
            "fullName" => self.full_name = parse_text(value),
            "licenseNumber" => self.license_number = parse_text(value),
            _ => self.license_expiration_date = parse_date(field, value)?,
        }
        Ok(())
    }

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "fullName" => Some(self.full_name.clone()),
            "licenseNumber" => Some(self.license_number.clone()),
            "licenseExpirationDate" => Some(
                self.license_expiration_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            ),
            _ => None,
        }
    }
}
