use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::form::{
    canonical_field, parse_amount, parse_date, parse_enum, parse_id, parse_text, FieldSpec,
    FormInput,
};
use crate::models::{iso_date, CargoType, EntityId, FreightStatus, VehicleType};
use crate::utils::errors::AppResult;
use crate::utils::validation::validate_non_negative_amount;

// Borrador para crear o actualizar un flete
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FreightInput {
    // El backend asigna el número cuando no se informa
    #[validate(length(max = 30, message = "Número do frete muito longo"))]
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub freight_number: String,

    #[validate(required(message = "Selecione o status do frete"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FreightStatus>,

    #[validate(required(message = "Informe a data do frete"))]
    #[serde(
        with = "iso_date::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub freight_date: Option<NaiveDate>,

    #[validate(required(message = "Selecione o tipo de carga"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo_type: Option<CargoType>,

    #[validate(required(message = "Selecione o tipo de veículo"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<VehicleType>,

    #[validate(
        required(message = "Informe o custo total"),
        custom = "validate_non_negative_amount"
    )]
    #[serde(
        with = "rust_decimal::serde::float_option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub total_cost: Option<Decimal>,

    #[validate(required(message = "Selecione a transportadora"))]
    #[serde(rename = "transporter_id", skip_serializing_if = "Option::is_none")]
    pub transporter_id: Option<EntityId>,

    // Un flete puede no tener motorista asignado
    #[serde(rename = "driver_id", skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<EntityId>,
}

impl FormInput for FreightInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("freightNumber", "Número do frete"),
        FieldSpec::required("status", "Status do frete"),
        FieldSpec::required("freightDate", "Data do frete"),
        FieldSpec::required("cargoType", "Tipo de carga"),
        FieldSpec::required("vehicleType", "Tipo de veículo"),
        FieldSpec::required("totalCost", "Custo total (R$)"),
        FieldSpec::required("transporter_id", "Transportadora"),
        FieldSpec::optional("driver_id", "Motorista"),
    ];

    fn set_field(&mut self, field: &str, value: &str) -> AppResult<()> {
        match canonical_field(Self::FIELDS, field)? {
            "freightNumber" => self.freight_number = parse_text(value),
            "status" => self.status = parse_enum(field, value)?,
            "freightDate" => self.freight_date = parse_date(field, value)?,
            "cargoType" => self.cargo_type = parse_enum(field, value)?,
            "vehicleType" => self.vehicle_type = parse_enum(field, value)?,
            "totalCost" => self.total_cost = parse_amount(field, value)?,
            "transporter_id" => self.transporter_id = parse_id(field, value)?,
            _ => self.driver_id = parse_id(field, value)?,
        }
        Ok(())
    }

    fn field_value(&self, field: &str) -> Option<String> {
        let value = match field {
            "freightNumber" => self.freight_number.clone(),
            "status" => self.status.map(|s| s.to_string()).unwrap_or_default(),
            "freightDate" => self
                .freight_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            "cargoType" => self.cargo_type.map(|c| c.to_string()).unwrap_or_default(),
            "vehicleType" => self.vehicle_type.map(|v| v.to_string()).unwrap_or_default(),
            "totalCost" => self.total_cost.map(|c| c.to_string()).unwrap_or_default(),
            "transporter_id" => self.transporter_id.map(|id| id.to_string()).unwrap_or_default(),
            "driver_id" => self.driver_id.map(|id| id.to_string()).unwrap_or_default(),
            _ => return None,
        };
        Some(value)
    }
}
