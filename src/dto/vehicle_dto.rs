use serde::{Deserialize, Serialize};
use validator::Validate;

use super::form::{canonical_field, parse_enum, parse_id, parse_text, FieldSpec, FormInput};
use crate::models::{EntityId, VehicleType};
use crate::utils::errors::AppResult;
use crate::utils::validation::validate_license_plate;

// Borrador para crear o actualizar un vehículo
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInput {
    #[validate(
        length(min = 1, message = "Informe o número da placa"),
        custom = "validate_license_plate"
    )]
    pub plate_number: String,

    #[validate(required(message = "Selecione o tipo de veículo"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<VehicleType>,

    #[validate(required(message = "Selecione a transportadora"))]
    #[serde(rename = "transporter_id", skip_serializing_if = "Option::is_none")]
    pub transporter_id: Option<EntityId>,
}

impl FormInput for VehicleInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("plateNumber", "Número da placa"),
        FieldSpec::required("vehicleType", "Tipo de veículo"),
        FieldSpec::required("transporter_id", "Transportadora"),
    ];

    fn set_field(&mut self, field: &str, value: &str) -> AppResult<()> {
        match canonical_field(Self::FIELDS, field)? {
            "plateNumber" => self.plate_number = parse_text(value).to_ascii_uppercase(),
            "vehicleType" => self.vehicle_type = parse_enum(field, value)?,
            _ => self.transporter_id = parse_id(field, value)?,
        }
        Ok(())
    }

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "plateNumber" => Some(self.plate_number.clone()),
            "vehicleType" => Some(self.vehicle_type.map(|t| t.to_string()).unwrap_or_default()),
            "transporter_id" => Some(self.transporter_id.map(|id| id.to_string()).unwrap_or_default()),
            _ => None,
        }
    }
}
