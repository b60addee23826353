//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle tal como lo devuelve
//! `GET /vehicle` y su configuración para la lista genérica.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::resource::{EntityId, EntityKind, Resource};
use super::transporter::TransporterSummary;
use crate::dto::VehicleInput;
use crate::utils::errors::{invalid_field, AppError};

/// Tipo de vehículo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleType {
    Truck,
    Van,
}

impl VehicleType {
    pub fn label(&self) -> &'static str {
        match self {
            VehicleType::Truck => "Caminhão",
            VehicleType::Van => "Van",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleType::Truck => f.write_str("TRUCK"),
            VehicleType::Van => f.write_str("VAN"),
        }
    }
}

impl FromStr for VehicleType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match super::enum_token(value).as_str() {
            "TRUCK" | "CAMINHÃO" | "CAMINHAO" => Ok(VehicleType::Truck),
            "VAN" => Ok(VehicleType::Van),
            other => Err(invalid_field(
                "vehicleType",
                format!("tipo de veículo desconhecido '{}' (use TRUCK ou VAN)", other),
            )),
        }
    }
}

/// Vehículo resumido dentro de una transportadora
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSummary {
    pub id: EntityId,
    pub plate_number: String,
    #[serde(default)]
    pub vehicle_type: Option<VehicleType>,
}

/// Vehicle principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: EntityId,
    pub plate_number: String,
    pub vehicle_type: VehicleType,
    #[serde(default)]
    pub transporter: Option<TransporterSummary>,
}

impl Resource for Vehicle {
    type Input = VehicleInput;

    const KIND: EntityKind = EntityKind::Vehicle;
    const SEARCH_PARAM: &'static str = "plateNumber";
    const LABEL: &'static str = "Veículo";
    const COLUMNS: &'static [&'static str] =
        &["Número da placa", "Tipo de veículo", "Transportadora"];
    const REFERENCES: &'static [EntityKind] = &[EntityKind::Transporter];

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_input(&self) -> VehicleInput {
        VehicleInput {
            plate_number: self.plate_number.clone(),
            vehicle_type: Some(self.vehicle_type),
            transporter_id: self.transporter.as_ref().map(|t| t.id),
        }
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.plate_number.clone(),
            self.vehicle_type.to_string(),
            self.transporter
                .as_ref()
                .map(|t| t.name.clone())
                .unwrap_or_else(|| "-".to_string()),
        ]
    }

    fn option_label(&self) -> String {
        self.plate_number.clone()
    }
}
