//! Modelo de Freight
//!
//! Flete con su estado, tipo de carga, costo total y las referencias a
//! transportadora y motorista. Acepta también las grafías antiguas del
//! backend (`totalCoast`, `PERISHABL`).

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::driver::DriverSummary;
use super::iso_date;
use super::resource::{EntityId, EntityKind, Resource};
use super::transporter::TransporterSummary;
use super::vehicle::VehicleType;
use crate::dto::FreightInput;
use crate::utils::errors::{invalid_field, AppError};
use crate::utils::format::{format_currency, format_date};

/// Estado del flete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FreightStatus {
    InRoute,
    WaitingForBid,
    Delivered,
}

impl FreightStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FreightStatus::InRoute => "Em rota",
            FreightStatus::WaitingForBid => "Aguardando lance",
            FreightStatus::Delivered => "Entregue",
        }
    }
}

impl fmt::Display for FreightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FreightStatus::InRoute => f.write_str("IN_ROUTE"),
            FreightStatus::WaitingForBid => f.write_str("WAITING_FOR_BID"),
            FreightStatus::Delivered => f.write_str("DELIVERED"),
        }
    }
}

impl FromStr for FreightStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match super::enum_token(value).as_str() {
            "IN_ROUTE" | "EM_ROTA" => Ok(FreightStatus::InRoute),
            "WAITING_FOR_BID" | "AGUARDANDO_LANCE" => Ok(FreightStatus::WaitingForBid),
            "DELIVERED" | "ENTREGUE" => Ok(FreightStatus::Delivered),
            other => Err(invalid_field(
                "status",
                format!(
                    "status desconhecido '{}' (use IN_ROUTE, WAITING_FOR_BID ou DELIVERED)",
                    other
                ),
            )),
        }
    }
}

/// Tipo de carga
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CargoType {
    Hazardous,
    #[serde(alias = "PERISHABL")]
    Perishable,
}

impl CargoType {
    pub fn label(&self) -> &'static str {
        match self {
            CargoType::Hazardous => "Perigosa",
            CargoType::Perishable => "Perecível",
        }
    }
}

impl fmt::Display for CargoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CargoType::Hazardous => f.write_str("HAZARDOUS"),
            CargoType::Perishable => f.write_str("PERISHABLE"),
        }
    }
}

impl FromStr for CargoType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match super::enum_token(value).as_str() {
            "HAZARDOUS" | "PERIGOSA" => Ok(CargoType::Hazardous),
            "PERISHABLE" | "PERISHABL" | "PERECÍVEL" | "PERECIVEL" => Ok(CargoType::Perishable),
            other => Err(invalid_field(
                "cargoType",
                format!("tipo de carga desconhecido '{}' (use HAZARDOUS ou PERISHABLE)", other),
            )),
        }
    }
}

/// Flete resumido dentro de un motorista o una transportadora
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreightSummary {
    pub id: EntityId,
    #[serde(default)]
    pub freight_number: String,
    pub status: FreightStatus,
    #[serde(with = "iso_date")]
    pub freight_date: NaiveDate,
}

/// Freight principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Freight {
    pub id: EntityId,
    #[serde(default)]
    pub freight_number: String,
    pub status: FreightStatus,
    #[serde(with = "iso_date")]
    pub freight_date: NaiveDate,
    pub cargo_type: CargoType,
    #[serde(default)]
    pub vehicle_type: Option<VehicleType>,
    #[serde(alias = "totalCoast", with = "rust_decimal::serde::float", default)]
    pub total_cost: Decimal,
    #[serde(default)]
    pub transporter: Option<TransporterSummary>,
    #[serde(default)]
    pub driver: Option<DriverSummary>,
}

impl Resource for Freight {
    type Input = FreightInput;

    const KIND: EntityKind = EntityKind::Freight;
    const SEARCH_PARAM: &'static str = "freightNumber";
    const LABEL: &'static str = "Frete";
    const COLUMNS: &'static [&'static str] = &[
        "Número",
        "Data",
        "Transportadora",
        "Tipo de carga",
        "Status",
        "Custo total (R$)",
    ];
    const REFERENCES: &'static [EntityKind] = &[EntityKind::Transporter, EntityKind::Driver];

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_input(&self) -> FreightInput {
        FreightInput {
            freight_number: self.freight_number.clone(),
            status: Some(self.status),
            freight_date: Some(self.freight_date),
            cargo_type: Some(self.cargo_type),
            vehicle_type: self.vehicle_type,
            total_cost: Some(self.total_cost),
            transporter_id: self.transporter.as_ref().map(|t| t.id),
            driver_id: self.driver.as_ref().map(|d| d.id),
        }
    }

    fn row(&self) -> Vec<String> {
        let number = if self.freight_number.is_empty() {
            self.id.to_string()
        } else {
            self.freight_number.clone()
        };
        vec![
            number,
            format_date(self.freight_date),
            self.transporter
                .as_ref()
                .map(|t| t.name.clone())
                .unwrap_or_else(|| "-".to_string()),
            self.cargo_type.label().to_string(),
            self.status.label().to_string(),
            format_currency(self.total_cost),
        ]
    }

    fn option_label(&self) -> String {
        self.freight_number.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_spellings_are_accepted() {
        let freight: Freight = serde_json::from_value(json!({
            "id": 42,
            "freightNumber": "FR-42",
            "status": "IN_ROUTE",
            "freightDate": "2024-03-09",
            "cargoType": "PERISHABL",
            "totalCoast": 1200,
            "transporter": { "id": 7, "name": "Rápido Sul", "cnpj": "12345678000190" },
            "driver": null
        }))
        .unwrap();

        assert_eq!(freight.cargo_type, CargoType::Perishable);
        assert_eq!(freight.total_cost, Decimal::new(1200, 0));
        assert_eq!(
            freight.row(),
            vec!["FR-42", "09/03/2024", "Rápido Sul", "Perecível", "Em rota", "R$ 1.200,00"]
        );

        let body = serde_json::to_value(&freight).unwrap();
        assert_eq!(body["cargoType"], "PERISHABLE");
        assert!(body.get("totalCoast").is_none());
    }

    #[test]
    fn test_status_from_label() {
        assert_eq!("Aguardando lance".parse::<FreightStatus>().unwrap(), FreightStatus::WaitingForBid);
        assert_eq!("in-route".parse::<FreightStatus>().unwrap(), FreightStatus::InRoute);
        assert!("LOST".parse::<FreightStatus>().is_err());
    }

    #[test]
    fn test_to_input_round_trip() {
        let freight: Freight = serde_json::from_value(json!({
            "id": 9,
            "freightNumber": "FR-9",
            "status": "DELIVERED",
            "freightDate": "2024-06-30",
            "cargoType": "HAZARDOUS",
            "vehicleType": "TRUCK",
            "totalCost": 350.75,
            "transporter": { "id": 1, "name": "ACME" },
            "driver": { "id": 4, "fullName": "Ana" }
        }))
        .unwrap();

        let input = freight.to_input();
        assert_eq!(input.driver_id, Some(4));
        assert_eq!(input.total_cost, Some(Decimal::new(35075, 2)));
        assert_eq!(input.vehicle_type, Some(VehicleType::Truck));
    }
}
