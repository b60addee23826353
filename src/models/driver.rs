//! Modelo de Driver
//!
//! Motorista con su CNH y los fletes que tiene asignados.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::freight::FreightSummary;
use super::iso_date;
use super::resource::{EntityId, EntityKind, Resource};
use crate::dto::DriverInput;
use crate::utils::format::format_date;

/// Motorista referenciado desde un flete (algunas versiones del backend usan `name`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverSummary {
    pub id: EntityId,
    #[serde(alias = "name", default)]
    pub full_name: String,
}

/// Driver principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: EntityId,
    pub full_name: String,
    pub license_number: String,
    #[serde(with = "iso_date")]
    pub license_expiration_date: NaiveDate,
    #[serde(default)]
    pub freights: Vec<FreightSummary>,
}

impl Resource for Driver {
    type Input = DriverInput;

    const KIND: EntityKind = EntityKind::Driver;
    const SEARCH_PARAM: &'static str = "driverName";
    const LABEL: &'static str = "Motorista";
    const COLUMNS: &'static [&'static str] = &["Nome", "CNH", "Validade da CNH", "Fretes"];

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_input(&self) -> DriverInput {
        DriverInput {
            full_name: self.full_name.clone(),
            license_number: self.license_number.clone(),
            license_expiration_date: Some(self.license_expiration_date),
        }
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.full_name.clone(),
            self.license_number.clone(),
            format_date(self.license_expiration_date),
            self.freights.len().to_string(),
        ]
    }

    fn option_label(&self) -> String {
        self.full_name.clone()
    }
}
