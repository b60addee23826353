//! Modelo de Transporter
//!
//! Transportadora con su CNPJ y los vehículos y fletes asociados.

use serde::{Deserialize, Serialize};

use super::freight::FreightSummary;
use super::resource::{EntityId, EntityKind, Resource};
use super::vehicle::VehicleSummary;
use crate::dto::TransporterInput;
use crate::utils::format::format_cnpj;

/// Transportadora referenciada desde un vehículo o un flete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransporterSummary {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub cnpj: String,
}

/// Transporter principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transporter {
    pub id: EntityId,
    pub name: String,
    pub cnpj: String,
    #[serde(default)]
    pub vehicles: Vec<VehicleSummary>,
    #[serde(default)]
    pub freights: Vec<FreightSummary>,
}

impl Resource for Transporter {
    type Input = TransporterInput;

    const KIND: EntityKind = EntityKind::Transporter;
    const SEARCH_PARAM: &'static str = "transporterName";
    const LABEL: &'static str = "Transportadora";
    const COLUMNS: &'static [&'static str] = &["Nome", "CNPJ", "Veículos"];
    const FEMININE: bool = true;

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_input(&self) -> TransporterInput {
        TransporterInput {
            name: self.name.clone(),
            cnpj: self.cnpj.clone(),
        }
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            format_cnpj(&self.cnpj),
            self.vehicles.len().to_string(),
        ]
    }

    fn option_label(&self) -> String {
        self.name.clone()
    }
}
