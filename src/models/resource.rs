//! Descripción de una entidad para la lista y el panel genéricos
//!
//! Cada entidad (conductor, transportadora, vehículo, flete) implementa
//! `Resource` con sus rutas REST, su clave de cache, las columnas de la
//! tabla y la conversión registro → borrador del formulario.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::dto::form::FormInput;
use crate::utils::errors::AppError;

/// Identificador asignado por el servidor
pub type EntityId = i64;

/// Tipos de entidad de la consola
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Driver,
    Transporter,
    Vehicle,
    Freight,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Freight,
        EntityKind::Transporter,
        EntityKind::Driver,
        EntityKind::Vehicle,
    ];

    /// Segmento de la ruta REST y de la navegación
    pub fn path(&self) -> &'static str {
        match self {
            EntityKind::Driver => "driver",
            EntityKind::Transporter => "transporter",
            EntityKind::Vehicle => "vehicle",
            EntityKind::Freight => "freight",
        }
    }

    /// Prefijo de la clave de cache de la lista
    pub fn list_key(&self) -> &'static str {
        match self {
            EntityKind::Driver => "drivers",
            EntityKind::Transporter => "transporters",
            EntityKind::Vehicle => "vehicles",
            EntityKind::Freight => "freights",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for EntityKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().trim_start_matches('/').to_ascii_lowercase().as_str() {
            "driver" | "drivers" => Ok(EntityKind::Driver),
            "transporter" | "transporters" => Ok(EntityKind::Transporter),
            "vehicle" | "vehicles" => Ok(EntityKind::Vehicle),
            "freight" | "freights" => Ok(EntityKind::Freight),
            other => Err(AppError::NotFound(format!("entity '{}'", other))),
        }
    }
}

/// Opción de un selector (transportadora, motorista) dentro de un panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub id: EntityId,
    pub label: String,
}

/// Configuración por entidad que usan la lista y el panel genéricos
pub trait Resource: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    /// Borrador del formulario (cuerpo de POST/PUT)
    type Input: FormInput;

    const KIND: EntityKind;
    /// Parámetro de búsqueda de `GET /<entity>`
    const SEARCH_PARAM: &'static str;
    /// Nombre visible en notificaciones
    const LABEL: &'static str;
    const COLUMNS: &'static [&'static str];
    /// Listas de referencia que necesita el panel de edición
    const REFERENCES: &'static [EntityKind] = &[];
    /// Concordancia de género en las notificaciones
    const FEMININE: bool = false;

    fn id(&self) -> EntityId;

    fn to_input(&self) -> Self::Input;

    fn row(&self) -> Vec<String>;

    fn option_label(&self) -> String;

    fn to_option(&self) -> SelectOption {
        SelectOption {
            id: self.id(),
            label: self.option_label(),
        }
    }

    /// Texto de la notificación de éxito (`"Frete 42 deletado!"`)
    fn success_message(participle: &str, id: Option<EntityId>) -> String {
        let participle = match participle.strip_suffix('o') {
            Some(stem) if Self::FEMININE => format!("{}a", stem),
            _ => participle.to_string(),
        };
        match id {
            Some(id) => format!("{} {} {}!", Self::LABEL, id, participle),
            None => format!("{} {} com sucesso!", Self::LABEL, participle),
        }
    }
}
