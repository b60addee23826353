//! Modelos del sistema
//!
//! Este módulo contiene los registros que devuelve el backend REST
//! (conductores, transportadoras, vehículos y fletes) y el trait
//! `Resource` que describe cada entidad para la vista genérica.

pub mod driver;
pub mod freight;
pub mod resource;
pub mod transporter;
pub mod vehicle;

pub use driver::{Driver, DriverSummary};
pub use freight::{CargoType, Freight, FreightStatus, FreightSummary};
pub use resource::{EntityId, EntityKind, Resource, SelectOption};
pub use transporter::{Transporter, TransporterSummary};
pub use vehicle::{Vehicle, VehicleSummary, VehicleType};

/// Fechas ISO: se serializan como `YYYY-MM-DD` y se aceptan también en RFC3339
pub(crate) mod iso_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn parse(value: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
            .or_else(|| value.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {}", raw)))
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => super::serialize(date, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid date: {}", raw))),
                None => Ok(None),
            }
        }
    }
}

/// Normalizar un valor enumerado escrito a mano (`in route` → `IN_ROUTE`)
pub(crate) fn enum_token(value: &str) -> String {
    value.trim().to_uppercase().replace([' ', '-'], "_")
}
