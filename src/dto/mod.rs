//! DTOs de la consola
//!
//! Borradores de formulario de cada entidad: lo que el panel de edición
//! valida y envía como cuerpo de POST/PUT.

pub mod driver_dto;
pub mod form;
pub mod freight_dto;
pub mod transporter_dto;
pub mod vehicle_dto;

pub use driver_dto::DriverInput;
pub use form::{FieldErrors, FieldSpec, FormInput};
pub use freight_dto::FreightInput;
pub use transporter_dto::TransporterInput;
pub use vehicle_dto::VehicleInput;
