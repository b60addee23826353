//! Clients - Cliente HTTP del backend de logística
//!
//! Este módulo contiene el transporte que usan los repositorios para
//! hablar con la API REST.

pub mod api_client;
#[cfg(test)]
pub(crate) mod memory_transport;

pub use api_client::{ApiClient, ApiRequest, Transport};
