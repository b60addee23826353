//! Configuración del proyecto
//!
//! Este módulo contiene la configuración de variables de entorno
//! de la consola (URL del backend, tiempos de cache y de búsqueda).

pub mod environment;

pub use environment::*;
