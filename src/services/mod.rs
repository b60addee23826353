//! Services module
//!
//! Este módulo contiene los servicios que comparten las vistas:
//! notificaciones al usuario y debounce de la búsqueda.

pub mod notification_service;
pub mod search_debouncer;

pub use notification_service::*;
pub use search_debouncer::SearchDebouncer;
