//! Rutas de navegación de la consola
//!
//! `/` es el panel principal y cada entidad tiene su propia ruta
//! (`/freight`, `/transporter`, `/driver`, `/vehicle`).

use std::fmt;
use std::str::FromStr;

use crate::models::EntityKind;
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Entity(EntityKind),
}

/// Entrada del menú lateral
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarEntry {
    pub route: Route,
    pub label: &'static str,
}

/// Menú lateral en el orden en que se muestra
pub const SIDEBAR: [SidebarEntry; 5] = [
    SidebarEntry { route: Route::Dashboard, label: "Dashboard" },
    SidebarEntry { route: Route::Entity(EntityKind::Freight), label: "Fretes" },
    SidebarEntry { route: Route::Entity(EntityKind::Transporter), label: "Transportadores" },
    SidebarEntry { route: Route::Entity(EntityKind::Driver), label: "Motoristas" },
    SidebarEntry { route: Route::Entity(EntityKind::Vehicle), label: "Veiculos" },
];

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Dashboard => "/".to_string(),
            Route::Entity(kind) => format!("/{}", kind.path()),
        }
    }

    /// Título del encabezado
    pub fn title(&self) -> &'static str {
        SIDEBAR
            .iter()
            .find(|entry| entry.route == *self)
            .map(|entry| entry.label)
            .unwrap_or("Dashboard")
    }

    pub fn parse(path: &str) -> AppResult<Self> {
        path.parse()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = AppError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = path.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Route::Dashboard);
        }
        // Solo las rutas del menú; `/freights` no es una página
        EntityKind::ALL
            .iter()
            .find(|kind| kind.path() == trimmed)
            .map(|kind| Route::Entity(*kind))
            .ok_or_else(|| AppError::NotFound(format!("route '{}'", path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/").unwrap(), Route::Dashboard);
        assert_eq!(Route::parse("/freight").unwrap(), Route::Entity(EntityKind::Freight));
        assert_eq!(Route::parse("vehicle/").unwrap(), Route::Entity(EntityKind::Vehicle));
        assert!(Route::parse("/freights").is_err());
        assert!(Route::parse("/settings").is_err());
    }

    #[test]
    fn test_titles_follow_sidebar() {
        assert_eq!(Route::Entity(EntityKind::Transporter).title(), "Transportadores");
        assert_eq!(Route::Dashboard.title(), "Dashboard");
        assert_eq!(Route::Entity(EntityKind::Driver).path(), "/driver");
    }
}
