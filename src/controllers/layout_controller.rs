//! Layout de la consola: menú lateral, encabezado y la página de la ruta activa
//!
//! Navegar a otra ruta desmonta la vista anterior (sus observadores del
//! cache se dan de baja) y monta la lista de la nueva entidad.

use super::entity_list_controller::EntityListView;
use crate::models::{Driver, EntityKind, Freight, Transporter, Vehicle};
use crate::routes::{Route, SIDEBAR};
use crate::state::AppState;
use crate::utils::errors::AppResult;

/// Página montada en el área de contenido
pub enum Page {
    Dashboard,
    Freights(EntityListView<Freight>),
    Transporters(EntityListView<Transporter>),
    Drivers(EntityListView<Driver>),
    Vehicles(EntityListView<Vehicle>),
}

pub struct Layout {
    state: AppState,
    route: Route,
    page: Page,
}

impl Layout {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            route: Route::Dashboard,
            page: Page::Dashboard,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Título del encabezado para la ruta activa
    pub fn header(&self) -> &'static str {
        self.route.title()
    }

    /// Menú lateral; la entrada activa va marcada
    pub fn sidebar(&self) -> Vec<String> {
        SIDEBAR
            .iter()
            .map(|entry| {
                let marker = if entry.route == self.route { ">" } else { " " };
                format!("{} {:<16} {}", marker, entry.label, entry.route.path())
            })
            .collect()
    }

    /// Cambiar de ruta y cargar la lista de la nueva página
    pub async fn navigate(&mut self, path: &str) -> AppResult<()> {
        let route = Route::parse(path)?;
        let state = self.state.clone();
        self.page = match route {
            Route::Dashboard => Page::Dashboard,
            Route::Entity(EntityKind::Freight) => Page::Freights(EntityListView::new(state)),
            Route::Entity(EntityKind::Transporter) => {
                Page::Transporters(EntityListView::new(state))
            }
            Route::Entity(EntityKind::Driver) => Page::Drivers(EntityListView::new(state)),
            Route::Entity(EntityKind::Vehicle) => Page::Vehicles(EntityListView::new(state)),
        };
        self.route = route;

        match &self.page {
            Page::Dashboard => {}
            Page::Freights(view) => {
                view.refresh().await?;
            }
            Page::Transporters(view) => {
                view.refresh().await?;
            }
            Page::Drivers(view) => {
                view.refresh().await?;
            }
            Page::Vehicles(view) => {
                view.refresh().await?;
            }
        }
        Ok(())
    }

    /// Contenido de la página activa
    pub async fn render(&self) -> AppResult<String> {
        let content = match &self.page {
            Page::Dashboard => String::new(),
            Page::Freights(view) => view.render().await?,
            Page::Transporters(view) => view.render().await?,
            Page::Drivers(view) => view.render().await?,
            Page::Vehicles(view) => view.render().await?,
        };
        Ok(format!("{}\n\n{}", self.header(), content).trim_end().to_string())
    }
}
