//! Controllers - Vistas de la consola
//!
//! Lista genérica, panel de edición, diálogo de borrado y layout.

pub mod confirm_delete_controller;
pub mod edit_panel_controller;
pub mod entity_list_controller;
pub mod layout_controller;

pub use confirm_delete_controller::{DeleteGate, GateState};
pub use edit_panel_controller::{EditPanel, PanelMode, SubmitOutcome};
pub use entity_list_controller::{DeleteRequest, EntityListView};
pub use layout_controller::{Layout, Page};
