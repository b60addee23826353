//! Definición de la CLI con clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::models::{EntityId, EntityKind};

/// Formato de salida de los resultados
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "freight-console")]
#[command(version)]
#[command(about = "Console administrativa de fretes, transportadoras, motoristas e veículos")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Formato de salida (table, json)
    #[arg(long, short = 'f', global = true, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Salida detallada (nivel debug)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Gestionar motoristas
    Driver(EntityArgs),
    /// Gestionar transportadoras
    Transporter(EntityArgs),
    /// Gestionar vehículos
    Vehicle(EntityArgs),
    /// Gestionar fletes
    Freight(EntityArgs),
    /// Listar la navegación del menú lateral
    Routes,
    /// Mostrar una página de la consola (p. ej. /freight)
    Page {
        /// Ruta de la página
        path: String,
    },
}

impl Commands {
    pub fn entity(&self) -> Option<(EntityKind, &EntityAction)> {
        match self {
            Commands::Driver(args) => Some((EntityKind::Driver, &args.action)),
            Commands::Transporter(args) => Some((EntityKind::Transporter, &args.action)),
            Commands::Vehicle(args) => Some((EntityKind::Vehicle, &args.action)),
            Commands::Freight(args) => Some((EntityKind::Freight, &args.action)),
            Commands::Routes | Commands::Page { .. } => None,
        }
    }
}

#[derive(Args, Debug)]
pub struct EntityArgs {
    #[command(subcommand)]
    pub action: EntityAction,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum EntityAction {
    /// Listar registros, con filtro opcional
    List {
        /// Término de búsqueda (placa, nombre o número de flete)
        #[arg(long, short = 's', default_value = "")]
        search: String,
    },
    /// Mostrar un registro
    Show { id: EntityId },
    /// Crear un registro
    Create {
        /// Asignación de campo, p. ej. --set plateNumber=ABC-1234
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
    },
    /// Actualizar un registro
    Update {
        id: EntityId,
        /// Asignación de campo, p. ej. --set name=ACME
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
    },
    /// Eliminar un registro
    Delete {
        id: EntityId,
        /// Omitir la confirmación
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(field, value)| (field.trim().to_string(), value.to_string()))
        .filter(|(field, _)| !field.is_empty())
        .ok_or_else(|| format!("esperado CAMPO=VALOR, recebido '{}'", raw))
}
