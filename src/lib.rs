//! Console administrativa de fretes
//!
//! Listas, painéis de edição e diálogos de exclusão para motoristas,
//! transportadoras, veículos e fretes sobre uma API REST.

pub mod cache;
pub mod cli;
pub mod clients;
pub mod commands;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use state::AppState;
pub use utils::errors::{AppError, AppResult};
