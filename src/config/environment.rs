//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::utils::errors::{AppError, AppResult};

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    /// URL base del backend REST (sin barra final)
    pub api_base_url: String,
    pub api_timeout_secs: u64,
    pub search_debounce_ms: u64,
    pub query_stale_time_secs: u64,
    pub query_gc_time_secs: u64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            api_base_url: "http://localhost:3333".to_string(),
            api_timeout_secs: 30,
            search_debounce_ms: 500,
            query_stale_time_secs: 30,
            query_gc_time_secs: 300,
        }
    }
}

impl EnvironmentConfig {
    /// Cargar la configuración desde variables de entorno (con valores por defecto)
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            api_base_url: env::var("API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            api_timeout_secs: parse_var("API_TIMEOUT_SECS", defaults.api_timeout_secs)?,
            search_debounce_ms: parse_var("SEARCH_DEBOUNCE_MS", defaults.search_debounce_ms)?,
            query_stale_time_secs: parse_var(
                "QUERY_STALE_TIME_SECS",
                defaults.query_stale_time_secs,
            )?,
            query_gc_time_secs: parse_var("QUERY_GC_TIME_SECS", defaults.query_gc_time_secs)?,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a valid number", name))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::default();
        assert!(config.is_development());
        assert_eq!(config.api_timeout(), Duration::from_secs(30));
        assert_eq!(config.search_debounce(), Duration::from_millis(500));
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("FREIGHT_CONSOLE_TEST_NUMBER", "abc");
        let result: AppResult<u64> = parse_var("FREIGHT_CONSOLE_TEST_NUMBER", 1);
        assert!(matches!(result, Err(AppError::Config(_))));

        env::set_var("FREIGHT_CONSOLE_TEST_NUMBER", " 42 ");
        let result: AppResult<u64> = parse_var("FREIGHT_CONSOLE_TEST_NUMBER", 1);
        assert_eq!(result.unwrap(), 42);
        env::remove_var("FREIGHT_CONSOLE_TEST_NUMBER");
    }
}
