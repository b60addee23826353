//! Cliente HTTP para la API REST de logística
//!
//! `Transport` es la costura que usan los repositorios: en producción la
//! implementa `ApiClient` sobre reqwest y en los tests un transporte en
//! memoria.

use async_trait::async_trait;
use http::{Method, StatusCode};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::EnvironmentConfig;
use crate::utils::errors::{AppError, AppResult};

/// Petición independiente del transporte
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path, None)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path, Some(body))
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, path, Some(body))
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path, None)
    }

    fn new(method: Method, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body,
        }
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }
}

/// Envío de peticiones al backend; la respuesta vacía se devuelve como `Value::Null`
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> AppResult<Value>;
}

/// Cliente HTTP de la API
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Crear nuevo cliente HTTP con la URL y el timeout configurados
    pub fn new(config: &EnvironmentConfig) -> AppResult<Self> {
        let client = Client::builder().timeout(config.api_timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for ApiClient {
    async fn send(&self, request: ApiRequest) -> AppResult<Value> {
        let url = self.url(&request.path);
        debug!("🌐 {} {} {:?}", request.method, url, request.query);

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header("Accept", "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status: StatusCode = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("❌ {} {} respondió {}: {}", request.method, url, status, text);
            return Err(AppError::Api {
                status,
                message: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = EnvironmentConfig {
            api_base_url: "http://localhost:3333/".to_string(),
            ..EnvironmentConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3333");
        assert_eq!(client.url("/vehicle/7"), "http://localhost:3333/vehicle/7");
    }

    #[test]
    fn test_request_builders() {
        let request = ApiRequest::get("vehicle").with_query("plateNumber", "ABC");
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.query, vec![("plateNumber".to_string(), "ABC".to_string())]);

        let request = ApiRequest::put("vehicle/7", json!({ "plateNumber": "ABC1234" }));
        assert_eq!(request.method, Method::PUT);
        assert!(request.body.is_some());
    }
}
