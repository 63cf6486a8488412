use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};
use url::Url;

use super::{DomainProvider, RemoteDomain, RemoteDomainId};
use crate::config::Config;
use crate::error::{DeskError, ProviderError};

const API_KEY_HEADER: &str = "API-Key";

/// Dynu REST API (`/v2/dns`) client.
#[derive(Clone)]
pub struct DynuClient {
    http: reqwest::Client,
    base: Url,
}

#[derive(Debug, Deserialize)]
struct DynuErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl DynuClient {
    pub fn new(base: Url, http: reqwest::Client) -> Self {
        Self { http, base }
    }

    /// Build the client with the configured timeouts and optional proxy.
    pub fn from_config(cfg: &Config) -> Result<Self, DeskError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("dnsdesk/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(cfg.http_connect_timeout())
            .timeout(cfg.http_timeout());
        if let Some(proxy_url) = cfg.proxy.as_ref() {
            let proxy = reqwest::Proxy::all(proxy_url.as_str())
                .map_err(|e| DeskError::Validation(format!("invalid proxy url: {e}")))?;
            builder = builder.proxy(proxy);
        }
        let http = builder
            .build()
            .map_err(|e| DeskError::Validation(format!("cannot build HTTP client: {e}")))?;
        Ok(Self::new(cfg.provider_base_url.clone(), http))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base.as_str().trim_end_matches('/'), path)
    }

    /// Send once and hand back the body of a 2xx response.
    async fn execute(
        &self,
        request: RequestBuilder,
        api_key: &str,
        action: &str,
        subject: &str,
    ) -> Result<String, ProviderError> {
        let resp = request
            .header(API_KEY_HEADER, api_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(ProviderError::from)?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::Network(format!("failed to read response body: {e}")))?;
        debug!(action, subject, status = status.as_u16(), "dynu response");

        if status.is_success() {
            return Ok(body);
        }
        let err = map_status(status, &body, subject);
        warn!(action, subject, error = %err, "dynu request failed");
        Err(err)
    }
}

fn map_status(status: StatusCode, body: &str, subject: &str) -> ProviderError {
    let parsed = serde_json::from_str::<DynuErrorBody>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|b| b.message.clone().or_else(|| b.kind.clone()))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Authentication(message),
        StatusCode::NOT_FOUND => ProviderError::NotFound(subject.to_string()),
        _ => ProviderError::Remote {
            status: status.as_u16(),
            message,
        },
    }
}

/// Dynu answers either `{"domains": [...]}` or a bare array.
fn parse_domain_listing(body: &str) -> Result<Vec<RemoteDomain>, ProviderError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;
    let items = match value {
        Value::Object(mut obj) => obj.remove("domains").unwrap_or(Value::Array(Vec::new())),
        arr @ Value::Array(_) => arr,
        _ => Value::Array(Vec::new()),
    };
    serde_json::from_value(items).map_err(|e| ProviderError::Parse(e.to_string()))
}

#[async_trait]
impl DomainProvider for DynuClient {
    async fn list_domains(&self, api_key: &str) -> Result<Vec<RemoteDomain>, ProviderError> {
        let req = self.http.get(self.endpoint("/dns"));
        let body = self.execute(req, api_key, "list", "domains").await?;
        parse_domain_listing(&body)
    }

    async fn add_domain(&self, api_key: &str, name: &str) -> Result<(), ProviderError> {
        let req = self
            .http
            .post(self.endpoint("/dns"))
            .json(&json!({ "name": name }));
        self.execute(req, api_key, "add", name).await?;
        Ok(())
    }

    async fn delete_domain(&self, api_key: &str, id: RemoteDomainId) -> Result<(), ProviderError> {
        let req = self.http.delete(self.endpoint(&format!("/dns/{id}")));
        self.execute(req, api_key, "delete", &id.to_string())
            .await?;
        Ok(())
    }
}
