//! An in-memory implementation of the [`DomainProvider`] trait.
//!
//! Keeps one domain list per API key. Unknown keys are rejected like a real
//! provider would, and individual names can be scripted to fail.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::{DomainProvider, RemoteDomain, RemoteDomainId};
use crate::error::ProviderError;

#[derive(Debug, Default)]
struct MemoryState {
    zones: HashMap<String, Vec<RemoteDomain>>,
    failures: HashMap<String, ProviderError>,
    submitted: Vec<String>,
    next_id: RemoteDomainId,
}

#[derive(Debug, Default)]
pub struct MemoryProvider {
    state: Mutex<MemoryState>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `api_key` from now on, starting with no domains.
    pub async fn register_key(&self, api_key: &str) {
        self.state
            .lock()
            .await
            .zones
            .entry(api_key.to_string())
            .or_default();
    }

    /// Make every future `add_domain` for `name` fail with `err`.
    pub async fn fail_on(&self, name: &str, err: ProviderError) {
        self.state
            .lock()
            .await
            .failures
            .insert(name.to_string(), err);
    }

    /// Names passed to `add_domain`, in call order.
    pub async fn submitted(&self) -> Vec<String> {
        self.state.lock().await.submitted.clone()
    }
}

fn unknown_key() -> ProviderError {
    ProviderError::Authentication("Invalid API key.".to_string())
}

#[async_trait]
impl DomainProvider for MemoryProvider {
    async fn list_domains(&self, api_key: &str) -> Result<Vec<RemoteDomain>, ProviderError> {
        let state = self.state.lock().await;
        state.zones.get(api_key).cloned().ok_or_else(unknown_key)
    }

    async fn add_domain(&self, api_key: &str, name: &str) -> Result<(), ProviderError> {
        let mut state = self.state.lock().await;
        state.submitted.push(name.to_string());
        if let Some(err) = state.failures.get(name) {
            return Err(err.clone());
        }
        state.next_id += 1;
        let id = state.next_id;
        let zone = state.zones.get_mut(api_key).ok_or_else(unknown_key)?;
        if zone.iter().any(|d| d.name.eq_ignore_ascii_case(name)) {
            return Err(ProviderError::Remote {
                status: 400,
                message: format!("{name} already exists"),
            });
        }
        zone.push(RemoteDomain {
            id,
            name: name.to_string(),
            state: Some("Complete".to_string()),
        });
        Ok(())
    }

    async fn delete_domain(&self, api_key: &str, id: RemoteDomainId) -> Result<(), ProviderError> {
        let mut state = self.state.lock().await;
        let zone = state.zones.get_mut(api_key).ok_or_else(unknown_key)?;
        let before = zone.len();
        zone.retain(|d| d.id != id);
        if zone.len() == before {
            return Err(ProviderError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
