//! Remote DNS provider access.
//!
//! [`DomainProvider`] is the seam to the provider's REST API: one remote call per
//! method, the account's API key passed on every call. [`ProviderClient`] builds the
//! multi-domain operations on top of it, dispatching items concurrently and reporting
//! success or failure per domain.

pub mod client;
pub mod dynu;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::ProviderError;

pub use client::ProviderClient;
pub use dynu::DynuClient;
pub use memory::MemoryProvider;

pub type DomainName = String;
pub type RemoteDomainId = i64;

/// A domain as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDomain {
    pub id: RemoteDomainId,
    pub name: DomainName,
    #[serde(default)]
    pub state: Option<String>,
}

/// What the operator asked to remove: a domain name or a provider-side id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DomainTarget {
    Name(DomainName),
    Id(RemoteDomainId),
}

impl DomainTarget {
    pub fn matches(&self, domain: &RemoteDomain) -> bool {
        match self {
            DomainTarget::Name(name) => domain.name.eq_ignore_ascii_case(name),
            DomainTarget::Id(id) => domain.id == *id,
        }
    }
}

impl fmt::Display for DomainTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainTarget::Name(name) => f.write_str(name),
            DomainTarget::Id(id) => write!(f, "#{id}"),
        }
    }
}

/// Per-domain result of a multi-domain operation. Partial success is normal.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub succeeded: BTreeSet<DomainName>,
    pub failed: BTreeMap<DomainName, ProviderError>,
}

impl BatchOutcome {
    pub fn record(&mut self, name: DomainName, result: Result<(), ProviderError>) {
        match result {
            Ok(()) => {
                self.succeeded.insert(name);
            }
            Err(e) => {
                self.failed.insert(name, e);
            }
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

#[async_trait]
pub trait DomainProvider: Send + Sync {
    /// Every domain visible to the API key.
    async fn list_domains(&self, api_key: &str) -> Result<Vec<RemoteDomain>, ProviderError>;

    async fn add_domain(&self, api_key: &str, name: &str) -> Result<(), ProviderError>;

    async fn delete_domain(&self, api_key: &str, id: RemoteDomainId) -> Result<(), ProviderError>;
}
