use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use super::{BatchOutcome, DomainName, DomainProvider, DomainTarget, RemoteDomain};
use crate::error::ProviderError;

/// Multi-domain operations over a [`DomainProvider`].
#[derive(Clone)]
pub struct ProviderClient {
    provider: Arc<dyn DomainProvider>,
    concurrency: usize,
}

impl ProviderClient {
    pub fn new(provider: Arc<dyn DomainProvider>, concurrency: usize) -> Self {
        Self {
            provider,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn list_domains(&self, api_key: &str) -> Result<Vec<RemoteDomain>, ProviderError> {
        self.provider.list_domains(api_key).await
    }

    pub async fn list_domain_names(&self, api_key: &str) -> Result<Vec<DomainName>, ProviderError> {
        Ok(self
            .list_domains(api_key)
            .await?
            .into_iter()
            .map(|d| d.name)
            .collect())
    }

    /// Submit every distinct name once. A failing name never stops the others.
    pub async fn add_domains(&self, api_key: &str, names: &[DomainName]) -> BatchOutcome {
        let provider = &self.provider;
        let results: Vec<(DomainName, Result<(), ProviderError>)> =
            stream::iter(distinct(names.iter().cloned()))
                .map(|name| async move {
                    let res = provider.add_domain(api_key, &name).await;
                    (name, res)
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        let mut outcome = BatchOutcome::default();
        for (name, res) in results {
            outcome.record(name, res);
        }
        info!(
            submitted = outcome.total(),
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "add domains finished"
        );
        outcome
    }

    /// Resolve targets against one listing, then delete each match.
    ///
    /// Targets missing from the listing fail with `NotFound`. Only a failing
    /// listing aborts the whole operation.
    pub async fn remove_domains(
        &self,
        api_key: &str,
        targets: &[DomainTarget],
    ) -> Result<BatchOutcome, ProviderError> {
        let listing = self.provider.list_domains(api_key).await?;

        let mut outcome = BatchOutcome::default();
        let mut resolved = Vec::new();
        let mut seen_ids = HashSet::new();
        for target in distinct(targets.iter().cloned()) {
            match listing.iter().find(|d| target.matches(d)) {
                Some(domain) => {
                    if seen_ids.insert(domain.id) {
                        resolved.push(domain.clone());
                    }
                }
                None => outcome.record(
                    target.to_string(),
                    Err(ProviderError::NotFound(target.to_string())),
                ),
            }
        }

        let provider = &self.provider;
        let results: Vec<(DomainName, Result<(), ProviderError>)> = stream::iter(resolved)
            .map(|domain| async move {
                let res = provider.delete_domain(api_key, domain.id).await;
                (domain.name, res)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;
        for (name, res) in results {
            outcome.record(name, res);
        }
        info!(
            submitted = outcome.total(),
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "remove domains finished"
        );
        Ok(outcome)
    }
}

/// Drop repeats, keeping first-seen order.
fn distinct<T: Clone + Eq + std::hash::Hash>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
