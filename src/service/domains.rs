use serde::Deserialize;
use std::collections::HashSet;

use crate::error::DeskError;
use crate::provider::{DomainName, DomainTarget, RemoteDomain};

pub const DEFAULT_PER_PAGE: usize = 10;
pub const MAX_PER_PAGE: usize = 50;

/// Split free-form domain input into distinct, trimmed, non-blank names.
///
/// Entries may be separated by newlines or commas. Syntax checks are left to
/// the provider.
pub fn parse_domain_input(raw: &str) -> Vec<DomainName> {
    let mut seen = HashSet::new();
    raw.split(['\n', '\r', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_ascii_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Same as [`parse_domain_input`], failing when nothing is left.
pub fn require_domains(raw: &str) -> Result<Vec<DomainName>, DeskError> {
    let names = parse_domain_input(raw);
    if names.is_empty() {
        return Err(DeskError::Validation(
            "Enter at least one domain name".to_string(),
        ));
    }
    Ok(names)
}

/// Collect removal targets from an urlencoded body holding any mix of
/// `domains` (free-form names) and repeated `domain_ids` fields.
pub fn parse_removal_form(body: &[u8]) -> Result<Vec<DomainTarget>, DeskError> {
    let mut targets = Vec::new();
    for (key, value) in url::form_urlencoded::parse(body) {
        match key.as_ref() {
            "domains" => targets.extend(
                parse_domain_input(&value)
                    .into_iter()
                    .map(DomainTarget::Name),
            ),
            "domain_ids" => {
                let value = value.trim();
                if value.is_empty() {
                    continue;
                }
                let id = value.parse().map_err(|_| {
                    DeskError::Validation(format!("Invalid domain id: {value}"))
                })?;
                targets.push(DomainTarget::Id(id));
            }
            _ => {}
        }
    }
    if targets.is_empty() {
        return Err(DeskError::Validation(
            "Select or enter at least one domain to delete".to_string(),
        ));
    }
    Ok(targets)
}

/// Query string of the domain listing page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub search: Option<String>,
}

/// Page size chosen on the listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerPage {
    Limit(usize),
    All,
}

impl PerPage {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("all") => PerPage::All,
            Some(v) => v
                .parse::<usize>()
                .map(|n| PerPage::Limit(n.clamp(1, MAX_PER_PAGE)))
                .unwrap_or(PerPage::Limit(DEFAULT_PER_PAGE)),
            None => PerPage::Limit(DEFAULT_PER_PAGE),
        }
    }

    pub fn label(&self) -> String {
        match self {
            PerPage::Limit(n) => n.to_string(),
            PerPage::All => "all".to_string(),
        }
    }
}

/// One filtered page of the remote listing.
#[derive(Debug, Clone)]
pub struct DomainPage {
    pub domains: Vec<RemoteDomain>,
    pub page: usize,
    pub pages: usize,
    pub total: usize,
    pub per_page: PerPage,
    pub search: String,
}

impl DomainPage {
    /// Filter by case-insensitive substring, then cut out the requested page.
    pub fn build(all: Vec<RemoteDomain>, query: &ListingQuery) -> Self {
        let search = query.search.as_deref().unwrap_or("").trim().to_string();
        let needle = search.to_lowercase();
        let filtered: Vec<RemoteDomain> = all
            .into_iter()
            .filter(|d| needle.is_empty() || d.name.to_lowercase().contains(&needle))
            .collect();

        let per_page = PerPage::parse(query.per_page.as_deref());
        let page = query
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .max(1);
        let total = filtered.len();

        let (domains, pages) = match per_page {
            PerPage::All => (filtered, 1),
            PerPage::Limit(size) => {
                let pages = total.div_ceil(size).max(1);
                let domains = filtered
                    .into_iter()
                    .skip((page - 1).saturating_mul(size))
                    .take(size)
                    .collect();
                (domains, pages)
            }
        };

        Self {
            domains,
            page,
            pages,
            total,
            per_page,
            search,
        }
    }
}
