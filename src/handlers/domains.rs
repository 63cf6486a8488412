use axum::{
    Form,
    extract::{Path, Query, RawForm, State},
    response::Html,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use tracing::info;

use crate::db::models::AccountId;
use crate::error::DeskError;
use crate::middleware::RequireOperator;
use crate::router::DeskState;
use crate::service::{DomainPage, ListingQuery, parse_removal_form, require_domains};
use crate::views;

const SUGGESTION_COUNT: usize = 5;
const DEFAULT_GENERATE_COUNT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct AddDomainsForm {
    #[serde(default)]
    pub domains: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    pub main_domain: String,
    #[serde(default)]
    pub count: Option<String>,
    #[serde(default)]
    pub use_prefix: bool,
    #[serde(default)]
    pub use_suffix: bool,
}

#[derive(Debug, Deserialize)]
pub struct CustomDomainForm {
    pub subdomain_name: String,
    pub main_domain: String,
}

/// GET /domains/{account_id} -> filtered, paginated remote listing.
pub async fn list_domains(
    RequireOperator(owner): RequireOperator,
    State(state): State<DeskState>,
    WithRejection(Path(account_id), _): WithRejection<Path<AccountId>, DeskError>,
    WithRejection(Query(query), _): WithRejection<Query<ListingQuery>, DeskError>,
) -> Result<Html<String>, DeskError> {
    let account = state.accounts.get(owner, account_id).await?;
    let all = state.client.list_domains(&account.api_key).await?;
    let listing = DomainPage::build(all, &query);
    let suggestions = state.subdomains.suggestions(&mut rand::rng(), SUGGESTION_COUNT);
    Ok(views::domains_page(
        &account,
        &listing,
        state.subdomains.main_domains(),
        &suggestions,
    ))
}

/// POST /domains/{account_id}/add
pub async fn add_domains(
    RequireOperator(owner): RequireOperator,
    State(state): State<DeskState>,
    WithRejection(Path(account_id), _): WithRejection<Path<AccountId>, DeskError>,
    WithRejection(Form(form), _): WithRejection<Form<AddDomainsForm>, DeskError>,
) -> Result<Html<String>, DeskError> {
    let account = state.accounts.get(owner, account_id).await?;
    let names = require_domains(&form.domains)?;
    info!(account_id, count = names.len(), "adding domains");
    let outcome = state.client.add_domains(&account.api_key, &names).await;
    Ok(views::batch_result_page(&account, "Add", &outcome))
}

/// POST /domains/{account_id}/delete -> `domains` textarea and/or repeated `domain_ids`.
pub async fn delete_domains(
    RequireOperator(owner): RequireOperator,
    State(state): State<DeskState>,
    WithRejection(Path(account_id), _): WithRejection<Path<AccountId>, DeskError>,
    WithRejection(RawForm(body), _): WithRejection<RawForm, DeskError>,
) -> Result<Html<String>, DeskError> {
    let account = state.accounts.get(owner, account_id).await?;
    let targets = parse_removal_form(&body)?;
    info!(account_id, count = targets.len(), "removing domains");
    let outcome = state
        .client
        .remove_domains(&account.api_key, &targets)
        .await?;
    Ok(views::batch_result_page(&account, "Delete", &outcome))
}

/// POST /domains/{account_id}/generate -> random names under a main domain, then add.
pub async fn generate_domains(
    RequireOperator(owner): RequireOperator,
    State(state): State<DeskState>,
    WithRejection(Path(account_id), _): WithRejection<Path<AccountId>, DeskError>,
    WithRejection(Form(form), _): WithRejection<Form<GenerateForm>, DeskError>,
) -> Result<Html<String>, DeskError> {
    let account = state.accounts.get(owner, account_id).await?;
    let count = match form.count.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_GENERATE_COUNT,
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| DeskError::Validation(format!("Invalid count: {raw}")))?,
    };
    let names = state.subdomains.generate(
        &mut rand::rng(),
        &form.main_domain,
        count,
        form.use_prefix,
        form.use_suffix,
    )?;
    info!(account_id, count = names.len(), main_domain = %form.main_domain, "adding generated subdomains");
    let outcome = state.client.add_domains(&account.api_key, &names).await;
    Ok(views::batch_result_page(&account, "Generate", &outcome))
}

/// POST /domains/{account_id}/add-custom
pub async fn add_custom_domain(
    RequireOperator(owner): RequireOperator,
    State(state): State<DeskState>,
    WithRejection(Path(account_id), _): WithRejection<Path<AccountId>, DeskError>,
    WithRejection(Form(form), _): WithRejection<Form<CustomDomainForm>, DeskError>,
) -> Result<Html<String>, DeskError> {
    let account = state.accounts.get(owner, account_id).await?;
    let full = state.subdomains.custom(&form.subdomain_name, &form.main_domain)?;
    info!(account_id, domain = %full, "adding custom subdomain");
    let outcome = state.client.add_domains(&account.api_key, &[full]).await;
    Ok(views::batch_result_page(&account, "Add", &outcome))
}
