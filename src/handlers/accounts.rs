use axum::{
    Form,
    extract::{Path, State},
    response::{Html, Redirect},
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use tracing::info;

use crate::db::models::AccountId;
use crate::error::DeskError;
use crate::middleware::RequireOperator;
use crate::router::DeskState;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct AccountForm {
    pub name: String,
    pub api_key: String,
}

pub async fn dashboard(
    RequireOperator(owner): RequireOperator,
    State(state): State<DeskState>,
) -> Result<Html<String>, DeskError> {
    let accounts = state.accounts.list(owner).await?;
    Ok(views::dashboard_page(&accounts))
}

pub async fn list_accounts(
    RequireOperator(owner): RequireOperator,
    State(state): State<DeskState>,
) -> Result<Html<String>, DeskError> {
    let accounts = state.accounts.list(owner).await?;
    Ok(views::accounts_page(&accounts))
}

/// POST /accounts -> stores a new provider account for the operator.
pub async fn create_account(
    RequireOperator(owner): RequireOperator,
    State(state): State<DeskState>,
    WithRejection(Form(form), _): WithRejection<Form<AccountForm>, DeskError>,
) -> Result<Redirect, DeskError> {
    let account = state.accounts.create(owner, &form.name, &form.api_key).await?;
    info!(account_id = account.id, name = %account.display_name, "provider account created");
    Ok(Redirect::to("/accounts"))
}

/// GET /accounts/{id}/delete
pub async fn delete_account(
    RequireOperator(owner): RequireOperator,
    State(state): State<DeskState>,
    WithRejection(Path(id), _): WithRejection<Path<AccountId>, DeskError>,
) -> Result<Redirect, DeskError> {
    state.accounts.delete(owner, id).await?;
    info!(account_id = id, "provider account deleted");
    Ok(Redirect::to("/accounts"))
}
