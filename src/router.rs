use axum::{
    Json, Router,
    extract::FromRef,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use serde_json::json;
use sha2::{Digest, Sha512};
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::error;

use crate::auth::{AuthGuard, SessionSigner};
use crate::config::Config;
use crate::db::{AccountStorage, OperatorStorage, SqlitePool};
use crate::handlers::{accounts, auth, domains};
use crate::provider::{DomainProvider, ProviderClient};
use crate::service::SubdomainGenerator;
use crate::views;

const COOKIE_KEY_CONTEXT: &[u8] = b"dnsdesk-cookie-key:";

#[derive(Clone)]
pub struct DeskState {
    pub guard: AuthGuard,
    pub accounts: AccountStorage,
    pub client: ProviderClient,
    pub subdomains: SubdomainGenerator,
    pub cookie_key: Key,
    pub insecure_cookie: bool,
}

impl DeskState {
    pub fn new(pool: SqlitePool, provider: Arc<dyn DomainProvider>, cfg: &Config) -> Self {
        let signer = SessionSigner::new(&cfg.secret_key, cfg.token_ttl());
        let digest = Sha512::new()
            .chain_update(COOKIE_KEY_CONTEXT)
            .chain_update(cfg.secret_key.as_bytes())
            .finalize();
        Self {
            guard: AuthGuard::new(OperatorStorage::new(pool.clone()), signer),
            accounts: AccountStorage::new(pool),
            client: ProviderClient::new(provider, cfg.batch_concurrency),
            subdomains: SubdomainGenerator,
            cookie_key: Key::from(digest.as_slice()),
            insecure_cookie: cfg.insecure_cookie,
        }
    }
}

impl FromRef<DeskState> for Key {
    fn from_ref(state: &DeskState) -> Self {
        state.cookie_key.clone()
    }
}

pub fn desk_router(state: DeskState) -> Router {
    with_boundary(desk_routes()).with_state(state)
}

/// Every route of the application, without state or layers.
pub fn desk_routes() -> Router<DeskState> {
    Router::new()
        .route("/", get(auth::index))
        .route("/login", post(auth::login))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(accounts::dashboard))
        .route(
            "/accounts",
            get(accounts::list_accounts).post(accounts::create_account),
        )
        .route("/accounts/{id}/delete", get(accounts::delete_account))
        .route("/domains/{account_id}", get(domains::list_domains))
        .route("/domains/{account_id}/add", post(domains::add_domains))
        .route("/domains/{account_id}/delete", post(domains::delete_domains))
        .route("/domains/{account_id}/generate", post(domains::generate_domains))
        .route("/domains/{account_id}/add-custom", post(domains::add_custom_domain))
        .route("/healthz", get(health_check))
}

/// Request tracing, and a generic 500 page in place of a handler panic.
pub fn with_boundary<S>(routes: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    routes
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> impl IntoResponse {
    Json(json!({"ok":"healthy"}))
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        views::error_page(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An internal server error occurred.",
        ),
    )
        .into_response()
}
