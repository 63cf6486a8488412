use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{WithRejection, cookie::PrivateCookieJar};
use serde::Deserialize;
use tracing::info;

use crate::error::DeskError;
use crate::middleware::auth::{RequireOperator, authenticate, clear_session_cookie, session_cookie};
use crate::router::DeskState;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

/// GET / -> login form, or straight to the dashboard with a live session.
pub async fn index(State(state): State<DeskState>, headers: HeaderMap) -> Response {
    if authenticate(&headers, &state).await.is_ok() {
        return Redirect::to("/dashboard").into_response();
    }
    views::login_page(None).into_response()
}

/// POST /login -> sets the session cookie on success, re-renders the form otherwise.
pub async fn login(
    State(state): State<DeskState>,
    jar: PrivateCookieJar,
    WithRejection(Form(form), _): WithRejection<Form<CredentialsForm>, DeskError>,
) -> Result<Response, DeskError> {
    match state.guard.login(&form.username, &form.password).await {
        Ok(token) => {
            let cookie = session_cookie(&token, state.guard.signer().ttl(), state.insecure_cookie);
            Ok((jar.add(cookie), Redirect::to("/dashboard")).into_response())
        }
        Err(DeskError::Unauthorized(msg) | DeskError::Validation(msg)) => {
            Ok((StatusCode::UNAUTHORIZED, views::login_page(Some(&msg))).into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn register_form(State(state): State<DeskState>) -> Result<Response, DeskError> {
    let registered = state.guard.is_registered().await?;
    Ok(views::register_page(None, registered).into_response())
}

/// POST /register -> creates the one operator account.
pub async fn register(
    State(state): State<DeskState>,
    WithRejection(Form(form), _): WithRejection<Form<CredentialsForm>, DeskError>,
) -> Result<Response, DeskError> {
    match state.guard.register(&form.username, &form.password).await {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(DeskError::Validation(msg)) => Ok((
            StatusCode::BAD_REQUEST,
            views::register_page(Some(&msg), false),
        )
            .into_response()),
        Err(DeskError::Conflict(msg)) => Ok((
            StatusCode::CONFLICT,
            views::register_page(Some(&msg), true),
        )
            .into_response()),
        Err(e) => Err(e),
    }
}

/// GET /logout -> drops the session cookie.
pub async fn logout(RequireOperator(operator_id): RequireOperator, jar: PrivateCookieJar) -> Response {
    info!(operator_id, "operator logged out");
    (jar.remove(clear_session_cookie()), Redirect::to("/")).into_response()
}
