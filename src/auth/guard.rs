use tracing::{info, warn};

use crate::auth::password::{UNKNOWN_USER_HASH, hash_password, verify_password};
use crate::auth::session::{SessionSigner, SessionToken};
use crate::db::OperatorStorage;
use crate::db::models::{Operator, OperatorId};
use crate::error::DeskError;

const BAD_CREDENTIALS: &str = "Invalid username or password";

/// Registration, login and token verification for the single operator.
#[derive(Clone)]
pub struct AuthGuard {
    operators: OperatorStorage,
    signer: SessionSigner,
}

impl AuthGuard {
    pub fn new(operators: OperatorStorage, signer: SessionSigner) -> Self {
        Self { operators, signer }
    }

    pub fn signer(&self) -> &SessionSigner {
        &self.signer
    }

    /// Whether the one-time registration has already happened.
    pub async fn is_registered(&self) -> Result<bool, DeskError> {
        self.operators.exists().await
    }

    /// Create the operator. Only the first call ever succeeds.
    pub async fn register(&self, username: &str, password: &str) -> Result<Operator, DeskError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(DeskError::Validation(
                "Username and password are required".to_string(),
            ));
        }
        if self.operators.exists().await? {
            warn!(username = %username, "registration refused: operator already exists");
            return Err(DeskError::Conflict(
                "An operator is already registered".to_string(),
            ));
        }
        let hash = hash_password(password)?;
        let operator = self.operators.insert(username, &hash).await?;
        info!(operator_id = operator.id, username = %operator.username, "operator registered");
        Ok(operator)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<SessionToken, DeskError> {
        let Some(operator) = self.operators.find_by_username(username.trim()).await? else {
            let _ = verify_password(password, UNKNOWN_USER_HASH);
            warn!(username = %username, "login failed: unknown user");
            return Err(DeskError::Unauthorized(BAD_CREDENTIALS.to_string()));
        };
        if !verify_password(password, &operator.password_hash) {
            warn!(username = %username, "login failed: wrong password");
            return Err(DeskError::Unauthorized(BAD_CREDENTIALS.to_string()));
        }
        info!(operator_id = operator.id, "operator logged in");
        self.signer.issue(&operator)
    }

    /// Resolve a session token to the operator it was issued for.
    pub async fn verify(&self, token: &str) -> Result<OperatorId, DeskError> {
        let claims = self.signer.verify(token)?;
        match self.operators.find_by_id(claims.sub).await? {
            Some(op) if op.username == claims.usr => Ok(op.id),
            _ => Err(DeskError::Unauthorized("operator not found".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect;
    use chrono::{Duration, Utc};

    async fn guard() -> AuthGuard {
        let pool = connect("sqlite::memory:").await.expect("in-memory db");
        AuthGuard::new(
            OperatorStorage::new(pool),
            SessionSigner::new("guard-test-secret-0123456789", Duration::minutes(30)),
        )
    }

    #[tokio::test]
    async fn registration_succeeds_exactly_once() {
        let guard = guard().await;
        assert!(!guard.is_registered().await.expect("query"));
        guard.register("admin", "pw123").await.expect("first registration");
        assert!(guard.is_registered().await.expect("query"));

        for name in ["admin", "other"] {
            let err = guard.register(name, "pw").await.unwrap_err();
            assert!(matches!(err, DeskError::Conflict(_)), "{name}: {err:?}");
        }
    }

    #[tokio::test]
    async fn blank_registration_is_invalid() {
        let guard = guard().await;
        assert!(matches!(
            guard.register("   ", "pw").await,
            Err(DeskError::Validation(_))
        ));
        assert!(matches!(
            guard.register("admin", "").await,
            Err(DeskError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn login_issues_verifiable_token() {
        let guard = guard().await;
        let op = guard.register("admin", "pw123").await.expect("register");

        let token = guard.login("admin", "pw123").await.expect("login");
        assert_eq!(guard.verify(token.as_str()).await.expect("verify"), op.id);
    }

    #[tokio::test]
    async fn wrong_credentials_are_unauthorized() {
        let guard = guard().await;
        guard.register("admin", "pw123").await.expect("register");

        assert!(matches!(
            guard.login("admin", "nope").await,
            Err(DeskError::Unauthorized(_))
        ));
        assert!(matches!(
            guard.login("ghost", "pw123").await,
            Err(DeskError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn expired_token_fails_verification() {
        let guard = guard().await;
        let op = guard.register("admin", "pw123").await.expect("register");
        let stale = guard
            .signer()
            .issue_at(&op, Utc::now() - Duration::minutes(31))
            .expect("issue");
        assert!(matches!(
            guard.verify(stale.as_str()).await,
            Err(DeskError::Unauthorized(_))
        ));
    }
}
