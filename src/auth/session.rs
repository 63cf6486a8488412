//! Self-describing, time-boxed session tokens.
//!
//! A token is `base64url(claims JSON) "." base64url(HMAC-SHA256(claims segment))`.
//! Nothing is kept server side: validity is the signature plus the `exp` claim.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512, digest::Output};
use subtle::ConstantTimeEq;

use crate::db::models::{Operator, OperatorId};
use crate::error::DeskError;

type HmacSha256 = Hmac<Sha256>;

const SESSION_KEY_CONTEXT: &[u8] = b"dnsdesk-session-token:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: OperatorId,
    pub usr: String,
    pub iat: i64,
    pub exp: i64,
}

/// Opaque bearer credential handed to the operator after login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(pub String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone)]
pub struct SessionSigner {
    key: Output<Sha512>,
    ttl: Duration,
}

impl SessionSigner {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let key = Sha512::new()
            .chain_update(SESSION_KEY_CONTEXT)
            .chain_update(secret.as_bytes())
            .finalize();
        Self { key, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, operator: &Operator) -> Result<SessionToken, DeskError> {
        self.issue_at(operator, Utc::now())
    }

    pub fn issue_at(
        &self,
        operator: &Operator,
        now: DateTime<Utc>,
    ) -> Result<SessionToken, DeskError> {
        let claims = SessionClaims {
            sub: operator.id,
            usr: operator.username.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let payload = serde_json::to_vec(&claims)?;
        let payload_b64 = URL_SAFE_NO_PAD.encode(payload);
        let tag_b64 = URL_SAFE_NO_PAD.encode(self.tag(payload_b64.as_bytes()));
        Ok(SessionToken(format!("{payload_b64}.{tag_b64}")))
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, DeskError> {
        self.verify_at(token, Utc::now())
    }

    /// Check signature and expiry. Every failure is `Unauthorized`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, DeskError> {
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        let (payload_b64, tag_b64) = token
            .split_once('.')
            .ok_or_else(|| invalid("malformed session token"))?;

        let presented = URL_SAFE_NO_PAD
            .decode(tag_b64)
            .map_err(|_| invalid("malformed session signature"))?;
        let expected = self.tag(payload_b64.as_bytes());
        if !bool::from(presented.as_slice().ct_eq(expected.as_slice())) {
            return Err(invalid("session signature mismatch"));
        }

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| invalid("malformed session payload"))?;
        let claims: SessionClaims =
            serde_json::from_slice(&payload).map_err(|_| invalid("malformed session claims"))?;

        if now.timestamp() >= claims.exp {
            return Err(invalid("session expired"));
        }
        Ok(claims)
    }

    fn tag(&self, data: &[u8]) -> Vec<u8> {
        let mut mac = <HmacSha256 as Mac>::new(&self.key);
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }
}

fn invalid(reason: &str) -> DeskError {
    DeskError::Unauthorized(reason.to_string())
}
