use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

pub type OperatorId = i64;
pub type AccountId = i64;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Operator {
    pub id: OperatorId,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A stored API key for one account at the DNS provider.
#[derive(Clone, PartialEq, Serialize, FromRow)]
pub struct ProviderAccount {
    pub id: AccountId,
    pub operator_id: OperatorId,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for ProviderAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderAccount")
            .field("id", &self.id)
            .field("operator_id", &self.operator_id)
            .field("display_name", &self.display_name)
            .field("api_key", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}
