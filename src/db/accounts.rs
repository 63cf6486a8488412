use crate::db::models::{AccountId, OperatorId, ProviderAccount};
use crate::db::sqlite::SqlitePool;
use crate::error::DeskError;
use chrono::Utc;

/// Persistence for provider API-key records. Every query is scoped by owner.
#[derive(Clone)]
pub struct AccountStorage {
    pool: SqlitePool,
}

impl AccountStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        owner: OperatorId,
        display_name: &str,
        api_key: &str,
    ) -> Result<ProviderAccount, DeskError> {
        let display_name = display_name.trim();
        let api_key = api_key.trim();
        if display_name.is_empty() {
            return Err(DeskError::Validation(
                "Account name must not be empty".to_string(),
            ));
        }
        if api_key.is_empty() {
            return Err(DeskError::Validation("API key must not be empty".to_string()));
        }
        // Sent verbatim as an HTTP header value.
        if !api_key.chars().all(|c| c.is_ascii_graphic()) {
            return Err(DeskError::Validation(
                "API key may only contain printable ASCII characters without spaces".to_string(),
            ));
        }

        let created = sqlx::query_as::<_, ProviderAccount>(
            r#"INSERT INTO provider_accounts (operator_id, display_name, api_key, created_at)
               VALUES (?, ?, ?, ?)
               RETURNING id, operator_id, display_name, api_key, created_at"#,
        )
        .bind(owner)
        .bind(display_name)
        .bind(api_key)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;

        match created {
            Ok(account) => Ok(account),
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                Err(DeskError::NotFound("Operator not found".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// All accounts of `owner`, oldest first.
    pub async fn list(&self, owner: OperatorId) -> Result<Vec<ProviderAccount>, DeskError> {
        let rows = sqlx::query_as::<_, ProviderAccount>(
            r#"SELECT id, operator_id, display_name, api_key, created_at
               FROM provider_accounts WHERE operator_id = ?
               ORDER BY created_at, id"#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get(&self, owner: OperatorId, id: AccountId) -> Result<ProviderAccount, DeskError> {
        sqlx::query_as::<_, ProviderAccount>(
            r#"SELECT id, operator_id, display_name, api_key, created_at
               FROM provider_accounts WHERE id = ? AND operator_id = ?"#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DeskError::NotFound("Account not found".to_string()))
    }

    pub async fn delete(&self, owner: OperatorId, id: AccountId) -> Result<(), DeskError> {
        let res = sqlx::query("DELETE FROM provider_accounts WHERE id = ? AND operator_id = ?")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(DeskError::NotFound("Account not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{OperatorStorage, connect};

    async fn storage_with_operator() -> (AccountStorage, OperatorId) {
        let pool = connect("sqlite::memory:").await.expect("in-memory db");
        let op = OperatorStorage::new(pool.clone())
            .insert("admin", "hash")
            .await
            .expect("operator");
        (AccountStorage::new(pool), op.id)
    }

    #[tokio::test]
    async fn create_rejects_blank_fields() {
        let (store, owner) = storage_with_operator().await;
        let err = store.create(owner, "  ", "K").await.unwrap_err();
        assert!(matches!(err, DeskError::Validation(_)));
        let err = store.create(owner, "acct", "").await.unwrap_err();
        assert!(matches!(err, DeskError::Validation(_)));
    }

    #[tokio::test]
    async fn create_rejects_keys_unfit_for_a_header() {
        let (store, owner) = storage_with_operator().await;
        for key in ["a\nb", "a b", "kéy"] {
            let err = store.create(owner, "acct", key).await.unwrap_err();
            assert!(matches!(err, DeskError::Validation(_)), "{key:?}");
        }
        assert!(store.create(owner, "acct", "  Ab3-x_Y  ").await.is_ok());
    }

    #[tokio::test]
    async fn create_requires_existing_operator() {
        let (store, owner) = storage_with_operator().await;
        let err = store.create(owner + 42, "acct", "K").await.unwrap_err();
        assert!(matches!(err, DeskError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_is_ordered_by_creation() {
        let (store, owner) = storage_with_operator().await;
        let first = store.create(owner, "first", "K1").await.expect("create");
        let second = store.create(owner, "second", "K2").await.expect("create");

        let listed = store.list(owner).await.expect("list");
        let ids: Vec<_> = listed.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(listed[1].api_key, "K2");
    }

    #[tokio::test]
    async fn get_and_delete_are_owner_scoped() {
        let (store, owner) = storage_with_operator().await;
        let acct = store.create(owner, "acct1", "K").await.expect("create");

        assert_eq!(store.get(owner, acct.id).await.expect("get").display_name, "acct1");
        assert!(matches!(
            store.get(owner + 1, acct.id).await,
            Err(DeskError::NotFound(_))
        ));
        assert!(matches!(
            store.delete(owner + 1, acct.id).await,
            Err(DeskError::NotFound(_))
        ));

        store.delete(owner, acct.id).await.expect("delete");
        assert!(matches!(
            store.delete(owner, acct.id).await,
            Err(DeskError::NotFound(_))
        ));
        assert!(matches!(
            store.get(owner, acct.id).await,
            Err(DeskError::NotFound(_))
        ));
    }
}
