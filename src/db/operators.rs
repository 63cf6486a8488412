use crate::db::models::{Operator, OperatorId};
use crate::db::sqlite::SqlitePool;
use crate::error::DeskError;
use chrono::Utc;

const ALREADY_REGISTERED: &str = "An operator is already registered";

/// Persistence for the single operator identity.
#[derive(Clone)]
pub struct OperatorStorage {
    pool: SqlitePool,
}

impl OperatorStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert the operator row. Fails with `Conflict` when any operator exists.
    ///
    /// `BEGIN IMMEDIATE` takes the write lock before the count check, so
    /// concurrent registrations run one after another. The `singleton` column
    /// still rejects a second row at the storage level.
    pub async fn insert(&self, username: &str, password_hash: &str) -> Result<Operator, DeskError> {
        match self.insert_serialized(username, password_hash).await {
            Err(DeskError::Database(e)) if is_busy(&e) && self.exists().await? => {
                Err(DeskError::Conflict(ALREADY_REGISTERED.to_string()))
            }
            res => res,
        }
    }

    async fn insert_serialized(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Operator, DeskError> {
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM operators")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            return Err(DeskError::Conflict(ALREADY_REGISTERED.to_string()));
        }

        let inserted = sqlx::query_as::<_, Operator>(
            r#"INSERT INTO operators (username, password_hash, created_at)
               VALUES (?, ?, ?)
               RETURNING id, username, password_hash, created_at"#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await;

        let operator = match inserted {
            Ok(op) => op,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(DeskError::Conflict(ALREADY_REGISTERED.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        tx.commit().await?;
        Ok(operator)
    }

    pub async fn exists(&self) -> Result<bool, DeskError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM operators")
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Operator>, DeskError> {
        let op = sqlx::query_as::<_, Operator>(
            "SELECT id, username, password_hash, created_at FROM operators WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(op)
    }

    pub async fn find_by_id(&self, id: OperatorId) -> Result<Option<Operator>, DeskError> {
        let op = sqlx::query_as::<_, Operator>(
            "SELECT id, username, password_hash, created_at FROM operators WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(op)
    }
}

/// SQLITE_BUSY (5) or SQLITE_LOCKED (6), including extended codes.
fn is_busy(err: &sqlx::Error) -> bool {
    let sqlx::Error::Database(db_err) = err else {
        return false;
    };
    db_err
        .code()
        .and_then(|c| c.parse::<i32>().ok())
        .is_some_and(|code| matches!(code & 0xff, 5 | 6))
}
