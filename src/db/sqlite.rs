use crate::db::schema::SQLITE_INIT;
use crate::error::DeskError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::info;

pub type SqlitePool = Pool<Sqlite>;

/// Open (creating if missing) the database and bootstrap the schema.
pub async fn connect(database_url: &str) -> Result<SqlitePool, DeskError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let mut pool_opts = SqlitePoolOptions::new().max_connections(5);
    if database_url.contains(":memory:") {
        // An in-memory database lives and dies with its only connection.
        pool_opts = pool_opts
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }
    let pool = pool_opts.connect_with(connect_opts).await?;
    init_schema(&pool).await?;
    info!(database_url = %database_url, "database ready");
    Ok(pool)
}

/// Execute the bundled DDL one statement at a time.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), DeskError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
