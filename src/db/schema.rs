//! SQL DDL for the operator and provider account tables.

/// SQLite schema with:
/// - `operators.singleton` pinned to 1 and UNIQUE, so the table can never hold a second row
/// - `operators.username` UNIQUE
/// - `provider_accounts.operator_id` referencing `operators(id)` with cascading delete
/// - timestamps stored as RFC3339 TEXT
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS operators (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL,
    singleton INTEGER NOT NULL DEFAULT 1 UNIQUE CHECK (singleton = 1)
);

CREATE TABLE IF NOT EXISTS provider_accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    operator_id INTEGER NOT NULL REFERENCES operators(id) ON DELETE CASCADE,
    display_name TEXT NOT NULL,
    api_key TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_provider_accounts_operator_id ON provider_accounts(operator_id);
"#;
