//! Database module: models, schema and storage for operators and provider accounts.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database
//! - `sqlite.rs`: pool construction and schema bootstrap
//! - `operators.rs` / `accounts.rs`: the two stores

pub mod accounts;
pub mod models;
pub mod operators;
pub mod schema;
pub mod sqlite;

pub use accounts::AccountStorage;
pub use models::{Operator, ProviderAccount};
pub use operators::OperatorStorage;
pub use schema::SQLITE_INIT;
pub use sqlite::{SqlitePool, connect, init_schema};
