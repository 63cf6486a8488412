pub mod auth;

pub use auth::{RequireOperator, authenticate};
