pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod provider;
pub mod router;
pub mod service;
pub mod views;

pub use error::{DeskError, ProviderError};
pub use router::{DeskState, desk_router};
