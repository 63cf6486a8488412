use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

use crate::error::DeskError;

/// Placeholder shipped in defaults so a bare checkout still boots.
pub const DEFAULT_SECRET_KEY: &str = "change-this-secret-key-in-production";
pub static DYNU_API_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse("https://api.dynu.com/v2").expect("invalid Dynu API base URL"));

const MIN_SECRET_LEN: usize = 16;

/// Runtime configuration.
///
/// Layered as: built-in defaults, then an optional `config.toml`, then
/// `DNSDESK_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub secret_key: String,
    pub token_ttl_minutes: i64,
    pub provider_base_url: Url,
    pub http_timeout_secs: u64,
    pub http_connect_timeout_secs: u64,
    pub batch_concurrency: usize,
    pub insecure_cookie: bool,
    pub proxy: Option<Url>,
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8003)),
            database_url: "sqlite://dnsdesk.db".to_string(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            token_ttl_minutes: 30,
            provider_base_url: DYNU_API_BASE.clone(),
            http_timeout_secs: 15,
            http_connect_timeout_secs: 5,
            batch_concurrency: 4,
            insecure_cookie: false,
            proxy: None,
            loglevel: "info".to_string(),
        }
    }
}

impl Config {
    /// Load from `config.toml` (if present) and the environment.
    pub fn load() -> Result<Self, DeskError> {
        Self::load_from("config.toml")
    }

    pub fn load_from(toml_path: impl AsRef<Path>) -> Result<Self, DeskError> {
        let cfg: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(toml_path.as_ref()))
            .merge(Env::prefixed("DNSDESK_"))
            .extract()
            .map_err(Box::new)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), DeskError> {
        if self.secret_key.trim().len() < MIN_SECRET_LEN {
            return Err(DeskError::Validation(format!(
                "secret_key must be at least {MIN_SECRET_LEN} characters"
            )));
        }
        if self.token_ttl_minutes <= 0 {
            return Err(DeskError::Validation(
                "token_ttl_minutes must be positive".to_string(),
            ));
        }
        if self.http_timeout_secs == 0 || self.http_connect_timeout_secs == 0 {
            return Err(DeskError::Validation(
                "HTTP timeouts must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.token_ttl_minutes)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn http_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.http_connect_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.uses_default_secret());
        assert_eq!(cfg.token_ttl(), chrono::Duration::minutes(30));
        assert_eq!(cfg.provider_base_url.as_str(), "https://api.dynu.com/v2");
    }

    #[test]
    fn short_secret_is_rejected() {
        let cfg = Config {
            secret_key: "short".to_string(),
            ..Config::default()
        };
        assert!(matches!(cfg.validate(), Err(DeskError::Validation(_))));
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        let cfg = Config {
            http_timeout_secs: 0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn toml_layer_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("dnsdesk-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            "token_ttl_minutes = 5\nbatch_concurrency = 8\nsecret_key = \"0123456789abcdef-xyz\"\n",
        )
        .expect("write config");

        let cfg = Config::load_from(&path).expect("config loads");
        assert_eq!(cfg.token_ttl_minutes, 5);
        assert_eq!(cfg.batch_concurrency, 8);
        assert!(!cfg.uses_default_secret());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
