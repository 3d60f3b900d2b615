//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Mambu API configuration.
    pub mambu: MambuConfig,
    /// Reconciliation behaviour.
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Mambu API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MambuConfig {
    /// Tenant base URL, e.g. `https://tenant.sandbox.mambu.com/api`.
    pub base_url: String,
    /// API key sent in the `apiKey` header.
    pub api_key: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retry policy for idempotent calls.
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Retry policy for upstream calls.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Upper bound for any single delay.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    200
}

fn default_max_delay_ms() -> u64 {
    5_000
}

/// What to do with a transfer whose counterpart cannot be found.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedLinkPolicy {
    /// Report the link and return the transaction without transfer details.
    #[default]
    Isolate,
    /// Fail the whole request.
    Fail,
}

/// Reconciliation configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ReconciliationConfig {
    /// Return transactions in upstream order instead of grouped by link kind.
    #[serde(default = "default_preserve_order")]
    pub preserve_order: bool,
    /// Handling of unresolved transfer links.
    #[serde(default)]
    pub unresolved_links: UnresolvedLinkPolicy,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            preserve_order: default_preserve_order(),
            unresolved_links: UnresolvedLinkPolicy::default(),
        }
    }
}

fn default_preserve_order() -> bool {
    true
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LOANLINK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("LOANLINK__MAMBU__BASE_URL", Some("https://tenant.mambu.com/api")),
                ("LOANLINK__MAMBU__API_KEY", Some("secret")),
                ("LOANLINK__SERVER__PORT", Some("9090")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.mambu.base_url, "https://tenant.mambu.com/api");
                assert_eq!(config.mambu.api_key, "secret");
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.mambu.timeout_secs, 30);
                assert_eq!(config.mambu.retry, RetryConfig::default());
                assert_eq!(config.reconciliation, ReconciliationConfig::default());
            },
        );
    }

    #[test]
    fn test_reconciliation_overrides() {
        temp_env::with_vars(
            [
                ("LOANLINK__MAMBU__BASE_URL", Some("http://localhost")),
                ("LOANLINK__MAMBU__API_KEY", Some("k")),
                ("LOANLINK__RECONCILIATION__PRESERVE_ORDER", Some("false")),
                ("LOANLINK__RECONCILIATION__UNRESOLVED_LINKS", Some("fail")),
                ("LOANLINK__MAMBU__RETRY__MAX_RETRIES", Some("0")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert!(!config.reconciliation.preserve_order);
                assert_eq!(
                    config.reconciliation.unresolved_links,
                    UnresolvedLinkPolicy::Fail
                );
                assert_eq!(config.mambu.retry.max_retries, 0);
            },
        );
    }

    #[test]
    fn test_missing_mambu_section_fails() {
        temp_env::with_vars(
            [
                ("LOANLINK__MAMBU__BASE_URL", None::<&str>),
                ("LOANLINK__MAMBU__API_KEY", None),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }

    #[test]
    fn test_defaults() {
        let retry = RetryConfig::default();
        assert_eq!(retry.max_retries, 3);
        assert_eq!(retry.initial_delay_ms, 200);
        assert_eq!(retry.max_delay_ms, 5_000);

        let reconciliation = ReconciliationConfig::default();
        assert!(reconciliation.preserve_order);
        assert_eq!(reconciliation.unresolved_links, UnresolvedLinkPolicy::Isolate);
    }
}
