use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Account the emulator seeds when none is configured.
pub const DEFAULT_EMAIL: &str = "tester@petfriends.test";
pub const DEFAULT_PASSWORD: &str = "petfriends-secret";

/// Emulator configuration loaded from multiple sources.
///
/// Configuration is loaded in priority order (lowest to highest):
/// 1. Struct defaults
/// 2. petfriends-mock.yaml (if exists)
/// 3. Environment variables with `PETFRIENDS_MOCK_` prefix
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MockConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port. 0 picks an ephemeral port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Accounts that can obtain an API key.
    #[serde(default = "default_accounts")]
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Account {
    pub email: String,
    pub password: String,
}

impl Account {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_accounts() -> Vec<Account> {
    vec![Account::new(DEFAULT_EMAIL, DEFAULT_PASSWORD)]
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            accounts: default_accounts(),
        }
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl MockConfig {
    /// Load configuration from defaults, `petfriends-mock.yaml` and the
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(
            Figment::new()
                .merge(Serialized::defaults(Self::default()))
                .merge(Yaml::file("petfriends-mock.yaml"))
                .merge(Env::prefixed("PETFRIENDS_MOCK_").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.accounts.is_empty() {
            return Err(ConfigError::Validation("at least one account is required".into()));
        }
        for (i, account) in self.accounts.iter().enumerate() {
            if account.email.is_empty() || account.password.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "accounts[{i}] needs both email and password"
                )));
            }
            if self.accounts[..i].iter().any(|a| a.email == account.email) {
                return Err(ConfigError::Validation(format!(
                    "duplicate account email '{}'",
                    account.email
                )));
            }
        }
        Ok(())
    }
}
