use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Credential fixtures and target selection for the suite.
///
/// Configuration is loaded in priority order (lowest to highest):
/// 1. Struct defaults
/// 2. petfriends.yaml (if exists)
/// 3. Environment variables with `PETFRIENDS_` prefix (always wins)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Base URL of a live service. When unset the suite starts a local
    /// emulator per test case, seeded with the valid fixture account.
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_valid_email")]
    pub valid_email: String,

    #[serde(default = "default_valid_password")]
    pub valid_password: String,

    #[serde(default = "default_invalid_email")]
    pub invalid_email: String,

    #[serde(default = "default_invalid_password")]
    pub invalid_password: String,

    /// Per-call timeout handed to the HTTP layer.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log level filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_valid_email() -> String {
    petfriends_mock::config::DEFAULT_EMAIL.to_string()
}

fn default_valid_password() -> String {
    petfriends_mock::config::DEFAULT_PASSWORD.to_string()
}

fn default_invalid_email() -> String {
    "nobody@petfriends.test".to_string()
}

fn default_invalid_password() -> String {
    "not-the-password".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: None,
            valid_email: default_valid_email(),
            valid_password: default_valid_password(),
            invalid_email: default_invalid_email(),
            invalid_password: default_invalid_password(),
            timeout_secs: default_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<figment::Error> for SettingsError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl Settings {
    /// Load settings from all sources.
    ///
    /// # Errors
    /// Returns an error if the sources cannot be merged or the result is invalid.
    pub fn load() -> Result<Self, SettingsError> {
        Self::from_figment(
            Figment::new()
                .merge(Serialized::defaults(Self::default()))
                .merge(Yaml::file("petfriends.yaml"))
                .merge(Env::prefixed("PETFRIENDS_")),
        )
    }

    /// Extract and validate settings from an already assembled figment.
    ///
    /// # Errors
    /// Returns an error if extraction or validation fails.
    pub fn from_figment(figment: Figment) -> Result<Self, SettingsError> {
        let mut settings: Self = figment.extract()?;
        // An empty PETFRIENDS_BASE_URL means "no live service".
        if settings.base_url.as_deref().is_some_and(|u| u.trim().is_empty()) {
            settings.base_url = None;
        }
        settings.validate()?;
        Ok(settings)
    }

    /// # Errors
    /// Returns an error if any fixture is empty or the invalid fixtures
    /// coincide with the valid ones.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let required = [
            ("valid_email", &self.valid_email),
            ("valid_password", &self.valid_password),
            ("invalid_email", &self.invalid_email),
            ("invalid_password", &self.invalid_password),
        ];
        for (name, value) in required {
            if value.is_empty() {
                return Err(SettingsError::Validation(format!(
                    "{name} is required. Set PETFRIENDS_{} or configure it in petfriends.yaml.",
                    name.to_uppercase()
                )));
            }
        }
        if self.invalid_email == self.valid_email {
            return Err(SettingsError::Validation(
                "invalid_email must differ from valid_email".into(),
            ));
        }
        if self.invalid_password == self.valid_password {
            return Err(SettingsError::Validation(
                "invalid_password must differ from valid_password".into(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(SettingsError::Validation("timeout_secs cannot be 0".into()));
        }
        Ok(())
    }
}
