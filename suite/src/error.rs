use petfriends_core::ApiError;

use crate::settings::SettingsError;

/// Everything that turns a test case into an error rather than a plain
/// assertion failure.
#[derive(Debug, thiserror::Error)]
pub enum SuiteError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("API call failed: {0}")]
    Api(#[from] ApiError),

    /// The valid fixtures did not yield an API key.
    #[error("authentication with the valid fixtures failed (HTTP {status})")]
    Authentication { status: u16 },

    /// A workflow needed remote state that does not exist and could not be
    /// created.
    #[error("precondition unmet: {0}")]
    PreconditionUnmet(String),

    #[error("cannot start the local emulator: {0}")]
    Emulator(#[source] std::io::Error),
}
