use std::time::Duration;

use petfriends_core::PetFriends;
use tracing::info;

use crate::error::SuiteError;
use crate::logging;
use crate::session::Session;
use crate::settings::Settings;
use crate::target::Target;

/// Per-test-case entry point: settings, logging, target and client.
///
/// Every test case builds its own harness, so no in-process state is shared
/// between cases. With a local target each harness owns a fresh emulator.
#[derive(Debug)]
pub struct Harness {
    settings: Settings,
    api: PetFriends,
    target: Target,
}

impl Harness {
    /// Build a harness from [`Settings::load`].
    ///
    /// # Errors
    /// Fails on invalid settings or if the local emulator cannot start.
    pub fn start() -> Result<Self, SuiteError> {
        Self::with_settings(Settings::load()?)
    }

    /// # Errors
    /// Fails if the local emulator cannot start.
    pub fn with_settings(settings: Settings) -> Result<Self, SuiteError> {
        logging::init(&settings.log_level);
        let target = Target::select(&settings)?;
        let api = PetFriends::new(target.base_url(), Some(Duration::from_secs(settings.timeout_secs)));
        info!(base_url = target.base_url(), local = target.is_local(), "harness ready");
        Ok(Self {
            settings,
            api,
            target,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn api(&self) -> &PetFriends {
        &self.api
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Authenticate with the valid fixtures.
    ///
    /// # Errors
    /// [`SuiteError::Authentication`] if no key is issued.
    pub fn session(&self) -> Result<Session<'_>, SuiteError> {
        Session::authenticate(&self.api, &self.settings.valid_email, &self.settings.valid_password)
    }
}
