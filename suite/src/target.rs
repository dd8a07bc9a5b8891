//! Where the suite sends its requests: a live service or a local emulator.

use std::net::TcpListener as StdTcpListener;

use petfriends_mock::Account;
use tokio::sync::oneshot;
use tracing::{error, info};

use crate::error::SuiteError;
use crate::settings::Settings;

/// An emulator serving on an ephemeral localhost port from its own thread.
///
/// Dropping the handle signals a graceful shutdown.
#[derive(Debug)]
pub struct Emulator {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Emulator {
    /// # Errors
    /// Returns [`SuiteError::Emulator`] if the port cannot be bound or the
    /// runtime cannot be built.
    pub fn start(accounts: Vec<Account>) -> Result<Self, SuiteError> {
        let std_listener = StdTcpListener::bind("127.0.0.1:0").map_err(SuiteError::Emulator)?;
        let addr = std_listener.local_addr().map_err(SuiteError::Emulator)?;
        std_listener.set_nonblocking(true).map_err(SuiteError::Emulator)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(SuiteError::Emulator)?;
        let (shutdown, signal) = oneshot::channel::<()>();

        std::thread::Builder::new()
            .name(format!("petfriends-emulator-{}", addr.port()))
            .spawn(move || {
                runtime.block_on(async move {
                    let listener = match tokio::net::TcpListener::from_std(std_listener) {
                        Ok(listener) => listener,
                        Err(e) => {
                            error!(error = %e, "emulator listener rejected");
                            return;
                        }
                    };
                    let stop = async move {
                        let _ = signal.await;
                    };
                    if let Err(e) = petfriends_mock::run_until(listener, &accounts, stop).await {
                        error!(error = %e, "emulator stopped with an error");
                    }
                });
            })
            .map_err(SuiteError::Emulator)?;

        let base_url = format!("http://{addr}");
        info!(%base_url, "local emulator started");
        Ok(Self {
            base_url,
            shutdown: Some(shutdown),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Drop for Emulator {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

#[derive(Debug)]
pub enum Target {
    Live { base_url: String },
    Local(Emulator),
}

impl Target {
    /// A configured `base_url` selects the live service; otherwise a local
    /// emulator is started and seeded with the valid fixture account.
    ///
    /// # Errors
    /// Returns an error if the local emulator cannot start.
    pub fn select(settings: &Settings) -> Result<Self, SuiteError> {
        match &settings.base_url {
            Some(base_url) => {
                info!(%base_url, "targeting live service");
                Ok(Target::Live {
                    base_url: base_url.clone(),
                })
            }
            None => {
                let account = Account::new(&settings.valid_email, &settings.valid_password);
                Ok(Target::Local(Emulator::start(vec![account])?))
            }
        }
    }

    pub fn base_url(&self) -> &str {
        match self {
            Target::Live { base_url } => base_url,
            Target::Local(emulator) => emulator.base_url(),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Target::Local(_))
    }
}
