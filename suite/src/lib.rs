//! Black-box test workflows for the pet friends REST service.
//!
//! # Overview
//! Each test case under `tests/` follows the same linear script:
//! authenticate, establish a precondition if it needs one, act, then verify
//! the status code and payload. [`Harness`] wires settings, logging and the
//! target; [`Session`] is the authenticated state and carries the fixtures.
//!
//! # Design
//! - The client never treats a status code as a failure; test cases assert
//!   on the `(status, body)` pair.
//! - Without a configured `base_url` every harness starts its own local
//!   emulator, so test cases are independent even when the runner executes
//!   them in parallel. Against a live service run them serially.
//! - A missing precondition is a [`SuiteError`], which fails the test case
//!   as an error rather than letting it pass vacuously.

pub mod assets;
pub mod error;
pub mod harness;
pub mod logging;
pub mod session;
pub mod settings;
pub mod target;

pub use error::SuiteError;
pub use harness::Harness;
pub use session::{OwnedPet, Session};
pub use settings::{Settings, SettingsError};
pub use target::{Emulator, Target};
