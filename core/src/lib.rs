//! Synchronous API client for the pet friends service.
//!
//! # Overview
//! Two layers. `PetFriendsClient` builds `HttpRequest` values and parses
//! `HttpResponse` values without touching the network (host-does-IO
//! pattern). `PetFriends` pairs it with a [`Transport`] (by default a
//! blocking `ureq` agent) and exposes one method per service operation.
//!
//! # Design
//! - Every operation returns an [`ApiResponse`]: the status code and the
//!   body, parsed as JSON when possible. A 403 or 400 is an answer, not an
//!   error; callers assert on it.
//! - [`ApiError`] covers in-process faults only (transport, unreadable
//!   photo, decoding a body the caller asked to decode).
//! - DTOs are defined independently from the emulator crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod encoding;
pub mod error;
pub mod http;
pub mod response;
pub mod transport;
pub mod types;

pub use api::PetFriends;
pub use client::PetFriendsClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use response::{ApiResponse, ResponseBody};
pub use transport::{Transport, UreqTransport};
pub use types::{ApiKey, Pet, PetFilter, PetForm, PetList, Photo};
