//! Blocking pet friends client: builds a request, executes it, normalizes
//! the answer.

use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::client::PetFriendsClient;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::response::ApiResponse;
use crate::transport::{Transport, UreqTransport};
use crate::types::{PetFilter, PetForm, Photo};

/// One method per service operation, each returning `(status, body)` as an
/// [`ApiResponse`].
#[derive(Debug, Clone)]
pub struct PetFriends<T = UreqTransport> {
    client: PetFriendsClient,
    transport: T,
}

impl PetFriends<UreqTransport> {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Self {
        Self::with_transport(base_url, UreqTransport::new(timeout))
    }
}

impl<T: Transport> PetFriends<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            client: PetFriendsClient::new(base_url),
            transport,
        }
    }

    pub fn client(&self) -> &PetFriendsClient {
        &self.client
    }

    pub fn get_api_key(&self, email: &str, password: &str) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_get_api_key(email, password))
    }

    pub fn list_pets(&self, auth_key: &str, filter: impl Into<PetFilter>) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_list_pets(auth_key, &filter.into()))
    }

    /// Create a pet with a photo read from `photo_path`.
    pub fn add_pet(&self, auth_key: &str, form: &PetForm, photo_path: &Path) -> Result<ApiResponse, ApiError> {
        let photo = Photo::from_path(photo_path)?;
        self.send(self.client.build_add_pet(auth_key, form, &photo))
    }

    pub fn add_pet_without_photo(&self, auth_key: &str, form: &PetForm) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_add_pet_without_photo(auth_key, form))
    }

    /// Attach or replace the photo of a pet the caller owns.
    pub fn add_photo_of_pet(&self, auth_key: &str, pet_id: &str, photo_path: &Path) -> Result<ApiResponse, ApiError> {
        let photo = Photo::from_path(photo_path)?;
        self.send(self.client.build_add_photo_of_pet(auth_key, pet_id, &photo))
    }

    pub fn update_pet_info(&self, auth_key: &str, pet_id: &str, form: &PetForm) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_update_pet_info(auth_key, pet_id, form))
    }

    pub fn delete_pet(&self, auth_key: &str, pet_id: &str) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_delete_pet(auth_key, pet_id))
    }

    fn send(&self, request: HttpRequest) -> Result<ApiResponse, ApiError> {
        let method = request.method.as_str();
        let url = request.url.clone();
        debug!(method, url = %url, "sending request");
        let response = self.transport.execute(request)?;
        debug!(method, url = %url, status = response.status, "received response");
        Ok(self.client.parse_response(response))
    }
}
