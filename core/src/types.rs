//! Domain DTOs for the pet friends API.
//!
//! # Design
//! These types mirror the emulator's schema but are defined independently;
//! the integration tests catch any drift between the two crates. Fields the
//! service may omit default to empty strings so a listing never fails to
//! decode because one record is sparse.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ApiError;

/// Response of `GET /api/key`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKey {
    pub key: String,
}

/// A single pet record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    /// The service echoes age back as a string; numbers are accepted too.
    #[serde(deserialize_with = "string_or_number")]
    pub age: String,
    #[serde(default)]
    pub pet_photo: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub created_at: String,
}

/// Response of `GET /api/pets`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PetList {
    pub pets: Vec<Pet>,
}

/// Fields submitted when creating or updating a pet.
///
/// `None` fields are left out of the request entirely, which is how a
/// missing (null) field is sent to the service. `age` is signed so that
/// out-of-range values can be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animal_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
}

impl PetForm {
    /// A form with every field present.
    pub fn new(name: &str, animal_type: &str, age: i64) -> Self {
        Self {
            name: Some(name.to_string()),
            animal_type: Some(animal_type.to_string()),
            age: Some(age),
        }
    }

    /// Present fields as `(name, value)` pairs in wire order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::with_capacity(3);
        if let Some(name) = &self.name {
            fields.push(("name", name.clone()));
        }
        if let Some(animal_type) = &self.animal_type {
            fields.push(("animal_type", animal_type.clone()));
        }
        if let Some(age) = self.age {
            fields.push(("age", age.to_string()));
        }
        fields
    }
}

/// Listing scope for `GET /api/pets`.
///
/// The service does not validate the value, so anything outside the two
/// known scopes is carried verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PetFilter {
    All,
    MyPets,
    Other(String),
}

impl PetFilter {
    pub fn as_str(&self) -> &str {
        match self {
            PetFilter::All => "",
            PetFilter::MyPets => "my_pets",
            PetFilter::Other(value) => value,
        }
    }
}

impl From<&str> for PetFilter {
    fn from(value: &str) -> Self {
        match value {
            "" => PetFilter::All,
            "my_pets" => PetFilter::MyPets,
            other => PetFilter::Other(other.to_string()),
        }
    }
}

/// A photo attachment held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Photo {
    /// Read a photo from disk, inferring the content type from the extension.
    pub fn from_path(path: &Path) -> Result<Self, ApiError> {
        let bytes = std::fs::read(path).map_err(|source| ApiError::Photo {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        Ok(Self {
            content_type: content_type_for(path).to_string(),
            file_name,
            bytes,
        })
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
