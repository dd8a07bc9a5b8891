//! In-process emulation of the pet friends REST service.
//!
//! Reproduces the status codes the real service is observed to return,
//! including its quirks: an unrecognized listing filter is ignored, and
//! deleting a pet id that does not exist answers 200.

pub mod config;

use std::{
    future::Future,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Form, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use uuid::Uuid;

pub use config::{Account, ConfigError, MockConfig};

pub const AUTH_HEADER: &str = "auth_key";
pub const PHOTO_FIELD: &str = "pet_photo";
pub const MY_PETS: &str = "my_pets";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    pub pet_photo: String,
    pub user_id: String,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PetList {
    pub pets: Vec<Pet>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiKey {
    pub key: String,
}

/// Fields of a create or update request. Everything is optional so that
/// validation, not deserialization, decides what a missing field means.
#[derive(Debug, Default, Deserialize)]
pub struct PetInput {
    pub name: Option<String>,
    pub animal_type: Option<String>,
    pub age: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Clone)]
struct User {
    email: String,
    password: String,
    user_id: String,
    key: String,
}

/// Accounts and pets. Pets are kept in creation order.
#[derive(Debug, Default)]
pub struct Store {
    users: Vec<User>,
    pets: Vec<Pet>,
}

impl Store {
    pub fn with_accounts(accounts: &[Account]) -> Self {
        let users = accounts
            .iter()
            .map(|a| User {
                email: a.email.clone(),
                password: a.password.clone(),
                user_id: Uuid::new_v4().simple().to_string(),
                key: Uuid::new_v4().simple().to_string(),
            })
            .collect();
        Self {
            users,
            pets: Vec::new(),
        }
    }

    fn authenticate(&self, headers: &HeaderMap) -> Result<String, Rejection> {
        let key = header_str(headers, AUTH_HEADER).ok_or(Rejection::Forbidden("auth_key header is required"))?;
        self.users
            .iter()
            .find(|u| u.key == key)
            .map(|u| u.user_id.clone())
            .ok_or(Rejection::Forbidden("auth_key is not valid"))
    }

    /// Pet owned by `user_id`, distinguishing "missing" from "not yours".
    fn owned_pet_mut(&mut self, user_id: &str, pet_id: &str) -> Result<&mut Pet, Rejection> {
        let pet = self
            .pets
            .iter_mut()
            .find(|p| p.id == pet_id)
            .ok_or(Rejection::NotFound)?;
        if pet.user_id != user_id {
            return Err(Rejection::Forbidden("This pet belongs to another user"));
        }
        Ok(pet)
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Failures the service answers with a plain-text body.
#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    BadRequest(String),
    #[error("Pet not found")]
    NotFound,
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let status = match &self {
            Rejection::Forbidden(_) => StatusCode::FORBIDDEN,
            Rejection::BadRequest(_) => StatusCode::BAD_REQUEST,
            Rejection::NotFound => StatusCode::NOT_FOUND,
        };
        debug!(%status, reason = %self, "rejecting request");
        (status, self.to_string()).into_response()
    }
}

pub fn app(accounts: &[Account]) -> Router {
    let db: Db = Arc::new(RwLock::new(Store::with_accounts(accounts)));
    Router::new()
        .route("/api/key", get(get_api_key))
        .route("/api/pets", get(list_pets).post(add_pet))
        .route("/api/create_pet_simple", post(create_pet_simple))
        .route("/api/pets/set_photo/{pet_id}", post(set_photo))
        .route("/api/pets/{pet_id}", put(update_pet).delete(delete_pet))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener, accounts: &[Account]) -> Result<(), std::io::Error> {
    axum::serve(listener, app(accounts)).await
}

/// Serve until `shutdown` resolves.
pub async fn run_until<F>(listener: TcpListener, accounts: &[Account], shutdown: F) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(accounts))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn get_api_key(State(db): State<Db>, headers: HeaderMap) -> Response {
    let email = header_str(&headers, "email");
    let password = header_str(&headers, "password");
    let store = db.read().await;
    let user = store
        .users
        .iter()
        .find(|u| Some(u.email.as_str()) == email && Some(u.password.as_str()) == password);
    match user {
        Some(user) => Json(ApiKey {
            key: user.key.clone(),
        })
        .into_response(),
        None => Rejection::Forbidden("This user wasn't found in database").into_response(),
    }
}

async fn list_pets(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<PetList>, Rejection> {
    let store = db.read().await;
    let user_id = store.authenticate(&headers)?;
    let only_mine = query.filter.as_deref() == Some(MY_PETS);
    let pets = store
        .pets
        .iter()
        .rev()
        .filter(|p| !only_mine || p.user_id == user_id)
        .cloned()
        .collect();
    Ok(Json(PetList { pets }))
}

async fn add_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Pet>, Rejection> {
    let user_id = db.read().await.authenticate(&headers)?;
    let (input, photo) = read_multipart(multipart).await?;
    let (name, animal_type, age) = validate(&input)?;
    let photo = photo.ok_or_else(|| Rejection::BadRequest("pet_photo is required".to_string()))?;

    let pet = new_pet(user_id, name, animal_type, age, photo.data_uri());
    info!(pet_id = %pet.id, name = %pet.name, "pet created with photo");
    db.write().await.pets.push(pet.clone());
    Ok(Json(pet))
}

async fn create_pet_simple(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(input): Form<PetInput>,
) -> Result<Json<Pet>, Rejection> {
    let user_id = db.read().await.authenticate(&headers)?;
    let (name, animal_type, age) = validate(&input)?;

    let pet = new_pet(user_id, name, animal_type, age, String::new());
    info!(pet_id = %pet.id, name = %pet.name, "pet created");
    db.write().await.pets.push(pet.clone());
    Ok(Json(pet))
}

async fn set_photo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(pet_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Pet>, Rejection> {
    let user_id = db.read().await.authenticate(&headers)?;
    let (_, photo) = read_multipart(multipart).await?;
    let photo = photo.ok_or_else(|| Rejection::BadRequest("pet_photo is required".to_string()))?;

    let mut store = db.write().await;
    let pet = store.owned_pet_mut(&user_id, &pet_id)?;
    pet.pet_photo = photo.data_uri();
    info!(pet_id = %pet.id, "pet photo replaced");
    Ok(Json(pet.clone()))
}

async fn update_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(pet_id): Path<String>,
    Form(input): Form<PetInput>,
) -> Result<Json<Pet>, Rejection> {
    let mut store = db.write().await;
    let user_id = store.authenticate(&headers)?;
    let (name, animal_type, age) = validate(&input)?;

    let pet = store.owned_pet_mut(&user_id, &pet_id)?;
    pet.name = name;
    pet.animal_type = animal_type;
    pet.age = age;
    info!(pet_id = %pet.id, "pet updated");
    Ok(Json(pet.clone()))
}

async fn delete_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(pet_id): Path<String>,
) -> Result<StatusCode, Rejection> {
    let mut store = db.write().await;
    let user_id = store.authenticate(&headers)?;
    let owned = store.owned_pet_mut(&user_id, &pet_id).map(|_| ());
    match owned {
        Ok(()) => {
            store.pets.retain(|p| p.id != pet_id);
            info!(%pet_id, "pet deleted");
            Ok(StatusCode::OK)
        }
        // The real service answers 200 for ids it does not know.
        Err(Rejection::NotFound) => {
            debug!(%pet_id, "delete of unknown pet ignored");
            Ok(StatusCode::OK)
        }
        Err(other) => Err(other),
    }
}

struct UploadedPhoto {
    content_type: String,
    bytes: Vec<u8>,
}

impl UploadedPhoto {
    fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<(PetInput, Option<UploadedPhoto>), Rejection> {
    let mut input = PetInput::default();
    let mut photo = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Rejection::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == PHOTO_FIELD {
            let content_type = field.content_type().unwrap_or_default().to_string();
            if !content_type.starts_with("image/") {
                return Err(Rejection::BadRequest(format!(
                    "pet_photo must be an image, got '{content_type}'"
                )));
            }
            let bytes = field
                .bytes()
                .await
                .map_err(|e| Rejection::BadRequest(e.to_string()))?;
            photo = Some(UploadedPhoto {
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }
        let value = field
            .text()
            .await
            .map_err(|e| Rejection::BadRequest(e.to_string()))?;
        match name.as_str() {
            "name" => input.name = Some(value),
            "animal_type" => input.animal_type = Some(value),
            "age" => input.age = Some(value),
            _ => {}
        }
    }
    Ok((input, photo))
}

/// Required fields are present and non-empty; age is a non-negative integer.
pub fn validate(input: &PetInput) -> Result<(String, String, String), Rejection> {
    let name = required(&input.name, "name")?;
    let animal_type = required(&input.animal_type, "animal_type")?;
    let age = required(&input.age, "age")?;
    let age: i64 = age
        .trim()
        .parse()
        .map_err(|_| Rejection::BadRequest(format!("age must be an integer, got '{age}'")))?;
    if age < 0 {
        return Err(Rejection::BadRequest(format!("age must not be negative, got {age}")));
    }
    Ok((name, animal_type, age.to_string()))
}

fn required(value: &Option<String>, field: &str) -> Result<String, Rejection> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(Rejection::BadRequest(format!("{field} is required"))),
    }
}

fn new_pet(user_id: String, name: String, animal_type: String, age: String, pet_photo: String) -> Pet {
    let created_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    Pet {
        id: Uuid::new_v4().simple().to_string(),
        name,
        animal_type,
        age,
        pet_photo,
        user_id,
        created_at: created_at.to_string(),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: Option<&str>, animal_type: Option<&str>, age: Option<&str>) -> PetInput {
        PetInput {
            name: name.map(String::from),
            animal_type: animal_type.map(String::from),
            age: age.map(String::from),
        }
    }

    #[test]
    fn pet_serializes_to_json() {
        let pet = Pet {
            id: "p1".to_string(),
            name: "Eevee".to_string(),
            animal_type: "Pokemon".to_string(),
            age: "3".to_string(),
            pet_photo: String::new(),
            user_id: "u1".to_string(),
            created_at: "0".to_string(),
        };
        let json = serde_json::to_value(&pet).unwrap();
        assert_eq!(json["id"], "p1");
        assert_eq!(json["age"], "3");
        assert_eq!(json["pet_photo"], "");
    }

    #[test]
    fn validate_accepts_complete_input() {
        let (name, animal_type, age) = validate(&input(Some("Eevee"), Some("Pokemon"), Some(" 3 "))).unwrap();
        assert_eq!(name, "Eevee");
        assert_eq!(animal_type, "Pokemon");
        assert_eq!(age, "3");
    }

    #[test]
    fn validate_rejects_negative_age() {
        let err = validate(&input(Some("Eevee"), Some("Pokemon"), Some("-3"))).unwrap_err();
        assert!(matches!(err, Rejection::BadRequest(msg) if msg.contains("negative")));
    }

    #[test]
    fn validate_rejects_missing_fields() {
        assert!(validate(&input(Some("Eevee"), None, Some("3"))).is_err());
        assert!(validate(&input(Some("Eevee"), Some("Pokemon"), None)).is_err());
        assert!(validate(&input(Some("  "), Some("Pokemon"), Some("3"))).is_err());
    }

    #[test]
    fn validate_rejects_non_numeric_age() {
        assert!(validate(&input(Some("Eevee"), Some("Pokemon"), Some("three"))).is_err());
    }

    #[test]
    fn pet_input_all_fields_optional() {
        let input: PetInput = serde_json::from_str("{}").unwrap();
        assert!(input.name.is_none());
        assert!(input.animal_type.is_none());
        assert!(input.age.is_none());
    }

    #[test]
    fn store_issues_distinct_keys() {
        let store = Store::with_accounts(&[
            Account::new("a@example.com", "pa"),
            Account::new("b@example.com", "pb"),
        ]);
        assert_ne!(store.users[0].key, store.users[1].key);
        assert_ne!(store.users[0].user_id, store.users[1].user_id);
    }

    #[test]
    fn photo_data_uri() {
        let photo = UploadedPhoto {
            content_type: "image/jpeg".to_string(),
            bytes: vec![0xFF, 0xD8],
        };
        assert_eq!(photo.data_uri(), "data:image/jpeg;base64,/9g=");
    }
}
