//! Stateless HTTP request builder and response parser for the pet friends API.
//!
//! # Design
//! `PetFriendsClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation has a `build_*` method that produces an
//! `HttpRequest`; a single `parse_response` turns any `HttpResponse` into an
//! [`ApiResponse`]. Status codes are never interpreted here: the caller
//! asserts on them.

use url::form_urlencoded;

use crate::encoding::{url_encoded_form, Multipart};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::response::{ApiResponse, ResponseBody};
use crate::types::{PetFilter, PetForm, Photo};

/// Header carrying the API key on every call except key retrieval.
pub const AUTH_HEADER: &str = "auth_key";

/// Multipart field name of a photo attachment.
pub const PHOTO_FIELD: &str = "pet_photo";

/// Synchronous, stateless request builder for the pet friends API.
#[derive(Debug, Clone)]
pub struct PetFriendsClient {
    base_url: String,
}

impl PetFriendsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_get_api_key(&self, email: &str, password: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/api/key", self.base_url),
            headers: vec![
                ("email".to_string(), email.to_string()),
                ("password".to_string(), password.to_string()),
            ],
            body: None,
        }
    }

    pub fn build_list_pets(&self, auth_key: &str, filter: &PetFilter) -> HttpRequest {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("filter", filter.as_str())
            .finish();
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/api/pets?{query}", self.base_url),
            headers: vec![auth(auth_key)],
            body: None,
        }
    }

    pub fn build_add_pet(&self, auth_key: &str, form: &PetForm, photo: &Photo) -> HttpRequest {
        let multipart = form
            .fields()
            .iter()
            .fold(Multipart::new(), |m, (name, value)| m.text(name, value));
        let (content_type, body) = multipart.file(PHOTO_FIELD, photo).finish();
        HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/api/pets", self.base_url),
            headers: vec![auth(auth_key), content_type_header(content_type)],
            body: Some(body),
        }
    }

    pub fn build_add_pet_without_photo(&self, auth_key: &str, form: &PetForm) -> HttpRequest {
        self.form_request(
            HttpMethod::Post,
            format!("{}/api/create_pet_simple", self.base_url),
            auth_key,
            form,
        )
    }

    pub fn build_add_photo_of_pet(&self, auth_key: &str, pet_id: &str, photo: &Photo) -> HttpRequest {
        let (content_type, body) = Multipart::new().file(PHOTO_FIELD, photo).finish();
        HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/api/pets/set_photo/{}", self.base_url, segment(pet_id)),
            headers: vec![auth(auth_key), content_type_header(content_type)],
            body: Some(body),
        }
    }

    pub fn build_update_pet_info(&self, auth_key: &str, pet_id: &str, form: &PetForm) -> HttpRequest {
        self.form_request(
            HttpMethod::Put,
            format!("{}/api/pets/{}", self.base_url, segment(pet_id)),
            auth_key,
            form,
        )
    }

    pub fn build_delete_pet(&self, auth_key: &str, pet_id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: format!("{}/api/pets/{}", self.base_url, segment(pet_id)),
            headers: vec![auth(auth_key)],
            body: None,
        }
    }

    /// Normalize a response into `(status, body)`. Never fails.
    pub fn parse_response(&self, response: HttpResponse) -> ApiResponse {
        ApiResponse {
            status: response.status,
            body: ResponseBody::from_text(response.body),
        }
    }

    fn form_request(&self, method: HttpMethod, url: String, auth_key: &str, form: &PetForm) -> HttpRequest {
        let fields = form.fields();
        let (content_type, body) = url_encoded_form(fields.iter().map(|(k, v)| (*k, v.as_str())));
        HttpRequest {
            method,
            url,
            headers: vec![auth(auth_key), content_type_header(content_type)],
            body: Some(body),
        }
    }
}

fn auth(auth_key: &str) -> (String, String) {
    (AUTH_HEADER.to_string(), auth_key.to_string())
}

fn content_type_header(value: String) -> (String, String) {
    ("content-type".to_string(), value)
}

/// Percent-encode a single path segment.
fn segment(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PetFriendsClient {
        PetFriendsClient::new("http://localhost:3000")
    }

    fn photo() -> Photo {
        Photo {
            file_name: "eevee.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: vec![0xFF, 0xD8, 0xFF, 0xD9],
        }
    }

    fn body_text(req: &HttpRequest) -> String {
        String::from_utf8_lossy(req.body.as_deref().unwrap()).into_owned()
    }

    #[test]
    fn build_get_api_key_sends_credentials_as_headers() {
        let req = client().build_get_api_key("me@example.com", "secret");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/api/key");
        assert_eq!(req.header("email"), Some("me@example.com"));
        assert_eq!(req.header("password"), Some("secret"));
        assert!(req.header(AUTH_HEADER).is_none());
        assert!(req.body.is_none());
    }

    #[test]
    fn build_list_pets_carries_filter() {
        let req = client().build_list_pets("k1", &PetFilter::MyPets);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/api/pets?filter=my_pets");
        assert_eq!(req.header(AUTH_HEADER), Some("k1"));
    }

    #[test]
    fn build_list_pets_all_sends_empty_filter() {
        let req = client().build_list_pets("k1", &PetFilter::All);
        assert_eq!(req.url, "http://localhost:3000/api/pets?filter=");
    }

    #[test]
    fn build_list_pets_encodes_unknown_filter() {
        let req = client().build_list_pets("k1", &PetFilter::from("all pets&x"));
        assert_eq!(req.url, "http://localhost:3000/api/pets?filter=all+pets%26x");
    }

    #[test]
    fn build_add_pet_is_multipart_with_photo() {
        let req = client().build_add_pet("k1", &PetForm::new("Eevee", "Pokemon", 3), &photo());
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/api/pets");
        assert_eq!(req.header(AUTH_HEADER), Some("k1"));
        let content_type = req.header("content-type").unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));

        let body = body_text(&req);
        assert!(body.contains("name=\"name\"\r\n\r\nEevee\r\n"));
        assert!(body.contains("name=\"animal_type\"\r\n\r\nPokemon\r\n"));
        assert!(body.contains("name=\"age\"\r\n\r\n3\r\n"));
        assert!(body.contains("name=\"pet_photo\"; filename=\"eevee.jpg\""));
        assert!(body.contains("Content-Type: image/jpeg"));
    }

    #[test]
    fn build_add_pet_omits_missing_field() {
        let form = PetForm {
            animal_type: None,
            ..PetForm::new("Eevee", "Pokemon", 3)
        };
        let req = client().build_add_pet("k1", &form, &photo());
        assert!(!body_text(&req).contains("name=\"animal_type\""));
    }

    #[test]
    fn build_add_pet_without_photo_is_form_encoded() {
        let req = client().build_add_pet_without_photo("k1", &PetForm::new("Raichu", "AlolaPokemon", 5));
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/api/create_pet_simple");
        assert_eq!(req.header("content-type"), Some("application/x-www-form-urlencoded"));
        assert_eq!(body_text(&req), "name=Raichu&animal_type=AlolaPokemon&age=5");
    }

    #[test]
    fn build_add_photo_of_pet_targets_pet() {
        let req = client().build_add_photo_of_pet("k1", "abc123", &photo());
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/api/pets/set_photo/abc123");
        let body = body_text(&req);
        assert!(body.contains("name=\"pet_photo\""));
        assert!(!body.contains("name=\"name\""));
    }

    #[test]
    fn build_update_pet_info_with_null_age() {
        let form = PetForm {
            age: None,
            ..PetForm::new("Eevee", "KantoPokemon", 0)
        };
        let req = client().build_update_pet_info("k1", "abc123", &form);
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:3000/api/pets/abc123");
        assert_eq!(body_text(&req), "name=Eevee&animal_type=KantoPokemon");
    }

    #[test]
    fn build_delete_pet_has_no_body() {
        let req = client().build_delete_pet("k1", "123456");
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:3000/api/pets/123456");
        assert_eq!(req.header(AUTH_HEADER), Some("k1"));
        assert!(req.body.is_none());
    }

    #[test]
    fn pet_id_is_percent_encoded() {
        let req = client().build_delete_pet("k1", "a b/c");
        assert_eq!(req.url, "http://localhost:3000/api/pets/a%20b%2Fc");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = PetFriendsClient::new("http://localhost:3000/");
        let req = client.build_get_api_key("a", "b");
        assert_eq!(req.url, "http://localhost:3000/api/key");
    }

    #[test]
    fn parse_response_keeps_status_and_json() {
        let resp = client().parse_response(HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"key":"abc"}"#.to_string(),
        });
        assert_eq!(resp.status, 200);
        assert!(resp.contains_key("key"));
    }

    #[test]
    fn parse_response_forbidden_has_no_key() {
        let resp = client().parse_response(HttpResponse {
            status: 403,
            headers: Vec::new(),
            body: "This user wasn't found in database".to_string(),
        });
        assert_eq!(resp.status, 403);
        assert!(!resp.contains_key("key"));
    }
}
