//! Request body encodings: url-encoded forms and `multipart/form-data`.
//!
//! Both produce a content-type header value and the body bytes, so the
//! client can describe a photo upload as plain data.

use url::form_urlencoded;
use uuid::Uuid;

use crate::types::Photo;

/// Encode `(name, value)` pairs as `application/x-www-form-urlencoded`.
pub fn url_encoded_form<'a, I>(fields: I) -> (String, Vec<u8>)
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in fields {
        serializer.append_pair(name, value);
    }
    (
        "application/x-www-form-urlencoded".to_string(),
        serializer.finish().into_bytes(),
    )
}

/// Builder for a `multipart/form-data` body.
#[derive(Debug, Clone)]
pub struct Multipart {
    boundary: String,
    body: Vec<u8>,
}

impl Multipart {
    pub fn new() -> Self {
        Self::with_boundary(format!("petfriends-{}", Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: String) -> Self {
        Self {
            boundary,
            body: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.open_part();
        self.body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", escape(name)).as_bytes(),
        );
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn file(mut self, name: &str, photo: &Photo) -> Self {
        self.open_part();
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                escape(name),
                escape(&photo.file_name)
            )
            .as_bytes(),
        );
        self.body
            .extend_from_slice(format!("Content-Type: {}\r\n\r\n", photo.content_type).as_bytes());
        self.body.extend_from_slice(&photo.bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Close the body and return `(content_type, bytes)`.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }

    fn open_part(&mut self) {
        self.body
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
    }
}

impl Default for Multipart {
    fn default() -> Self {
        Self::new()
    }
}

// Quotes and line breaks would end the header parameter early.
fn escape(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
