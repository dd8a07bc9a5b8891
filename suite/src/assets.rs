//! Bundled photo assets, located relative to this crate at run time.

use std::path::PathBuf;

pub const EEVEE: &str = "eevee.jpg";
pub const SYLVEON: &str = "sylveon.jpg";

/// Directory holding the bundled images.
pub fn images_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("images")
}

/// Absolute path of a bundled image.
pub fn photo(name: &str) -> PathBuf {
    images_dir().join(name)
}
