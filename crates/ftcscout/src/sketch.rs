//! Autonomous path sketches stored as `data:` URLs.
//!
//! A sketch is an image attached to an entry. It travels inside the entry
//! record as `data:<mime>;base64,<payload>`.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use crate::error::{Error, Result};

/// A decoded sketch image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sketch {
    /// Media type, e.g. `image/png`.
    pub mime: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

impl Sketch {
    /// Wrap raw image bytes.
    #[must_use]
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// Parse a `data:<mime>;base64,<payload>` URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sketch`] if the URL is not base64 data or the payload is invalid.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| Error::sketch("not a data URL"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::sketch("data URL has no payload"))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| Error::sketch("data URL is not base64 encoded"))?;
        let bytes = STANDARD
            .decode(payload)
            .map_err(|err| Error::sketch(format!("invalid base64 payload: {err}")))?;
        Ok(Self::new(mime, bytes))
    }

    /// Encode as a `data:` URL.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    /// File extension matching the media type, if known.
    #[must_use]
    pub fn extension(&self) -> Option<&'static str> {
        match self.mime.as_str() {
            "image/png" => Some("png"),
            "image/jpeg" => Some("jpg"),
            "image/gif" => Some("gif"),
            "image/webp" => Some("webp"),
            _ => None,
        }
    }
}

fn mime_for_path(path: &Path) -> Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        "webp" => Ok("image/webp"),
        _ => Err(Error::sketch(format!(
            "unsupported image type: {}",
            path.display()
        ))),
    }
}

/// Read an image file as a sketch, taking the media type from its extension.
///
/// # Errors
///
/// Returns an error if the extension is unsupported or the file cannot be read.
pub fn load_sketch(path: &Path) -> Result<Sketch> {
    let mime = mime_for_path(path)?;
    let bytes = std::fs::read(path)?;
    debug!("Loaded {} byte sketch from {}", bytes.len(), path.display());
    Ok(Sketch::new(mime, bytes))
}

/// Decode a `data:` URL and write the image bytes to `path`.
///
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if the URL is invalid, a directory cannot be created,
/// or the file cannot be written.
pub fn save_sketch(data_url: &str, path: &Path) -> Result<Sketch> {
    let sketch = Sketch::from_data_url(data_url)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    std::fs::write(path, &sketch.bytes)?;
    debug!("Wrote {} byte sketch to {}", sketch.bytes.len(), path.display());
    Ok(sketch)
}
