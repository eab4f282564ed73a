//! Turning a selected file into a transport-ready payload.
//!
//! The payload is forwarded exactly as read: no resizing, no re-encoding,
//! no size limit. The only check is that the declared type is an image type.
//!
//! # Example
//!
//! ```ignore
//! use interior_ai_core::ImageFile;
//!
//! let image = ImageFile::from_path("room.jpg")?;
//! assert_eq!(image.mime_type(), "image/jpeg");
//! ```

use crate::error::{AppError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::fs;
use std::path::Path;

/// MIME type assumed when a data URL header cannot be parsed.
pub const FALLBACK_MIME_TYPE: &str = "image/jpeg";

/// Declared type for files whose extension says nothing about their content.
const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// A selected source image, ready to be sent to the model.
///
/// Immutable once built; replacing the selection means building a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    data: String,
    mime_type: String,
    preview: String,
}

impl ImageFile {
    /// Reads a file from disk, declaring its type from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidFileType`] if the extension does not map to
    /// an image type. The file contents are not read in that case.
    /// Returns [`AppError::Io`] if reading fails.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let declared = declared_mime_type(path);
        ensure_image_type(&declared)?;

        let bytes = fs::read(path)?;
        Self::from_bytes(&declared, &bytes)
    }

    /// Builds an image from raw bytes and the type declared by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidFileType`] if `declared_mime` does not start
    /// with `image/`.
    pub fn from_bytes(declared_mime: &str, bytes: &[u8]) -> Result<Self> {
        ensure_image_type(declared_mime)?;
        let data_url = format!("data:{};base64,{}", declared_mime, BASE64.encode(bytes));
        Self::from_data_url(&data_url)
    }

    /// Splits a data URL into payload and MIME type.
    ///
    /// The payload is everything after the first comma. The MIME type sits
    /// between the `:` and the first `;` of the header; when that cannot be
    /// found it falls back to [`FALLBACK_MIME_TYPE`].
    pub fn from_data_url(data_url: &str) -> Result<Self> {
        let (header, payload) = data_url
            .split_once(',')
            .ok_or_else(|| AppError::image("data URL has no payload separator"))?;

        let mime_type = parse_header_mime(header)
            .unwrap_or(FALLBACK_MIME_TYPE)
            .to_string();

        Ok(Self {
            data: payload.to_string(),
            mime_type,
            preview: data_url.to_string(),
        })
    }

    /// Base64 payload, without the data URL header.
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The original data URL, suitable for display.
    pub fn preview(&self) -> &str {
        &self.preview
    }

    /// Reassembles a data URL from the payload and the parsed MIME type.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Rejects anything that is not declared as `image/*`.
pub fn ensure_image_type(declared_mime: &str) -> Result<()> {
    if declared_mime.starts_with("image/") {
        Ok(())
    } else {
        tracing::warn!(mime_type = declared_mime, "rejected non-image file");
        Err(AppError::InvalidFileType(declared_mime.to_string()))
    }
}

/// The type a file picker would declare for this path, based on its extension.
pub fn declared_mime_type(path: &Path) -> String {
    image::ImageFormat::from_path(path)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| UNKNOWN_MIME_TYPE.to_string())
}

fn parse_header_mime(header: &str) -> Option<&str> {
    let (_, rest) = header.split_once(':')?;
    let (mime, _) = rest.split_once(';')?;
    Some(mime)
}
