//! Saving a generated design to disk.
//!
//! Results are always written as PNG under a name derived from the
//! generation timestamp, e.g. `interior-ai-design-1717171717171.png`.

use crate::error::{AppError, Result};
use crate::state::GeneratedImage;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::fs;
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "interior-ai-design";

/// File name for a result generated at `timestamp_ms` (unix milliseconds).
pub fn download_file_name(timestamp_ms: u64) -> String {
    format!("{}-{}.png", FILE_PREFIX, timestamp_ms)
}

/// Writes the edited image of `record` into `dir` and returns the file path.
///
/// The payload is written as-is; no re-encoding takes place.
///
/// # Errors
///
/// Returns [`AppError::ImageProcessing`] if the payload is not valid base64,
/// or [`AppError::Io`] if the file cannot be written.
pub fn save_generated(record: &GeneratedImage, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let bytes = BASE64
        .decode(record.edited_payload())
        .map_err(|e| AppError::image(format!("Generated image is not valid base64: {}", e)))?;

    let path = dir.as_ref().join(download_file_name(record.timestamp));
    fs::write(&path, bytes)?;
    tracing::info!(path = %path.display(), "saved generated design");
    Ok(path)
}

/// Like [`save_generated`], for an optional result.
pub fn save_latest(record: Option<&GeneratedImage>, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let record = record.ok_or(AppError::NoResult)?;
    save_generated(record, dir)
}
