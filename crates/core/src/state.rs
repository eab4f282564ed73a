//! Processing state types.
//!
//! The processing flow is a simple linear state machine:
//! `Idle` -> `Processing` -> `Success` | `Error`, with `Idle` reachable from
//! anywhere on reset or when a new image is selected. There is no retry
//! transition; a failed attempt is re-triggered by the user.

use serde::Serialize;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Where a generation currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    /// No generation in flight.
    #[default]
    Idle,
    /// A request is outstanding.
    Processing,
    /// A result is available.
    Success,
    /// The last request failed.
    Error,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Processing => "processing",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Real lifecycle points of a generation, reported to the view as they happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStage {
    /// The request is being assembled from the selected image and prompt.
    Analyzing,
    /// The request has been handed to the model and we are waiting for it.
    Applying,
}

impl ProgressStage {
    /// Human-readable progress message for this stage.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Analyzing => "Analyzing your space...",
            Self::Applying => "Applying design changes...",
        }
    }
}

/// Status plus the message that goes with it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProcessingState {
    pub status: ProcessingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProcessingState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn processing(stage: ProgressStage) -> Self {
        Self {
            status: ProcessingStatus::Processing,
            message: Some(stage.message().to_string()),
        }
    }

    pub fn success() -> Self {
        Self {
            status: ProcessingStatus::Success,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ProcessingStatus::Error,
            message: Some(message.into()),
        }
    }

    pub fn is_processing(&self) -> bool {
        self.status == ProcessingStatus::Processing
    }
}

/// The single most recent generation.
///
/// A new generation replaces this record; nothing older is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub id: Uuid,
    /// Data URL of the source image.
    pub original_image: String,
    /// `data:image/png;base64,...` URL of the edited image.
    pub edited_image: String,
    pub prompt: String,
    /// Unix time in milliseconds.
    pub timestamp: u64,
}

impl GeneratedImage {
    /// Wraps the model's base64 payload as a PNG data URL.
    pub fn new(original_image: &str, edited_base64: &str, prompt: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_image: original_image.to_string(),
            edited_image: png_data_url(edited_base64),
            prompt: prompt.to_string(),
            timestamp: unix_millis(),
        }
    }

    /// Base64 payload of the edited image.
    pub fn edited_payload(&self) -> &str {
        self.edited_image
            .split_once(',')
            .map(|(_, payload)| payload)
            .unwrap_or_default()
    }
}

/// Builds the data URL under which results are displayed.
pub fn png_data_url(base64_payload: &str) -> String {
    format!("data:image/png;base64,{}", base64_payload)
}

/// Current unix time in milliseconds, 0 if the clock is before the epoch.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
