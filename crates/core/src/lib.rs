//! Interior AI Core Library
//!
//! This library provides the core functionality for the Interior AI design
//! tool: take a photo of a room, describe a change in plain language, and let
//! Gemini produce the redesigned room.
//!
//! # Overview
//!
//! - **Encoding**: files become base64 payloads plus MIME type via [`image_file`]
//! - **State**: the idle/processing/success/error machine in [`state`] and [`session`]
//! - **AI Integration**: the Gemini image-editing client in [`gemini`]
//! - **Workflow**: one generation at a time via [`studio`]
//! - **Output**: saving the result as a PNG via [`output`]
//!
//! # Quick Start
//!
//! ```ignore
//! use interior_ai_core::InteriorAi;
//!
//! let mut app = InteriorAi::new()?;
//! app.studio_mut().select_file("room.jpg")?;
//! app.studio_mut().set_prompt("paint the walls blue");
//! app.studio_mut().generate().await?;
//! let path = app.save_result(".")?;
//! ```

pub mod config;
pub mod error;
pub mod gemini;
pub mod image_file;
pub mod output;
pub mod session;
pub mod state;
pub mod studio;

// Re-export primary types for convenience
pub use config::Config;
pub use error::{AppError, Result, GENERATION_FAILED_MESSAGE};
pub use gemini::{GeminiClient, ImageEditor};
pub use image_file::ImageFile;
pub use session::Session;
pub use state::{GeneratedImage, ProcessingState, ProcessingStatus, ProgressStage};
pub use studio::Studio;

use std::path::{Path, PathBuf};

/// Main entry point for the Interior AI application.
///
/// Owns the configuration and a [`Studio`] wired to the Gemini client.
pub struct InteriorAi {
    config: Config,
    studio: Studio<GeminiClient>,
}

impl InteriorAi {
    /// Creates an instance from environment configuration (including `.env`).
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_config(Config::load()?)
    }

    /// Creates an instance with custom configuration.
    ///
    /// Use this when you need to override environment-based configuration,
    /// such as specifying a different model.
    pub fn with_config(config: Config) -> Result<Self> {
        let client = GeminiClient::new(&config)?;
        Ok(Self {
            config,
            studio: Studio::new(client),
        })
    }

    pub fn studio(&self) -> &Studio<GeminiClient> {
        &self.studio
    }

    pub fn studio_mut(&mut self) -> &mut Studio<GeminiClient> {
        &mut self.studio
    }

    /// Writes the latest generated design into `dir`.
    pub fn save_result(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        output::save_latest(self.studio.session().generated(), dir)
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Initializes the library by loading environment variables.
///
/// Call this once at application startup. This loads `.env` files if present.
pub fn init() {
    let _ = dotenvy::dotenv();
}
