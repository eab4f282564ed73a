//! The generate workflow.
//!
//! [`Studio`] ties a [`Session`] to an injected [`ImageEditor`] and runs one
//! generation at a time. Every failure of the edit request is caught here and
//! turned into the `Error` state; nothing from the network reaches the caller
//! as an `Err`.

use crate::error::{Result, GENERATION_FAILED_MESSAGE};
use crate::gemini::ImageEditor;
use crate::image_file::ImageFile;
use crate::session::Session;
use crate::state::{ProcessingState, ProgressStage};
use std::path::Path;

pub struct Studio<E> {
    editor: E,
    session: Session,
}

impl<E: ImageEditor> Studio<E> {
    pub fn new(editor: E) -> Self {
        Self {
            editor,
            session: Session::new(),
        }
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Loads and selects an image file from disk.
    ///
    /// A file that is not declared as an image is rejected and the session is
    /// left untouched.
    pub fn select_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let image = ImageFile::from_path(path)?;
        self.select_image(image)
    }

    /// Selects an already-encoded image, clearing any previous result.
    pub fn select_image(&mut self, image: ImageFile) -> Result<()> {
        self.session.select_image(image)
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.session.set_prompt(prompt);
    }

    pub fn can_generate(&self) -> bool {
        self.session.can_generate()
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Runs one generation without progress reporting.
    pub async fn generate(&mut self) -> Result<&ProcessingState> {
        self.generate_with_progress(|_| {}).await
    }

    /// Runs one generation, calling `on_progress` as each stage is entered.
    ///
    /// # Errors
    ///
    /// Only returns [`crate::AppError::GenerateUnavailable`] when generation is
    /// not enabled. Failures of the request itself end in the `Error` state.
    pub async fn generate_with_progress<F>(&mut self, mut on_progress: F) -> Result<&ProcessingState>
    where
        F: FnMut(ProgressStage),
    {
        self.session.begin_generation()?;
        on_progress(ProgressStage::Analyzing);

        let request = self
            .session
            .current_image()
            .map(|image| (image.data().to_string(), image.mime_type().to_string()));
        let Some((data, mime_type)) = request else {
            self.session.fail(GENERATION_FAILED_MESSAGE)?;
            return Ok(self.session.state());
        };
        let prompt = self.session.prompt().to_string();

        self.session.advance(ProgressStage::Applying)?;
        on_progress(ProgressStage::Applying);

        match self.editor.edit_image(&data, &mime_type, &prompt).await {
            Ok(edited) => {
                let record = self.session.complete(&edited)?;
                tracing::info!(id = %record.id, "design generated");
            }
            Err(e) => {
                tracing::error!(error = %e, "design generation failed");
                self.session.fail(GENERATION_FAILED_MESSAGE)?;
            }
        }

        Ok(self.session.state())
    }
}
