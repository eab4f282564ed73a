//! Per-session state: the selected image, the prompt, the latest result and
//! the processing state that drives user feedback.

use crate::error::{AppError, Result};
use crate::image_file::ImageFile;
use crate::state::{GeneratedImage, ProcessingState, ProcessingStatus, ProgressStage};
use serde::Serialize;

/// Everything the view needs to render, held for one user session.
///
/// At most one source image and one generated result exist at any time.
#[derive(Debug, Default)]
pub struct Session {
    current_image: Option<ImageFile>,
    prompt: String,
    generated: Option<GeneratedImage>,
    state: ProcessingState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selected image, dropping any previous result or error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidTransition`] while a request is outstanding.
    pub fn select_image(&mut self, image: ImageFile) -> Result<()> {
        self.ensure_not_processing("select an image")?;
        self.current_image = Some(image);
        self.generated = None;
        self.state = ProcessingState::idle();
        Ok(())
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Whether the generate action is enabled.
    pub fn can_generate(&self) -> bool {
        self.unavailable_reason().is_none()
    }

    fn unavailable_reason(&self) -> Option<&'static str> {
        if self.current_image.is_none() {
            Some("no image selected")
        } else if self.prompt.trim().is_empty() {
            Some("prompt is empty")
        } else if self.state.is_processing() {
            Some("a request is already in flight")
        } else {
            None
        }
    }

    /// `Idle`/`Success`/`Error` -> `Processing`.
    pub fn begin_generation(&mut self) -> Result<()> {
        if let Some(reason) = self.unavailable_reason() {
            return Err(AppError::GenerateUnavailable(reason));
        }
        self.state = ProcessingState::processing(ProgressStage::Analyzing);
        Ok(())
    }

    /// Updates the progress message of an outstanding request.
    pub fn advance(&mut self, stage: ProgressStage) -> Result<()> {
        self.ensure_processing("report progress")?;
        self.state = ProcessingState::processing(stage);
        Ok(())
    }

    /// `Processing` -> `Success`, storing the edited image.
    pub fn complete(&mut self, edited_base64: &str) -> Result<&GeneratedImage> {
        self.ensure_processing("complete")?;
        let original = self
            .current_image
            .as_ref()
            .map(ImageFile::preview)
            .unwrap_or_default();

        self.state = ProcessingState::success();
        let record = GeneratedImage::new(original, edited_base64, &self.prompt);
        Ok(&*self.generated.insert(record))
    }

    /// `Processing` -> `Error` with a user-facing message.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<()> {
        self.ensure_processing("fail")?;
        self.state = ProcessingState::error(message);
        Ok(())
    }

    /// Back to the initial state: no image, no prompt, no result.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn current_image(&self) -> Option<&ImageFile> {
        self.current_image.as_ref()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn generated(&self) -> Option<&GeneratedImage> {
        self.generated.as_ref()
    }

    pub fn state(&self) -> &ProcessingState {
        &self.state
    }

    pub fn status(&self) -> ProcessingStatus {
        self.state.status
    }

    /// Machine-readable view of the state and the latest result.
    pub fn to_json(&self) -> Result<String> {
        let summary = SessionSummary {
            state: &self.state,
            generated: self.generated.as_ref(),
        };
        Ok(serde_json::to_string_pretty(&summary)?)
    }

    fn ensure_processing(&self, action: &'static str) -> Result<()> {
        if self.state.is_processing() {
            Ok(())
        } else {
            Err(AppError::InvalidTransition {
                action,
                status: self.state.status.as_str(),
            })
        }
    }

    fn ensure_not_processing(&self, action: &'static str) -> Result<()> {
        if self.state.is_processing() {
            Err(AppError::InvalidTransition {
                action,
                status: self.state.status.as_str(),
            })
        } else {
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct SessionSummary<'a> {
    state: &'a ProcessingState,
    #[serde(skip_serializing_if = "Option::is_none")]
    generated: Option<&'a GeneratedImage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> ImageFile {
        ImageFile::from_bytes("image/jpeg", b"room").unwrap()
    }

    fn ready_session() -> Session {
        let mut session = Session::new();
        session.select_image(room()).unwrap();
        session.set_prompt("paint the walls blue");
        session
    }

    #[test]
    fn test_generate_disabled_without_image() {
        let mut session = Session::new();
        session.set_prompt("paint the walls blue");
        assert!(!session.can_generate());
        assert!(matches!(
            session.begin_generation(),
            Err(AppError::GenerateUnavailable(_))
        ));
        assert_eq!(session.status(), ProcessingStatus::Idle);
    }

    #[test]
    fn test_generate_disabled_for_blank_prompt() {
        let mut session = Session::new();
        session.select_image(room()).unwrap();
        for prompt in ["", "   ", "\n\t"] {
            session.set_prompt(prompt);
            assert!(!session.can_generate(), "prompt {:?} should disable", prompt);
        }
    }

    #[test]
    fn test_generate_disabled_while_processing() {
        let mut session = ready_session();
        assert!(session.can_generate());
        session.begin_generation().unwrap();
        assert!(!session.can_generate());
        assert!(session.begin_generation().is_err());
        assert_eq!(
            session.state().message.as_deref(),
            Some(ProgressStage::Analyzing.message())
        );
    }

    #[test]
    fn test_success_transition_stores_result() {
        let mut session = ready_session();
        session.begin_generation().unwrap();
        session.advance(ProgressStage::Applying).unwrap();
        let record = session.complete("UkVTVUxU").unwrap();
        assert_eq!(record.edited_image, "data:image/png;base64,UkVTVUxU");
        assert_eq!(record.prompt, "paint the walls blue");
        assert_eq!(session.status(), ProcessingStatus::Success);
        assert!(session.state().message.is_none());
    }

    #[test]
    fn test_error_transition_keeps_image_and_prompt() {
        let mut session = ready_session();
        session.begin_generation().unwrap();
        session.fail("nope").unwrap();
        assert_eq!(session.status(), ProcessingStatus::Error);
        assert_eq!(session.state().message.as_deref(), Some("nope"));
        assert!(session.current_image().is_some());
        // Manual retry is allowed from the error state.
        assert!(session.can_generate());
    }

    #[test]
    fn test_completion_requires_processing() {
        let mut session = ready_session();
        assert!(matches!(
            session.complete("AAAA"),
            Err(AppError::InvalidTransition { status: "idle", .. })
        ));
        assert!(session.fail("x").is_err());
        assert!(session.advance(ProgressStage::Applying).is_err());
        assert_eq!(session.status(), ProcessingStatus::Idle);
    }

    #[test]
    fn test_selecting_new_image_clears_result() {
        let mut session = ready_session();
        session.begin_generation().unwrap();
        session.complete("AAAA").unwrap();
        assert!(session.generated().is_some());

        session
            .select_image(ImageFile::from_bytes("image/png", b"other room").unwrap())
            .unwrap();
        assert!(session.generated().is_none());
        assert_eq!(session.status(), ProcessingStatus::Idle);
        assert_eq!(session.current_image().unwrap().mime_type(), "image/png");
    }

    #[test]
    fn test_selecting_new_image_clears_error() {
        let mut session = ready_session();
        session.begin_generation().unwrap();
        session.fail("nope").unwrap();
        session.select_image(room()).unwrap();
        assert_eq!(session.state(), &ProcessingState::idle());
    }

    #[test]
    fn test_select_rejected_mid_flight() {
        let mut session = ready_session();
        session.begin_generation().unwrap();
        assert!(session.select_image(room()).is_err());
        assert!(session.state().is_processing());
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut session = ready_session();
        session.begin_generation().unwrap();
        session.complete("AAAA").unwrap();
        session.reset();
        assert!(session.current_image().is_none());
        assert!(session.generated().is_none());
        assert_eq!(session.prompt(), "");
        assert_eq!(session.status(), ProcessingStatus::Idle);

        let mut session = ready_session();
        session.begin_generation().unwrap();
        session.reset();
        assert_eq!(session.status(), ProcessingStatus::Idle);
    }

    #[test]
    fn test_json_summary_after_success() {
        let mut session = ready_session();
        session.begin_generation().unwrap();
        session.complete("UkVTVUxU").unwrap();

        let value: serde_json::Value = serde_json::from_str(&session.to_json().unwrap()).unwrap();
        assert_eq!(value["state"]["status"], "success");
        assert!(value["state"].get("message").is_none());
        assert_eq!(
            value["generated"]["editedImage"],
            "data:image/png;base64,UkVTVUxU"
        );
        assert_eq!(value["generated"]["prompt"], "paint the walls blue");
        assert!(value["generated"]["timestamp"].as_u64().unwrap() > 0);
    }

    #[test]
    fn test_json_summary_after_failure_has_no_result() {
        let mut session = ready_session();
        session.begin_generation().unwrap();
        session.fail("try again").unwrap();

        let value: serde_json::Value = serde_json::from_str(&session.to_json().unwrap()).unwrap();
        assert_eq!(value["state"]["status"], "error");
        assert_eq!(value["state"]["message"], "try again");
        assert!(value.get("generated").is_none());
    }
}
