use crate::config::Config;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use gemini_rust::{Blob, Content, Gemini, GenerationResponse, Message, Part, Role};
use url::Url;

/// An external service that edits an image according to a text instruction.
///
/// [`crate::Studio`] talks to this trait rather than to a concrete client so a
/// different backend, or a test double, can be passed in.
#[async_trait]
pub trait ImageEditor: Send + Sync {
    /// Sends one edit request and returns the base64 payload of the result.
    async fn edit_image(&self, image_base64: &str, mime_type: &str, prompt: &str) -> Result<String>;

    /// Model identifier, for display.
    fn model_name(&self) -> &str;
}

pub struct GeminiClient {
    client: Gemini,
    model_name: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        // Initialize the client with the API key and model, explicitly setting the base URL to avoid BadScheme error
        let (base_url, model_url) = model_endpoint(&config.base_url, &config.model_name)?;

        let client = Gemini::with_model_and_base_url(&config.gemini_api_key, model_url.to_string(), base_url)
            .map_err(|e| AppError::config(format!("Failed to create Gemini client: {}", e)))?;

        Ok(Self {
            client,
            model_name: config.model_name.clone(),
        })
    }
}

/// Resolves the API root and the full model URL.
///
/// The root always ends in `/` so joining keeps its last path segment.
pub fn model_endpoint(base_url: &str, model_name: &str) -> Result<(Url, Url)> {
    let base_url = if base_url.ends_with('/') {
        Url::parse(base_url)
    } else {
        Url::parse(&format!("{}/", base_url))
    }
    .map_err(|e| AppError::config(format!("Invalid base URL: {}", e)))?;

    let model_path = if model_name.starts_with("models/") {
        model_name.to_string()
    } else {
        format!("models/{}", model_name)
    };
    let model_url = base_url
        .join(&model_path)
        .map_err(|e| AppError::config(format!("Invalid model name: {}", e)))?;

    Ok((base_url, model_url))
}

#[async_trait]
impl ImageEditor for GeminiClient {
    /// Sends the image followed by the instruction and returns the edited image.
    async fn edit_image(&self, image_base64: &str, mime_type: &str, prompt: &str) -> Result<String> {
        let message = Message {
            role: Role::User,
            content: edit_request_content(image_base64, mime_type, prompt),
        };

        tracing::info!(model = %self.model_name, mime_type, "sending edit request");

        let response = self.client
            .generate_content()
            .with_messages(vec![message])
            .execute()
            .await
            .map_err(|e| AppError::GeminiApi(format!("API request failed: {:?}", e)))?;

        extract_image_data(response_parts(&response))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Builds the user content for an edit: inline image first, then the instruction.
pub fn edit_request_content(image_base64: &str, mime_type: &str, prompt: &str) -> Content {
    let image_part = Part::InlineData {
        inline_data: Blob {
            mime_type: mime_type.to_string(),
            data: image_base64.to_string(),
        },
    };

    let text_part = Part::Text {
        text: prompt.to_string(),
        thought: None,
        thought_signature: None,
    };

    Content {
        role: Some(Role::User),
        parts: Some(vec![image_part, text_part]),
    }
}

/// Parts of the first candidate, empty when the model returned none.
pub fn response_parts(response: &GenerationResponse) -> &[Part] {
    response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.parts.as_deref())
        .unwrap_or_default()
}

/// Returns the payload of the first part carrying inline data.
///
/// The model may interleave text and image parts in any order, so every part
/// is inspected rather than only the first one.
pub fn extract_image_data(parts: &[Part]) -> Result<String> {
    tracing::debug!(parts = parts.len(), "scanning response parts for image data");

    parts
        .iter()
        .find_map(|part| match part {
            Part::InlineData { inline_data, .. } => Some(inline_data.data.clone()),
            _ => None,
        })
        .ok_or(AppError::NoImageData)
}
