// src/ai/connector.rs
use crate::error::Result;

pub const PNG_MIME_TYPE: &str = "image/png";

/// Base64 image payload sent inline with the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: String,
    pub data: String,
}

impl EncodedImage {
    pub fn png(data: String) -> Self {
        Self {
            mime_type: PNG_MIME_TYPE.to_string(),
            data,
        }
    }
}

/// Trait defining the interface for a hosted model that turns a design into HTML
pub trait AiConnector: Send + Sync {
    /// Send the prompt and image, return the model's text unmodified
    fn generate(&self, prompt: &str, image: &EncodedImage) -> Result<String>;
}
