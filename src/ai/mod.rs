pub mod connector;
pub mod gemini;
pub mod types;

pub use connector::{AiConnector, EncodedImage, PNG_MIME_TYPE};
pub use gemini::{require_api_key, GeminiModel};
