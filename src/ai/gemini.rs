// src/ai/gemini.rs
use log::{debug, info, warn};
use reqwest::blocking::Client;

use super::connector::{AiConnector, EncodedImage};
use super::types::{
    Content, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, InlineData, Part,
};
use crate::config::GeminiConfig;
use crate::error::{Error, Result};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Hosted Gemini model reached over the REST `generateContent` call.
pub struct GeminiModel {
    api_key: String,
    config: GeminiConfig,
    client: Client,
}

/// Fails with [`Error::MissingCredential`] for an empty or blank key.
pub fn require_api_key(api_key: &str) -> Result<&str> {
    let trimmed = api_key.trim();
    if trimmed.is_empty() {
        return Err(Error::MissingCredential);
    }
    Ok(trimmed)
}

impl GeminiModel {
    pub fn new(api_key: &str, config: GeminiConfig) -> Result<Self> {
        let api_key = require_api_key(api_key)?.to_string();

        info!("Initializing Gemini model: {} at {}", config.model, config.api_base);

        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            api_key,
            config,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

impl AiConnector for GeminiModel {
    fn generate(&self, prompt: &str, image: &EncodedImage) -> Result<String> {
        let request = build_request(prompt, image);
        let url = self.config.endpoint();

        info!("Sending request to Gemini model {}...", self.config.model);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        let html = extract_text(&body)?;
        info!("Gemini returned {} characters", html.len());
        debug!("Raw result / response from model: {}", html);
        Ok(html)
    }
}

fn build_request(prompt: &str, image: &EncodedImage) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![
                Part::Text {
                    text: prompt.to_string(),
                },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.data.clone(),
                    },
                },
            ],
        }],
    }
}

fn api_error(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string());
    Error::Api { status, message }
}

/// Text of the first candidate, with its text parts joined in order.
fn extract_text(body: &str) -> Result<String> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;

    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(Error::Blocked(reason));
    }

    let candidate = response.candidates.into_iter().next().ok_or(Error::EmptyResponse)?;

    let Some(content) = candidate.content else {
        warn!(
            "Gemini candidate has no content (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        );
        return Err(Error::EmptyResponse);
    };

    let mut text = String::new();
    let mut found = false;
    for part in content.parts {
        if let Part::Text { text: chunk } = part {
            text.push_str(&chunk);
            found = true;
        }
    }

    if !found {
        return Err(Error::EmptyResponse);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_is_missing_credential() {
        assert!(matches!(require_api_key(""), Err(Error::MissingCredential)));
        assert!(matches!(require_api_key("   "), Err(Error::MissingCredential)));
        assert!(matches!(
            GeminiModel::new("", GeminiConfig::default()),
            Err(Error::MissingCredential)
        ));
    }

    #[test]
    fn key_is_trimmed() -> anyhow::Result<()> {
        assert_eq!(require_api_key("  abc \n")?, "abc");
        Ok(())
    }

    #[test]
    fn request_body_has_text_then_inline_png() -> anyhow::Result<()> {
        let request = build_request("make it real", &EncodedImage::png("aGVsbG8=".to_string()));
        let value = serde_json::to_value(&request)?;

        assert_eq!(value["contents"][0]["role"], "user");
        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "make it real");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[1]["inlineData"]["data"], "aGVsbG8=");
        Ok(())
    }

    #[test]
    fn extracts_first_candidate_text() -> anyhow::Result<()> {
        let body = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "<html>"}, {"text": "</html>"}]}, "finishReason": "STOP"},
                {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
            ]
        }"#;
        assert_eq!(extract_text(body)?, "<html></html>");
        Ok(())
    }

    #[test]
    fn text_is_returned_unmodified() -> anyhow::Result<()> {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "  ```html\n<p>hi</p>\n```  "}]}}]}"#;
        assert_eq!(extract_text(body)?, "  ```html\n<p>hi</p>\n```  ");
        Ok(())
    }

    #[test]
    fn blocked_prompt_is_reported() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        assert!(matches!(extract_text(body), Err(Error::Blocked(reason)) if reason == "SAFETY"));
    }

    #[test]
    fn no_candidates_is_empty_response() {
        assert!(matches!(extract_text(r#"{"candidates": []}"#), Err(Error::EmptyResponse)));
        assert!(matches!(extract_text("{}"), Err(Error::EmptyResponse)));
    }

    #[test]
    fn candidate_without_content_is_empty_response() {
        let body = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        assert!(matches!(extract_text(body), Err(Error::EmptyResponse)));
    }

    #[test]
    fn candidate_without_text_parts_is_empty_response() {
        let body = r#"{"candidates": [{"content": {"parts": [{"inlineData": {"mimeType": "image/png", "data": "AA=="}}]}}]}"#;
        assert!(matches!(extract_text(body), Err(Error::EmptyResponse)));
    }

    #[test]
    fn garbage_body_is_invalid_response() {
        assert!(matches!(extract_text("<html>oops</html>"), Err(Error::InvalidResponse(_))));
    }

    #[test]
    fn api_error_prefers_service_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        match api_error(400, body) {
            Error::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn api_error_falls_back_to_raw_body() {
        match api_error(503, "upstream unavailable") {
            Error::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "upstream unavailable");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
