// src/error.rs
use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong between reading a design and getting HTML back.
#[derive(Debug, Error)]
pub enum Error {
    #[error("You need to provide an API key")]
    MissingCredential,

    #[error("Error loading SVG data into image: {0}")]
    ImageDecode(String),

    #[error("SVG decode did not finish within {0:?}")]
    DecodeTimeout(Duration),

    #[error("Unable to get a {width}x{height} canvas")]
    CanvasUnavailable { width: u32, height: u32 },

    #[error("Encoded image is empty")]
    EmptyImage,

    #[error("PNG encoding failed: {0}")]
    PngEncode(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Gemini request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Gemini blocked the prompt: {0}")]
    Blocked(String),

    #[error("Gemini returned no usable candidate")]
    EmptyResponse,

    #[error("Gemini response is not valid JSON: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
