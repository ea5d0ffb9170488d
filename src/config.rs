// src/config.rs
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Settings for talking to the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_base: String,
    pub model: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(300), // 5 minutes
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl GeminiConfig {
    /// Full URL of the `generateContent` call for the configured model.
    pub fn endpoint(&self) -> String {
        let base = self.api_base.trim().trim_end_matches('/');
        let model = self.model.trim();
        if model.starts_with("models/") {
            format!("{}/{}:generateContent", base, model)
        } else {
            format!("{}/models/{}:generateContent", base, model)
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Upper bound on parsing and rasterizing one snapshot.
    pub decode_timeout: Duration,
    pub load_system_fonts: bool,
    /// Largest raster, in pixels, a snapshot may ask for.
    pub max_pixels: u64,
}

/// 8192x8192, a 256 MiB RGBA surface.
pub const DEFAULT_MAX_PIXELS: u64 = 8192 * 8192;

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            decode_timeout: Duration::from_secs(10),
            load_system_fonts: true,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub render: RenderOptions,
}
