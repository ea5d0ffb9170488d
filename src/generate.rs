// src/generate.rs
use base64::{engine::general_purpose, Engine as _};
use log::info;

use crate::ai::{require_api_key, AiConnector, EncodedImage, GeminiModel};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::prompt::{build_prompt, PromptContext};
use crate::render::{DesignSnapshot, Rasterizer, SvgRasterizer};

/// One whiteboard-to-HTML request.
#[derive(Debug, Clone)]
pub struct HtmlRequest<'a> {
    pub image: &'a DesignSnapshot,
    pub api_key: &'a str,
    pub context: PromptContext,
}

/// Render the design, build the prompt and ask Gemini for HTML.
///
/// The API key is checked before anything is rendered or any client is built.
pub fn get_html_from_gemini(request: &HtmlRequest<'_>, config: &Config) -> Result<String> {
    require_api_key(request.api_key)?;

    let model = GeminiModel::new(request.api_key, config.gemini.clone())?;
    let rasterizer = SvgRasterizer::new(config.render.clone());

    generate_html(request.image, &request.context, &rasterizer, &model)
}

pub fn generate_html(
    snapshot: &DesignSnapshot,
    context: &PromptContext,
    rasterizer: &dyn Rasterizer,
    connector: &dyn AiConnector,
) -> Result<String> {
    let image = encode_snapshot(snapshot, rasterizer)?;
    let prompt = build_prompt(context);

    info!(
        "Prompt ready: {} characters, {} previous design(s), theme {}",
        prompt.len(),
        context.previous_previews.len(),
        context.theme
    );

    connector.generate(&prompt, &image)
}

/// Rasterize and base64-encode a snapshot, rejecting an empty payload.
pub fn encode_snapshot(snapshot: &DesignSnapshot, rasterizer: &dyn Rasterizer) -> Result<EncodedImage> {
    let png = rasterizer.encode_to_raster(snapshot)?;
    if png.is_empty() {
        return Err(Error::EmptyImage);
    }
    Ok(EncodedImage::png(general_purpose::STANDARD.encode(png)))
}
