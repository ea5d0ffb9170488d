//! Turn a whiteboard drawing into an HTML prototype.
//!
//! The SVG snapshot is rasterized to PNG, described in a prompt together with
//! any detected text, grid and earlier results, and sent to Gemini. The model's
//! text comes back untouched.

pub mod ai;
pub mod config;
pub mod error;
pub mod generate;
pub mod prompt;
pub mod render;

pub use config::{Config, GeminiConfig, RenderOptions};
pub use error::{Error, Result};
pub use generate::{encode_snapshot, generate_html, get_html_from_gemini, HtmlRequest};
pub use prompt::{build_prompt, GridOverlay, InstructionVariant, PreviousPreview, PromptContext};
pub use render::{DesignSnapshot, Rasterizer, SvgRasterizer};
