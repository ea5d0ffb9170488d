// src/render/rasterizer.rs
use std::io::Cursor;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::Duration;

use image::{DynamicImage, ImageOutputFormat, RgbaImage};
use log::{info, warn};
use resvg::tiny_skia::{Pixmap, PremultipliedColorU8, Transform};
use resvg::usvg::{self, fontdb};

use super::snapshot::DesignSnapshot;
use crate::config::RenderOptions;
use crate::error::{Error, Result};

/// Turns a design snapshot into PNG bytes.
pub trait Rasterizer: Send + Sync {
    fn encode_to_raster(&self, snapshot: &DesignSnapshot) -> Result<Vec<u8>>;
}

/// Rasterizer backed by resvg, rendering at the drawing's intrinsic size.
///
/// Fonts are loaded on the first decode, inside the timeout-bounded worker,
/// and reused afterwards.
pub struct SvgRasterizer {
    options: RenderOptions,
    fonts: Arc<OnceLock<Arc<fontdb::Database>>>,
}

impl SvgRasterizer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            fonts: Arc::new(OnceLock::new()),
        }
    }
}

impl Default for SvgRasterizer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl Rasterizer for SvgRasterizer {
    fn encode_to_raster(&self, snapshot: &DesignSnapshot) -> Result<Vec<u8>> {
        let markup = snapshot.shared_markup();
        let fonts = Arc::clone(&self.fonts);
        let load_system_fonts = self.options.load_system_fonts;
        let max_pixels = self.options.max_pixels;
        run_with_timeout(self.options.decode_timeout, move || {
            let fontdb = Arc::clone(fonts.get_or_init(|| load_fonts(load_system_fonts)));
            rasterize(markup.as_bytes(), fontdb, max_pixels)
        })
    }
}

fn load_fonts(load_system_fonts: bool) -> Arc<fontdb::Database> {
    let mut db = fontdb::Database::new();
    if load_system_fonts {
        db.load_system_fonts();
        info!("Loaded {} font faces for SVG text", db.len());
    }
    Arc::new(db)
}

/// Runs `job` on a worker thread and waits at most `timeout` for its result.
///
/// On timeout the worker keeps running and its result is dropped.
pub(crate) fn run_with_timeout<T, F>(timeout: Duration, job: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("svg-decode".to_string())
        .spawn(move || {
            // receiver may already be gone after a timeout
            let _ = tx.send(job());
        })?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            warn!("SVG decode still running after {:?}, giving up", timeout);
            Err(Error::DecodeTimeout(timeout))
        }
        Err(RecvTimeoutError::Disconnected) => Err(Error::ImageDecode(
            "decoder stopped without producing an image".to_string(),
        )),
    }
}

fn rasterize(svg_data: &[u8], fontdb: Arc<fontdb::Database>, max_pixels: u64) -> Result<Vec<u8>> {
    let mut opt = usvg::Options::default();
    opt.fontdb = fontdb;

    let tree = usvg::Tree::from_data(svg_data, &opt)
        .map_err(|e| Error::ImageDecode(e.to_string()))?;

    let size = tree.size();
    let width = size.width().ceil() as u32;
    let height = size.height().ceil() as u32;

    let mut pixmap = surface(width, height, max_pixels)?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

    // tiny-skia stores premultiplied alpha; demultiply in place
    let mut rgba = pixmap.take();
    for px in rgba.chunks_exact_mut(4) {
        if let Some(color) = PremultipliedColorU8::from_rgba(px[0], px[1], px[2], px[3]) {
            let color = color.demultiply();
            px.copy_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }
    }

    let image = RgbaImage::from_raw(width, height, rgba)
        .ok_or(Error::CanvasUnavailable { width, height })?;

    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    DynamicImage::ImageRgba8(image).write_to(&mut cursor, ImageOutputFormat::Png)?;

    info!("Rasterized design: {}x{} ({} bytes PNG)", width, height, buffer.len());
    Ok(buffer)
}

fn surface(width: u32, height: u32, max_pixels: u64) -> Result<Pixmap> {
    if u64::from(width) * u64::from(height) > max_pixels {
        warn!("Refusing {}x{} canvas, limit is {} pixels", width, height, max_pixels);
        return Err(Error::CanvasUnavailable { width, height });
    }
    Pixmap::new(width, height).ok_or(Error::CanvasUnavailable { width, height })
}
