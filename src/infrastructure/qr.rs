//! QR code rendering
//!
//! Produces a PNG data URI that can be stored on the record and dropped
//! straight into an `<img src>`.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, Rgb, RgbImage};
use qrcode::{Color, QrCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QrError {
    #[error("QR encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("PNG encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Output geometry and colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrStyle {
    /// Edge length of the square image in pixels.
    pub size: u32,
    /// Quiet zone width, in modules.
    pub margin: u32,
    pub dark: [u8; 3],
    pub light: [u8; 3],
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            size: 300,
            margin: 2,
            dark: [0x16, 0x65, 0x34],
            light: [0xff, 0xff, 0xff],
        }
    }
}

/// Public display page address for a plant.
pub fn plant_display_url(public_base_url: &str, plant_id: &str) -> String {
    format!("{}/plant/{}", public_base_url.trim_end_matches('/'), plant_id)
}

/// Render `content` as a `data:image/png;base64,...` URI.
pub fn render_qr_data_uri(content: &str, style: QrStyle) -> Result<String, QrError> {
    let png = render_qr_png(content, style)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

/// Render `content` as raw PNG bytes.
pub fn render_qr_png(content: &str, style: QrStyle) -> Result<Vec<u8>, QrError> {
    let code = QrCode::new(content.as_bytes())?;
    let width = code.width() as u32;
    let colors = code.to_colors();

    let modules = width + 2 * style.margin;
    let size = style.size.max(modules);
    let dark = Rgb(style.dark);
    let light = Rgb(style.light);

    let img = RgbImage::from_fn(size, size, |x, y| {
        let mx = x * modules / size;
        let my = y * modules / size;
        let inside = mx >= style.margin
            && my >= style.margin
            && mx < style.margin + width
            && my < style.margin + width;
        if !inside {
            return light;
        }
        let idx = ((my - style.margin) * width + (mx - style.margin)) as usize;
        match colors[idx] {
            Color::Dark => dark,
            Color::Light => light,
        }
    });

    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}
