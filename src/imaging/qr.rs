//! QR code generation.
//!
//! Encodes the item's public link with error-correction level H (the link
//! stays readable with up to ~30% of the symbol damaged, which matters once
//! the layout shrinks the QR block). Modules are drawn as whole pixel squares
//! so the raster stays crisp; the renderer then scales the result.

use super::source::LoadedImage;
use crate::layout::Color;
use image::{Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode};
use thiserror::Error;

/// Light modules around the symbol on every side.
const QUIET_ZONE_MODULES: u32 = 2;

/// Largest raster side honored; bigger requests are clamped to it.
pub const MAX_QR_SIZE: u32 = 4096;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CodeGenerationError {
    #[error("Nothing to encode: the selected item has no link")]
    EmptyText,
    #[error("QR encoding failed: {0}")]
    Encode(String),
}

/// Size and colors of generated QR rasters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrStyle {
    /// Requested side in pixels, at most [`MAX_QR_SIZE`]. The output is the
    /// largest whole-module multiple not above it (but at least one pixel per
    /// module).
    pub size: u32,
    pub dark: Color,
    pub light: Color,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            size: 300,
            dark: Color::rgb(0x0b, 0x10, 0x20),
            light: Color::WHITE,
        }
    }
}

/// Generate a square QR raster encoding `text`.
pub fn generate_qr_image(text: &str, style: &QrStyle) -> Result<LoadedImage, CodeGenerationError> {
    if text.trim().is_empty() {
        return Err(CodeGenerationError::EmptyText);
    }
    let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::H)
        .map_err(|e| CodeGenerationError::Encode(e.to_string()))?;

    let modules = code.width() as u32;
    let total = modules + QUIET_ZONE_MODULES * 2;
    let scale = (style.size.min(MAX_QR_SIZE) / total).max(1);
    let side = total * scale;

    let dark = Rgba(style.dark.to_rgba());
    let mut img = RgbaImage::from_pixel(side, side, Rgba(style.light.to_rgba()));

    for (i, color) in code.to_colors().iter().enumerate() {
        if *color != qrcode::Color::Dark {
            continue;
        }
        let mx = i as u32 % modules + QUIET_ZONE_MODULES;
        let my = i as u32 / modules + QUIET_ZONE_MODULES;
        for dy in 0..scale {
            for dx in 0..scale {
                img.put_pixel(mx * scale + dx, my * scale + dy, dark);
            }
        }
    }

    Ok(LoadedImage::new(img))
}
