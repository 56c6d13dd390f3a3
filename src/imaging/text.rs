//! Font loading and glyph rasterization.
//!
//! Title and subtitle are drawn with `rusttype`. Fonts come from the paths in
//! `[fonts]` when set, otherwise from the first existing file in a list of
//! common system locations. A missing bold face falls back to the regular one.

use crate::config::FontsConfig;
use crate::layout::{Color, FontWeight};
use image::RgbaImage;
use rusttype::{Font, Scale, point};
use std::path::Path;
use tracing::{debug, warn};

const REGULAR_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const BOLD_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Regular and bold faces used for text operations.
#[derive(Default)]
pub struct FontSet {
    regular: Option<Font<'static>>,
    bold: Option<Font<'static>>,
}

impl FontSet {
    /// A set that draws no text at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load faces from config paths, falling back to system locations.
    pub fn load(config: &FontsConfig) -> Self {
        let regular = load_face(config.regular.as_deref(), REGULAR_CANDIDATES);
        let bold = load_face(config.bold.as_deref(), BOLD_CANDIDATES);
        if regular.is_none() && bold.is_none() {
            warn!("no usable font found; composites will be rendered without text");
        }
        Self { regular, bold }
    }

    /// Face for `weight`, falling back to whichever face is available.
    pub fn face(&self, weight: FontWeight) -> Option<&Font<'static>> {
        match weight {
            FontWeight::Bold => self.bold.as_ref().or(self.regular.as_ref()),
            FontWeight::Regular => self.regular.as_ref().or(self.bold.as_ref()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.regular.is_none() && self.bold.is_none()
    }
}

fn load_face(configured: Option<&str>, candidates: &[&str]) -> Option<Font<'static>> {
    if let Some(path) = configured {
        match read_font(Path::new(path)) {
            Some(font) => return Some(font),
            None => warn!(path, "configured font could not be loaded, trying system fonts"),
        }
    }
    candidates.iter().find_map(|p| {
        let font = read_font(Path::new(p))?;
        debug!(path = p, "using system font");
        Some(font)
    })
}

fn read_font(path: &Path) -> Option<Font<'static>> {
    let bytes = std::fs::read(path).ok()?;
    Font::try_from_vec(bytes)
}

/// Draw one line of text with its alphabetic baseline at `baseline_y`.
///
/// Glyph coverage is blended over the existing pixels; anything outside the
/// canvas is clipped.
pub fn draw_text(
    canvas: &mut RgbaImage,
    font: &Font<'static>,
    px: f32,
    x: f32,
    baseline_y: f32,
    color: Color,
    text: &str,
) {
    let scale = Scale::uniform(px);
    let (width, height) = canvas.dimensions();

    for glyph in font.layout(text, scale, point(x, baseline_y)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let px = gx as i32 + bb.min.x;
            let py = gy as i32 + bb.min.y;
            if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height {
                return;
            }
            if coverage <= 0.0 {
                return;
            }
            let dst = canvas.get_pixel_mut(px as u32, py as u32);
            let a = coverage.min(1.0);
            let inv = 1.0 - a;
            dst.0[0] = (color.r as f32 * a + dst.0[0] as f32 * inv).round() as u8;
            dst.0[1] = (color.g as f32 * a + dst.0[1] as f32 * inv).round() as u8;
            dst.0[2] = (color.b as f32 * a + dst.0[2] as f32 * inv).round() as u8;
            dst.0[3] = 255;
        });
    }
}

/// Horizontal extent of `text` in pixels.
pub fn text_width(font: &Font<'static>, px: f32, text: &str) -> f32 {
    let scale = Scale::uniform(px);
    font.layout(text, scale, point(0.0, 0.0))
        .filter_map(|g| g.pixel_bounding_box())
        .map(|bb| bb.max.x as f32)
        .fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_has_no_faces() {
        let fonts = FontSet::empty();
        assert!(fonts.is_empty());
        assert!(fonts.face(FontWeight::Bold).is_none());
    }

    #[test]
    fn bad_configured_path_falls_back_to_system_fonts() {
        assert!(load_face(Some("/no/such/font.ttf"), &[]).is_none());

        let config = FontsConfig {
            regular: Some("/no/such/font.ttf".into()),
            bold: Some("/no/such/bold.ttf".into()),
        };
        let fallback = FontSet::load(&FontsConfig::default());
        assert_eq!(FontSet::load(&config).is_empty(), fallback.is_empty());
    }

    #[test]
    fn non_font_bytes_are_rejected() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), b"not a font").unwrap();
        assert!(read_font(tmp.path()).is_none());
    }

    #[test]
    fn drawing_with_system_font_marks_pixels() {
        let fonts = FontSet::load(&FontsConfig::default());
        let Some(font) = fonts.face(FontWeight::Bold) else {
            // No system font in this environment
            return;
        };
        let mut canvas = RgbaImage::from_pixel(200, 60, image::Rgba([255, 255, 255, 255]));
        draw_text(&mut canvas, font, 32.0, 4.0, 40.0, Color::rgb(0, 0, 0), "Blue");
        assert!(canvas.pixels().any(|p| p.0[0] < 128));
        assert!(text_width(font, 32.0, "Blue") > 0.0);
    }

    #[test]
    fn text_is_clipped_at_canvas_edges() {
        let fonts = FontSet::load(&FontsConfig::default());
        let Some(font) = fonts.face(FontWeight::Regular) else {
            return;
        };
        let black = image::Rgba([0, 0, 0, 255]);
        let text = "Overflowing title";

        // Starts left of and runs far past a 20x20 canvas
        let mut clipped = RgbaImage::from_pixel(20, 20, black);
        draw_text(&mut clipped, font, 48.0, -10.0, 30.0, Color::WHITE, text);
        assert_eq!(clipped.dimensions(), (20, 20));
        assert!(clipped.pixels().any(|p| p.0 != black.0));

        // The same line on a roomy canvas, shifted by a whole number of pixels,
        // matches the clipped window (up to float noise in glyph positions).
        let offset = 40;
        let mut full = RgbaImage::from_pixel(800, 120, black);
        draw_text(
            &mut full,
            font,
            48.0,
            -10.0 + offset as f32,
            30.0 + offset as f32,
            Color::WHITE,
            text,
        );
        for (x, y, p) in clipped.enumerate_pixels() {
            let q = full.get_pixel(x + offset, y + offset);
            for c in 0..4 {
                assert!(p.0[c].abs_diff(q.0[c]) <= 1, "({x}, {y}): {p:?} vs {q:?}");
            }
        }
    }
}
