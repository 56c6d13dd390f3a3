//! Pure geometry for the composite layout.
//!
//! All functions here are pure and testable without any I/O or images. Sizes
//! are `f64` pixels; rounding happens exactly where the layout rules call for
//! it so results stay reproducible across renderers.

use super::plan::Dimensions;

/// Hard lower bound for the QR side, applied after every other adjustment.
pub const MIN_QR_SIDE: f64 = 48.0;

/// Overflow shrink never goes below this fraction of the original size.
pub const MIN_SHRINK: f64 = 0.3;

/// Widest column kept free for text to the right of the QR block.
pub const MAX_TEXT_COLUMN: f64 = 120.0;

/// Spacing derived from the canvas width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    pub margin: f64,
    pub gap: f64,
    /// Canvas width minus both side margins.
    pub available_width: f64,
}

/// Calculate margin, gap and usable width for a canvas width.
///
/// # Examples
/// ```
/// # use covercard::layout::calculations::spacing;
/// let s = spacing(1000);
/// assert_eq!((s.margin, s.gap, s.available_width), (80.0, 40.0, 840.0));
/// ```
pub fn spacing(width: u32) -> Spacing {
    let w = width as f64;
    let margin = (w * 0.08).round();
    let gap = (w * 0.04).round();
    Spacing {
        margin,
        gap,
        available_width: w - margin * 2.0,
    }
}

/// Side of the square cover block.
///
/// Bounded by 55% of the canvas height and by the usable width.
pub fn cover_side(height: u32, available_width: f64) -> f64 {
    (height as f64 * 0.55).min(available_width)
}

/// Fit the scannable code inside the cover footprint, keeping its aspect ratio.
///
/// The code takes the cover's width unless that would make it taller than the
/// cover, in which case the height is pinned and the width recomputed.
///
/// # Returns
/// * `(width, height)` of the code block
pub fn fit_code_block(cover_side: f64, code: Dimensions) -> (f64, f64) {
    let aspect = code.aspect_ratio();
    let width = cover_side;
    let height = width / aspect;
    if height > cover_side {
        (cover_side * aspect, cover_side)
    } else {
        (width, height)
    }
}

/// Starting QR side: 22% of the cover, never larger than the cover itself.
pub fn initial_qr_side(cover_side: f64) -> f64 {
    cover_side.min((cover_side * 0.22).round())
}

/// Uniform shrink factor for the stacked code and QR blocks.
///
/// `available` is the vertical space from the top of the code block down to
/// the bottom margin. Returns `None` when the QR block and its gap already fit
/// below the code block. Otherwise returns the factor that makes
/// `code_height + gap + qr_side` fit in `available`, clamped to
/// `[MIN_SHRINK, 1]`.
pub fn overflow_scale(available: f64, code_height: f64, qr_side: f64, gap: f64) -> Option<f64> {
    if available - code_height >= qr_side + gap {
        return None;
    }
    let scale = (available - gap) / (code_height + qr_side);
    Some(scale.clamp(MIN_SHRINK, 1.0))
}

/// Width reserved for the title/subtitle column next to the QR block.
pub fn text_column(available_width: f64) -> f64 {
    (available_width * 0.25).min(MAX_TEXT_COLUMN).round()
}

/// Shrink the QR side so the text column still fits beside it.
///
/// The result never drops below [`MIN_QR_SIDE`] on this path, even if that
/// eats into the text column.
pub fn reserve_text_column(qr_side: f64, available_width: f64, gap: f64) -> f64 {
    let limit = available_width - text_column(available_width) - gap;
    if qr_side > limit {
        limit.max(MIN_QR_SIDE)
    } else {
        qr_side
    }
}

/// Bold title size for a canvas width.
pub fn title_font_size(width: u32) -> f64 {
    (width as f64 * 0.028).max(12.0).round()
}

/// Regular subtitle size for a canvas width.
pub fn subtitle_font_size(width: u32) -> f64 {
    (width as f64 * 0.018).max(10.0).round()
}

/// Baseline offsets of title (above) and subtitle (below) from the QR midpoint.
pub fn text_offsets(width: u32) -> (f64, f64) {
    let w = width as f64;
    ((w * 0.01).round(), (w * 0.02).round())
}
