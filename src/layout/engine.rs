//! The composite layout engine.
//!
//! Combines the pure [`calculations`](super::calculations) into a complete
//! [`DrawPlan`]. The engine only looks at pixel dimensions of the source
//! images, never at their contents, and performs no I/O.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │            margin            │
//! │       ┌──────────────┐       │
//! │       │              │       │
//! │       │    cover     │       │   square, centered
//! │       │              │       │
//! │       └──────────────┘       │
//! │       ┌──────────┐           │   code: aspect kept, left-aligned
//! │       └──────────┘           │
//! │       ┌──┐                   │
//! │       │QR│ Title             │   text right of the QR,
//! │       └──┘ Subtitle          │   centered on its midpoint
//! │            margin            │
//! └──────────────────────────────┘
//! ```

use super::calculations::{
    MIN_QR_SIDE, cover_side, fit_code_block, initial_qr_side, overflow_scale,
    reserve_text_column, spacing, subtitle_font_size, text_offsets, title_font_size,
};
use super::plan::{
    Color, Dimensions, DrawOp, DrawPlan, FillOp, Font, FontWeight, ImageOp, ImageSlot, TextOp,
};
use crate::types::CatalogItem;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// Colors used by the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutStyle {
    pub background: Color,
    pub title: Color,
    pub subtitle: Color,
}

impl Default for LayoutStyle {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            title: Color::rgb(0x0b, 0x10, 0x20),
            subtitle: Color::rgb(0x33, 0x41, 0x55),
        }
    }
}

/// Layout engine configured with a [`LayoutStyle`].
///
/// Stateless apart from the style: the same inputs always give the same plan,
/// and one engine can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    pub style: LayoutStyle,
}

impl LayoutEngine {
    pub fn new(style: LayoutStyle) -> Self {
        Self { style }
    }

    /// Arrange cover, code, QR and text on a `target_width × target_height` canvas.
    ///
    /// Fails with [`LayoutError::InvalidDimensions`] if the canvas or any
    /// source image has a zero side; no operations are produced in that case.
    pub fn compute(
        &self,
        item: &CatalogItem,
        cover: Dimensions,
        code: Dimensions,
        qr: Dimensions,
        target_width: u32,
        target_height: u32,
    ) -> Result<DrawPlan, LayoutError> {
        if target_width == 0 || target_height == 0 {
            return Err(LayoutError::InvalidDimensions(format!(
                "canvas {target_width}x{target_height}"
            )));
        }
        for (name, dims) in [("cover", cover), ("code", code), ("qr", qr)] {
            if dims.is_empty() {
                return Err(LayoutError::InvalidDimensions(format!(
                    "{name} image {}x{}",
                    dims.width, dims.height
                )));
            }
        }

        let width = target_width as f64;
        let height = target_height as f64;
        let space = spacing(target_width);
        let gap = space.gap;

        // Cover: square, centered, top at margin
        let cover_side = cover_side(target_height, space.available_width);
        let cover_x = width / 2.0 - cover_side / 2.0;
        let cover_y = space.margin;

        // Code: below the cover, left edge shared with the cover
        let (mut code_w, mut code_h) = fit_code_block(cover_side, code);
        let code_y = cover_y + cover_side + gap;

        let mut qr_side = initial_qr_side(cover_side);

        let available = height - code_y - space.margin;
        if let Some(scale) = overflow_scale(available, code_h, qr_side, gap) {
            debug!(available, code_h, qr_side, scale, "shrinking code and QR to fit");
            // Rounding may not push a block past the cover or down to nothing;
            // a sub-pixel cover caps the code at its own side.
            let min_side = cover_side.min(1.0);
            code_w = (code_w * scale).round().clamp(min_side, cover_side);
            code_h = (code_h * scale).round().clamp(min_side, cover_side);
            qr_side = (qr_side * scale).round();
        }

        qr_side = reserve_text_column(qr_side, space.available_width, gap);
        if qr_side < MIN_QR_SIDE {
            debug!(qr_side, "QR below minimum, clamping");
            qr_side = MIN_QR_SIDE;
        }

        let qr_x = cover_x;
        let qr_y = code_y + code_h + gap;

        let mut ops = vec![
            DrawOp::Fill(FillOp {
                color: self.style.background,
                x: 0.0,
                y: 0.0,
                w: width,
                h: height,
            }),
            DrawOp::Image(ImageOp {
                slot: ImageSlot::Cover,
                x: cover_x,
                y: cover_y,
                w: cover_side,
                h: cover_side,
            }),
            DrawOp::Image(ImageOp {
                slot: ImageSlot::Code,
                x: cover_x,
                y: code_y,
                w: code_w,
                h: code_h,
            }),
            DrawOp::Image(ImageOp {
                slot: ImageSlot::Qr,
                x: qr_x,
                y: qr_y,
                w: qr_side,
                h: qr_side,
            }),
        ];

        let text_x = qr_x + qr_side + gap;
        let center_y = qr_y + qr_side / 2.0;
        let (above, below) = text_offsets(target_width);

        ops.push(DrawOp::Text(TextOp {
            content: item.name.clone(),
            x: text_x,
            y: center_y - above,
            font: Font {
                size: title_font_size(target_width),
                weight: FontWeight::Bold,
            },
            color: self.style.title,
        }));

        if let Some(subtitle) = item.display_subtitle() {
            ops.push(DrawOp::Text(TextOp {
                content: subtitle.to_string(),
                x: text_x,
                y: center_y + below,
                font: Font {
                    size: subtitle_font_size(target_width),
                    weight: FontWeight::Regular,
                },
                color: self.style.subtitle,
            }));
        }

        Ok(DrawPlan {
            width: target_width,
            height: target_height,
            ops,
        })
    }
}

/// Compute a layout with the default style.
///
/// See [`LayoutEngine::compute`].
pub fn compute_layout(
    item: &CatalogItem,
    cover: Dimensions,
    code: Dimensions,
    qr: Dimensions,
    target_width: u32,
    target_height: u32,
) -> Result<DrawPlan, LayoutError> {
    LayoutEngine::default().compute(item, cover, code, qr, target_width, target_height)
}
