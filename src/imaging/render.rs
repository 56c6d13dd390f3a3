//! Surface renderer: paints a [`DrawPlan`] into an RGBA buffer.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Fill | direct pixel writes, clipped to the canvas |
//! | Image | `image::imageops::resize` (Lanczos3, stretch) + `imageops::overlay` (alpha, clipped) |
//! | Text | `rusttype` glyph coverage, see [`text`](super::text) |
//! | Encode | `image` PNG encoder |
//!
//! Fractional plan coordinates are rounded to whole pixels here, at the last
//! possible moment.

use super::source::LoadedImage;
use super::text::{FontSet, draw_text, text_width};
use crate::layout::{DrawOp, DrawPlan, FillOp, ImageOp, ImageSlot, TextOp};
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use tracing::{debug, warn};

/// The three rasters a composite is built from.
#[derive(Debug, Clone)]
pub struct SourceImages {
    pub cover: LoadedImage,
    pub code: LoadedImage,
    pub qr: LoadedImage,
}

impl SourceImages {
    pub fn get(&self, slot: ImageSlot) -> &LoadedImage {
        match slot {
            ImageSlot::Cover => &self.cover,
            ImageSlot::Code => &self.code,
            ImageSlot::Qr => &self.qr,
        }
    }
}

/// Execute every operation of `plan` in order on a fresh canvas.
pub fn render_plan(plan: &DrawPlan, images: &SourceImages, fonts: &FontSet) -> RgbaImage {
    let mut canvas = RgbaImage::new(plan.width, plan.height);
    let mut warned_no_font = false;

    for op in &plan.ops {
        match op {
            DrawOp::Fill(fill) => paint_fill(&mut canvas, fill),
            DrawOp::Image(image) => paint_image(&mut canvas, image, images.get(image.slot)),
            DrawOp::Text(text) => {
                if fonts.is_empty() {
                    if !warned_no_font {
                        warn!("skipping text: no font available");
                        warned_no_font = true;
                    }
                    continue;
                }
                paint_text(&mut canvas, text, fonts);
            }
        }
    }
    canvas
}

/// Pixel span `[start, end)` of a fractional extent, clipped to `0..limit`.
fn pixel_span(start: f64, len: f64, limit: u32) -> (u32, u32) {
    let from = start.round().max(0.0) as u32;
    let to = (start + len).round().clamp(0.0, limit as f64) as u32;
    (from.min(limit), to)
}

fn paint_fill(canvas: &mut RgbaImage, fill: &FillOp) {
    let (x0, x1) = pixel_span(fill.x, fill.w, canvas.width());
    let (y0, y1) = pixel_span(fill.y, fill.h, canvas.height());
    let color = Rgba(fill.color.to_rgba());
    for y in y0..y1 {
        for x in x0..x1 {
            canvas.put_pixel(x, y, color);
        }
    }
}

fn paint_image(canvas: &mut RgbaImage, op: &ImageOp, source: &LoadedImage) {
    let w = op.w.round().max(1.0) as u32;
    let h = op.h.round().max(1.0) as u32;
    let pixels = source.pixels();
    let scaled = if pixels.dimensions() == (w, h) {
        pixels.clone()
    } else {
        imageops::resize(pixels, w, h, FilterType::Lanczos3)
    };
    imageops::overlay(canvas, &scaled, op.x.round() as i64, op.y.round() as i64);
}

fn paint_text(canvas: &mut RgbaImage, op: &TextOp, fonts: &FontSet) {
    let Some(font) = fonts.face(op.font.weight) else {
        return;
    };
    let px = op.font.size as f32;
    let x = op.x as f32;
    if x + text_width(font, px, &op.content) > canvas.width() as f32 {
        debug!(text = %op.content, "text runs past the right edge and is clipped");
    }
    draw_text(canvas, font, px, x, op.y as f32, op.color, &op.content);
}

/// Encode the canvas as PNG bytes.
pub fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Color, Dimensions, compute_layout};
    use crate::test_helpers::{album_item, solid_image};

    fn sources() -> SourceImages {
        SourceImages {
            cover: solid_image(64, 64, [200, 0, 0, 255]),
            code: solid_image(64, 16, [0, 0, 0, 255]),
            qr: solid_image(29, 29, [0, 0, 200, 255]),
        }
    }

    #[test]
    fn pixel_span_clips() {
        assert_eq!(pixel_span(-5.0, 10.0, 100), (0, 5));
        assert_eq!(pixel_span(95.4, 10.0, 100), (95, 100));
        assert_eq!(pixel_span(200.0, 10.0, 100), (100, 100));
    }

    #[test]
    fn renders_plan_at_plan_size() {
        let images = sources();
        let plan = compute_layout(
            &album_item(),
            images.cover.dimensions(),
            images.code.dimensions(),
            images.qr.dimensions(),
            400,
            500,
        )
        .unwrap();
        let canvas = render_plan(&plan, &images, &FontSet::empty());
        assert_eq!(canvas.dimensions(), (400, 500));

        // Background corner stays white
        assert_eq!(canvas.get_pixel(0, 0).0, [255, 255, 255, 255]);

        // Center of the cover block is cover-red
        let cover = plan.image(ImageSlot::Cover).unwrap();
        let cx = (cover.x + cover.w / 2.0) as u32;
        let cy = (cover.y + cover.h / 2.0) as u32;
        assert_eq!(canvas.get_pixel(cx, cy).0, [200, 0, 0, 255]);

        // Center of the QR block is QR-blue
        let qr = plan.image(ImageSlot::Qr).unwrap();
        let qx = (qr.x + qr.w / 2.0) as u32;
        let qy = (qr.y + qr.h / 2.0) as u32;
        assert_eq!(canvas.get_pixel(qx, qy).0, [0, 0, 200, 255]);
    }

    #[test]
    fn later_ops_paint_over_earlier_ones() {
        let plan = DrawPlan {
            width: 10,
            height: 10,
            ops: vec![
                DrawOp::Fill(FillOp {
                    color: Color::WHITE,
                    x: 0.0,
                    y: 0.0,
                    w: 10.0,
                    h: 10.0,
                }),
                DrawOp::Fill(FillOp {
                    color: Color::rgb(1, 2, 3),
                    x: 5.0,
                    y: 5.0,
                    w: 20.0,
                    h: 20.0,
                }),
            ],
        };
        let canvas = render_plan(&plan, &sources(), &FontSet::empty());
        assert_eq!(canvas.get_pixel(4, 4).0, [255, 255, 255, 255]);
        assert_eq!(canvas.get_pixel(9, 9).0, [1, 2, 3, 255]);
    }

    #[test]
    fn images_are_stretched_not_cropped() {
        let mut images = sources();
        images.cover = solid_image(100, 10, [0, 200, 0, 255]);
        let plan = DrawPlan {
            width: 50,
            height: 50,
            ops: vec![DrawOp::Image(ImageOp {
                slot: ImageSlot::Cover,
                x: 0.0,
                y: 0.0,
                w: 50.0,
                h: 50.0,
            })],
        };
        let canvas = render_plan(&plan, &images, &FontSet::empty());
        assert_eq!(canvas.get_pixel(25, 0).0, [0, 200, 0, 255]);
        assert_eq!(canvas.get_pixel(25, 49).0, [0, 200, 0, 255]);
    }

    #[test]
    fn encode_png_round_trips_dimensions() {
        let canvas = RgbaImage::from_pixel(12, 7, Rgba([9, 9, 9, 255]));
        let png = encode_png(&canvas).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        let decoded = LoadedImage::decode(&png).unwrap();
        assert_eq!(decoded.dimensions(), Dimensions::new(12, 7));
    }
}
