//! Draw plan types.
//!
//! A [`DrawPlan`] describes *what* to paint, not *how*. It is the interface
//! between the layout engine (which decides where everything goes) and the
//! surface renderer (which does the pixel work). Operations are stored
//! back-to-front: a renderer paints them in order and later operations may
//! overlap earlier ones.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Pixel size of a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width divided by height.
    pub fn aspect_ratio(self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid color '{0}' (expected #rrggbb)")]
pub struct InvalidColor(pub String);

/// Opaque RGB color, written as `#rrggbb` in config and plan dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 0xff]
    }
}

impl FromStr for Color {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(InvalidColor(s.to_string()));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        match (channel(0), channel(2), channel(4)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Color::rgb(r, g, b)),
            _ => Err(InvalidColor(s.to_string())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Color {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Which of the three source images an image operation draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSlot {
    Cover,
    Code,
    Qr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Font {
    /// Pixel size (em height).
    pub size: f64,
    pub weight: FontWeight,
}

/// Solid rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillOp {
    pub color: Color,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Source image stretched into the rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageOp {
    pub slot: ImageSlot,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl ImageOp {
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
}

/// Single line of left-aligned text. `y` is the alphabetic baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOp {
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub font: Font,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DrawOp {
    Fill(FillOp),
    Image(ImageOp),
    Text(TextOp),
}

/// Ordered draw operations for a canvas of `width × height` pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawPlan {
    pub width: u32,
    pub height: u32,
    pub ops: Vec<DrawOp>,
}

impl DrawPlan {
    /// The image operation for `slot`, if the plan draws it.
    pub fn image(&self, slot: ImageSlot) -> Option<&ImageOp> {
        self.images().find(|op| op.slot == slot)
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageOp> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Image(image) => Some(image),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextOp> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(text) => Some(text),
            _ => None,
        })
    }
}
