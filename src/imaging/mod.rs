//! Image I/O and pixel work — everything the pure layout engine leaves out.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Load** | `reqwest` (blocking, timeout) or local file → `image::load_from_memory` |
//! | **QR** | `qrcode` symbol, drawn module-by-module into an `RgbaImage` |
//! | **Render** | `image::imageops` for rasters, `rusttype` for text |
//! | **Encode** | `image` PNG encoder |
//!
//! The module is split into:
//! - **Source**: [`ImageSource`] trait + [`LoadedImage`]
//! - **HTTP source**: [`HttpSource`], the production loader
//! - **QR**: [`generate_qr_image`]
//! - **Text**: [`FontSet`] loading and glyph drawing
//! - **Render**: [`render_plan`] + [`encode_png`]

pub mod http_source;
pub mod qr;
pub mod render;
pub mod source;
pub mod text;

pub use http_source::HttpSource;
pub use qr::{CodeGenerationError, MAX_QR_SIZE, QrStyle, generate_qr_image};
pub use render::{SourceImages, encode_png, render_plan};
pub use source::{ImageLoadError, ImageSource, LoadedImage};
pub use text::FontSet;
