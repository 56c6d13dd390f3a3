//! Image loading trait and shared types.
//!
//! The [`ImageSource`] trait is the one operation composition needs from the
//! outside world: turn a URL into a decoded raster. The production
//! implementation is [`HttpSource`](super::http_source::HttpSource); tests use
//! the in-memory mock below.

use crate::layout::Dimensions;
use image::{Rgba, RgbaImage};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error("No {0} image URL for the selected item")]
    MissingUrl(&'static str),
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("Could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not decode image from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },
}

/// Grey used for items that have no cover art.
const PLACEHOLDER_COLOR: Rgba<u8> = Rgba([0xcb, 0xd5, 0xe1, 0xff]);
const PLACEHOLDER_SIDE: u32 = 640;

/// A decoded RGBA raster.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    pixels: RgbaImage,
}

impl LoadedImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Decode any format the `image` crate was built with (JPEG, PNG, WebP).
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        Ok(Self::new(image::load_from_memory(bytes)?.to_rgba8()))
    }

    /// Neutral square used in place of missing cover art.
    pub fn placeholder() -> Self {
        Self::new(RgbaImage::from_pixel(
            PLACEHOLDER_SIDE,
            PLACEHOLDER_SIDE,
            PLACEHOLDER_COLOR,
        ))
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.pixels.width(), self.pixels.height())
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Trait for image loaders.
///
/// `Sync` so the three loads of a composition can run on worker threads.
pub trait ImageSource: Sync {
    /// Fetch and decode the image at `url`.
    fn load(&self, url: &str) -> Result<LoadedImage, ImageLoadError>;
}
