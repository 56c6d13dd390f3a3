//! Shared test utilities for the covercard test suite.
//!
//! Provides fixture catalog items and in-memory images so tests never touch
//! the network.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let item = album_item();
//! let source = MockSource::new()
//!     .with_image(COVER_URL, solid_image(640, 640, [200, 0, 0, 255]))
//!     .with_image(CODE_URL, solid_image(640, 160, [0, 0, 0, 255]));
//! ```

use crate::imaging::LoadedImage;
use crate::types::{CatalogItem, ItemType};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

pub const COVER_URL: &str = "https://i.example/blue-640.jpg";
pub const CODE_URL: &str =
    "https://scannables.scdn.co/uri/plain/png/000000/white/1080/spotify%3Aalbum%3Aalb1";

/// An album with every field set.
pub fn album_item() -> CatalogItem {
    CatalogItem {
        id: "alb1".into(),
        item_type: ItemType::Album,
        name: "Blue".into(),
        subtitle: Some("Joni Mitchell".into()),
        url: Some("https://open.spotify.com/album/alb1".into()),
        uri: Some("spotify:album:alb1".into()),
        cover_url: Some(COVER_URL.into()),
        code_url: Some(CODE_URL.into()),
    }
}

/// An artist: fixed subtitle, no cover.
pub fn artist_item() -> CatalogItem {
    CatalogItem {
        id: "art1".into(),
        item_type: ItemType::Artist,
        name: "Joni Mitchell".into(),
        subtitle: Some("Artist".into()),
        url: Some("https://open.spotify.com/artist/art1".into()),
        uri: Some("spotify:artist:art1".into()),
        cover_url: None,
        code_url: Some(
            "https://scannables.scdn.co/uri/plain/png/000000/white/1080/spotify%3Aartist%3Aart1"
                .into(),
        ),
    }
}

pub fn track_item() -> CatalogItem {
    CatalogItem {
        id: "trk1".into(),
        item_type: ItemType::Track,
        name: "A Case of You".into(),
        subtitle: Some("Joni Mitchell".into()),
        url: Some("https://open.spotify.com/track/trk1".into()),
        uri: Some("spotify:track:trk1".into()),
        cover_url: Some(COVER_URL.into()),
        code_url: Some(
            "https://scannables.scdn.co/uri/plain/png/000000/white/1080/spotify%3Atrack%3Atrk1"
                .into(),
        ),
    }
}

/// A single-color image of the given size.
pub fn solid_image(width: u32, height: u32, rgba: [u8; 4]) -> LoadedImage {
    LoadedImage::new(RgbaImage::from_pixel(width, height, Rgba(rgba)))
}

/// PNG-encoded bytes of a grey image of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([120, 120, 120, 255]));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}
