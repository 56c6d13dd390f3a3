//! Shared types used across search, selection and composition.
//!
//! [`CatalogItem`] is serialized to JSON between CLI invocations (last search
//! results, current selection), so its field names are part of the on-disk
//! format. Keys use camelCase to match the search response shape.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of catalog entry a search result represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Album,
    Artist,
    Playlist,
    Track,
}

impl ItemType {
    /// All types, in the order results are listed.
    pub const ALL: [ItemType; 4] = [
        ItemType::Album,
        ItemType::Artist,
        ItemType::Playlist,
        ItemType::Track,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Album => "album",
            ItemType::Artist => "artist",
            ItemType::Playlist => "playlist",
            ItemType::Track => "track",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown item type '{0}' (expected album, artist, playlist or track)")]
pub struct UnknownItemType(pub String);

impl FromStr for ItemType {
    type Err = UnknownItemType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "album" => Ok(ItemType::Album),
            "artist" => Ok(ItemType::Artist),
            "playlist" => Ok(ItemType::Playlist),
            "track" => Ok(ItemType::Track),
            other => Err(UnknownItemType(other.to_string())),
        }
    }
}

/// Comma-join requested types for the search endpoint.
///
/// An empty selection means "everything", same as checking no filter box.
pub fn join_types(types: &[ItemType]) -> String {
    let types: &[ItemType] = if types.is_empty() {
        &ItemType::ALL
    } else {
        types
    };
    types
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// A single normalized search result.
///
/// Immutable once selected. Optional fields are absent when the upstream
/// entry did not carry them (e.g. an artist without images).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Public web link to the item. Encoded into the QR code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Catalog URI (`spotify:album:…`). Encoded into the scannable code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_url: Option<String>,
}

impl CatalogItem {
    /// Subtitle if present and not blank.
    pub fn display_subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Normalized response of a catalog search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    /// Comma-joined requested types, as sent upstream.
    #[serde(rename = "type")]
    pub types: String,
    pub count: usize,
    pub results: Vec<CatalogItem>,
}

impl SearchResponse {
    pub fn new(query: impl Into<String>, types: impl Into<String>, results: Vec<CatalogItem>) -> Self {
        Self {
            query: query.into(),
            types: types.into(),
            count: results.len(),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_type_parses_case_insensitively() {
        assert_eq!("Album".parse::<ItemType>().unwrap(), ItemType::Album);
        assert_eq!(" track ".parse::<ItemType>().unwrap(), ItemType::Track);
        assert!("podcast".parse::<ItemType>().is_err());
    }

    #[test]
    fn join_types_defaults_to_all() {
        assert_eq!(join_types(&[]), "album,artist,playlist,track");
        assert_eq!(
            join_types(&[ItemType::Track, ItemType::Album]),
            "track,album"
        );
    }

    #[test]
    fn catalog_item_uses_camel_case_keys() {
        let item = CatalogItem {
            id: "abc".into(),
            item_type: ItemType::Album,
            name: "Blue".into(),
            subtitle: Some("Joni Mitchell".into()),
            url: None,
            uri: Some("spotify:album:abc".into()),
            cover_url: Some("https://i.example/cover.jpg".into()),
            code_url: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "album");
        assert_eq!(json["coverUrl"], "https://i.example/cover.jpg");
        assert!(json.get("url").is_none());
        assert!(json.get("codeUrl").is_none());

        let back: CatalogItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn blank_subtitle_is_not_displayed() {
        let mut item = crate::test_helpers::album_item();
        item.subtitle = Some("   ".into());
        assert_eq!(item.display_subtitle(), None);
        item.subtitle = None;
        assert_eq!(item.display_subtitle(), None);
    }

    #[test]
    fn search_response_counts_results() {
        let resp = SearchResponse::new("blue", "album", vec![crate::test_helpers::album_item()]);
        assert_eq!(resp.count, 1);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["type"], "album");
    }
}
