//! Catalog search client.
//!
//! Sends one search request upstream and normalizes the per-type result
//! lists into a flat list of [`CatalogItem`]s:
//!
//! ```text
//! GET {search_url}?q=blue&type=album,track&limit=12
//! Authorization: Bearer <token>
//!
//! { "albums": { "items": [...] }, "tracks": { "items": [...] } }
//!         │
//!         ▼
//! [album, album, ..., track, track, ...]   (albums, artists, playlists, tracks)
//! ```
//!
//! The bearer token comes from an environment variable. Obtaining or
//! refreshing it is somebody else's job.

use crate::config::{CatalogConfig, CodeConfig, NetworkConfig};
use crate::types::{CatalogItem, ItemType, SearchResponse, join_types};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Search query is missing")]
    MissingQuery,
    #[error("No access token: set the {0} environment variable")]
    MissingToken(String),
    #[error("Invalid search URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Search request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Search failed upstream ({status}): {message}")]
    Upstream { status: u16, message: String },
    #[error("Unexpected search response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Blocking client for the catalog search endpoint.
pub struct CatalogClient {
    client: Client,
    search_url: String,
    token_env: String,
    token: Option<String>,
    limit: u32,
    code: CodeConfig,
}

impl CatalogClient {
    pub fn new(
        catalog: &CatalogConfig,
        code: &CodeConfig,
        network: &NetworkConfig,
        token: Option<String>,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(network.timeout_secs))
            .user_agent(network.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            search_url: catalog.search_url.clone(),
            token_env: catalog.token_env.clone(),
            token: token.filter(|t| !t.trim().is_empty()),
            limit: catalog.limit,
            code: code.clone(),
        })
    }

    /// Build a client whose token is read from `catalog.token_env`.
    pub fn from_env(
        catalog: &CatalogConfig,
        code: &CodeConfig,
        network: &NetworkConfig,
    ) -> Result<Self, CatalogError> {
        let token = std::env::var(&catalog.token_env).ok();
        Self::new(catalog, code, network, token)
    }

    /// Full request URL for a query.
    pub fn search_url(&self, query: &str, types: &[ItemType]) -> Result<Url, CatalogError> {
        let url = Url::parse_with_params(
            &self.search_url,
            &[
                ("q", query.to_string()),
                ("type", join_types(types)),
                ("limit", self.limit.to_string()),
            ],
        )?;
        Ok(url)
    }

    /// Search the catalog. An empty `types` slice searches all types.
    pub fn search(&self, query: &str, types: &[ItemType]) -> Result<SearchResponse, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CatalogError::MissingQuery);
        }
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| CatalogError::MissingToken(self.token_env.clone()))?;

        let url = self.search_url(query, types)?;
        debug!(%url, "searching catalog");
        let response = self.client.get(url).bearer_auth(token).send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(CatalogError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&body),
            });
        }

        let raw: RawSearch = serde_json::from_str(&body)?;
        let results = normalize_results(&raw, &self.code);
        info!(query, count = results.len(), "search complete");
        Ok(SearchResponse::new(query, join_types(types), results))
    }
}

/// Pull `error.message` out of an upstream error body, or fall back to the raw text.
fn upstream_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body.trim().to_string(),
    }
}

// =============================================================================
// Upstream response shape
// =============================================================================

/// Raw search response. Only the fields we normalize are modeled; every
/// list is optional because only the requested types are present.
#[derive(Debug, Default, Deserialize)]
pub struct RawSearch {
    #[serde(default)]
    pub albums: Option<RawPage>,
    #[serde(default)]
    pub artists: Option<RawPage>,
    #[serde(default)]
    pub playlists: Option<RawPage>,
    #[serde(default)]
    pub tracks: Option<RawPage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawPage {
    /// Upstream occasionally returns `null` entries (e.g. removed playlists).
    #[serde(default)]
    pub items: Vec<Option<RawItem>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub external_urls: Option<RawExternalUrls>,
    #[serde(default)]
    pub images: Option<Vec<RawImage>>,
    #[serde(default)]
    pub artists: Option<Vec<RawNamed>>,
    /// Tracks carry their cover on the album.
    #[serde(default)]
    pub album: Option<RawAlbumRef>,
    #[serde(default)]
    pub owner: Option<RawOwner>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawImage {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct RawNamed {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawAlbumRef {
    #[serde(default)]
    pub images: Option<Vec<RawImage>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawOwner {
    #[serde(default)]
    pub display_name: Option<String>,
}

// =============================================================================
// Normalization
// =============================================================================

/// Flatten a raw response into items: albums, artists, playlists, tracks.
pub fn normalize_results(raw: &RawSearch, code: &CodeConfig) -> Vec<CatalogItem> {
    let pages = [
        (ItemType::Album, &raw.albums),
        (ItemType::Artist, &raw.artists),
        (ItemType::Playlist, &raw.playlists),
        (ItemType::Track, &raw.tracks),
    ];

    pages
        .into_iter()
        .filter_map(|(item_type, page)| page.as_ref().map(|p| (item_type, p)))
        .flat_map(|(item_type, page)| {
            page.items
                .iter()
                .flatten()
                .map(move |item| normalize_item(item, item_type, code))
        })
        .collect()
}

/// Map one upstream entry to a [`CatalogItem`].
pub fn normalize_item(item: &RawItem, item_type: ItemType, code: &CodeConfig) -> CatalogItem {
    let (cover_url, subtitle) = match item_type {
        ItemType::Album | ItemType::Track => {
            let images = match &item.album {
                Some(album) => album.images.as_deref(),
                None => item.images.as_deref(),
            };
            (first_image(images), artist_names(item.artists.as_deref()))
        }
        ItemType::Artist => (
            first_image(item.images.as_deref()),
            Some("Artist".to_string()),
        ),
        ItemType::Playlist => {
            let owner = item
                .owner
                .as_ref()
                .and_then(|o| o.display_name.as_deref())
                .filter(|n| !n.is_empty());
            let subtitle = match owner {
                Some(name) => format!("Playlist • {name}"),
                None => "Playlist".to_string(),
            };
            (first_image(item.images.as_deref()), Some(subtitle))
        }
    };

    let uri = item.uri.clone().filter(|u| !u.is_empty());
    let code_url = uri.as_deref().map(|u| build_code_url(u, code));

    CatalogItem {
        id: item.id.clone(),
        item_type,
        name: item.name.clone(),
        subtitle,
        url: item.external_urls.as_ref().and_then(|u| u.spotify.clone()),
        uri,
        cover_url,
        code_url,
    }
}

fn first_image(images: Option<&[RawImage]>) -> Option<String> {
    images.and_then(|imgs| imgs.first()).map(|img| img.url.clone())
}

fn artist_names(artists: Option<&[RawNamed]>) -> Option<String> {
    let names: Vec<&str> = artists?
        .iter()
        .map(|a| a.name.as_str())
        .filter(|n| !n.is_empty())
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join(", "))
    }
}

/// Scannable code image URL for a catalog URI.
///
/// ```
/// use covercard::catalog::build_code_url;
/// use covercard::config::CodeConfig;
///
/// let url = build_code_url("spotify:album:abc", &CodeConfig::default());
/// assert_eq!(
///     url,
///     "https://scannables.scdn.co/uri/plain/png/000000/white/1080/spotify%3Aalbum%3Aabc"
/// );
/// ```
pub fn build_code_url(uri: &str, code: &CodeConfig) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(uri.as_bytes()).collect();
    format!(
        "{}/{}/{}/{}/{}",
        code.base_url.trim_end_matches('/'),
        code.background,
        code.bar_color,
        code.size,
        encoded
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "albums": { "items": [
            {
                "id": "alb1",
                "name": "Blue",
                "uri": "spotify:album:alb1",
                "external_urls": { "spotify": "https://open.spotify.com/album/alb1" },
                "images": [ { "url": "https://i.example/alb1-640.jpg" }, { "url": "https://i.example/alb1-64.jpg" } ],
                "artists": [ { "name": "Joni Mitchell" } ]
            }
        ]},
        "artists": { "items": [
            { "id": "art1", "name": "Joni Mitchell", "uri": "spotify:artist:art1", "images": [] }
        ]},
        "playlists": { "items": [
            null,
            {
                "id": "pl1",
                "name": "Folk Mornings",
                "uri": "spotify:playlist:pl1",
                "images": [ { "url": "https://i.example/pl1.jpg" } ],
                "owner": { "display_name": "Spotify" }
            },
            { "id": "pl2", "name": "Untitled", "owner": {} }
        ]},
        "tracks": { "items": [
            {
                "id": "trk1",
                "name": "A Case of You",
                "uri": "spotify:track:trk1",
                "external_urls": { "spotify": "https://open.spotify.com/track/trk1" },
                "album": { "images": [ { "url": "https://i.example/alb1-640.jpg" } ] },
                "artists": [ { "name": "Joni Mitchell" }, { "name": "James Taylor" } ]
            }
        ]}
    }"#;

    fn normalized() -> Vec<CatalogItem> {
        let raw: RawSearch = serde_json::from_str(FIXTURE).unwrap();
        normalize_results(&raw, &CodeConfig::default())
    }

    fn client(token: Option<&str>) -> CatalogClient {
        CatalogClient::new(
            &CatalogConfig::default(),
            &CodeConfig::default(),
            &NetworkConfig::default(),
            token.map(String::from),
        )
        .unwrap()
    }

    // =========================================================================
    // Normalization
    // =========================================================================

    #[test]
    fn results_are_grouped_by_type_in_order_and_nulls_skipped() {
        let ids: Vec<_> = normalized().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["alb1", "art1", "pl1", "pl2", "trk1"]);
    }

    #[test]
    fn album_uses_own_first_image_and_artist_subtitle() {
        let album = &normalized()[0];
        assert_eq!(album.item_type, ItemType::Album);
        assert_eq!(album.cover_url.as_deref(), Some("https://i.example/alb1-640.jpg"));
        assert_eq!(album.subtitle.as_deref(), Some("Joni Mitchell"));
        assert_eq!(
            album.url.as_deref(),
            Some("https://open.spotify.com/album/alb1")
        );
    }

    #[test]
    fn track_uses_album_image_and_joined_artists() {
        let track = &normalized()[4];
        assert_eq!(track.item_type, ItemType::Track);
        assert_eq!(track.cover_url.as_deref(), Some("https://i.example/alb1-640.jpg"));
        assert_eq!(
            track.subtitle.as_deref(),
            Some("Joni Mitchell, James Taylor")
        );
    }

    #[test]
    fn artist_subtitle_is_fixed_and_missing_image_is_none() {
        let artist = &normalized()[1];
        assert_eq!(artist.subtitle.as_deref(), Some("Artist"));
        assert!(artist.cover_url.is_none());
        assert!(artist.url.is_none());
    }

    #[test]
    fn playlist_subtitle_includes_owner_when_known() {
        let items = normalized();
        assert_eq!(items[2].subtitle.as_deref(), Some("Playlist • Spotify"));
        assert_eq!(items[3].subtitle.as_deref(), Some("Playlist"));
    }

    #[test]
    fn code_url_only_when_uri_present() {
        let items = normalized();
        assert_eq!(
            items[0].code_url.as_deref(),
            Some("https://scannables.scdn.co/uri/plain/png/000000/white/1080/spotify%3Aalbum%3Aalb1")
        );
        assert!(items[3].code_url.is_none());
    }

    #[test]
    fn only_requested_sections_are_present() {
        let raw: RawSearch =
            serde_json::from_str(r#"{ "tracks": { "items": [ { "id": "t", "name": "T" } ] } }"#)
                .unwrap();
        let items = normalize_results(&raw, &CodeConfig::default());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_type, ItemType::Track);
        assert!(items[0].subtitle.is_none());
    }

    #[test]
    fn code_url_respects_config() {
        let code = CodeConfig {
            base_url: "https://codes.example/png/".into(),
            background: "ffffff".into(),
            bar_color: "black".into(),
            size: 640,
        };
        assert_eq!(
            build_code_url("spotify:track:x", &code),
            "https://codes.example/png/ffffff/black/640/spotify%3Atrack%3Ax"
        );
    }

    // =========================================================================
    // Client
    // =========================================================================

    #[test]
    fn empty_query_is_rejected_before_any_request() {
        let err = client(Some("token")).search("   ", &[]).unwrap_err();
        assert!(matches!(err, CatalogError::MissingQuery));
    }

    #[test]
    fn missing_token_names_the_env_var() {
        let err = client(None).search("blue", &[]).unwrap_err();
        match err {
            CatalogError::MissingToken(var) => assert_eq!(var, "COVERCARD_TOKEN"),
            other => panic!("expected MissingToken, got {other:?}"),
        }
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let err = client(Some("  ")).search("blue", &[]).unwrap_err();
        assert!(matches!(err, CatalogError::MissingToken(_)));
    }

    #[test]
    fn search_url_encodes_query_and_types() {
        let url = client(Some("t"))
            .search_url("joni & friends", &[ItemType::Album, ItemType::Track])
            .unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "joni & friends".to_string()),
                ("type".to_string(), "album,track".to_string()),
                ("limit".to_string(), "12".to_string()),
            ]
        );
        assert!(url.as_str().starts_with("https://api.spotify.com/v1/search?"));
    }

    #[test]
    fn empty_types_search_everything() {
        let url = client(Some("t")).search_url("x", &[]).unwrap();
        let types = url
            .query_pairs()
            .find(|(k, _)| k == "type")
            .map(|(_, v)| v.into_owned());
        assert_eq!(types.as_deref(), Some("album,artist,playlist,track"));
    }

    #[test]
    fn upstream_message_prefers_error_field() {
        assert_eq!(
            upstream_message(r#"{"error":{"status":401,"message":"The access token expired"}}"#),
            "The access token expired"
        );
        assert_eq!(upstream_message("  gateway timeout \n"), "gateway timeout");
    }
}
