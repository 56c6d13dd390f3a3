//! Application configuration.
//!
//! Handles loading, validating, and merging `covercard.toml`. Stock defaults
//! are overridden by whatever keys the user file sets; a missing file simply
//! means "all defaults".
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! state_dir = ".covercard"      # Search results, selection, history, cache
//!
//! [catalog]
//! search_url = "https://api.spotify.com/v1/search"
//! token_env = "COVERCARD_TOKEN" # Env var holding the bearer token
//! limit = 12                    # Results per type
//! default_types = ["album", "artist", "playlist", "track"]
//!
//! [code]
//! base_url = "https://scannables.scdn.co/uri/plain/png"
//! background = "000000"
//! bar_color = "white"
//! size = 1080
//!
//! [output]
//! resolution = "portrait"       # Preset name or "WxH"
//! file_prefix = "spotify"
//! directory = "."
//!
//! [qr]
//! size = 300
//! dark = "#0b1020"
//! light = "#ffffff"
//!
//! [colors]
//! background = "#ffffff"
//! title = "#0b1020"
//! subtitle = "#334155"
//!
//! [fonts]
//! # regular = "/path/to/Regular.ttf"
//! # bold = "/path/to/Bold.ttf"
//!
//! [network]
//! timeout_secs = 20
//! user_agent = "covercard"
//! cache = true
//!
//! [history]
//! max_entries = 10
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{MAX_QR_SIZE, QrStyle};
use crate::layout::{Color, LayoutStyle};
use crate::resolution::ResolutionRequest;
use crate::types::ItemType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "covercard.toml";

/// Application configuration loaded from `covercard.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Directory for last search results, current selection, history and cache.
    pub state_dir: String,
    /// Catalog search endpoint settings.
    pub catalog: CatalogConfig,
    /// Scannable code image URL settings.
    pub code: CodeConfig,
    /// Default output resolution and file naming.
    pub output: OutputConfig,
    /// Generated QR code size and colors.
    pub qr: QrConfig,
    /// Composite background and text colors.
    pub colors: ColorsConfig,
    /// Font files for title and subtitle.
    pub fonts: FontsConfig,
    /// HTTP client settings.
    pub network: NetworkConfig,
    /// Search history settings.
    pub history: HistoryConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_dir: ".covercard".to_string(),
            catalog: CatalogConfig::default(),
            code: CodeConfig::default(),
            output: OutputConfig::default(),
            qr: QrConfig::default(),
            colors: ColorsConfig::default(),
            fonts: FontsConfig::default(),
            network: NetworkConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.state_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "state_dir must not be empty".into(),
            ));
        }
        if !(1..=50).contains(&self.catalog.limit) {
            return Err(ConfigError::Validation(
                "catalog.limit must be 1-50".into(),
            ));
        }
        if self.code.size == 0 {
            return Err(ConfigError::Validation("code.size must be non-zero".into()));
        }
        if self.qr.size == 0 || self.qr.size > MAX_QR_SIZE {
            return Err(ConfigError::Validation(format!(
                "qr.size must be 1-{MAX_QR_SIZE}"
            )));
        }
        if self.qr.dark == self.qr.light {
            return Err(ConfigError::Validation(
                "qr.dark and qr.light must differ".into(),
            ));
        }
        if self.network.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "network.timeout_secs must be non-zero".into(),
            ));
        }
        if self.history.max_entries == 0 {
            return Err(ConfigError::Validation(
                "history.max_entries must be non-zero".into(),
            ));
        }
        ResolutionRequest::preset(&self.output.resolution)
            .resolve()
            .map_err(|e| ConfigError::Validation(format!("output.resolution: {e}")))?;
        Ok(())
    }

    pub fn state_dir(&self) -> PathBuf {
        PathBuf::from(&self.state_dir)
    }

    pub fn layout_style(&self) -> LayoutStyle {
        LayoutStyle {
            background: self.colors.background,
            title: self.colors.title,
            subtitle: self.colors.subtitle,
        }
    }

    pub fn qr_style(&self) -> QrStyle {
        QrStyle {
            size: self.qr.size,
            dark: self.qr.dark,
            light: self.qr.light,
        }
    }
}

/// Catalog search endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Search endpoint URL.
    pub search_url: String,
    /// Name of the environment variable holding the bearer token.
    pub token_env: String,
    /// Maximum results per item type.
    pub limit: u32,
    /// Types searched when none are given on the command line.
    pub default_types: Vec<ItemType>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            search_url: "https://api.spotify.com/v1/search".to_string(),
            token_env: "COVERCARD_TOKEN".to_string(),
            limit: 12,
            default_types: ItemType::ALL.to_vec(),
        }
    }
}

/// Scannable code image URL: `{base_url}/{background}/{bar_color}/{size}/{uri}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodeConfig {
    pub base_url: String,
    /// Background as 6 hex digits without `#`.
    pub background: String,
    /// Bar color name or hex, as understood by the code service.
    pub bar_color: String,
    /// Requested image width in pixels.
    pub size: u32,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://scannables.scdn.co/uri/plain/png".to_string(),
            background: "000000".to_string(),
            bar_color: "white".to_string(),
            size: 1080,
        }
    }
}

/// Default output resolution and file naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Preset name (`square`, `portrait`, `story`, `landscape`, `poster`) or `WxH`.
    pub resolution: String,
    /// Prefix of generated file names: `{prefix}-{type}-{id}.png`.
    pub file_prefix: String,
    /// Directory composites are written to.
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            resolution: "portrait".to_string(),
            file_prefix: "spotify".to_string(),
            directory: ".".to_string(),
        }
    }
}

/// Generated QR code settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QrConfig {
    /// Raster side in pixels before layout scaling.
    pub size: u32,
    pub dark: Color,
    pub light: Color,
}

impl Default for QrConfig {
    fn default() -> Self {
        let style = QrStyle::default();
        Self {
            size: style.size,
            dark: style.dark,
            light: style.light,
        }
    }
}

/// Composite colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorsConfig {
    pub background: Color,
    pub title: Color,
    pub subtitle: Color,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        let style = LayoutStyle::default();
        Self {
            background: style.background,
            title: style.title,
            subtitle: style.subtitle,
        }
    }
}

/// Font files. When unset, common system font locations are tried.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<String>,
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// Per-request timeout. A stalled fetch fails instead of hanging.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Keep downloaded images in `<state_dir>/cache`.
    pub cache: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            user_agent: concat!("covercard/", env!("CARGO_PKG_VERSION")).to_string(),
            cache: true,
        }
    }
}

/// Search history settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// Number of distinct queries kept, newest first.
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_entries: 10 }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AppConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `covercard.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# covercard configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Directory for last search results, current selection, history and image cache.
state_dir = ".covercard"

# ---------------------------------------------------------------------------
# Catalog search
# ---------------------------------------------------------------------------
[catalog]
search_url = "https://api.spotify.com/v1/search"

# Environment variable holding the bearer token for the search endpoint.
# covercard never exchanges credentials itself.
token_env = "COVERCARD_TOKEN"

# Maximum results per item type (1-50).
limit = 12

# Types searched when --type is not given.
default_types = ["album", "artist", "playlist", "track"]

# ---------------------------------------------------------------------------
# Scannable code images: {base_url}/{background}/{bar_color}/{size}/{uri}
# ---------------------------------------------------------------------------
[code]
base_url = "https://scannables.scdn.co/uri/plain/png"
background = "000000"
bar_color = "white"
size = 1080

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Preset (square, portrait, story, landscape, poster) or "WxH", sides up to 10000.
resolution = "portrait"

# Files are named {file_prefix}-{type}-{id}.png
file_prefix = "spotify"

# Where composites are written.
directory = "."

# ---------------------------------------------------------------------------
# QR code
# ---------------------------------------------------------------------------
[qr]
# Raster side in pixels, 1-4096.
size = 300
dark = "#0b1020"
light = "#ffffff"

# ---------------------------------------------------------------------------
# Composite colors
# ---------------------------------------------------------------------------
[colors]
background = "#ffffff"
title = "#0b1020"
subtitle = "#334155"

# ---------------------------------------------------------------------------
# Fonts (TrueType/OpenType). Unset = try common system fonts.
# ---------------------------------------------------------------------------
[fonts]
# regular = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"
# bold = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"

# ---------------------------------------------------------------------------
# Network
# ---------------------------------------------------------------------------
[network]
# Per-request timeout in seconds.
timeout_secs = 20

# Cache downloaded images in <state_dir>/cache.
cache = true

# ---------------------------------------------------------------------------
# Search history
# ---------------------------------------------------------------------------
[history]
max_entries = 10
"##
}
