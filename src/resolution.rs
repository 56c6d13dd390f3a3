//! Output resolution selection.
//!
//! A resolution comes from a named preset (or a raw `WxH` string) and can be
//! overridden per axis by custom values. Custom values that are missing, blank
//! or not a positive number fall back to the preset's value for that axis.
//! The final pair must be positive and at most [`MAX_SIDE`] on both axes or
//! the request is rejected with [`ResolutionError::InvalidDimensions`] before
//! any image is loaded.
//!
//! | Preset | Size |
//! |---|---|
//! | `square` | 1080×1080 |
//! | `portrait` | 1080×1350 |
//! | `story` | 1080×1920 |
//! | `landscape` | 1920×1080 |
//! | `poster` | 2480×3508 |

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Invalid resolution: {0}")]
    InvalidDimensions(String),
}

/// Largest accepted canvas side in pixels (a 10000×10000 RGBA canvas is 400 MB).
pub const MAX_SIDE: u32 = 10_000;

/// Target canvas size in pixels. Both axes are in `1..=MAX_SIDE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Result<Self, ResolutionError> {
        if width == 0 || height == 0 {
            return Err(ResolutionError::InvalidDimensions(format!(
                "{width}x{height} (both sides must be positive)"
            )));
        }
        if width > MAX_SIDE || height > MAX_SIDE {
            return Err(ResolutionError::InvalidDimensions(format!(
                "{width}x{height} (sides are limited to {MAX_SIDE}px)"
            )));
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Named presets, in display order.
pub const PRESETS: &[(&str, Resolution)] = &[
    ("square", Resolution { width: 1080, height: 1080 }),
    ("portrait", Resolution { width: 1080, height: 1350 }),
    ("story", Resolution { width: 1080, height: 1920 }),
    ("landscape", Resolution { width: 1920, height: 1080 }),
    ("poster", Resolution { width: 2480, height: 3508 }),
];

/// Look up a preset by name, or parse a literal `WxH` string.
///
/// Returns `None` for unknown names and malformed strings; zero sides are
/// returned as-is so the caller's validation reports them.
pub fn preset_dimensions(preset: &str) -> Option<(u32, u32)> {
    let preset = preset.trim();
    if let Some((_, res)) = PRESETS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(preset))
    {
        return Some((res.width, res.height));
    }
    let (w, h) = preset.split_once(['x', 'X'])?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

/// A preset plus optional per-axis custom overrides, as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionRequest {
    pub preset: String,
    pub custom_width: Option<String>,
    pub custom_height: Option<String>,
}

impl ResolutionRequest {
    pub fn preset(preset: impl Into<String>) -> Self {
        Self {
            preset: preset.into(),
            ..Self::default()
        }
    }

    /// Resolve to a validated [`Resolution`].
    pub fn resolve(&self) -> Result<Resolution, ResolutionError> {
        let (preset_w, preset_h) = preset_dimensions(&self.preset).unwrap_or((0, 0));
        let width = custom_value(self.custom_width.as_deref()).unwrap_or(preset_w);
        let height = custom_value(self.custom_height.as_deref()).unwrap_or(preset_h);

        if width == 0 || height == 0 {
            return Err(ResolutionError::InvalidDimensions(format!(
                "preset '{}' with custom {}x{} does not give a positive size",
                self.preset,
                self.custom_width.as_deref().unwrap_or("-"),
                self.custom_height.as_deref().unwrap_or("-"),
            )));
        }
        Resolution::new(width, height)
    }
}

/// A custom value only counts when it is a positive whole number.
fn custom_value(raw: Option<&str>) -> Option<u32> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|&v| v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_preset_resolves() {
        let res = ResolutionRequest::preset("portrait").resolve().unwrap();
        assert_eq!(res, Resolution { width: 1080, height: 1350 });
    }

    #[test]
    fn literal_preset_resolves() {
        let res = ResolutionRequest::preset("800x600").resolve().unwrap();
        assert_eq!(res.to_string(), "800x600");
    }

    #[test]
    fn custom_width_overrides_one_axis() {
        let req = ResolutionRequest {
            preset: "square".into(),
            custom_width: Some("2000".into()),
            custom_height: None,
        };
        assert_eq!(req.resolve().unwrap(), Resolution { width: 2000, height: 1080 });
    }

    #[test]
    fn unusable_custom_values_fall_back_to_preset() {
        let req = ResolutionRequest {
            preset: "story".into(),
            custom_width: Some("abc".into()),
            custom_height: Some("0".into()),
        };
        assert_eq!(req.resolve().unwrap(), Resolution { width: 1080, height: 1920 });
    }

    #[test]
    fn unknown_preset_without_custom_is_invalid() {
        let err = ResolutionRequest::preset("huge").resolve().unwrap_err();
        assert!(matches!(err, ResolutionError::InvalidDimensions(_)));
    }

    #[test]
    fn unknown_preset_with_both_custom_values_is_fine() {
        let req = ResolutionRequest {
            preset: String::new(),
            custom_width: Some("640".into()),
            custom_height: Some(" 480 ".into()),
        };
        assert_eq!(req.resolve().unwrap(), Resolution { width: 640, height: 480 });
    }

    #[test]
    fn zero_sided_preset_is_invalid() {
        assert!(ResolutionRequest::preset("0x500").resolve().is_err());
        assert!(Resolution::new(500, 0).is_err());
    }

    #[test]
    fn negative_custom_value_is_ignored() {
        let req = ResolutionRequest {
            preset: "0x0".into(),
            custom_width: Some("-100".into()),
            custom_height: Some("100".into()),
        };
        assert!(req.resolve().is_err());
    }

    #[test]
    fn sides_above_limit_are_invalid() {
        assert!(Resolution::new(MAX_SIDE, MAX_SIDE).is_ok());
        assert!(Resolution::new(MAX_SIDE + 1, 100).is_err());
        assert!(Resolution::new(100, MAX_SIDE + 1).is_err());
    }

    #[test]
    fn huge_custom_values_are_invalid_not_ignored() {
        for (w, h) in [("4294967295", "4294967295"), ("60000", "60000"), ("1080", "10001")] {
            let req = ResolutionRequest {
                preset: "square".into(),
                custom_width: Some(w.into()),
                custom_height: Some(h.into()),
            };
            let err = req.resolve().unwrap_err();
            assert!(matches!(err, ResolutionError::InvalidDimensions(_)), "{w}x{h}");
        }
        assert!(ResolutionRequest::preset("20000x100").resolve().is_err());
    }
}
