use std::fmt;

use serde::{Deserialize, Serialize};

/// Dominant color used when a track has no primary color.
pub const FALLBACK_DOMINANT: &str = "#6750A4";
/// Accent color used when a track has no secondary color.
pub const FALLBACK_ACCENT: &str = "#E8DEF8";

/// A CSS-style color string such as `#7b68ee`.
///
/// The string is kept verbatim; `rgb` parses it on demand for renderers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeColor(String);

impl ThemeColor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse `#RRGGBB` or `#RGB`. Anything else yields `None`.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.0.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some((r, g, b))
            }
            3 => {
                let mut out = [0u8; 3];
                for (slot, c) in out.iter_mut().zip(hex.chars()) {
                    let v = c.to_digit(16)? as u8;
                    *slot = v * 17;
                }
                Some((out[0], out[1], out[2]))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ThemeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ThemeColor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The pair of colors the player derives from the current track.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    pub dominant: ThemeColor,
    pub accent: ThemeColor,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            dominant: ThemeColor::new(FALLBACK_DOMINANT),
            accent: ThemeColor::new(FALLBACK_ACCENT),
        }
    }
}

/// An immutable song fixture.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Length in seconds. Used when the audio device never reports metadata.
    pub duration: u32,
    /// Cover image reference, opaque to the player.
    pub cover: String,
    /// Audio source reference handed to the audio device.
    pub source: String,
    #[serde(default)]
    pub primary_color: Option<ThemeColor>,
    #[serde(default)]
    pub secondary_color: Option<ThemeColor>,
}

impl Track {
    /// Theme derived from this track, falling back per color.
    pub fn theme(&self) -> Theme {
        let fallback = Theme::default();
        Theme {
            dominant: self.primary_color.clone().unwrap_or(fallback.dominant),
            accent: self.secondary_color.clone().unwrap_or(fallback.accent),
        }
    }
}
