//! Configuration types and validation for footer redaction

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Recommended caller-facing bounds for the footer height, in points.
/// 1 cm is roughly 28 points; typical footers sit in the 60-90 range.
pub const MIN_FOOTER_HEIGHT: f64 = 10.0;
pub const MAX_FOOTER_HEIGHT: f64 = 200.0;

/// Default footer height in points.
pub const DEFAULT_FOOTER_HEIGHT: f64 = 60.0;

/// Configuration for the core redaction transform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionConfig {
    /// Height of the band to remove, measured upward from the bottom
    /// edge of each page, in points.
    pub footer_height: f64,
    /// Fill color painted over the redacted band.
    pub fill: FillColor,
}

/// Configuration for preview rasterization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    pub enabled: bool,
    /// Maximum number of pages rendered per document.
    pub max_pages: usize,
    /// Raster resolution in dots per inch.
    pub dpi: u32,
}

/// Global processing config for the batch shell
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub redaction: RedactionConfig,
    pub previews: PreviewConfig,
}

/// Opaque RGB fill color, components in the 0-1 range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl FillColor {
    pub const WHITE: FillColor = FillColor {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub const BLACK: FillColor = FillColor {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Parses a `#RRGGBB` (or `RRGGBB`) hex color string.
    pub fn from_hex(color: &str) -> Result<Self> {
        let hex = color.trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::ConfigError(format!(
                "Invalid fill color '{}': expected #RRGGBB",
                color
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).unwrap_or(0) as f64 / 255.0
        };
        Ok(Self {
            r: channel(0..2),
            g: channel(2..4),
            b: channel(4..6),
        })
    }
}

// Defaults
impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            footer_height: DEFAULT_FOOTER_HEIGHT,
            fill: FillColor::WHITE,
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_pages: 3,
            dpi: 150,
        }
    }
}

impl Default for FillColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl RedactionConfig {
    /// Caller-facing validation for the CLI and config files.
    ///
    /// The core transform itself accepts any height and clamps it to the
    /// page geometry; these bounds only guard against typo-range input
    /// reaching the tool surface.
    pub fn validate(&self) -> Result<()> {
        if !self.footer_height.is_finite() {
            return Err(Error::ConfigError(
                "Footer height must be a finite number".into(),
            ));
        }
        if self.footer_height < MIN_FOOTER_HEIGHT || self.footer_height > MAX_FOOTER_HEIGHT {
            return Err(Error::ConfigError(format!(
                "Footer height {} out of range ({}-{} points)",
                self.footer_height, MIN_FOOTER_HEIGHT, MAX_FOOTER_HEIGHT
            )));
        }
        for (name, v) in [
            ("r", self.fill.r),
            ("g", self.fill.g),
            ("b", self.fill.b),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(Error::ConfigError(format!(
                    "Fill color component {} = {} out of 0-1 range",
                    name, v
                )));
            }
        }
        Ok(())
    }
}

impl ProcessingConfig {
    pub fn validate(&self) -> Result<()> {
        self.redaction.validate()?;
        if self.previews.enabled && self.previews.max_pages == 0 {
            return Err(Error::ConfigError(
                "Previews enabled but max_pages is 0".into(),
            ));
        }
        if self.previews.enabled && self.previews.dpi == 0 {
            return Err(Error::ConfigError("Preview DPI must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tool_surface() {
        let config = ProcessingConfig::default();
        assert_eq!(config.redaction.footer_height, 60.0);
        assert_eq!(config.redaction.fill, FillColor::WHITE);
        assert_eq!(config.previews.max_pages, 3);
        assert_eq!(config.previews.dpi, 150);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_rejects_out_of_range_height() {
        let mut config = RedactionConfig::default();
        config.footer_height = 5.0;
        assert!(config.validate().is_err());
        config.footer_height = 250.0;
        assert!(config.validate().is_err());
        config.footer_height = 200.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn fill_color_parses_hex() {
        let c = FillColor::from_hex("#FF0000").unwrap();
        assert_eq!(c, FillColor { r: 1.0, g: 0.0, b: 0.0 });
        let c = FillColor::from_hex("ffffff").unwrap();
        assert_eq!(c, FillColor::WHITE);
        assert!(FillColor::from_hex("#12345").is_err());
        assert!(FillColor::from_hex("not-a-color").is_err());
    }

    #[test]
    fn config_round_trips_through_serde() {
        let config = ProcessingConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: ProcessingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.redaction.footer_height, config.redaction.footer_height);

        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: ProcessingConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.previews.dpi, config.previews.dpi);
    }
}
