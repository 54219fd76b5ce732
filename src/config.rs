//! Layout constants supplied by the embedding page.
//!
//! Defaults come from the tile art: scans are 1600 px across with 150 px walls
//! and 325 px squares, drawn at 300 px per tile on a 1600×1000 canvas.

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::{CanvasSize, TILE_SIDE, WallRatio};

pub const CANVAS_WIDTH: f64 = 1600.0;
pub const CANVAS_HEIGHT: f64 = 1000.0;

/// On-screen size of one tile, walls included.
pub const TILE_SIZE: f64 = 300.0;

/// Pixel measurements of the tile artwork.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArtDimensions {
    pub tile_px: f64,
    pub wall_px: f64,
    pub square_px: f64,
}

pub const TILE_ART: ArtDimensions = ArtDimensions {
    tile_px: 1600.0,
    wall_px: 150.0,
    square_px: 325.0,
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("square size must be positive, got {0}")]
    NonPositiveSquare(f64),

    #[error("wall size must not be negative, got {0}")]
    NegativeWall(f64),

    #[error("canvas must have a non-zero size, got {width}x{height}")]
    EmptyCanvas { width: f64, height: f64 },

    #[error("invalid layout json: {0}")]
    Json(String),
}

/// Everything the transform and renderer need to know about pixel sizes.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub square_px: f64,
    pub wall_px: f64,
    pub heister_px: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::from_art(TILE_ART, TILE_SIZE)
    }
}

impl LayoutConfig {
    /// Scale artwork measurements so one tile covers `tile_px` canvas pixels.
    pub fn from_art(art: ArtDimensions, tile_px: f64) -> Self {
        let scale = tile_px / art.tile_px;
        let square_px = art.square_px * scale;
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            square_px,
            wall_px: art.wall_px * scale,
            // A bit under half a square so neighbouring heisters never touch.
            heister_px: square_px / 2.0 - 10.0,
        }
    }

    /// Parse a (possibly partial) JSON layout; missing fields keep defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("canvasWidth", self.canvas_width),
            ("canvasHeight", self.canvas_height),
            ("squarePx", self.square_px),
            ("wallPx", self.wall_px),
            ("heisterPx", self.heister_px),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        if self.square_px <= 0.0 {
            return Err(ConfigError::NonPositiveSquare(self.square_px));
        }
        if self.wall_px < 0.0 {
            return Err(ConfigError::NegativeWall(self.wall_px));
        }
        if self.canvas_width <= 0.0 || self.canvas_height <= 0.0 {
            return Err(ConfigError::EmptyCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        Ok(())
    }

    pub fn canvas(&self) -> CanvasSize {
        CanvasSize::new(self.canvas_width, self.canvas_height)
    }

    /// `wall_px / square_px`; zero if the sizes are unusable.
    pub fn wall_ratio(&self) -> WallRatio {
        WallRatio::new(self.wall_px / self.square_px).unwrap_or(WallRatio::NONE)
    }

    /// Canvas size of a tile including one wall on each side.
    pub fn tile_px(&self) -> f64 {
        f64::from(TILE_SIDE) * self.square_px + 2.0 * self.wall_px
    }

    /// Offset that moves a sprite anchor from a square's corner to its centre.
    pub fn center_offset(&self) -> f64 {
        self.square_px / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_art_scale() {
        let c = LayoutConfig::default();
        assert_eq!(c.square_px, 60.9375);
        assert_eq!(c.wall_px, 28.125);
        assert_eq!(c.tile_px(), TILE_SIZE);
        assert!((c.wall_ratio().get() - 150.0 / 325.0).abs() < 1e-12);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = LayoutConfig::from_json(r#"{"canvasWidth": 800}"#).unwrap();
        assert_eq!(c.canvas_width, 800.0);
        assert_eq!(c.canvas_height, CANVAS_HEIGHT);
        assert_eq!(c.square_px, 60.9375);
    }

    #[test]
    fn rejects_bad_sizes() {
        let bad_square = LayoutConfig { square_px: 0.0, ..LayoutConfig::default() };
        assert_eq!(bad_square.validate(), Err(ConfigError::NonPositiveSquare(0.0)));

        let bad_wall = LayoutConfig { wall_px: -1.0, ..LayoutConfig::default() };
        assert_eq!(bad_wall.validate(), Err(ConfigError::NegativeWall(-1.0)));

        let bad_canvas = LayoutConfig { canvas_height: 0.0, ..LayoutConfig::default() };
        assert!(matches!(bad_canvas.validate(), Err(ConfigError::EmptyCanvas { .. })));

        let nan = LayoutConfig { wall_px: f64::NAN, ..LayoutConfig::default() };
        assert!(matches!(
            nan.validate(),
            Err(ConfigError::NonFinite { field: "wallPx", .. })
        ));

        assert!(matches!(LayoutConfig::from_json("{"), Err(ConfigError::Json(_))));
        assert!(LayoutConfig::from_json(r#"{"squarePx": -3}"#).is_err());
    }
}
