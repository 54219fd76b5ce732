//! Where things go on the canvas for one frame.
//!
//! Built from the latest snapshot on every animation frame. Only
//! [`CoordinateTransform::to_canvas`] is used to place anything, so what is
//! drawn is exactly what a drop would resolve back to.

use log::warn;

use crate::config::LayoutConfig;
use crate::geometry::{CanvasPosition, GridPosition, TILE_SIDE};
use crate::input::Drag;
use crate::protocol::HeisterColor;
use crate::snapshot::{GameSnapshot, Square};
use crate::transform::CoordinateTransform;

#[derive(Clone, Debug, PartialEq)]
pub struct SquareSprite {
    pub position: GridPosition,
    pub corner: CanvasPosition,
    pub square: Square,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TileSprite {
    pub corner: CanvasPosition,
    pub side: f64,
    pub squares: Vec<SquareSprite>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeisterSprite {
    pub color: HeisterColor,
    pub center: CanvasPosition,
    pub radius: f64,
    pub dragging: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameLayout {
    pub tiles: Vec<TileSprite>,
    pub heisters: Vec<HeisterSprite>,
    /// Top-left corners of squares where a new tile may be revealed.
    pub placements: Vec<CanvasPosition>,
    pub square_px: f64,
}

impl FrameLayout {
    pub fn build(
        snapshot: &GameSnapshot,
        transform: &CoordinateTransform,
        config: &LayoutConfig,
        drag: Option<&Drag>,
    ) -> Self {
        let canvas = config.canvas();
        let square_px = transform.square_px();

        let mut tiles = Vec::with_capacity(snapshot.tiles.len());
        for tile in &snapshot.tiles {
            let Some(corner) = transform.to_canvas(tile.position, canvas, 0.0) else {
                warn!("tile at {:?} is not on a tile slot, skipped", tile.position);
                continue;
            };
            let squares = tile
                .squares_with_positions()
                .filter_map(|(position, square)| {
                    transform
                        .to_canvas(position, canvas, 0.0)
                        .map(|corner| SquareSprite { position, corner, square: *square })
                })
                .collect();
            tiles.push(TileSprite {
                corner,
                side: f64::from(TILE_SIDE) * square_px,
                squares,
            });
        }

        let offset = config.center_offset();
        let mut heisters = Vec::with_capacity(snapshot.heisters.len());
        for heister in snapshot.heisters.iter().filter(|h| !h.has_escaped) {
            let dragged = drag.filter(|d| d.color == heister.color);
            let center = match dragged {
                Some(d) => Some(d.pointer),
                None => transform.to_canvas(heister.position, canvas, offset),
            };
            match center {
                Some(center) => heisters.push(HeisterSprite {
                    color: heister.color,
                    center,
                    radius: config.heister_px,
                    dragging: dragged.is_some(),
                }),
                None => warn!("heister {:?} at unresolvable {:?}", heister.color, heister.position),
            }
        }

        let placements = snapshot
            .possible_placements
            .iter()
            .filter_map(|&p| transform.to_canvas(p, canvas, 0.0))
            .collect();

        FrameLayout {
            tiles,
            heisters,
            placements,
            square_px,
        }
    }
}
