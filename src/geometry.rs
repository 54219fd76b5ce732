//! Position types shared by the tile locator and the canvas transform.
//!
//! Three coordinate spaces are in play:
//! - grid space: integer squares as the server numbers them ([`GridPosition`]);
//! - square units: real-valued positions measured in square widths, optionally
//!   with wall gaps folded in through a [`WallRatio`] ([`SquarePoint`]);
//! - canvas space: floating-point pixels on the rendering surface ([`CanvasPosition`]).
//!
//! Tiles are 4×4 blocks of squares. Tile `(R, D)` has its first square at
//! `(R·s − D, D·s + R)` square units where `s = 4 + 2m`, so each step to the
//! right shifts the next tile one square down and each step down shifts it one
//! square left. That pinwheel offset is what leaves a one-square hole between
//! every four tiles.

use serde::{Deserialize, Serialize};

use crate::protocol::MoveDirection;

/// Squares along one edge of a tile.
pub const TILE_SIDE: i32 = 4;

/// Squares covered by one tile.
pub const SQUARES_PER_TILE: usize = (TILE_SIDE * TILE_SIDE) as usize;

/// One square of the board in the server's coordinate system.
///
/// `(0, 0)` is the first square of the starting tile; `y` grows southwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring square one step in `direction`, `None` past the edge
    /// of the coordinate range.
    pub fn step(self, direction: MoveDirection) -> Option<Self> {
        let (dx, dy) = direction.delta();
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }
}

/// A tile, counted in placement steps from the starting tile along the
/// pinwheel's "rightward" (`right`) and "downward" (`down`) axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TileCoordinate {
    pub right: i32,
    pub down: i32,
}

impl TileCoordinate {
    pub const fn new(right: i32, down: i32) -> Self {
        Self { right, down }
    }

    /// Grid position of the tile's first (top-left) square, walls ignored.
    /// `None` when it falls outside the `i32` grid.
    pub fn corner(self) -> Option<GridPosition> {
        let (r, d, side) = (i64::from(self.right), i64::from(self.down), i64::from(TILE_SIDE));
        let x = i32::try_from(r * side - d).ok()?;
        let y = i32::try_from(d * side + r).ok()?;
        Some(GridPosition::new(x, y))
    }

    /// Position of the tile's first square in square units with walls of
    /// ratio `m` between tiles.
    pub fn origin(self, m: WallRatio) -> SquarePoint {
        let stride = m.tile_stride();
        let (r, d) = (f64::from(self.right), f64::from(self.down));
        SquarePoint::new(r * stride - d, d * stride + r)
    }

    /// Whether `point` lies inside this tile's 4×4 extent. Lower edges are
    /// inclusive and far edges exclusive.
    pub fn contains(self, point: SquarePoint, m: WallRatio) -> bool {
        let origin = self.origin(m);
        let side = f64::from(TILE_SIDE);
        point.x >= origin.x
            && point.x < origin.x + side
            && point.y >= origin.y
            && point.y < origin.y + side
    }
}

/// A real-valued position measured in square widths.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SquarePoint {
    pub x: f64,
    pub y: f64,
}

impl SquarePoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<GridPosition> for SquarePoint {
    fn from(pos: GridPosition) -> Self {
        Self::new(f64::from(pos.x), f64::from(pos.y))
    }
}

/// Pixel position on the rendering canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasPosition {
    pub x: f64,
    pub y: f64,
}

impl CanvasPosition {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> CanvasPosition {
        CanvasPosition::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Wall gap thickness divided by square size.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct WallRatio(f64);

impl WallRatio {
    /// Pure grid space: tiles touch with no gap.
    pub const NONE: WallRatio = WallRatio(0.0);

    /// `None` for negative or non-finite ratios.
    pub fn new(m: f64) -> Option<Self> {
        (m.is_finite() && m >= 0.0).then_some(Self(m))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Distance in square units between the first squares of two
    /// neighbouring tiles along either placement axis.
    pub fn tile_stride(self) -> f64 {
        f64::from(TILE_SIDE) + 2.0 * self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_follow_pinwheel() {
        assert_eq!(TileCoordinate::new(0, 0).corner(), Some(GridPosition::new(0, 0)));
        assert_eq!(TileCoordinate::new(1, 0).corner(), Some(GridPosition::new(4, 1)));
        assert_eq!(TileCoordinate::new(0, 1).corner(), Some(GridPosition::new(-1, 4)));
        assert_eq!(TileCoordinate::new(-1, 0).corner(), Some(GridPosition::new(-4, -1)));
        assert_eq!(TileCoordinate::new(0, -1).corner(), Some(GridPosition::new(1, -4)));
        assert_eq!(TileCoordinate::new(0, -4).corner(), Some(GridPosition::new(4, -16)));
    }

    #[test]
    fn origin_without_walls_matches_corner() {
        for r in -5..=5 {
            for d in -5..=5 {
                let tile = TileCoordinate::new(r, d);
                assert_eq!(tile.origin(WallRatio::NONE), SquarePoint::from(tile.corner().unwrap()));
            }
        }
    }

    #[test]
    fn extent_is_half_open() {
        let tile = TileCoordinate::new(0, 0);
        assert!(tile.contains(SquarePoint::new(0.0, 0.0), WallRatio::NONE));
        assert!(tile.contains(SquarePoint::new(3.999, 3.999), WallRatio::NONE));
        assert!(!tile.contains(SquarePoint::new(4.0, 0.0), WallRatio::NONE));
        assert!(!tile.contains(SquarePoint::new(0.0, 4.0), WallRatio::NONE));
        assert!(!tile.contains(SquarePoint::new(-0.001, 2.0), WallRatio::NONE));
    }

    #[test]
    fn wall_ratio_rejects_bad_values() {
        assert!(WallRatio::new(-0.1).is_none());
        assert!(WallRatio::new(f64::NAN).is_none());
        assert!(WallRatio::new(f64::INFINITY).is_none());
        let m = WallRatio::new(0.5).unwrap();
        assert_eq!(m.tile_stride(), 5.0);
    }

    #[test]
    fn step_moves_one_square() {
        let p = GridPosition::new(2, 2);
        assert_eq!(p.step(MoveDirection::North), Some(GridPosition::new(2, 1)));
        assert_eq!(p.step(MoveDirection::East), Some(GridPosition::new(3, 2)));
        assert_eq!(p.step(MoveDirection::South), Some(GridPosition::new(2, 3)));
        assert_eq!(p.step(MoveDirection::West), Some(GridPosition::new(1, 2)));
    }

    #[test]
    fn corner_and_step_stop_at_i32_limits() {
        assert_eq!(TileCoordinate::new(i32::MAX / 2, 0).corner(), None);
        assert_eq!(TileCoordinate::new(0, i32::MIN / 3).corner(), None);
        // 4·R alone overflows here, the corner itself does not.
        assert_eq!(
            TileCoordinate::new(631_612_836, 378_967_702).corner(),
            Some(GridPosition::new(2_147_483_642, 2_147_483_644))
        );
        let edge = GridPosition::new(i32::MAX, i32::MIN);
        assert_eq!(edge.step(MoveDirection::East), None);
        assert_eq!(edge.step(MoveDirection::North), None);
        assert_eq!(edge.step(MoveDirection::West), Some(GridPosition::new(i32::MAX - 1, i32::MIN)));
    }
}
