//! Tile lookup: which placed-tile slot encloses a point.
//!
//! The placement map `(R, D) ↦ (R·s − D, D·s + R)` is a scaled rotation, so it
//! is inverted directly. The inverse is taken at the point shifted back by half
//! a tile, which lands within one step of the true tile; the 3×3 neighbourhood
//! of the rounded candidate is then checked against the real half-open extents.

use crate::geometry::{SquarePoint, TILE_SIDE, TileCoordinate, WallRatio};

/// Candidate offsets, nearest first.
const NEIGHBOURHOOD: [(i32, i32); 9] = [
    (0, 0),
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Tile whose extent contains `point`, or `None` when the point sits in a wall
/// gap or in one of the pinwheel's one-square holes.
///
/// `m` is [`WallRatio::NONE`] for plain grid coordinates and the layout's
/// ratio for wall-adjusted ones.
pub fn locate_tile(point: SquarePoint, m: WallRatio) -> Option<TileCoordinate> {
    if !point.is_finite() {
        return None;
    }
    let stride = m.tile_stride();
    let det = stride * stride + 1.0;
    let half = f64::from(TILE_SIDE) / 2.0;
    let (cx, cy) = (point.x - half, point.y - half);

    let right = ((stride * cx + cy) / det).round();
    let down = ((stride * cy - cx) / det).round();
    if right.abs() > f64::from(i32::MAX - 1) || down.abs() > f64::from(i32::MAX - 1) {
        return None;
    }
    let (right, down) = (right as i32, down as i32);

    NEIGHBOURHOOD
        .iter()
        .map(|&(dr, dd)| TileCoordinate::new(right + dr, down + dd))
        .find(|tile| tile.contains(point, m))
}
