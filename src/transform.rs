//! Grid ↔ canvas conversion.
//!
//! A square keeps its offset inside its tile; only the tile's own origin moves
//! when walls are added. Going to the canvas, the tile is found in plain grid
//! space and re-placed with walls; coming back, the tile is found in
//! wall-adjusted space and re-placed without them.

use crate::config::LayoutConfig;
use crate::geometry::{CanvasPosition, CanvasSize, GridPosition, SquarePoint, WallRatio};
use crate::locator::locate_tile;

/// Tolerance, in square units, added before snapping a canvas point to a
/// square. Points this close below a square's near edge count as inside it.
pub const SNAP_EPSILON: f64 = 1e-6;

/// Converts between grid squares and canvas pixels for one layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateTransform {
    square_px: f64,
    wall_ratio: WallRatio,
}

impl CoordinateTransform {
    /// Expects a validated layout.
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            square_px: config.square_px,
            wall_ratio: config.wall_ratio(),
        }
    }

    pub fn square_px(&self) -> f64 {
        self.square_px
    }

    pub fn wall_ratio(&self) -> WallRatio {
        self.wall_ratio
    }

    /// Canvas pixel of `grid`'s top-left corner, shifted by `pixel_offset` on
    /// both axes. `None` if `grid` is not inside any tile slot.
    pub fn to_canvas(
        &self,
        grid: GridPosition,
        canvas: CanvasSize,
        pixel_offset: f64,
    ) -> Option<CanvasPosition> {
        let tile = locate_tile(SquarePoint::from(grid), WallRatio::NONE)?;
        let free = tile.corner()?;
        let walled = tile.origin(self.wall_ratio);
        let dx = f64::from(grid.x.checked_sub(free.x)?);
        let dy = f64::from(grid.y.checked_sub(free.y)?);

        let center = canvas.center();
        Some(CanvasPosition::new(
            (walled.x + dx) * self.square_px + pixel_offset + center.x,
            (walled.y + dy) * self.square_px + pixel_offset + center.y,
        ))
    }

    /// Square under the canvas pixel `canvas_pos`, undoing the same
    /// `pixel_offset`. `None` over wall gaps and holes.
    pub fn to_grid(
        &self,
        canvas_pos: CanvasPosition,
        canvas: CanvasSize,
        pixel_offset: f64,
    ) -> Option<GridPosition> {
        let point = self.to_square_units(canvas_pos, canvas, pixel_offset);
        let tile = locate_tile(point, self.wall_ratio)?;
        let walled = tile.origin(self.wall_ratio);
        let free = tile.corner()?;

        // Containment bounds both offsets to [0, 4).
        let dx = (point.x - walled.x).floor() as i32;
        let dy = (point.y - walled.y).floor() as i32;
        Some(GridPosition::new(free.x.checked_add(dx)?, free.y.checked_add(dy)?))
    }

    fn to_square_units(
        &self,
        canvas_pos: CanvasPosition,
        canvas: CanvasSize,
        pixel_offset: f64,
    ) -> SquarePoint {
        let center = canvas.center();
        SquarePoint::new(
            (canvas_pos.x - pixel_offset - center.x) / self.square_px + SNAP_EPSILON,
            (canvas_pos.y - pixel_offset - center.y) / self.square_px + SNAP_EPSILON,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform() -> (CoordinateTransform, CanvasSize) {
        let config = LayoutConfig::default();
        (CoordinateTransform::new(&config), CanvasSize::new(1600.0, 1000.0))
    }

    fn assert_close(a: CanvasPosition, b: CanvasPosition) {
        assert!(
            (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn origin_is_canvas_center() {
        let (t, canvas) = transform();
        let pos = t.to_canvas(GridPosition::new(0, 0), canvas, 0.0).unwrap();
        assert_eq!(pos, CanvasPosition::new(800.0, 500.0));
        assert_eq!(t.to_grid(pos, canvas, 0.0), Some(GridPosition::new(0, 0)));
    }

    #[test]
    fn right_neighbour_is_one_tile_over_and_one_square_down() {
        let (t, canvas) = transform();
        let sq = 60.9375;
        let wall = 28.125;
        let origin = t.to_canvas(GridPosition::new(0, 0), canvas, 0.0).unwrap();
        let right = t.to_canvas(GridPosition::new(4, 1), canvas, 0.0).unwrap();
        assert_close(
            right,
            CanvasPosition::new(origin.x + 4.0 * sq + 2.0 * wall, origin.y + sq),
        );
    }

    #[test]
    fn known_corners() {
        let (t, canvas) = transform();
        let sq = 60.9375;
        let tile = 300.0;
        let up = t.to_canvas(GridPosition::new(1, -4), canvas, 0.0).unwrap();
        assert_close(up, CanvasPosition::new(800.0 + sq, 500.0 - tile));

        let down = t.to_canvas(GridPosition::new(-1, 4), canvas, 0.0).unwrap();
        assert_close(down, CanvasPosition::new(800.0 - sq, 500.0 + tile));

        let left = t.to_canvas(GridPosition::new(-4, -1), canvas, 0.0).unwrap();
        assert_close(left, CanvasPosition::new(800.0 - tile, 500.0 - sq));
    }

    #[test]
    fn pixel_offset_shifts_both_axes() {
        let (t, canvas) = transform();
        let plain = t.to_canvas(GridPosition::new(2, 3), canvas, 0.0).unwrap();
        let shifted = t.to_canvas(GridPosition::new(2, 3), canvas, 20.0).unwrap();
        assert_close(shifted, CanvasPosition::new(plain.x + 20.0, plain.y + 20.0));
        assert_eq!(t.to_grid(shifted, canvas, 20.0), Some(GridPosition::new(2, 3)));
    }

    #[test]
    fn hole_has_no_canvas_position() {
        let (t, canvas) = transform();
        assert_eq!(t.to_canvas(GridPosition::new(4, 0), canvas, 0.0), None);
    }

    #[test]
    fn drop_inside_square_snaps_to_it() {
        let (t, canvas) = transform();
        let corner = t.to_canvas(GridPosition::new(5, 2), canvas, 0.0).unwrap();
        let inside = CanvasPosition::new(corner.x + 59.0, corner.y + 0.5);
        assert_eq!(t.to_grid(inside, canvas, 0.0), Some(GridPosition::new(5, 2)));
    }

    #[test]
    fn drop_on_wall_is_unresolved() {
        let (t, canvas) = transform();
        // Right-hand edge of the origin tile, then into the wall gap.
        let last = t.to_canvas(GridPosition::new(3, 2), canvas, 0.0).unwrap();
        let wall = CanvasPosition::new(last.x + 60.9375 + 10.0, last.y + 5.0);
        assert_eq!(t.to_grid(wall, canvas, 0.0), None);
    }

    #[test]
    fn extreme_positions_resolve_to_none_or_a_value() {
        let (t, canvas) = transform();
        let limits = [i32::MIN, i32::MIN + 1, -1, 0, i32::MAX - 2, i32::MAX];
        for &x in &limits {
            for &y in &limits {
                if let Some(pos) = t.to_canvas(GridPosition::new(x, y), canvas, 0.0) {
                    assert!(pos.x.is_finite() && pos.y.is_finite());
                }
            }
        }
        assert!(t.to_canvas(GridPosition::new(i32::MAX - 2, i32::MAX - 2), canvas, 0.0).is_some());
        for far in [1e11, -1e11, 1e300, f64::MAX] {
            let _ = t.to_grid(CanvasPosition::new(far, far), canvas, 0.0);
            let _ = t.to_grid(CanvasPosition::new(far, -far), canvas, 0.0);
        }
    }
}
