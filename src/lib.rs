//! Heist board client.
//!
//! Draws the pinwheel tile map of a cooperative heist game on a canvas and
//! turns clicks, drags and keys into move/reveal intents for the server. The
//! grid-to-canvas mapping lives in [`transform`]; everything else feeds it or
//! consumes it.
//!
//! The crate builds natively for tests and as a `cdylib` for the browser,
//! where [`board::start_board`] takes over a canvas element.

use wasm_bindgen::prelude::*;

pub mod board;
pub mod config;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod locator;
pub mod logging;
pub mod protocol;
pub mod snapshot;
pub mod transform;

pub use config::{ConfigError, LayoutConfig};
pub use geometry::{CanvasPosition, CanvasSize, GridPosition, TileCoordinate, WallRatio};
pub use locator::locate_tile;
pub use protocol::{DecodeError, HeisterColor, Intent};
pub use snapshot::{GameSnapshot, ServerMessage, SnapshotError};
pub use transform::CoordinateTransform;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
}

/// Change console verbosity at runtime (`"debug"`, `"warn"`, ...).
#[wasm_bindgen]
pub fn set_log_level(name: &str) {
    logging::init(logging::parse_level(name));
}
