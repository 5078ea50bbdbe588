//! Deep Descent - a 2D deep-sea survival platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tile physics, collisions, game state)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio and windowing live outside this crate. The simulation is
//! pure and frame-stepped, so it can be driven headless (see `main.rs`) or by
//! any frontend that forwards input and draws the resulting state.

pub mod sim;
pub mod tuning;

pub use tuning::{EnemyCatalog, PlayerTuning};

/// Game configuration constants
pub mod consts {
    /// Simulation rate: one tick per displayed frame
    pub const TICKS_PER_SEC: u32 = 60;

    /// View dimensions in pixels (a narrow vertical slice of the stage)
    pub const VIEW_WIDTH: f64 = 240.0;
    pub const VIEW_HEIGHT: f64 = 300.0;

    /// Camera framing: fraction of the view height the tracked point sits
    /// from the view center. Positive pushes the view downward (the diver
    /// rides high while descending), negative pulls it up.
    pub const CAMERA_PLAYING_OFFSET_RATIO: f64 = 1.0 / 6.0;
    pub const CAMERA_TITLE_ENDING_OFFSET_RATIO: f64 = -1.0 / 4.9;
    /// Per-tick smoothing factor for the camera's vertical tracking
    pub const CAMERA_SMOOTHING: f64 = 0.05;

    /// Depth (world Y) at which the finale sequence begins
    pub const FINALE_ZONE_Y: f64 = 7650.0;
    /// Where the diver parks for the finale, relative to the camera center
    pub const FINALE_OFFSET_X: f64 = 80.0;
    /// Per-tick lerp factor for the finale warp (1.0 = instant)
    pub const FINALE_WARP_LERP: f64 = 0.05;
    /// Distance at which the finale warp snaps to its target
    pub const FINALE_SNAP_THRESHOLD: f64 = 1.0;

    /// Ticks between drowning and respawn at the nearest checkpoint
    pub const RESPAWN_DELAY_TICKS: u32 = 150;

    /// Bubble particle cap
    pub const MAX_BUBBLES: usize = 128;
}

/// Tile column/row containing a world coordinate.
///
/// Floor division, not truncation: negative coordinates must map to the tile
/// on their lower side.
#[inline]
pub fn tile_coord(world: f64, tile_size: f64) -> i32 {
    (world / tile_size).floor() as i32
}

/// World coordinate of the near edge (left/top) of the tile containing `world`
#[inline]
pub fn tile_origin(world: f64, tile_size: f64) -> f64 {
    (world / tile_size).floor() * tile_size
}

/// Linear interpolation between two scalars
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
