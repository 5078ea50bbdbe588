//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per frame, velocities in pixels/tick)
//! - Seeded RNG only
//! - Stable update order (player, then enemies in spawn order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod enemy;
pub mod physics;
pub mod player;
pub mod shape;
pub mod stage;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use collision::{Collider, ColliderTag, CollisionPass};
pub use enemy::Enemy;
pub use physics::KinematicBody;
pub use player::Player;
pub use shape::Shape;
pub use stage::{SpawnInfo, Stage, StageError, TileSource};
pub use state::{Bubble, GamePhase, GameState, OxygenSpot};
pub use tick::{TickInput, tick};
