//! Data-driven game balance
//!
//! Every movement and survival knob lives in plain structs so a frontend can
//! construct, tweak or deserialize them; the simulation never reads files
//! itself. Velocities are pixels per tick, durations are ticks.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Diver movement and oxygen economy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerTuning {
    /// Horizontal acceleration per tick of held input
    pub horizontal_accel: f64,
    /// Horizontal speed cap
    pub horizontal_speed_max: f64,
    /// Coasting drag factor per tick (1.0 = no drag)
    pub friction: f64,
    /// Downward pull per tick
    pub gravity: f64,
    /// Vertical velocity set by one swim stroke (negative = up)
    pub swim_power: f64,
    /// Maximum descent speed
    pub terminal_velocity: f64,
    /// Gravity scale while ascending; below 1.0 gives the floaty swim arc
    pub rising_gravity_multiplier: f64,
    /// Half extents of the footprint against the tile grid
    pub half_extents: DVec2,
    /// Radius of the round hitbox used against enemies and spots
    pub collider_radius: f64,

    /// Oxygen capacity
    pub max_oxygen: f64,
    /// Ambient drain per tick
    pub oxygen_drain_per_tick: f64,
    /// Additional drain per tick while moving horizontally
    pub oxygen_move_extra_drain: f64,
    /// One-off cost per swim stroke
    pub oxygen_swim_cost: f64,
    /// Deduction on enemy contact
    pub oxygen_damage: f64,
    /// Recovery per tick while on an oxygen spot
    pub oxygen_recovery_per_tick: f64,

    /// Horizontal shove away from the facing direction on enemy contact
    pub knockback_speed: f64,
    /// Invincibility window after damage (and after respawn), in ticks
    pub invincible_ticks: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            horizontal_accel: 0.2,
            horizontal_speed_max: 0.6,
            friction: 0.70,
            gravity: 0.05,
            swim_power: -1.8,
            terminal_velocity: 0.45,
            rising_gravity_multiplier: 0.4,
            half_extents: DVec2::new(7.0, 13.0),
            collider_radius: 10.0,

            max_oxygen: 100.0,
            oxygen_drain_per_tick: 0.02,
            oxygen_move_extra_drain: 0.01,
            oxygen_swim_cost: 0.5,
            oxygen_damage: 15.0,
            oxygen_recovery_per_tick: 0.35,

            knockback_speed: 2.5,
            invincible_ticks: 120,
        }
    }
}

/// How an enemy moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BehaviorKind {
    /// Holds position
    #[default]
    Stationary,
    /// Walks at constant speed, reversing off walls
    Patrol,
    /// Oscillates around its spawn point by distance, ignoring walls
    BackAndForth,
}

/// Hitbox geometry for one enemy type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderSpec {
    Circle { radius: f64 },
    Rect { width: f64, height: f64 },
}

/// Everything the spawner needs to know about one enemy type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpec {
    pub behavior: BehaviorKind,
    /// Footprint half extents against the tile grid
    pub half_extents: DVec2,
    pub collider: ColliderSpec,
    /// Patrol walking speed
    pub speed: f64,
    /// Patrol: extra sensor lead so wide sprites reverse before touching
    pub sensor_lead: f64,
    /// BackAndForth: half-range of the oscillation
    pub max_travel_distance: f64,
    /// Patrol: initial walking direction
    pub initial_facing_right: bool,
    /// BackAndForth: starting velocity (sign picks the initial direction)
    pub initial_velocity_x: f64,
}

impl Default for EnemySpec {
    fn default() -> Self {
        Self {
            behavior: BehaviorKind::Stationary,
            half_extents: DVec2::new(8.0, 8.0),
            collider: ColliderSpec::Circle { radius: 8.0 },
            speed: 0.0,
            sensor_lead: 0.0,
            max_travel_distance: 0.0,
            initial_facing_right: false,
            initial_velocity_x: 0.0,
        }
    }
}

/// Injected registry of enemy types, keyed by the spawn kind authored in the
/// map editor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnemyCatalog {
    specs: HashMap<String, EnemySpec>,
}

impl EnemyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: impl Into<String>, spec: EnemySpec) {
        self.specs.insert(kind.into(), spec);
    }

    pub fn get(&self, kind: &str) -> Option<&EnemySpec> {
        self.specs.get(kind)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// The handful of enemy types the demo stage and tests use.
    pub fn demo() -> Self {
        let mut catalog = Self::new();
        catalog.insert(
            "pufferfish",
            EnemySpec {
                behavior: BehaviorKind::Patrol,
                half_extents: DVec2::new(10.0, 8.0),
                collider: ColliderSpec::Circle { radius: 9.0 },
                speed: 0.5,
                sensor_lead: 4.0,
                initial_facing_right: true,
                ..Default::default()
            },
        );
        catalog.insert(
            "jellyfish",
            EnemySpec {
                behavior: BehaviorKind::BackAndForth,
                half_extents: DVec2::new(8.0, 10.0),
                collider: ColliderSpec::Circle { radius: 8.0 },
                max_travel_distance: 64.0,
                initial_velocity_x: 0.6,
                ..Default::default()
            },
        );
        catalog.insert(
            "urchin",
            EnemySpec {
                behavior: BehaviorKind::Stationary,
                half_extents: DVec2::new(8.0, 8.0),
                collider: ColliderSpec::Rect {
                    width: 14.0,
                    height: 14.0,
                },
                ..Default::default()
            },
        );
        catalog
    }
}
