//! Game state and entity bookkeeping
//!
//! Everything the tick function advances lives here: the stage, the diver,
//! enemies, oxygen spots, checkpoints and the camera, plus the purely
//! cosmetic bubbles. Spawning walks the stage's object markers once at
//! construction.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::{CAMERA_TITLE_ENDING_OFFSET_RATIO, FINALE_ZONE_Y, VIEW_HEIGHT, VIEW_WIDTH};
use crate::sim::camera::Camera;
use crate::sim::collision::{Collider, ColliderTag};
use crate::sim::enemy::Enemy;
use crate::sim::player::Player;
use crate::sim::shape::Shape;
use crate::sim::stage::Stage;
use crate::tuning::{EnemyCatalog, PlayerTuning};

/// Spawn marker kinds recognized by [`GameState::new`]; anything else is
/// looked up in the enemy catalog.
pub const SPAWN_PLAYER_START: &str = "player_start";
pub const SPAWN_RESPAWN: &str = "respawn";
pub const SPAWN_OXYGEN_SPOT: &str = "oxygen_spot";

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting on the title framing; the world is visible but frozen
    Title,
    /// Active play
    Playing,
    /// Scripted finale at the bottom of the stage
    Ending,
    /// Drowned; waiting out the respawn delay
    GameOver,
}

/// A stationary oxygen recovery zone.
#[derive(Debug, Clone)]
pub struct OxygenSpot {
    pub id: u32,
    pub pos: DVec2,
    pub collider: Collider,
}

impl OxygenSpot {
    pub fn new(id: u32, center: DVec2, size: DVec2) -> Self {
        Self {
            id,
            pos: center,
            collider: Collider::new(
                Shape::rect(center, size.x, size.y),
                ColliderTag::Oxygen,
            ),
        }
    }

    /// Keep the hitbox centered on the spot (spots never move, but the
    /// re-sync runs anyway to honor the frame contract)
    pub fn update(&mut self) {
        self.collider.shape.set_center(self.pos);
    }
}

/// A cosmetic bubble rising from the diver. Never gameplay-affecting.
#[derive(Debug, Clone, Copy)]
pub struct Bubble {
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    /// Remaining life in [0, 1]
    pub life: f64,
}

/// Complete simulation state for one run.
pub struct GameState {
    pub stage: Stage,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub spots: Vec<OxygenSpot>,
    pub camera: Camera,
    pub phase: GamePhase,
    pub bubbles: Vec<Bubble>,

    /// Ticks elapsed since the run started
    pub time_ticks: u64,
    /// Ticks elapsed inside the finale (drives the scripted beats)
    pub finale_ticks: u32,

    pub(crate) rng: Pcg32,
    pub(crate) respawn_points: Vec<DVec2>,
    pub(crate) start_pos: DVec2,
    pub(crate) death_pos: DVec2,
    pub(crate) respawn_countdown: u32,
    pub(crate) finale_zone_y: f64,
    next_id: u32,
}

impl GameState {
    /// Build a run from a loaded stage: spawn every marker, place the diver
    /// and point the camera at them. Starts in the title phase.
    pub fn new(stage: Stage, catalog: &EnemyCatalog, tuning: PlayerTuning, seed: u64) -> Self {
        let mut state = Self {
            player: Player::new(tuning.clone(), DVec2::ZERO),
            enemies: Vec::new(),
            spots: Vec::new(),
            camera: Camera::new(VIEW_WIDTH / 2.0, DVec2::new(VIEW_WIDTH, VIEW_HEIGHT), 0.0),
            phase: GamePhase::Title,
            bubbles: Vec::new(),
            time_ticks: 0,
            finale_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            respawn_points: Vec::new(),
            start_pos: DVec2::new(VIEW_WIDTH / 2.0, 60.0),
            death_pos: DVec2::ZERO,
            respawn_countdown: 0,
            finale_zone_y: FINALE_ZONE_Y,
            next_id: 0,
            stage,
        };

        // Title and ending share the pulled-up framing; play re-frames on start
        state.camera.set_offset_ratio(CAMERA_TITLE_ENDING_OFFSET_RATIO);
        state.spawn_entities(catalog, tuning);
        state
    }

    fn spawn_entities(&mut self, catalog: &EnemyCatalog, tuning: PlayerTuning) {
        // Collect first: spawning borrows the spawn list immutably while the
        // entity lists grow
        let spawns: Vec<_> = self.stage.spawns().to_vec();

        for spawn in &spawns {
            let center = spawn.center();
            match spawn.kind.as_str() {
                SPAWN_PLAYER_START => self.start_pos = center,
                SPAWN_RESPAWN => self.respawn_points.push(center),
                SPAWN_OXYGEN_SPOT => {
                    let id = self.next_entity_id();
                    self.spots.push(OxygenSpot::new(id, center, spawn.size));
                }
                kind => {
                    if let Some(spec) = catalog.get(kind) {
                        let id = self.next_entity_id();
                        self.enemies.push(Enemy::from_spec(id, spec, center));
                    } else {
                        log::warn!("unknown spawn kind '{kind}', skipping");
                    }
                }
            }
        }

        self.player = Player::new(tuning, self.start_pos);
        self.camera.set_target_y(self.start_pos.y);

        log::info!(
            "spawned: {} enemies, {} oxygen spots, {} checkpoints",
            self.enemies.len(),
            self.spots.len(),
            self.respawn_points.len()
        );
    }

    /// Allocate a new entity id
    pub fn next_entity_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Checkpoint closest to `from`; the stage start if none were placed.
    pub fn nearest_respawn(&self, from: DVec2) -> DVec2 {
        self.respawn_points
            .iter()
            .copied()
            .min_by(|a, b| {
                a.distance_squared(from)
                    .partial_cmp(&b.distance_squared(from))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(self.start_pos)
    }

    /// Depth at which the finale triggers. Stages shorter than the default
    /// zone override this (tests and the demo stage do).
    pub fn set_finale_zone_y(&mut self, y: f64) {
        self.finale_zone_y = y;
    }

    /// Progress through the stage in [0, 1], for frontends' depth meters
    pub fn descent_progress(&self) -> f64 {
        let total = (self.finale_zone_y - self.start_pos.y).max(1.0);
        ((self.player.pos().y - self.start_pos.y) / total).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::stage::TileSource;

    struct EmptyGrid;

    impl TileSource for EmptyGrid {
        fn width(&self) -> i32 {
            20
        }

        fn height(&self) -> i32 {
            20
        }

        fn tile_size(&self) -> i32 {
            16
        }

        fn tile_id(&self, _col: i32, _row: i32) -> i32 {
            0
        }
    }

    const SPAWN_MAP: &str = r#"{
        "width": 20, "height": 20, "tilewidth": 16,
        "layers": [
            { "name": "collision_layer", "type": "tilelayer",
              "data": [0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
                       0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
                       0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
                       0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
                       0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
                       0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
                       0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
                       0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
                       0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
                       0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
                       0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
                       0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
                       0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
                       0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
                       0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
                       0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
                       0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
                       0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
                       0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
                       0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0] },
            { "name": "spawns", "type": "objectgroup", "objects": [
                { "type": "player_start", "x": 92.0, "y": 26.0, "width": 8.0, "height": 8.0 },
                { "type": "respawn", "x": 46.0, "y": 96.0, "width": 8.0, "height": 8.0 },
                { "type": "respawn", "x": 146.0, "y": 196.0, "width": 8.0, "height": 8.0 },
                { "type": "oxygen_spot", "x": 80.0, "y": 144.0, "width": 32.0, "height": 16.0 },
                { "type": "jellyfish", "x": 64.0, "y": 64.0, "width": 16.0, "height": 16.0 },
                { "type": "kraken", "x": 80.0, "y": 80.0, "width": 16.0, "height": 16.0 }
            ] }
        ]
    }"#;

    fn spawned_state() -> GameState {
        let stage = Stage::from_tiled_json(SPAWN_MAP, "collision_layer").unwrap();
        GameState::new(stage, &EnemyCatalog::demo(), PlayerTuning::default(), 1)
    }

    #[test]
    fn test_spawn_markers_populate_entities() {
        let state = spawned_state();
        assert_eq!(state.player.pos(), DVec2::new(96.0, 30.0));
        assert_eq!(state.respawn_points.len(), 2);
        assert_eq!(state.spots.len(), 1);
        // jellyfish spawns; the unknown "kraken" kind is skipped
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.phase, GamePhase::Title);
    }

    #[test]
    fn test_nearest_respawn_picks_closest() {
        let state = spawned_state();
        let near_first = state.nearest_respawn(DVec2::new(60.0, 110.0));
        assert_eq!(near_first, DVec2::new(50.0, 100.0));
        let near_second = state.nearest_respawn(DVec2::new(140.0, 190.0));
        assert_eq!(near_second, DVec2::new(150.0, 200.0));
    }

    #[test]
    fn test_nearest_respawn_falls_back_to_start() {
        let stage = Stage::from_source(&EmptyGrid).unwrap();
        let state = GameState::new(
            stage,
            &EnemyCatalog::demo(),
            PlayerTuning::default(),
            1,
        );
        assert_eq!(state.nearest_respawn(DVec2::ZERO), state.start_pos);
    }

    #[test]
    fn test_descent_progress_clamps() {
        let mut state = spawned_state();
        state.set_finale_zone_y(230.0);
        assert_eq!(state.descent_progress(), 0.0);
        state.player.body.pos.y = 230.0;
        assert_eq!(state.descent_progress(), 1.0);
        state.player.body.pos.y = 130.0;
        let progress = state.descent_progress();
        assert!(progress > 0.0 && progress < 1.0);
    }
}
