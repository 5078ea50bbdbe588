//! Fixed timestep simulation tick
//!
//! One call advances the run by exactly one frame. Ordering inside a frame is
//! a hard contract: the diver integrates first, then every enemy in spawn
//! order, then the collision pass runs over the post-movement hitboxes, then
//! reactions and phase transitions, and the camera smooths last.

use glam::DVec2;
use rand::Rng;

use crate::consts::{
    CAMERA_PLAYING_OFFSET_RATIO, CAMERA_TITLE_ENDING_OFFSET_RATIO, MAX_BUBBLES,
    RESPAWN_DELAY_TICKS,
};
use crate::sim::collision::{ColliderTag, CollisionPass};
use crate::sim::state::{Bubble, GamePhase, GameState};

/// Input commands for a single tick.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move left (held)
    pub left: bool,
    /// Move right (held)
    pub right: bool,
    /// Swim stroke (edge-triggered: true only on the press frame)
    pub swim: bool,
    /// Leave the title screen / confirm
    pub start: bool,
}

/// Advance the game state by one frame.
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    match state.phase {
        GamePhase::Title => update_title(state, input),
        GamePhase::Playing => update_playing(state, input),
        GamePhase::Ending => update_finale(state),
        GamePhase::GameOver => update_game_over(state),
    }
}

fn update_title(state: &mut GameState, input: &TickInput) {
    if input.start {
        state.phase = GamePhase::Playing;
        state.camera.set_offset_ratio(CAMERA_PLAYING_OFFSET_RATIO);
        log::info!("descent started");
    }
    state.camera.set_target_y(state.player.pos().y);
    state.camera.update();
}

fn update_playing(state: &mut GameState, input: &TickInput) {
    // 1. Kinematics: diver first, then enemies in spawn order. Each entity
    //    re-centers its own hitbox as the last step of its update.
    state.player.update(&state.stage, input);
    for enemy in &mut state.enemies {
        enemy.update(&state.stage);
    }
    for spot in &mut state.spots {
        spot.update();
    }

    // 2. Collision pass over the post-movement hitboxes. The pass borrows
    //    every collider, so it lives in its own scope.
    {
        let mut pass = CollisionPass::new();
        pass.register_subject(&mut state.player.collider);
        for enemy in &mut state.enemies {
            if enemy.is_alive() {
                let id = enemy.id;
                pass.register_other(&mut enemy.collider, id);
            }
        }
        for spot in &mut state.spots {
            let id = spot.id;
            pass.register_other(&mut spot.collider, id);
        }
        pass.clear_results();
        pass.resolve();
    }

    // 3. Reactions read the recorded tags
    if state.player.collider.has_contact(ColliderTag::Enemy) {
        state.player.take_damage();
    }
    if state.player.collider.has_contact(ColliderTag::Oxygen) {
        state.player.recover_oxygen();
    }

    // 4. Cosmetics
    if input.swim && !state.player.is_oxygen_empty() {
        spawn_bubbles(state);
    }
    advance_bubbles(state);

    // 5. Phase transitions
    if state.player.is_oxygen_empty() {
        state.phase = GamePhase::GameOver;
        state.death_pos = state.player.pos();
        state.respawn_countdown = RESPAWN_DELAY_TICKS;
        log::info!(
            "diver drowned at depth {:.0}, respawning shortly",
            state.death_pos.y
        );
    } else if state.player.pos().y >= state.finale_zone_y {
        state.phase = GamePhase::Ending;
        state.finale_ticks = 0;
        state.camera.set_offset_ratio(CAMERA_TITLE_ENDING_OFFSET_RATIO);
        state.player.start_finale(state.camera.center().x);
    }

    // 6. Camera follows the post-movement diver
    state.camera.set_target_y(state.player.pos().y);
    state.camera.update();
}

fn update_finale(state: &mut GameState) {
    state.finale_ticks += 1;

    // The diver's own update runs the warp; input is locked internally
    state.player.update(&state.stage, &TickInput::default());
    for enemy in &mut state.enemies {
        enemy.update(&state.stage);
    }
    advance_bubbles(state);

    state.camera.set_target_y(state.player.pos().y);
    state.camera.update();
}

fn update_game_over(state: &mut GameState) {
    advance_bubbles(state);

    if state.respawn_countdown > 0 {
        state.respawn_countdown -= 1;
        if state.respawn_countdown == 0 {
            let checkpoint = state.nearest_respawn(state.death_pos);
            state.player.respawn(checkpoint);
            state.phase = GamePhase::Playing;
        }
    }

    state.camera.set_target_y(state.player.pos().y);
    state.camera.update();
}

/// A burst of bubbles from the diver's position on a swim stroke
fn spawn_bubbles(state: &mut GameState) {
    let origin = state.player.pos();
    let count = state.rng.random_range(2..=4);
    for _ in 0..count {
        if state.bubbles.len() >= MAX_BUBBLES {
            break;
        }
        let jitter_x = state.rng.random_range(-4.0..4.0);
        let drift_x = state.rng.random_range(-0.1..0.1);
        let rise = state.rng.random_range(0.3..0.7);
        let radius = state.rng.random_range(1.0..2.5);
        state.bubbles.push(Bubble {
            pos: origin + DVec2::new(jitter_x, 0.0),
            vel: DVec2::new(drift_x, -rise),
            radius,
            life: 1.0,
        });
    }
}

fn advance_bubbles(state: &mut GameState) {
    for bubble in &mut state.bubbles {
        bubble.pos += bubble.vel;
        bubble.life -= 1.0 / 90.0;
    }
    state.bubbles.retain(|b| b.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::stage::Stage;
    use crate::tuning::{EnemyCatalog, PlayerTuning};

    /// 15x30 shaft: outer walls, a floor at the bottom, a mid-stage ledge,
    /// plus markers for the diver, a checkpoint, an oxygen spot and enemies.
    fn shaft_json() -> String {
        let width = 15;
        let height = 30;
        let mut data = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                let solid = col == 0
                    || col == width - 1
                    || row == height - 1
                    || (row == 15 && (4..8).contains(&col));
                data.push(i32::from(solid));
            }
        }
        let data = data
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        format!(
            r#"{{
                "width": 15, "height": 30, "tilewidth": 16,
                "layers": [
                    {{ "name": "collision_layer", "type": "tilelayer", "data": [{data}] }},
                    {{ "name": "spawns", "type": "objectgroup", "objects": [
                        {{ "type": "player_start", "x": 92.0, "y": 36.0, "width": 8.0, "height": 8.0 }},
                        {{ "type": "respawn", "x": 92.0, "y": 180.0, "width": 8.0, "height": 8.0 }},
                        {{ "type": "oxygen_spot", "x": 64.0, "y": 224.0, "width": 48.0, "height": 16.0 }},
                        {{ "type": "urchin", "x": 152.0, "y": 416.0, "width": 16.0, "height": 16.0 }}
                    ] }}
                ]
            }}"#
        )
    }

    fn fresh_state(tuning: PlayerTuning) -> GameState {
        let json = shaft_json();
        let stage = Stage::from_tiled_json(&json, "collision_layer").unwrap();
        let mut state = GameState::new(stage, &EnemyCatalog::demo(), tuning, 7);
        state.set_finale_zone_y(430.0);
        state
    }

    fn start_run(state: &mut GameState) {
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(state, &start);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_title_waits_for_start() {
        let mut state = fresh_state(PlayerTuning::default());
        let idle = TickInput::default();
        for _ in 0..10 {
            tick(&mut state, &idle);
        }
        assert_eq!(state.phase, GamePhase::Title);
        start_run(&mut state);
    }

    #[test]
    fn test_diver_descends_and_lands_on_ledge() {
        let mut state = fresh_state(PlayerTuning::default());
        start_run(&mut state);

        let idle = TickInput::default();
        for _ in 0..900 {
            tick(&mut state, &idle);
        }
        // Ledge row 15 starts at y=240; resting center is 240 - half height
        assert!(state.player.is_grounded());
        assert_eq!(state.player.pos().y, 240.0 - 13.0);
    }

    #[test]
    fn test_oxygen_spot_recovers_faster_than_drain() {
        let mut state = fresh_state(PlayerTuning::default());
        start_run(&mut state);

        // Drain away from the spot first (pinned in open water)
        let idle = TickInput::default();
        for _ in 0..200 {
            state.player.body.pos = DVec2::new(40.0, 100.0);
            tick(&mut state, &idle);
        }
        let low = state.player.oxygen();
        assert!(low < state.player.max_oxygen());

        // Recovery beats ambient drain while overlapping the spot at (88, 232)
        let mut last = low;
        for _ in 0..10 {
            state.player.body.pos = DVec2::new(88.0, 230.0);
            tick(&mut state, &idle);
            assert!(state.player.oxygen() > last);
            last = state.player.oxygen();
        }
        assert!(last > low);
    }

    #[test]
    fn test_enemy_contact_damages_once_per_window() {
        let mut state = fresh_state(PlayerTuning::default());
        start_run(&mut state);

        // Urchin sits at (160, 424); drop the diver onto it
        state.player.body.pos = DVec2::new(160.0, 424.0);
        let idle = TickInput::default();
        let full = state.player.oxygen();
        tick(&mut state, &idle);
        let after_hit = state.player.oxygen();
        assert!(after_hit < full - 14.0, "contact damage applied");
        assert!(state.player.is_invincible());

        // Still overlapping next tick: the window absorbs it
        state.player.body.pos = DVec2::new(160.0, 424.0);
        tick(&mut state, &idle);
        assert!(state.player.oxygen() > after_hit - 1.0);
    }

    #[test]
    fn test_drown_then_respawn_at_checkpoint() {
        let tuning = PlayerTuning {
            oxygen_drain_per_tick: 1000.0,
            ..Default::default()
        };
        let mut state = fresh_state(tuning);
        start_run(&mut state);

        // Drown near the checkpoint at (96, 184)
        state.player.body.pos = DVec2::new(96.0, 200.0);
        let idle = TickInput::default();
        tick(&mut state, &idle);
        assert_eq!(state.phase, GamePhase::GameOver);

        for _ in 0..RESPAWN_DELAY_TICKS {
            tick(&mut state, &idle);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.pos(), DVec2::new(96.0, 184.0));
        // The huge drain drowns the diver again on the very next tick, but
        // the respawn itself restored a full tank
        assert_eq!(state.player.oxygen(), state.player.max_oxygen());
    }

    #[test]
    fn test_finale_triggers_at_depth() {
        let mut state = fresh_state(PlayerTuning::default());
        start_run(&mut state);

        state.player.body.pos = DVec2::new(96.0, 431.0);
        let idle = TickInput::default();
        tick(&mut state, &idle);
        assert_eq!(state.phase, GamePhase::Ending);
        assert!(state.player.is_in_finale());

        // The warp parks the diver at camera center + offset
        for _ in 0..400 {
            tick(&mut state, &idle);
        }
        assert_eq!(state.player.pos().x, 120.0 + 80.0);
        assert!(state.finale_ticks > 0);
    }

    #[test]
    fn test_bubbles_spawn_and_expire() {
        let mut state = fresh_state(PlayerTuning::default());
        start_run(&mut state);

        let stroke = TickInput {
            swim: true,
            ..Default::default()
        };
        tick(&mut state, &stroke);
        let spawned = state.bubbles.len();
        assert!((2..=4).contains(&spawned));

        let idle = TickInput::default();
        for _ in 0..120 {
            tick(&mut state, &idle);
        }
        assert!(state.bubbles.is_empty());
    }

    #[test]
    fn test_deterministic_replay() {
        let run = || {
            let mut state = fresh_state(PlayerTuning::default());
            start_run(&mut state);
            let mut inputs = Vec::new();
            for i in 0..300u32 {
                inputs.push(TickInput {
                    right: i % 3 == 0,
                    swim: i % 45 == 0,
                    ..Default::default()
                });
            }
            for input in &inputs {
                tick(&mut state, input);
            }
            (state.player.pos(), state.player.oxygen(), state.bubbles.len())
        };
        assert_eq!(run(), run());
    }
}
