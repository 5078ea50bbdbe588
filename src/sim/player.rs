//! The diver
//!
//! Owns the oxygen economy, damage state and the finale warp on top of a
//! [`KinematicBody`]. Terrain contact goes through the tile integrator; the
//! round collider here is only for enemies and oxygen spots.

use glam::DVec2;

use crate::consts::{FINALE_OFFSET_X, FINALE_SNAP_THRESHOLD, FINALE_WARP_LERP};
use crate::lerp;
use crate::sim::collision::{Collider, ColliderTag};
use crate::sim::physics::{self, KinematicBody};
use crate::sim::shape::Shape;
use crate::sim::stage::Stage;
use crate::sim::tick::TickInput;
use crate::tuning::PlayerTuning;

#[derive(Debug, Clone)]
pub struct Player {
    pub body: KinematicBody,
    pub collider: Collider,
    tuning: PlayerTuning,

    oxygen: f64,
    oxygen_empty: bool,

    grounded: bool,
    moving_x: bool,
    facing_right: bool,

    invincible_ticks_left: u32,
    /// Set by damage, consumed by the next physics step to waive the ceiling
    /// check for exactly one frame (lets the knockback leave a ceiling the
    /// diver is flush against)
    just_took_damage: bool,

    in_finale: bool,
    finale_target_x: f64,
    finale_warp_active: bool,
}

impl Player {
    pub fn new(tuning: PlayerTuning, spawn_pos: DVec2) -> Self {
        let body = KinematicBody::new(spawn_pos, tuning.half_extents);
        let collider = Collider::new(
            Shape::circle(spawn_pos, tuning.collider_radius),
            ColliderTag::Player,
        );
        Self {
            body,
            collider,
            oxygen: tuning.max_oxygen,
            tuning,
            oxygen_empty: false,
            grounded: false,
            moving_x: false,
            facing_right: false,
            invincible_ticks_left: 0,
            just_took_damage: false,
            in_finale: false,
            finale_target_x: 0.0,
            finale_warp_active: false,
        }
    }

    /// Advance the diver by one tick.
    ///
    /// Order matters and matches the rest of the frame contract: oxygen
    /// drains first (using last tick's movement state), then input, then the
    /// X and Y physics passes, and finally the hitbox re-centers on the
    /// post-movement position.
    pub fn update(&mut self, stage: &Stage, input: &TickInput) {
        let skip_ceiling = std::mem::take(&mut self.just_took_damage);

        self.drain_oxygen();

        if !self.oxygen_empty && !self.in_finale {
            self.handle_input(input);
        } else {
            self.moving_x = false;
        }

        if self.in_finale && self.finale_warp_active {
            self.step_finale_warp();
        }

        physics::apply_gravity(
            &mut self.body,
            self.tuning.gravity,
            self.tuning.rising_gravity_multiplier,
            self.tuning.terminal_velocity,
        );
        if !self.moving_x {
            physics::apply_friction(&mut self.body, self.tuning.friction);
        }
        physics::step_x_blocking(&mut self.body, stage);
        self.grounded = physics::step_y(&mut self.body, stage, skip_ceiling);

        if self.invincible_ticks_left > 0 {
            self.invincible_ticks_left -= 1;
        }

        self.collider.shape.set_center(self.body.pos);
    }

    fn handle_input(&mut self, input: &TickInput) {
        self.moving_x = false;
        if input.left {
            self.body.vel.x =
                (self.body.vel.x - self.tuning.horizontal_accel).max(-self.tuning.horizontal_speed_max);
            self.moving_x = true;
            self.facing_right = false;
        } else if input.right {
            self.body.vel.x =
                (self.body.vel.x + self.tuning.horizontal_accel).min(self.tuning.horizontal_speed_max);
            self.moving_x = true;
            self.facing_right = true;
        }

        if input.swim {
            self.body.vel.y = self.tuning.swim_power;
            self.modify_oxygen(-self.tuning.oxygen_swim_cost);
        }
    }

    fn drain_oxygen(&mut self) {
        if self.in_finale {
            return;
        }
        let mut drain = self.tuning.oxygen_drain_per_tick;
        if self.moving_x {
            drain += self.tuning.oxygen_move_extra_drain;
        }
        self.modify_oxygen(-drain);
    }

    /// Adjust oxygen, clamped to [0, max]. Hitting exactly zero latches the
    /// drowned state; a drowned diver's oxygen no longer changes until
    /// respawn.
    fn modify_oxygen(&mut self, amount: f64) {
        if self.oxygen_empty || amount == 0.0 {
            return;
        }
        self.oxygen = (self.oxygen + amount).clamp(0.0, self.tuning.max_oxygen);
        self.oxygen_empty = self.oxygen == 0.0;
    }

    /// Per-tick recovery while overlapping an oxygen spot.
    pub fn recover_oxygen(&mut self) {
        self.modify_oxygen(self.tuning.oxygen_recovery_per_tick);
    }

    /// React to enemy contact: knockback opposite the facing direction, an
    /// oxygen deduction and an invincibility window. Ignored while already
    /// invincible, drowned or in the finale.
    pub fn take_damage(&mut self) {
        if self.is_invincible() || self.oxygen_empty || self.in_finale {
            return;
        }

        if self.facing_right {
            self.body.vel.x += -self.tuning.knockback_speed;
        } else {
            self.body.vel.x += self.tuning.knockback_speed;
        }

        self.modify_oxygen(-self.tuning.oxygen_damage);
        self.just_took_damage = true;
        self.invincible_ticks_left = self.tuning.invincible_ticks;
    }

    /// Reset at a checkpoint with full oxygen and spawn protection.
    pub fn respawn(&mut self, spawn_pos: DVec2) {
        self.body.pos = spawn_pos;
        self.body.vel = DVec2::ZERO;
        self.oxygen = self.tuning.max_oxygen;
        self.oxygen_empty = false;
        self.in_finale = false;
        self.finale_warp_active = false;
        self.invincible_ticks_left = self.tuning.invincible_ticks;
        self.collider.shape.set_center(spawn_pos);
        log::info!("diver respawned at ({:.0}, {:.0})", spawn_pos.x, spawn_pos.y);
    }

    /// Begin the finale: input locks and the diver drifts toward a parking
    /// spot offset from the camera center.
    pub fn start_finale(&mut self, camera_center_x: f64) {
        self.in_finale = true;
        self.finale_target_x = camera_center_x + FINALE_OFFSET_X;
        self.finale_warp_active = true;
        self.body.vel = DVec2::ZERO;
        log::info!("finale started, drifting to x={:.0}", self.finale_target_x);
    }

    fn step_finale_warp(&mut self) {
        let dx = self.finale_target_x - self.body.pos.x;
        self.body.pos.x = lerp(self.body.pos.x, self.finale_target_x, FINALE_WARP_LERP);

        if dx.abs() <= FINALE_SNAP_THRESHOLD {
            self.body.pos.x = self.finale_target_x;
            self.finale_warp_active = false;
            self.body.vel.x = 0.0;
            self.moving_x = false;
        }
    }

    pub fn pos(&self) -> DVec2 {
        self.body.pos
    }

    pub fn oxygen(&self) -> f64 {
        self.oxygen
    }

    pub fn max_oxygen(&self) -> f64 {
        self.tuning.max_oxygen
    }

    pub fn is_oxygen_empty(&self) -> bool {
        self.oxygen_empty
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_facing_right(&self) -> bool {
        self.facing_right
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ticks_left > 0
    }

    pub fn is_in_finale(&self) -> bool {
        self.in_finale
    }

    pub fn is_moving_horizontally(&self) -> bool {
        self.moving_x
    }
}
