//! Axis-separated tile physics for kinematic actors
//!
//! Movement resolves X before Y against the stage grid, probing sensor points
//! just ahead of the body's leading edge and snapping to the tile boundary on
//! a hit. Resolving X first avoids the inside-corner sticking that plagues
//! AABB tile systems when both axes move at once.
//!
//! The sensors look one step ahead rather than sweeping, so a body whose
//! per-tick speed exceeds the tile size can tunnel. Every speed in the game
//! sits far below that threshold.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::sim::stage::Stage;
use crate::tile_origin;

/// Inset that keeps edge sensors off the neighboring tile row/column
const SENSOR_INSET: f64 = 1.0;
/// Below this horizontal speed, friction snaps the body to rest outright
const REST_SPEED: f64 = 0.1;

/// Physical state shared by every moving actor.
///
/// `pos` is the center of the footprint; `half` its half extents against the
/// tile grid (the hitbox used against other entities is separate and usually
/// smaller than the sprite).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicBody {
    pub pos: DVec2,
    pub vel: DVec2,
    pub half: DVec2,
}

impl KinematicBody {
    pub fn new(pos: DVec2, half: DVec2) -> Self {
        Self {
            pos,
            vel: DVec2::ZERO,
            half,
        }
    }
}

/// Integrate gravity into the vertical velocity.
///
/// Ascending bodies feel only `rising_multiplier` of the pull, which turns a
/// swim stroke into a floaty arc instead of a symmetric parabola. The
/// terminal clamp caps descent speed only; an upward impulse passes through
/// untouched.
pub fn apply_gravity(body: &mut KinematicBody, gravity: f64, rising_multiplier: f64, terminal: f64) {
    if body.vel.y < 0.0 {
        body.vel.y += gravity * rising_multiplier;
    } else {
        body.vel.y += gravity;
    }
    body.vel.y = body.vel.y.min(terminal);
}

/// Horizontal drag for a coasting body (no drive input this tick).
pub fn apply_friction(body: &mut KinematicBody, friction: f64) {
    body.vel.x *= friction;
    if body.vel.x.abs() < REST_SPEED {
        body.vel.x = 0.0;
    }
}

/// Advance the X axis, stopping dead on a wall.
///
/// Three sensors cover the leading edge: top and bottom corners inset by one
/// pixel, plus the vertical center, so a thin wall lip cannot slip between
/// probes. On a hit the body snaps flush to the tile boundary and horizontal
/// velocity zeroes. Returns true when a wall was hit.
pub fn step_x_blocking(body: &mut KinematicBody, stage: &Stage) -> bool {
    let tile = stage.tile_size();
    let next_x = body.pos.x + body.vel.x;

    if body.vel.x > 0.0 {
        let sensor_x = next_x + body.half.x;
        if solid_column(stage, sensor_x, body.pos.y, body.half.y) {
            body.pos.x = tile_origin(sensor_x, tile) - body.half.x;
            body.vel.x = 0.0;
            return true;
        }
        body.pos.x = next_x;
    } else if body.vel.x < 0.0 {
        let sensor_x = next_x - body.half.x;
        if solid_column(stage, sensor_x, body.pos.y, body.half.y) {
            body.pos.x = tile_origin(sensor_x, tile) + tile + body.half.x;
            body.vel.x = 0.0;
            return true;
        }
        body.pos.x = next_x;
    }
    false
}

fn solid_column(stage: &Stage, x: f64, center_y: f64, half_h: f64) -> bool {
    stage.is_solid(x, center_y - half_h + SENSOR_INSET)
        || stage.is_solid(x, center_y)
        || stage.is_solid(x, center_y + half_h - SENSOR_INSET)
}

/// Advance the X axis, reversing on a wall instead of stopping.
///
/// A single sensor at the vertical center, pushed `lead` pixels past the
/// edge so wide sprites turn before visually touching the wall. On a hit the
/// body snaps to the boundary (lead included) and horizontal velocity
/// negates. Returns true when the body reversed, so the caller can flip its
/// facing.
pub fn step_x_bouncing(body: &mut KinematicBody, stage: &Stage, lead: f64) -> bool {
    let tile = stage.tile_size();
    let next_x = body.pos.x + body.vel.x;

    if body.vel.x > 0.0 {
        let sensor_x = next_x + body.half.x + lead;
        if stage.is_solid(sensor_x, body.pos.y) {
            body.pos.x = tile_origin(sensor_x, tile) - body.half.x - lead;
            body.vel.x = -body.vel.x;
            return true;
        }
        body.pos.x = next_x;
    } else if body.vel.x < 0.0 {
        let sensor_x = next_x - body.half.x - lead;
        if stage.is_solid(sensor_x, body.pos.y) {
            body.pos.x = tile_origin(sensor_x, tile) + tile + body.half.x + lead;
            body.vel.x = -body.vel.x;
            return true;
        }
        body.pos.x = next_x;
    }
    false
}

/// Advance the Y axis.
///
/// Descending probes the bottom edge's corners (inset one pixel) and lands on
/// the tile top; ascending probes the top edge and stops under the tile
/// bottom. `skip_ceiling` waives the ascent check for this one step so a
/// damage knockback can carry the body up through a ceiling it is already
/// flush against, instead of pinning it there. Returns true when the body
/// landed this step.
pub fn step_y(body: &mut KinematicBody, stage: &Stage, skip_ceiling: bool) -> bool {
    let tile = stage.tile_size();
    let next_y = body.pos.y + body.vel.y;
    let sensor_x_left = body.pos.x - body.half.x + SENSOR_INSET;
    let sensor_x_right = body.pos.x + body.half.x - SENSOR_INSET;

    if body.vel.y > 0.0 {
        let sensor_y = next_y + body.half.y;
        if stage.is_solid(sensor_x_left, sensor_y) || stage.is_solid(sensor_x_right, sensor_y) {
            body.pos.y = tile_origin(sensor_y, tile) - body.half.y;
            body.vel.y = 0.0;
            return true;
        }
        body.pos.y = next_y;
    } else if body.vel.y < 0.0 {
        if skip_ceiling {
            body.pos.y = next_y;
            return false;
        }
        let sensor_y = next_y - body.half.y;
        if stage.is_solid(sensor_x_left, sensor_y) || stage.is_solid(sensor_x_right, sensor_y) {
            body.pos.y = tile_origin(sensor_y, tile) + tile + body.half.y;
            body.vel.y = 0.0;
        } else {
            body.pos.y = next_y;
        }
    }
    false
}

/// Grid-free oscillation between `origin_x ± max_travel`.
///
/// Advances by the current velocity and reverses once the distance from the
/// origin reaches the limit, snapping exactly onto the boundary so overshoot
/// never accumulates. The snap reads the already-reversed velocity: a body
/// now moving right sits on the left boundary and vice versa. Returns true
/// when the body reversed this step.
pub fn step_shuttle(body: &mut KinematicBody, origin_x: f64, max_travel: f64) -> bool {
    body.pos.x += body.vel.x;

    if (body.pos.x - origin_x).abs() >= max_travel {
        body.vel.x = -body.vel.x;
        if body.vel.x > 0.0 {
            body.pos.x = origin_x - max_travel;
        } else {
            body.pos.x = origin_x + max_travel;
        }
        return true;
    }
    false
}
