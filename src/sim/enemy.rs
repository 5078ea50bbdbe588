//! Enemies
//!
//! Behavior is data: a [`BehaviorKind`] from the catalog picks which
//! integrator step runs each tick. There is no per-behavior type or dynamic
//! dispatch; the enemy is a plain state struct and the integrator functions
//! do the rest.

use glam::DVec2;

use crate::sim::collision::{Collider, ColliderTag};
use crate::sim::physics::{self, KinematicBody};
use crate::sim::shape::Shape;
use crate::sim::stage::Stage;
use crate::tuning::{BehaviorKind, ColliderSpec, EnemySpec};

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub body: KinematicBody,
    pub collider: Collider,

    behavior: BehaviorKind,
    /// Patrol sensor lead
    sensor_lead: f64,
    /// BackAndForth anchor and half-range
    origin: DVec2,
    max_travel: f64,

    facing_right: bool,
    alive: bool,
}

impl Enemy {
    /// Instantiate one enemy of a catalog type at a spawn center.
    pub fn from_spec(id: u32, spec: &EnemySpec, center: DVec2) -> Self {
        let mut body = KinematicBody::new(center, spec.half_extents);
        let mut facing_right = false;

        match spec.behavior {
            BehaviorKind::Patrol => {
                body.vel.x = if spec.initial_facing_right {
                    spec.speed
                } else {
                    -spec.speed
                };
                facing_right = spec.initial_facing_right;
            }
            BehaviorKind::BackAndForth => {
                body.vel.x = spec.initial_velocity_x;
            }
            BehaviorKind::Stationary => {}
        }

        let shape = match spec.collider {
            ColliderSpec::Circle { radius } => Shape::circle(center, radius),
            ColliderSpec::Rect { width, height } => Shape::rect(center, width, height),
        };

        Self {
            id,
            body,
            collider: Collider::new(shape, ColliderTag::Enemy),
            behavior: spec.behavior,
            sensor_lead: spec.sensor_lead,
            origin: center,
            max_travel: spec.max_travel_distance,
            facing_right,
            alive: true,
        }
    }

    /// Advance one tick: run the behavior's movement, then re-center the
    /// hitbox. Enemies move purely horizontally; none of them fall.
    pub fn update(&mut self, stage: &Stage) {
        if !self.alive {
            return;
        }

        match self.behavior {
            BehaviorKind::Stationary => {}
            BehaviorKind::Patrol => {
                if physics::step_x_bouncing(&mut self.body, stage, self.sensor_lead) {
                    self.facing_right = self.body.vel.x > 0.0;
                }
            }
            BehaviorKind::BackAndForth => {
                // Sprite facing intentionally stays fixed through reversals
                physics::step_shuttle(&mut self.body, self.origin.x, self.max_travel);
            }
        }

        self.collider.shape.set_center(self.body.pos);
    }

    pub fn pos(&self) -> DVec2 {
        self.body.pos
    }

    pub fn behavior(&self) -> BehaviorKind {
        self.behavior
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_facing_right(&self) -> bool {
        self.facing_right
    }
}
