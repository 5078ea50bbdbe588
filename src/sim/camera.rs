//! Vertically tracking camera
//!
//! The stage is a narrow vertical shaft, so the camera's X is fixed at the
//! stage center and only Y tracks the diver, smoothed so landings and swim
//! strokes don't jerk the view. A configurable offset ratio frames the diver
//! above or below the view center depending on the game phase.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::CAMERA_SMOOTHING;
use crate::lerp;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    fixed_x: f64,
    view_size: DVec2,
    /// Pixel offset added to the target before smoothing
    y_offset: f64,
    target_y: f64,
    current_y: f64,
}

impl Camera {
    pub fn new(fixed_x: f64, view_size: DVec2, initial_target_y: f64) -> Self {
        let y_offset = view_size.y / 6.0;
        Self {
            fixed_x,
            view_size,
            y_offset,
            target_y: initial_target_y,
            current_y: initial_target_y + y_offset,
        }
    }

    /// Point the camera at a new target Y (usually the diver's position)
    pub fn set_target_y(&mut self, target_y: f64) {
        self.target_y = target_y;
    }

    /// Re-frame: offset the tracked point by `ratio` of the view height
    pub fn set_offset_ratio(&mut self, ratio: f64) {
        self.y_offset = self.view_size.y * ratio;
    }

    /// Smoothly move the current center toward the goal
    pub fn update(&mut self) {
        let goal_y = self.target_y + self.y_offset;
        self.current_y = lerp(self.current_y, goal_y, CAMERA_SMOOTHING);
    }

    /// Current camera center in world space
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.fixed_x, self.current_y)
    }

    /// Top-left corner of the view in world space
    pub fn offset(&self) -> DVec2 {
        self.center() - self.view_size * 0.5
    }

    /// Visible world rectangle as (top-left, size)
    pub fn view_rect(&self) -> (DVec2, DVec2) {
        (self.offset(), self.view_size)
    }
}
