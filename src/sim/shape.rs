//! Collision shapes and the pairwise intersection matrix
//!
//! A closed set of three primitives covers every hitbox in the game: circles
//! (the diver, round enemies), axis-aligned rectangles (oxygen spots, boxy
//! enemies) and line segments (tentacles, tripwires). Keeping the set closed
//! means the full 3x3 test matrix lives in one place instead of behind a
//! trait hierarchy.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A collision primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { center: DVec2, radius: f64 },
    Rect { center: DVec2, width: f64, height: f64 },
    Segment { a: DVec2, b: DVec2 },
}

impl Shape {
    pub fn circle(center: DVec2, radius: f64) -> Self {
        Self::Circle { center, radius }
    }

    pub fn rect(center: DVec2, width: f64, height: f64) -> Self {
        Self::Rect {
            center,
            width,
            height,
        }
    }

    pub fn segment(a: DVec2, b: DVec2) -> Self {
        Self::Segment { a, b }
    }

    /// Geometric center (midpoint for segments)
    pub fn center(&self) -> DVec2 {
        match *self {
            Self::Circle { center, .. } | Self::Rect { center, .. } => center,
            Self::Segment { a, b } => (a + b) * 0.5,
        }
    }

    /// Move the shape so its center lands on `center`.
    ///
    /// Owners call this every frame before the collision pass so the hitbox
    /// tracks the entity's post-movement position. Segments translate rigidly
    /// about their midpoint.
    pub fn set_center(&mut self, new_center: DVec2) {
        match self {
            Self::Circle { center, .. } | Self::Rect { center, .. } => *center = new_center,
            Self::Segment { a, b } => {
                let delta = new_center - (*a + *b) * 0.5;
                *a += delta;
                *b += delta;
            }
        }
    }

    /// Exact overlap test between any two primitives.
    pub fn intersects(&self, other: &Shape) -> bool {
        use Shape::*;
        match (*self, *other) {
            (
                Circle {
                    center: c1,
                    radius: r1,
                },
                Circle {
                    center: c2,
                    radius: r2,
                },
            ) => circle_circle(c1, r1, c2, r2),
            (
                Circle { center, radius },
                Rect {
                    center: rc,
                    width,
                    height,
                },
            )
            | (
                Rect {
                    center: rc,
                    width,
                    height,
                },
                Circle { center, radius },
            ) => circle_rect(center, radius, rc, width, height),
            (Circle { center, radius }, Segment { a, b })
            | (Segment { a, b }, Circle { center, radius }) => {
                segment_circle(a, b, center, radius)
            }
            (
                Rect {
                    center: c1,
                    width: w1,
                    height: h1,
                },
                Rect {
                    center: c2,
                    width: w2,
                    height: h2,
                },
            ) => rect_rect(c1, w1, h1, c2, w2, h2),
            (
                Rect {
                    center,
                    width,
                    height,
                },
                Segment { a, b },
            )
            | (
                Segment { a, b },
                Rect {
                    center,
                    width,
                    height,
                },
            ) => segment_rect(a, b, center, width, height),
            (Segment { a, b }, Segment { a: c, b: d }) => segment_segment(a, b, c, d),
        }
    }
}

fn circle_circle(c1: DVec2, r1: f64, c2: DVec2, r2: f64) -> bool {
    c1.distance_squared(c2) <= (r1 + r2) * (r1 + r2)
}

/// Clamp the circle center into the rectangle; overlap iff the clamped point
/// is within the radius.
fn circle_rect(center: DVec2, radius: f64, rc: DVec2, width: f64, height: f64) -> bool {
    let half = DVec2::new(width * 0.5, height * 0.5);
    let clamped = center.clamp(rc - half, rc + half);
    center.distance_squared(clamped) <= radius * radius
}

fn rect_rect(c1: DVec2, w1: f64, h1: f64, c2: DVec2, w2: f64, h2: f64) -> bool {
    (c1.x - c2.x).abs() <= (w1 + w2) * 0.5 && (c1.y - c2.y).abs() <= (h1 + h2) * 0.5
}

/// Closest point on segment ab to `point`, by clamped projection
fn closest_point_on_segment(a: DVec2, b: DVec2, point: DVec2) -> DVec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1.0e-12 {
        return a; // degenerate segment
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

fn segment_circle(a: DVec2, b: DVec2, center: DVec2, radius: f64) -> bool {
    closest_point_on_segment(a, b, center).distance_squared(center) <= radius * radius
}

fn segment_rect(a: DVec2, b: DVec2, rc: DVec2, width: f64, height: f64) -> bool {
    let half = DVec2::new(width * 0.5, height * 0.5);
    let min = rc - half;
    let max = rc + half;

    let inside = |p: DVec2| p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y;
    if inside(a) || inside(b) {
        return true;
    }

    // Neither endpoint inside: the segment overlaps iff it crosses an edge
    let corners = [
        min,
        DVec2::new(max.x, min.y),
        max,
        DVec2::new(min.x, max.y),
    ];
    (0..4).any(|i| segment_segment(a, b, corners[i], corners[(i + 1) % 4]))
}

/// Orientation-based 2D segment intersection, collinear touching included
fn segment_segment(a: DVec2, b: DVec2, c: DVec2, d: DVec2) -> bool {
    let d1 = (d - c).perp_dot(a - c);
    let d2 = (d - c).perp_dot(b - c);
    let d3 = (b - a).perp_dot(c - a);
    let d4 = (b - a).perp_dot(d - a);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_collinear_segment(c, d, a))
        || (d2 == 0.0 && on_collinear_segment(c, d, b))
        || (d3 == 0.0 && on_collinear_segment(a, b, c))
        || (d4 == 0.0 && on_collinear_segment(a, b, d))
}

/// Assuming p is collinear with ab, is it within the segment's bounding box?
fn on_collinear_segment(a: DVec2, b: DVec2, p: DVec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}
