//! Entity-vs-entity collision pass
//!
//! Tile physics keeps actors out of walls; this pass handles the narrow-phase
//! overlap tests between the diver and everything else (enemies, oxygen
//! spots). One subject is tested against every registered other exactly once
//! per frame, and both sides of an overlapping pair record the partner's tag
//! for their reaction code to consult afterwards.

use serde::{Deserialize, Serialize};

use crate::sim::shape::Shape;

/// Category of a collider's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColliderTag {
    Player,
    Enemy,
    Oxygen,
    Wall,
}

/// Per-entity hitbox plus this frame's overlap results.
///
/// Each entity owns exactly one collider and re-centers its shape after
/// moving, before the frame's pass resolves. The result fields are written
/// only by [`CollisionPass::resolve`] and reset by
/// [`CollisionPass::clear_results`] at the top of every frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collider {
    pub shape: Shape,
    pub tag: ColliderTag,
    /// Tags of every partner overlapped this frame, in registration order
    pub collided_tags: Vec<ColliderTag>,
    pub is_colliding: bool,
}

impl Collider {
    pub fn new(shape: Shape, tag: ColliderTag) -> Self {
        Self {
            shape,
            tag,
            collided_tags: Vec::new(),
            is_colliding: false,
        }
    }

    /// Reset this frame's overlap results.
    pub fn clear_results(&mut self) {
        self.collided_tags.clear();
        self.is_colliding = false;
    }

    /// Did this frame's pass record a partner with the given tag?
    pub fn has_contact(&self, tag: ColliderTag) -> bool {
        self.collided_tags.contains(&tag)
    }
}

struct OtherEntry<'a> {
    collider: &'a mut Collider,
    /// Owner id, kept for callers that need to map results back to entities
    entity_id: u32,
}

/// One frame's collision pass.
///
/// Built fresh each frame: registration borrows the colliders for the pass's
/// lifetime, mirroring the per-frame re-registration of the original design
/// without any retained pointers. Dropping the pass releases everything.
#[derive(Default)]
pub struct CollisionPass<'a> {
    subject: Option<&'a mut Collider>,
    others: Vec<OtherEntry<'a>>,
}

impl<'a> CollisionPass<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the single subject (the diver). With no subject registered,
    /// [`resolve`](Self::resolve) is a no-op.
    pub fn register_subject(&mut self, collider: &'a mut Collider) {
        self.subject = Some(collider);
    }

    /// Register one non-subject collider. `entity_id` is opaque bookkeeping;
    /// the pass never interprets it.
    pub fn register_other(&mut self, collider: &'a mut Collider, entity_id: u32) {
        self.others.push(OtherEntry {
            collider,
            entity_id,
        });
    }

    /// Reset every registered collider's results.
    ///
    /// Must run once per frame before [`resolve`](Self::resolve); skipping it
    /// leaves stale tags accumulating frame over frame. Calling it twice is
    /// harmless.
    pub fn clear_results(&mut self) {
        if let Some(subject) = self.subject.as_deref_mut() {
            subject.clear_results();
        }
        for entry in &mut self.others {
            entry.collider.clear_results();
        }
    }

    /// Test the subject against every other once.
    ///
    /// A single O(N) sweep: the others never need to detect each other under
    /// this game's rules. Every overlapping pair records bidirectionally, and
    /// all partners overlapping the subject in the same frame are kept.
    pub fn resolve(&mut self) {
        let Some(subject) = self.subject.as_deref_mut() else {
            return;
        };

        for entry in &mut self.others {
            if subject.shape.intersects(&entry.collider.shape) {
                subject.is_colliding = true;
                subject.collided_tags.push(entry.collider.tag);

                entry.collider.is_colliding = true;
                entry.collider.collided_tags.push(subject.tag);
            }
        }
    }

    /// Entity ids of the others marked colliding, in registration order.
    pub fn colliding_ids(&self) -> Vec<u32> {
        self.others
            .iter()
            .filter(|entry| entry.collider.is_colliding)
            .map(|entry| entry.entity_id)
            .collect()
    }

    /// Drop all registrations without touching the colliders.
    pub fn clear(&mut self) {
        self.subject = None;
        self.others.clear();
    }
}
