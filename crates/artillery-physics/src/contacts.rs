//! Ground-contact tracking from collision events

use std::collections::{HashMap, HashSet};

use rapier2d::prelude::*;

use crate::ground::is_ground;
use crate::world::PhysicsWorld;

/// Tracks which bodies are resting on terrain ground.
///
/// Fed with the collision events drained after each step; a body is
/// grounded while any of its colliders touches a ground collider.
#[derive(Debug, Default)]
pub struct GroundContacts {
    /// (ground collider, other collider) pairs currently touching
    pairs: HashSet<(ColliderHandle, ColliderHandle)>,
    /// Owning body of each non-ground collider seen in a pair
    owners: HashMap<ColliderHandle, RigidBodyHandle>,
}

impl GroundContacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one collision event
    pub fn handle_event(&mut self, world: &PhysicsWorld, event: &CollisionEvent) {
        match *event {
            CollisionEvent::Started(c1, c2, _) => {
                let (ground, other) = match (is_ground(world, c1), is_ground(world, c2)) {
                    (true, false) => (c1, c2),
                    (false, true) => (c2, c1),
                    _ => return,
                };
                let Some(body) = world.get_collider(other).and_then(|c| c.parent()) else {
                    return;
                };
                self.owners.insert(other, body);
                self.pairs.insert((ground, other));
            }
            CollisionEvent::Stopped(c1, c2, _) => {
                // Colliders may already be gone, so match on the stored pair
                let other = if self.pairs.remove(&(c1, c2)) {
                    c2
                } else if self.pairs.remove(&(c2, c1)) {
                    c1
                } else {
                    return;
                };
                if !self.pairs.iter().any(|&(_, o)| o == other) {
                    self.owners.remove(&other);
                }
            }
        }
    }

    /// Drain the world's pending collision events and apply them
    pub fn update(&mut self, world: &PhysicsWorld) {
        for event in world.drain_collision_events() {
            self.handle_event(world, &event);
        }
    }

    pub fn is_grounded(&self, body: RigidBodyHandle) -> bool {
        self.pairs
            .iter()
            .any(|(_, other)| self.owners.get(other) == Some(&body))
    }

    /// Number of ground contacts across all bodies
    pub fn contact_count(&self) -> usize {
        self.pairs.len()
    }
}
