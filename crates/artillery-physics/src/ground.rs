//! Static ground body built from terrain outlines

use artillery_core::{ArtilleryError, Result};
use artillery_terrain::BoundaryLoop;
use rapier2d::prelude::*;

use crate::world::PhysicsWorld;

/// Collider user data marking terrain ground ("Ground" tag)
pub const GROUND_USER_DATA: u128 = u128::from_le_bytes(*b"artillery-ground");

/// Handles to the ground body and its outline colliders
#[derive(Debug, Clone)]
pub struct GroundHandle {
    pub body: RigidBodyHandle,
    pub colliders: Vec<ColliderHandle>,
}

/// Create one fixed body with a closed polyline collider per outline.
pub fn insert_ground(world: &mut PhysicsWorld, loops: &[BoundaryLoop]) -> Result<GroundHandle> {
    if loops.is_empty() {
        return Err(ArtilleryError::PhysicsError(
            "cannot build ground without any outline".to_string(),
        ));
    }
    if let Some(short) = loops.iter().find(|l| l.len() < 3) {
        return Err(ArtilleryError::PhysicsError(format!(
            "ground outline needs at least 3 points, got {}",
            short.len()
        )));
    }

    let body = world.insert_rigid_body(RigidBodyBuilder::fixed().build());

    let colliders = loops
        .iter()
        .map(|outline| {
            let (points, segments) = outline.polyline();
            let vertices = points.iter().map(|p| point![p[0], p[1]]).collect();
            let collider = ColliderBuilder::polyline(vertices, Some(segments))
                .user_data(GROUND_USER_DATA)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .build();
            world.insert_collider_with_parent(collider, body)
        })
        .collect();

    Ok(GroundHandle { body, colliders })
}

/// Whether a collider belongs to terrain ground
pub fn is_ground(world: &PhysicsWorld, collider: ColliderHandle) -> bool {
    world
        .get_collider(collider)
        .map(|c| c.user_data == GROUND_USER_DATA)
        .unwrap_or(false)
}
