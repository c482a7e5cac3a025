//! Physics world wrapping Rapier 2D

use artillery_core::{ArtilleryError, Result};
use rapier2d::prelude::*;

/// Wraps Rapier's physics pipeline and body/collider sets
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,

    /// Collision events since the last drain. Contact force events are not
    /// consumed, so their receiver is dropped and sends are discarded.
    collision_recv: crossbeam::channel::Receiver<CollisionEvent>,
    event_handler: ChannelEventCollector,
}

impl PhysicsWorld {
    /// Create a new physics world with standard gravity
    pub fn new() -> Self {
        Self::with_gravity(-9.81)
    }

    /// Create a physics world pulling bodies down the y axis by `gravity_y`
    pub fn with_gravity(gravity_y: f32) -> Self {
        let (collision_send, collision_recv) = crossbeam::channel::unbounded();
        let (contact_force_send, _) = crossbeam::channel::unbounded();
        let event_handler = ChannelEventCollector::new(collision_send, contact_force_send);

        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, gravity_y],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            collision_recv,
            event_handler,
        }
    }

    /// Step the physics simulation by dt seconds
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_handler,
        );
    }

    /// Step repeatedly to cover `seconds` of simulated time, returning the
    /// number of steps taken
    pub fn run_for(&mut self, seconds: f32, dt: f32) -> Result<u32> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ArtilleryError::PhysicsError(format!(
                "time step must be a positive number, got {}",
                dt
            )));
        }
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(ArtilleryError::PhysicsError(format!(
                "simulated time must be a finite non-negative number, got {}",
                seconds
            )));
        }
        let steps = (seconds / dt).ceil();
        if steps > u32::MAX as f32 {
            return Err(ArtilleryError::PhysicsError(format!(
                "{} s at dt {} needs more steps than fit in u32",
                seconds, dt
            )));
        }

        let steps = steps as u32;
        for _ in 0..steps {
            self.step(dt);
        }
        Ok(steps)
    }

    /// Drain collision events accumulated since the last drain
    pub fn drain_collision_events(&self) -> Vec<CollisionEvent> {
        self.collision_recv.try_iter().collect()
    }

    /// Insert a rigid body and return its handle
    pub fn insert_rigid_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(body)
    }

    /// Insert a collider attached to a rigid body
    pub fn insert_collider_with_parent(
        &mut self,
        collider: Collider,
        parent: RigidBodyHandle,
    ) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(collider, parent, &mut self.rigid_body_set)
    }

    /// Remove a rigid body and its attached colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    /// Get a rigid body by handle
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Centre of a body in world space
    pub fn body_position(&self, handle: RigidBodyHandle) -> Option<[f32; 2]> {
        self.rigid_body_set
            .get(handle)
            .map(|b| [b.translation().x, b.translation().y])
    }

    /// Get a collider by handle
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_physics_world() {
        let world = PhysicsWorld::new();
        assert_eq!(world.rigid_body_set.len(), 0);
        assert_eq!(world.collider_set.len(), 0);
    }

    #[test]
    fn test_insert_and_remove_body() {
        let mut world = PhysicsWorld::new();

        let body = RigidBodyBuilder::dynamic()
            .translation(vector![0.0, 5.0])
            .build();
        let handle = world.insert_rigid_body(body);
        world.insert_collider_with_parent(ColliderBuilder::ball(0.5).build(), handle);

        assert_eq!(world.rigid_body_set.len(), 1);
        assert_eq!(world.collider_set.len(), 1);

        world.remove_rigid_body(handle);
        assert_eq!(world.rigid_body_set.len(), 0);
        assert_eq!(world.collider_set.len(), 0);
    }

    #[test]
    fn test_gravity_simulation() {
        let mut world = PhysicsWorld::new();

        let body = RigidBodyBuilder::dynamic()
            .translation(vector![0.0, 10.0])
            .build();
        let handle = world.insert_rigid_body(body);
        world.insert_collider_with_parent(ColliderBuilder::ball(0.5).build(), handle);

        let initial = world.body_position(handle).unwrap();
        let steps = world.run_for(1.0, 1.0 / 60.0).unwrap();
        let fallen = world.body_position(handle).unwrap();

        assert_eq!(steps, 60);
        assert_eq!(initial, [0.0, 10.0]);
        assert!(fallen[1] < initial[1]);
        assert_eq!(fallen[0], 0.0);
    }

    #[test]
    fn test_zero_gravity_keeps_body_still() {
        let mut world = PhysicsWorld::with_gravity(0.0);
        let handle = world.insert_rigid_body(
            RigidBodyBuilder::dynamic().translation(vector![1.0, 2.0]).build(),
        );
        world.insert_collider_with_parent(ColliderBuilder::ball(0.5).build(), handle);

        world.run_for(0.5, 1.0 / 60.0).unwrap();
        assert_eq!(world.body_position(handle), Some([1.0, 2.0]));
    }

    #[test]
    fn run_for_rejects_bad_timing() {
        let mut world = PhysicsWorld::new();
        for (seconds, dt) in [
            (1.0, 0.0),
            (1.0, -0.1),
            (1.0, f32::NAN),
            (f32::INFINITY, 1.0 / 60.0),
            (-1.0, 1.0 / 60.0),
            (1.0e12, 1.0e-3),
        ] {
            assert!(
                matches!(world.run_for(seconds, dt), Err(ArtilleryError::PhysicsError(_))),
                "{} s at dt {} should be rejected",
                seconds,
                dt
            );
        }
        assert_eq!(world.run_for(0.0, 1.0 / 60.0).unwrap(), 0);
    }
}
