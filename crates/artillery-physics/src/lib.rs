//! Artillery Physics - Rapier 2D integration
//!
//! Turns terrain outlines into collision geometry:
//! - `PhysicsWorld` - wraps Rapier pipeline, body/collider sets
//! - `insert_ground` - fixed ground body with one polyline collider per outline
//! - `GroundContacts` - tracks which bodies are resting on the ground

pub mod contacts;
pub mod ground;
pub mod world;

pub use rapier2d;

pub use contacts::GroundContacts;
pub use ground::{insert_ground, is_ground, GroundHandle, GROUND_USER_DATA};
pub use world::PhysicsWorld;
