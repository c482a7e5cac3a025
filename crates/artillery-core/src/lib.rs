//! Artillery Core - Foundational types for the Artillery game
//!
//! This crate provides the core types that all other Artillery crates depend on:
//! - `Vec2`, `Vec3`, `Aabb` - Spatial types
//! - `Color` - Palette entries for debug output
//! - Error types and Result alias

mod error;
mod types;

pub use error::{ArtilleryError, MeshDefect, Result};
pub use types::{Aabb, Color, Vec2, Vec3};
