//! Artillery Terrain - Procedural 2D battlefield generation
//!
//! Generates a midpoint-displacement heightmap, builds the fill and surface
//! detail meshes from it, and traces the detail mesh outline into closed
//! loops for the collision layer. Outputs plain data (positions, UVs,
//! triangles, outlines); creating renderable or physics objects is left to
//! the caller.

pub mod boundary;
pub mod heightmap;
pub mod mesh;
pub mod preview;
pub mod terrain;
pub mod triangulate;

pub use boundary::{extract_boundary, BoundaryLoop, EdgeKey};
pub use heightmap::Heightmap;
pub use mesh::{TerrainLayer, TerrainMesh, GROUND_TAG};
pub use preview::render_preview;
pub use terrain::{Terrain, TerrainConfig};
pub use triangulate::triangulate;
