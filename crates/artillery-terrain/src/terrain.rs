//! Terrain configuration and orchestration

use std::path::Path;

use artillery_core::{Aabb, ArtilleryError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::boundary::{extract_boundary, BoundaryLoop};
use crate::heightmap::{check_parameters, Heightmap};
use crate::mesh::{
    detail_uvs, detail_vertices, fill_uvs, fill_vertices, TerrainLayer, TerrainMesh,
};
use crate::triangulate::triangulate;

/// Configuration for terrain generation, read from the `[terrain]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Surface height at the left edge
    pub start_height: f32,
    /// Surface height at the right edge
    pub end_height: f32,
    /// Largest midpoint offset at the first subdivision
    pub roughness: f32,
    /// Horizontal samples per world unit
    pub resolution: f32,
    /// World-space X extent the terrain must cover
    pub world_width: f32,
    /// Fixed seed for reproducible terrain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Texture handle for the fill layer
    pub fill_texture: String,
    /// Texture handle for the detail layer
    pub detail_texture: String,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            start_height: 4.0,
            end_height: 4.0,
            roughness: 3.0,
            resolution: 1.0,
            world_width: 32.0,
            seed: None,
            fill_texture: String::new(),
            detail_texture: String::new(),
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    terrain: TerrainConfig,
}

impl TerrainConfig {
    /// Parse a TOML document containing a `[terrain]` table
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        file.terrain.validate()?;
        Ok(file.terrain)
    }

    /// Load and validate a terrain config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject configurations that cannot produce a terrain
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(ArtilleryError::InvalidConfig(msg));

        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return invalid(format!(
                "resolution must be a positive number, got {}",
                self.resolution
            ));
        }
        if !self.world_width.is_finite() || self.world_width <= 0.0 {
            return invalid(format!(
                "world_width must be a positive number, got {}",
                self.world_width
            ));
        }
        check_parameters(self.start_height, self.end_height, self.roughness)?;
        if self.sample_count() > u32::MAX as usize / 2 - 1 {
            return invalid(format!(
                "{} samples do not fit 32-bit vertex indices",
                self.sample_count()
            ));
        }
        Ok(())
    }

    /// Number of heightmap segments: whole world units times whole samples per unit
    pub fn sample_count(&self) -> usize {
        let width = self.world_width.ceil().max(0.0) as usize;
        let per_unit = self.resolution.ceil().max(0.0) as usize;
        width.saturating_mul(per_unit)
    }

    /// Resolution used for vertex spacing (never below one sample per unit)
    pub fn effective_resolution(&self) -> f32 {
        self.resolution.max(1.0)
    }
}

/// A generated terrain: heightmap, both layer meshes and the collision outline
#[derive(Debug)]
pub struct Terrain {
    /// Seed the heightmap was generated from, when known
    pub seed: Option<u64>,
    pub resolution: f32,
    pub heightmap: Heightmap,
    /// Solid slab behind the surface
    pub fill: TerrainMesh,
    /// Surface ribbon; its outline is the collision boundary
    pub detail: TerrainMesh,
    /// Closed outlines of the detail layer
    pub boundary: Vec<BoundaryLoop>,
}

impl Terrain {
    /// Generate a terrain from a config.
    ///
    /// Uses the configured seed, or draws one so the result can be
    /// reproduced from `Terrain::seed`.
    pub fn generate(config: &TerrainConfig) -> Result<Self> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        Self::build(config, &mut rng, Some(seed))
    }

    /// Generate a terrain drawing displacement from the given random source
    pub fn generate_with_rng<R: Rng + ?Sized>(config: &TerrainConfig, rng: &mut R) -> Result<Self> {
        Self::build(config, rng, config.seed)
    }

    fn build<R: Rng + ?Sized>(config: &TerrainConfig, rng: &mut R, seed: Option<u64>) -> Result<Self> {
        config.validate()?;

        let resolution = config.effective_resolution();
        if resolution != config.resolution {
            tracing::warn!(
                requested = config.resolution,
                used = resolution,
                "resolution below one sample per unit, clamping"
            );
        }

        let length = config.sample_count();
        let heightmap = Heightmap::generate(
            config.start_height,
            config.end_height,
            length,
            config.roughness,
            rng,
        )?;

        let fill_verts = fill_vertices(&heightmap, resolution);
        let fill = TerrainMesh::build(
            TerrainLayer::Fill,
            &fill_verts,
            fill_uvs(&heightmap),
            triangulate(fill_verts.len()),
            config.fill_texture.clone(),
        )?;

        let detail_verts = detail_vertices(&heightmap, resolution);
        let detail = TerrainMesh::build(
            TerrainLayer::Detail,
            &detail_verts,
            detail_uvs(&heightmap),
            triangulate(detail_verts.len()),
            config.detail_texture.clone(),
        )?;

        let boundary = extract_boundary(&detail.triangles, &detail.positions)?;

        tracing::debug!(
            samples = heightmap.len(),
            fill_triangles = fill.triangle_count(),
            detail_triangles = detail.triangle_count(),
            loops = boundary.len(),
            "terrain meshes built"
        );
        tracing::info!(
            width = (heightmap.len() - 1) as f32 / resolution,
            seed = ?seed,
            "generated terrain"
        );

        Ok(Self {
            seed,
            resolution,
            heightmap,
            fill,
            detail,
            boundary,
        })
    }

    /// World-space X extent actually covered by the samples
    pub fn width(&self) -> f32 {
        (self.heightmap.len() - 1) as f32 / self.resolution
    }

    /// Surface height at world x, clamped to the terrain span
    pub fn surface_height(&self, x: f32) -> f32 {
        self.heightmap.sample_at(x * self.resolution)
    }

    /// Bounds of both layers together
    pub fn bounds(&self) -> Aabb {
        self.fill.bounds.union(&self.detail.bounds)
    }

    /// Export the detail layer as a single trimesh for physics.
    /// Returns (vertices, triangle_indices).
    pub fn trimesh_data(&self) -> (Vec<[f32; 3]>, Vec<[u32; 3]>) {
        (self.detail.positions.clone(), self.detail.triangles.clone())
    }
}
