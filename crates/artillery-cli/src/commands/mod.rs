//! CLI command implementations

pub mod drop;
pub mod generate;
pub mod preview;

use anyhow::{Context, Result};
use artillery_terrain::{Terrain, TerrainConfig};
use std::path::Path;

/// Load a terrain config, apply a seed override and build the terrain
pub fn build_terrain(config_path: &str, seed: Option<u64>) -> Result<Terrain> {
    let mut config = TerrainConfig::load(Path::new(config_path))
        .with_context(|| format!("Failed to load terrain config '{}'", config_path))?;
    if seed.is_some() {
        config.seed = seed;
    }

    Terrain::generate(&config).context("Failed to generate terrain")
}
