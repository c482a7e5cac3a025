//! Terrain generation summary command

use anyhow::Result;
use artillery_terrain::{Terrain, TerrainMesh};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LayerSummary {
    pub name: String,
    pub tag: String,
    pub texture: String,
    pub depth: f32,
    pub vertices: usize,
    pub triangles: usize,
    pub bounds_min: [f32; 3],
    pub bounds_max: [f32; 3],
}

#[derive(Debug, Serialize)]
pub struct LoopSummary {
    pub points: usize,
    pub area: f32,
}

#[derive(Debug, Serialize)]
pub struct TerrainSummary {
    pub seed: Option<u64>,
    pub samples: usize,
    pub width: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub layers: Vec<LayerSummary>,
    pub outlines: Vec<LoopSummary>,
}

impl LayerSummary {
    fn from_mesh(mesh: &TerrainMesh) -> Self {
        Self {
            name: mesh.name().to_string(),
            tag: mesh.tag().to_string(),
            texture: mesh.texture.clone(),
            depth: mesh.layer.depth(),
            vertices: mesh.vertex_count(),
            triangles: mesh.triangle_count(),
            bounds_min: mesh.bounds.min.to_array(),
            bounds_max: mesh.bounds.max.to_array(),
        }
    }
}

impl TerrainSummary {
    pub fn from_terrain(terrain: &Terrain) -> Self {
        let (min_height, max_height) = terrain.heightmap.range();
        Self {
            seed: terrain.seed,
            samples: terrain.heightmap.len(),
            width: terrain.width(),
            min_height,
            max_height,
            layers: vec![
                LayerSummary::from_mesh(&terrain.fill),
                LayerSummary::from_mesh(&terrain.detail),
            ],
            outlines: terrain
                .boundary
                .iter()
                .map(|l| LoopSummary {
                    points: l.len(),
                    area: l.signed_area().abs(),
                })
                .collect(),
        }
    }

    fn print_text(&self) {
        match self.seed {
            Some(seed) => println!("Seed: {}", seed),
            None => println!("Seed: (none)"),
        }
        println!("Samples: {} over {:.2} units", self.samples, self.width);
        println!("Height range: {:.3} .. {:.3}", self.min_height, self.max_height);
        println!();

        println!("Layers:");
        for layer in &self.layers {
            println!(
                "  {} [{}] z={} : {} vertices, {} triangles",
                layer.name, layer.tag, layer.depth, layer.vertices, layer.triangles
            );
            if !layer.texture.is_empty() {
                println!("    texture: {}", layer.texture);
            }
            println!(
                "    bounds: ({:.2}, {:.2}) .. ({:.2}, {:.2})",
                layer.bounds_min[0], layer.bounds_min[1], layer.bounds_max[0], layer.bounds_max[1]
            );
        }
        println!();

        println!("Collision outlines: {}", self.outlines.len());
        for (i, outline) in self.outlines.iter().enumerate() {
            println!("  #{}: {} points, area {:.3}", i, outline.points, outline.area);
        }
    }
}

pub fn run(config: &str, seed: Option<u64>, format: &str) -> Result<()> {
    let terrain = super::build_terrain(config, seed)?;
    let summary = TerrainSummary::from_terrain(&terrain);

    match format {
        "text" => summary.print_text(),
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        _ => anyhow::bail!("Unknown format: {}", format),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use artillery_terrain::TerrainConfig;

    #[test]
    fn summary_reports_both_layers() {
        let terrain = Terrain::generate(&TerrainConfig {
            world_width: 12.0,
            resolution: 2.0,
            seed: Some(4),
            detail_texture: "grass.png".to_string(),
            ..Default::default()
        })
        .unwrap();
        let summary = TerrainSummary::from_terrain(&terrain);

        assert_eq!(summary.seed, Some(4));
        assert_eq!(summary.samples, 25);
        assert_eq!(summary.layers.len(), 2);
        assert_eq!(summary.layers[0].name, "Generated Terrain");
        assert_eq!(summary.layers[1].texture, "grass.png");
        assert_eq!(summary.layers[1].depth, -2.0);
        assert_eq!(summary.layers[1].triangles, 48);
        assert_eq!(summary.outlines.len(), 1);
        assert!((summary.outlines[0].area - 12.0).abs() < 1e-3);
    }

    #[test]
    fn summary_serializes_to_json() {
        let terrain = Terrain::generate(&TerrainConfig {
            seed: Some(9),
            ..Default::default()
        })
        .unwrap();
        let json = serde_json::to_value(TerrainSummary::from_terrain(&terrain)).unwrap();

        assert_eq!(json["seed"], 9);
        assert_eq!(json["layers"][1]["tag"], "Ground");
        assert!(json["outlines"].as_array().is_some());
    }
}
