//! Biplanar terrain layer meshes built from a heightmap

use artillery_core::{Aabb, MeshDefect, Result, Vec2, Vec3};
use serde::Serialize;

use crate::heightmap::Heightmap;

/// Texture repeats across the full width of the fill layer
pub const FILL_TEXTURE_REPEATS: f32 = 20.0;

/// Height span covered by one vertical texture repeat on the fill layer
pub const FILL_TEXTURE_HEIGHT: f32 = 20.0;

/// Vertical thickness of the surface detail ribbon
pub const DETAIL_THICKNESS: f32 = 1.0;

/// Tag the physics layer filters ground contacts on
pub const GROUND_TAG: &str = "Ground";

/// Which of the two terrain layers a mesh belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TerrainLayer {
    /// Solid slab from the surface down to y = 0
    Fill,
    /// Thin ribbon along the surface, drawn in front of the fill
    Detail,
}

impl TerrainLayer {
    /// Depth the layer sits at; the detail ribbon is nearer the camera
    pub fn depth(&self) -> f32 {
        match self {
            TerrainLayer::Fill => 0.0,
            TerrainLayer::Detail => -2.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TerrainLayer::Fill => "Generated Terrain",
            TerrainLayer::Detail => "Generated Terrain Detail",
        }
    }
}

/// Mesh data for one terrain layer, ready for a renderer to upload
#[derive(Debug, Clone)]
pub struct TerrainMesh {
    pub layer: TerrainLayer,
    /// Texture handle passed through to the renderer
    pub texture: String,
    /// Vertex positions (z fixed at the layer depth)
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices into `positions`
    pub triangles: Vec<[u32; 3]>,
    /// Smooth vertex normals
    pub normals: Vec<[f32; 3]>,
    pub bounds: Aabb,
}

impl TerrainMesh {
    /// Assemble a layer mesh, lifting the strip to the layer depth and
    /// deriving normals and bounds.
    ///
    /// Every triangle index must address one of `vertices`.
    pub fn build(
        layer: TerrainLayer,
        vertices: &[Vec2],
        uvs: Vec<[f32; 2]>,
        triangles: Vec<[u32; 3]>,
        texture: impl Into<String>,
    ) -> Result<Self> {
        if let Some(&index) = triangles
            .iter()
            .flatten()
            .find(|&&i| i as usize >= vertices.len())
        {
            return Err(MeshDefect::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            }
            .into());
        }

        let z = layer.depth();
        let points: Vec<Vec3> = vertices.iter().map(|v| v.extend(z)).collect();

        let normals = compute_normals(&points, &triangles);
        let bounds = Aabb::from_points(points.iter().copied());

        Ok(Self {
            layer,
            texture: texture.into(),
            positions: points.iter().map(Vec3::to_array).collect(),
            uvs,
            triangles,
            normals,
            bounds,
        })
    }

    pub fn name(&self) -> &'static str {
        self.layer.name()
    }

    pub fn tag(&self) -> &'static str {
        GROUND_TAG
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Triangle indices flattened for index-buffer upload
    pub fn flat_indices(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }
}

fn spacing(resolution: f32) -> f32 {
    1.0 / resolution.max(1.0)
}

/// Vertex strip for the fill slab: each sample's surface point and the
/// point below it on y = 0.
pub fn fill_vertices(heightmap: &Heightmap, resolution: f32) -> Vec<Vec2> {
    let dx = spacing(resolution);
    let mut vertices = Vec::with_capacity(heightmap.len() * 2);
    for (i, &h) in heightmap.samples().iter().enumerate() {
        let x = i as f32 * dx;
        vertices.push(Vec2::new(x, h));
        vertices.push(Vec2::new(x, 0.0));
    }
    vertices
}

/// Vertex strip for the detail ribbon: each sample's surface point and the
/// point one unit below it.
pub fn detail_vertices(heightmap: &Heightmap, resolution: f32) -> Vec<Vec2> {
    let dx = spacing(resolution);
    let mut vertices = Vec::with_capacity(heightmap.len() * 2);
    for (i, &h) in heightmap.samples().iter().enumerate() {
        let x = i as f32 * dx;
        vertices.push(Vec2::new(x, h));
        vertices.push(Vec2::new(x, h - DETAIL_THICKNESS));
    }
    vertices
}

/// Fill UVs tile horizontally across the sample range and vertically with
/// absolute height.
pub fn fill_uvs(heightmap: &Heightmap) -> Vec<[f32; 2]> {
    let factor = 1.0 / heightmap.len() as f32;
    let mut uvs = Vec::with_capacity(heightmap.len() * 2);
    for (i, &h) in heightmap.samples().iter().enumerate() {
        let u = factor * i as f32 * FILL_TEXTURE_REPEATS;
        uvs.push([u, h / FILL_TEXTURE_HEIGHT]);
        uvs.push([u, 0.0]);
    }
    uvs
}

/// Detail UVs alternate U between 0 and 1 per sample so the ribbon texture
/// spans each segment edge-to-edge regardless of slope.
pub fn detail_uvs(heightmap: &Heightmap) -> Vec<[f32; 2]> {
    let mut uvs = Vec::with_capacity(heightmap.len() * 2);
    for i in 0..heightmap.len() {
        let u = (i % 2) as f32;
        uvs.push([u, 1.0]);
        uvs.push([u, 0.0]);
    }
    uvs
}

/// Area-weighted vertex normals: sum of adjacent face normals, normalized.
fn compute_normals(points: &[Vec3], triangles: &[[u32; 3]]) -> Vec<[f32; 3]> {
    let mut sums = vec![Vec3::ZERO; points.len()];

    for tri in triangles {
        let [a, b, c] = tri.map(|i| i as usize);
        let face = (points[b] - points[a]).cross(&(points[c] - points[a]));
        sums[a] = sums[a] + face;
        sums[b] = sums[b] + face;
        sums[c] = sums[c] + face;
    }

    sums.iter()
        .map(|n| {
            let n = n.normalized();
            if n == Vec3::ZERO {
                Vec3::BACK.to_array()
            } else {
                n.to_array()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use artillery_core::ArtilleryError;
    use crate::triangulate::triangulate;

    #[test]
    fn detail_strip_from_flat_pair() {
        let hm = Heightmap::from_samples(vec![5.0, 5.0]).unwrap();
        let verts = detail_vertices(&hm, 1.0);
        assert_eq!(
            verts,
            vec![
                Vec2::new(0.0, 5.0),
                Vec2::new(0.0, 4.0),
                Vec2::new(1.0, 5.0),
                Vec2::new(1.0, 4.0),
            ]
        );
    }

    #[test]
    fn fill_strip_reaches_baseline() {
        let hm = Heightmap::from_samples(vec![3.0, 4.0, 2.0]).unwrap();
        let verts = fill_vertices(&hm, 2.0);
        assert_eq!(verts.len(), 6);
        assert_eq!(verts[2], Vec2::new(0.5, 4.0));
        assert_eq!(verts[3], Vec2::new(0.5, 0.0));
        assert_eq!(verts[5], Vec2::new(1.0, 0.0));
    }

    #[test]
    fn resolution_below_one_is_clamped() {
        let hm = Heightmap::from_samples(vec![1.0, 1.0, 1.0]).unwrap();
        let verts = fill_vertices(&hm, 0.25);
        assert_eq!(verts[4].x, 2.0);
    }

    #[test]
    fn fill_uvs_tile_with_position_and_height() {
        let hm = Heightmap::from_samples(vec![10.0, 0.0, 5.0, 20.0]).unwrap();
        let uvs = fill_uvs(&hm);
        assert_eq!(uvs.len(), 8);
        assert_eq!(uvs[0], [0.0, 0.5]);
        assert_eq!(uvs[1], [0.0, 0.0]);
        assert!((uvs[6][0] - 15.0).abs() < 1e-5);
        assert!((uvs[6][1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn detail_uvs_alternate() {
        let hm = Heightmap::from_samples(vec![0.0; 3]).unwrap();
        assert_eq!(
            detail_uvs(&hm),
            vec![[0.0, 1.0], [0.0, 0.0], [1.0, 1.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]]
        );
    }

    #[test]
    fn build_sets_depth_normals_and_bounds() {
        let hm = Heightmap::from_samples(vec![5.0, 6.0, 5.0]).unwrap();
        let verts = detail_vertices(&hm, 1.0);
        let mesh = TerrainMesh::build(
            TerrainLayer::Detail,
            &verts,
            detail_uvs(&hm),
            triangulate(verts.len()),
            "grass",
        )
        .unwrap();

        assert_eq!(mesh.name(), "Generated Terrain Detail");
        assert_eq!(mesh.tag(), "Ground");
        assert_eq!(mesh.texture, "grass");
        assert!(mesh.positions.iter().all(|p| p[2] == -2.0));
        assert_eq!(mesh.bounds.min, Vec3::new(0.0, 4.0, -2.0));
        assert_eq!(mesh.bounds.max, Vec3::new(2.0, 6.0, -2.0));
        assert_eq!(mesh.flat_indices().len(), mesh.triangle_count() * 3);

        // A flat strip in the XY plane has every normal along the Z axis
        for n in &mesh.normals {
            assert!(n[0].abs() < 1e-6 && n[1].abs() < 1e-6);
            assert!((n[2].abs() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn isolated_vertex_gets_fallback_normal() {
        let verts = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)];
        let mesh = TerrainMesh::build(TerrainLayer::Fill, &verts, vec![[0.0; 2]; 2], Vec::new(), "")
            .unwrap();
        assert_eq!(mesh.normals, vec![[0.0, 0.0, -1.0]; 2]);
        assert_eq!(mesh.layer.depth(), 0.0);
    }

    #[test]
    fn build_rejects_out_of_range_indices() {
        let verts = [Vec2::new(0.0, 5.0), Vec2::new(0.0, 4.0), Vec2::new(1.0, 5.0)];
        let result = TerrainMesh::build(
            TerrainLayer::Detail,
            &verts,
            vec![[0.0; 2]; 3],
            vec![[0, 1, 2], [2, 1, 3]],
            "",
        );
        assert!(matches!(
            result,
            Err(ArtilleryError::MalformedMesh(MeshDefect::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            }))
        ));
    }
}
