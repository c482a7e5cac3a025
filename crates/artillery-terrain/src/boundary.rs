//! Outline extraction: closed polygons from a mesh's unshared edges
//!
//! An edge that belongs to exactly one triangle lies on the mesh outline.
//! Those edges keep the direction their triangle gave them, so following
//! them vertex to vertex walks each outline as a closed loop.
//!
//! Loops after the first are found by looking for an outgoing edge at the
//! vertex right after the highest index visited so far. That matches how the
//! mesh builder lays out disjoint strips (contiguous, increasing index
//! ranges); it is not a general polygon extraction.

use std::collections::HashMap;

use artillery_core::{MeshDefect, Result, Vec2};
use serde::Serialize;

/// Unordered vertex pair, stored as (min, max)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    pub lo: u32,
    pub hi: u32,
}

impl EdgeKey {
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            lo: a.min(b),
            hi: a.max(b),
        }
    }
}

/// One closed outline, in walk order. The closing segment from the last
/// point back to the first is implicit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryLoop {
    /// Mesh vertex indices visited
    pub indices: Vec<u32>,
    /// Positions of those vertices (x, y)
    pub points: Vec<Vec2>,
}

impl BoundaryLoop {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shoelace area; the sign gives the winding (positive = counter-clockwise)
    pub fn signed_area(&self) -> f32 {
        let n = self.points.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x as f64 * b.y as f64 - a.y as f64 * b.x as f64
            })
            .sum();
        (twice * 0.5) as f32
    }

    /// Points plus segment indices with the closing segment included,
    /// the layout polyline colliders expect.
    pub fn polyline(&self) -> (Vec<[f32; 2]>, Vec<[u32; 2]>) {
        let n = self.points.len() as u32;
        let points = self.points.iter().map(Vec2::to_array).collect();
        let segments = (0..n).map(|i| [i, (i + 1) % n]).collect();
        (points, segments)
    }
}

/// Directed outline edges that survive deduplication, keyed by the edge
fn boundary_edges(triangles: &[[u32; 3]], vertex_count: usize) -> Result<Vec<(u32, u32)>> {
    // key -> (directed edge, times seen); insertion order kept in `order`
    let mut seen: HashMap<EdgeKey, ((u32, u32), u8)> = HashMap::new();
    let mut order = Vec::new();

    for tri in triangles {
        for &index in tri {
            if index as usize >= vertex_count {
                return Err(MeshDefect::IndexOutOfRange {
                    index,
                    vertex_count,
                }
                .into());
            }
        }

        for e in 0..3 {
            let from = tri[e];
            let to = tri[(e + 1) % 3];
            let key = EdgeKey::new(from, to);

            let entry = seen.entry(key).or_insert_with(|| {
                order.push(key);
                ((from, to), 0)
            });
            entry.1 += 1;
            if entry.1 > 2 {
                return Err(MeshDefect::NonManifoldEdge {
                    a: key.lo,
                    b: key.hi,
                }
                .into());
            }
        }
    }

    Ok(order
        .into_iter()
        .filter_map(|key| match seen[&key] {
            (edge, 1) => Some(edge),
            _ => None,
        })
        .collect())
}

/// Follow `lookup` from vertex 0, then from each `highest + 1` that has an
/// outgoing edge. No walk may take more steps than there are edges.
fn trace_loops(lookup: &HashMap<u32, u32>, edge_count: usize) -> Result<Vec<Vec<u32>>> {
    let mut loops = Vec::new();
    let mut start = 0u32;
    let mut highest = start;

    loop {
        let mut indices = Vec::new();
        let mut current = start;

        loop {
            if indices.len() >= edge_count {
                return Err(MeshDefect::UnclosedLoop {
                    start,
                    steps: indices.len(),
                }
                .into());
            }
            indices.push(current);

            current = *lookup
                .get(&current)
                .ok_or(MeshDefect::MissingEdge { vertex: current })?;
            highest = highest.max(current);

            if current == start {
                break;
            }
        }
        loops.push(indices);

        match highest.checked_add(1) {
            Some(next) if lookup.contains_key(&next) => {
                start = next;
                highest = next;
            }
            _ => break,
        }
    }

    Ok(loops)
}

/// Trace the outline of a triangle mesh into closed loops.
///
/// `positions` supplies the point for each vertex index (z is dropped).
/// A mesh with no triangles has no outline.
pub fn extract_boundary(triangles: &[[u32; 3]], positions: &[[f32; 3]]) -> Result<Vec<BoundaryLoop>> {
    let edges = boundary_edges(triangles, positions.len())?;
    if edges.is_empty() {
        return Ok(Vec::new());
    }

    let mut lookup: HashMap<u32, u32> = HashMap::with_capacity(edges.len());
    for &(from, to) in &edges {
        if lookup.insert(from, to).is_some() {
            return Err(MeshDefect::BranchingVertex { vertex: from }.into());
        }
    }

    let loops: Vec<BoundaryLoop> = trace_loops(&lookup, edges.len())?
        .into_iter()
        .map(|indices| {
            let points = indices
                .iter()
                .map(|&i| {
                    let p = positions[i as usize];
                    Vec2::new(p[0], p[1])
                })
                .collect();
            BoundaryLoop { indices, points }
        })
        .collect();

    tracing::debug!(
        boundary_edges = edges.len(),
        loops = loops.len(),
        "extracted mesh outline"
    );

    Ok(loops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulate::triangulate;
    use artillery_core::ArtilleryError;

    fn strip_positions(tops: &[f32]) -> Vec<[f32; 3]> {
        tops.iter()
            .enumerate()
            .flat_map(|(i, &h)| [[i as f32, h, 0.0], [i as f32, h - 1.0, 0.0]])
            .collect()
    }

    fn defect(result: Result<Vec<BoundaryLoop>>) -> MeshDefect {
        match result {
            Err(ArtilleryError::MalformedMesh(d)) => d,
            other => panic!("expected a mesh defect, got {:?}", other),
        }
    }

    #[test]
    fn single_quad_has_one_loop() {
        let positions = strip_positions(&[5.0, 5.0]);
        let loops = extract_boundary(&triangulate(4), &positions).unwrap();

        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].indices, vec![0, 2, 3, 1]);
        assert_eq!(
            loops[0].points,
            vec![
                Vec2::new(0.0, 5.0),
                Vec2::new(1.0, 5.0),
                Vec2::new(1.0, 4.0),
                Vec2::new(0.0, 4.0),
            ]
        );
    }

    #[test]
    fn ribbon_of_six_visits_every_vertex() {
        let positions = strip_positions(&[2.0, 3.0, 2.5]);
        let loops = extract_boundary(&triangulate(6), &positions).unwrap();

        assert_eq!(loops.len(), 1);
        let mut visited = loops[0].indices.clone();
        visited.sort_unstable();
        assert_eq!(visited, vec![0, 1, 2, 3, 4, 5]);
        // tops left to right, then bottoms right to left
        assert_eq!(loops[0].indices, vec![0, 2, 4, 5, 3, 1]);
    }

    #[test]
    fn interior_edges_are_dropped() {
        let edges = boundary_edges(&triangulate(8), 8).unwrap();
        // 8-vertex strip: 3 tops + 3 bottoms + 2 end caps
        assert_eq!(edges.len(), 8);
        for &(a, b) in &edges {
            assert_ne!(EdgeKey::new(a, b), EdgeKey::new(0, 3));
            assert_ne!(EdgeKey::new(a, b), EdgeKey::new(2, 3));
        }
    }

    #[test]
    fn long_strip_is_clockwise() {
        let tops: Vec<f32> = (0..50).map(|i| 5.0 + (i as f32 * 0.3).sin()).collect();
        let positions = strip_positions(&tops);
        let loops = extract_boundary(&triangulate(positions.len()), &positions).unwrap();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), positions.len());
        // ribbon is 1 unit tall and 49 units long
        assert!((loops[0].signed_area() + 49.0).abs() < 1e-3);
    }

    #[test]
    fn disjoint_strips_give_separate_loops() {
        let mut triangles = triangulate(6);
        triangles.extend(triangulate(4).iter().map(|t| t.map(|i| i + 6)));
        let mut positions = strip_positions(&[1.0, 1.0, 1.0]);
        positions.extend(
            strip_positions(&[7.0, 7.0])
                .into_iter()
                .map(|p| [p[0] + 10.0, p[1], p[2]]),
        );

        let loops = extract_boundary(&triangles, &positions).unwrap();
        assert_eq!(loops.len(), 2);
        assert_eq!(loops[0].indices, vec![0, 2, 4, 5, 3, 1]);
        assert_eq!(loops[1].indices, vec![6, 8, 9, 7]);
        assert_eq!(loops[1].points[0], Vec2::new(10.0, 7.0));
    }

    #[test]
    fn empty_mesh_has_no_loops() {
        assert!(extract_boundary(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn polyline_closes_the_loop() {
        let positions = strip_positions(&[5.0, 5.0]);
        let loops = extract_boundary(&triangulate(4), &positions).unwrap();
        let (points, segments) = loops[0].polyline();
        assert_eq!(points.len(), 4);
        assert_eq!(segments, vec![[0, 1], [1, 2], [2, 3], [3, 0]]);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let positions = strip_positions(&[5.0]);
        assert_eq!(
            defect(extract_boundary(&triangulate(4), &positions)),
            MeshDefect::IndexOutOfRange {
                index: 3,
                vertex_count: 2
            }
        );
    }

    #[test]
    fn edge_in_three_triangles_is_rejected() {
        let positions = vec![[0.0; 3]; 5];
        let triangles = [[0, 1, 2], [1, 0, 3], [0, 1, 4]];
        assert_eq!(
            defect(extract_boundary(&triangles, &positions)),
            MeshDefect::NonManifoldEdge { a: 0, b: 1 }
        );
    }

    #[test]
    fn bow_tie_is_rejected() {
        // Two triangles sharing only vertex 0: it has two outgoing edges
        let positions = vec![[0.0; 3]; 5];
        let triangles = [[0, 1, 2], [0, 3, 4]];
        assert_eq!(
            defect(extract_boundary(&triangles, &positions)),
            MeshDefect::BranchingVertex { vertex: 0 }
        );
    }

    #[test]
    fn outline_not_touching_vertex_zero_is_rejected() {
        let positions = vec![[0.0; 3]; 4];
        let triangles = [[1, 2, 3]];
        assert_eq!(
            defect(extract_boundary(&triangles, &positions)),
            MeshDefect::MissingEdge { vertex: 0 }
        );
    }

    #[test]
    fn walk_into_a_cycle_without_the_start_is_bounded() {
        // 0 leads into the cycle 1 -> 2 -> 3 -> 1 and never comes back
        let lookup = HashMap::from([(0, 1), (1, 2), (2, 3), (3, 1)]);
        match trace_loops(&lookup, lookup.len()) {
            Err(ArtilleryError::MalformedMesh(MeshDefect::UnclosedLoop { start, steps })) => {
                assert_eq!(start, 0);
                assert_eq!(steps, 4);
            }
            other => panic!("expected an unclosed loop, got {:?}", other),
        }
    }

    #[test]
    fn second_loop_starts_after_highest_visited() {
        let lookup = HashMap::from([(0, 2), (2, 1), (1, 0), (3, 4), (4, 3), (9, 9)]);
        let loops = trace_loops(&lookup, lookup.len()).unwrap();
        // 9 is never reached: nothing starts at 5
        assert_eq!(loops, vec![vec![0, 2, 1], vec![3, 4]]);
    }
}
