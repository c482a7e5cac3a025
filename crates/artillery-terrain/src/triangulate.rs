//! Quad-strip triangulation for paired (top, bottom) vertex strips

/// Triangle indices for a strip of `vertex_count` vertices laid out as
/// `top0, bottom0, top1, bottom1, ...`.
///
/// Each quad between pair `i` and pair `i + 2` becomes `(i, i+3, i+1)` and
/// `(i+3, i, i+2)`, which keeps the winding of both halves consistent.
/// A strip of `N >= 4` vertices yields `N - 2` triangles.
pub fn triangulate(vertex_count: usize) -> Vec<[u32; 3]> {
    if vertex_count < 4 {
        return Vec::new();
    }

    let mut triangles = Vec::with_capacity(vertex_count - 2);
    for i in (0..=vertex_count - 4).step_by(2) {
        let i = i as u32;
        triangles.push([i, i + 3, i + 1]);
        triangles.push([i + 3, i, i + 2]);
    }
    triangles
}
