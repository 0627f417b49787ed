//! Fan triangulation and winding correction

/// Fan-triangulate convex polygons.
///
/// `corners` maps every polygon corner (in source order) to its output vertex.
/// A polygon of `n` corners starting at corner `c` emits `(c, c+1+p, c+2+p)`
/// for `p` in `0..n-2`. Polygons with fewer than 3 corners emit nothing.
pub fn triangulate(corners: &[u32], polygon_sizes: &[u32]) -> Vec<u32> {
    let triangle_total: usize = polygon_sizes
        .iter()
        .map(|&n| (n as usize).saturating_sub(2))
        .sum();
    let mut indices = Vec::with_capacity(triangle_total * 3);

    let mut start = 0usize;
    for &size in polygon_sizes {
        let size = size as usize;
        for p in 0..size.saturating_sub(2) {
            indices.push(corners[start]);
            indices.push(corners[start + 1 + p]);
            indices.push(corners[start + 2 + p]);
        }
        start += size;
    }
    indices
}

/// Reverse every triangle by swapping its first and last index
pub fn flip_winding(indices: &mut [u32]) {
    for triangle in indices.chunks_exact_mut(3) {
        triangle.swap(0, 2);
    }
}
