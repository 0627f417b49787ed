//! Tangent frame generation for meshes that don't supply one

use glam::DVec3;

use super::types::Vertex;

/// Derive tangents and bitangents from positions and UVs.
///
/// Per triangle the UV edge system is solved against the position edges; the
/// unnormalized result is accumulated on each of the three vertices, averaged
/// by the number of triangles sharing the vertex and then normalized.
/// Triangles with a zero UV determinant contribute nothing, and vertices no
/// triangle references keep zero vectors.
pub fn generate_tangents(vertices: &mut [Vertex], indices: &[u32]) {
    let mut tangents = vec![DVec3::ZERO; vertices.len()];
    let mut bitangents = vec![DVec3::ZERO; vertices.len()];
    let mut shared = vec![0u32; vertices.len()];

    for face in indices.chunks_exact(3) {
        let [a, b, c] = [face[0] as usize, face[1] as usize, face[2] as usize];
        for &v in &[a, b, c] {
            shared[v] += 1;
        }

        let edge1 = vertices[b].position - vertices[a].position;
        let edge2 = vertices[c].position - vertices[a].position;
        let delta_uv1 = vertices[b].uv - vertices[a].uv;
        let delta_uv2 = vertices[c].uv - vertices[a].uv;

        let denominator = delta_uv1.x * delta_uv2.y - delta_uv2.x * delta_uv1.y;
        if denominator == 0.0 {
            continue;
        }
        let r = 1.0 / denominator;

        let tangent = (edge1 * delta_uv2.y - edge2 * delta_uv1.y) * r;
        let bitangent = (edge2 * delta_uv1.x - edge1 * delta_uv2.x) * r;

        for &v in &[a, b, c] {
            tangents[v] += tangent;
            bitangents[v] += bitangent;
        }
    }

    for (i, vertex) in vertices.iter_mut().enumerate() {
        if shared[i] == 0 {
            vertex.tangent = DVec3::ZERO;
            vertex.bitangent = DVec3::ZERO;
            continue;
        }
        let count = shared[i] as f64;
        vertex.tangent = (tangents[i] / count).normalize_or_zero();
        vertex.bitangent = (bitangents[i] / count).normalize_or_zero();
    }
}
