//! Merging processed sub-meshes into the single output mesh

use super::types::Mesh;

impl Mesh {
    /// Append `other`, offsetting its triangle indices by the current vertex count.
    ///
    /// `other`'s per-control-point skin lists are appended too, and its vertex
    /// sources are shifted so they keep addressing their own control points.
    pub fn append(&mut self, other: Mesh) {
        let base = self.vertices.len() as u32;
        let position_base = self.skin.point_weights.len() as u32;

        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
        self.sources.extend(other.sources.into_iter().map(|mut source| {
            source.position += position_base;
            source
        }));
        self.skin.point_weights.extend(other.skin.point_weights);
    }
}

/// Collapse sub-meshes, in collection order, into one mesh
pub fn combine_meshes(meshes: Vec<Mesh>) -> Mesh {
    let mut iter = meshes.into_iter();
    let Some(mut combined) = iter.next() else {
        return Mesh::default();
    };
    for mesh in iter {
        combined.append(mesh);
    }
    combined
}
