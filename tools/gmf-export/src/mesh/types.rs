//! Types for mesh processing

use glam::{DVec2, DVec3};
use gmf_common::INFLUENCES_PER_VERTEX;

use crate::skin::SkinData;

/// One (bone, weight) pairing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Influence {
    pub bone: u32,
    pub weight: f64,
}

/// Output vertex, in target space and winding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: DVec3,
    pub normal: DVec3,
    pub uv: DVec2,
    pub tangent: DVec3,
    pub bitangent: DVec3,
    pub influences: [Influence; INFLUENCES_PER_VERTEX],
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            normal: DVec3::ZERO,
            uv: DVec2::ZERO,
            tangent: DVec3::ZERO,
            bitangent: DVec3::ZERO,
            influences: [Influence::default(); INFLUENCES_PER_VERTEX],
        }
    }
}

/// Attribute indices of one polygon corner into its sub-mesh's raw streams.
///
/// Only `position`, `normal` and `uv` take part in vertex identity; corners
/// that differ only in tangent or bitangent index share one output vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IndexedVertex {
    pub position: u32,
    pub normal: u32,
    pub uv: u32,
    pub tangent: u32,
    pub bitangent: u32,
}

impl IndexedVertex {
    /// Whether `other` (sharing this corner's position) can reuse this corner's vertex
    pub fn matches(&self, other: &IndexedVertex) -> bool {
        self.normal == other.normal && self.uv == other.uv
    }
}

/// A processed, triangulated mesh
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vertex>,
    /// Triangle list, 3 indices per triangle
    pub indices: Vec<u32>,
    /// Source corner each vertex was created from (parallel to `vertices`)
    pub sources: Vec<IndexedVertex>,
    /// Skin influences per control point, looked up through `sources[i].position`
    pub skin: SkinData,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
