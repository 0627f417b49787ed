//! Vertex deduplication

use smallvec::SmallVec;

use super::extract::MeshStreams;
use super::types::{IndexedVertex, Vertex};

/// Output vertices of one sub-mesh under construction.
///
/// Each control point keeps the list of output vertices already created from
/// it, so a lookup only scans corners sharing that position.
#[derive(Debug, Default)]
pub struct VertexArena {
    candidates: Vec<SmallVec<[u32; 4]>>,
    vertices: Vec<Vertex>,
    sources: Vec<IndexedVertex>,
}

impl VertexArena {
    pub fn new(position_count: usize) -> Self {
        Self {
            candidates: vec![SmallVec::new(); position_count],
            vertices: Vec::new(),
            sources: Vec::new(),
        }
    }

    /// Output vertex index for polygon corner `corner`, creating the vertex on first sight
    pub fn find_or_insert(&mut self, streams: &MeshStreams, corner: usize) -> u32 {
        let indexed = indexed_vertex(streams, corner);
        let position = indexed.position as usize;

        if let Some(&existing) = self.candidates[position]
            .iter()
            .find(|&&v| self.sources[v as usize].matches(&indexed))
        {
            return existing;
        }

        let index = self.vertices.len() as u32;
        self.vertices.push(build_vertex(streams, corner, &indexed));
        self.sources.push(indexed);
        self.candidates[position].push(index);
        index
    }

    pub fn into_parts(self) -> (Vec<Vertex>, Vec<IndexedVertex>) {
        (self.vertices, self.sources)
    }
}

fn indexed_vertex(streams: &MeshStreams, corner: usize) -> IndexedVertex {
    let (tangent, bitangent) = match &streams.tangent_frame {
        Some((t, b)) => (t.indices[corner], b.indices[corner]),
        None => (0, 0),
    };
    IndexedVertex {
        position: streams.position_indices[corner],
        normal: streams.normals.indices[corner],
        uv: streams.uvs.indices[corner],
        tangent,
        bitangent,
    }
}

fn build_vertex(streams: &MeshStreams, corner: usize, indexed: &IndexedVertex) -> Vertex {
    let mut vertex = Vertex {
        position: streams.positions[indexed.position as usize],
        normal: streams.normals.get(corner),
        uv: streams.uvs.get(corner),
        ..Default::default()
    };
    if let Some((tangents, bitangents)) = &streams.tangent_frame {
        vertex.tangent = tangents.get(corner);
        vertex.bitangent = bitangents.get(corner);
    }
    vertex
}
