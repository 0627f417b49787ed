//! Mesh processing: extraction, deduplication, triangulation, tangents

mod combine;
mod dedup;
mod extract;
mod tangents;
mod triangulate;
mod types;

pub use combine::combine_meshes;
pub use dedup::VertexArena;
pub use extract::{extract_streams, mesh_world_transform, MeshStreams};
pub use tangents::generate_tangents;
pub use triangulate::{flip_winding, triangulate};
pub use types::*;

use smallvec::SmallVec;

use crate::axis::CoordinateConverter;
use crate::error::ConvertError;
use crate::scene::{MeshId, SourceScene};
use crate::skin::SkinData;

/// Build one sub-mesh into target space.
///
/// Skin influences are left empty (one list per control point) for
/// [`crate::skin::gather_skin_weights`] to fill.
pub fn process_mesh(
    scene: &SourceScene,
    id: MeshId,
    converter: &CoordinateConverter,
    flip_v: bool,
) -> Result<Mesh, ConvertError> {
    let source = &scene.meshes[id];
    tracing::debug!("Processing mesh '{}'", source.name);

    let transform = mesh_world_transform(scene, source, converter);
    let streams = extract_streams(source, transform)?;

    let mut arena = VertexArena::new(streams.positions.len());
    let corners: Vec<u32> = (0..streams.corner_count())
        .map(|corner| arena.find_or_insert(&streams, corner))
        .collect();

    let mut indices = triangulate(&corners, &streams.polygon_sizes);
    if converter.flip_winding() {
        flip_winding(&mut indices);
    }

    let (mut vertices, sources) = arena.into_parts();
    if flip_v {
        for vertex in &mut vertices {
            vertex.uv.y = 1.0 - vertex.uv.y;
        }
    }

    if streams.tangent_frame.is_none() {
        tracing::debug!("Generating tangents for mesh '{}'", source.name);
        generate_tangents(&mut vertices, &indices);
    }

    tracing::debug!(
        "Mesh '{}': {} corners -> {} vertices, {} triangles",
        source.name,
        streams.corner_count(),
        vertices.len(),
        indices.len() / 3
    );

    Ok(Mesh {
        name: source.name.clone(),
        vertices,
        indices,
        sources,
        skin: SkinData {
            point_weights: vec![SmallVec::new(); streams.positions.len()],
        },
    })
}
