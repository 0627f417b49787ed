//! Raw stream extraction from a source sub-mesh

use glam::{DMat4, DVec2, DVec3};

use crate::axis::CoordinateConverter;
use crate::error::ConvertError;
use crate::math::neutralize_scale;
use crate::scene::{AttributeStream, SourceMesh, SourceScene};

/// Per-attribute streams of one sub-mesh, transformed to target space
#[derive(Debug, Clone)]
pub struct MeshStreams {
    pub positions: Vec<DVec3>,
    /// Control point index of every polygon corner
    pub position_indices: Vec<u32>,
    pub normals: AttributeStream<DVec3>,
    pub uvs: AttributeStream<DVec2>,
    /// Tangent and bitangent streams, present only when the source supplies both
    pub tangent_frame: Option<(AttributeStream<DVec3>, AttributeStream<DVec3>)>,
    pub polygon_sizes: Vec<u32>,
}

impl MeshStreams {
    pub fn corner_count(&self) -> usize {
        self.position_indices.len()
    }
}

/// Mesh-local to target-world transform.
///
/// Uses the bind-pose matrix (scale removed) when the scene has one for this
/// node, otherwise the live global transform, then appends the node's
/// geometric offset and converts to target space.
pub fn mesh_world_transform(
    scene: &SourceScene,
    mesh: &SourceMesh,
    converter: &CoordinateConverter,
) -> DMat4 {
    let world = match scene.bind_pose.as_ref().and_then(|pose| pose.get(mesh.node)) {
        Some(pose) => neutralize_scale(pose),
        None => scene.global_transform(mesh.node, None),
    };
    converter.convert_mesh_transform(world * scene.nodes[mesh.node].geometric)
}

/// Validate and resolve every attribute of `mesh`, transformed by `transform`
pub fn extract_streams(mesh: &SourceMesh, transform: DMat4) -> Result<MeshStreams, ConvertError> {
    let name = mesh.name.as_str();
    let corners = &mesh.polygon_vertices;

    let polygon_total: u64 = mesh.polygon_sizes.iter().map(|&s| s as u64).sum();
    if polygon_total != corners.len() as u64 {
        return Err(ConvertError::invalid_stream(
            name,
            "polygon",
            format!(
                "polygon sizes cover {} corners but {} were supplied",
                polygon_total,
                corners.len()
            ),
        ));
    }
    if let Some(&bad) = corners
        .iter()
        .find(|&&i| i as usize >= mesh.control_points.len())
    {
        return Err(ConvertError::invalid_stream(
            name,
            "position",
            format!(
                "index {} out of range for {} control points",
                bad,
                mesh.control_points.len()
            ),
        ));
    }

    let positions = mesh
        .control_points
        .iter()
        .map(|&p| transform.project_point3(p))
        .collect();

    let direction = |v: DVec3| transform.transform_vector3(v).normalize_or_zero();

    let normals = match &mesh.normals {
        Some(layer) => layer.resolve(name, "normal", corners)?.map_values(direction),
        None => {
            tracing::warn!("Mesh '{}' has no normals, writing zero normals", name);
            AttributeStream::constant(DVec3::ZERO, corners.len())
        }
    };

    let uvs = match &mesh.uvs {
        Some(layer) => layer.resolve(name, "uv", corners)?,
        None => {
            tracing::debug!("Mesh '{}' has no UVs, using a dummy (0, 0)", name);
            AttributeStream::constant(DVec2::ZERO, corners.len())
        }
    };

    let tangent_frame = match (&mesh.tangents, &mesh.bitangents) {
        (Some(tangents), Some(bitangents)) => Some((
            tangents.resolve(name, "tangent", corners)?.map_values(direction),
            bitangents
                .resolve(name, "bitangent", corners)?
                .map_values(direction),
        )),
        (tangents, bitangents) => {
            if tangents.is_none() {
                tracing::debug!("Didn't get tangents for mesh '{}'", name);
            }
            if bitangents.is_none() {
                tracing::debug!("Didn't get bitangents for mesh '{}'", name);
            }
            None
        }
    };

    Ok(MeshStreams {
        positions,
        position_indices: corners.clone(),
        normals,
        uvs,
        tangent_frame,
        polygon_sizes: mesh.polygon_sizes.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::AxisSystem;
    use crate::scene::{BindPose, LayerElement, Transform};

    fn quad() -> SourceMesh {
        SourceMesh {
            name: "quad".to_string(),
            node: 1,
            control_points: vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(1.0, 1.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
            ],
            polygon_vertices: vec![0, 1, 2, 3],
            polygon_sizes: vec![4],
            normals: Some(LayerElement::by_control_point(vec![DVec3::Z * 2.0; 4])),
            ..Default::default()
        }
    }

    #[test]
    fn test_extract_transforms_and_normalizes() {
        let transform = DMat4::from_translation(DVec3::new(0.0, 0.0, 3.0));
        let streams = extract_streams(&quad(), transform).unwrap();

        assert!(streams.positions[2].abs_diff_eq(DVec3::new(1.0, 1.0, 3.0), 1e-12));
        // Translation does not reach normals, and they come out unit length
        assert!(streams.normals.get(0).abs_diff_eq(DVec3::Z, 1e-12));
        assert_eq!(streams.corner_count(), 4);
    }

    #[test]
    fn test_missing_optional_streams_are_synthesized() {
        let mut mesh = quad();
        mesh.normals = None;
        let streams = extract_streams(&mesh, DMat4::IDENTITY).unwrap();
        assert_eq!(streams.uvs.values, vec![DVec2::ZERO]);
        assert_eq!(streams.uvs.indices, vec![0; 4]);
        assert_eq!(streams.normals.get(3), DVec3::ZERO);
        assert!(streams.tangent_frame.is_none());
    }

    #[test]
    fn test_tangent_frame_requires_both_streams() {
        let mut mesh = quad();
        mesh.tangents = Some(LayerElement::by_control_point(vec![DVec3::X; 4]));
        let streams = extract_streams(&mesh, DMat4::IDENTITY).unwrap();
        assert!(streams.tangent_frame.is_none());

        mesh.bitangents = Some(LayerElement::by_control_point(vec![DVec3::Y; 4]));
        let streams = extract_streams(&mesh, DMat4::IDENTITY).unwrap();
        assert!(streams.tangent_frame.is_some());
    }

    #[test]
    fn test_polygon_size_mismatch_is_rejected() {
        let mut mesh = quad();
        mesh.polygon_sizes = vec![3];
        let err = extract_streams(&mesh, DMat4::IDENTITY).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidStream { attribute: "polygon", .. }));
    }

    #[test]
    fn test_bad_position_index_is_rejected() {
        let mut mesh = quad();
        mesh.polygon_vertices[3] = 9;
        assert!(extract_streams(&mesh, DMat4::IDENTITY).is_err());
    }

    #[test]
    fn test_world_transform_prefers_bind_pose_without_scale() {
        let mut scene = SourceScene::new(AxisSystem::DIRECT3D);
        let node = scene.add_node("n", SourceScene::ROOT, Transform::from_translation(DVec3::X));
        let mut mesh = quad();
        mesh.node = node;

        let converter = CoordinateConverter::new(AxisSystem::DIRECT3D, AxisSystem::DIRECT3D).unwrap();

        // No pose: live global
        let live = mesh_world_transform(&scene, &mesh, &converter);
        assert!(live.abs_diff_eq(DMat4::from_translation(DVec3::X), 1e-12));

        // Pose with scale: scale is removed, from the translation as well
        let mut pose = BindPose::default();
        pose.insert(
            node,
            DMat4::from_scale_rotation_translation(DVec3::splat(3.0), glam::DQuat::IDENTITY, DVec3::Y),
        );
        scene.bind_pose = Some(pose);
        let posed = mesh_world_transform(&scene, &mesh, &converter);
        assert!(posed.abs_diff_eq(DMat4::from_translation(DVec3::Y / 3.0), 1e-12));
    }
}
