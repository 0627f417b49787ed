//! glTF/GLB scene import
//!
//! One scene node per glTF node of the default scene, one sub-mesh per
//! triangle primitive. Skins become deformer clusters on the primitives they
//! deform and animations become clips keyed in integer ticks.

use std::path::Path;

use glam::{DMat4, DQuat, DVec2, DVec3, DVec4, Mat4};
use gltf::animation::util::ReadOutputs;
use gltf::animation::{Interpolation as GltfInterpolation, Property};
use gltf::mesh::Mode;
use hashbrown::{HashMap, HashSet};

use crate::axis::AxisSystem;
use crate::error::ConvertError;
use crate::scene::{
    BindPose, Curve, Interpolation, KeyTime, LayerElement, NodeAnimation, NodeId, SkinCluster,
    SourceClip, SourceMesh, SourceScene, TimeSpan, Transform,
};

/// Load a glTF or GLB file into a [`SourceScene`]
pub fn load_gltf(path: &Path) -> Result<SourceScene, ConvertError> {
    let (document, buffers, _images) =
        gltf::import(path).map_err(|e| ConvertError::SourceUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let buffer_data =
        |buffer: gltf::Buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice());

    let mut scene = SourceScene::new(AxisSystem::Y_UP_RIGHT_HANDED);

    let joints: HashSet<usize> = document
        .skins()
        .flat_map(|skin| skin.joints().map(|joint| joint.index()).collect::<Vec<_>>())
        .collect();

    // glTF node index -> scene node
    let mut node_map: HashMap<usize, NodeId> = HashMap::new();
    let roots: Vec<gltf::Node> = match document.default_scene().or_else(|| document.scenes().next()) {
        Some(gltf_scene) => gltf_scene.nodes().collect(),
        None => Vec::new(),
    };
    for root in roots {
        add_node_tree(&mut scene, &root, SourceScene::ROOT, &joints, &mut node_map);
    }

    // Joints take their bind transforms from the inverse bind matrices
    let mut bind_pose = BindPose::default();
    let mut skinned = false;
    for skin in document.skins() {
        skinned = true;
        let reader = skin.reader(buffer_data);
        let inverse_binds: Vec<DMat4> = reader
            .read_inverse_bind_matrices()
            .map(|iter| iter.map(|m| Mat4::from_cols_array_2d(&m).as_dmat4()).collect())
            .unwrap_or_default();

        for (slot, joint) in skin.joints().enumerate() {
            let Some(&node) = node_map.get(&joint.index()) else {
                continue;
            };
            let bind = match inverse_binds.get(slot) {
                Some(inverse) => inverse.inverse(),
                None => scene.global_transform(node, None),
            };
            bind_pose.insert(node, bind);
        }
    }

    for gltf_node in document.nodes() {
        let (Some(&node), Some(mesh)) = (node_map.get(&gltf_node.index()), gltf_node.mesh()) else {
            continue;
        };
        let skin = gltf_node.skin();
        if skin.is_some() {
            // Joint transforms alone place a skinned mesh
            bind_pose.insert(node, DMat4::IDENTITY);
        }

        let primitive_count = mesh.primitives().len();
        for primitive in mesh.primitives() {
            let base = mesh
                .name()
                .or(gltf_node.name())
                .map(str::to_string)
                .unwrap_or_else(|| format!("mesh_{}", mesh.index()));
            let name = if primitive_count > 1 {
                format!("{}_{}", base, primitive.index())
            } else {
                base
            };

            if primitive.mode() != Mode::Triangles {
                tracing::warn!("Skipping primitive '{}': mode {:?} is not triangles", name, primitive.mode());
                continue;
            }

            let source = read_primitive(
                &scene,
                &primitive,
                skin.as_ref(),
                &node_map,
                &bind_pose,
                buffer_data,
                node,
                name,
            )?;
            scene.add_mesh(source);
        }
    }

    if skinned {
        scene.bind_pose = Some(bind_pose);
    }

    for animation in document.animations() {
        scene.clips.push(read_animation(&animation, &node_map, buffer_data));
    }

    tracing::info!(
        "Loaded glTF {}: {} nodes, {} meshes, {} clips",
        path.display(),
        scene.nodes.len() - 1,
        scene.meshes.len(),
        scene.clips.len()
    );
    Ok(scene)
}

fn add_node_tree(
    scene: &mut SourceScene,
    gltf_node: &gltf::Node,
    parent: NodeId,
    joints: &HashSet<usize>,
    node_map: &mut HashMap<usize, NodeId>,
) {
    // A node reachable twice would make the hierarchy cyclic
    if node_map.contains_key(&gltf_node.index()) {
        return;
    }

    let (translation, rotation, scale) = gltf_node.transform().decomposed();
    let local = Transform {
        translation: DVec3::from(translation.map(f64::from)),
        rotation: DQuat::from_array(rotation.map(f64::from)).normalize(),
        scale: DVec3::from(scale.map(f64::from)),
    };
    let name = gltf_node
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", gltf_node.index()));

    let node = if joints.contains(&gltf_node.index()) {
        scene.add_joint(name, parent, local)
    } else {
        scene.add_node(name, parent, local)
    };
    node_map.insert(gltf_node.index(), node);

    for child in gltf_node.children() {
        add_node_tree(scene, &child, node, joints, node_map);
    }
}

#[allow(clippy::too_many_arguments)]
fn read_primitive<'a, 's, F>(
    scene: &SourceScene,
    primitive: &'a gltf::Primitive<'a>,
    skin: Option<&gltf::Skin<'a>>,
    node_map: &HashMap<usize, NodeId>,
    bind_pose: &BindPose,
    buffer_data: F,
    node: NodeId,
    name: String,
) -> Result<SourceMesh, ConvertError>
where
    F: Clone + Fn(gltf::Buffer<'a>) -> Option<&'s [u8]>,
{
    let reader = primitive.reader(buffer_data);

    let control_points: Vec<DVec3> = reader
        .read_positions()
        .ok_or_else(|| ConvertError::invalid_stream(&name, "position", "primitive has no POSITION"))?
        .map(|p| DVec3::from(p.map(f64::from)))
        .collect();
    let point_count = control_points.len();

    let polygon_vertices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..point_count as u32).collect(),
    };
    if polygon_vertices.len() % 3 != 0 {
        return Err(ConvertError::invalid_stream(
            &name,
            "index",
            format!("{} indices do not form whole triangles", polygon_vertices.len()),
        ));
    }
    let polygon_sizes = vec![3; polygon_vertices.len() / 3];

    let normals: Option<Vec<DVec3>> = reader
        .read_normals()
        .map(|iter| iter.map(|n| DVec3::from(n.map(f64::from))).collect());

    // glTF UVs run top-down; the scene model keeps them bottom-up
    let uvs: Option<Vec<DVec2>> = reader.read_tex_coords(0).map(|iter| {
        iter.into_f32()
            .map(|[u, v]| DVec2::new(u as f64, 1.0 - v as f64))
            .collect()
    });

    // Bitangents are rebuilt from the tangent sign; both need normals
    let tangent_frame = match (&normals, reader.read_tangents()) {
        (Some(normals), Some(tangents)) => {
            let tangents: Vec<DVec4> = tangents.map(|t| DVec4::from(t.map(f64::from))).collect();
            let bitangents = normals
                .iter()
                .zip(&tangents)
                .map(|(n, t)| n.cross(t.truncate()) * t.w)
                .collect();
            let tangents = tangents.iter().map(|t| t.truncate()).collect();
            Some((tangents, bitangents))
        }
        _ => None,
    };

    let clusters = match skin {
        Some(skin) => read_clusters(scene, &reader, skin, node_map, bind_pose, &name)?,
        None => Vec::new(),
    };

    let (tangents, bitangents) = match tangent_frame {
        Some((t, b)) => (Some(LayerElement::by_control_point(t)), Some(LayerElement::by_control_point(b))),
        None => (None, None),
    };

    Ok(SourceMesh {
        name,
        node,
        control_points,
        polygon_vertices,
        polygon_sizes,
        normals: normals.map(LayerElement::by_control_point),
        uvs: uvs.map(LayerElement::by_control_point),
        tangents,
        bitangents,
        clusters,
    })
}

fn read_clusters<'a, 's, F>(
    scene: &SourceScene,
    reader: &gltf::mesh::Reader<'a, 's, F>,
    skin: &gltf::Skin<'a>,
    node_map: &HashMap<usize, NodeId>,
    bind_pose: &BindPose,
    name: &str,
) -> Result<Vec<SkinCluster>, ConvertError>
where
    F: Clone + Fn(gltf::Buffer<'a>) -> Option<&'s [u8]>,
{
    let (Some(joints), Some(weights)) = (reader.read_joints(0), reader.read_weights(0)) else {
        tracing::warn!("Mesh '{}' has a skin but no JOINTS_0/WEIGHTS_0", name);
        return Ok(Vec::new());
    };

    let skin_joints: Vec<Option<NodeId>> = skin
        .joints()
        .map(|joint| node_map.get(&joint.index()).copied())
        .collect();

    let mut clusters: Vec<SkinCluster> = skin_joints
        .iter()
        .map(|&link| {
            // Joints outside the imported hierarchy link to the root, which is never a bone
            let link = link.unwrap_or(SourceScene::ROOT);
            SkinCluster {
                link,
                link_transform: Some(
                    bind_pose
                        .get(link)
                        .unwrap_or_else(|| scene.global_transform(link, None)),
                ),
                indices: Vec::new(),
                weights: Vec::new(),
            }
        })
        .collect();

    for (point, (joint_set, weight_set)) in joints.into_u16().zip(weights.into_f32()).enumerate() {
        for (&slot, &weight) in joint_set.iter().zip(&weight_set) {
            if weight <= 0.0 {
                continue;
            }
            let cluster = clusters.get_mut(slot as usize).ok_or_else(|| {
                ConvertError::invalid_stream(
                    name,
                    "joint",
                    format!("joint slot {} out of range for {} joints", slot, skin_joints.len()),
                )
            })?;
            cluster.indices.push(point as u32);
            cluster.weights.push(weight as f64);
        }
    }

    clusters.retain(|cluster| !cluster.indices.is_empty());
    Ok(clusters)
}

fn read_animation<'a, 's, F>(
    animation: &gltf::Animation<'a>,
    node_map: &HashMap<usize, NodeId>,
    buffer_data: F,
) -> SourceClip
where
    F: Clone + Fn(gltf::Buffer<'a>) -> Option<&'s [u8]>,
{
    let name = animation
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("animation_{}", animation.index()));

    let mut tracks: HashMap<NodeId, NodeAnimation> = HashMap::new();
    let mut span: Option<TimeSpan> = None;

    for channel in animation.channels() {
        let Some(&node) = node_map.get(&channel.target().node().index()) else {
            continue;
        };
        let reader = channel.reader(buffer_data.clone());
        let (Some(inputs), Some(outputs)) = (reader.read_inputs(), reader.read_outputs()) else {
            continue;
        };
        let times: Vec<KeyTime> = inputs.map(|t| KeyTime::from_seconds(t as f64)).collect();
        let (Some(&first), Some(&last)) = (times.first(), times.last()) else {
            continue;
        };
        span = Some(match span {
            Some(s) => TimeSpan {
                start: s.start.min(first),
                stop: s.stop.max(last),
            },
            None => TimeSpan {
                start: first,
                stop: last,
            },
        });

        let interpolation = channel.sampler().interpolation();
        let track = tracks.entry(node).or_default();
        match (channel.target().property(), outputs) {
            (Property::Translation, ReadOutputs::Translations(values)) => {
                let values = values.map(|v| DVec3::from(v.map(f64::from))).collect();
                track.translation = Some(curve(&times, values, interpolation));
            }
            (Property::Rotation, ReadOutputs::Rotations(values)) => {
                let values = values
                    .into_f32()
                    .map(|q| DQuat::from_array(q.map(f64::from)).normalize())
                    .collect();
                track.rotation = Some(curve(&times, values, interpolation));
            }
            (Property::Scale, ReadOutputs::Scales(values)) => {
                let values = values.map(|v| DVec3::from(v.map(f64::from))).collect();
                track.scale = Some(curve(&times, values, interpolation));
            }
            _ => {}
        }
    }

    SourceClip { name, span, tracks }
}

/// Build a curve, keeping only the key values of cubic spline samplers
fn curve<T: Copy>(times: &[KeyTime], values: Vec<T>, interpolation: GltfInterpolation) -> Curve<T> {
    let (values, interpolation) = match interpolation {
        GltfInterpolation::Step => (values, Interpolation::Step),
        GltfInterpolation::Linear => (values, Interpolation::Linear),
        // Each key stores (in-tangent, value, out-tangent)
        GltfInterpolation::CubicSpline => (
            values.chunks(3).filter_map(|c| c.get(1).copied()).collect(),
            Interpolation::Linear,
        ),
    };
    Curve {
        times: times.to_vec(),
        values,
        interpolation,
    }
}
