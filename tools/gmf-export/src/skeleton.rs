//! Skeleton collection and bind-pose processing

use std::collections::VecDeque;

use glam::{DMat4, DQuat, DVec3};
use hashbrown::HashMap;

use crate::axis::CoordinateConverter;
use crate::math::{neutralize_scale, translation_rotation};
use crate::scene::{NodeId, SourceScene};

/// One joint of the output skeleton
#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,
    pub node: NodeId,
    /// Index of the parent bone, `None` for skeleton roots
    pub parent: Option<u32>,
    /// Position in the bone sequence (breadth-first order)
    pub index: u32,
    pub local_position: DVec3,
    pub local_rotation: DQuat,
    /// Inverse of the target-space bind transform
    pub inverse_bind: DMat4,
}

impl Bone {
    fn new(name: &str, node: NodeId, parent: Option<u32>, index: u32) -> Self {
        Self {
            name: name.to_string(),
            node,
            parent,
            index,
            local_position: DVec3::ZERO,
            local_rotation: DQuat::IDENTITY,
            inverse_bind: DMat4::IDENTITY,
        }
    }
}

/// Collect joints breadth-first from the root.
///
/// Every joint takes the next index and records the index its walk arrived
/// with as its parent. Non-joint nodes hand their incoming parent on to their
/// children unchanged.
pub fn collect_bones(scene: &SourceScene) -> Vec<Bone> {
    tracing::info!("Collecting bones");

    let mut bones = Vec::new();
    let mut queue: VecDeque<(Option<u32>, NodeId)> = VecDeque::new();
    queue.push_back((None, SourceScene::ROOT));

    while let Some((parent, node)) = queue.pop_front() {
        let mut tag = parent;
        if node != SourceScene::ROOT && scene.is_joint(node) {
            let index = bones.len() as u32;
            let name = &scene.nodes[node].name;
            tracing::debug!("Collecting bone: {}", name);
            bones.push(Bone::new(name, node, parent, index));
            tag = Some(index);
        }
        for &child in &scene.nodes[node].children {
            queue.push_back((tag, child));
        }
    }

    tracing::info!("Collected {} bones", bones.len());
    bones
}

/// Node to bone index lookup
pub fn bone_lookup(bones: &[Bone]) -> HashMap<NodeId, u32> {
    bones.iter().map(|bone| (bone.node, bone.index)).collect()
}

/// Fill each bone's bind data.
///
/// The bind-pose matrix is preferred, the live global transform is the
/// fallback. Scale is removed before conversion to target space.
pub fn process_bones(bones: &mut [Bone], scene: &SourceScene, converter: &CoordinateConverter) {
    if bones.is_empty() {
        return;
    }
    tracing::info!("Processing {} bones", bones.len());

    for bone in bones.iter_mut() {
        let global = scene
            .bind_pose
            .as_ref()
            .and_then(|pose| pose.get(bone.node))
            .unwrap_or_else(|| scene.global_transform(bone.node, None));

        let bind = converter.convert_point(neutralize_scale(global));
        let (position, rotation) = translation_rotation(bind);

        bone.inverse_bind = bind.inverse();
        bone.local_position = position;
        bone.local_rotation = rotation;
    }
}
