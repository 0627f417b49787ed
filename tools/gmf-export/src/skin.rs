//! Skin weights: gathering cluster influences and normalizing them
//!
//! Influences are collected per control point while a sub-mesh is built, then
//! bound to output vertices through each vertex's source position once the
//! sub-meshes have been combined.

use glam::DMat4;
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::mesh::{Influence, Mesh};
use crate::scene::{BindPose, NodeId, SourceMesh};

/// Influence lists, one per control point of the mesh they belong to
#[derive(Debug, Clone, Default)]
pub struct SkinData {
    pub point_weights: Vec<SmallVec<[Influence; 4]>>,
}

impl SkinData {
    /// Pad or trim every list to exactly `max` entries and make its weights sum to 1.
    ///
    /// Lists longer than `max` keep their strongest influences. A list whose
    /// weights sum to zero ends up all zero instead of dividing by zero.
    pub fn normalize(&mut self, max: usize) {
        for influences in &mut self.point_weights {
            if influences.len() > max {
                influences.sort_by(|a, b| b.weight.total_cmp(&a.weight));
                influences.truncate(max);
            }
            while influences.len() < max {
                influences.push(Influence::default());
            }

            let sum: f64 = influences.iter().map(|i| i.weight).sum();
            if sum > 0.0 && sum.is_finite() {
                for influence in influences.iter_mut() {
                    influence.weight /= sum;
                }
            } else {
                for influence in influences.iter_mut() {
                    influence.weight = 0.0;
                }
            }
        }
    }
}

/// Append every cluster of `source` to the influence lists in `skin`.
///
/// Clusters linked to a node that isn't a collected bone are skipped. A link
/// missing from the bind pose is added to it (creating the pose if needed) so
/// the skeleton is built in the same space the skin was bound in.
pub fn gather_skin_weights(
    source: &SourceMesh,
    bones: &HashMap<NodeId, u32>,
    skin: &mut SkinData,
    bind_pose: &mut Option<BindPose>,
) {
    for cluster in &source.clusters {
        let Some(&bone) = bones.get(&cluster.link) else {
            tracing::warn!(
                "Mesh '{}': skipping cluster linked to node {} (not a bone)",
                source.name,
                cluster.link
            );
            continue;
        };

        let pose = bind_pose.get_or_insert_with(BindPose::default);
        if !pose.contains(cluster.link) {
            let link_transform = cluster.link_transform.unwrap_or(DMat4::IDENTITY);
            pose.insert(cluster.link, link_transform);
        }

        for (&point, &weight) in cluster.indices.iter().zip(&cluster.weights) {
            match skin.point_weights.get_mut(point as usize) {
                Some(influences) => influences.push(Influence { bone, weight }),
                None => tracing::warn!(
                    "Mesh '{}': cluster references control point {} of {}",
                    source.name,
                    point,
                    skin.point_weights.len()
                ),
            }
        }
    }
}

/// Copy each vertex's influences from the control point it was built from
pub fn apply_influences(mesh: &mut Mesh) {
    let Mesh {
        vertices,
        sources,
        skin,
        ..
    } = mesh;

    for (vertex, source) in vertices.iter_mut().zip(sources.iter()) {
        vertex.influences = Default::default();
        if let Some(influences) = skin.point_weights.get(source.position as usize) {
            for (slot, influence) in vertex.influences.iter_mut().zip(influences) {
                *slot = *influence;
            }
        }
    }
}
