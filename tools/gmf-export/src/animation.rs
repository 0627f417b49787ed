//! Animation sampling
//!
//! Every bone of every clip is sampled at the union of its own translation and
//! rotation key times (plus the clip start), yielding parent-relative
//! keyframes in target space.

use std::collections::BTreeSet;

use glam::{DQuat, DVec3};

use crate::axis::CoordinateConverter;
use crate::math::{neutralize_scale, translation_rotation};
use crate::scene::{KeyTime, NodeId, SourceClip, SourceScene};
use crate::skeleton::Bone;

/// One sampled pose of one bone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Seconds on the source timeline
    pub time: f64,
    pub position: DVec3,
    pub rotation: DQuat,
}

/// A sampled clip: one keyframe track per bone, in bone order
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f64,
    pub tracks: Vec<Vec<Keyframe>>,
}

/// Sample every clip of the scene for `bones`
pub fn collect_animations(
    scene: &SourceScene,
    bones: &[Bone],
    converter: &CoordinateConverter,
) -> Vec<AnimationClip> {
    if scene.clips.is_empty() {
        tracing::info!("No animations to collect");
        return Vec::new();
    }

    tracing::info!("Collecting {} animations", scene.clips.len());
    scene
        .clips
        .iter()
        .map(|clip| sample_clip(scene, clip, bones, converter))
        .collect()
}

/// Sample one clip for `bones`
pub fn sample_clip(
    scene: &SourceScene,
    clip: &SourceClip,
    bones: &[Bone],
    converter: &CoordinateConverter,
) -> AnimationClip {
    let start = clip.span.map(|span| span.start).unwrap_or(KeyTime::ZERO);
    let duration = match clip.span {
        Some(span) => (span.stop - span.start).seconds(),
        None => latest_key(clip).map_or(0.0, |last| (last - start).seconds().max(0.0)),
    };

    let tracks = bones
        .iter()
        .map(|bone| {
            key_times(clip, bone.node, start)
                .into_iter()
                .map(|time| sample_bone(scene, clip, bone.node, time, converter))
                .collect()
        })
        .collect();

    tracing::debug!("Sampled clip '{}' ({:.3}s)", clip.name, duration);

    AnimationClip {
        name: clip.name.clone(),
        duration,
        tracks,
    }
}

/// Sorted union of the node's translation and rotation key times and `start`
pub fn key_times(clip: &SourceClip, node: NodeId, start: KeyTime) -> BTreeSet<KeyTime> {
    let mut times = BTreeSet::new();
    times.insert(start);
    if let Some(track) = clip.tracks.get(&node) {
        if let Some(curve) = &track.translation {
            times.extend(curve.times.iter().copied());
        }
        if let Some(curve) = &track.rotation {
            times.extend(curve.times.iter().copied());
        }
    }
    times
}

fn latest_key(clip: &SourceClip) -> Option<KeyTime> {
    clip.tracks
        .values()
        .flat_map(|track| {
            let translation = track.translation.iter().flat_map(|c| c.times.last());
            let rotation = track.rotation.iter().flat_map(|c| c.times.last());
            let scale = track.scale.iter().flat_map(|c| c.times.last());
            translation.chain(rotation).chain(scale).copied()
        })
        .max()
}

fn sample_bone(
    scene: &SourceScene,
    clip: &SourceClip,
    node: NodeId,
    time: KeyTime,
    converter: &CoordinateConverter,
) -> Keyframe {
    let pose = Some((clip, time));
    let mut transform = scene.global_transform(node, pose);

    if let Some(parent) = scene.nodes[node].parent.filter(|&p| scene.is_joint(p)) {
        transform = scene.global_transform(parent, pose).inverse() * transform;
    }

    let (position, rotation) = translation_rotation(converter.convert_point(neutralize_scale(transform)));
    Keyframe {
        time: time.seconds(),
        position,
        rotation,
    }
}
