//! Curve evaluation and global pose queries

use glam::{DMat4, DQuat, DVec3};

use super::types::{Curve, Interpolation, KeyTime, NodeId, SourceClip, SourceScene, Transform};

impl<T: Copy> Curve<T> {
    /// Value at `time`. Holds the first/last key outside the keyed range.
    pub fn sample(&self, time: KeyTime, lerp: impl Fn(T, T, f64) -> T) -> Option<T> {
        let len = self.times.len().min(self.values.len());
        if len == 0 {
            return None;
        }

        let next = self.times[..len].partition_point(|&t| t <= time);
        if next == 0 {
            return Some(self.values[0]);
        }
        if next == len {
            return Some(self.values[len - 1]);
        }

        let (t0, t1) = (self.times[next - 1], self.times[next]);
        let (v0, v1) = (self.values[next - 1], self.values[next]);
        match self.interpolation {
            Interpolation::Step => Some(v0),
            Interpolation::Linear => {
                let factor = (time - t0).0 as f64 / (t1 - t0).0 as f64;
                Some(lerp(v0, v1, factor))
            }
        }
    }
}

fn lerp_vec3(a: DVec3, b: DVec3, t: f64) -> DVec3 {
    a.lerp(b, t)
}

fn slerp_quat(a: DQuat, b: DQuat, t: f64) -> DQuat {
    a.slerp(b, t)
}

impl SourceScene {
    /// Local transform of `node`, with animated properties sampled if a clip is given
    pub fn local_transform(&self, node: NodeId, pose: Option<(&SourceClip, KeyTime)>) -> Transform {
        let mut local = self.nodes[node].local;

        if let Some((clip, time)) = pose {
            if let Some(track) = clip.tracks.get(&node) {
                if let Some(t) = track
                    .translation
                    .as_ref()
                    .and_then(|c| c.sample(time, lerp_vec3))
                {
                    local.translation = t;
                }
                if let Some(r) = track
                    .rotation
                    .as_ref()
                    .and_then(|c| c.sample(time, slerp_quat))
                {
                    local.rotation = r.normalize();
                }
                if let Some(s) = track.scale.as_ref().and_then(|c| c.sample(time, lerp_vec3)) {
                    local.scale = s;
                }
            }
        }

        local
    }

    /// Global transform of `node`: its live rest pose, or its pose at a clip time
    pub fn global_transform(&self, node: NodeId, pose: Option<(&SourceClip, KeyTime)>) -> DMat4 {
        let local = self.local_transform(node, pose).matrix();
        match self.nodes[node].parent {
            Some(parent) => self.global_transform(parent, pose) * local,
            None => local,
        }
    }
}
