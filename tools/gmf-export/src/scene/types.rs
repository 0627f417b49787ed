//! Types of the intermediate scene model

use glam::{DMat4, DQuat, DVec2, DVec3};
use hashbrown::HashMap;
use std::ops::Sub;

use super::layer::LayerElement;
use crate::axis::AxisSystem;

/// Index of a node in [`SourceScene::nodes`]
pub type NodeId = usize;

/// Index of a sub-mesh in [`SourceScene::meshes`]
pub type MeshId = usize;

/// Position on a source animation timeline, in integer ticks.
///
/// Integer ticks keep keytime unions exact: two curves keyed at "the same"
/// time always compare equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyTime(pub i64);

impl KeyTime {
    /// Tick resolution (divisible by all common frame rates)
    pub const TICKS_PER_SECOND: i64 = 46_186_158_000;

    pub const ZERO: Self = Self(0);

    pub fn from_seconds(seconds: f64) -> Self {
        Self((seconds * Self::TICKS_PER_SECOND as f64).round() as i64)
    }

    pub fn seconds(self) -> f64 {
        self.0 as f64 / Self::TICKS_PER_SECOND as f64
    }
}

impl Sub for KeyTime {
    type Output = KeyTime;

    fn sub(self, rhs: Self) -> Self::Output {
        KeyTime(self.0 - rhs.0)
    }
}

/// Start and stop of a clip on the source timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: KeyTime,
    pub stop: KeyTime,
}

/// Translation / rotation / scale, composed as T * R * S
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: DVec3,
    pub rotation: DQuat,
    pub scale: DVec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
        scale: DVec3::ONE,
    };

    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// What a node carries besides its transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeAttribute {
    /// Skeletal joint
    Skeleton,
    /// Geometry; the sub-mesh lives in [`SourceScene::meshes`]
    Mesh(MeshId),
}

#[derive(Debug, Clone)]
pub struct SourceNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Rest local transform
    pub local: Transform,
    /// Geometry offset applied to attached meshes only (not inherited by children)
    pub geometric: DMat4,
    pub attributes: Vec<NodeAttribute>,
}

impl SourceNode {
    pub fn new(name: impl Into<String>, parent: Option<NodeId>, local: Transform) -> Self {
        Self {
            name: name.into(),
            parent,
            children: Vec::new(),
            local,
            geometric: DMat4::IDENTITY,
            attributes: Vec::new(),
        }
    }

    pub fn is_joint(&self) -> bool {
        self.attributes.contains(&NodeAttribute::Skeleton)
    }
}

/// One deformer cluster: the control points a single bone influences
#[derive(Debug, Clone, Default)]
pub struct SkinCluster {
    /// Node of the influencing bone
    pub link: NodeId,
    /// Global transform of the link at bind time, used when the bind pose lacks the link
    pub link_transform: Option<DMat4>,
    /// Influenced control points (parallel to `weights`)
    pub indices: Vec<u32>,
    pub weights: Vec<f64>,
}

/// Raw geometry of one sub-mesh as supplied by an importer
#[derive(Debug, Clone, Default)]
pub struct SourceMesh {
    pub name: String,
    pub node: NodeId,
    /// Unique vertex positions in mesh-local space
    pub control_points: Vec<DVec3>,
    /// Control point index of every polygon corner, polygon after polygon
    pub polygon_vertices: Vec<u32>,
    /// Corner count of every polygon
    pub polygon_sizes: Vec<u32>,
    pub normals: Option<LayerElement<DVec3>>,
    pub uvs: Option<LayerElement<DVec2>>,
    pub tangents: Option<LayerElement<DVec3>>,
    pub bitangents: Option<LayerElement<DVec3>>,
    pub clusters: Vec<SkinCluster>,
}

/// Global node transforms at bind time
#[derive(Debug, Clone, Default)]
pub struct BindPose {
    pub matrices: HashMap<NodeId, DMat4>,
}

impl BindPose {
    pub fn get(&self, node: NodeId) -> Option<DMat4> {
        self.matrices.get(&node).copied()
    }

    pub fn insert(&mut self, node: NodeId, matrix: DMat4) {
        self.matrices.insert(node, matrix);
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.matrices.contains_key(&node)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    Step,
    #[default]
    Linear,
}

/// Keyed values of one animated property
#[derive(Debug, Clone, Default)]
pub struct Curve<T> {
    /// Ascending key times (parallel to `values`)
    pub times: Vec<KeyTime>,
    pub values: Vec<T>,
    pub interpolation: Interpolation,
}

impl<T> Curve<T> {
    pub fn new(keys: impl IntoIterator<Item = (KeyTime, T)>) -> Self {
        let (times, values) = keys.into_iter().unzip();
        Self {
            times,
            values,
            interpolation: Interpolation::Linear,
        }
    }
}

/// Animated properties of one node in one clip
#[derive(Debug, Clone, Default)]
pub struct NodeAnimation {
    pub translation: Option<Curve<DVec3>>,
    pub rotation: Option<Curve<DQuat>>,
    pub scale: Option<Curve<DVec3>>,
}

/// One animation take / stack
#[derive(Debug, Clone, Default)]
pub struct SourceClip {
    pub name: String,
    /// Explicit time span, if the source provides one
    pub span: Option<TimeSpan>,
    pub tracks: HashMap<NodeId, NodeAnimation>,
}

/// The whole imported scene
#[derive(Debug, Clone)]
pub struct SourceScene {
    pub axes: AxisSystem,
    /// Node 0 is a synthetic root that is never a bone
    pub nodes: Vec<SourceNode>,
    pub meshes: Vec<SourceMesh>,
    pub bind_pose: Option<BindPose>,
    pub clips: Vec<SourceClip>,
}
