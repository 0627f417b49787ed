//! Intermediate scene model
//!
//! Importers populate a [`SourceScene`] in a single pass. The conversion
//! pipeline reads only this model and never touches a file format directly.

mod evaluate;
pub mod layer;
mod print;
mod types;

pub use layer::{AttributeStream, LayerElement, MappingMode, ReferenceMode};
pub use print::{format_hierarchy, print_scene};
pub use types::*;

use crate::axis::AxisSystem;

impl SourceScene {
    /// The synthetic root node
    pub const ROOT: NodeId = 0;

    /// Empty scene holding only the root node
    pub fn new(axes: AxisSystem) -> Self {
        Self {
            axes,
            nodes: vec![SourceNode::new("RootNode", None, Transform::IDENTITY)],
            meshes: Vec::new(),
            bind_pose: None,
            clips: Vec::new(),
        }
    }

    /// Append a node under `parent`
    pub fn add_node(&mut self, name: impl Into<String>, parent: NodeId, local: Transform) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(SourceNode::new(name, Some(parent), local));
        self.nodes[parent].children.push(id);
        id
    }

    /// Append a joint node under `parent`
    pub fn add_joint(&mut self, name: impl Into<String>, parent: NodeId, local: Transform) -> NodeId {
        let id = self.add_node(name, parent, local);
        self.nodes[id].attributes.push(NodeAttribute::Skeleton);
        id
    }

    /// Append a sub-mesh and attach it to its node
    pub fn add_mesh(&mut self, mesh: SourceMesh) -> MeshId {
        let id = self.meshes.len();
        self.nodes[mesh.node].attributes.push(NodeAttribute::Mesh(id));
        self.meshes.push(mesh);
        id
    }

    pub fn is_joint(&self, node: NodeId) -> bool {
        self.nodes[node].is_joint()
    }

    /// Sub-meshes in collection order: a post-order walk (children first) of the
    /// root's children.
    pub fn collect_meshes(&self) -> Vec<MeshId> {
        fn visit(scene: &SourceScene, node: NodeId, out: &mut Vec<MeshId>) {
            for &child in &scene.nodes[node].children {
                visit(scene, child, out);
            }
            for attribute in &scene.nodes[node].attributes {
                if let NodeAttribute::Mesh(id) = attribute {
                    out.push(*id);
                }
            }
        }

        let mut out = Vec::new();
        for &child in &self.nodes[Self::ROOT].children {
            visit(self, child, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh_on(node: NodeId, name: &str) -> SourceMesh {
        SourceMesh {
            name: name.to_string(),
            node,
            ..Default::default()
        }
    }

    #[test]
    fn test_add_node_links_parent_and_child() {
        let mut scene = SourceScene::new(AxisSystem::default());
        let a = scene.add_node("a", SourceScene::ROOT, Transform::IDENTITY);
        assert_eq!(scene.nodes[a].parent, Some(SourceScene::ROOT));
        assert_eq!(scene.nodes[SourceScene::ROOT].children, vec![a]);
        assert!(!scene.is_joint(a));

        let j = scene.add_joint("j", a, Transform::IDENTITY);
        assert!(scene.is_joint(j));
    }

    #[test]
    fn test_collect_meshes_children_first() {
        let mut scene = SourceScene::new(AxisSystem::default());
        let parent = scene.add_node("parent", SourceScene::ROOT, Transform::IDENTITY);
        let child = scene.add_node("child", parent, Transform::IDENTITY);
        let sibling = scene.add_node("sibling", SourceScene::ROOT, Transform::IDENTITY);

        let p = scene.add_mesh(mesh_on(parent, "p"));
        let c = scene.add_mesh(mesh_on(child, "c"));
        let s = scene.add_mesh(mesh_on(sibling, "s"));

        assert_eq!(scene.collect_meshes(), vec![c, p, s]);
    }

    #[test]
    fn test_unattached_root_meshes_are_skipped() {
        let mut scene = SourceScene::new(AxisSystem::default());
        scene.add_mesh(mesh_on(SourceScene::ROOT, "on-root"));
        assert!(scene.collect_meshes().is_empty());
    }
}
