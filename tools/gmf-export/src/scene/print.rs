//! Human-readable scene hierarchy dump

use glam::EulerRot;

use super::types::{NodeAttribute, NodeId, SourceScene};

/// One line per node, indented by depth, root excluded.
pub fn format_hierarchy(scene: &SourceScene) -> Vec<String> {
    let mut lines = Vec::new();
    for &child in &scene.nodes[SourceScene::ROOT].children {
        format_node(scene, child, 0, &mut lines);
    }
    lines
}

fn format_node(scene: &SourceScene, id: NodeId, depth: usize, lines: &mut Vec<String>) {
    let node = &scene.nodes[id];
    let t = node.local.translation;
    let (rx, ry, rz) = node.local.rotation.to_euler(EulerRot::XYZ);
    let s = node.local.scale;

    let attributes: Vec<String> = node
        .attributes
        .iter()
        .map(|attribute| match attribute {
            NodeAttribute::Skeleton => "skeleton".to_string(),
            NodeAttribute::Mesh(mesh) => format!("mesh '{}'", scene.meshes[*mesh].name),
        })
        .collect();

    lines.push(format!(
        "{}{} t=({:.3}, {:.3}, {:.3}) r=({:.1}, {:.1}, {:.1}) s=({:.3}, {:.3}, {:.3}){}",
        "  ".repeat(depth),
        node.name,
        t.x,
        t.y,
        t.z,
        rx.to_degrees(),
        ry.to_degrees(),
        rz.to_degrees(),
        s.x,
        s.y,
        s.z,
        if attributes.is_empty() {
            String::new()
        } else {
            format!(" [{}]", attributes.join(", "))
        }
    ));

    for &child in &node.children {
        format_node(scene, child, depth + 1, lines);
    }
}

/// Log the node hierarchy plus mesh, pose and clip counts
pub fn print_scene(scene: &SourceScene) {
    tracing::info!(
        "Scene has {} node(s), {} sub-mesh(es), {} clip(s), bind pose: {}",
        scene.nodes.len() - 1,
        scene.meshes.len(),
        scene.clips.len(),
        if scene.bind_pose.is_some() { "yes" } else { "no" }
    );
    for line in format_hierarchy(scene) {
        tracing::info!("{}", line);
    }
    for clip in &scene.clips {
        tracing::info!("  clip '{}': {} animated node(s)", clip.name, clip.tracks.len());
    }
}
