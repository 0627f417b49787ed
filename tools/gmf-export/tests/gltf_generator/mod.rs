//! Programmatic GLB generation for integration tests.
//!
//! Builds a small skinned scene:
//! - `Root` joint at the origin with child joint `Tip` one unit up
//! - a skinned quad whose bottom edge follows `Root` and top edge follows `Tip`
//! - one animation: `Root` translation keyed at {0, 1}, `Tip` rotation at {0, 0.5, 1}

use gltf_json as json;
use json::validation::Checked::Valid;

pub const ROOT_NODE: u32 = 0;
pub const TIP_NODE: u32 = 1;
pub const MESH_NODE: u32 = 2;

/// Rotation of `Tip` at t = 1 (90 degrees about +Z), as x, y, z, w
pub const TIP_END_ROTATION: [f32; 4] = [0.0, 0.0, std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2];

struct BinaryBuilder {
    buffer: Vec<u8>,
    views: Vec<json::buffer::View>,
    accessors: Vec<json::Accessor>,
}

impl BinaryBuilder {
    fn new() -> Self {
        Self {
            buffer: Vec::new(),
            views: Vec::new(),
            accessors: Vec::new(),
        }
    }

    /// Append one tightly packed accessor and return its index
    #[allow(clippy::too_many_arguments)]
    fn push(
        &mut self,
        bytes: &[u8],
        count: usize,
        component: json::accessor::ComponentType,
        type_: json::accessor::Type,
        target: Option<json::buffer::Target>,
        min: Option<Vec<f32>>,
        max: Option<Vec<f32>>,
    ) -> u32 {
        let offset = self.buffer.len();
        self.buffer.extend_from_slice(bytes);
        while self.buffer.len() % 4 != 0 {
            self.buffer.push(0);
        }

        self.views.push(json::buffer::View {
            buffer: json::Index::new(0),
            byte_length: bytes.len().into(),
            byte_offset: Some(offset.into()),
            byte_stride: None,
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            target: target.map(Valid),
        });

        let bounds = |values: Option<Vec<f32>>| {
            values.map(|v| json::Value::Array(v.into_iter().map(json::Value::from).collect()))
        };
        self.accessors.push(json::Accessor {
            buffer_view: Some(json::Index::new(self.views.len() as u32 - 1)),
            byte_offset: Some(0u64.into()),
            count: count.into(),
            component_type: Valid(json::accessor::GenericComponentType(component)),
            extensions: Default::default(),
            extras: Default::default(),
            type_: Valid(type_),
            min: bounds(min),
            max: bounds(max),
            name: None,
            normalized: false,
            sparse: None,
        });
        self.accessors.len() as u32 - 1
    }

    fn push_f32(
        &mut self,
        values: &[f32],
        components: usize,
        type_: json::accessor::Type,
        min: Option<Vec<f32>>,
        max: Option<Vec<f32>>,
    ) -> u32 {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.push(
            &bytes,
            values.len() / components,
            json::accessor::ComponentType::F32,
            type_,
            None,
            min,
            max,
        )
    }
}

fn node(name: &str, translation: [f32; 3], children: Option<Vec<u32>>) -> json::Node {
    json::Node {
        camera: None,
        children: children.map(|c| c.into_iter().map(json::Index::new).collect()),
        extensions: Default::default(),
        extras: Default::default(),
        matrix: None,
        mesh: None,
        name: Some(name.to_string()),
        rotation: None,
        scale: None,
        translation: Some(translation),
        skin: None,
        weights: None,
    }
}

fn channel(
    sampler: u32,
    node: u32,
    path: json::animation::Property,
) -> json::animation::Channel {
    json::animation::Channel {
        sampler: json::Index::new(sampler),
        target: json::animation::Target {
            node: json::Index::new(node),
            path: Valid(path),
            extensions: Default::default(),
            extras: Default::default(),
        },
        extensions: Default::default(),
        extras: Default::default(),
    }
}

fn sampler(input: u32, output: u32) -> json::animation::Sampler {
    json::animation::Sampler {
        input: json::Index::new(input),
        interpolation: Valid(json::animation::Interpolation::Linear),
        output: json::Index::new(output),
        extensions: Default::default(),
        extras: Default::default(),
    }
}

/// Generate the skinned test scene as a GLB
pub fn generate_skinned_glb() -> Vec<u8> {
    use json::accessor::{ComponentType, Type};

    let mut bin = BinaryBuilder::new();

    // --- Mesh ---
    let positions: [f32; 12] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0];
    let position_accessor = bin.push_f32(
        &positions,
        3,
        Type::Vec3,
        Some(vec![0.0, 0.0, 0.0]),
        Some(vec![1.0, 1.0, 0.0]),
    );
    let normals: Vec<f32> = [0.0, 0.0, 1.0].repeat(4);
    let normal_accessor = bin.push_f32(&normals, 3, Type::Vec3, None, None);
    let uvs: [f32; 8] = [0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
    let uv_accessor = bin.push_f32(&uvs, 2, Type::Vec2, None, None);

    let joints: [u8; 16] = [0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0];
    let joints_accessor = bin.push(
        &joints,
        4,
        ComponentType::U8,
        Type::Vec4,
        Some(json::buffer::Target::ArrayBuffer),
        None,
        None,
    );
    let weights: Vec<f32> = [1.0, 0.0, 0.0, 0.0].repeat(4);
    let weights_accessor = bin.push_f32(&weights, 4, Type::Vec4, None, None);

    let indices: Vec<u8> = [0u16, 1, 2, 0, 2, 3]
        .iter()
        .flat_map(|i| i.to_le_bytes())
        .collect();
    let index_accessor = bin.push(
        &indices,
        6,
        ComponentType::U16,
        Type::Scalar,
        Some(json::buffer::Target::ElementArrayBuffer),
        None,
        None,
    );

    // --- Skeleton ---
    #[rustfmt::skip]
    let inverse_binds: [f32; 32] = [
        1.0, 0.0, 0.0, 0.0,  0.0, 1.0, 0.0, 0.0,  0.0, 0.0, 1.0, 0.0,  0.0, 0.0, 0.0, 1.0,
        1.0, 0.0, 0.0, 0.0,  0.0, 1.0, 0.0, 0.0,  0.0, 0.0, 1.0, 0.0,  0.0, -1.0, 0.0, 1.0,
    ];
    let ibm_accessor = bin.push_f32(&inverse_binds, 16, Type::Mat4, None, None);

    // --- Animation ---
    let root_times = bin.push_f32(&[0.0, 1.0], 1, Type::Scalar, Some(vec![0.0]), Some(vec![1.0]));
    let root_translations =
        bin.push_f32(&[0.0, 0.0, 0.0, 0.0, 0.0, 2.0], 3, Type::Vec3, None, None);
    let tip_times = bin.push_f32(&[0.0, 0.5, 1.0], 1, Type::Scalar, Some(vec![0.0]), Some(vec![1.0]));
    let half = (std::f32::consts::FRAC_PI_8).sin();
    let half_w = (std::f32::consts::FRAC_PI_8).cos();
    let mut tip_rotations = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, half, half_w];
    tip_rotations.extend_from_slice(&TIP_END_ROTATION);
    let tip_rotation_accessor = bin.push_f32(&tip_rotations, 4, Type::Vec4, None, None);

    // --- JSON ---
    let mut attributes = std::collections::BTreeMap::new();
    attributes.insert(Valid(json::mesh::Semantic::Positions), json::Index::new(position_accessor));
    attributes.insert(Valid(json::mesh::Semantic::Normals), json::Index::new(normal_accessor));
    attributes.insert(Valid(json::mesh::Semantic::TexCoords(0)), json::Index::new(uv_accessor));
    attributes.insert(Valid(json::mesh::Semantic::Joints(0)), json::Index::new(joints_accessor));
    attributes.insert(Valid(json::mesh::Semantic::Weights(0)), json::Index::new(weights_accessor));

    let meshes = vec![json::Mesh {
        extensions: Default::default(),
        extras: Default::default(),
        name: Some("Quad".to_string()),
        primitives: vec![json::mesh::Primitive {
            attributes,
            extensions: Default::default(),
            extras: Default::default(),
            indices: Some(json::Index::new(index_accessor)),
            material: None,
            mode: Valid(json::mesh::Mode::Triangles),
            targets: None,
        }],
        weights: None,
    }];

    let mut mesh_node = node("SkinnedQuad", [0.0, 0.0, 0.0], None);
    mesh_node.translation = None;
    mesh_node.mesh = Some(json::Index::new(0));
    mesh_node.skin = Some(json::Index::new(0));
    let nodes = vec![
        node("Root", [0.0, 0.0, 0.0], Some(vec![TIP_NODE])),
        node("Tip", [0.0, 1.0, 0.0], None),
        mesh_node,
    ];

    let skins = vec![json::Skin {
        extensions: Default::default(),
        extras: Default::default(),
        inverse_bind_matrices: Some(json::Index::new(ibm_accessor)),
        joints: vec![json::Index::new(ROOT_NODE), json::Index::new(TIP_NODE)],
        name: Some("Skeleton".to_string()),
        skeleton: Some(json::Index::new(ROOT_NODE)),
    }];

    let animations = vec![json::Animation {
        channels: vec![
            channel(0, ROOT_NODE, json::animation::Property::Translation),
            channel(1, TIP_NODE, json::animation::Property::Rotation),
        ],
        extensions: Default::default(),
        extras: Default::default(),
        name: Some("Bend".to_string()),
        samplers: vec![
            sampler(root_times, root_translations),
            sampler(tip_times, tip_rotation_accessor),
        ],
    }];

    let scenes = vec![json::Scene {
        extensions: Default::default(),
        extras: Default::default(),
        name: Some("TestScene".to_string()),
        nodes: vec![json::Index::new(ROOT_NODE), json::Index::new(MESH_NODE)],
    }];

    let buffers = vec![json::Buffer {
        byte_length: bin.buffer.len().into(),
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        uri: None,
    }];

    let root = json::Root {
        accessors: bin.accessors,
        animations,
        asset: json::Asset {
            copyright: None,
            extensions: Default::default(),
            extras: Default::default(),
            generator: Some("gmf-export-test".to_string()),
            min_version: None,
            version: "2.0".to_string(),
        },
        buffers,
        buffer_views: bin.views,
        cameras: Vec::new(),
        extensions: Default::default(),
        extras: Default::default(),
        extensions_required: Vec::new(),
        extensions_used: Vec::new(),
        images: Vec::new(),
        materials: Vec::new(),
        meshes,
        nodes,
        samplers: Vec::new(),
        scene: Some(json::Index::new(0)),
        scenes,
        skins,
        textures: Vec::new(),
    };

    assemble_glb(&root, &bin.buffer)
}

/// Wrap JSON and binary chunks into a GLB container
fn assemble_glb(root: &json::Root, buffer_data: &[u8]) -> Vec<u8> {
    let json_string = json::serialize::to_string(root).expect("Failed to serialize JSON");
    let json_bytes = json_string.as_bytes();

    let json_padding = (4 - (json_bytes.len() % 4)) % 4;
    let json_chunk_length = json_bytes.len() + json_padding;
    let buffer_padding = (4 - (buffer_data.len() % 4)) % 4;
    let buffer_chunk_length = buffer_data.len() + buffer_padding;
    let total_length = 12 + 8 + json_chunk_length + 8 + buffer_chunk_length;

    let mut glb = Vec::with_capacity(total_length);
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total_length as u32).to_le_bytes());

    glb.extend_from_slice(&(json_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&0x4E4F534Au32.to_le_bytes()); // "JSON"
    glb.extend_from_slice(json_bytes);
    glb.extend(std::iter::repeat_n(0x20u8, json_padding));

    glb.extend_from_slice(&(buffer_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&0x004E4942u32.to_le_bytes()); // "BIN\0"
    glb.extend_from_slice(buffer_data);
    glb.extend(std::iter::repeat_n(0u8, buffer_padding));

    glb
}
