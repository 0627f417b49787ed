//! GMF serialization
//!
//! Re-exports the layout from gmf-common and writes converted models in it.
//! Values are narrowed from f64 to f32 here and nowhere else.

pub use gmf_common::formats::*;

use std::io::Write;

use glam::{DMat4, DQuat, DVec2, DVec3};

use crate::animation::AnimationClip;
use crate::error::ConvertError;
use crate::mesh::{Mesh, Vertex};
use crate::skeleton::Bone;

/// Everything that ends up in one `.gmf` file
#[derive(Debug, Clone)]
pub struct Model {
    pub kind: ModelKind,
    pub mesh: Mesh,
    pub bones: Vec<Bone>,
    pub clips: Vec<AnimationClip>,
}

/// Serialize `model` into an in-memory buffer
pub fn gmf_to_bytes(model: &Model) -> Result<Vec<u8>, ConvertError> {
    let mut bytes = Vec::new();
    write_gmf(&mut bytes, model)?;
    Ok(bytes)
}

/// Write a complete GMF file
pub fn write_gmf<W: Write>(w: &mut W, model: &Model) -> Result<(), ConvertError> {
    let mesh = &model.mesh;
    let header = GmfHeader::new(
        model.kind,
        count_u32("vertex", mesh.vertices.len())?,
        count_u32("index", mesh.indices.len())?,
    );
    w.write_all(&header.to_bytes())?;

    let skinned = model.kind.is_skinned();
    for vertex in &mesh.vertices {
        write_vertex(w, vertex, skinned)?;
    }
    for index in &mesh.indices {
        w.write_all(&index.to_le_bytes())?;
    }

    if !skinned {
        return Ok(());
    }

    if model.bones.len() > MAX_BONES {
        return Err(ConvertError::TooManyBones(model.bones.len()));
    }
    w.write_all(&count_u32("bone", model.bones.len())?.to_le_bytes())?;
    for bone in &model.bones {
        write_bone(w, bone)?;
    }

    w.write_all(&count_u32("clip", model.clips.len())?.to_le_bytes())?;
    for clip in &model.clips {
        write_clip(w, clip)?;
    }

    Ok(())
}

fn count_u32(what: &'static str, count: usize) -> Result<u32, ConvertError> {
    u32::try_from(count).map_err(|_| ConvertError::TooLarge { what, count })
}

fn write_vertex<W: Write>(w: &mut W, vertex: &Vertex, skinned: bool) -> Result<(), ConvertError> {
    write_vec3(w, vertex.position)?;
    write_vec3(w, vertex.normal)?;
    write_vec2(w, vertex.uv)?;
    write_vec3(w, vertex.tangent)?;
    write_vec3(w, vertex.bitangent)?;

    if skinned {
        let mut bone_indices = [0u8; INFLUENCES_PER_VERTEX];
        for (slot, influence) in bone_indices.iter_mut().zip(&vertex.influences) {
            *slot = u8::try_from(influence.bone)
                .map_err(|_| ConvertError::TooManyBones(influence.bone as usize + 1))?;
        }
        w.write_all(&bone_indices)?;
        for influence in &vertex.influences {
            write_f32(w, influence.weight)?;
        }
    }
    Ok(())
}

fn write_bone<W: Write>(w: &mut W, bone: &Bone) -> Result<(), ConvertError> {
    write_vec3(w, bone.local_position)?;
    write_quat(w, bone.local_rotation)?;
    write_mat4(w, &bone.inverse_bind)?;
    w.write_all(&bone.index.to_le_bytes())?;
    let parent = bone.parent.map_or(ROOT_PARENT, |p| p as i32);
    w.write_all(&parent.to_le_bytes())?;
    write_name(w, "bone name", &bone.name)
}

fn write_clip<W: Write>(w: &mut W, clip: &AnimationClip) -> Result<(), ConvertError> {
    write_name(w, "clip name", &clip.name)?;
    write_f32(w, clip.duration)?;
    w.write_all(&count_u32("track", clip.tracks.len())?.to_le_bytes())?;
    for track in &clip.tracks {
        w.write_all(&count_u32("keyframe", track.len())?.to_le_bytes())?;
        for key in track {
            write_f32(w, key.time)?;
            write_vec3(w, key.position)?;
            write_quat(w, key.rotation)?;
        }
    }
    Ok(())
}

fn write_name<W: Write>(w: &mut W, what: &'static str, name: &str) -> Result<(), ConvertError> {
    w.write_all(&count_u32(what, name.len())?.to_le_bytes())?;
    w.write_all(name.as_bytes())?;
    Ok(())
}

fn write_f32<W: Write>(w: &mut W, value: f64) -> Result<(), ConvertError> {
    w.write_all(&(value as f32).to_le_bytes())?;
    Ok(())
}

fn write_floats<W: Write>(w: &mut W, values: &[f64]) -> Result<(), ConvertError> {
    for &value in values {
        write_f32(w, value)?;
    }
    Ok(())
}

fn write_vec2<W: Write>(w: &mut W, v: DVec2) -> Result<(), ConvertError> {
    write_floats(w, &v.to_array())
}

fn write_vec3<W: Write>(w: &mut W, v: DVec3) -> Result<(), ConvertError> {
    write_floats(w, &v.to_array())
}

fn write_quat<W: Write>(w: &mut W, q: DQuat) -> Result<(), ConvertError> {
    write_floats(w, &q.to_array())
}

fn write_mat4<W: Write>(w: &mut W, m: &DMat4) -> Result<(), ConvertError> {
    write_floats(w, &m.to_cols_array())
}
