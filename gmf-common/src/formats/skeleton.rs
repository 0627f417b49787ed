//! Bone record layout.
//!
//! # Layout (per bone)
//! ```text
//! local_position f32×3
//! local_rotation f32×4 (quaternion x, y, z, w)
//! inverse_bind   f32×16 (column-major 4×4)
//! index          u32
//! parent_index   i32 (ROOT_PARENT for roots)
//! name_length    u32
//! name           u8×name_length (not NUL-terminated)
//! ```

/// Parent index written for bones without a parent bone
pub const ROOT_PARENT: i32 = -1;

/// Bytes of a bone record before its name (23 floats + index + parent + name length)
pub const BONE_RECORD_FIXED_SIZE: usize = (3 + 4 + 16) * 4 + 4 + 4 + 4;

/// Largest bone count addressable by the u8 per-vertex bone indices
pub const MAX_BONES: usize = u8::MAX as usize + 1;
