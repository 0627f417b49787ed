//! Animation clip layout.
//!
//! # Layout (per clip)
//! ```text
//! name_length     u32
//! name            u8×name_length
//! duration        f32 (seconds)
//! track_count     u32 (== bone_count)
//! per track:
//!   keyframe_count u32
//!   per keyframe:  time f32, position f32×3, rotation f32×4
//! ```

/// Size of one keyframe in bytes (8 floats)
pub const KEYFRAME_SIZE: usize = 8 * 4;
