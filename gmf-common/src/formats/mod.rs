//! GMF binary layout definitions
//!
//! POD layout, little-endian, no magic bytes and no version tag. The format is
//! identified by its extension only (see [`crate::GMF_FORMAT`]).
//!
//! # Layout
//! ```text
//! header       GmfHeader (12 bytes)
//! vertices     vertex_count × vertex stride (see `vertex_stride`)
//! indices      index_count × u32
//! if skinned:
//!   bone_count u32, then bone_count bone records (see `skeleton`)
//!   clip_count u32, then clip_count clips (see `animation`)
//! ```

pub mod animation;
pub mod model;
pub mod skeleton;

pub use animation::*;
pub use model::*;
pub use skeleton::*;

/// Number of (bone index, weight) pairs stored per skinned vertex.
pub const INFLUENCES_PER_VERTEX: usize = 4;
