//! Model header and vertex layout.
//!
//! # Layout
//! ```text
//! 0x00: model_kind u32 (0 = static, 1 = skinned)
//! 0x04: vertex_count u32
//! 0x08: index_count u32
//! 0x0C: vertex_data (vertex_count * stride)
//! var:  index_data (index_count * 4 bytes)
//! ```
//!
//! Each vertex is position f32×3, normal f32×3, uv f32×2, tangent f32×3,
//! bitangent f32×3 and, for skinned models, bone indices u8×4 followed by
//! bone weights f32×4.

use super::INFLUENCES_PER_VERTEX;

/// Whether the asset carries skinning data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ModelKind {
    Static = 0,
    Skinned = 1,
}

impl ModelKind {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Static),
            1 => Some(Self::Skinned),
            _ => None,
        }
    }

    pub fn is_skinned(self) -> bool {
        self == Self::Skinned
    }
}

/// Floats per vertex shared by both model kinds (3 + 3 + 2 + 3 + 3)
pub const VERTEX_FLOATS: usize = 14;

/// Bytes of skinning data appended to each skinned vertex (u8×4 + f32×4)
pub const SKIN_DATA_SIZE: usize = INFLUENCES_PER_VERTEX + INFLUENCES_PER_VERTEX * 4;

/// Size of one vertex in bytes for the given model kind
pub const fn vertex_stride(kind: ModelKind) -> usize {
    match kind {
        ModelKind::Static => VERTEX_FLOATS * 4,
        ModelKind::Skinned => VERTEX_FLOATS * 4 + SKIN_DATA_SIZE,
    }
}

/// GMF header (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct GmfHeader {
    pub model_kind: u32,
    pub vertex_count: u32,
    pub index_count: u32,
}

impl GmfHeader {
    pub const SIZE: usize = 12;

    pub fn new(kind: ModelKind, vertex_count: u32, index_count: u32) -> Self {
        Self {
            model_kind: kind as u32,
            vertex_count,
            index_count,
        }
    }

    /// Model kind, if the tag is a known value
    pub fn kind(&self) -> Option<ModelKind> {
        ModelKind::from_u32(self.model_kind)
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.model_kind.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.vertex_count.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.index_count.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            model_kind: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            vertex_count: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            index_count: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        })
    }

    /// Bytes occupied by the vertex and index blocks that follow the header
    pub fn geometry_size(&self) -> Option<usize> {
        let stride = vertex_stride(self.kind()?);
        Some(self.vertex_count as usize * stride + self.index_count as usize * 4)
    }
}
