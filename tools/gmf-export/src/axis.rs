//! Coordinate system conversion
//!
//! Builds the fixed change-of-basis matrix between the source scene's axis
//! convention and the target engine convention, and reports whether triangle
//! winding has to be reversed to keep faces pointing outward.

use glam::{DMat3, DMat4, DVec3};
use serde::Deserialize;

/// A coordinate axis with a sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SignedAxis {
    #[serde(rename = "+x")]
    PosX,
    #[serde(rename = "-x")]
    NegX,
    #[serde(rename = "+y")]
    PosY,
    #[serde(rename = "-y")]
    NegY,
    #[serde(rename = "+z")]
    PosZ,
    #[serde(rename = "-z")]
    NegZ,
}

impl SignedAxis {
    pub fn vector(self) -> DVec3 {
        match self {
            Self::PosX => DVec3::X,
            Self::NegX => DVec3::NEG_X,
            Self::PosY => DVec3::Y,
            Self::NegY => DVec3::NEG_Y,
            Self::PosZ => DVec3::Z,
            Self::NegZ => DVec3::NEG_Z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Right,
    Left,
}

/// Axis convention of a coordinate space.
///
/// `front` is the direction a model faces (towards a default camera).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AxisSystem {
    pub up: SignedAxis,
    pub front: SignedAxis,
    pub handedness: Handedness,
}

impl AxisSystem {
    /// Y up, +Z front, right-handed (glTF, Maya, OpenGL)
    pub const Y_UP_RIGHT_HANDED: Self = Self {
        up: SignedAxis::PosY,
        front: SignedAxis::PosZ,
        handedness: Handedness::Right,
    };

    /// Y up, -Z front, left-handed (Direct3D)
    pub const DIRECT3D: Self = Self {
        up: SignedAxis::PosY,
        front: SignedAxis::NegZ,
        handedness: Handedness::Left,
    };

    /// Z up, -Y front, right-handed (3ds Max, Blender)
    pub const Z_UP_RIGHT_HANDED: Self = Self {
        up: SignedAxis::PosZ,
        front: SignedAxis::NegY,
        handedness: Handedness::Right,
    };

    /// Basis with columns (right, up, front), or `None` if up and front share an axis
    pub fn basis(&self) -> Option<DMat3> {
        let up = self.up.vector();
        let front = self.front.vector();
        let right = match self.handedness {
            Handedness::Right => up.cross(front),
            Handedness::Left => front.cross(up),
        };
        if right.length_squared() < 0.5 {
            return None;
        }
        Some(DMat3::from_cols(right, up, front))
    }
}

impl Default for AxisSystem {
    fn default() -> Self {
        Self::DIRECT3D
    }
}

/// Fixed source-to-target change of basis for one conversion session
#[derive(Debug, Clone, Copy)]
pub struct CoordinateConverter {
    conversion: DMat4,
    inverse: DMat4,
    flip_winding: bool,
}

impl CoordinateConverter {
    /// Returns `None` when either axis system is degenerate (up parallel to front).
    pub fn new(source: AxisSystem, target: AxisSystem) -> Option<Self> {
        let source_basis = source.basis()?;
        let target_basis = target.basis()?;

        // Both bases are signed permutations, so the transpose is the inverse.
        let conversion = target_basis * source_basis.transpose();
        let flip_winding = conversion.determinant() < 0.0;

        Some(Self {
            conversion: DMat4::from_mat3(conversion),
            inverse: DMat4::from_mat3(conversion.transpose()),
            flip_winding,
        })
    }

    /// The change-of-basis matrix
    pub fn matrix(&self) -> DMat4 {
        self.conversion
    }

    /// Whether every triangle must have its first and last index swapped
    pub fn flip_winding(&self) -> bool {
        self.flip_winding
    }

    /// Rebase a transform into target space (bind poses, animation samples).
    pub fn convert_point(&self, m: DMat4) -> DMat4 {
        self.conversion * m * self.inverse
    }

    /// Map a mesh-local-to-source-world transform to mesh-local-to-target-world.
    pub fn convert_mesh_transform(&self, m: DMat4) -> DMat4 {
        self.conversion * m
    }
}
