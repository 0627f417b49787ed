//! Conversion error taxonomy

use std::path::PathBuf;
use thiserror::Error;

use crate::axis::AxisSystem;

/// Failures that abort a conversion.
///
/// Degenerate geometry (zero UV determinants, unshared vertices) and zero skin
/// weight sums are recovered in place and never surface here.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Failed to read scene {path:?}: {reason}")]
    SourceUnreadable { path: PathBuf, reason: String },

    #[error("Scene contains no meshes")]
    EmptyScene,

    #[error("Mesh '{mesh}': invalid {attribute} stream: {reason}")]
    InvalidStream {
        mesh: String,
        attribute: &'static str,
        reason: String,
    },

    #[error("Skeleton has {0} bones, but per-vertex bone indices address at most {max}", max = gmf_common::MAX_BONES)]
    TooManyBones(usize),

    #[error("{what} count {count} does not fit in a u32")]
    TooLarge { what: &'static str, count: usize },

    #[error("Axis system {0:?} has parallel up and front axes")]
    DegenerateAxes(AxisSystem),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    pub(crate) fn invalid_stream(
        mesh: &str,
        attribute: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidStream {
            mesh: mesh.to_string(),
            attribute,
            reason: reason.into(),
        }
    }
}
