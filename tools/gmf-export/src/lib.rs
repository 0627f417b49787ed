//! gmf-export library
//!
//! Converts imported scenes into GMF model assets: one deduplicated triangle
//! mesh in the target coordinate system, plus skeleton and animation clips for
//! skinned models.

pub mod animation;
pub mod axis;
pub mod config;
pub mod error;
pub mod formats;
pub mod import;
pub mod math;
pub mod mesh;
pub mod scene;
pub mod session;
pub mod skeleton;
pub mod skin;

// Re-export the format crate's constants
pub use gmf_common::{ModelKind, GMF_FORMAT, INFLUENCES_PER_VERTEX, MAX_BONES};

pub use axis::{AxisSystem, CoordinateConverter, Handedness, SignedAxis};
pub use config::ExportConfig;
pub use error::ConvertError;
pub use formats::{gmf_to_bytes, write_gmf, Model};
pub use import::load_scene;
pub use scene::SourceScene;
pub use session::{convert_file, convert_to_memory, ConversionSession};
