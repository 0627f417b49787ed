//! Scene importers
//!
//! Each importer turns one file format into a [`SourceScene`]; nothing after
//! this module knows which format a scene came from.

mod gltf;
mod obj;

pub use self::gltf::load_gltf;
pub use obj::load_obj;

use std::path::Path;

use crate::axis::AxisSystem;
use crate::config::ExportConfig;
use crate::error::ConvertError;
use crate::scene::SourceScene;

/// Load a scene, choosing the importer by file extension
pub fn load_scene(path: &Path, config: &ExportConfig) -> Result<SourceScene, ConvertError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    tracing::info!("Loading scene {}", path.display());
    match extension.as_str() {
        "gltf" | "glb" => load_gltf(path),
        "obj" => load_obj(path, config.source.unwrap_or(AxisSystem::Y_UP_RIGHT_HANDED)),
        _ => Err(ConvertError::SourceUnreadable {
            path: path.to_path_buf(),
            reason: format!("unsupported scene format '{}'", extension),
        }),
    }
}
