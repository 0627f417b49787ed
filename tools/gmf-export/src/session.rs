//! Conversion session: runs the whole pipeline over one imported scene

use anyhow::{Context, Result};
use std::path::Path;

use gmf_common::{ModelKind, INFLUENCES_PER_VERTEX, MAX_BONES};

use crate::animation::collect_animations;
use crate::axis::CoordinateConverter;
use crate::config::ExportConfig;
use crate::error::ConvertError;
use crate::formats::{gmf_to_bytes, Model};
use crate::import::load_scene;
use crate::mesh::{combine_meshes, process_mesh};
use crate::scene::SourceScene;
use crate::skeleton::{bone_lookup, collect_bones, process_bones};
use crate::skin::{apply_influences, gather_skin_weights};

/// One scene on its way to a [`Model`].
///
/// The coordinate converter is fixed at construction; the bone list is built
/// once in [`run`](Self::run) and only read after that.
pub struct ConversionSession<'a> {
    scene: SourceScene,
    config: &'a ExportConfig,
    converter: CoordinateConverter,
}

impl<'a> ConversionSession<'a> {
    pub fn new(scene: SourceScene, config: &'a ExportConfig) -> Result<Self, ConvertError> {
        let source = config.source.unwrap_or(scene.axes);
        let converter = match CoordinateConverter::new(source, config.target) {
            Some(converter) => converter,
            None => {
                let degenerate = if source.basis().is_none() {
                    source
                } else {
                    config.target
                };
                return Err(ConvertError::DegenerateAxes(degenerate));
            }
        };

        if converter.flip_winding() {
            tracing::debug!("Handedness changes, triangle winding will be reversed");
        }

        Ok(Self {
            scene,
            config,
            converter,
        })
    }

    pub fn converter(&self) -> &CoordinateConverter {
        &self.converter
    }

    /// Run every stage and return the finished model
    pub fn run(self) -> Result<Model, ConvertError> {
        let Self {
            mut scene,
            config,
            converter,
        } = self;

        tracing::info!("Collecting meshes");
        let mesh_ids = scene.collect_meshes();
        if mesh_ids.is_empty() {
            return Err(ConvertError::EmptyScene);
        }
        tracing::info!("Collected {} meshes", mesh_ids.len());

        let mut bones = if config.extract.skeleton {
            collect_bones(&scene)
        } else {
            Vec::new()
        };
        if bones.len() > MAX_BONES {
            return Err(ConvertError::TooManyBones(bones.len()));
        }
        let kind = if bones.is_empty() {
            ModelKind::Static
        } else {
            ModelKind::Skinned
        };
        let lookup = bone_lookup(&bones);

        let mut meshes = Vec::with_capacity(mesh_ids.len());
        for id in mesh_ids {
            let mut mesh = process_mesh(&scene, id, &converter, config.flip_v)?;
            if kind.is_skinned() {
                gather_skin_weights(
                    &scene.meshes[id],
                    &lookup,
                    &mut mesh.skin,
                    &mut scene.bind_pose,
                );
            }
            meshes.push(mesh);
        }

        tracing::info!("Combining {} meshes", meshes.len());
        let mut mesh = combine_meshes(meshes);

        process_bones(&mut bones, &scene, &converter);

        let clips = if kind.is_skinned() && config.extract.animations {
            collect_animations(&scene, &bones, &converter)
        } else {
            Vec::new()
        };

        if kind.is_skinned() {
            mesh.skin.normalize(INFLUENCES_PER_VERTEX);
            apply_influences(&mut mesh);
        }

        tracing::info!(
            "Converted {:?} model: {} vertices, {} triangles, {} bones, {} clips",
            kind,
            mesh.vertices.len(),
            mesh.triangle_count(),
            bones.len(),
            clips.len()
        );

        Ok(Model {
            kind,
            mesh,
            bones,
            clips,
        })
    }
}

/// Import and convert a scene file in memory
pub fn convert_to_memory(input: &Path, config: &ExportConfig) -> Result<Model> {
    let scene = load_scene(input, config)?;
    let model = ConversionSession::new(scene, config)?
        .run()
        .with_context(|| format!("Failed to convert {}", input.display()))?;
    Ok(model)
}

/// Convert a scene file and write the result to `output`.
///
/// The asset is serialized completely before anything is written, so a failed
/// conversion never leaves a partial file behind.
pub fn convert_file(input: &Path, output: &Path, config: &ExportConfig) -> Result<()> {
    let model = convert_to_memory(input, config)?;
    let bytes = gmf_to_bytes(&model)?;

    std::fs::write(output, &bytes)
        .map_err(ConvertError::from)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        "Converted {} -> {} ({} bytes)",
        input.display(),
        output.display(),
        bytes.len()
    );
    Ok(())
}
