//! Export configuration (gmf.toml)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::axis::AxisSystem;

/// Conversion settings, loaded from TOML. Every field has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output file extension without dot
    pub extension: String,

    /// Invert the V texture coordinate (source V-down to target V-up).
    /// Default: true
    pub flip_v: bool,

    /// Axis convention of the written asset. Default: Direct3D (+Y up, -Z front, left-handed)
    pub target: AxisSystem,

    /// Overrides the axis convention reported by the importer.
    /// OBJ files carry no convention and use this or Y up / +Z front / right-handed.
    pub source: Option<AxisSystem>,

    pub extract: ExtractSection,
}

/// Which optional parts of the scene to export
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractSection {
    /// Collect bones and skin weights (a scene without bones is always static)
    pub skeleton: bool,
    /// Sample animation clips (requires `skeleton`)
    pub animations: bool,
}

impl Default for ExtractSection {
    fn default() -> Self {
        Self {
            skeleton: true,
            animations: true,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            extension: gmf_common::GMF_FORMAT.extension.to_string(),
            flip_v: true,
            target: AxisSystem::default(),
            source: None,
            extract: ExtractSection::default(),
        }
    }
}

impl ExportConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        if config.extension.is_empty() || config.extension.contains('.') {
            anyhow::bail!(
                "Invalid output extension '{}' (expected a bare extension like \"gmf\")",
                config.extension
            );
        }
        for axes in std::iter::once(&config.target).chain(config.source.as_ref()) {
            if axes.basis().is_none() {
                anyhow::bail!("Axis system {:?} has parallel up and front axes", axes);
            }
        }
        Ok(config)
    }

    /// Output path for an input scene: the input with its extension replaced
    pub fn output_path(&self, input: &Path) -> PathBuf {
        input.with_extension(&self.extension)
    }
}
