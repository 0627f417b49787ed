//! Shared types for the GMF model asset format
//!
//! GMF is a write-once, little-endian container holding one skinned or static
//! mesh plus an optional skeleton and keyframe animation set. This crate is the
//! single source of truth for its layout; the exporter in `tools/gmf-export`
//! writes it and engines read it.

pub mod asset_format;
pub mod formats;

pub use asset_format::{AssetFormat, GMF_FORMAT};
pub use formats::*;
