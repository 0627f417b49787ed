//! Asset format constants.
//!
//! # Example
//!
//! ```
//! use gmf_common::GMF_FORMAT;
//!
//! assert_eq!(GMF_FORMAT.extension, "gmf");
//! ```

/// Format constants for a model asset family.
#[derive(Debug, Clone, Copy)]
pub struct AssetFormat {
    /// File extension without dot (e.g., "gmf")
    pub extension: &'static str,

    /// Number of (bone, weight) pairs stored per skinned vertex
    pub influences_per_vertex: usize,
}

impl AssetFormat {
    pub const fn new(extension: &'static str, influences_per_vertex: usize) -> Self {
        Self {
            extension,
            influences_per_vertex,
        }
    }
}

/// GMF format constants.
///
/// There is no magic number or version tag in the file itself; the extension
/// is the only identification.
pub const GMF_FORMAT: AssetFormat = AssetFormat::new("gmf", crate::INFLUENCES_PER_VERTEX);
