//! Attribute layers and their resolution into uniform index streams
//!
//! Importers hand over each per-vertex attribute in whatever mapping the
//! source file uses. [`LayerElement::resolve`] turns every combination into the
//! same shape, one value index per polygon corner, so nothing downstream has to
//! know how the attribute was stored.

use crate::error::ConvertError;

/// What a layer's entries are attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingMode {
    /// One entry per control point
    ByControlPoint,
    /// One entry per polygon corner
    ByPolygonVertex,
}

/// How entries reach their values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceMode {
    /// Entry `i` is `direct[i]`
    Direct,
    /// Entry `i` is `direct[index[i]]`
    IndexToDirect,
}

/// One per-vertex attribute as stored by the source
#[derive(Debug, Clone)]
pub struct LayerElement<T> {
    pub mapping: MappingMode,
    pub reference: ReferenceMode,
    pub direct: Vec<T>,
    pub index: Vec<u32>,
}

impl<T> LayerElement<T> {
    /// Values keyed directly by control point
    pub fn by_control_point(direct: Vec<T>) -> Self {
        Self {
            mapping: MappingMode::ByControlPoint,
            reference: ReferenceMode::Direct,
            direct,
            index: Vec::new(),
        }
    }

    /// Values keyed directly by polygon corner
    pub fn by_polygon_vertex(direct: Vec<T>) -> Self {
        Self {
            mapping: MappingMode::ByPolygonVertex,
            reference: ReferenceMode::Direct,
            direct,
            index: Vec::new(),
        }
    }

    /// A value pool addressed through one index per polygon corner
    pub fn indexed(direct: Vec<T>, index: Vec<u32>) -> Self {
        Self {
            mapping: MappingMode::ByPolygonVertex,
            reference: ReferenceMode::IndexToDirect,
            direct,
            index,
        }
    }
}

/// A value pool plus one value index per polygon corner
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeStream<T> {
    pub values: Vec<T>,
    pub indices: Vec<u32>,
}

impl<T: Copy> AttributeStream<T> {
    /// Single value shared by every corner (stand-in for a missing attribute)
    pub fn constant(value: T, corner_count: usize) -> Self {
        Self {
            values: vec![value],
            indices: vec![0; corner_count],
        }
    }

    pub fn get(&self, corner: usize) -> T {
        self.values[self.indices[corner] as usize]
    }

    pub fn map_values(mut self, f: impl Fn(T) -> T) -> Self {
        for value in &mut self.values {
            *value = f(*value);
        }
        self
    }
}

impl<T: Clone> LayerElement<T> {
    /// Resolve to one value index per polygon corner.
    ///
    /// `polygon_vertices` holds the control point index of every corner.
    pub fn resolve(
        &self,
        mesh: &str,
        attribute: &'static str,
        polygon_vertices: &[u32],
    ) -> Result<AttributeStream<T>, ConvertError> {
        let corner_count = polygon_vertices.len();

        let indices: Vec<u32> = match (self.mapping, self.reference) {
            (MappingMode::ByControlPoint, ReferenceMode::Direct) => polygon_vertices.to_vec(),
            (MappingMode::ByControlPoint, ReferenceMode::IndexToDirect) => polygon_vertices
                .iter()
                .map(|&cp| {
                    self.index.get(cp as usize).copied().ok_or_else(|| {
                        ConvertError::invalid_stream(
                            mesh,
                            attribute,
                            format!(
                                "control point {} has no entry in the {}-element index array",
                                cp,
                                self.index.len()
                            ),
                        )
                    })
                })
                .collect::<Result<_, _>>()?,
            (MappingMode::ByPolygonVertex, ReferenceMode::Direct) => {
                if self.direct.len() < corner_count {
                    return Err(ConvertError::invalid_stream(
                        mesh,
                        attribute,
                        format!(
                            "{} values for {} polygon corners",
                            self.direct.len(),
                            corner_count
                        ),
                    ));
                }
                (0..corner_count as u32).collect()
            }
            (MappingMode::ByPolygonVertex, ReferenceMode::IndexToDirect) => {
                if self.index.len() != corner_count {
                    return Err(ConvertError::invalid_stream(
                        mesh,
                        attribute,
                        format!(
                            "{} indices for {} polygon corners",
                            self.index.len(),
                            corner_count
                        ),
                    ));
                }
                self.index.clone()
            }
        };

        if let Some(&bad) = indices
            .iter()
            .find(|&&i| i as usize >= self.direct.len())
        {
            return Err(ConvertError::invalid_stream(
                mesh,
                attribute,
                format!("index {} out of range for {} values", bad, self.direct.len()),
            ));
        }

        Ok(AttributeStream {
            values: self.direct.clone(),
            indices,
        })
    }
}
