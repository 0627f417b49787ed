//! Wavefront OBJ scene import
//!
//! Positions, texture coordinates and normals live in independent pools and
//! every face corner indexes each pool separately, which maps directly onto
//! indexed layer elements. Each `o`/`g` group becomes one node with one
//! sub-mesh.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glam::{DVec2, DVec3};
use hashbrown::HashMap;

use crate::axis::AxisSystem;
use crate::error::ConvertError;
use crate::scene::{LayerElement, SourceMesh, SourceScene, Transform};

/// Load an OBJ file. OBJ carries no axis convention, so `axes` supplies it.
pub fn load_obj(path: &Path, axes: AxisSystem) -> Result<SourceScene, ConvertError> {
    let unreadable = |reason: String| ConvertError::SourceUnreadable {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|e| unreadable(e.to_string()))?;
    let mut parser = ObjParser::default();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| unreadable(e.to_string()))?;
        parser
            .parse_line(&line)
            .map_err(|reason| unreadable(format!("line {}: {}", number + 1, reason)))?;
    }

    let scene = parser.finish(axes);
    tracing::info!(
        "Loaded OBJ {}: {} meshes",
        path.display(),
        scene.meshes.len()
    );
    Ok(scene)
}

/// Face corner: pool indices (already resolved to 0-based)
#[derive(Debug, Clone, Copy)]
struct Corner {
    position: usize,
    uv: Option<usize>,
    normal: Option<usize>,
}

#[derive(Debug, Default)]
struct Group {
    name: String,
    corners: Vec<Corner>,
    polygon_sizes: Vec<u32>,
}

#[derive(Debug, Default)]
struct ObjParser {
    positions: Vec<DVec3>,
    uvs: Vec<DVec2>,
    normals: Vec<DVec3>,
    groups: Vec<Group>,
    current: Group,
}

impl ObjParser {
    fn parse_line(&mut self, line: &str) -> Result<(), String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            return Ok(());
        };
        let args: Vec<&str> = parts.collect();

        match keyword {
            "v" => {
                let [x, y, z] = parse_floats::<3>(&args)?;
                self.positions.push(DVec3::new(x, y, z));
            }
            "vt" => {
                // The optional third (w) component is ignored
                let [u, v] = parse_floats::<2>(&args)?;
                self.uvs.push(DVec2::new(u, v));
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>(&args)?;
                self.normals.push(DVec3::new(x, y, z));
            }
            "f" => {
                if args.len() < 3 {
                    return Err(format!("face with {} corners", args.len()));
                }
                for token in &args {
                    let corner = self.parse_corner(token)?;
                    self.current.corners.push(corner);
                }
                self.current.polygon_sizes.push(args.len() as u32);
            }
            "o" | "g" => {
                self.start_group(args.join(" "));
            }
            // Materials, smoothing groups, lines and points don't affect geometry
            _ => {}
        }
        Ok(())
    }

    fn parse_corner(&self, token: &str) -> Result<Corner, String> {
        let mut fields = token.split('/');
        let position = fields
            .next()
            .ok_or_else(|| format!("empty face corner '{}'", token))
            .and_then(|f| resolve_index(f, self.positions.len(), "position"))?;
        let uv = match fields.next() {
            Some(f) if !f.is_empty() => Some(resolve_index(f, self.uvs.len(), "uv")?),
            _ => None,
        };
        let normal = match fields.next() {
            Some(f) if !f.is_empty() => Some(resolve_index(f, self.normals.len(), "normal")?),
            _ => None,
        };
        Ok(Corner {
            position,
            uv,
            normal,
        })
    }

    fn start_group(&mut self, name: String) {
        let previous = std::mem::replace(
            &mut self.current,
            Group {
                name,
                ..Default::default()
            },
        );
        if !previous.corners.is_empty() {
            self.groups.push(previous);
        }
    }

    fn finish(mut self, axes: AxisSystem) -> SourceScene {
        self.start_group(String::new());

        let mut scene = SourceScene::new(axes);
        for (index, group) in self.groups.iter().enumerate() {
            let name = if group.name.is_empty() {
                format!("mesh_{}", index)
            } else {
                group.name.clone()
            };
            let node = scene.add_node(name.clone(), SourceScene::ROOT, Transform::IDENTITY);
            let mesh = self.build_mesh(group, name, node);
            scene.add_mesh(mesh);
        }
        scene
    }

    fn build_mesh(&self, group: &Group, name: String, node: usize) -> SourceMesh {
        // Compact the global position pool to the points this group uses
        let mut remap: HashMap<usize, u32> = HashMap::new();
        let mut control_points = Vec::new();
        let polygon_vertices: Vec<u32> = group
            .corners
            .iter()
            .map(|corner| {
                *remap.entry(corner.position).or_insert_with(|| {
                    control_points.push(self.positions[corner.position]);
                    (control_points.len() - 1) as u32
                })
            })
            .collect();

        let uvs = indexed_layer(&name, "uv", &self.uvs, group.corners.iter().map(|c| c.uv));
        let normals = indexed_layer(
            &name,
            "normal",
            &self.normals,
            group.corners.iter().map(|c| c.normal),
        );

        SourceMesh {
            name,
            node,
            control_points,
            polygon_vertices,
            polygon_sizes: group.polygon_sizes.clone(),
            normals,
            uvs,
            ..Default::default()
        }
    }
}

/// Per-corner indexed layer, or `None` unless every corner has an index
fn indexed_layer<T: Clone>(
    mesh: &str,
    attribute: &str,
    pool: &[T],
    indices: impl Iterator<Item = Option<usize>>,
) -> Option<LayerElement<T>> {
    let indices: Vec<Option<usize>> = indices.collect();
    let present = indices.iter().filter(|i| i.is_some()).count();
    if present == 0 {
        return None;
    }
    if present < indices.len() {
        tracing::warn!(
            "Mesh '{}': {} of {} corners have a {} index, dropping the stream",
            mesh,
            present,
            indices.len(),
            attribute
        );
        return None;
    }
    Some(LayerElement::indexed(
        pool.to_vec(),
        indices.into_iter().flatten().map(|i| i as u32).collect(),
    ))
}

fn parse_floats<const N: usize>(args: &[&str]) -> Result<[f64; N], String> {
    if args.len() < N {
        return Err(format!("expected {} values, got {}", N, args.len()));
    }
    let mut values = [0.0; N];
    for (value, arg) in values.iter_mut().zip(args) {
        *value = arg
            .parse()
            .map_err(|_| format!("invalid number '{}'", arg))?;
    }
    Ok(values)
}

/// Resolve a 1-based (or negative, relative to the pool end) index
fn resolve_index(field: &str, pool_len: usize, what: &str) -> Result<usize, String> {
    let raw: i64 = field
        .parse()
        .map_err(|_| format!("invalid {} index '{}'", what, field))?;
    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r as usize - 1),
        r => (pool_len as i64 + r).try_into().ok(),
    };
    match resolved {
        Some(index) if index < pool_len => Ok(index),
        _ => Err(format!(
            "{} index {} out of range for {} entries",
            what, raw, pool_len
        )),
    }
}
