//! Test-only GMF reader
//!
//! Parses a written `.gmf` buffer back into plain structs so integration tests
//! can check what actually landed on disk.

#![allow(dead_code)]

use gmf_common::{GmfHeader, ModelKind, INFLUENCES_PER_VERTEX, ROOT_PARENT};

#[derive(Debug, Clone)]
pub struct ParsedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
    pub bones: [u8; INFLUENCES_PER_VERTEX],
    pub weights: [f32; INFLUENCES_PER_VERTEX],
}

#[derive(Debug, Clone)]
pub struct ParsedBone {
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub inverse_bind: [f32; 16],
    pub index: u32,
    pub parent: i32,
    pub name: String,
}

impl ParsedBone {
    pub fn is_root(&self) -> bool {
        self.parent == ROOT_PARENT
    }
}

#[derive(Debug, Clone)]
pub struct ParsedKeyframe {
    pub time: f32,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
}

#[derive(Debug, Clone)]
pub struct ParsedClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Vec<ParsedKeyframe>>,
}

#[derive(Debug, Clone)]
pub struct ParsedGmf {
    pub kind: ModelKind,
    pub vertices: Vec<ParsedVertex>,
    pub indices: Vec<u32>,
    pub bones: Vec<ParsedBone>,
    pub clips: Vec<ParsedClip>,
}

impl ParsedGmf {
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .collect()
    }
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> &'a [u8] {
        assert!(
            self.pos + n <= self.data.len(),
            "truncated GMF: need {} bytes at offset {}, have {}",
            n,
            self.pos,
            self.data.len()
        );
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        bytes
    }

    fn u8(&mut self) -> u8 {
        self.take(1)[0]
    }

    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take(4).try_into().unwrap())
    }

    fn i32(&mut self) -> i32 {
        i32::from_le_bytes(self.take(4).try_into().unwrap())
    }

    fn f32(&mut self) -> f32 {
        f32::from_le_bytes(self.take(4).try_into().unwrap())
    }

    fn floats<const N: usize>(&mut self) -> [f32; N] {
        let mut out = [0.0; N];
        for v in &mut out {
            *v = self.f32();
        }
        out
    }

    fn name(&mut self) -> String {
        let len = self.u32() as usize;
        String::from_utf8(self.take(len).to_vec()).expect("name is not UTF-8")
    }
}

/// Parse a complete GMF buffer, panicking on any layout violation
pub fn parse_gmf(data: &[u8]) -> ParsedGmf {
    let header = GmfHeader::from_bytes(data).expect("GMF shorter than its header");
    let kind = header.kind().expect("unknown model kind");
    let mut c = Cursor {
        data,
        pos: GmfHeader::SIZE,
    };

    let vertices = (0..header.vertex_count)
        .map(|_| {
            let position = c.floats::<3>();
            let normal = c.floats::<3>();
            let uv = c.floats::<2>();
            let tangent = c.floats::<3>();
            let bitangent = c.floats::<3>();
            let (bones, weights) = if kind.is_skinned() {
                let mut bones = [0u8; INFLUENCES_PER_VERTEX];
                for b in &mut bones {
                    *b = c.u8();
                }
                (bones, c.floats::<INFLUENCES_PER_VERTEX>())
            } else {
                ([0; INFLUENCES_PER_VERTEX], [0.0; INFLUENCES_PER_VERTEX])
            };
            ParsedVertex {
                position,
                normal,
                uv,
                tangent,
                bitangent,
                bones,
                weights,
            }
        })
        .collect();

    let indices = (0..header.index_count).map(|_| c.u32()).collect();

    let mut bones = Vec::new();
    let mut clips = Vec::new();
    if kind.is_skinned() {
        let bone_count = c.u32();
        for _ in 0..bone_count {
            bones.push(ParsedBone {
                position: c.floats::<3>(),
                rotation: c.floats::<4>(),
                inverse_bind: c.floats::<16>(),
                index: c.u32(),
                parent: c.i32(),
                name: c.name(),
            });
        }

        let clip_count = c.u32();
        for _ in 0..clip_count {
            let name = c.name();
            let duration = c.f32();
            let track_count = c.u32();
            let tracks = (0..track_count)
                .map(|_| {
                    let key_count = c.u32();
                    (0..key_count)
                        .map(|_| ParsedKeyframe {
                            time: c.f32(),
                            position: c.floats::<3>(),
                            rotation: c.floats::<4>(),
                        })
                        .collect()
                })
                .collect();
            clips.push(ParsedClip {
                name,
                duration,
                tracks,
            });
        }
    }

    assert_eq!(c.pos, data.len(), "trailing bytes after GMF content");

    ParsedGmf {
        kind,
        vertices,
        indices,
        bones,
        clips,
    }
}

pub fn length3(v: [f32; 3]) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

pub fn approx3(a: [f32; 3], b: [f32; 3]) -> bool {
    a.iter().zip(&b).all(|(x, y)| approx(*x, *y))
}

/// Quaternion equality up to sign
pub fn same_rotation(a: [f32; 4], b: [f32; 4]) -> bool {
    let direct = a.iter().zip(&b).all(|(x, y)| approx(*x, *y));
    let negated = a.iter().zip(&b).all(|(x, y)| approx(*x, -*y));
    direct || negated
}

/// Whether two triangles have the same winding (cyclic rotation of each other)
pub fn same_cycle(a: [u32; 3], b: [u32; 3]) -> bool {
    (0..3).any(|r| a == [b[r], b[(r + 1) % 3], b[(r + 2) % 3]])
}
