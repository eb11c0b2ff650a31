//! Wavefront OBJ reader.
//!
//! Only geometry is read: `v`, `vt`, `vn` and `f` statements. Groups,
//! smoothing groups and materials are ignored. Polygons are fan-triangulated.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use glam::{Vec2, Vec3};
use tracing::debug;

use super::{compute_tangents_shared, MeshData, Vertex};
use crate::{Error, Result};

/// Most unique vertices a mesh may have with 16-bit indices.
const MAX_VERTICES: usize = u16::MAX as usize;

/// Read and parse an OBJ file.
pub fn load(path: impl AsRef<Path>) -> Result<MeshData> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let mesh = parse(&text)?;
    debug!(
        "Loaded {} ({} vertices, {} triangles)",
        path.display(),
        mesh.vertices.len(),
        mesh.indices.len() / 3
    );
    Ok(mesh)
}

// A face corner. Corners without a normal take the face normal, so they
// are only shared within the face that created them.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct Corner {
    position: usize,
    tex_coord: Option<usize>,
    normal: Option<usize>,
    face: Option<usize>,
}

#[derive(Default)]
struct Builder {
    positions: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
    normals: Vec<Vec3>,
    corners: HashMap<Corner, u16>,
    mesh: MeshData,
    faces: usize,
}

/// Parse OBJ text into an indexed mesh with a tangent frame.
pub fn parse(text: &str) -> Result<MeshData> {
    let mut builder = Builder::default();

    for (n, line) in text.lines().enumerate() {
        let line_no = n + 1;
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else { continue };
        let args: Vec<&str> = tokens.collect();

        match keyword {
            "v" => builder.positions.push(vec3(&args, line_no)?),
            "vn" => builder.normals.push(vec3(&args, line_no)?),
            "vt" => {
                let uv = floats::<2>(&args, line_no)?;
                // OBJ puts v = 0 at the bottom of the image, D3D at the top.
                builder.tex_coords.push(Vec2::new(uv[0], 1.0 - uv[1]));
            },
            "f" => builder.face(&args, line_no)?,
            _ => {},
        }
    }

    let mut mesh = builder.mesh;
    compute_tangents_shared(&mut mesh.vertices, &mesh.indices);
    Ok(mesh)
}

impl Builder {
    fn face(&mut self, args: &[&str], line: usize) -> Result<()> {
        if args.len() < 3 {
            return Err(Error::obj(line, format!("face has {} vertices, need 3", args.len())));
        }

        let face = self.faces;
        self.faces += 1;

        let corners = args
            .iter()
            .map(|token| self.corner(token, face, line))
            .collect::<Result<Vec<_>>>()?;

        let p0 = self.positions[corners[0].position];
        let p1 = self.positions[corners[1].position];
        let p2 = self.positions[corners[2].position];
        let face_normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();

        let indices = corners
            .iter()
            .map(|corner| self.index_of(*corner, face_normal))
            .collect::<Result<Vec<_>>>()?;

        for i in 1..indices.len() - 1 {
            self.mesh.indices.extend_from_slice(&[indices[0], indices[i], indices[i + 1]]);
        }

        Ok(())
    }

    fn corner(&self, token: &str, face: usize, line: usize) -> Result<Corner> {
        let mut parts = token.split('/');
        let position = parts
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::obj(line, format!("{token:?} has no position index")))?;
        let position = resolve(position, self.positions.len(), line)?;

        let tex_coord = match parts.next() {
            Some(s) if !s.is_empty() => Some(resolve(s, self.tex_coords.len(), line)?),
            _ => None,
        };
        let normal = match parts.next() {
            Some(s) if !s.is_empty() => Some(resolve(s, self.normals.len(), line)?),
            _ => None,
        };
        if parts.next().is_some() {
            return Err(Error::obj(line, format!("{token:?} has too many components")));
        }

        Ok(Corner { position, tex_coord, normal, face: normal.is_none().then_some(face) })
    }

    fn index_of(&mut self, corner: Corner, face_normal: Vec3) -> Result<u16> {
        if let Some(&index) = self.corners.get(&corner) {
            return Ok(index);
        }

        let count = self.mesh.vertices.len();
        if count >= MAX_VERTICES {
            return Err(Error::MeshTooLarge(count + 1));
        }

        let position = self.positions[corner.position];
        let tex_coord = corner.tex_coord.map_or(Vec2::ZERO, |i| self.tex_coords[i]);
        let normal = corner.normal.map_or(face_normal, |i| self.normals[i]);

        let index = count as u16;
        self.mesh.vertices.push(Vertex::new(position, normal, tex_coord));
        self.corners.insert(corner, index);
        Ok(index)
    }
}

// OBJ indices are 1-based; negative ones count back from the end.
fn resolve(token: &str, len: usize, line: usize) -> Result<usize> {
    let raw: i64 =
        token.parse().map_err(|_| Error::obj(line, format!("{token:?} is not an index")))?;

    let index = match raw {
        0 => None,
        r if r > 0 => usize::try_from(r - 1).ok(),
        r => usize::try_from(-r).ok().and_then(|back| len.checked_sub(back)),
    };

    index
        .filter(|&i| i < len)
        .ok_or_else(|| Error::obj(line, format!("index {raw} out of range ({len} defined)")))
}

fn floats<const N: usize>(args: &[&str], line: usize) -> Result<[f32; N]> {
    if args.len() < N {
        return Err(Error::obj(line, format!("expected {N} numbers, found {}", args.len())));
    }

    let mut out = [0.0; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg.parse().map_err(|_| Error::obj(line, format!("{arg:?} is not a number")))?;
    }
    Ok(out)
}

fn vec3(args: &[&str], line: usize) -> Result<Vec3> {
    floats::<3>(args, line).map(Vec3::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# a unit quad
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
usemtl none
s off
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn quad_is_fan_triangulated() {
        let mesh = parse(QUAD).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn v_coordinate_is_flipped() {
        let mesh = parse(QUAD).unwrap();
        assert_eq!(mesh.vertices[0].tex_coord, Vec2::new(0.0, 1.0));
        assert_eq!(mesh.vertices[2].tex_coord, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn repeated_corners_are_shared() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nvn 0 0 1\n\
                    f 1//1 2//1 3//1\nf 3//1 2//1 4//1\n";
        let mesh = parse(text).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
    }

    #[test]
    fn negative_indices_are_relative() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let mesh = parse(text).unwrap();
        assert_eq!(mesh.vertices[0].position, Vec3::ZERO);
        assert_eq!(mesh.vertices[2].position, Vec3::Y);
    }

    #[test]
    fn missing_normals_use_the_face_normal() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 2 3\nf 1 4 2\n";
        let mesh = parse(text).unwrap();

        // Corner 1 and 2 appear in both faces but with different normals.
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.vertices[0].normal, Vec3::Z);
        assert_eq!(mesh.vertices[3].normal, Vec3::Y);
    }

    #[test]
    fn errors_carry_the_line_number() {
        let err = parse("v 0 0 0\nv 1 x 0\n").unwrap_err();
        assert!(matches!(err, Error::Obj { line: 2, .. }), "{err}");

        let err = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\n\nf 1 2 7\n").unwrap_err();
        assert!(matches!(err, Error::Obj { line: 5, .. }), "{err}");

        let err = parse("v 0 0 0\nf 1 1\n").unwrap_err();
        assert!(matches!(err, Error::Obj { line: 2, .. }), "{err}");

        let err = parse("v 0 0 0\nf 0 1 1\n").unwrap_err();
        assert!(matches!(err, Error::Obj { line: 2, .. }), "{err}");
    }

    // Corners without a normal are never shared between faces, so every
    // triangle adds three vertices and every quad four.
    fn triangles(count: usize) -> String {
        let mut text = String::from("v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\n");
        for _ in 0..count {
            text.push_str("f 1 2 3\n");
        }
        text
    }

    #[test]
    fn vertex_limit_is_inclusive() {
        let mesh = parse(&triangles(MAX_VERTICES / 3)).unwrap();
        assert_eq!(mesh.vertices.len(), 65535);
        assert_eq!(mesh.indices.iter().copied().max(), Some(65534));
    }

    #[test]
    fn one_vertex_past_the_limit_is_rejected() {
        let mut text = triangles(MAX_VERTICES / 3 - 1);
        text.push_str("f 1 2 4 3\n");
        assert!(matches!(parse(&text), Err(Error::MeshTooLarge(65536))));
    }
}
