//! CPU-side mesh data.
//!
//! Meshes are indexed triangle lists with 16-bit indices. The vertex format
//! carries a full tangent frame so that the textured pixel shader can sample
//! normal maps.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

pub mod obj;
mod tangents;

pub use tangents::{compute_tangents_shared, compute_tangents_unshared};

/// Vertex layout of every scene mesh.
///
/// Semantics, in order: `POSITION`, `NORMAL`, `TEXCOORD`, `TANGENT`,
/// `BINORMAL`.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coord: Vec2,
    pub tangent: Vec3,
    pub binormal: Vec3,
}

impl Vertex {
    pub const fn new(position: Vec3, normal: Vec3, tex_coord: Vec2) -> Self {
        Self { position, normal, tex_coord, tangent: Vec3::ZERO, binormal: Vec3::ZERO }
    }
}

/// Vertex layout of the full-screen quad: `POSITION` (float4), `TEXCOORD`.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ScreenVertex {
    pub position: [f32; 4],
    pub tex_coord: [f32; 2],
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    /// Axis-aligned cube with half-extent 1, centered on the origin.
    ///
    /// Each face has its own four vertices so that normals and texture
    /// coordinates stay per face. Triangles are clockwise when seen from
    /// outside, which is the front-face winding of the default rasterizer
    /// state.
    pub fn cube() -> Self {
        #[rustfmt::skip]
        const FACES: [([f32; 3], [([f32; 3], [f32; 2]); 4]); 6] = [
            // top
            ([0., 1., 0.], [
                ([-1., 1., -1.], [1., 0.]), ([1., 1., -1.], [0., 0.]),
                ([1., 1., 1.], [0., 1.]), ([-1., 1., 1.], [1., 1.]),
            ]),
            // bottom
            ([0., -1., 0.], [
                ([-1., -1., -1.], [0., 0.]), ([1., -1., -1.], [1., 0.]),
                ([1., -1., 1.], [1., 1.]), ([-1., -1., 1.], [0., 1.]),
            ]),
            // left
            ([-1., 0., 0.], [
                ([-1., -1., 1.], [0., 1.]), ([-1., -1., -1.], [1., 1.]),
                ([-1., 1., -1.], [1., 0.]), ([-1., 1., 1.], [0., 0.]),
            ]),
            // right
            ([1., 0., 0.], [
                ([1., -1., 1.], [1., 1.]), ([1., -1., -1.], [0., 1.]),
                ([1., 1., -1.], [0., 0.]), ([1., 1., 1.], [1., 0.]),
            ]),
            // front
            ([0., 0., -1.], [
                ([-1., -1., -1.], [0., 1.]), ([1., -1., -1.], [1., 1.]),
                ([1., 1., -1.], [1., 0.]), ([-1., 1., -1.], [0., 0.]),
            ]),
            // back
            ([0., 0., 1.], [
                ([-1., -1., 1.], [1., 1.]), ([1., -1., 1.], [0., 1.]),
                ([1., 1., 1.], [0., 0.]), ([-1., 1., 1.], [1., 0.]),
            ]),
        ];

        #[rustfmt::skip]
        const INDICES: [u16; 36] = [
            3, 1, 0, 2, 1, 3,
            6, 4, 5, 7, 4, 6,
            11, 9, 8, 10, 9, 11,
            14, 12, 13, 15, 12, 14,
            19, 17, 16, 18, 17, 19,
            22, 20, 21, 23, 20, 22,
        ];

        let mut vertices: Vec<Vertex> = FACES
            .iter()
            .flat_map(|(normal, corners)| {
                corners.iter().map(move |(position, uv)| {
                    Vertex::new(Vec3::from(*position), Vec3::from(*normal), Vec2::from(*uv))
                })
            })
            .collect();
        let indices = INDICES.to_vec();

        compute_tangents_shared(&mut vertices, &indices);

        Self { vertices, indices }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Two triangles covering the whole clip rectangle, as a four vertex
/// triangle strip. Texture coordinate (0, 0) is the top-left corner.
pub fn full_screen_quad() -> [ScreenVertex; 4] {
    [
        ScreenVertex { position: [-1.0, 1.0, 0.0, 1.0], tex_coord: [0.0, 0.0] },
        ScreenVertex { position: [1.0, 1.0, 0.0, 1.0], tex_coord: [1.0, 0.0] },
        ScreenVertex { position: [-1.0, -1.0, 0.0, 1.0], tex_coord: [0.0, 1.0] },
        ScreenVertex { position: [1.0, -1.0, 0.0, 1.0], tex_coord: [1.0, 1.0] },
    ]
}

#[cfg(test)]
mod tests {
    use std::mem::size_of;

    use memoffset::offset_of;

    use super::*;

    #[test]
    fn vertex_layout() {
        assert_eq!(size_of::<Vertex>(), 56);
        assert_eq!(offset_of!(Vertex, position), 0);
        assert_eq!(offset_of!(Vertex, normal), 12);
        assert_eq!(offset_of!(Vertex, tex_coord), 24);
        assert_eq!(offset_of!(Vertex, tangent), 32);
        assert_eq!(offset_of!(Vertex, binormal), 44);

        assert_eq!(size_of::<ScreenVertex>(), 24);
        assert_eq!(offset_of!(ScreenVertex, tex_coord), 16);
    }

    #[test]
    fn cube_faces_point_outwards() {
        let cube = MeshData::cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);

        for tri in cube.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| cube.vertices[i as usize]);
            assert_eq!(a.normal, b.normal);
            assert_eq!(a.normal, c.normal);

            let face = (b.position - a.position).cross(c.position - a.position);
            assert!(face.dot(a.normal) > 0.0, "triangle {tri:?} is wound inwards");
        }
    }

    #[test]
    fn cube_has_an_orthonormal_tangent_frame() {
        for v in MeshData::cube().vertices {
            assert!((v.tangent.length() - 1.0).abs() < 1e-5, "{v:?}");
            assert!(v.tangent.dot(v.normal).abs() < 1e-5, "{v:?}");
            assert!((v.binormal - v.normal.cross(v.tangent)).length() < 1e-5, "{v:?}");
        }
    }

    #[test]
    fn quad_strip_covers_the_clip_rectangle() {
        let quad = full_screen_quad();
        let corners: Vec<_> = quad.iter().map(|v| (v.position[0], v.position[1])).collect();
        assert_eq!(corners, vec![(-1.0, 1.0), (1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)]);
        assert_eq!(quad[0].tex_coord, [0.0, 0.0]);
        assert_eq!(quad[3].tex_coord, [1.0, 1.0]);
    }
}
