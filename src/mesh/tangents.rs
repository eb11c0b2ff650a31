use glam::{Vec2, Vec3};

use super::Vertex;

// Below this magnitude the UV determinant is treated as degenerate.
const DEGENERATE_UV: f32 = 1e-4;

fn uv_factor(duv1: Vec2, duv2: Vec2) -> f32 {
    let det = duv1.x * duv2.y - duv2.x * duv1.y;
    if det.abs() <= DEGENERATE_UV {
        1.0
    } else {
        1.0 / det
    }
}

/// Generate tangents and binormals for an indexed triangle list.
///
/// Per-triangle tangents and binormals are accumulated into every vertex
/// the triangle references. Each tangent is then made orthogonal to the
/// vertex normal and the binormal is rebuilt as `normal × tangent`. Normals
/// are left untouched.
///
/// Triangles referencing vertices out of range are skipped.
pub fn compute_tangents_shared(vertices: &mut [Vertex], indices: &[u16]) {
    for v in vertices.iter_mut() {
        v.tangent = Vec3::ZERO;
        v.binormal = Vec3::ZERO;
    }

    for tri in indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0], tri[1], tri[2]].map(usize::from);
        if i0.max(i1).max(i2) >= vertices.len() {
            continue;
        }
        let (v0, v1, v2) = (vertices[i0], vertices[i1], vertices[i2]);

        let edge1 = v1.position - v0.position;
        let edge2 = v2.position - v0.position;
        let duv1 = v1.tex_coord - v0.tex_coord;
        let duv2 = v2.tex_coord - v0.tex_coord;
        let f = uv_factor(duv1, duv2);

        let tangent = f * (duv2.y * edge1 - duv1.y * edge2);
        let binormal = f * (-duv2.x * edge1 + duv1.x * edge2);

        for i in [i0, i1, i2] {
            vertices[i].tangent += tangent;
            vertices[i].binormal += binormal;
        }
    }

    for v in vertices.iter_mut() {
        let n = v.normal;
        let t = (v.tangent - n * n.dot(v.tangent)).normalize_or_zero();
        v.tangent = if t == Vec3::ZERO { fallback_tangent(n) } else { t };
        v.binormal = n.cross(v.tangent);
    }
}

/// Generate flat normals, tangents and binormals for a non-indexed triangle
/// list.
///
/// Every group of three vertices is one face; all three receive the face's
/// normal, tangent and binormal. A trailing partial face is left as is.
pub fn compute_tangents_unshared(vertices: &mut [Vertex]) {
    for face in vertices.chunks_exact_mut(3) {
        let (v0, v1, v2) = (face[0], face[1], face[2]);

        let p = v1.position - v0.position;
        let q = v2.position - v0.position;
        let duv1 = v1.tex_coord - v0.tex_coord;
        let duv2 = v2.tex_coord - v0.tex_coord;
        let f = uv_factor(duv1, duv2);

        let normal = p.cross(q);
        let tangent = f * (duv2.y * p - duv1.y * q);
        let binormal = tangent.cross(normal);

        let normal = normal.normalize_or_zero();
        let tangent = tangent.normalize_or_zero();
        let binormal = binormal.normalize_or_zero();

        for v in face.iter_mut() {
            v.normal = normal;
            v.tangent = tangent;
            v.binormal = binormal;
        }
    }
}

fn fallback_tangent(normal: Vec3) -> Vec3 {
    match normal.try_normalize() {
        Some(n) => n.any_orthonormal_vector(),
        None => Vec3::X,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> (Vec<Vertex>, Vec<u16>) {
        let n = Vec3::Z;
        let vertices = vec![
            Vertex::new(Vec3::new(0.0, 0.0, 0.0), n, Vec2::new(0.0, 1.0)),
            Vertex::new(Vec3::new(1.0, 0.0, 0.0), n, Vec2::new(1.0, 1.0)),
            Vertex::new(Vec3::new(1.0, 1.0, 0.0), n, Vec2::new(1.0, 0.0)),
            Vertex::new(Vec3::new(0.0, 1.0, 0.0), n, Vec2::new(0.0, 0.0)),
        ];
        (vertices, vec![0, 1, 2, 0, 2, 3])
    }

    #[test]
    fn shared_tangent_follows_u() {
        let (mut vertices, indices) = quad();
        compute_tangents_shared(&mut vertices, &indices);

        for v in &vertices {
            assert!((v.tangent - Vec3::X).length() < 1e-5, "{v:?}");
            assert!((v.binormal - Vec3::Y).length() < 1e-5, "{v:?}");
            assert_eq!(v.normal, Vec3::Z);
        }
    }

    #[test]
    fn degenerate_uvs_do_not_produce_nan() {
        let (mut vertices, indices) = quad();
        for v in &mut vertices {
            v.tex_coord = Vec2::ZERO;
        }
        compute_tangents_shared(&mut vertices, &indices);

        for v in &vertices {
            assert!(v.tangent.is_finite() && v.binormal.is_finite(), "{v:?}");
            assert!((v.tangent.length() - 1.0).abs() < 1e-5);
            assert!(v.tangent.dot(v.normal).abs() < 1e-5);
        }
    }

    #[test]
    fn unshared_writes_one_frame_per_face() {
        let (quad, indices) = quad();
        let mut vertices: Vec<Vertex> = indices.iter().map(|&i| quad[i as usize]).collect();
        for v in &mut vertices {
            v.normal = Vec3::ZERO;
        }
        compute_tangents_unshared(&mut vertices);

        for face in vertices.chunks(3) {
            assert_eq!(face[0].normal, face[1].normal);
            assert_eq!(face[1].tangent, face[2].tangent);
        }
        let v = vertices[0];
        assert!((v.normal - Vec3::Z).length() < 1e-5);
        assert!((v.tangent - Vec3::X).length() < 1e-5);
        // tangent × normal
        assert!((v.binormal - Vec3::NEG_Y).length() < 1e-5);
    }
}
