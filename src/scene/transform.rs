use glam::{EulerRot, Mat4, Quat, Vec3};

/// Position, Euler rotation and scale of a scene object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Rotation around X, Y and Z, in degrees.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self { position: Vec3::ZERO, rotation: Vec3::ZERO, scale: Vec3::ONE }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Default::default() }
    }

    fn orientation(&self) -> Quat {
        let r = self.rotation;
        Quat::from_euler(
            EulerRot::ZYX,
            r.z.to_radians(),
            r.y.to_radians(),
            r.x.to_radians(),
        )
    }

    /// World matrix: scale, then rotate around X, Y and Z in that order,
    /// then translate.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation(), self.position)
    }

    /// Decompose an affine matrix back into a transform.
    ///
    /// The Y rotation comes back in -90..=90 degrees; other angles cover the
    /// full circle.
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, position) = matrix.to_scale_rotation_translation();
        let (z, y, x) = rotation.to_euler(EulerRot::ZYX);
        Self {
            position,
            rotation: Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees()),
            scale,
        }
    }

    /// Reset any rotation component beyond a full turn back to 0.
    pub fn wrap_rotation(&mut self) {
        for angle in [&mut self.rotation.x, &mut self.rotation.y, &mut self.rotation.z] {
            if angle.abs() > 360.0 {
                *angle = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-3
    }

    #[test]
    fn matrix_applies_scale_rotation_translation() {
        let t = Transform {
            position: Vec3::new(2.0, 0.0, 0.0),
            rotation: Vec3::new(0.0, 90.0, 0.0),
            scale: Vec3::splat(2.0),
        };
        // (1,0,0) -> scaled (2,0,0) -> rotated about +Y to (0,0,-2) -> moved.
        let p = t.matrix().transform_point3(Vec3::X);
        assert!(approx(p, Vec3::new(2.0, 0.0, -2.0)), "{p}");
    }

    #[test]
    fn rotation_order_is_x_then_y_then_z() {
        let t = Transform { rotation: Vec3::new(90.0, 90.0, 0.0), ..Default::default() };
        let expected = Mat4::from_rotation_y(90f32.to_radians())
            * Mat4::from_rotation_x(90f32.to_radians());
        assert!(t.matrix().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn decomposition_recovers_the_transform() {
        let t = Transform {
            position: Vec3::new(1.0, -2.0, 3.0),
            rotation: Vec3::new(30.0, -45.0, 120.0),
            scale: Vec3::new(1.0, 2.0, 0.5),
        };
        let back = Transform::from_matrix(t.matrix());
        assert!(approx(back.position, t.position));
        assert!(approx(back.rotation, t.rotation), "{:?}", back.rotation);
        assert!(approx(back.scale, t.scale));
    }

    #[test]
    fn wrap_resets_only_components_beyond_a_turn() {
        let mut t = Transform { rotation: Vec3::new(361.0, -360.0, -400.0), ..Default::default() };
        t.wrap_rotation();
        assert_eq!(t.rotation, Vec3::new(0.0, -360.0, 0.0));
    }
}
