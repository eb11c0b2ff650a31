use glam::{Mat4, Vec3};

use super::material::{Material, MaterialProperties};
use super::transform::Transform;
use crate::resources::{MeshHandle, ShaderHandle, TextureHandle};

/// Default auto-rotation speed, in degrees per second.
pub const AUTO_ROTATION_SPEED: f32 = 50.0;

/// A drawable object of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct GameObject {
    name: String,
    pub transform: Transform,
    original_transform: Transform,
    world: Mat4,

    pub auto_rotate_x: bool,
    pub auto_rotate_y: bool,
    pub auto_rotate_z: bool,
    /// Degrees per second around each enabled axis.
    pub auto_rotation_speed: f32,

    pub material: Material,
    original_material: Material,

    pub pixel_shader: ShaderHandle,
    texture: Option<TextureHandle>,
    normal_map: Option<TextureHandle>,
    pub mesh: MeshHandle,
}

impl GameObject {
    pub fn new(
        name: impl Into<String>,
        transform: Transform,
        mesh: MeshHandle,
        pixel_shader: ShaderHandle,
    ) -> Self {
        let material = Material::object_default();
        Self {
            name: name.into(),
            transform,
            original_transform: transform,
            world: transform.matrix(),
            auto_rotate_x: false,
            auto_rotate_y: false,
            auto_rotate_z: false,
            auto_rotation_speed: AUTO_ROTATION_SPEED,
            material,
            original_material: material,
            pixel_shader,
            texture: None,
            normal_map: None,
            mesh,
        }
    }

    /// Bind the starting texture and normal map. The material flags set
    /// here become part of the material that [`GameObject::reset_material`]
    /// goes back to.
    pub fn with_textures(
        mut self,
        texture: Option<TextureHandle>,
        normal_map: Option<TextureHandle>,
    ) -> Self {
        self.set_texture(texture);
        self.set_normal_map(normal_map);
        self.original_material = self.material;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// World matrix as of the last [`GameObject::update`] or transform change.
    pub fn world(&self) -> Mat4 {
        self.world
    }

    pub fn material_properties(&self) -> MaterialProperties {
        MaterialProperties { material: self.material }
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    pub fn normal_map(&self) -> Option<TextureHandle> {
        self.normal_map
    }

    pub fn set_texture(&mut self, texture: Option<TextureHandle>) {
        self.texture = texture;
        self.material.use_texture = texture.is_some() as i32;
    }

    pub fn set_normal_map(&mut self, normal_map: Option<TextureHandle>) {
        self.normal_map = normal_map;
        self.material.use_normal_map = normal_map.is_some() as i32;
    }

    /// Advance auto-rotation by `dt` seconds and rebuild the world matrix.
    ///
    /// Angles beyond a full turn are reset before the new rotation is added.
    pub fn update(&mut self, dt: f32) {
        self.transform.wrap_rotation();

        let step = self.auto_rotation_speed * dt;
        let axes = Vec3::new(
            self.auto_rotate_x as u8 as f32,
            self.auto_rotate_y as u8 as f32,
            self.auto_rotate_z as u8 as f32,
        );
        self.transform.rotation += axes * step;

        self.world = self.transform.matrix();
    }

    /// Change the transform in place and rebuild the world matrix, so the
    /// edit is visible in the frame being built.
    pub fn edit_transform(&mut self, edit: impl FnOnce(&mut Transform)) {
        edit(&mut self.transform);
        self.world = self.transform.matrix();
    }

    /// Replace the transform with the decomposition of `matrix`.
    pub fn set_transform(&mut self, matrix: Mat4) {
        self.transform = Transform::from_matrix(matrix);
        self.world = self.transform.matrix();
    }

    pub fn reset_transform(&mut self) {
        self.transform = self.original_transform;
        self.world = self.transform.matrix();
    }

    pub fn reset_material(&mut self) {
        self.material = self.original_material;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Handle;

    fn cube() -> GameObject {
        GameObject::new(
            "Cube",
            Transform::from_position(Vec3::new(2.0, 0.0, 0.0)),
            Handle::new(0),
            Handle::new(0),
        )
    }

    #[test]
    fn auto_rotation_advances_enabled_axes() {
        let mut obj = cube();
        obj.auto_rotate_y = true;
        obj.update(0.5);
        assert_eq!(obj.transform.rotation, Vec3::new(0.0, 25.0, 0.0));
        assert!(obj.world().abs_diff_eq(obj.transform.matrix(), 1e-6));
    }

    #[test]
    fn rotation_wraps_before_auto_rotation() {
        let mut obj = cube();
        obj.auto_rotate_x = true;
        obj.transform.rotation.x = 361.0;
        obj.update(0.1);
        assert!((obj.transform.rotation.x - 5.0).abs() < 1e-5);
    }

    #[test]
    fn texture_flags_track_bindings() {
        let mut obj = cube().with_textures(Some(Handle::new(1)), None);
        assert!(obj.material.uses_texture());
        assert!(!obj.material.uses_normal_map());

        obj.set_normal_map(Some(Handle::new(2)));
        assert!(obj.material.uses_normal_map());
        obj.set_texture(None);
        assert!(!obj.material.uses_texture());
    }

    #[test]
    fn resets_restore_the_originals() {
        let mut obj = cube().with_textures(Some(Handle::new(1)), Some(Handle::new(2)));
        obj.transform.position = Vec3::ONE;
        obj.transform.scale = Vec3::splat(3.0);
        obj.material.diffuse = glam::Vec4::ZERO;
        obj.material.use_texture = 0;

        obj.reset_transform();
        obj.reset_material();

        assert_eq!(obj.transform, Transform::from_position(Vec3::new(2.0, 0.0, 0.0)));
        assert!(obj.material.uses_texture());
        assert!(obj.material.uses_normal_map());
        assert_eq!(obj.material.diffuse, glam::Vec4::ONE);
    }

    #[test]
    fn transform_edits_update_the_world_matrix_immediately() {
        let mut obj = cube();
        obj.edit_transform(|t| {
            t.position = Vec3::new(0.0, 3.0, 0.0);
            t.scale = Vec3::splat(0.5);
        });

        let expected = Transform {
            position: Vec3::new(0.0, 3.0, 0.0),
            scale: Vec3::splat(0.5),
            ..Transform::default()
        };
        assert_eq!(obj.transform, expected);
        assert!(obj.world().abs_diff_eq(expected.matrix(), 1e-6));
    }

    #[test]
    fn set_transform_decomposes() {
        let mut obj = cube();
        let m = Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)) * Mat4::from_scale(Vec3::splat(2.0));
        obj.set_transform(m);
        assert!((obj.transform.position - Vec3::Y).length() < 1e-5);
        assert!((obj.transform.scale - Vec3::splat(2.0)).length() < 1e-5);
        assert!(obj.world().abs_diff_eq(m, 1e-5));
    }
}
