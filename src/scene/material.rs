use bytemuck::{Pod, Zeroable};
use glam::Vec4;

/// Surface parameters read by the pixel shaders.
///
/// Layout matches the `_Material` struct in the shader: four colors, then
/// one register holding the specular power and the two feature flags.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Material {
    pub emissive: Vec4,
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub specular_power: f32,
    pub use_texture: i32,
    pub use_normal_map: i32,
    pub padding: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            emissive: Vec4::new(0.0, 0.0, 0.0, 1.0),
            ambient: Vec4::new(0.1, 0.1, 0.1, 1.0),
            diffuse: Vec4::ONE,
            specular: Vec4::ONE,
            specular_power: 128.0,
            use_texture: 0,
            use_normal_map: 0,
            padding: 0.0,
        }
    }
}

impl Material {
    /// Starting material of scene objects: the default with a dim specular.
    pub fn object_default() -> Self {
        Self { specular: Vec4::new(0.2, 0.2, 0.2, 1.0), ..Default::default() }
    }

    pub fn uses_texture(&self) -> bool {
        self.use_texture != 0
    }

    pub fn uses_normal_map(&self) -> bool {
        self.use_normal_map != 0
    }
}

/// Constant buffer bound to pixel shader slot `b1`.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MaterialProperties {
    pub material: Material,
}

#[cfg(test)]
mod tests {
    use std::mem::size_of;

    use memoffset::offset_of;

    use super::*;

    #[test]
    fn layout() {
        assert_eq!(size_of::<Material>(), 80);
        assert_eq!(size_of::<MaterialProperties>(), 80);
        assert_eq!(offset_of!(Material, specular), 48);
        assert_eq!(offset_of!(Material, specular_power), 64);
        assert_eq!(offset_of!(Material, use_texture), 68);
        assert_eq!(offset_of!(Material, use_normal_map), 72);
    }

    #[test]
    fn object_default_dims_specular() {
        let m = Material::object_default();
        assert_eq!(m.specular, Vec4::new(0.2, 0.2, 0.2, 1.0));
        assert_eq!(m.specular_power, 128.0);
        assert!(!m.uses_texture());
        assert!(!m.uses_normal_map());
    }
}
