use std::f32::consts::FRAC_PI_2;

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

use crate::{Error, Result};

/// Number of light slots in [`LightProperties`]. The shader declares the
/// same array size.
pub const MAX_LIGHTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum LightType {
    Directional = 0,
    Point = 1,
    Spot = 2,
}

impl LightType {
    pub const ALL: [LightType; 3] = [LightType::Directional, LightType::Point, LightType::Spot];

    pub fn name(self) -> &'static str {
        match self {
            LightType::Directional => "Directional",
            LightType::Point => "Point",
            LightType::Spot => "Spot",
        }
    }
}

impl TryFrom<i32> for LightType {
    type Error = i32;

    fn try_from(value: i32) -> std::result::Result<Self, i32> {
        match value {
            0 => Ok(LightType::Directional),
            1 => Ok(LightType::Point),
            2 => Ok(LightType::Spot),
            other => Err(other),
        }
    }
}

/// One entry of the shader light array.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Light {
    pub position: Vec4,
    pub direction: Vec4,
    pub color: Vec4,
    /// Cone angle of spot lights, in radians.
    pub spot_angle: f32,
    pub constant_attenuation: f32,
    pub linear_attenuation: f32,
    pub quadratic_attenuation: f32,
    pub light_type: i32,
    pub enabled: i32,
    pub padding: [i32; 2],
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec4::new(0.0, 0.0, 0.0, 1.0),
            direction: Vec4::new(0.0, 0.0, 1.0, 0.0),
            color: Vec4::ONE,
            spot_angle: FRAC_PI_2,
            constant_attenuation: 1.0,
            linear_attenuation: 0.0,
            quadratic_attenuation: 0.0,
            light_type: LightType::Directional as i32,
            enabled: 0,
            padding: [0; 2],
        }
    }
}

impl Light {
    pub fn is_enabled(&self) -> bool {
        self.enabled != 0
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled as i32;
    }

    /// Light type, or `None` if the raw value is not a known type.
    pub fn kind(&self) -> Option<LightType> {
        LightType::try_from(self.light_type).ok()
    }

    pub fn set_kind(&mut self, kind: LightType) {
        self.light_type = kind as i32;
    }
}

/// Constant buffer bound to pixel shader slot `b2`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LightProperties {
    pub eye_position: Vec4,
    pub global_ambient: Vec4,
    pub lights: [Light; MAX_LIGHTS],
    pub light_count: i32,
    pub padding: [f32; 3],
}

impl Default for LightProperties {
    fn default() -> Self {
        Self {
            eye_position: Vec4::new(0.0, 0.0, 0.0, 1.0),
            global_ambient: Vec4::new(0.2, 0.2, 0.8, 1.0),
            lights: [Light::default(); MAX_LIGHTS],
            light_count: 0,
            padding: [0.0; 3],
        }
    }
}

impl LightProperties {
    /// The lighting the sandbox starts with: every slot an enabled cyan
    /// point light in front of the first cube, except slot 1, which is a
    /// magenta light next to the second cube.
    pub fn scene_default() -> Self {
        let mut props = Self::default();

        for (i, light) in props.lights.iter_mut().enumerate() {
            *light = Light {
                enabled: 1,
                light_type: LightType::Point as i32,
                color: Vec4::new(0.0, 0.765, 1.0, 1.0),
                spot_angle: 45f32.to_radians(),
                constant_attenuation: 1.0,
                linear_attenuation: 1.0,
                quadratic_attenuation: 1.0,
                position: Vec4::new(0.0, 0.0, 1.2, 1.0),
                ..Default::default()
            };

            if i == 1 {
                light.color = Vec4::new(1.0, 0.0, 0.559, 1.0);
                light.position = Vec4::new(3.0, 0.0, 1.5, 1.0);
            }
        }

        props.light_count = MAX_LIGHTS as i32;
        props
    }

    /// Replace the light in slot `index`.
    pub fn update_light(&mut self, index: usize, light: Light) -> Result<()> {
        let slot = self
            .lights
            .get_mut(index)
            .ok_or(Error::LightIndex { index, capacity: MAX_LIGHTS })?;
        *slot = light;
        Ok(())
    }

    pub fn light(&self, index: usize) -> Option<&Light> {
        self.lights.get(index)
    }

    pub fn light_mut(&mut self, index: usize) -> Option<&mut Light> {
        self.lights.get_mut(index)
    }

    pub fn set_eye_position(&mut self, eye: Vec3) {
        self.eye_position = eye.extend(1.0);
    }
}
