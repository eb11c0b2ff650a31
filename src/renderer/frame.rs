//! Per-frame draw description.
//!
//! A [`FramePacket`] is a snapshot of everything the GPU needs for one
//! frame, taken from the [`Scene`] after it was updated. The D3D11 renderer
//! only ever reads the packet, never the scene, while recording the passes.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

use crate::resources::{MeshHandle, ShaderHandle, TextureHandle};
use crate::scene::{LightProperties, MaterialProperties, Scene};

/// Constant buffer bound to vertex shader slot `b0`.
///
/// Matrices are stored column-major and the shader multiplies as
/// `mul(M, v)`, so they are uploaded without transposing.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ObjectConstants {
    pub world: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub output_color: Vec4,
}

/// One object to draw in the scene pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    /// Index of the object in [`Scene::objects`].
    pub object: usize,
    pub constants: ObjectConstants,
    pub material: MaterialProperties,
    pub pixel_shader: ShaderHandle,
    pub texture: Option<TextureHandle>,
    pub normal_map: Option<TextureHandle>,
    pub mesh: MeshHandle,
}

/// Everything the scene pass uploads and draws.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePacket {
    /// Uploaded to `b2` once, before the first draw.
    pub lights: LightProperties,
    /// In scene order.
    pub draws: Vec<DrawItem>,
}

impl FramePacket {
    pub fn build(scene: &Scene) -> Self {
        let camera = scene.camera();
        let view = camera.view();
        let projection = camera.projection();

        // The offscreen target is bound for writing during the scene pass,
        // so an object that selected it is drawn untextured.
        let catalog = scene.catalog();
        let sampled =
            |handle: Option<TextureHandle>| handle.filter(|&t| !catalog.is_offscreen(t));

        let draws = scene
            .objects()
            .iter()
            .enumerate()
            .map(|(object, obj)| {
                let texture = sampled(obj.texture());
                let normal_map = sampled(obj.normal_map());

                let mut material = obj.material_properties();
                if texture.is_none() {
                    material.material.use_texture = 0;
                }
                if normal_map.is_none() {
                    material.material.use_normal_map = 0;
                }

                DrawItem {
                    object,
                    constants: ObjectConstants {
                        world: obj.world(),
                        view,
                        projection,
                        output_color: Vec4::ZERO,
                    },
                    material,
                    pixel_shader: obj.pixel_shader,
                    texture,
                    normal_map,
                    mesh: obj.mesh,
                }
            })
            .collect();

        Self { lights: *scene.lights(), draws }
    }
}

/// The passes of a frame, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Objects into the offscreen color target.
    Scene,
    /// Offscreen target onto the back buffer through a full-screen quad.
    Composite,
    /// imgui draw data on top of the back buffer.
    Overlay,
    /// Swap chain present.
    Present,
}

/// How a pass uses the offscreen color target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffscreenUsage {
    Unbound,
    RenderTarget,
    ShaderResource,
}

impl Pass {
    pub const SEQUENCE: [Pass; 4] = [Pass::Scene, Pass::Composite, Pass::Overlay, Pass::Present];

    /// The offscreen target is written only by the scene pass and read only
    /// by the composite pass; it is never both at once.
    pub fn offscreen_usage(self) -> OffscreenUsage {
        match self {
            Pass::Scene => OffscreenUsage::RenderTarget,
            Pass::Composite => OffscreenUsage::ShaderResource,
            Pass::Overlay | Pass::Present => OffscreenUsage::Unbound,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::mem::size_of;

    use memoffset::offset_of;

    use super::*;

    #[test]
    fn object_constants_layout() {
        assert_eq!(size_of::<ObjectConstants>(), 208);
        assert_eq!(offset_of!(ObjectConstants, view), 64);
        assert_eq!(offset_of!(ObjectConstants, projection), 128);
        assert_eq!(offset_of!(ObjectConstants, output_color), 192);
    }

    #[test]
    fn offscreen_target_is_never_read_and_written_in_one_pass() {
        let usages: Vec<_> = Pass::SEQUENCE.iter().map(|p| p.offscreen_usage()).collect();
        assert_eq!(
            usages,
            vec![
                OffscreenUsage::RenderTarget,
                OffscreenUsage::ShaderResource,
                OffscreenUsage::Unbound,
                OffscreenUsage::Unbound,
            ]
        );
    }
}
