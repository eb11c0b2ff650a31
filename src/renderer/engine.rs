use std::mem;

use imgui::Context;
use tracing::{debug, info, warn};
use windows::Win32::Graphics::Direct3D::D3D11_PRIMITIVE_TOPOLOGY_TRIANGLELIST;
use windows::Win32::Graphics::Direct3D::D3D11_PRIMITIVE_TOPOLOGY_TRIANGLESTRIP;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::DXGI_FORMAT_R16_UINT;

use super::backend::dx11::ImguiRenderer;
use super::buffers::{immutable_buffer, ConstantBuffer};
use super::frame::{DrawItem, FramePacket, ObjectConstants, Pass};
use super::meshes::{self, MeshRegistry};
use super::shaders::{self, ShaderLibrary};
use super::targets::{self, RenderTargets};
use super::textures::{self, TextureRegistry};
use super::Device;
use crate::config::Config;
use crate::mesh::{full_screen_quad, ScreenVertex, Vertex};
use crate::resources::{Catalog, TextureHandle, OFFSCREEN_TEXTURE};
use crate::scene::{LightProperties, MaterialProperties, Scene};
use crate::timing::FrameStats;
use crate::ui::Inspector;
use crate::Result;


const CLEAR_COLOR: [f32; 4] = [0.01, 0.01, 0.1, 1.0];

/// Owns every GPU resource and records the passes of a frame.
pub struct Renderer {
    device: Device,
    targets: RenderTargets,
    shaders: ShaderLibrary,
    textures: TextureRegistry,
    offscreen_texture: TextureHandle,
    meshes: MeshRegistry,

    object_constants: ConstantBuffer<ObjectConstants>,
    material_constants: ConstantBuffer<MaterialProperties>,
    light_constants: ConstantBuffer<LightProperties>,
    scene_sampler: ID3D11SamplerState,
    depth_state: ID3D11DepthStencilState,

    quad_vertex_buffer: ID3D11Buffer,
    quad_sampler: ID3D11SamplerState,

    imgui: ImguiRenderer,
}

impl Renderer {
    /// Create the render targets, compile the shaders and load every
    /// texture and mesh found in the configured resources folder.
    pub fn new(device: Device, config: &Config, imgui: &mut Context) -> Result<Self> {
        let d3d = &device.device;
        let (width, height) = (config.window_width, config.window_height);

        let targets = RenderTargets::new(d3d, &device.swap_chain, width, height)?;
        let shaders = ShaderLibrary::new(d3d)?;

        let mut textures = textures::load_dir(d3d, &config.resources_dir)?;
        let offscreen_texture = textures.insert(OFFSCREEN_TEXTURE, targets.offscreen_srv.clone());
        let meshes = meshes::load_dir(d3d, &config.resources_dir)?;

        let quad_vertex_buffer = immutable_buffer(d3d, &full_screen_quad(), D3D11_BIND_VERTEX_BUFFER)?;

        let depth_state = targets::depth_state(d3d)?;

        let renderer = Self {
            object_constants: ConstantBuffer::new(d3d)?,
            material_constants: ConstantBuffer::new(d3d)?,
            light_constants: ConstantBuffer::new(d3d)?,
            scene_sampler: shaders::scene_sampler(d3d)?,
            quad_sampler: shaders::quad_sampler(d3d)?,
            imgui: ImguiRenderer::new(d3d, imgui)?,
            depth_state,
            quad_vertex_buffer,
            targets,
            shaders,
            textures,
            offscreen_texture,
            meshes,
            device,
        };

        info!(
            "Renderer ready: {} pixel shaders, {} textures, {} meshes",
            renderer.shaders.pixel_shaders.len(),
            renderer.textures.len(),
            renderer.meshes.len()
        );

        Ok(renderer)
    }

    /// Names of the loaded resources, indexed like the renderer's registries.
    pub fn catalog(&self) -> Catalog {
        Catalog {
            shaders: self.shaders.pixel_shaders.names(),
            textures: self.textures.names(),
            meshes: self.meshes.names(),
        }
    }

    /// Build the inspector for this frame and run every pass.
    pub fn render_frame(
        &mut self,
        scene: &mut Scene,
        imgui: &mut Context,
        inspector: &mut Inspector,
        stats: &FrameStats,
    ) -> Result<()> {
        let ui = imgui.new_frame();
        inspector.draw(ui, scene, stats);
        let draw_data = imgui.render();

        let packet = FramePacket::build(scene);

        for pass in Pass::SEQUENCE {
            match pass {
                Pass::Scene => self.scene_pass(&packet),
                Pass::Composite => self.composite_pass(),
                Pass::Overlay => self.imgui.render(draw_data)?,
                Pass::Present => self.present(inspector.vsync)?,
            }
        }

        Ok(())
    }

    fn scene_pass(&self, packet: &FramePacket) {
        let ctx = &self.device.context;
        let targets = &self.targets;

        unsafe {
            ctx.OMSetRenderTargets(Some(&[Some(targets.offscreen.clone())]), &targets.depth);
            ctx.ClearRenderTargetView(&targets.offscreen, CLEAR_COLOR.as_ptr());
            ctx.ClearDepthStencilView(
                &targets.depth,
                (D3D11_CLEAR_DEPTH.0 | D3D11_CLEAR_STENCIL.0) as u32,
                1.0,
                0,
            );
            // The overlay of the previous frame leaves blending and scissoring on.
            ctx.OMSetBlendState(None::<&ID3D11BlendState>, None, u32::MAX);
            ctx.RSSetState(None::<&ID3D11RasterizerState>);
            ctx.OMSetDepthStencilState(&self.depth_state, 0);
            ctx.RSSetViewports(Some(&[targets.viewport]));

            ctx.IASetInputLayout(&self.shaders.input_layout);
            ctx.IASetPrimitiveTopology(D3D11_PRIMITIVE_TOPOLOGY_TRIANGLELIST);
            ctx.VSSetShader(&self.shaders.vertex_shader, None);
            ctx.PSSetSamplers(0, Some(&[Some(self.scene_sampler.clone())]));

            self.light_constants.update(ctx, &packet.lights);
            ctx.PSSetConstantBuffers(2, Some(&self.light_constants.slot()));
        }

        for item in &packet.draws {
            self.draw_item(item);
        }
    }

    fn draw_item(&self, item: &DrawItem) {
        let ctx = &self.device.context;

        let Some(mesh) = self.meshes.get(item.mesh) else {
            warn!("Object {} refers to a missing mesh {:?}", item.object, item.mesh);
            return;
        };
        let Some(pixel_shader) = self.shaders.pixel_shaders.get(item.pixel_shader) else {
            warn!("Object {} refers to a missing pixel shader {:?}", item.object, item.pixel_shader);
            return;
        };

        let bindable = |handle: Option<TextureHandle>| {
            handle.filter(|&t| t != self.offscreen_texture).and_then(|t| self.textures.get(t)).cloned()
        };
        let texture = bindable(item.texture);
        let normal_map = bindable(item.normal_map);

        unsafe {
            ctx.PSSetShader(pixel_shader, None);

            self.object_constants.update(ctx, &item.constants);
            ctx.VSSetConstantBuffers(0, Some(&self.object_constants.slot()));
            ctx.PSSetConstantBuffers(0, Some(&self.object_constants.slot()));

            self.material_constants.update(ctx, &item.material);
            ctx.PSSetConstantBuffers(1, Some(&self.material_constants.slot()));

            ctx.IASetVertexBuffers(
                0,
                1,
                Some(&Some(mesh.vertex_buffer.clone())),
                Some(&(mem::size_of::<Vertex>() as u32)),
                Some(&0),
            );
            ctx.IASetIndexBuffer(&mesh.index_buffer, DXGI_FORMAT_R16_UINT, 0);

            ctx.PSSetShaderResources(0, Some(&[texture, normal_map]));
            ctx.DrawIndexed(mesh.index_count, 0, 0);
            ctx.PSSetShaderResources(0, Some(&[None, None]));
        }
    }

    fn composite_pass(&self) {
        let ctx = &self.device.context;
        let targets = &self.targets;

        unsafe {
            ctx.OMSetRenderTargets(Some(&[Some(targets.back_buffer.clone())]), &targets.depth);
            ctx.ClearRenderTargetView(&targets.back_buffer, CLEAR_COLOR.as_ptr());
            ctx.ClearDepthStencilView(&targets.depth, D3D11_CLEAR_DEPTH.0 as u32, 1.0, 0);
            ctx.RSSetViewports(Some(&[targets.viewport]));

            ctx.IASetInputLayout(&self.shaders.quad_input_layout);
            ctx.IASetPrimitiveTopology(D3D11_PRIMITIVE_TOPOLOGY_TRIANGLESTRIP);
            ctx.IASetVertexBuffers(
                0,
                1,
                Some(&Some(self.quad_vertex_buffer.clone())),
                Some(&(mem::size_of::<ScreenVertex>() as u32)),
                Some(&0),
            );
            ctx.VSSetShader(&self.shaders.quad_vertex_shader, None);
            ctx.PSSetShader(&self.shaders.quad_pixel_shader, None);
            ctx.PSSetShaderResources(0, Some(&[Some(targets.offscreen_srv.clone())]));
            ctx.PSSetSamplers(0, Some(&[Some(self.quad_sampler.clone())]));

            ctx.Draw(4, 0);

            ctx.PSSetShaderResources(0, Some(&[None]));
        }
    }

    fn present(&self, vsync: bool) -> Result<()> {
        let sync_interval = u32::from(vsync);
        unsafe { self.device.swap_chain.Present(sync_interval, 0) }.ok()?;
        Ok(())
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        debug!("Releasing renderer");
        unsafe {
            self.device.context.ClearState();
            self.device.context.Flush();
        }
    }
}
