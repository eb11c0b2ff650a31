//! Direct3D 11 renderer for imgui draw data.
//!
//! The overlay is the last pass before present and leaves its own state
//! bound; the scene pass of the next frame resets what it depends on.

use std::marker::PhantomData;
use std::{mem, ptr};

use glam::Mat4;
use imgui::internal::RawWrapper;
use imgui::{BackendFlags, Context, DrawCmd, DrawData, DrawIdx, DrawVert, TextureId};
use memoffset::offset_of;
use tracing::{debug, warn};
use windows::core::{s, Result};
use windows::Win32::Foundation::RECT;
use windows::Win32::Graphics::Direct3D::D3D11_PRIMITIVE_TOPOLOGY_TRIANGLELIST;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::*;

use crate::renderer::buffers::ConstantBuffer;
use crate::renderer::{shaders, textures};
use crate::util;

const OVERLAY_SRC: &str = r"
cbuffer Projection : register(b0) {
  float4x4 projection;
};

struct VS_INPUT {
  float2 pos : POSITION;
  float4 col : COLOR0;
  float2 uv  : TEXCOORD0;
};

struct PS_INPUT {
  float4 pos : SV_POSITION;
  float4 col : COLOR0;
  float2 uv  : TEXCOORD0;
};

Texture2D atlas : register(t0);
SamplerState atlasSampler : register(s0);

PS_INPUT OverlayVS(VS_INPUT input) {
  PS_INPUT output;
  output.pos = mul(projection, float4(input.pos, 0.0f, 1.0f));
  output.col = input.col;
  output.uv = input.uv;
  return output;
}

float4 OverlayPS(PS_INPUT input) : SV_Target {
  return input.col * atlas.Sample(atlasSampler, input.uv);
}
";

// Extra room allocated whenever a vertex or index buffer has to grow.
const VERTEX_HEADROOM: usize = 5000;
const INDEX_HEADROOM: usize = 10000;

/// Draws the imgui overlay into whatever render target is bound.
pub struct ImguiRenderer {
    device: ID3D11Device,
    context: ID3D11DeviceContext,

    states: OverlayStates,
    textures: Vec<ID3D11ShaderResourceView>,

    vertices: DynamicBuffer<DrawVert>,
    indices: DynamicBuffer<DrawIdx>,
    projection: ConstantBuffer<Mat4>,
}

impl ImguiRenderer {
    pub fn new(device: &ID3D11Device, ctx: &mut Context) -> Result<Self> {
        let context = unsafe { device.GetImmediateContext() }?;

        ctx.set_ini_filename(None);
        ctx.io_mut().backend_flags |= BackendFlags::RENDERER_HAS_VTX_OFFSET;
        ctx.set_renderer_name(String::from(concat!("framework-dx11@", env!("CARGO_PKG_VERSION"))));

        let mut renderer = Self {
            states: OverlayStates::new(device)?,
            textures: Vec::new(),
            vertices: DynamicBuffer::new(device, VERTEX_HEADROOM, D3D11_BIND_VERTEX_BUFFER)?,
            indices: DynamicBuffer::new(device, INDEX_HEADROOM, D3D11_BIND_INDEX_BUFFER)?,
            projection: ConstantBuffer::new(device)?,
            device: device.clone(),
            context,
        };

        let fonts = ctx.fonts();
        let atlas = fonts.build_rgba32_texture();
        let (data, width, height) = (atlas.data.to_vec(), atlas.width, atlas.height);
        fonts.tex_id = renderer.load_texture(&data, width, height)?;
        debug!("Font atlas uploaded ({width}x{height})");

        Ok(renderer)
    }

    /// Upload an RGBA8 image that imgui widgets can refer to.
    pub fn load_texture(&mut self, data: &[u8], width: u32, height: u32) -> Result<TextureId> {
        self.textures.push(textures::create_rgba8(&self.device, data, width, height)?);
        Ok(TextureId::from(self.textures.len() - 1))
    }

    /// Draw `draw_data` into the currently bound render target.
    pub fn render(&mut self, draw_data: &DrawData) -> Result<()> {
        let [w, h] = draw_data.display_size;
        if w <= 0.0 || h <= 0.0 || draw_data.total_vtx_count <= 0 {
            return Ok(());
        }

        let vertex_count = draw_data.total_vtx_count as usize;
        let index_count = draw_data.total_idx_count as usize;
        self.vertices.reserve(&self.device, vertex_count, VERTEX_HEADROOM)?;
        self.indices.reserve(&self.device, index_count, INDEX_HEADROOM)?;

        unsafe {
            self.vertices.write(&self.context, draw_data.draw_lists().map(|l| l.vtx_buffer()))?;
            self.indices.write(&self.context, draw_data.draw_lists().map(|l| l.idx_buffer()))?;
            let projection = projection(draw_data.display_pos, draw_data.display_size);
            self.projection.update(&self.context, &projection);

            self.bind_state(draw_data);
            self.draw_lists(draw_data);
        }

        Ok(())
    }

    unsafe fn draw_lists(&self, draw_data: &DrawData) {
        let ctx = &self.context;
        let [x, y] = draw_data.display_pos;

        let mut vtx_base = 0usize;
        let mut idx_base = 0usize;

        for list in draw_data.draw_lists() {
            for cmd in list.commands() {
                match cmd {
                    DrawCmd::Elements { count, cmd_params } => {
                        let [left, top, right, bottom] = cmd_params.clip_rect;
                        let clip = RECT {
                            left: (left - x) as i32,
                            top: (top - y) as i32,
                            right: (right - x) as i32,
                            bottom: (bottom - y) as i32,
                        };
                        if clip.right <= clip.left || clip.bottom <= clip.top {
                            continue;
                        }

                        let Some(srv) = self.textures.get(cmd_params.texture_id.id()) else {
                            warn!("Unknown imgui texture {:?}", cmd_params.texture_id);
                            continue;
                        };

                        ctx.PSSetShaderResources(0, Some(&[Some(srv.clone())]));
                        ctx.RSSetScissorRects(Some(&[clip]));
                        ctx.DrawIndexed(
                            count as u32,
                            (idx_base + cmd_params.idx_offset) as u32,
                            (vtx_base + cmd_params.vtx_offset) as i32,
                        );
                    },
                    DrawCmd::ResetRenderState => self.bind_state(draw_data),
                    DrawCmd::RawCallback { callback, raw_cmd } => callback(list.raw(), raw_cmd),
                }
            }
            idx_base += list.idx_buffer().len();
            vtx_base += list.vtx_buffer().len();
        }

        ctx.PSSetShaderResources(0, Some(&[None]));
    }

    unsafe fn bind_state(&self, draw_data: &DrawData) {
        let ctx = &self.context;
        let states = &self.states;

        ctx.RSSetViewports(Some(&[D3D11_VIEWPORT {
            TopLeftX: 0.,
            TopLeftY: 0.,
            Width: draw_data.display_size[0],
            Height: draw_data.display_size[1],
            MinDepth: 0.,
            MaxDepth: 1.,
        }]));
        ctx.RSSetState(&states.rasterizer);
        ctx.OMSetBlendState(&states.blend, Some(&[0.; 4]), u32::MAX);
        ctx.OMSetDepthStencilState(&states.depth, 0);

        ctx.IASetInputLayout(&states.input_layout);
        ctx.IASetPrimitiveTopology(D3D11_PRIMITIVE_TOPOLOGY_TRIANGLELIST);
        ctx.IASetVertexBuffers(
            0,
            1,
            Some(&Some(self.vertices.resource.clone())),
            Some(&(mem::size_of::<DrawVert>() as u32)),
            Some(&0),
        );
        ctx.IASetIndexBuffer(&self.indices.resource, DXGI_FORMAT_R16_UINT, 0);

        ctx.VSSetShader(&states.vertex_shader, None);
        ctx.VSSetConstantBuffers(0, Some(&self.projection.slot()));
        ctx.PSSetShader(&states.pixel_shader, None);
        ctx.PSSetSamplers(0, Some(&[Some(states.sampler.clone())]));
    }
}

/// Orthographic projection of imgui's display rectangle, y pointing down.
fn projection([left, top]: [f32; 2], [width, height]: [f32; 2]) -> Mat4 {
    Mat4::orthographic_lh(left, left + width, top + height, top, 0.0, 1.0)
}

// Shaders and fixed-function state of the overlay pass.
struct OverlayStates {
    vertex_shader: ID3D11VertexShader,
    pixel_shader: ID3D11PixelShader,
    input_layout: ID3D11InputLayout,
    sampler: ID3D11SamplerState,
    blend: ID3D11BlendState,
    rasterizer: ID3D11RasterizerState,
    depth: ID3D11DepthStencilState,
}

impl OverlayStates {
    fn new(device: &ID3D11Device) -> Result<Self> {
        let file_name = s!("overlay.hlsl");
        let vs_blob = shaders::compile_source(
            OVERLAY_SRC,
            file_name,
            s!("OverlayVS"),
            s!("vs_4_0"),
            "Compiling overlay vertex shader",
        )?;
        let ps_blob = shaders::compile_source(
            OVERLAY_SRC,
            file_name,
            s!("OverlayPS"),
            s!("ps_4_0"),
            "Compiling overlay pixel shader",
        )?;

        let layout = [
            shaders::element(s!("POSITION"), DXGI_FORMAT_R32G32_FLOAT, offset_of!(DrawVert, pos)),
            shaders::element(s!("COLOR"), DXGI_FORMAT_R8G8B8A8_UNORM, offset_of!(DrawVert, col)),
            shaders::element(s!("TEXCOORD"), DXGI_FORMAT_R32G32_FLOAT, offset_of!(DrawVert, uv)),
        ];

        // Straight alpha over the composited scene.
        let blend_target = D3D11_RENDER_TARGET_BLEND_DESC {
            BlendEnable: true.into(),
            SrcBlend: D3D11_BLEND_SRC_ALPHA,
            DestBlend: D3D11_BLEND_INV_SRC_ALPHA,
            BlendOp: D3D11_BLEND_OP_ADD,
            SrcBlendAlpha: D3D11_BLEND_ONE,
            DestBlendAlpha: D3D11_BLEND_INV_SRC_ALPHA,
            BlendOpAlpha: D3D11_BLEND_OP_ADD,
            RenderTargetWriteMask: D3D11_COLOR_WRITE_ENABLE_ALL.0 as u8,
        };
        let blend = util::try_out_ptr(|v| unsafe {
            device.CreateBlendState(
                &D3D11_BLEND_DESC {
                    AlphaToCoverageEnable: false.into(),
                    IndependentBlendEnable: false.into(),
                    RenderTarget: [blend_target; 8],
                },
                Some(v),
            )
        })?;

        let rasterizer = util::try_out_ptr(|v| unsafe {
            device.CreateRasterizerState(
                &D3D11_RASTERIZER_DESC {
                    FillMode: D3D11_FILL_SOLID,
                    CullMode: D3D11_CULL_NONE,
                    ScissorEnable: true.into(),
                    DepthClipEnable: true.into(),
                    ..Default::default()
                },
                Some(v),
            )
        })?;

        // The overlay ignores the depth buffer left by the scene.
        let depth = util::try_out_ptr(|v| unsafe {
            device.CreateDepthStencilState(
                &D3D11_DEPTH_STENCIL_DESC {
                    DepthEnable: false.into(),
                    DepthWriteMask: D3D11_DEPTH_WRITE_MASK_ZERO,
                    DepthFunc: D3D11_COMPARISON_ALWAYS,
                    StencilEnable: false.into(),
                    ..Default::default()
                },
                Some(v),
            )
        })?;

        Ok(Self {
            vertex_shader: shaders::create_vertex_shader(device, &vs_blob)?,
            pixel_shader: shaders::create_pixel_shader(device, &ps_blob)?,
            input_layout: shaders::create_input_layout(device, &vs_blob, &layout)?,
            sampler: shaders::scene_sampler(device)?,
            blend,
            rasterizer,
            depth,
        })
    }
}

/// A CPU-writable buffer of `T`, recreated larger when a frame outgrows it.
struct DynamicBuffer<T: Copy> {
    bind_flag: D3D11_BIND_FLAG,
    resource: ID3D11Buffer,
    capacity: usize,
    _data: PhantomData<T>,
}

impl<T: Copy> DynamicBuffer<T> {
    fn new(device: &ID3D11Device, capacity: usize, bind_flag: D3D11_BIND_FLAG) -> Result<Self> {
        let resource = Self::create(device, capacity, bind_flag)?;
        Ok(Self { bind_flag, resource, capacity, _data: PhantomData })
    }

    fn create(
        device: &ID3D11Device,
        capacity: usize,
        bind_flag: D3D11_BIND_FLAG,
    ) -> Result<ID3D11Buffer> {
        util::try_out_ptr(|v| unsafe {
            device.CreateBuffer(
                &D3D11_BUFFER_DESC {
                    ByteWidth: (capacity * mem::size_of::<T>()) as u32,
                    Usage: D3D11_USAGE_DYNAMIC,
                    BindFlags: bind_flag.0 as u32,
                    CPUAccessFlags: D3D11_CPU_ACCESS_WRITE.0 as u32,
                    MiscFlags: 0,
                    StructureByteStride: 0,
                },
                None,
                Some(v),
            )
        })
    }

    /// Make room for `len` elements, with `headroom` to spare if it grows.
    fn reserve(&mut self, device: &ID3D11Device, len: usize, headroom: usize) -> Result<()> {
        if len > self.capacity {
            let capacity = len + headroom;
            self.resource = Self::create(device, capacity, self.bind_flag)?;
            self.capacity = capacity;
            debug!("Overlay buffer grown to {capacity} elements");
        }
        Ok(())
    }

    /// Replace the contents with `chunks`, back to back. The total length
    /// must fit the capacity set by [`DynamicBuffer::reserve`].
    unsafe fn write<'a>(
        &self,
        ctx: &ID3D11DeviceContext,
        chunks: impl Iterator<Item = &'a [T]>,
    ) -> Result<()>
    where
        T: 'a,
    {
        let mut mapped = D3D11_MAPPED_SUBRESOURCE::default();
        ctx.Map(&self.resource, 0, D3D11_MAP_WRITE_DISCARD, 0, Some(&mut mapped))?;

        let mut dst = mapped.pData as *mut T;
        for chunk in chunks {
            ptr::copy_nonoverlapping(chunk.as_ptr(), dst, chunk.len());
            dst = dst.add(chunk.len());
        }

        ctx.Unmap(&self.resource, 0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn projection_maps_the_display_to_clip_space() {
        let m = projection([10.0, 20.0], [1280.0, 720.0]);

        let top_left = m.project_point3(Vec3::new(10.0, 20.0, 0.0));
        let bottom_right = m.project_point3(Vec3::new(1290.0, 740.0, 0.0));
        let center = m.project_point3(Vec3::new(650.0, 380.0, 0.0));

        assert!(top_left.abs_diff_eq(Vec3::new(-1.0, 1.0, 0.0), 1e-5));
        assert!(bottom_right.abs_diff_eq(Vec3::new(1.0, -1.0, 0.0), 1e-5));
        assert!(center.abs_diff_eq(Vec3::ZERO, 1e-5));
    }
}
