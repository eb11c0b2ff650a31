use memoffset::offset_of;
use tracing::debug;
use windows::core::{s, Result, PCSTR};
use windows::Win32::Graphics::Direct3D::Fxc::{D3DCompile, D3DCOMPILE_ENABLE_STRICTNESS};
use windows::Win32::Graphics::Direct3D::ID3DBlob;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::*;

use crate::mesh::{ScreenVertex, Vertex};
use crate::resources::{Registry, ShaderKind};
use crate::util;

const SHADER_SRC: &str = include_str!("shaders.hlsl");

/// Pixel shaders offered to scene objects, by display name and entry point.
const PIXEL_SHADERS: [(&str, PCSTR); 3] = [
    ("Solid Pixel Shader", s!("PSSolid")),
    ("Texture Pixel Shader", s!("PS")),
    ("Texture UnLit Pixel Shader", s!("PSTextureUnLit")),
];

/// Every shader of the scene and composite passes.
pub(crate) struct ShaderLibrary {
    pub(crate) vertex_shader: ID3D11VertexShader,
    pub(crate) input_layout: ID3D11InputLayout,
    pub(crate) pixel_shaders: Registry<ShaderKind, ID3D11PixelShader>,

    pub(crate) quad_vertex_shader: ID3D11VertexShader,
    pub(crate) quad_pixel_shader: ID3D11PixelShader,
    pub(crate) quad_input_layout: ID3D11InputLayout,
}

impl ShaderLibrary {
    pub(crate) fn new(device: &ID3D11Device) -> Result<Self> {
        let vs_blob = compile(s!("VS"), s!("vs_4_0"), "Compiling scene vertex shader")?;
        let vertex_shader = create_vertex_shader(device, &vs_blob)?;
        let input_layout = create_input_layout(device, &vs_blob, &scene_layout())?;

        let mut pixel_shaders = Registry::new();
        for (name, entry_point) in PIXEL_SHADERS {
            let blob = compile(entry_point, s!("ps_4_0"), name)?;
            pixel_shaders.insert(name, create_pixel_shader(device, &blob)?);
            debug!("Compiled {name}");
        }

        let quad_vs_blob = compile(s!("QuadVS"), s!("vs_4_0"), "Compiling quad vertex shader")?;
        let quad_vertex_shader = create_vertex_shader(device, &quad_vs_blob)?;
        let quad_input_layout = create_input_layout(device, &quad_vs_blob, &quad_layout())?;
        let quad_ps_blob = compile(s!("QuadPS"), s!("ps_4_0"), "Compiling quad pixel shader")?;
        let quad_pixel_shader = create_pixel_shader(device, &quad_ps_blob)?;

        Ok(Self {
            vertex_shader,
            input_layout,
            pixel_shaders,
            quad_vertex_shader,
            quad_pixel_shader,
            quad_input_layout,
        })
    }
}

fn compile(entry_point: PCSTR, target: PCSTR, what: &str) -> Result<ID3DBlob> {
    compile_source(SHADER_SRC, s!("shaders.hlsl"), entry_point, target, what)
}

/// Compile one entry point of an HLSL source. Compiler messages are logged
/// under `what`.
pub(crate) fn compile_source(
    src: &str,
    file_name: PCSTR,
    entry_point: PCSTR,
    target: PCSTR,
    what: &str,
) -> Result<ID3DBlob> {
    util::try_out_err_blob(|v, err_blob| unsafe {
        D3DCompile(
            src.as_ptr() as _,
            src.len(),
            file_name,
            None,
            None,
            entry_point,
            target,
            D3DCOMPILE_ENABLE_STRICTNESS,
            0,
            v,
            Some(err_blob),
        )
    })
    .map_err(util::print_error_blob(what))
}

pub(crate) fn create_vertex_shader(
    device: &ID3D11Device,
    blob: &ID3DBlob,
) -> Result<ID3D11VertexShader> {
    util::try_out_ptr(|v| unsafe { device.CreateVertexShader(util::blob_bytes(blob), None, Some(v)) })
}

pub(crate) fn create_pixel_shader(
    device: &ID3D11Device,
    blob: &ID3DBlob,
) -> Result<ID3D11PixelShader> {
    util::try_out_ptr(|v| unsafe { device.CreatePixelShader(util::blob_bytes(blob), None, Some(v)) })
}

pub(crate) fn create_input_layout(
    device: &ID3D11Device,
    blob: &ID3DBlob,
    elements: &[D3D11_INPUT_ELEMENT_DESC],
) -> Result<ID3D11InputLayout> {
    util::try_out_ptr(|v| unsafe {
        device.CreateInputLayout(elements, util::blob_bytes(blob), Some(v))
    })
}

pub(crate) fn element(
    semantic: PCSTR,
    format: DXGI_FORMAT,
    offset: usize,
) -> D3D11_INPUT_ELEMENT_DESC {
    D3D11_INPUT_ELEMENT_DESC {
        SemanticName: semantic,
        SemanticIndex: 0,
        Format: format,
        InputSlot: 0,
        AlignedByteOffset: offset as u32,
        InputSlotClass: D3D11_INPUT_PER_VERTEX_DATA,
        InstanceDataStepRate: 0,
    }
}

fn scene_layout() -> [D3D11_INPUT_ELEMENT_DESC; 5] {
    [
        element(s!("POSITION"), DXGI_FORMAT_R32G32B32_FLOAT, offset_of!(Vertex, position)),
        element(s!("NORMAL"), DXGI_FORMAT_R32G32B32_FLOAT, offset_of!(Vertex, normal)),
        element(s!("TEXCOORD"), DXGI_FORMAT_R32G32_FLOAT, offset_of!(Vertex, tex_coord)),
        element(s!("TANGENT"), DXGI_FORMAT_R32G32B32_FLOAT, offset_of!(Vertex, tangent)),
        element(s!("BINORMAL"), DXGI_FORMAT_R32G32B32_FLOAT, offset_of!(Vertex, binormal)),
    ]
}

fn quad_layout() -> [D3D11_INPUT_ELEMENT_DESC; 2] {
    [
        element(s!("POSITION"), DXGI_FORMAT_R32G32B32A32_FLOAT, offset_of!(ScreenVertex, position)),
        element(s!("TEXCOORD"), DXGI_FORMAT_R32G32_FLOAT, offset_of!(ScreenVertex, tex_coord)),
    ]
}

/// Sampler for scene textures: trilinear, wrapping.
pub(crate) fn scene_sampler(device: &ID3D11Device) -> Result<ID3D11SamplerState> {
    sampler(device, D3D11_FILTER_MIN_MAG_MIP_LINEAR)
}

/// Sampler for the composite pass. The offscreen target maps 1:1 onto the
/// back buffer, so it is point sampled.
pub(crate) fn quad_sampler(device: &ID3D11Device) -> Result<ID3D11SamplerState> {
    sampler(device, D3D11_FILTER_MIN_MAG_MIP_POINT)
}

fn sampler(device: &ID3D11Device, filter: D3D11_FILTER) -> Result<ID3D11SamplerState> {
    util::try_out_ptr(|v| unsafe {
        device.CreateSamplerState(
            &D3D11_SAMPLER_DESC {
                Filter: filter,
                AddressU: D3D11_TEXTURE_ADDRESS_WRAP,
                AddressV: D3D11_TEXTURE_ADDRESS_WRAP,
                AddressW: D3D11_TEXTURE_ADDRESS_WRAP,
                MipLODBias: 0.,
                MaxAnisotropy: 0,
                ComparisonFunc: D3D11_COMPARISON_NEVER,
                BorderColor: [0.; 4],
                MinLOD: 0.,
                MaxLOD: D3D11_FLOAT32_MAX,
            },
            Some(v),
        )
    })
}
