use windows::core::Result;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::IDXGISwapChain;

use crate::util;

/// Format of the offscreen scene target.
pub(crate) const OFFSCREEN_FORMAT: DXGI_FORMAT = DXGI_FORMAT_R32G32B32A32_FLOAT;

/// Every view the passes render into or read from.
pub(crate) struct RenderTargets {
    pub(crate) back_buffer: ID3D11RenderTargetView,
    pub(crate) offscreen: ID3D11RenderTargetView,
    pub(crate) offscreen_srv: ID3D11ShaderResourceView,
    pub(crate) depth: ID3D11DepthStencilView,
    pub(crate) viewport: D3D11_VIEWPORT,
}

impl RenderTargets {
    pub(crate) fn new(
        device: &ID3D11Device,
        swap_chain: &IDXGISwapChain,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let back_buffer = unsafe {
            let texture: ID3D11Texture2D = swap_chain.GetBuffer(0)?;
            util::try_out_ptr(|v| device.CreateRenderTargetView(&texture, None, Some(v)))?
        };

        let offscreen_texture = create_texture(
            device,
            width,
            height,
            OFFSCREEN_FORMAT,
            D3D11_BIND_RENDER_TARGET.0 | D3D11_BIND_SHADER_RESOURCE.0,
        )?;

        let offscreen = util::try_out_ptr(|v| unsafe {
            device.CreateRenderTargetView(
                &offscreen_texture,
                Some(&D3D11_RENDER_TARGET_VIEW_DESC {
                    Format: OFFSCREEN_FORMAT,
                    ViewDimension: D3D11_RTV_DIMENSION_TEXTURE2D,
                    Anonymous: D3D11_RENDER_TARGET_VIEW_DESC_0 {
                        Texture2D: D3D11_TEX2D_RTV { MipSlice: 0 },
                    },
                }),
                Some(v),
            )
        })?;

        let offscreen_srv = util::try_out_ptr(|v| unsafe {
            device.CreateShaderResourceView(
                &offscreen_texture,
                Some(&D3D11_SHADER_RESOURCE_VIEW_DESC {
                    Format: OFFSCREEN_FORMAT,
                    ViewDimension: D3D11_SRV_DIMENSION_TEXTURE2D,
                    Anonymous: D3D11_SHADER_RESOURCE_VIEW_DESC_0 {
                        Texture2D: D3D11_TEX2D_SRV { MostDetailedMip: 0, MipLevels: 1 },
                    },
                }),
                Some(v),
            )
        })?;

        let depth_texture = create_texture(
            device,
            width,
            height,
            DXGI_FORMAT_D24_UNORM_S8_UINT,
            D3D11_BIND_DEPTH_STENCIL.0,
        )?;
        let depth = util::try_out_ptr(|v| unsafe {
            device.CreateDepthStencilView(&depth_texture, None, Some(v))
        })?;

        let viewport = D3D11_VIEWPORT {
            TopLeftX: 0.,
            TopLeftY: 0.,
            Width: width as f32,
            Height: height as f32,
            MinDepth: 0.,
            MaxDepth: 1.,
        };

        Ok(Self { back_buffer, offscreen, offscreen_srv, depth, viewport })
    }
}

fn create_texture(
    device: &ID3D11Device,
    width: u32,
    height: u32,
    format: DXGI_FORMAT,
    bind_flags: i32,
) -> Result<ID3D11Texture2D> {
    util::try_out_ptr(|v| unsafe {
        device.CreateTexture2D(
            &D3D11_TEXTURE2D_DESC {
                Width: width,
                Height: height,
                MipLevels: 1,
                ArraySize: 1,
                Format: format,
                SampleDesc: DXGI_SAMPLE_DESC { Count: 1, Quality: 0 },
                Usage: D3D11_USAGE_DEFAULT,
                BindFlags: bind_flags as u32,
                CPUAccessFlags: 0,
                MiscFlags: 0,
            },
            None,
            Some(v),
        )
    })
}

/// Depth testing for the scene pass: closer or equal fragments win.
pub(crate) fn depth_state(device: &ID3D11Device) -> Result<ID3D11DepthStencilState> {
    let face = D3D11_DEPTH_STENCILOP_DESC {
        StencilFailOp: D3D11_STENCIL_OP_KEEP,
        StencilDepthFailOp: D3D11_STENCIL_OP_KEEP,
        StencilPassOp: D3D11_STENCIL_OP_KEEP,
        StencilFunc: D3D11_COMPARISON_ALWAYS,
    };
    util::try_out_ptr(|v| unsafe {
        device.CreateDepthStencilState(
            &D3D11_DEPTH_STENCIL_DESC {
                DepthEnable: true.into(),
                DepthWriteMask: D3D11_DEPTH_WRITE_MASK_ALL,
                DepthFunc: D3D11_COMPARISON_LESS_EQUAL,
                StencilEnable: false.into(),
                StencilReadMask: 0xff,
                StencilWriteMask: 0xff,
                FrontFace: face,
                BackFace: face,
            },
            Some(v),
        )
    })
}
