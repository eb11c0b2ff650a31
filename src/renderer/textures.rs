use std::ffi::c_void;
use std::path::Path;

use tracing::{debug, warn};
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::*;

use crate::resources::{self, Registry, TextureKind, TEXTURE_EXTENSIONS};
use crate::{util, Result};

pub(crate) type TextureRegistry = Registry<TextureKind, ID3D11ShaderResourceView>;

/// Load every texture file in `dir`. Files that fail to load are logged
/// and skipped.
pub(crate) fn load_dir(device: &ID3D11Device, dir: &Path) -> Result<TextureRegistry> {
    let mut textures = Registry::new();

    for path in resources::scan_dir(dir, &TEXTURE_EXTENSIONS)? {
        match load(device, &path) {
            Ok(srv) => {
                debug!("Loaded texture {}", path.display());
                textures.insert(resources::resource_name(&path), srv);
            },
            Err(e) => warn!("Skipping texture: {e}"),
        }
    }

    if textures.is_empty() {
        warn!("No textures found in {}", dir.display());
    }
    Ok(textures)
}

fn load(device: &ID3D11Device, path: &Path) -> Result<ID3D11ShaderResourceView> {
    let image = resources::decode_texture(path)?;
    let (width, height) = image.dimensions();
    Ok(create_rgba8(device, image.as_raw(), width, height)?)
}

/// Upload tightly packed RGBA8 pixels and return a view of them.
pub(crate) fn create_rgba8(
    device: &ID3D11Device,
    data: &[u8],
    width: u32,
    height: u32,
) -> windows::core::Result<ID3D11ShaderResourceView> {
    let resource: ID3D11Texture2D = util::try_out_ptr(|v| unsafe {
        device.CreateTexture2D(
            &D3D11_TEXTURE2D_DESC {
                Width: width,
                Height: height,
                MipLevels: 1,
                ArraySize: 1,
                Format: DXGI_FORMAT_R8G8B8A8_UNORM,
                SampleDesc: DXGI_SAMPLE_DESC { Count: 1, Quality: 0 },
                Usage: D3D11_USAGE_DEFAULT,
                BindFlags: D3D11_BIND_SHADER_RESOURCE.0 as u32,
                CPUAccessFlags: 0,
                MiscFlags: 0,
            },
            Some(&D3D11_SUBRESOURCE_DATA {
                pSysMem: data.as_ptr() as *const c_void,
                SysMemPitch: width * 4,
                SysMemSlicePitch: 0,
            }),
            Some(v),
        )
    })?;

    util::try_out_ptr(|v| unsafe {
        device.CreateShaderResourceView(
            &resource,
            Some(&D3D11_SHADER_RESOURCE_VIEW_DESC {
                Format: DXGI_FORMAT_R8G8B8A8_UNORM,
                ViewDimension: D3D11_SRV_DIMENSION_TEXTURE2D,
                Anonymous: D3D11_SHADER_RESOURCE_VIEW_DESC_0 {
                    Texture2D: D3D11_TEX2D_SRV { MostDetailedMip: 0, MipLevels: 1 },
                },
            }),
            Some(v),
        )
    })
}
