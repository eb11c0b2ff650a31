use tracing::{debug, info, warn};
use windows::core::{ComInterface, Result};
use windows::Win32::Foundation::{BOOL, E_INVALIDARG, E_POINTER, HWND};
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D11::{
    D3D11CreateDeviceAndSwapChain, ID3D11Device, ID3D11DeviceContext, D3D11_CREATE_DEVICE_DEBUG,
    D3D11_CREATE_DEVICE_FLAG, D3D11_SDK_VERSION,
};
use windows::Win32::Graphics::Dxgi::Common::{
    DXGI_FORMAT_R8G8B8A8_UNORM, DXGI_MODE_DESC, DXGI_RATIONAL, DXGI_SAMPLE_DESC,
};
use windows::Win32::Graphics::Dxgi::{
    IDXGIDevice, IDXGIFactory, IDXGISwapChain, DXGI_MWA_NO_ALT_ENTER, DXGI_SWAP_CHAIN_DESC,
    DXGI_SWAP_EFFECT_DISCARD, DXGI_USAGE_RENDER_TARGET_OUTPUT,
};

const DRIVER_TYPES: [D3D_DRIVER_TYPE; 3] =
    [D3D_DRIVER_TYPE_HARDWARE, D3D_DRIVER_TYPE_WARP, D3D_DRIVER_TYPE_REFERENCE];

const FEATURE_LEVELS: [D3D_FEATURE_LEVEL; 4] = [
    D3D_FEATURE_LEVEL_11_1,
    D3D_FEATURE_LEVEL_11_0,
    D3D_FEATURE_LEVEL_10_1,
    D3D_FEATURE_LEVEL_10_0,
];

/// The Direct3D device, its immediate context and the window's swap chain.
pub struct Device {
    pub(crate) device: ID3D11Device,
    pub(crate) context: ID3D11DeviceContext,
    pub(crate) swap_chain: IDXGISwapChain,
    pub(crate) feature_level: D3D_FEATURE_LEVEL,
}

impl Device {
    /// Create a device and a single-buffered swap chain for `hwnd`.
    ///
    /// Driver types are tried in order: hardware, WARP, reference. Runtimes
    /// that do not know feature level 11.1 reject it with `E_INVALIDARG`, in
    /// which case the same driver is retried without it.
    pub fn new(hwnd: HWND, width: u32, height: u32, debug: bool) -> Result<Self> {
        let flags = if debug { D3D11_CREATE_DEVICE_DEBUG } else { D3D11_CREATE_DEVICE_FLAG(0) };

        let desc = DXGI_SWAP_CHAIN_DESC {
            BufferDesc: DXGI_MODE_DESC {
                Width: width,
                Height: height,
                RefreshRate: DXGI_RATIONAL { Numerator: 60, Denominator: 1 },
                Format: DXGI_FORMAT_R8G8B8A8_UNORM,
                ..Default::default()
            },
            BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
            BufferCount: 1,
            OutputWindow: hwnd,
            Windowed: BOOL::from(true),
            SwapEffect: DXGI_SWAP_EFFECT_DISCARD,
            SampleDesc: DXGI_SAMPLE_DESC { Count: 1, Quality: 0 },
            ..Default::default()
        };

        let mut last_error = None;
        for driver_type in DRIVER_TYPES {
            let created = create(driver_type, flags, &FEATURE_LEVELS, &desc).or_else(|e| {
                if e.code() == E_INVALIDARG {
                    debug!("Feature level 11.1 rejected, retrying without it");
                    create(driver_type, flags, &FEATURE_LEVELS[1..], &desc)
                } else {
                    Err(e)
                }
            });

            match created {
                Ok(device) => {
                    info!(
                        "Created Direct3D 11 device ({driver_type:?}, feature level {:#x})",
                        device.feature_level.0
                    );
                    device.block_alt_enter(hwnd)?;
                    return Ok(device);
                },
                Err(e) => {
                    warn!("Could not create a {driver_type:?} device: {e:?}");
                    last_error = Some(e);
                },
            }
        }

        Err(last_error.unwrap_or_else(|| E_INVALIDARG.into()))
    }

    // Fullscreen toggling would resize the swap chain behind our back.
    fn block_alt_enter(&self, hwnd: HWND) -> Result<()> {
        unsafe {
            let dxgi_device: IDXGIDevice = self.device.cast()?;
            let adapter = dxgi_device.GetAdapter()?;
            let factory: IDXGIFactory = adapter.GetParent()?;
            factory.MakeWindowAssociation(hwnd, DXGI_MWA_NO_ALT_ENTER)
        }
    }
}

fn create(
    driver_type: D3D_DRIVER_TYPE,
    flags: D3D11_CREATE_DEVICE_FLAG,
    feature_levels: &[D3D_FEATURE_LEVEL],
    desc: &DXGI_SWAP_CHAIN_DESC,
) -> Result<Device> {
    let mut p_device: Option<ID3D11Device> = None;
    let mut p_context: Option<ID3D11DeviceContext> = None;
    let mut p_swap_chain: Option<IDXGISwapChain> = None;
    let mut feature_level = D3D_FEATURE_LEVEL::default();

    unsafe {
        D3D11CreateDeviceAndSwapChain(
            None,
            driver_type,
            None,
            flags,
            Some(feature_levels),
            D3D11_SDK_VERSION,
            Some(desc),
            Some(&mut p_swap_chain),
            Some(&mut p_device),
            Some(&mut feature_level),
            Some(&mut p_context),
        )
    }?;

    match (p_device, p_context, p_swap_chain) {
        (Some(device), Some(context), Some(swap_chain)) => {
            Ok(Device { device, context, swap_chain, feature_level })
        },
        _ => Err(E_POINTER.into()),
    }
}
