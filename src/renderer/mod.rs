//! Rendering.
//!
//! [`frame`] describes what a frame draws and in which order; it is plain
//! data and builds everywhere. The rest of the module is the Direct3D 11
//! implementation and is only compiled on Windows.

pub mod frame;

#[cfg(windows)]
mod backend;
#[cfg(windows)]
mod buffers;
#[cfg(windows)]
mod device;
#[cfg(windows)]
mod engine;
#[cfg(windows)]
mod meshes;
#[cfg(windows)]
mod shaders;
#[cfg(windows)]
mod targets;
#[cfg(windows)]
mod textures;

#[cfg(windows)]
pub use backend::dx11::ImguiRenderer;
#[cfg(windows)]
pub use device::Device;
#[cfg(windows)]
pub use engine::Renderer;
