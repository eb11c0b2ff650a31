//! # framework-dx11
//!
//! A small Direct3D 11 sandbox: a single window, a single scene of lit and
//! textured objects, a free-flying camera and a
//! [`dear imgui`](https://docs.rs/imgui/0.11.0/imgui/) inspector drawn on
//! top of it.
//!
//! The crate is split in two halves.
//!
//! - The scene model ([`scene`]), the mesh data ([`mesh`]), the frame
//!   description ([`renderer::frame`]), the inspector ([`ui`]) and the
//!   supporting modules are plain Rust and build on every target.
//! - The Direct3D 11 renderer and the Win32 window ([`platform`]) are only
//!   compiled on Windows.
//!
//! ## Frame structure
//!
//! Every frame goes through the same fixed sequence of passes (see
//! [`renderer::frame::Pass`]):
//!
//! 1. the scene is drawn into an offscreen floating point target;
//! 2. the offscreen target is composited onto the back buffer with a
//!    full-screen quad;
//! 3. the imgui overlay is drawn on top;
//! 4. the swap chain is presented.
//!
//! ## Example
//!
//! ```no_run
//! # #[cfg(windows)]
//! # fn main() -> framework_dx11::Result<()> {
//! use framework_dx11::config::Config;
//! use framework_dx11::platform::App;
//!
//! let config = Config::from_env()?;
//! App::new(config)?.run()
//! # }
//! # #[cfg(not(windows))]
//! # fn main() {}
//! ```
#![allow(clippy::needless_doctest_main)]

pub mod config;
pub mod error;
pub mod gizmo;
pub mod input;
pub mod logging;
pub mod mesh;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod timing;
pub mod ui;

#[cfg(windows)]
pub mod platform;
#[cfg(windows)]
pub mod util;

pub use error::{Error, Result};
pub use {glam, imgui, tracing};
#[cfg(windows)]
pub use windows;
