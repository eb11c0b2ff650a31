//! Overlay backends.

pub(crate) mod dx11;
