//! Crate-wide error type.

use std::io;
use std::path::PathBuf;

/// Errors produced while setting up or running the sandbox.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem access failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// File or directory that was being accessed.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// A texture file could not be decoded.
    #[error("decoding {}: {source}", path.display())]
    Image {
        /// Texture file.
        path: PathBuf,
        /// Underlying decoder error.
        source: image::ImageError,
    },

    /// A Wavefront OBJ file is malformed.
    #[error("obj line {line}: {message}")]
    Obj {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// A configuration value could not be used.
    #[error("config {key}: {message}")]
    Config {
        /// Environment variable or setting name.
        key: &'static str,
        /// What went wrong.
        message: String,
    },

    /// A light slot outside of the fixed light array was addressed.
    #[error("light index {index} out of range (capacity {capacity})")]
    LightIndex {
        /// Requested slot.
        index: usize,
        /// Size of the light array.
        capacity: usize,
    },

    /// A mesh has more unique vertices than a 16-bit index buffer can address.
    #[error("mesh has {0} vertices, at most 65535 fit 16-bit indices")]
    MeshTooLarge(usize),

    /// A Win32 or Direct3D call failed.
    #[cfg(windows)]
    #[error(transparent)]
    Windows(#[from] windows::core::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn obj(line: usize, message: impl Into<String>) -> Self {
        Self::Obj { line, message: message.into() }
    }
}

/// Convenience alias for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
