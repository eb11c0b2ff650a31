//! Startup settings.
//!
//! Defaults: a 1280x720 window, vsync on, and
//! every asset read from a `resources` folder next to the working directory.
//! Any of them can be overridden through `FRAMEWORK_*` environment variables,
//! optionally kept in a `.env` file.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::{Error, Result};

/// Settings read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Client area width in pixels.
    pub window_width: u32,
    /// Client area height in pixels.
    pub window_height: u32,
    /// Window caption.
    pub title: String,
    /// Folder scanned for textures and meshes.
    pub resources_dir: PathBuf,
    /// Initial state of the vsync toggle.
    pub vsync: bool,
    /// Camera translation speed, in units per second.
    pub camera_move_speed: f32,
    /// Camera keyboard rotation speed, in radians per second.
    pub camera_rotate_speed: f32,
    /// Radians of camera rotation per pixel of mouse movement.
    pub mouse_sensitivity: f32,
    /// Create the Direct3D device with the debug layer.
    pub debug_device: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            title: String::from("LucyLabs Proprietary Advanced Realtime Graphics Framework"),
            resources_dir: PathBuf::from("resources"),
            vsync: true,
            camera_move_speed: 5.0,
            camera_rotate_speed: 1.5,
            mouse_sensitivity: 0.002,
            debug_device: cfg!(debug_assertions),
        }
    }
}

/// Load `.env` from the working directory or one of its parents into the
/// process environment. Variables that are already set win.
///
/// Call this before [`crate::logging::init`] so that a `RUST_LOG` in the
/// file is honored.
pub fn load_env_file() {
    dotenv::dotenv().ok();
}

/// Load a specific env file. Variables that are already set win.
pub fn load_env_file_from(path: &Path) -> Result<()> {
    dotenv::from_path(path).map_err(|e| Error::Config { key: "env file", message: e.to_string() })
}

impl Config {
    /// Build the configuration from the defaults, the `.env` file (if any)
    /// and the process environment.
    pub fn from_env() -> Result<Self> {
        load_env_file();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(width) = parse(&lookup, "FRAMEWORK_WIDTH")? {
            config.window_width = width;
        }
        if let Some(height) = parse(&lookup, "FRAMEWORK_HEIGHT")? {
            config.window_height = height;
        }
        if let Some(dir) = lookup("FRAMEWORK_RESOURCES") {
            config.resources_dir = PathBuf::from(dir);
        }
        if let Some(vsync) = lookup("FRAMEWORK_VSYNC") {
            config.vsync = parse_flag("FRAMEWORK_VSYNC", &vsync)?;
        }
        if let Some(speed) = parse(&lookup, "FRAMEWORK_MOVE_SPEED")? {
            config.camera_move_speed = speed;
        }
        if let Some(speed) = parse(&lookup, "FRAMEWORK_ROTATE_SPEED")? {
            config.camera_rotate_speed = speed;
        }

        if config.window_width == 0 || config.window_height == 0 {
            return Err(Error::Config {
                key: "FRAMEWORK_WIDTH/FRAMEWORK_HEIGHT",
                message: format!(
                    "window size {}x{} has a zero dimension",
                    config.window_width, config.window_height
                ),
            });
        }

        debug!("{config:?}");
        Ok(config)
    }
}

fn parse<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|value| {
            value.trim().parse::<T>().map_err(|e| Error::Config {
                key,
                message: format!("{value:?}: {e}"),
            })
        })
        .transpose()
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(Error::Config { key, message: format!("{value:?} is not a boolean") }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_overrides() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!((config.window_width, config.window_height), (1280, 720));
        assert_eq!(config.resources_dir, PathBuf::from("resources"));
        assert!(config.vsync);
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("FRAMEWORK_WIDTH", "800"),
            ("FRAMEWORK_HEIGHT", " 600 "),
            ("FRAMEWORK_RESOURCES", "assets"),
            ("FRAMEWORK_VSYNC", "off"),
            ("FRAMEWORK_MOVE_SPEED", "2.5"),
        ]))
        .unwrap();

        assert_eq!((config.window_width, config.window_height), (800, 600));
        assert_eq!(config.resources_dir, PathBuf::from("assets"));
        assert!(!config.vsync);
        assert_eq!(config.camera_move_speed, 2.5);
    }

    #[test]
    fn bad_values_name_the_variable() {
        let err = Config::from_lookup(lookup_from(&[("FRAMEWORK_WIDTH", "wide")])).unwrap_err();
        assert!(matches!(err, Error::Config { key: "FRAMEWORK_WIDTH", .. }));

        let err = Config::from_lookup(lookup_from(&[("FRAMEWORK_VSYNC", "maybe")])).unwrap_err();
        assert!(matches!(err, Error::Config { key: "FRAMEWORK_VSYNC", .. }));
    }

    #[test]
    fn zero_sized_window_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("FRAMEWORK_HEIGHT", "0")])).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
