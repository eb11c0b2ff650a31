//! Named resource registries.
//!
//! The scene refers to GPU resources (pixel shaders, textures, meshes) by
//! [`Handle`]. The renderer owns the actual objects in a [`Registry`] and
//! publishes their names in a [`Catalog`] so that the inspector can offer
//! them in its selection windows.

use std::fmt;
use std::fs;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::{Error, Result};

/// Marker for pixel shader handles.
#[derive(Debug)]
pub enum ShaderKind {}

/// Marker for texture handles (color textures and normal maps alike).
#[derive(Debug)]
pub enum TextureKind {}

/// Marker for mesh handles.
#[derive(Debug)]
pub enum MeshKind {}

/// Typed index into a [`Registry`].
pub struct Handle<K> {
    index: usize,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Handle<K> {
    /// Wrap a raw index.
    pub const fn new(index: usize) -> Self {
        Self { index, _kind: PhantomData }
    }

    /// Raw position in the registry.
    pub const fn index(self) -> usize {
        self.index
    }
}

// Manual impls: the derived ones would put bounds on `K`.
impl<K> Clone for Handle<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Handle<K> {}

impl<K> PartialEq for Handle<K> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<K> Eq for Handle<K> {}

impl<K> Hash for Handle<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state)
    }
}

impl<K> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.index)
    }
}

/// Pixel shader handle.
pub type ShaderHandle = Handle<ShaderKind>;
/// Texture handle.
pub type TextureHandle = Handle<TextureKind>;
/// Mesh handle.
pub type MeshHandle = Handle<MeshKind>;

/// Ordered list of named values.
///
/// Lookups are linear; registries hold a handful of entries.
pub struct Registry<K, T> {
    entries: Vec<(String, T)>,
    _kind: PhantomData<fn() -> K>,
}

impl<K, T> Default for Registry<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> Registry<K, T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { entries: Vec::new(), _kind: PhantomData }
    }

    /// Add a value under `name`. An existing entry with the same name is
    /// replaced and keeps its handle.
    pub fn insert(&mut self, name: impl Into<String>, value: T) -> Handle<K> {
        let name = name.into();
        match self.find(&name) {
            Some(handle) => {
                self.entries[handle.index()].1 = value;
                handle
            },
            None => {
                self.entries.push((name, value));
                Handle::new(self.entries.len() - 1)
            },
        }
    }

    /// Look up an entry by exact name.
    pub fn find(&self, name: &str) -> Option<Handle<K>> {
        self.entries.iter().position(|(n, _)| n == name).map(Handle::new)
    }

    /// Look up an entry by name, falling back to the first entry.
    ///
    /// Returns `None` only when the registry is empty.
    pub fn find_or_first(&self, name: &str) -> Option<Handle<K>> {
        self.find(name).or_else(|| (!self.entries.is_empty()).then(|| Handle::new(0)))
    }

    /// Value stored at `handle`.
    pub fn get(&self, handle: Handle<K>) -> Option<&T> {
        self.entries.get(handle.index()).map(|(_, value)| value)
    }

    /// Name stored at `handle`.
    pub fn name(&self, handle: Handle<K>) -> Option<&str> {
        self.entries.get(handle.index()).map(|(name, _)| name.as_str())
    }

    /// All names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over handles, names and values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<K>, &str, &T)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, (name, value))| (Handle::new(i), name.as_str(), value))
    }
}

/// Name under which the offscreen target is listed among the textures.
///
/// It can be picked in the inspector but is never bound while the scene
/// pass draws into it.
pub const OFFSCREEN_TEXTURE: &str = "RenderTargetView";

/// Names of everything the renderer loaded, indexed the same way as the
/// renderer's registries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// Pixel shader names.
    pub shaders: Vec<String>,
    /// Texture names. Normal maps are picked from the same list.
    pub textures: Vec<String>,
    /// Mesh names.
    pub meshes: Vec<String>,
}

impl Catalog {
    pub fn shader(&self, name: &str) -> Option<ShaderHandle> {
        find_or_first(&self.shaders, name)
    }

    /// Look up a texture by name, falling back to the first file texture.
    /// The offscreen target is never returned.
    pub fn texture(&self, name: &str) -> Option<TextureHandle> {
        let mut files = self.textures.iter().enumerate().filter(|(_, n)| *n != OFFSCREEN_TEXTURE);
        let first = files.clone().next().map(|(i, _)| i);
        files.find(|(_, n)| *n == name).map(|(i, _)| i).or(first).map(Handle::new)
    }

    /// Whether `handle` names the offscreen target.
    pub fn is_offscreen(&self, handle: TextureHandle) -> bool {
        self.texture_name(handle) == Some(OFFSCREEN_TEXTURE)
    }

    pub fn mesh(&self, name: &str) -> Option<MeshHandle> {
        find_or_first(&self.meshes, name)
    }

    pub fn shader_name(&self, handle: ShaderHandle) -> Option<&str> {
        self.shaders.get(handle.index()).map(String::as_str)
    }

    pub fn texture_name(&self, handle: TextureHandle) -> Option<&str> {
        self.textures.get(handle.index()).map(String::as_str)
    }

    pub fn mesh_name(&self, handle: MeshHandle) -> Option<&str> {
        self.meshes.get(handle.index()).map(String::as_str)
    }
}

fn find_or_first<K>(names: &[String], name: &str) -> Option<Handle<K>> {
    names
        .iter()
        .position(|n| n == name)
        .or_else(|| (!names.is_empty()).then_some(0))
        .map(Handle::new)
}

/// File extensions picked up as textures.
pub const TEXTURE_EXTENSIONS: [&str; 4] = ["dds", "png", "jpg", "jpeg"];

/// File extensions picked up as meshes.
pub const MESH_EXTENSIONS: [&str; 1] = ["obj"];

/// List the files directly in `dir` whose extension is one of `extensions`
/// (ignoring case), sorted by path.
///
/// A missing directory yields an empty list.
pub fn scan_dir(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Registry name of a loaded file: its file name with extension.
pub fn resource_name(path: &Path) -> String {
    path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into())
}

/// Decode a texture file to 8-bit RGBA.
pub fn decode_texture(path: &Path) -> Result<RgbaImage> {
    let reader = image::io::Reader::open(path)
        .map_err(|e| Error::io(path, e))?
        .with_guessed_format()
        .map_err(|e| Error::io(path, e))?;
    let image = reader.decode().map_err(|source| Error::Image { path: path.into(), source })?;
    Ok(image.into_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("framework-dx11-resources-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn scan_filters_and_sorts() {
        let dir = scratch_dir("scan");
        for name in ["stone.dds", "b.PNG", "a.jpg", "notes.txt", "teapot.obj"] {
            fs::write(dir.join(name), b"").unwrap();
        }
        fs::create_dir(dir.join("nested.png")).unwrap();

        let names: Vec<_> = scan_dir(&dir, &TEXTURE_EXTENSIONS)
            .unwrap()
            .iter()
            .map(|p| resource_name(p))
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.PNG", "stone.dds"]);

        let meshes = scan_dir(&dir, &MESH_EXTENSIONS).unwrap();
        assert_eq!(meshes.len(), 1);

        assert!(scan_dir(&dir.join("missing"), &TEXTURE_EXTENSIONS).unwrap().is_empty());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn decodes_png_to_rgba() {
        let dir = scratch_dir("decode");
        let path = dir.join("pixel.png");
        image::RgbImage::from_pixel(2, 3, image::Rgb([10, 20, 30])).save(&path).unwrap();

        let decoded = decode_texture(&path).unwrap();
        assert_eq!(decoded.dimensions(), (2, 3));
        assert_eq!(decoded.get_pixel(1, 2).0, [10, 20, 30, 255]);

        fs::write(dir.join("broken.png"), b"not a png").unwrap();
        assert!(matches!(decode_texture(&dir.join("broken.png")), Err(Error::Image { .. })));
        assert!(matches!(decode_texture(&dir.join("missing.png")), Err(Error::Io { .. })));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn insert_and_find() {
        let mut reg: Registry<ShaderKind, u32> = Registry::new();
        let solid = reg.insert("Solid Pixel Shader", 1);
        let textured = reg.insert("Texture Pixel Shader", 2);

        assert_eq!(reg.len(), 2);
        assert_eq!(reg.find("Texture Pixel Shader"), Some(textured));
        assert_eq!(reg.get(solid), Some(&1));
        assert_eq!(reg.name(textured), Some("Texture Pixel Shader"));
        assert_eq!(reg.names(), vec!["Solid Pixel Shader", "Texture Pixel Shader"]);
    }

    #[test]
    fn reinserting_keeps_the_handle() {
        let mut reg: Registry<TextureKind, &str> = Registry::new();
        let first = reg.insert("stone.dds", "old");
        reg.insert("tex2.dds", "other");
        let again = reg.insert("stone.dds", "new");

        assert_eq!(first, again);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get(first), Some(&"new"));
    }

    #[test]
    fn unknown_names_fall_back_to_the_first_entry() {
        let mut reg: Registry<MeshKind, ()> = Registry::new();
        assert_eq!(reg.find_or_first("Cube"), None);

        reg.insert("Cube", ());
        reg.insert("teapot.obj", ());
        assert_eq!(reg.find_or_first("missing.obj"), Some(Handle::new(0)));
        assert_eq!(reg.find_or_first("teapot.obj"), Some(Handle::new(1)));
    }

    #[test]
    fn catalog_lookups_mirror_registry_semantics() {
        let catalog = Catalog {
            shaders: vec!["Solid Pixel Shader".into(), "Texture Pixel Shader".into()],
            textures: vec![],
            meshes: vec!["Cube".into()],
        };

        assert_eq!(catalog.shader("Texture Pixel Shader").map(Handle::index), Some(1));
        assert_eq!(catalog.shader("nope").map(Handle::index), Some(0));
        assert_eq!(catalog.texture("stone.dds"), None);
        assert_eq!(catalog.mesh_name(Handle::new(0)), Some("Cube"));
        assert_eq!(catalog.mesh_name(Handle::new(3)), None);
    }

    #[test]
    fn texture_lookup_skips_the_offscreen_target() {
        let only_offscreen = Catalog { textures: vec![OFFSCREEN_TEXTURE.into()], ..Default::default() };
        assert_eq!(only_offscreen.texture("stone.dds"), None);
        assert_eq!(only_offscreen.texture(OFFSCREEN_TEXTURE), None);
        assert!(only_offscreen.is_offscreen(Handle::new(0)));

        let catalog = Catalog {
            textures: vec![OFFSCREEN_TEXTURE.into(), "stone.dds".into(), "tex2.dds".into()],
            ..Default::default()
        };
        assert_eq!(catalog.texture("tex2.dds").map(Handle::index), Some(2));
        assert_eq!(catalog.texture("missing.dds").map(Handle::index), Some(1));
        assert!(!catalog.is_offscreen(Handle::new(1)));
        assert!(!catalog.is_offscreen(Handle::new(7)));
    }
}
