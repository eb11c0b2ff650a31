//! The scene model: camera, objects and lights.
//!
//! Nothing in here talks to the GPU. The renderer reads a [`Scene`] once per
//! frame through [`crate::renderer::frame::FramePacket::build`].

use glam::Vec3;
use tracing::{debug, warn};

use crate::resources::{Catalog, Handle};

pub mod camera;
pub mod light;
pub mod material;
pub mod object;
pub mod spline;
pub mod transform;

pub use camera::Camera;
pub use light::{Light, LightProperties, LightType, MAX_LIGHTS};
pub use material::{Material, MaterialProperties};
pub use object::GameObject;
pub use spline::CameraSpline;
pub use transform::Transform;

/// Name of the built-in cube mesh.
pub const CUBE_MESH: &str = "Cube";

/// Everything that is drawn, and the camera it is seen through.
#[derive(Debug, Clone)]
pub struct Scene {
    camera: Camera,
    objects: Vec<GameObject>,
    lights: LightProperties,
    catalog: Catalog,
    /// Path the camera follows while [`Scene::spline_playing`] is set.
    pub spline: CameraSpline,
    spline_playing: bool,
}

impl Scene {
    /// Build the starting scene: two cubes, two point lights and the camera
    /// four units back from the origin.
    ///
    /// Resources are looked up by name in `catalog`. Unknown names fall back
    /// to the first entry of their kind. An object whose texture cannot be
    /// resolved at all is left untextured.
    pub fn new(catalog: Catalog, viewport: (u32, u32)) -> Self {
        let camera = Camera::scene_default(viewport.0, viewport.1);

        let mesh = resolve(catalog.mesh(CUBE_MESH), "mesh", CUBE_MESH);
        let solid = resolve(catalog.shader("Solid Pixel Shader"), "pixel shader", "Solid");
        let textured = resolve(catalog.shader("Texture Pixel Shader"), "pixel shader", "Texture");

        let mut cube1 = GameObject::new(
            "Cube 1",
            Transform::from_position(Vec3::new(-2.0, 0.0, 0.0)),
            mesh,
            solid,
        )
        .with_textures(catalog.texture("tex2.dds"), None);

        let mut cube2 = GameObject::new(
            "Cube 2",
            Transform::from_position(Vec3::new(2.0, 0.0, 0.0)),
            mesh,
            textured,
        )
        .with_textures(catalog.texture("stone.dds"), catalog.texture("conenormal.dds"));
        cube2.auto_rotate_y = true;

        for obj in [&mut cube1, &mut cube2] {
            // Compute the first world matrix without advancing time.
            obj.update(0.0);
            debug!(
                "Created {} (shader {:?}, texture {:?}, normal map {:?})",
                obj.name(),
                catalog.shader_name(obj.pixel_shader),
                obj.texture().and_then(|t| catalog.texture_name(t)),
                obj.normal_map().and_then(|t| catalog.texture_name(t)),
            );
        }

        Self {
            camera,
            objects: vec![cube1, cube2],
            lights: LightProperties::scene_default(),
            catalog,
            spline: CameraSpline::default(),
            spline_playing: false,
        }
    }

    /// Advance the scene by `dt` seconds.
    ///
    /// Order: camera spline playback, eye position, then every object in
    /// list order.
    pub fn update(&mut self, dt: f32) {
        if self.spline_playing {
            match self.spline.advance(dt) {
                Some(position) => {
                    self.camera.set_position(position);
                    if let Some(direction) = self.spline.tangent(self.spline.time()) {
                        self.camera.look_along(direction);
                    }
                },
                None => warn!("Camera spline needs at least two points"),
            }
            if self.spline.is_finished() {
                self.spline_playing = false;
            }
        }

        self.lights.set_eye_position(self.camera.position());

        for obj in &mut self.objects {
            obj.update(dt);
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    pub fn object(&self, index: usize) -> Option<&GameObject> {
        self.objects.get(index)
    }

    pub fn object_mut(&mut self, index: usize) -> Option<&mut GameObject> {
        self.objects.get_mut(index)
    }

    pub fn add_object(&mut self, object: GameObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    pub fn lights(&self) -> &LightProperties {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut LightProperties {
        &mut self.lights
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn spline_playing(&self) -> bool {
        self.spline_playing
    }

    /// Start or stop camera spline playback. Starting rewinds the spline.
    pub fn set_spline_playing(&mut self, playing: bool) {
        if playing && !self.spline_playing {
            self.spline.rewind();
        }
        self.spline_playing = playing;
    }
}

// Scene objects always need some handle; the renderer checks it against its
// registries before drawing.
fn resolve<K>(handle: Option<Handle<K>>, kind: &str, name: &str) -> Handle<K> {
    handle.unwrap_or_else(|| {
        warn!("No {kind} available for {name:?}");
        Handle::new(0)
    })
}
