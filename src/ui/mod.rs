//! The imgui inspector drawn over the scene.
//!
//! Every window edits the [`Scene`] in place. Light edits go through
//! [`LightProperties::update_light`](crate::scene::LightProperties::update_light)
//! so the slot bounds are checked in one place.

use glam::{Vec3, Vec4};
use imgui::{Condition, Drag, Ui};
use tracing::warn;

use crate::gizmo::{GizmoAxis, GizmoMode};
use crate::resources::{Handle, TextureHandle};
use crate::scene::{LightType, Scene, MAX_LIGHTS};
use crate::timing::FrameStats;

mod overlay;

/// Selection after clicking entry `clicked` of a list whose current
/// selection is `current`: clicking the selected entry clears the
/// selection, any other entry becomes selected.
pub fn toggle_selection(current: Option<usize>, clicked: usize) -> Option<usize> {
    if current == Some(clicked) {
        None
    } else {
        Some(clicked)
    }
}

/// Inspector state that lives across frames.
#[derive(Debug, Clone)]
pub struct Inspector {
    /// Show every window besides the show/hide toggle.
    pub show_windows: bool,
    /// Present with vertical sync.
    pub vsync: bool,
    selected_object: Option<usize>,
    selected_light: Option<usize>,
    gizmo_mode: GizmoMode,
    drag_axis: Option<GizmoAxis>,
    show_spline: bool,
}

impl Inspector {
    pub fn new(vsync: bool) -> Self {
        Self {
            show_windows: false,
            vsync,
            selected_object: None,
            selected_light: None,
            gizmo_mode: GizmoMode::default(),
            drag_axis: None,
            show_spline: false,
        }
    }

    pub fn selected_object(&self) -> Option<usize> {
        self.selected_object
    }

    pub fn selected_light(&self) -> Option<usize> {
        self.selected_light
    }

    pub fn select_object(&mut self, index: usize) {
        self.selected_object = toggle_selection(self.selected_object, index);
        self.drag_axis = None;
    }

    pub fn select_light(&mut self, index: usize) {
        self.selected_light = toggle_selection(self.selected_light, index);
    }

    pub fn gizmo_mode(&self) -> GizmoMode {
        self.gizmo_mode
    }

    /// Build every inspector window for this frame.
    pub fn draw(&mut self, ui: &Ui, scene: &mut Scene, stats: &FrameStats) {
        self.draw_show_hide(ui);

        if !self.show_windows {
            return;
        }

        // The selection may outlive the object it points at.
        if self.selected_object.is_some_and(|i| i >= scene.objects().len()) {
            self.selected_object = None;
        }

        self.draw_version(ui, stats);
        self.draw_light_selection(ui, scene);
        self.draw_light_editor(ui, scene);
        self.draw_object_selection(ui, scene);
        self.draw_object_movement(ui, scene);
        self.draw_pixel_shader_selection(ui, scene);
        self.draw_texture_selection(ui, scene, TextureSlot::Color);
        self.draw_texture_selection(ui, scene, TextureSlot::NormalMap);
        self.draw_mesh_selection(ui, scene);
        self.draw_material_editor(ui, scene);
        self.draw_camera_stats(ui, scene);
        if self.show_spline {
            self.draw_camera_spline(ui, scene);
        }
        self.draw_gizmo(ui, scene);
    }

    fn draw_show_hide(&mut self, ui: &Ui) {
        ui.window("Show/Hide UI")
            .position([1100.0, 650.0], Condition::FirstUseEver)
            .always_auto_resize(true)
            .build(|| {
                ui.checkbox("Show All Windows", &mut self.show_windows);
            });
    }

    fn draw_version(&mut self, ui: &Ui, stats: &FrameStats) {
        ui.window("LucyLabs DX11 Renderer")
            .position([10.0, 10.0], Condition::FirstUseEver)
            .always_auto_resize(true)
            .build(|| {
                ui.text(format!("ImGUI version: ({})", imgui::dear_imgui_version()));
                ui.text(format!("Application Runtime ({:.3})", stats.total));
                ui.text(format!("FPS {}", stats.fps));
                ui.checkbox("VSync Enabled", &mut self.vsync);
                ui.checkbox("Camera Spline Window", &mut self.show_spline);
            });
    }

    fn draw_light_selection(&mut self, ui: &Ui, scene: &Scene) {
        ui.window("Light Selection")
            .position([250.0, 10.0], Condition::FirstUseEver)
            .always_auto_resize(true)
            .build(|| {
                ui.text("Choose a light to select!");
                ui.separator();

                for i in 0..MAX_LIGHTS {
                    let enabled = scene.lights().light(i).is_some_and(|l| l.is_enabled());
                    let label = format!("Light {i}{}", if enabled { "" } else { " (off)" });
                    if ui.selectable_config(label).selected(self.selected_light == Some(i)).build()
                    {
                        self.select_light(i);
                    }
                }
            });
    }

    fn draw_light_editor(&mut self, ui: &Ui, scene: &mut Scene) {
        let Some(index) = self.selected_light else { return };
        let Some(mut light) = scene.lights().light(index).copied() else {
            self.selected_light = None;
            return;
        };

        ui.window("Light Movement Update Window")
            .position([10.0, 150.0], Condition::FirstUseEver)
            .always_auto_resize(true)
            .build(|| {
                ui.separator();
                ui.text(format!("Light {index}"));

                let mut enabled = light.is_enabled();
                if ui.checkbox(format!("Light {index} Enable"), &mut enabled) {
                    light.set_enabled(enabled);
                }

                let mut position = light.position.truncate().to_array();
                if Drag::new(format!("Light {index} Position"))
                    .speed(0.1)
                    .build_array(ui, &mut position)
                {
                    light.position = Vec3::from(position).extend(1.0);
                }

                let mut color = light.color.truncate().to_array();
                if ui.color_edit3(format!("Light {index} Color"), &mut color) {
                    light.color = Vec3::from(color).extend(1.0);
                }

                ui.slider(
                    format!("Light {index} Constant Attenuation"),
                    0.1,
                    1.0,
                    &mut light.constant_attenuation,
                );
                ui.slider(
                    format!("Light {index} Linear Attenuation"),
                    0.1,
                    1.0,
                    &mut light.linear_attenuation,
                );
                ui.slider(
                    format!("Light {index} Quadratic Attenuation"),
                    0.1,
                    1.0,
                    &mut light.quadratic_attenuation,
                );

                let mut kind = light.kind().unwrap_or(LightType::Point);
                for option in LightType::ALL {
                    if ui.radio_button(option.name(), &mut kind, option) {
                        light.set_kind(kind);
                    }
                    ui.same_line();
                }
                ui.new_line();
                ui.separator();
            });

        if let Err(e) = scene.lights_mut().update_light(index, light) {
            warn!("{e}");
        }
    }

    fn draw_object_selection(&mut self, ui: &Ui, scene: &Scene) {
        ui.window("Object Selection")
            .position([465.0, 10.0], Condition::FirstUseEver)
            .always_auto_resize(true)
            .build(|| {
                ui.text("Choose an object to select!");
                ui.separator();

                for (i, obj) in scene.objects().iter().enumerate() {
                    if ui
                        .selectable_config(obj.name())
                        .selected(self.selected_object == Some(i))
                        .build()
                    {
                        self.select_object(i);
                    }
                }
            });
    }

    fn draw_object_movement(&mut self, ui: &Ui, scene: &mut Scene) {
        let Some(index) = self.selected_object else { return };
        let Some(obj) = scene.object_mut(index) else { return };
        let gizmo_mode = &mut self.gizmo_mode;

        ui.window("Object Movement Window")
            .position([930.0, 10.0], Condition::FirstUseEver)
            .always_auto_resize(true)
            .build(|| {
                ui.text("Manipulate object:");
                ui.text(format!("Selected Object: {}", obj.name()));
                ui.separator();

                let mut position = obj.transform.position.to_array();
                if Drag::new("Position").speed(0.005).build_array(ui, &mut position) {
                    obj.edit_transform(|t| t.position = Vec3::from(position));
                }

                let mut rotation = obj.transform.rotation.to_array();
                if Drag::new("Rotation")
                    .range(-361.0, 361.0)
                    .speed(0.5)
                    .build_array(ui, &mut rotation)
                {
                    obj.edit_transform(|t| t.rotation = Vec3::from(rotation));
                }

                let mut scale = obj.transform.scale.to_array();
                if Drag::new("Scale").speed(0.01).build_array(ui, &mut scale) {
                    obj.edit_transform(|t| t.scale = Vec3::from(scale));
                }

                ui.text("(Drag the box or enter a number)");
                ui.separator();

                ui.text("Auto Rotate:");
                ui.slider("Rotation Speed", 0.0, 360.0, &mut obj.auto_rotation_speed);
                ui.checkbox("Auto Rotate (X+)", &mut obj.auto_rotate_x);
                ui.checkbox("Auto Rotate (Y+)", &mut obj.auto_rotate_y);
                ui.checkbox("Auto Rotate (Z+)", &mut obj.auto_rotate_z);
                ui.separator();

                ui.text("Gizmo:");
                for mode in GizmoMode::ALL {
                    ui.radio_button(mode.name(), gizmo_mode, mode);
                    ui.same_line();
                }
                ui.new_line();
                ui.separator();

                if ui.button("Reset Transform") {
                    obj.reset_transform();
                }
            });
    }

    fn draw_pixel_shader_selection(&mut self, ui: &Ui, scene: &mut Scene) {
        let Some(index) = self.selected_object else { return };
        let shaders = scene.catalog().shaders.clone();
        let Some(obj) = scene.object_mut(index) else { return };

        ui.window("Pixel Shader Selection")
            .position([930.0, 320.0], Condition::FirstUseEver)
            .always_auto_resize(true)
            .build(|| {
                ui.text("Select Pixel Shader for Each Object!");
                ui.separator();
                ui.text(format!("Selected Object: {}", obj.name()));
                ui.separator();

                for (i, name) in shaders.iter().enumerate() {
                    let handle = Handle::new(i);
                    if ui.selectable_config(name).selected(obj.pixel_shader == handle).build() {
                        obj.pixel_shader = handle;
                    }
                }
            });
    }

    fn draw_texture_selection(&mut self, ui: &Ui, scene: &mut Scene, slot: TextureSlot) {
        let Some(index) = self.selected_object else { return };
        let textures = scene.catalog().textures.clone();
        let Some(obj) = scene.object_mut(index) else { return };

        ui.window(slot.window_title())
            .position(slot.window_position(), Condition::FirstUseEver)
            .always_auto_resize(true)
            .build(|| {
                ui.text(format!("Selected Object: {}", obj.name()));
                ui.separator();

                let current = match slot {
                    TextureSlot::Color => obj.texture(),
                    TextureSlot::NormalMap => obj.normal_map(),
                };

                let mut choice = None;
                if ui.selectable_config("None").selected(current.is_none()).build() {
                    choice = Some(None);
                }
                for (i, name) in textures.iter().enumerate() {
                    let handle: TextureHandle = Handle::new(i);
                    if ui.selectable_config(name).selected(current == Some(handle)).build() {
                        choice = Some(Some(handle));
                    }
                }

                match (slot, choice) {
                    (TextureSlot::Color, Some(texture)) => obj.set_texture(texture),
                    (TextureSlot::NormalMap, Some(normal_map)) => obj.set_normal_map(normal_map),
                    (_, None) => {},
                }
            });
    }

    fn draw_mesh_selection(&mut self, ui: &Ui, scene: &mut Scene) {
        let Some(index) = self.selected_object else { return };
        let meshes = scene.catalog().meshes.clone();
        let Some(obj) = scene.object_mut(index) else { return };

        ui.window("Mesh Selection")
            .position([700.0, 320.0], Condition::FirstUseEver)
            .always_auto_resize(true)
            .build(|| {
                ui.text(format!("Selected Object: {}", obj.name()));
                ui.separator();

                for (i, name) in meshes.iter().enumerate() {
                    let handle = Handle::new(i);
                    if ui.selectable_config(name).selected(obj.mesh == handle).build() {
                        obj.mesh = handle;
                    }
                }
            });
    }

    fn draw_material_editor(&mut self, ui: &Ui, scene: &mut Scene) {
        let Some(index) = self.selected_object else { return };
        let Some(obj) = scene.object_mut(index) else { return };

        ui.window("Material Editor")
            .position([10.0, 420.0], Condition::FirstUseEver)
            .always_auto_resize(true)
            .build(|| {
                ui.text(format!("Selected Object: {}", obj.name()));
                ui.separator();

                let material = &mut obj.material;
                color_edit(ui, "Emissive", &mut material.emissive);
                color_edit(ui, "Ambient", &mut material.ambient);
                color_edit(ui, "Diffuse", &mut material.diffuse);
                color_edit(ui, "Specular", &mut material.specular);
                ui.slider("Specular Power", 1.0, 256.0, &mut material.specular_power);

                let mut use_texture = material.uses_texture();
                if ui.checkbox("Use Texture", &mut use_texture) {
                    material.use_texture = use_texture as i32;
                }
                let mut use_normal_map = material.uses_normal_map();
                if ui.checkbox("Use Normal Map", &mut use_normal_map) {
                    material.use_normal_map = use_normal_map as i32;
                }

                ui.separator();
                if ui.button("Reset Material") {
                    obj.reset_material();
                }
            });
    }

    fn draw_camera_stats(&mut self, ui: &Ui, scene: &mut Scene) {
        let camera = scene.camera_mut();

        ui.window("Camera")
            .position([250.0, 420.0], Condition::FirstUseEver)
            .always_auto_resize(true)
            .build(|| {
                let p = camera.position();
                let f = camera.forward();
                let u = camera.up();
                let angles = camera.angles();
                ui.text(format!("Position ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z));
                ui.text(format!("Forward ({:.2}, {:.2}, {:.2})", f.x, f.y, f.z));
                ui.text(format!("Up ({:.2}, {:.2}, {:.2})", u.x, u.y, u.z));
                ui.text(format!(
                    "Yaw {:.1} Pitch {:.1} Roll {:.1}",
                    angles.x.to_degrees(),
                    angles.y.to_degrees(),
                    angles.z.to_degrees()
                ));
                ui.separator();
                ui.slider("Move Speed", 0.1, 50.0, &mut camera.move_speed);
                ui.slider("Rotate Speed", 0.1, 10.0, &mut camera.rotate_speed);
                if ui.button("Reset Camera") {
                    camera.reset();
                }
            });
    }

    fn draw_camera_spline(&mut self, ui: &Ui, scene: &mut Scene) {
        let mut playing = scene.spline_playing();
        let position = scene.camera().position();

        ui.window("Camera Spline")
            .position([465.0, 420.0], Condition::FirstUseEver)
            .always_auto_resize(true)
            .build(|| {
                let spline = &mut scene.spline;
                ui.text(format!("{} control points", spline.points().len()));
                for (i, p) in spline.points().iter().enumerate() {
                    ui.text(format!("{i}: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z));
                }
                ui.separator();

                if ui.button("Add Camera Position") {
                    spline.add_point(position);
                }
                ui.same_line();
                if ui.button("Clear") {
                    spline.clear();
                    playing = false;
                }

                ui.slider("Points Per Second", 0.05, 5.0, &mut spline.speed);
                ui.checkbox("Loop", &mut spline.looping);

                let label = if playing { "Stop" } else { "Play" };
                if ui.button(label) {
                    playing = !playing;
                }
                ui.text(format!("t = {:.2}", spline.time()));
            });

        scene.set_spline_playing(playing);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextureSlot {
    Color,
    NormalMap,
}

impl TextureSlot {
    fn window_title(self) -> &'static str {
        match self {
            TextureSlot::Color => "Texture Selection",
            TextureSlot::NormalMap => "Normal Map Selection",
        }
    }

    fn window_position(self) -> [f32; 2] {
        match self {
            TextureSlot::Color => [930.0, 470.0],
            TextureSlot::NormalMap => [700.0, 470.0],
        }
    }
}

fn color_edit(ui: &Ui, label: &str, color: &mut Vec4) {
    let mut rgba = color.to_array();
    if ui.color_edit4(label, &mut rgba) {
        *color = Vec4::from(rgba);
    }
}
