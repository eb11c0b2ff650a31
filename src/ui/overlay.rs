use glam::Vec2;
use imgui::{MouseButton, Ui};

use super::Inspector;
use crate::gizmo::{self, GizmoMode};
use crate::scene::Scene;

const HANDLE_LENGTH: f32 = 1.0;
const PICK_RADIUS: f32 = 8.0;
const ROTATE_DEGREES_PER_PIXEL: f32 = 0.5;

impl Inspector {
    /// Draw the axis handles of the selected object and drag it with them.
    pub(super) fn draw_gizmo(&mut self, ui: &Ui, scene: &mut Scene) {
        let Some(index) = self.selected_object else { return };
        let view_proj = scene.camera().view_projection();
        let Some(obj) = scene.object_mut(index) else { return };

        let io = ui.io();
        let viewport = Vec2::from(io.display_size);
        let mouse = Vec2::from(io.mouse_pos);

        let handles =
            gizmo::axis_handles(self.gizmo_mode, obj.world(), view_proj, viewport, HANDLE_LENGTH);

        let draw_list = ui.get_foreground_draw_list();
        for handle in &handles {
            let mut color = handle.axis.color();
            if self.drag_axis == Some(handle.axis) {
                color = [1.0, 1.0, 0.3, 1.0];
            }
            draw_list
                .add_line(handle.start.to_array(), handle.end.to_array(), color)
                .thickness(3.0)
                .build();
            draw_list.add_circle(handle.end.to_array(), 5.0, color).filled(true).build();
        }

        if !ui.is_mouse_down(MouseButton::Left) {
            self.drag_axis = None;
            return;
        }

        if ui.is_mouse_clicked(MouseButton::Left) && !io.want_capture_mouse {
            self.drag_axis = gizmo::pick_axis(&handles, mouse, PICK_RADIUS);
        }

        let Some(axis) = self.drag_axis else { return };
        let Some(handle) = handles.iter().find(|h| h.axis == axis) else { return };
        let mouse_delta = Vec2::from(io.mouse_delta);
        if mouse_delta == Vec2::ZERO {
            return;
        }

        let amount = match self.gizmo_mode {
            // Dragging across the handle turns around it.
            GizmoMode::Rotate => gizmo::drag_delta(
                handle.screen_direction().perp(),
                mouse_delta,
                ROTATE_DEGREES_PER_PIXEL,
            ),
            GizmoMode::Translate | GizmoMode::Scale => {
                gizmo::drag_delta(handle.screen_direction(), mouse_delta, handle.world_per_pixel())
            },
        };

        let world = gizmo::apply(self.gizmo_mode, axis, amount, obj.world());
        obj.set_transform(world);
    }
}
