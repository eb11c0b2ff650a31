//! Screen-space manipulation handles.
//!
//! The inspector draws three axis handles on the selected object with the
//! imgui foreground draw list. This module holds the geometry: projecting
//! the handles, hit-testing them against the mouse, and turning a mouse drag
//! into a new world matrix.

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

/// What dragging a handle does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl GizmoMode {
    pub const ALL: [GizmoMode; 3] = [GizmoMode::Translate, GizmoMode::Rotate, GizmoMode::Scale];

    pub fn name(self) -> &'static str {
        match self {
            GizmoMode::Translate => "Translate",
            GizmoMode::Rotate => "Rotate",
            GizmoMode::Scale => "Scale",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoAxis {
    X,
    Y,
    Z,
}

impl GizmoAxis {
    pub const ALL: [GizmoAxis; 3] = [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z];

    pub fn unit(self) -> Vec3 {
        match self {
            GizmoAxis::X => Vec3::X,
            GizmoAxis::Y => Vec3::Y,
            GizmoAxis::Z => Vec3::Z,
        }
    }

    /// Handle color, RGBA.
    pub fn color(self) -> [f32; 4] {
        match self {
            GizmoAxis::X => [0.9, 0.2, 0.2, 1.0],
            GizmoAxis::Y => [0.2, 0.9, 0.2, 1.0],
            GizmoAxis::Z => [0.2, 0.4, 1.0, 1.0],
        }
    }
}

/// Map a world-space point to pixel coordinates, origin top-left.
///
/// Returns `None` for points on or behind the camera plane.
pub fn project(view_proj: Mat4, point: Vec3, viewport: Vec2) -> Option<Vec2> {
    let clip = view_proj * point.extend(1.0);
    if clip.w <= f32::EPSILON {
        return None;
    }
    let ndc = clip.xy() / clip.w;
    Some(Vec2::new((ndc.x + 1.0) * 0.5 * viewport.x, (1.0 - ndc.y) * 0.5 * viewport.y))
}

/// One projected axis handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisHandle {
    pub axis: GizmoAxis,
    pub start: Vec2,
    pub end: Vec2,
    /// Length of the handle in world units.
    pub length: f32,
}

impl AxisHandle {
    /// Unit screen direction of the handle, or zero if it is seen end-on.
    pub fn screen_direction(&self) -> Vec2 {
        (self.end - self.start).normalize_or_zero()
    }

    /// World units covered by one pixel along the handle.
    pub fn world_per_pixel(&self) -> f32 {
        let pixels = self.start.distance(self.end);
        if pixels > f32::EPSILON {
            self.length / pixels
        } else {
            0.0
        }
    }
}

/// Project the three axis handles of the object at `world`.
///
/// Translation handles follow the world axes; rotation and scale handles
/// follow the object's own axes. Handles whose tip is behind the camera are
/// left out. Returns an empty list if the object origin is behind the
/// camera.
pub fn axis_handles(
    mode: GizmoMode,
    world: Mat4,
    view_proj: Mat4,
    viewport: Vec2,
    length: f32,
) -> Vec<AxisHandle> {
    let origin = world.w_axis.xyz();
    let Some(start) = project(view_proj, origin, viewport) else {
        return Vec::new();
    };

    GizmoAxis::ALL
        .into_iter()
        .filter_map(|axis| {
            let dir = match mode {
                GizmoMode::Translate => axis.unit(),
                GizmoMode::Rotate | GizmoMode::Scale => {
                    world.transform_vector3(axis.unit()).normalize_or(axis.unit())
                },
            };
            let end = project(view_proj, origin + dir * length, viewport)?;
            Some(AxisHandle { axis, start, end, length })
        })
        .collect()
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Find the handle under the mouse.
///
/// A handle tip within `radius` wins over a handle body; among several
/// candidates the closest one is picked.
pub fn pick_axis(handles: &[AxisHandle], mouse: Vec2, radius: f32) -> Option<GizmoAxis> {
    let closest = |distance: &dyn Fn(&AxisHandle) -> f32| {
        handles
            .iter()
            .map(|h| (h.axis, distance(h)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(axis, _)| axis)
    };

    closest(&|h: &AxisHandle| h.end.distance(mouse))
        .or_else(|| closest(&|h: &AxisHandle| distance_to_segment(mouse, h.start, h.end)))
}

/// Amount moved along a handle: the mouse delta projected on the handle's
/// screen direction, scaled to world units.
pub fn drag_delta(axis_screen_dir: Vec2, mouse_delta: Vec2, world_per_pixel: f32) -> f32 {
    match axis_screen_dir.try_normalize() {
        Some(dir) => dir.dot(mouse_delta) * world_per_pixel,
        None => 0.0,
    }
}

/// Apply a drag of `amount` along `axis` to `world`.
///
/// Translation is along the world axis. Rotation, in degrees, and scale are
/// around the object's own axis. Scale factors are kept at 0.01 or more.
pub fn apply(mode: GizmoMode, axis: GizmoAxis, amount: f32, world: Mat4) -> Mat4 {
    let unit = axis.unit();
    match mode {
        GizmoMode::Translate => Mat4::from_translation(unit * amount) * world,
        GizmoMode::Rotate => world * Mat4::from_axis_angle(unit, amount.to_radians()),
        GizmoMode::Scale => {
            let factor = (1.0 + amount).max(0.01);
            world * Mat4::from_scale(Vec3::ONE + unit * (factor - 1.0))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Camera;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    fn view_proj() -> Mat4 {
        Camera::scene_default(800, 600).view_projection()
    }

    #[test]
    fn origin_projects_to_the_center() {
        let p = project(view_proj(), Vec3::ZERO, VIEWPORT).unwrap();
        assert!((p - Vec2::new(400.0, 300.0)).length() < 1e-3, "{p}");

        // The default camera looks down -Z, so +Y is up on screen.
        let up = project(view_proj(), Vec3::Y, VIEWPORT).unwrap();
        assert!(up.y < p.y);
    }

    #[test]
    fn points_behind_the_camera_are_not_projected() {
        assert_eq!(project(view_proj(), Vec3::new(0.0, 0.0, 10.0), VIEWPORT), None);
    }

    #[test]
    fn handles_and_picking() {
        let handles =
            axis_handles(GizmoMode::Translate, Mat4::IDENTITY, view_proj(), VIEWPORT, 1.0);
        assert_eq!(handles.len(), 3);

        let y = handles[1];
        assert_eq!(y.axis, GizmoAxis::Y);
        assert_eq!(pick_axis(&handles, y.end + Vec2::new(2.0, 0.0), 6.0), Some(GizmoAxis::Y));

        let x = handles[0];
        let mid = (x.start + x.end) * 0.5 + Vec2::new(0.0, 3.0);
        assert_eq!(pick_axis(&handles, mid, 6.0), Some(GizmoAxis::X));

        assert_eq!(pick_axis(&handles, Vec2::ZERO, 6.0), None);
    }

    #[test]
    fn drag_projects_on_the_axis() {
        let amount = drag_delta(Vec2::new(2.0, 0.0), Vec2::new(10.0, 5.0), 0.1);
        assert!((amount - 1.0).abs() < 1e-6);
        assert_eq!(drag_delta(Vec2::ZERO, Vec2::new(10.0, 5.0), 0.1), 0.0);
    }

    #[test]
    fn apply_modes() {
        let world = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0))
            * Mat4::from_rotation_z(90f32.to_radians());

        let moved = apply(GizmoMode::Translate, GizmoAxis::X, 2.0, world);
        assert!((moved.w_axis.xyz() - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-5);

        // Local X of `world` points along world +Y.
        let scaled = apply(GizmoMode::Scale, GizmoAxis::X, 1.0, world);
        let tip = scaled.transform_point3(Vec3::X);
        assert!((tip - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5, "{tip}");

        let flattened = apply(GizmoMode::Scale, GizmoAxis::Y, -5.0, Mat4::IDENTITY);
        assert!((flattened.y_axis.y - 0.01).abs() < 1e-6);

        let rotated = apply(GizmoMode::Rotate, GizmoAxis::Z, 90.0, Mat4::IDENTITY);
        assert!((rotated.transform_vector3(Vec3::X) - Vec3::Y).length() < 1e-5);
    }
}
