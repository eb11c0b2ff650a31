//! Keyboard and mouse state driving the camera.
//!
//! The window procedure records raw key and mouse events here; once per
//! frame [`CameraControls::apply`] and [`MouseLook::apply`] turn that state
//! into camera motion.

use glam::Vec2;

use crate::scene::Camera;

/// Win32 virtual-key codes used by the camera bindings.
pub mod vk {
    pub const SHIFT: u8 = 0x10;
    pub const ESCAPE: u8 = 0x1B;
    pub const SPACE: u8 = 0x20;
    pub const NUMPAD4: u8 = 0x64;
    pub const NUMPAD5: u8 = 0x65;
    pub const NUMPAD6: u8 = 0x66;
    pub const NUMPAD7: u8 = 0x67;
    pub const NUMPAD8: u8 = 0x68;
    pub const NUMPAD9: u8 = 0x69;
    pub const A: u8 = b'A';
    pub const D: u8 = b'D';
    pub const E: u8 = b'E';
    pub const Q: u8 = b'Q';
    pub const R: u8 = b'R';
    pub const S: u8 = b'S';
    pub const W: u8 = b'W';
}

/// Pressed state of every virtual key.
#[derive(Debug, Clone)]
pub struct KeyState {
    down: [bool; 256],
}

impl Default for KeyState {
    fn default() -> Self {
        Self { down: [false; 256] }
    }
}

impl KeyState {
    pub fn press(&mut self, key: u8) {
        self.down[key as usize] = true;
    }

    pub fn release(&mut self, key: u8) {
        self.down[key as usize] = false;
    }

    pub fn is_down(&self, key: u8) -> bool {
        self.down[key as usize]
    }

    /// Forget every pressed key, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.down = [false; 256];
    }
}

/// Right-button mouse look.
///
/// While active, the platform layer keeps the cursor hidden and snaps it
/// back to the client-area center after every move; the offsets from the
/// center accumulate here until the next frame.
#[derive(Debug, Clone, Default)]
pub struct MouseLook {
    active: bool,
    pending: Vec2,
}

impl MouseLook {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn begin(&mut self) {
        self.active = true;
        self.pending = Vec2::ZERO;
    }

    pub fn end(&mut self) {
        self.active = false;
        self.pending = Vec2::ZERO;
    }

    /// Record a cursor position. Returns `true` if the cursor should be
    /// re-centered.
    pub fn on_move(&mut self, cursor: Vec2, center: Vec2) -> bool {
        if !self.active {
            return false;
        }
        self.pending += cursor - center;
        true
    }

    /// Take the accumulated offset, in pixels.
    pub fn take_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.pending)
    }

    /// Turn the camera by the accumulated offset.
    pub fn apply(&mut self, camera: &mut Camera) {
        let delta = self.take_delta();
        if delta != Vec2::ZERO {
            camera.update_look_at(delta.x, delta.y);
        }
    }
}

/// What the application should do after input was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOutcome {
    Continue,
    Quit,
}

/// Keyboard camera bindings.
///
/// | Keys | Action |
/// |------|--------|
/// | W / S | forward / back |
/// | A / D | strafe left / right |
/// | E, Space / Q, Shift | up / down |
/// | Numpad 8 / 5 | pitch up / down |
/// | Numpad 4 / 6 | yaw left / right |
/// | Numpad 9 / 7 | roll |
/// | R | reset the camera |
/// | Escape | quit |
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraControls;

impl CameraControls {
    pub fn apply(&self, keys: &KeyState, camera: &mut Camera, dt: f32) -> ControlOutcome {
        let step = camera.move_speed * dt;
        let turn = camera.rotate_speed * dt;

        if keys.is_down(vk::W) {
            camera.move_forward(step);
        }
        if keys.is_down(vk::A) {
            camera.strafe_left(step);
        }
        if keys.is_down(vk::S) {
            camera.move_backward(step);
        }
        if keys.is_down(vk::D) {
            camera.strafe_right(step);
        }
        if keys.is_down(vk::E) || keys.is_down(vk::SPACE) {
            camera.move_up(step);
        }
        if keys.is_down(vk::Q) || keys.is_down(vk::SHIFT) {
            camera.move_down(step);
        }

        if keys.is_down(vk::NUMPAD8) {
            camera.rotate_pitch(-turn);
        }
        if keys.is_down(vk::NUMPAD5) {
            camera.rotate_pitch(turn);
        }
        if keys.is_down(vk::NUMPAD4) {
            camera.rotate_yaw(-turn);
        }
        if keys.is_down(vk::NUMPAD6) {
            camera.rotate_yaw(turn);
        }
        if keys.is_down(vk::NUMPAD9) {
            camera.rotate_roll(-turn);
        }
        if keys.is_down(vk::NUMPAD7) {
            camera.rotate_roll(turn);
        }

        if keys.is_down(vk::R) {
            camera.reset();
        }

        if keys.is_down(vk::ESCAPE) {
            ControlOutcome::Quit
        } else {
            ControlOutcome::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn camera() -> Camera {
        let mut camera = Camera::scene_default(100, 100);
        camera.move_speed = 2.0;
        camera.rotate_speed = 1.0;
        camera
    }

    #[test]
    fn keys_track_presses() {
        let mut keys = KeyState::default();
        keys.press(vk::W);
        assert!(keys.is_down(vk::W));
        keys.release(vk::W);
        assert!(!keys.is_down(vk::W));
        keys.press(255);
        keys.clear();
        assert!(!keys.is_down(255));
    }

    #[test]
    fn movement_scales_with_speed_and_dt() {
        let mut keys = KeyState::default();
        let mut cam = camera();
        keys.press(vk::W);
        keys.press(vk::SPACE);

        let outcome = CameraControls.apply(&keys, &mut cam, 0.5);
        assert_eq!(outcome, ControlOutcome::Continue);
        assert!((cam.position() - Vec3::new(0.0, 1.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut keys = KeyState::default();
        let mut cam = camera();
        keys.press(vk::E);
        keys.press(vk::Q);
        keys.press(vk::NUMPAD4);
        keys.press(vk::NUMPAD6);
        CameraControls.apply(&keys, &mut cam, 1.0);
        assert!((cam.position() - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-5);
        assert_eq!(cam.angles().x, 0.0);
    }

    #[test]
    fn numpad_eight_looks_up() {
        let mut keys = KeyState::default();
        let mut cam = camera();
        keys.press(vk::NUMPAD8);
        CameraControls.apply(&keys, &mut cam, 0.1);
        assert!(cam.forward().y > 0.0);
    }

    #[test]
    fn reset_and_quit() {
        let mut keys = KeyState::default();
        let mut cam = camera();
        cam.move_forward(10.0);
        keys.press(vk::R);
        keys.press(vk::ESCAPE);
        assert_eq!(CameraControls.apply(&keys, &mut cam, 0.016), ControlOutcome::Quit);
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, 4.0));
    }

    #[test]
    fn mouse_look_accumulates_only_while_active() {
        let mut look = MouseLook::default();
        let center = Vec2::new(640.0, 360.0);
        assert!(!look.on_move(Vec2::new(650.0, 360.0), center));
        assert_eq!(look.take_delta(), Vec2::ZERO);

        look.begin();
        assert!(look.on_move(Vec2::new(650.0, 360.0), center));
        assert!(look.on_move(Vec2::new(645.0, 350.0), center));
        assert_eq!(look.take_delta(), Vec2::new(15.0, -10.0));
        assert_eq!(look.take_delta(), Vec2::ZERO);

        let mut cam = camera();
        look.on_move(Vec2::new(740.0, 360.0), center);
        look.apply(&mut cam);
        assert!((cam.angles().x - 100.0 * cam.sensitivity).abs() < 1e-6);

        look.end();
        assert!(!look.is_active());
    }
}
