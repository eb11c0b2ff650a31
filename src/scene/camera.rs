use std::f32::consts::FRAC_PI_4;

use glam::{Mat4, Quat, Vec3};

const NEAR: f32 = 0.01;
const FAR: f32 = 100.0;
const MAX_PITCH: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// First person camera.
///
/// The orientation is kept as yaw, pitch and roll relative to the initial
/// basis so that [`Camera::reset`] is exact and pitch can be clamped.
/// Positive yaw turns right, positive pitch looks down.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    roll: f32,

    initial_position: Vec3,
    base_forward: Vec3,
    base_up: Vec3,
    base_right: Vec3,

    aspect: f32,

    /// Translation speed, in units per second.
    pub move_speed: f32,
    /// Keyboard rotation speed, in radians per second.
    pub rotate_speed: f32,
    /// Radians of rotation per pixel of mouse movement.
    pub sensitivity: f32,
}

impl Camera {
    pub fn new(position: Vec3, forward: Vec3, up: Vec3, width: u32, height: u32) -> Self {
        let base_forward = forward.normalize_or(Vec3::Z);
        let base_right = up.cross(base_forward).normalize_or(Vec3::X);
        let base_up = base_forward.cross(base_right);

        let mut camera = Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            initial_position: position,
            base_forward,
            base_up,
            base_right,
            aspect: 1.0,
            move_speed: 5.0,
            rotate_speed: 1.5,
            sensitivity: 0.002,
        };
        camera.set_viewport(width, height);
        camera
    }

    /// The sandbox's starting camera: four units back, looking at the origin.
    pub fn scene_default(width: u32, height: u32) -> Self {
        Self::new(Vec3::new(0.0, 0.0, 4.0), Vec3::NEG_Z, Vec3::Y, width, height)
    }

    fn orientation(&self) -> Quat {
        Quat::from_axis_angle(self.base_up, self.yaw)
            * Quat::from_axis_angle(self.base_right, self.pitch)
            * Quat::from_axis_angle(self.base_forward, self.roll)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation() * self.base_forward
    }

    pub fn up(&self) -> Vec3 {
        self.orientation() * self.base_up
    }

    pub fn right(&self) -> Vec3 {
        self.orientation() * self.base_right
    }

    /// Yaw, pitch and roll in radians.
    pub fn angles(&self) -> Vec3 {
        Vec3::new(self.yaw, self.pitch, self.roll)
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn move_forward(&mut self, amount: f32) {
        self.position += self.forward() * amount;
    }

    pub fn move_backward(&mut self, amount: f32) {
        self.move_forward(-amount);
    }

    pub fn strafe_right(&mut self, amount: f32) {
        self.position += self.right() * amount;
    }

    pub fn strafe_left(&mut self, amount: f32) {
        self.strafe_right(-amount);
    }

    pub fn move_up(&mut self, amount: f32) {
        self.position += self.up() * amount;
    }

    pub fn move_down(&mut self, amount: f32) {
        self.move_up(-amount);
    }

    pub fn rotate_yaw(&mut self, radians: f32) {
        self.yaw += radians;
    }

    pub fn rotate_pitch(&mut self, radians: f32) {
        self.pitch = (self.pitch + radians).clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn rotate_roll(&mut self, radians: f32) {
        self.roll += radians;
    }

    /// Turn by a mouse movement, in pixels.
    pub fn update_look_at(&mut self, dx: f32, dy: f32) {
        self.rotate_yaw(dx * self.sensitivity);
        self.rotate_pitch(dy * self.sensitivity);
    }

    /// Point the camera along `direction`, keeping the roll.
    pub fn look_along(&mut self, direction: Vec3) {
        let Some(dir) = direction.try_normalize() else { return };
        let f = dir.dot(self.base_forward);
        let r = dir.dot(self.base_right);
        let u = dir.dot(self.base_up);

        self.yaw = r.atan2(f);
        self.pitch = (-u.clamp(-1.0, 1.0).asin()).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Back to the position and orientation the camera was created with.
    pub fn reset(&mut self) {
        self.position = self.initial_position;
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.roll = 0.0;
    }

    /// Update the aspect ratio. A zero height is ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_to_lh(self.position, self.forward(), self.up())
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_lh(FRAC_PI_4, self.aspect, NEAR, FAR)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4Swizzles;

    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-4
    }

    #[test]
    fn starts_looking_down_negative_z() {
        let camera = Camera::scene_default(1280, 720);
        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 4.0));
        assert!(approx(camera.forward(), Vec3::NEG_Z));
        assert!(approx(camera.up(), Vec3::Y));
        assert!((camera.aspect() - 1280.0 / 720.0).abs() < 1e-6);
    }

    #[test]
    fn origin_projects_to_the_screen_center() {
        let camera = Camera::scene_default(800, 600);
        let clip = camera.view_projection() * Vec3::ZERO.extend(1.0);
        let ndc = clip.xyz() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0, "{ndc}");
    }

    #[test]
    fn movement_follows_the_orientation() {
        let mut camera = Camera::scene_default(100, 100);
        camera.move_forward(1.0);
        assert!(approx(camera.position(), Vec3::new(0.0, 0.0, 3.0)));

        camera.move_up(2.0);
        camera.move_down(1.0);
        assert!(approx(camera.position(), Vec3::new(0.0, 1.0, 3.0)));

        // Turning right by 90 degrees while looking down -Z faces -X.
        camera.rotate_yaw(std::f32::consts::FRAC_PI_2);
        assert!(approx(camera.forward(), Vec3::NEG_X));
        camera.move_backward(1.0);
        assert!(approx(camera.position(), Vec3::new(1.0, 1.0, 3.0)));
    }

    #[test]
    fn strafing_is_perpendicular_to_forward() {
        let mut camera = Camera::scene_default(100, 100);
        camera.strafe_right(1.0);
        camera.strafe_left(3.0);
        let moved = camera.position() - Vec3::new(0.0, 0.0, 4.0);
        assert!(moved.dot(camera.forward()).abs() < 1e-5);
        assert!((moved.length() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::scene_default(100, 100);
        camera.update_look_at(0.0, 1.0e6);
        assert!((camera.angles().y - MAX_PITCH).abs() < 1e-6);
        // Positive pitch looks down.
        assert!(camera.forward().y < 0.0);

        camera.rotate_pitch(-10.0);
        assert!((camera.angles().y + MAX_PITCH).abs() < 1e-6);
    }

    #[test]
    fn reset_restores_the_start() {
        let mut camera = Camera::scene_default(100, 100);
        let start = camera.clone();
        camera.move_forward(3.0);
        camera.rotate_yaw(1.0);
        camera.rotate_roll(0.5);
        camera.reset();
        assert_eq!(camera, start);
    }

    #[test]
    fn look_along_matches_forward() {
        let mut camera = Camera::scene_default(100, 100);
        let dir = Vec3::new(1.0, -0.5, 2.0).normalize();
        camera.look_along(dir);
        assert!(approx(camera.forward(), dir), "{}", camera.forward());
    }

    #[test]
    fn zero_height_keeps_the_aspect() {
        let mut camera = Camera::scene_default(200, 100);
        camera.set_viewport(300, 0);
        assert_eq!(camera.aspect(), 2.0);
    }
}
