use glam::Vec3;

/// Catmull-Rom path the camera can fly along.
///
/// The playback parameter runs from 0 at the first control point to
/// `points.len() - 1` at the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSpline {
    points: Vec<Vec3>,
    t: f32,
    /// Control points traversed per second.
    pub speed: f32,
    /// Restart from the first point instead of stopping at the last one.
    pub looping: bool,
}

impl Default for CameraSpline {
    fn default() -> Self {
        Self { points: Vec::new(), t: 0.0, speed: 0.5, looping: false }
    }
}

impl CameraSpline {
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn add_point(&mut self, point: Vec3) {
        self.points.push(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.t = 0.0;
    }

    pub fn time(&self) -> f32 {
        self.t
    }

    pub fn rewind(&mut self) {
        self.t = 0.0;
    }

    fn segments(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Playback reached the last point of a non-looping path.
    pub fn is_finished(&self) -> bool {
        self.segments() == 0 || (!self.looping && self.t >= self.segments() as f32)
    }

    // Control points around segment `i`, end points duplicated.
    fn segment(&self, t: f32) -> Option<([Vec3; 4], f32)> {
        let segments = self.segments();
        if segments == 0 {
            return None;
        }

        let t = t.clamp(0.0, segments as f32);
        let i = (t.floor() as usize).min(segments - 1);
        let u = t - i as f32;

        let p = |k: isize| {
            let k = (i as isize + k).clamp(0, segments as isize) as usize;
            self.points[k]
        };
        Some(([p(-1), p(0), p(1), p(2)], u))
    }

    /// Position at parameter `t`, or `None` with fewer than two points.
    pub fn sample(&self, t: f32) -> Option<Vec3> {
        let ([p0, p1, p2, p3], u) = self.segment(t)?;
        let (u2, u3) = (u * u, u * u * u);
        Some(
            0.5 * (2.0 * p1
                + (p2 - p0) * u
                + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * u2
                + (3.0 * p1 - p0 - 3.0 * p2 + p3) * u3),
        )
    }

    /// Direction of travel at parameter `t`.
    pub fn tangent(&self, t: f32) -> Option<Vec3> {
        let ([p0, p1, p2, p3], u) = self.segment(t)?;
        let d = 0.5
            * ((p2 - p0)
                + 2.0 * (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * u
                + 3.0 * (3.0 * p1 - p0 - 3.0 * p2 + p3) * u * u);
        d.try_normalize()
    }

    /// Move the playback parameter forward by `dt` seconds and return the
    /// new position.
    pub fn advance(&mut self, dt: f32) -> Option<Vec3> {
        let end = self.segments() as f32;
        if end == 0.0 {
            return None;
        }

        self.t += self.speed * dt;
        if self.t >= end {
            self.t = if self.looping { self.t % end } else { end };
        }
        self.sample(self.t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spline(points: &[Vec3]) -> CameraSpline {
        let mut s = CameraSpline::default();
        for p in points {
            s.add_point(*p);
        }
        s
    }

    #[test]
    fn needs_two_points() {
        let mut s = spline(&[Vec3::ONE]);
        assert_eq!(s.sample(0.0), None);
        assert_eq!(s.advance(1.0), None);
        assert!(s.is_finished());
    }

    #[test]
    fn passes_through_control_points() {
        let points = [Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y];
        let s = spline(&points);
        for (i, p) in points.iter().enumerate() {
            let sampled = s.sample(i as f32).unwrap();
            assert!((sampled - *p).length() < 1e-5, "{i}: {sampled}");
        }
    }

    #[test]
    fn straight_line_stays_straight() {
        let s = spline(&[Vec3::ZERO, Vec3::X, Vec3::X * 2.0]);
        let mid = s.sample(0.5).unwrap();
        assert!(mid.y.abs() < 1e-6 && mid.z.abs() < 1e-6);
        assert!((s.tangent(0.5).unwrap() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn playback_stops_or_loops_at_the_end() {
        let mut s = spline(&[Vec3::ZERO, Vec3::X, Vec3::X * 2.0]);
        s.speed = 1.0;

        assert!(!s.is_finished());
        let end = s.advance(5.0).unwrap();
        assert!((end - Vec3::X * 2.0).length() < 1e-5);
        assert!(s.is_finished());

        s.rewind();
        s.looping = true;
        s.advance(2.5);
        assert!((s.time() - 0.5).abs() < 1e-5);
        assert!(!s.is_finished());
    }
}
