/// Orientation state and the fixed-order rotation used by cameras and meshes
use nalgebra::{Point3, Rotation3, Vector3};

/// Rotation angles around the three axes (in radians)
///
/// `x` is pitch, `y` is yaw and `z` is roll. Angles are never wrapped or
/// clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationState {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for the rotation pipeline
pub struct Transform;

impl Transform {
    /// Rotation about Y, then X, then Z.
    ///
    /// Composition order is fixed; changing it changes every projected frame.
    pub fn rotation(rotation: &RotationState) -> Rotation3<f64> {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), rotation.x);
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), rotation.y);
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), rotation.z);

        rz * rx * ry
    }

    /// Move a point into the frame of an observer at `origin` with `rotation`
    pub fn to_view_space(
        point: &Point3<f64>,
        origin: &Point3<f64>,
        rotation: &Rotation3<f64>,
    ) -> Point3<f64> {
        Point3::from(rotation * (point - origin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn assert_close(a: Point3<f64>, b: Point3<f64>) {
        assert!((a - b).norm() < 1e-9, "{a} != {b}");
    }

    /// The same pipeline written out one axis at a time.
    fn rotate_by_hand(p: Point3<f64>, r: &RotationState) -> Point3<f64> {
        let (sx, cx) = r.x.sin_cos();
        let (sy, cy) = r.y.sin_cos();
        let (sz, cz) = r.z.sin_cos();

        let z1 = p.z * cy - p.x * sy;
        let x1 = p.z * sy + p.x * cy;
        let y1 = p.y * cx - z1 * sx;
        let z2 = p.y * sx + z1 * cx;
        let x2 = x1 * cz - y1 * sz;
        let y2 = x1 * sz + y1 * cz;
        Point3::new(x2, y2, z2)
    }

    #[test]
    fn test_rotation_state() {
        let mut state = RotationState::zero();
        assert!(state.is_zero());

        state.rotate(0.1, 0.2, 0.3);
        assert!((state.x - 0.1).abs() < 1e-12);
        assert!((state.y - 0.2).abs() < 1e-12);
        assert!((state.z - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_is_unbounded() {
        let mut state = RotationState::zero();
        for _ in 0..100 {
            state.rotate(1.0, 0.0, -1.0);
        }
        assert_eq!(state.x, 100.0);
        assert_eq!(state.z, -100.0);
    }

    #[test]
    fn test_identity_rotation() {
        let rotation = Transform::rotation(&RotationState::zero());
        assert!((rotation.matrix() - nalgebra::Matrix3::identity()).norm() < 1e-12);
    }

    #[test]
    fn test_quarter_turn_about_y() {
        let rotation = Transform::rotation(&RotationState::new(0.0, FRAC_PI_2, 0.0));
        assert_close(rotation * Point3::new(0.0, 0.0, 1.0), Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_composition_order_matches_axis_by_axis() {
        let state = RotationState::new(0.4, -1.1, 2.3);
        let rotation = Transform::rotation(&state);
        let p = Point3::new(1.5, -2.0, 0.25);
        assert_close(rotation * p, rotate_by_hand(p, &state));
    }

    #[test]
    fn test_view_space_translates_first() {
        let origin = Point3::new(1.0, 2.0, 3.0);
        let rotation = Transform::rotation(&RotationState::zero());
        let p = Transform::to_view_space(&Point3::new(1.0, 2.0, 8.0), &origin, &rotation);
        assert_close(p, Point3::new(0.0, 0.0, 5.0));
    }
}
