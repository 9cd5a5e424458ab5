/// Constant-acceleration kinematics attached to meshes
use crate::geometry::Vector;

/// Velocity and acceleration carried by a kinematic mesh
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Kinematics {
    pub velocity: Vector,
    pub acceleration: Vector,
    /// Reserved for force-based integration; the step below ignores it.
    pub mass: Option<f64>,
}

impl Kinematics {
    pub fn new(velocity: Vector, acceleration: Vector) -> Self {
        Self {
            velocity,
            acceleration,
            mass: None,
        }
    }

    pub fn with_velocity(velocity: Vector) -> Self {
        Self::new(velocity, Vector::zeros())
    }

    pub fn with_acceleration(acceleration: Vector) -> Self {
        Self::new(Vector::zeros(), acceleration)
    }

    /// Advance by `dt` seconds and return the displacement to apply.
    ///
    /// `s = u*t + a*t*t/2`, then `v = u + a*t`. Exact for acceleration that
    /// is constant over the step.
    pub fn step(&mut self, dt: f64) -> Vector {
        let displacement = self.velocity * dt + self.acceleration * (0.5 * dt * dt);
        self.velocity += self.acceleration * dt;
        displacement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_at_rest() {
        let mut body = Kinematics::default();
        assert_eq!(body.step(3.0), Vector::zeros());
        assert_eq!(body.velocity, Vector::zeros());
        assert_eq!(body.mass, None);
    }

    #[test]
    fn test_constant_velocity() {
        let mut body = Kinematics::with_velocity(Vector::new(1.0, 0.0, 0.0));
        assert_eq!(body.step(2.0), Vector::new(2.0, 0.0, 0.0));
        assert_eq!(body.velocity, Vector::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_constant_acceleration() {
        let mut body = Kinematics::with_acceleration(Vector::new(0.0, -10.0, 0.0));
        assert_eq!(body.step(1.0), Vector::new(0.0, -5.0, 0.0));
        assert_eq!(body.velocity, Vector::new(0.0, -10.0, 0.0));
    }

    #[test]
    fn test_split_steps_match_single_step() {
        let start = Kinematics::new(Vector::new(0.0, 10.0, -1.5), Vector::new(0.0, -9.81, 0.0));

        let mut whole = start;
        let total = whole.step(1.0);

        let mut split = start;
        let parts = split.step(0.25) + split.step(0.5) + split.step(0.25);

        assert!((total - parts).norm() < 1e-12);
        assert!((whole.velocity - split.velocity).norm() < 1e-12);
    }
}
