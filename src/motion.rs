// motion.rs
use glam::Vec3;
use crate::transform::ObjectTransform;

/// Per-object kinematics applied once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Motion {
    pub velocity: Vec3,
    pub acceleration: Vec3,
    /// Euler XYZ radians per second.
    pub spin: Vec3,
}

impl Motion {
    pub fn spinning(spin: Vec3) -> Self {
        Self { spin, ..Self::default() }
    }

    pub fn is_still(&self) -> bool {
        self.velocity == Vec3::ZERO && self.acceleration == Vec3::ZERO && self.spin == Vec3::ZERO
    }

    /// Explicit Euler step: the transform moves with the velocity it had at the
    /// start of the frame, then the velocity picks up this frame's acceleration.
    pub fn integrate(&mut self, transform: &mut ObjectTransform, dt: f32) {
        if self.is_still() {
            return;
        }
        transform.translate(self.velocity * dt);
        if self.spin != Vec3::ZERO {
            transform.rotate(self.spin * dt);
            // Keep angles within one turn so long runs keep their precision
            let wrapped = transform.rotation() % std::f32::consts::TAU;
            if wrapped != transform.rotation() {
                transform.set_rotation(wrapped);
            }
        }
        self.velocity += self.acceleration * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn constant_velocity_moves_linearly() {
        let mut transform = ObjectTransform::new(Vec3::new(0.0, 0.5, -0.5), Vec3::ZERO, Vec3::ONE);
        let mut motion = Motion { velocity: Vec3::new(0.0, -1.0, 0.0), ..Motion::default() };
        for _ in 0..4 {
            motion.integrate(&mut transform, 0.25);
        }
        assert!(close(transform.position(), Vec3::new(0.0, -0.5, -0.5)));
        assert_eq!(motion.velocity, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn acceleration_applies_after_the_move() {
        let mut transform = ObjectTransform::default();
        let mut motion = Motion { acceleration: Vec3::new(2.0, 0.0, 0.0), ..Motion::default() };

        motion.integrate(&mut transform, 0.5);
        assert_eq!(transform.position(), Vec3::ZERO);
        assert_eq!(motion.velocity, Vec3::new(1.0, 0.0, 0.0));

        motion.integrate(&mut transform, 0.5);
        assert!(close(transform.position(), Vec3::new(0.5, 0.0, 0.0)));
        assert_eq!(motion.velocity, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn spin_rotates_and_updates_model() {
        let mut transform = ObjectTransform::default();
        let mut motion = Motion::spinning(Vec3::new(0.0, 0.0, std::f32::consts::PI));
        motion.integrate(&mut transform, 0.5);
        assert!(close(transform.rotation(), Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2)));
        assert!(close(transform.model().transform_point3(Vec3::X), Vec3::Y));
        assert!(close(transform.uniform().model().transform_point3(Vec3::X), Vec3::Y));
    }

    #[test]
    fn spin_wraps_after_a_full_turn() {
        let mut transform = ObjectTransform::default();
        let mut motion = Motion::spinning(Vec3::new(0.0, std::f32::consts::PI, 0.0));
        for _ in 0..6 {
            motion.integrate(&mut transform, 0.5);
        }
        // 3π of spin lands at π, inside one turn.
        assert!((transform.rotation().y - std::f32::consts::PI).abs() < 1e-4);
        assert!(close(transform.model().transform_point3(Vec3::X), -Vec3::X));
    }

    #[test]
    fn still_motion_leaves_transform_untouched() {
        let mut transform = ObjectTransform::new(Vec3::ONE, Vec3::ZERO, Vec3::ONE);
        let before = transform.clone();
        let mut motion = Motion::default();
        assert!(motion.is_still());
        motion.integrate(&mut transform, 0.1);
        assert_eq!(transform, before);
    }
}
