// camera.rs
use glam::{Mat4, Vec3};
use crate::config;

/// Fixed look-at camera feeding the projection and view uniforms.
#[derive(Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub aspect: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Vec3::from_array(config::CAMERA_EYE),
            target: Vec3::from_array(config::CAMERA_TARGET),
            aspect,
        }
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(config::FOV_Y.to_radians(), self.aspect, config::Z_NEAR, config::Z_FAR)
    }
}
