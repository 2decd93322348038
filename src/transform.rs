// transform.rs
use glam::{EulerRot, Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use crate::uniforms::{GlobalUniforms, TransformUniform};

/// Which matrices sit between object space and clip space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformProfile {
    /// `projection * view * model * p`
    Full,
    /// `projection * view * p`
    Camera,
    /// `p` as-is, no camera uniforms bound.
    Identity,
}

impl TransformProfile {
    pub fn binds_camera(self) -> bool {
        !matches!(self, TransformProfile::Identity)
    }

    pub fn binds_transform(self) -> bool {
        matches!(self, TransformProfile::Full)
    }
}

/// Moves a (possibly deformed) object-space position into clip space.
///
/// Products are evaluated left to right, the same association the shader
/// uses, so CPU and GPU round identically.
#[inline]
pub fn to_clip(profile: TransformProfile, globals: &GlobalUniforms, model: &TransformUniform, p: Vec3) -> Vec4 {
    let p = p.extend(1.0);
    match profile {
        TransformProfile::Full => globals.projection() * globals.view() * model.model() * p,
        TransformProfile::Camera => globals.projection() * globals.view() * p,
        TransformProfile::Identity => p,
    }
}

/// Position / rotation / scale of one drawable, composed as `T * R * S`.
///
/// The model matrix is cached, so all changes go through the mutators.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTransform {
    position: Vec3,
    rotation: Vec3, // euler XYZ, radians
    scale: Vec3,
    model: Mat4,
}

impl ObjectTransform {
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        let mut t = Self { position, rotation, scale, model: Mat4::IDENTITY };
        t.update_model_matrix();
        t
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.update_model_matrix();
    }

    pub fn rotate(&mut self, delta: Vec3) {
        self.rotation += delta;
        self.update_model_matrix();
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.update_model_matrix();
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.update_model_matrix();
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.update_model_matrix();
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn model(&self) -> Mat4 {
        self.model
    }

    pub fn uniform(&self) -> TransformUniform {
        TransformUniform::from_mat4(self.model())
    }

    fn update_model_matrix(&mut self) {
        self.model = Mat4::from_translation(self.position)
            * Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
            * Mat4::from_scale(self.scale);
    }
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO, Vec3::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn identity_matrices_leave_position_with_unit_w() {
        let globals = GlobalUniforms::identity(3.0);
        let p = Vec3::new(0.25, -1.5, 7.0);
        for profile in [TransformProfile::Full, TransformProfile::Camera, TransformProfile::Identity] {
            assert_eq!(to_clip(profile, &globals, &TransformUniform::IDENTITY, p), Vec4::new(0.25, -1.5, 7.0, 1.0));
        }
    }

    #[test]
    fn camera_profile_ignores_model() {
        let globals = GlobalUniforms::identity(0.0);
        let model = TransformUniform::from_mat4(Mat4::from_translation(Vec3::X * 5.0));
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(to_clip(TransformProfile::Camera, &globals, &model, p), Vec4::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(to_clip(TransformProfile::Full, &globals, &model, p), Vec4::new(6.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn identity_profile_ignores_camera() {
        let globals = GlobalUniforms::new(0.0, Mat4::from_scale(Vec3::splat(4.0)), Mat4::from_translation(Vec3::Y));
        let p = Vec3::new(1.0, 1.0, 1.0);
        assert_eq!(to_clip(TransformProfile::Identity, &globals, &TransformUniform::IDENTITY, p), Vec4::ONE);
    }

    #[test]
    fn projection_is_applied_last() {
        // Scale then translate differs from translate then scale.
        let projection = Mat4::from_scale(Vec3::splat(2.0));
        let view = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let globals = GlobalUniforms::new(0.0, projection, view);
        let clip = to_clip(TransformProfile::Camera, &globals, &TransformUniform::IDENTITY, Vec3::ZERO);
        assert_eq!(clip, Vec4::new(2.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn perspective_chain_produces_positive_w_in_front_of_camera() {
        let projection = Mat4::perspective_rh(45f32.to_radians(), 1.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y);
        let globals = GlobalUniforms::new(0.0, projection, view);
        let clip = to_clip(TransformProfile::Full, &globals, &TransformUniform::IDENTITY, Vec3::ZERO);
        assert!(approx(clip, projection * view * Vec4::W));
        assert!(clip.w > 0.0);
    }

    #[test]
    fn object_transform_composes_trs() {
        let mut t = ObjectTransform::new(Vec3::new(0.0, -2.0, 0.0), Vec3::ZERO, Vec3::splat(20.0));
        assert_eq!(t.model().transform_point3(Vec3::X), Vec3::new(20.0, -2.0, 0.0));

        t.translate(Vec3::Y);
        t.set_scale(Vec3::splat(10.0));
        assert_eq!(t.model().transform_point3(Vec3::X), Vec3::new(10.0, -1.0, 0.0));

        t.set_rotation(Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2));
        let rotated = t.model().transform_point3(Vec3::X);
        assert!((rotated - Vec3::new(0.0, 9.0, 0.0)).length() < 1e-4);
        assert_eq!(t.uniform().model(), t.model());
    }

    #[test]
    fn rotate_accumulates_about_own_origin() {
        let mut t = ObjectTransform::new(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO, Vec3::ONE);
        t.rotate(Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_4));
        t.rotate(Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_4));
        assert!((t.rotation().z - std::f32::consts::FRAC_PI_2).abs() < 1e-6);

        // The pivot is the object's position, not the world origin.
        assert!((t.model().transform_point3(Vec3::ZERO) - Vec3::X).length() < 1e-6);
        assert!((t.model().transform_point3(Vec3::X) - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn setters_refresh_cached_model() {
        let mut t = ObjectTransform::default();
        t.set_position(Vec3::new(0.0, 3.0, 0.0));
        t.set_scale(Vec3::splat(2.0));
        assert_eq!(t.position(), Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(t.scale(), Vec3::splat(2.0));
        assert_eq!(t.model(), Mat4::from_translation(Vec3::new(0.0, 3.0, 0.0)) * Mat4::from_scale(Vec3::splat(2.0)));
        assert_eq!(t, ObjectTransform::new(Vec3::new(0.0, 3.0, 0.0), Vec3::ZERO, Vec3::splat(2.0)));
    }
}
