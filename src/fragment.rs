// fragment.rs
use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentMode {
    /// Opaque copy of the interpolated color.
    PassThrough,
    /// Debug visualization: color scaled by `position.x * 0.01`.
    ///
    /// On the GPU the fragment stage sees the position builtin in framebuffer
    /// pixels, so the tint shifts whenever the viewport is resized or the
    /// camera moves. That instability is the point of the mode; it is a
    /// diagnostic, not a look.
    ClipTint,
}

/// Vertex-stage outputs as delivered to one fragment invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolants {
    pub clip_position: Vec4,
    pub color: Vec3,
    pub should_wave: u32,
}

impl Interpolants {
    /// CPU stand-in for the rasterizer: blends three vertex outputs with
    /// barycentric weights. `should_wave` is flat and comes from the first
    /// (provoking) vertex.
    pub fn barycentric(tri: [&Interpolants; 3], weights: Vec3) -> Self {
        Self {
            clip_position: tri[0].clip_position * weights.x + tri[1].clip_position * weights.y + tri[2].clip_position * weights.z,
            color: tri[0].color * weights.x + tri[1].color * weights.y + tri[2].color * weights.z,
            should_wave: tri[0].should_wave,
        }
    }
}

impl FragmentMode {
    #[inline]
    pub fn resolve(self, input: &Interpolants) -> Vec4 {
        match self {
            FragmentMode::PassThrough => input.color.extend(1.0),
            FragmentMode::ClipTint => (input.color * input.clip_position.x * 0.01).extend(1.0),
        }
    }
}
