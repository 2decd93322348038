// wave.rs
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Procedural deformation applied to flagged vertices.
///
/// Every mode leaves `z` untouched and performs no range reduction on its sine
/// arguments, so `t` is free to grow for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveMode {
    /// Static spatial ripple, both axes read the original position.
    CrossCoupled,
    /// Time-driven ripple with a sinusoidal amplitude envelope.
    Beat,
    /// Single-axis time-driven ripple.
    Simple,
}

impl WaveMode {
    #[inline]
    pub fn apply(self, p: Vec3, t: f32) -> Vec3 {
        match self {
            WaveMode::CrossCoupled => cross_coupled(p),
            WaveMode::Beat => beat(p, t),
            WaveMode::Simple => simple(p, t),
        }
    }

    /// Whether the output depends on the time uniform.
    pub fn is_animated(self) -> bool {
        !matches!(self, WaveMode::CrossCoupled)
    }
}

#[inline]
pub fn cross_coupled(p: Vec3) -> Vec3 {
    Vec3::new(
        p.x + (p.y * 10.0).sin() * 0.1,
        p.y + (p.x * 10.0).sin() * 0.1,
        p.z,
    )
}

// Sequential: x is displaced using the already-displaced y.
#[inline]
pub fn beat(p: Vec3, t: f32) -> Vec3 {
    let mut out = p;
    out.y = out.y + (t * 4.0 + out.x * 2.0).sin() * 0.1 * (out.x * 2.0).sin() * 0.5;
    out.x = out.x + (t * 4.0 + out.y * 2.0).sin() * 0.1 * (out.y * 2.0).sin() * 0.5;
    out
}

#[inline]
pub fn simple(p: Vec3, t: f32) -> Vec3 {
    let mut out = p;
    out.y = out.y + (t * 4.0 + out.x * 2.0).sin() * 0.2;
    out
}

/// Applies `mode` only when the vertex is flagged with exactly 1.
#[inline]
pub fn deform(mode: Option<WaveMode>, p: Vec3, should_wave: u32, t: f32) -> Vec3 {
    match mode {
        Some(mode) if should_wave == 1 => mode.apply(p, t),
        _ => p,
    }
}
