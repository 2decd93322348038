// pipeline.rs
use glam::{Vec3, Vec4};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use crate::error::PipelineError;
use crate::fragment::{FragmentMode, Interpolants};
use crate::transform::{self, TransformProfile};
use crate::uniforms::{GlobalUniforms, TransformUniform};
use crate::vertex::Vertex;
use crate::wave::{self, WaveMode};

/// The shader variant a draw runs with, fixed when the pipeline is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub wave: Option<WaveMode>,
    pub transform: TransformProfile,
    pub fragment: FragmentMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Full,
    Camera,
    Minimal,
}

impl Profile {
    pub const FULL: Profile = Profile { wave: Some(WaveMode::Beat), transform: TransformProfile::Full, fragment: FragmentMode::PassThrough };
    pub const CAMERA: Profile = Profile { wave: Some(WaveMode::CrossCoupled), transform: TransformProfile::Camera, fragment: FragmentMode::PassThrough };
    pub const MINIMAL: Profile = Profile { wave: Some(WaveMode::Simple), transform: TransformProfile::Identity, fragment: FragmentMode::ClipTint };

    /// Wave-capable profiles consume the 28-byte vertex with its flag.
    pub fn has_wave_attribute(&self) -> bool {
        self.wave.is_some()
    }
}

impl Preset {
    pub fn profile(self) -> Profile {
        match self {
            Preset::Full => Profile::FULL,
            Preset::Camera => Profile::CAMERA,
            Preset::Minimal => Profile::MINIMAL,
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Profile::FULL
    }
}

/// Read-only resources bound for one draw.
#[derive(Debug, Clone, Copy)]
pub struct DrawBindings<'a> {
    pub globals: &'a GlobalUniforms,
    pub transform: Option<&'a TransformUniform>,
}

/// CPU reference of the two programmable stages.
///
/// Each invocation is a pure function of its own record plus the bindings,
/// so whole draws are a parallel `map` with results kept in input order.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    profile: Profile,
}

impl Pipeline {
    pub fn new(profile: Profile) -> Self {
        log::debug!("assembled reference pipeline: {:?}", profile);
        Self { profile }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Vertex stage for a single record.
    #[inline]
    pub fn vertex(&self, input: &Vertex, globals: &GlobalUniforms, model: &TransformUniform) -> Interpolants {
        let should_wave = if self.profile.has_wave_attribute() { input.should_wave } else { 0 };
        let p = wave::deform(self.profile.wave, Vec3::from_array(input.position), should_wave, globals.elapsed());
        Interpolants {
            clip_position: transform::to_clip(self.profile.transform, globals, model, p),
            color: Vec3::from_array(input.color),
            should_wave,
        }
    }

    #[inline]
    pub fn fragment(&self, input: &Interpolants) -> Vec4 {
        self.profile.fragment.resolve(input)
    }

    /// Runs the vertex stage over a whole draw.
    ///
    /// Fails before any vertex runs if the profile needs a per-object
    /// transform and none was bound.
    pub fn draw_vertices(&self, vertices: &[Vertex], bindings: DrawBindings<'_>) -> Result<Vec<Interpolants>, PipelineError> {
        let model = match (self.profile.transform.binds_transform(), bindings.transform) {
            (true, None) => return Err(PipelineError::MissingTransform),
            (true, Some(model)) => *model,
            (false, _) => TransformUniform::IDENTITY,
        };
        let globals = *bindings.globals;
        Ok(vertices.par_iter().map(|v| self.vertex(v, &globals, &model)).collect())
    }

    pub fn shade_fragments(&self, fragments: &[Interpolants]) -> Vec<Vec4> {
        fragments.par_iter().map(|f| self.fragment(f)).collect()
    }
}

/// Summary of one reference draw, used by the host as a startup diagnostic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipStats {
    pub min: Vec4,
    pub max: Vec4,
    pub behind_camera: usize,
}

impl ClipStats {
    pub fn collect(outputs: &[Interpolants]) -> Option<Self> {
        let first = outputs.first()?.clip_position;
        Some(outputs.iter().fold(Self { min: first, max: first, behind_camera: 0 }, |acc, o| Self {
            min: acc.min.min(o.clip_position),
            max: acc.max.max(o.clip_position),
            behind_camera: acc.behind_camera + (o.clip_position.w <= 0.0) as usize,
        }))
    }
}
