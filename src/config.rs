// config.rs
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use serde::Deserialize;
use crate::error::ConfigError;
use crate::pipeline::{Preset, Profile};

pub const WINDOW_TITLE: &str = "waveshade";

// Runtime config lookup
pub const CONFIG_ENV_VAR: &str = "WAVESHADE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "waveshade.json";

// --- Camera ---
pub const FOV_Y: f32 = 45.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;
pub const CAMERA_EYE: [f32; 3] = [0.45, 0.45, 1.6];
pub const CAMERA_TARGET: [f32; 3] = [0.45, 0.45, 0.0];

// --- Scene ---
pub const GRID_COLS: u32 = 10;
pub const GRID_ROWS: u32 = 10;
pub const GRID_SPACING: f32 = 0.1;
pub const TRIANGLE_SIZE: f32 = 0.1;
pub const GROUND_COLOR: [f32; 3] = [0.08, 0.08, 0.1];
pub const GROUND_OFFSET: [f32; 3] = [0.45, -0.2, 0.0];
pub const GROUND_SCALE: f32 = 4.0;
pub const GROUND_SPIN: f32 = 0.2; // rad/s about Y
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color { r: 0.01, g: 0.01, b: 0.02, a: 1.0 };

// --- Buffers ---
pub const MAX_OBJECTS: u64 = 16;

/// Runtime settings read from JSON, e.g. `{ "preset": "minimal" }` or
/// `{ "profile": { "wave": "beat", "transform": "camera", "fragment": "pass_through" } }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub preset: Option<Preset>,
    pub profile: Option<Profile>,
    pub vsync: bool,
    pub time_scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { preset: None, profile: None, vsync: true, time_scale: 1.0 }
    }
}

impl RenderConfig {
    /// Loads from `$WAVESHADE_CONFIG`, else `./waveshade.json`, else defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::from_path(&path),
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_path(DEFAULT_CONFIG_PATH),
            Err(_) => {
                log::info!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_path(path: &str) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Io { path: path.to_string(), source })?;
        let config: RenderConfig = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| ConfigError::Parse { path: path.to_string(), source })?;
        log::info!("loaded config from {}", path);
        Ok(config)
    }

    #[cfg(test)]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Parse { path: "<inline>".to_string(), source })
    }

    /// The profile the pipeline gets assembled with.
    pub fn profile(&self) -> Result<Profile, ConfigError> {
        match (self.preset, self.profile) {
            (Some(_), Some(_)) => Err(ConfigError::Conflict),
            (Some(preset), None) => Ok(preset.profile()),
            (None, Some(profile)) => Ok(profile),
            (None, None) => Ok(Profile::default()),
        }
    }

    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync { wgpu::PresentMode::Fifo } else { wgpu::PresentMode::Mailbox }
    }
}
