// error.rs
use thiserror::Error;

/// Boundary failures of the pipeline. The per-vertex and per-fragment stages
/// themselves never fail.
#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    #[error("profile binds a per-object transform but the draw supplied none")]
    MissingTransform,
    #[error("vertex {index} has should_wave = {value}, expected 0 or 1")]
    InvalidWaveFlag { index: usize, value: u32 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse { path: String, source: serde_json::Error },
    #[error("config sets both `preset` and `profile`; pick one")]
    Conflict,
}
