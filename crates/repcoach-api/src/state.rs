//! Application state shared across all route handlers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use repcoach_core::config::ServerConfig;

/// Shared application state, cloned into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Root directory with one sub-directory per exercise.
    pub exercises_dir: Arc<PathBuf>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(exercises_dir: impl Into<PathBuf>) -> Self {
        Self {
            exercises_dir: Arc::new(exercises_dir.into()),
            start_time: Instant::now(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(&config.exercises_dir)
    }
}
