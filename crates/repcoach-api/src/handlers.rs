//! Route handler functions for all API endpoints.

use std::io;
use std::path::Path as FsPath;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::ApiError;
use crate::state::AppState;

/// Image files stored per exercise, one per step.
pub const STEP_FILES: [&str; 2] = ["0.jpg", "1.jpg"];

const IMAGE_NOT_FOUND: &str = "Image not found.";

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ListingResponse {
    pub exercises: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub exercise_count: u64,
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET /list_all - exercise directory names, sorted.
pub async fn list_all(State(state): State<AppState>) -> Result<Json<ListingResponse>, ApiError> {
    let exercises = exercise_dirs(&state.exercises_dir).await.map_err(|e| {
        error!(dir = %state.exercises_dir.display(), error = %e, "Failed to list exercises");
        ApiError::Internal(format!("Error occurred: {}", e))
    })?;
    debug!(count = exercises.len(), "Listed exercises");
    Ok(Json(ListingResponse { exercises }))
}

/// GET /exercises/{name}/images/{file} - one step image as JPEG.
pub async fn exercise_image(
    State(state): State<AppState>,
    Path((name, file)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let name = name.trim().to_lowercase();
    if !is_safe_segment(&name) || !STEP_FILES.contains(&file.as_str()) {
        return Err(ApiError::NotFound(IMAGE_NOT_FOUND.to_string()));
    }

    let image_path = state.exercises_dir.join(&name).join(&file);
    match tokio::fs::read(&image_path).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %image_path.display(), "Image missing");
            Err(ApiError::NotFound(IMAGE_NOT_FOUND.to_string()))
        }
        Err(e) => {
            error!(path = %image_path.display(), error = %e, "Failed to read image");
            Err(ApiError::Internal("Internal server error.".to_string()))
        }
    }
}

/// GET /health - liveness plus the number of listed exercises.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let exercise_count = exercise_dirs(&state.exercises_dir)
        .await
        .map(|dirs| dirs.len() as u64)
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        exercise_count,
    })
}

// =============================================================================
// Helpers
// =============================================================================

async fn exercise_dirs(root: &FsPath) -> io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(root).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// A single path segment that cannot escape the exercises directory.
fn is_safe_segment(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && !name.contains("..")
}
