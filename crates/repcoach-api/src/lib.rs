//! RepCoach API crate - the catalog and step-image HTTP service.
//!
//! Serves the exercise listing the chat session grounds itself in, plus the
//! two step images stored for each exercise.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
