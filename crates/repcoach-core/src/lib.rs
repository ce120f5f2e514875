pub mod config;
pub mod error;
pub mod types;

pub use config::RepcoachConfig;
pub use error::{RepcoachError, Result};
pub use types::*;
