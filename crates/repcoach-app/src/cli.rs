//! CLI argument definitions for the RepCoach application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use repcoach_core::config::RepcoachConfig;

/// RepCoach - a workout chat assistant grounded in an exercise catalog.
#[derive(Parser, Debug)]
#[command(name = "repcoach", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start an interactive chat session (default).
    Chat,
    /// Run the catalog and step-image service.
    Serve {
        /// Service port.
        #[arg(short = 'p', long = "port")]
        port: Option<u16>,
        /// Directory holding one sub-directory per exercise.
        #[arg(short = 'd', long = "exercises-dir")]
        exercises_dir: Option<PathBuf>,
    },
    /// Ask a single question and exit.
    Ask {
        /// The question; multiple words are joined with spaces.
        #[arg(required = true)]
        question: Vec<String>,
    },
}

impl CliArgs {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Chat)
    }

    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > REPCOACH_CONFIG env var > ~/.repcoach/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("REPCOACH_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log filter.
    ///
    /// Priority: --log-level flag > config file value. `RUST_LOG`, when set,
    /// is honoured by the subscriber ahead of both.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }

    /// Apply flag and env overrides on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut RepcoachConfig) {
        if let Command::Serve {
            port,
            exercises_dir,
        } = self.command()
        {
            config.server.port = pick_port(
                port,
                std::env::var("REPCOACH_PORT").ok(),
                config.server.port,
            );
            if let Some(dir) = exercises_dir {
                config.server.exercises_dir = dir.to_string_lossy().into_owned();
            }
        }
    }
}

/// Port priority: flag > env value (when it parses) > config value.
fn pick_port(flag: Option<u16>, env: Option<String>, config_port: u16) -> u16 {
    flag.or_else(|| env.and_then(|v| v.trim().parse().ok()))
        .unwrap_or(config_port)
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".repcoach").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".repcoach").join("config.toml");
    }
    PathBuf::from("config.toml")
}
