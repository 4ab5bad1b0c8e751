//! Configuration for the ride layer: RON persistence with serde defaults
//! and CLI overrides.

pub mod cli;
pub mod config;
pub mod error;

pub use cli::CliArgs;
pub use config::{CameraConfig, Config, DebugConfig, InputConfig, default_config_dir};
pub use error::ConfigError;
