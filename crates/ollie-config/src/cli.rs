//! Command-line overrides for the ride configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Command-line arguments shared by the ride binaries.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "ollie", about = "Skateboard ride-feel layer")]
pub struct CliArgs {
    /// Mouse sensitivity multiplier.
    #[arg(long)]
    pub mouse_sensitivity: Option<f32>,

    /// Invert the vertical orbit axis.
    #[arg(long)]
    pub invert_y: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Applies CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(sensitivity) = args.mouse_sensitivity {
            self.input.mouse_sensitivity = sensitivity;
        }
        if let Some(invert) = args.invert_y {
            self.input.invert_y = invert;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
