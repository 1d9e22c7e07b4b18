//! Command-line argument parsing for lapmap.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::{ChannelMode, Config, RasterBackend};

/// Render a tile map with its lap-position table overlaid, as a PNG.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "lapmap", about = "Lap-position table diagnostic renderer")]
pub struct CliArgs {
    /// Tile map file (.ron).
    pub map: PathBuf,

    /// Precomputed lap-position table (.ron).
    pub field: PathBuf,

    /// Output PNG. Defaults to the map path with a `.png` extension.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Rasterizer backend.
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,

    /// Overlay blend factor (0.0 - 1.0).
    #[arg(long)]
    pub opacity: Option<f32>,

    /// Clamp out-of-range channel values instead of wrapping them.
    #[arg(long)]
    pub clamp: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Backend names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Gpu,
    Software,
}

impl From<BackendArg> for RasterBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Gpu => RasterBackend::Gpu,
            BackendArg::Software => RasterBackend::Software,
        }
    }
}

impl CliArgs {
    /// The PNG destination, falling back to the map path with a `.png` extension.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.map.with_extension("png"))
    }
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(backend) = args.backend {
            self.render.backend = backend.into();
        }
        if let Some(opacity) = args.opacity {
            self.overlay.opacity = opacity;
        }
        if args.clamp {
            self.overlay.channel_mode = ChannelMode::Clamp;
        }
        if let Some(ref level) = args.log_level {
            self.log.level = level.clone();
        }
    }
}
