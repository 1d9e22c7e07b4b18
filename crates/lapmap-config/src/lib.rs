//! Configuration system for lapmap.
//!
//! Settings persist to disk as a RON file in the platform config directory.
//! CLI flags parsed with clap override file values, and unknown or missing
//! fields fall back to defaults so old config files keep loading.

mod cli;
mod config;
mod error;

pub use cli::{BackendArg, CliArgs};
pub use config::{ChannelMode, Config, LogConfig, OverlayConfig, RasterBackend, RenderConfig};
pub use error::ConfigError;
