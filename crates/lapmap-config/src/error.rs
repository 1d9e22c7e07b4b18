//! Errors from locating, reading and writing `config.ron`.

/// Why lapmap's `config.ron` couldn't be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    #[error("failed to write config: {0}")]
    WriteError(#[source] std::io::Error),

    /// The file exists but isn't valid RON for [`crate::Config`].
    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),

    /// No `--config` override was given and the OS has no config directory.
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
}
