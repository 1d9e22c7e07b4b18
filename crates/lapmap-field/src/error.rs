use std::path::PathBuf;

/// Errors raised while reading or writing a lap-position table.
#[derive(Debug, thiserror::Error)]
pub enum FieldLoadError {
    #[error("failed to read lap table {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write lap table {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse lap table: {0}")]
    Parse(#[source] ron::error::SpannedError),

    #[error("failed to serialize lap table: {0}")]
    Serialize(#[source] ron::Error),

    /// A sample lies outside the table grid.
    #[error("sample at ({x}, {y}) is outside the {width}x{height} table")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Samples exist but the table declares no sections.
    #[error("table has {samples} samples but a section count of zero")]
    ZeroSectionCount { samples: usize },

    /// The declared grid is too large to hold in memory.
    #[error("{width}x{height} lap table is too large")]
    TooLarge { width: u32, height: u32 },
}
