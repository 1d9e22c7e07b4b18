//! Map loading error types.

use std::path::PathBuf;

/// Errors that can occur when reading or validating a tile map.
#[derive(Debug, thiserror::Error)]
pub enum MapLoadError {
    /// Failed to read the map file from disk.
    #[error("failed to read map {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse RON content.
    #[error("failed to parse map: {0}")]
    Parse(#[source] ron::error::SpannedError),

    /// Failed to open or decode a tileset image.
    #[error("failed to load tileset image {path}: {source}")]
    TilesetImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Tile width or height is zero.
    #[error("tile size must be non-zero, got {width}x{height}")]
    ZeroTileSize { width: u32, height: u32 },

    /// A layer's tile count doesn't match its grid size.
    #[error("layer '{layer}' has {actual} tiles, expected {expected}")]
    LayerSize {
        layer: String,
        expected: usize,
        actual: usize,
    },

    /// A layer references a tile id that no tileset provides.
    #[error("layer '{layer}' references unknown tile id {gid}")]
    UnknownTile { layer: String, gid: u32 },

    /// A tileset's declared tile grid doesn't fit inside its image.
    #[error(
        "tileset '{tileset}' needs a {required_width}x{required_height} image, got {width}x{height}"
    )]
    TilesetTooSmall {
        tileset: String,
        required_width: u32,
        required_height: u32,
        width: u32,
        height: u32,
    },

    /// A layer's pixel size doesn't fit in `u32`.
    #[error("layer '{layer}' of {width}x{height} tiles is too large to render")]
    LayerTooLarge {
        layer: String,
        width: u32,
        height: u32,
    },

    /// A tileset's tile grid spans more than `u32` pixels.
    #[error("tileset '{tileset}' tile grid is too large")]
    TilesetGridOverflow { tileset: String },
}
