//! Rasterization error types.

use lapmap_image::PixelBufferError;

/// Errors that abort map rasterization.
#[derive(Debug, thiserror::Error)]
pub enum MapRenderError {
    /// The map has no tile layer to size the output from.
    #[error("map has no tile layers")]
    NoLayers,

    /// The first layer covers no pixels.
    #[error("map has zero area ({width}x{height} pixels)")]
    ZeroArea { width: u32, height: u32 },

    /// The output exceeds what the device can allocate.
    #[error("map is {width}x{height} pixels, device limit is {max}")]
    TooLarge { width: u32, height: u32, max: u32 },

    /// A tileset image exceeds the device texture limit.
    #[error("tileset '{tileset}' is {width}x{height} pixels, device limit is {max}")]
    TilesetTooLarge {
        tileset: String,
        width: u32,
        height: u32,
        max: u32,
    },

    /// The readback copy needs a larger buffer than the device allows.
    #[error("readback needs {bytes} bytes, device limit is {max}")]
    ReadbackTooLarge { bytes: u64, max: u64 },

    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found")]
    NoAdapter,

    /// Failed to request GPU device.
    #[error("failed to request GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    /// Mapping the readback buffer failed.
    #[error("failed to read back rendered map: {0}")]
    Readback(String),

    /// Read-back pixels don't form a valid buffer.
    #[error(transparent)]
    PixelBuffer(#[from] PixelBufferError),
}
