//! Pixel storage and PNG output for lapmap diagnostic images.

mod buffer;
mod png_writer;

pub use buffer::{BYTES_PER_PIXEL, PixelBuffer, PixelBufferError, Rgb};
pub use png_writer::{ImageWriteError, encode_png, write_png};
