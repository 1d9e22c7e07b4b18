//! PNG encoding and all-or-nothing file output.

use std::path::{Path, PathBuf};

use crate::PixelBuffer;

/// Errors raised while persisting a diagnostic image.
#[derive(Debug, thiserror::Error)]
pub enum ImageWriteError {
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Encode the buffer as an 8-bit RGBA PNG, top row first.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, ImageWriteError> {
    let pixels = buffer.to_top_down_rgba();
    let mut png_buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(
            std::io::Cursor::new(&mut png_buf),
            buffer.width(),
            buffer.height(),
        );
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&pixels)?;
        writer.finish()?;
    }
    Ok(png_buf)
}

/// Encode and write `buffer` to `path`.
///
/// The PNG is fully encoded in memory, written to a sibling `.tmp` file and renamed
/// into place, so a failure never leaves a truncated image at `path`.
pub fn write_png(path: &Path, buffer: &PixelBuffer) -> Result<(), ImageWriteError> {
    let bytes = encode_png(buffer)?;
    replace_file(path, &bytes, |tmp_path, bytes| std::fs::write(tmp_path, bytes))?;

    log::info!(
        "Wrote {}x{} PNG to {} ({} bytes)",
        buffer.width(),
        buffer.height(),
        path.display(),
        bytes.len()
    );
    Ok(())
}

/// Write `bytes` to `<path>.tmp` with `write`, then rename it onto `path`.
///
/// The `.tmp` file is removed if either step fails.
fn replace_file<W>(path: &Path, bytes: &[u8], write: W) -> Result<(), ImageWriteError>
where
    W: FnOnce(&Path, &[u8]) -> std::io::Result<()>,
{
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    if let Err(source) = write(&tmp_path, bytes) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(ImageWriteError::Io {
            path: tmp_path,
            source,
        });
    }
    if let Err(source) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(ImageWriteError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}
