//! RGBA pixel buffer with bottom-up row storage.
//!
//! Rows are stored the way an OpenGL-style render target addresses them: physical
//! row 0 is the bottom of the image. Rasterizers hand over top-down scanlines via
//! [`PixelBuffer::from_top_down_rgba`], which flips them, and the PNG writer flips
//! them back. Code that walks the image top to bottom uses
//! [`PixelBuffer::logical_row`] to find the physical row of logical row `y`.

/// An 8-bit RGB triple.
pub type Rgb = [u8; 3];

/// Bytes per stored pixel (RGBA8).
pub const BYTES_PER_PIXEL: usize = 4;

const OPAQUE: u8 = 0xff;

/// Errors raised when wrapping raw pixel data.
#[derive(Debug, thiserror::Error)]
pub enum PixelBufferError {
    /// Pixel data length doesn't match `width * height * 4`.
    #[error("pixel data size ({actual}) does not match expected ({expected}) for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },
}

/// A mutable RGBA8 image whose alpha channel is always opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer filled with a single color.
    pub fn new(width: u32, height: u32, fill: Rgb) -> Self {
        let pixel = [fill[0], fill[1], fill[2], OPAQUE];
        let data = pixel.repeat(width as usize * height as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap top-down RGBA scanlines (row 0 = top of the image).
    ///
    /// Rows are reversed into bottom-up storage and alpha is forced opaque.
    pub fn from_top_down_rgba(
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<Self, PixelBufferError> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if rgba.len() != expected {
            return Err(PixelBufferError::DataSizeMismatch {
                actual: rgba.len(),
                expected,
                width,
                height,
            });
        }

        let stride = width as usize * BYTES_PER_PIXEL;
        let mut data = Vec::with_capacity(expected);
        if stride > 0 {
            for row in rgba.chunks_exact(stride).rev() {
                data.extend_from_slice(row);
            }
        }
        for pixel in data.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel[3] = OPAQUE;
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Physical row holding logical (top-down) row `y`.
    pub fn logical_row(&self, y: u32) -> u32 {
        self.height - 1 - y
    }

    /// RGB at column `x` of physical row `row`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the buffer.
    pub fn pixel(&self, x: u32, row: u32) -> Rgb {
        let i = self.index(x, row);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Overwrite the pixel at column `x` of physical row `row`. Alpha stays opaque.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the buffer.
    pub fn set_pixel(&mut self, x: u32, row: u32, color: Rgb) {
        let i = self.index(x, row);
        self.data[i..i + BYTES_PER_PIXEL].copy_from_slice(&[color[0], color[1], color[2], OPAQUE]);
    }

    /// RGB at logical (top-down) coordinates.
    pub fn pixel_top_down(&self, x: u32, y: u32) -> Rgb {
        self.pixel(x, self.logical_row(y))
    }

    /// Raw bottom-up RGBA bytes.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Copy out the image as top-down RGBA scanlines, ready for encoding.
    pub fn to_top_down_rgba(&self) -> Vec<u8> {
        let stride = self.width as usize * BYTES_PER_PIXEL;
        let mut out = Vec::with_capacity(self.data.len());
        if stride > 0 {
            for row in self.data.chunks_exact(stride).rev() {
                out.extend_from_slice(row);
            }
        }
        out
    }

    fn index(&self, x: u32, row: u32) -> usize {
        assert!(
            x < self.width && row < self.height,
            "pixel ({x}, {row}) outside {}x{} buffer",
            self.width,
            self.height
        );
        (row as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2 top-down image: red, green on top; blue, white below.
    fn top_down_2x2() -> Vec<u8> {
        vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 255,
        ]
    }

    #[test]
    fn test_new_fills_opaque() {
        let buffer = PixelBuffer::new(3, 2, [1, 2, 3]);
        assert_eq!(buffer.as_raw().len(), 3 * 2 * 4);
        for pixel in buffer.as_raw().chunks_exact(4) {
            assert_eq!(pixel, &[1, 2, 3, 255]);
        }
    }

    #[test]
    fn test_top_down_rows_are_flipped() {
        let buffer = PixelBuffer::from_top_down_rgba(2, 2, &top_down_2x2()).unwrap();
        // Physical row 0 is the bottom scanline.
        assert_eq!(buffer.pixel(0, 0), [0, 0, 255]);
        assert_eq!(buffer.pixel(1, 0), [255, 255, 255]);
        assert_eq!(buffer.pixel(0, 1), [255, 0, 0]);
        assert_eq!(buffer.pixel_top_down(1, 0), [0, 255, 0]);
    }

    #[test]
    fn test_logical_row_maps_top_to_last_physical_row() {
        let buffer = PixelBuffer::new(4, 20, [0, 0, 0]);
        assert_eq!(buffer.logical_row(0), 19);
        assert_eq!(buffer.logical_row(19), 0);
    }

    #[test]
    fn test_to_top_down_restores_scanline_order() {
        let rgba = top_down_2x2();
        let buffer = PixelBuffer::from_top_down_rgba(2, 2, &rgba).unwrap();
        assert_eq!(buffer.to_top_down_rgba(), rgba);
    }

    #[test]
    fn test_translucent_input_becomes_opaque() {
        let buffer = PixelBuffer::from_top_down_rgba(1, 1, &[10, 20, 30, 0]).unwrap();
        assert_eq!(buffer.as_raw(), &[10, 20, 30, 255]);
    }

    #[test]
    fn test_size_mismatch_is_rejected() {
        let result = PixelBuffer::from_top_down_rgba(2, 2, &[0; 12]);
        assert!(matches!(
            result,
            Err(PixelBufferError::DataSizeMismatch {
                actual: 12,
                expected: 16,
                ..
            })
        ));
    }

    #[test]
    fn test_set_pixel_keeps_alpha_opaque() {
        let mut buffer = PixelBuffer::new(2, 2, [0, 0, 0]);
        buffer.set_pixel(1, 1, [9, 8, 7]);
        assert_eq!(buffer.pixel(1, 1), [9, 8, 7]);
        assert_eq!(buffer.as_raw()[15], 255);
    }

    #[test]
    #[should_panic(expected = "outside 2x2 buffer")]
    fn test_out_of_bounds_access_panics() {
        let buffer = PixelBuffer::new(2, 2, [0, 0, 0]);
        buffer.pixel(2, 0);
    }
}
