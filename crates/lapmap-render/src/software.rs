//! CPU rasterizer producing the same image as the GPU path.
//!
//! Used when no adapter is available or when configured explicitly. Tiles are
//! composed source-over in layer order, exactly like the GPU alpha blend state.

use image::{Rgba, RgbaImage};
use lapmap_image::PixelBuffer;
use lapmap_map::{TileMap, Tileset, TileRect};

use crate::batching::is_drawn;
use crate::error::MapRenderError;
use crate::raster::{MapRasterizer, output_size};

/// Rasterizes maps on the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftwareRasterizer {
    clear_color: [u8; 3],
}

impl SoftwareRasterizer {
    pub fn new(clear_color: [u8; 3]) -> Self {
        Self { clear_color }
    }
}

impl Default for SoftwareRasterizer {
    fn default() -> Self {
        Self::new([0, 0, 0])
    }
}

/// `src` over `dst` with the source alpha scaled by `opacity`; the result is opaque.
fn blend_over(dst: Rgba<u8>, src: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let a = f32::from(src[3]) / 255.0 * opacity;
    let mix = |s: u8, d: u8| (f32::from(s) * a + f32::from(d) * (1.0 - a)).round() as u8;
    Rgba([mix(src[0], dst[0]), mix(src[1], dst[1]), mix(src[2], dst[2]), 255])
}

fn draw_tile(canvas: &mut RgbaImage, tileset: &Tileset, rect: TileRect, x: u32, y: u32, opacity: f32) {
    for dy in 0..rect.height {
        let py = y + dy;
        if py >= canvas.height() {
            break;
        }
        for dx in 0..rect.width {
            let px = x + dx;
            if px >= canvas.width() {
                break;
            }
            let src = *tileset.image.get_pixel(rect.x + dx, rect.y + dy);
            let dst = *canvas.get_pixel(px, py);
            canvas.put_pixel(px, py, blend_over(dst, src, opacity));
        }
    }
}

impl MapRasterizer for SoftwareRasterizer {
    fn rasterize(&self, map: &TileMap) -> Result<PixelBuffer, MapRenderError> {
        let (width, height) = output_size(map)?;
        let [r, g, b] = self.clear_color;
        let mut canvas = RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255]));

        for layer in map.layers().iter().filter(|layer| is_drawn(layer)) {
            let opacity = layer.opacity.min(1.0);
            for (col, row, gid) in layer.cells() {
                let Some((tileset_index, rect)) = map.tile_source(gid) else {
                    continue;
                };
                let tileset = &map.tilesets()[tileset_index];
                draw_tile(
                    &mut canvas,
                    tileset,
                    rect,
                    col * map.tile_width(),
                    row * map.tile_height(),
                    opacity,
                );
            }
        }

        log::info!("Rasterized {width}x{height} map in software");
        Ok(PixelBuffer::from_top_down_rgba(width, height, canvas.as_raw())?)
    }
}
