//! Offscreen render target, render pass setup, and pixel readback.
//!
//! [`OffscreenTarget`] is a color texture that can be drawn into and copied out;
//! [`ReadbackBuffer`] receives that copy and strips the row padding wgpu requires.

use crate::error::MapRenderError;
use crate::texture::TILE_TEXTURE_FORMAT;

/// Bytes per RGBA8 texel.
const BYTES_PER_PIXEL: u32 = 4;

/// Convert an 8-bit RGB color to an opaque wgpu clear color.
pub fn clear_color_from_rgb(rgb: [u8; 3]) -> wgpu::Color {
    wgpu::Color {
        r: f64::from(rgb[0]) / 255.0,
        g: f64::from(rgb[1]) / 255.0,
        b: f64::from(rgb[2]) / 255.0,
        a: 1.0,
    }
}

/// Builder for configuring the single color pass used to draw a map.
#[derive(Debug)]
pub struct RenderPassBuilder {
    clear_color: wgpu::Color,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPassBuilder {
    /// Create a new render pass builder that clears to opaque black.
    pub fn new() -> Self {
        Self {
            clear_color: wgpu::Color::BLACK,
            label: None,
        }
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    /// Begin a pass that clears `view` and stores the result.
    pub fn begin<'encoder>(
        &self,
        encoder: &'encoder mut wgpu::CommandEncoder,
        view: &'encoder wgpu::TextureView,
    ) -> wgpu::RenderPass<'encoder> {
        let color_attachment = wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(self.clear_color),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// Row pitch of a `width`-texel RGBA8 copy, padded to wgpu's copy alignment.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Color texture the map is rendered into. The texture is destroyed on drop.
pub struct OffscreenTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

impl OffscreenTarget {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("map-target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TILE_TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width,
            height,
        }
    }

    /// Record a copy of the whole target into a new readback buffer.
    pub fn copy_to_buffer(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
    ) -> ReadbackBuffer {
        let padded = padded_bytes_per_row(self.width);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("map-readback"),
            size: u64::from(padded) * u64::from(self.height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );

        ReadbackBuffer {
            buffer,
            width: self.width,
            height: self.height,
            padded_bytes_per_row: padded,
        }
    }
}

impl Drop for OffscreenTarget {
    fn drop(&mut self) {
        self.texture.destroy();
    }
}

/// Host-readable copy of an [`OffscreenTarget`]. The buffer is destroyed on drop.
pub struct ReadbackBuffer {
    buffer: wgpu::Buffer,
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
}

impl ReadbackBuffer {
    /// Wait for the copy and return tightly packed RGBA rows in texture order.
    ///
    /// Must be called after the encoder holding the copy was submitted.
    pub fn read(&self, device: &wgpu::Device) -> Result<Vec<u8>, MapRenderError> {
        let buffer_slice = self.buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .map_err(|e| MapRenderError::Readback(e.to_string()))?;

        match rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(MapRenderError::Readback(e.to_string())),
            Err(e) => return Err(MapRenderError::Readback(e.to_string())),
        }

        let row_bytes = (self.width * BYTES_PER_PIXEL) as usize;
        let mut pixels = Vec::with_capacity(row_bytes * self.height as usize);
        {
            let mapped = buffer_slice.get_mapped_range();
            for row in mapped
                .chunks(self.padded_bytes_per_row as usize)
                .take(self.height as usize)
            {
                pixels.extend_from_slice(&row[..row_bytes]);
            }
        }
        self.buffer.unmap();
        Ok(pixels)
    }
}

impl Drop for ReadbackBuffer {
    fn drop(&mut self) {
        self.buffer.destroy();
    }
}
