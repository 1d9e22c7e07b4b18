//! Map rasterization entry points and the GPU rasterizer.

use lapmap_config::{RasterBackend, RenderConfig};
use lapmap_image::PixelBuffer;
use lapmap_map::TileMap;

use crate::batching::build_tile_batches;
use crate::buffer::{BufferAllocator, MeshBuffer};
use crate::camera::MapCamera;
use crate::error::MapRenderError;
use crate::gpu::{HeadlessContext, init_headless_context_blocking};
use crate::pass::{OffscreenTarget, RenderPassBuilder, clear_color_from_rgb, padded_bytes_per_row};
use crate::pipeline::{TilePipeline, draw_tiles};
use crate::texture::{TILE_TEXTURE_FORMAT, TilesetTexture, TilesetTextures};

/// Turns a tile map into an opaque pixel buffer of its first layer's size.
pub trait MapRasterizer {
    fn rasterize(&self, map: &TileMap) -> Result<PixelBuffer, MapRenderError>;
}

/// Pixel size of the rendered map, rejecting maps that would render nothing.
pub fn output_size(map: &TileMap) -> Result<(u32, u32), MapRenderError> {
    let (width, height) = map.pixel_size().ok_or(MapRenderError::NoLayers)?;
    if width == 0 || height == 0 {
        return Err(MapRenderError::ZeroArea { width, height });
    }
    Ok((width, height))
}

/// Create the rasterizer selected by `config`.
pub fn create_rasterizer(config: &RenderConfig) -> Result<Box<dyn MapRasterizer>, MapRenderError> {
    Ok(match config.backend {
        RasterBackend::Gpu => Box::new(GpuRasterizer::new(config.clear_color)?),
        RasterBackend::Software => Box::new(crate::SoftwareRasterizer::new(config.clear_color)),
    })
}

/// Rasterize `map` with a rasterizer that lives only for this call.
///
/// Every device, texture and buffer is released before this returns. When the
/// GPU backend finds no adapter, the software backend draws the map instead.
pub fn rasterize_map(map: &TileMap, config: &RenderConfig) -> Result<PixelBuffer, MapRenderError> {
    let rasterizer: Box<dyn MapRasterizer> = match create_rasterizer(config) {
        Err(MapRenderError::NoAdapter) => {
            log::warn!("No GPU adapter found, rasterizing in software");
            Box::new(crate::SoftwareRasterizer::new(config.clear_color))
        }
        other => other?,
    };
    rasterizer.rasterize(map)
}

/// Renders maps offscreen with wgpu and reads the pixels back.
///
/// Holds the device for its lifetime; per-map textures, buffers and the render
/// target are dropped at the end of each [`MapRasterizer::rasterize`] call.
pub struct GpuRasterizer {
    context: HeadlessContext,
    textures: TilesetTextures,
    pipeline: TilePipeline,
    clear_color: wgpu::Color,
}

impl GpuRasterizer {
    pub fn new(clear_color: [u8; 3]) -> Result<Self, MapRenderError> {
        let context = init_headless_context_blocking()?;
        let textures = TilesetTextures::new(&context.device);
        let pipeline = TilePipeline::new(
            &context.device,
            textures.bind_group_layout(),
            TILE_TEXTURE_FORMAT,
        );
        Ok(Self {
            context,
            textures,
            pipeline,
            clear_color: clear_color_from_rgb(clear_color),
        })
    }

    /// Reject sizes the device can't allocate before touching it.
    fn check_limits(&self, map: &TileMap, width: u32, height: u32) -> Result<(), MapRenderError> {
        let max = self.context.max_target_dimension();
        if width > max || height > max {
            return Err(MapRenderError::TooLarge { width, height, max });
        }
        for tileset in map.tilesets() {
            let (w, h) = tileset.image.dimensions();
            if w > max || h > max {
                return Err(MapRenderError::TilesetTooLarge {
                    tileset: tileset.name.clone(),
                    width: w,
                    height: h,
                    max,
                });
            }
        }
        let bytes = u64::from(padded_bytes_per_row(width)) * u64::from(height);
        let max_buffer = self.context.device.limits().max_buffer_size;
        if bytes > max_buffer {
            return Err(MapRenderError::ReadbackTooLarge {
                bytes,
                max: max_buffer,
            });
        }
        Ok(())
    }
}

impl MapRasterizer for GpuRasterizer {
    fn rasterize(&self, map: &TileMap) -> Result<PixelBuffer, MapRenderError> {
        let (width, height) = output_size(map)?;
        self.check_limits(map, width, height)?;

        let device = &self.context.device;
        let queue = &self.context.queue;

        let tilesets: Vec<Option<TilesetTexture>> = map
            .tilesets()
            .iter()
            .map(|tileset| {
                let (w, h) = tileset.image.dimensions();
                (w > 0 && h > 0)
                    .then(|| self.textures.upload(device, queue, &tileset.name, &tileset.image))
            })
            .collect();

        let camera_buffer = {
            use wgpu::util::DeviceExt;
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("map-camera"),
                contents: bytemuck::bytes_of(&MapCamera::new(width, height).uniform()),
                usage: wgpu::BufferUsages::UNIFORM,
            })
        };
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("map-camera-bind-group"),
            layout: &self.pipeline.camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let batches = build_tile_batches(map);
        let allocator = BufferAllocator::new(device);
        let draws: Vec<(MeshBuffer, &wgpu::BindGroup)> = batches
            .iter()
            .filter_map(|batch| {
                let texture = tilesets.get(batch.tileset)?.as_ref()?;
                let label = format!("layer{}-tileset{}", batch.layer, batch.tileset);
                let mesh = allocator.create_mesh(&label, &batch.vertices, &batch.indices);
                Some((mesh, &texture.bind_group))
            })
            .collect();

        let target = OffscreenTarget::new(device, width, height);
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("map-encoder"),
        });
        {
            let mut pass = RenderPassBuilder::new()
                .clear_color(self.clear_color)
                .label("map-pass")
                .begin(&mut encoder, &target.view);
            for (mesh, tileset_bind_group) in &draws {
                draw_tiles(
                    &mut pass,
                    &self.pipeline,
                    &camera_bind_group,
                    tileset_bind_group,
                    mesh,
                );
            }
        }
        let readback = target.copy_to_buffer(device, &mut encoder);
        queue.submit([encoder.finish()]);

        let rgba = readback.read(device)?;
        camera_buffer.destroy();
        log::info!(
            "Rasterized {width}x{height} map on the GPU in {} draws",
            draws.len()
        );
        Ok(PixelBuffer::from_top_down_rgba(width, height, &rgba)?)
    }
}
