//! Map rasterizer: draws every visible tile layer into an offscreen target and
//! reads it back as a [`lapmap_image::PixelBuffer`].
//!
//! The GPU path renders with wgpu through a y-down orthographic camera; the
//! software path composes the same layers on the CPU.

pub mod batching;
pub mod buffer;
pub mod camera;
pub mod error;
pub mod gpu;
pub mod pass;
pub mod pipeline;
pub mod raster;
pub mod software;
pub mod texture;

pub use batching::{TileBatch, build_tile_batches};
pub use buffer::{BufferAllocator, MeshBuffer, TileVertex};
pub use camera::MapCamera;
pub use error::MapRenderError;
pub use gpu::{HeadlessContext, init_headless_context_blocking};
pub use pass::{OffscreenTarget, ReadbackBuffer, RenderPassBuilder};
pub use pipeline::{CameraUniform, TILE_SHADER_SOURCE, TilePipeline};
pub use raster::{GpuRasterizer, MapRasterizer, create_rasterizer, output_size, rasterize_map};
pub use software::SoftwareRasterizer;
pub use texture::{TILE_TEXTURE_FORMAT, TilesetTexture, TilesetTextures};

/// Create a test GPU device and queue. Returns `None` if no GPU is available.
#[cfg(test)]
pub(crate) mod test_support {
    pub fn create_test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });

            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await
                .ok()?;

            adapter
                .request_device(&wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                    experimental_features: Default::default(),
                    ..Default::default()
                })
                .await
                .ok()
        })
    }
}
