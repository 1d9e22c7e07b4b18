//! Headless GPU device initialization.
//!
//! Provides [`HeadlessContext`], which owns the wgpu device and queue used for
//! offscreen map rendering. No window or surface is involved.

use crate::error::MapRenderError;

/// Owns the GPU state for offscreen rendering: instance, adapter, device, and queue.
pub struct HeadlessContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl HeadlessContext {
    /// Initialize the GPU asynchronously without a surface.
    pub async fn new() -> Result<Self, MapRenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(_) => return Err(MapRenderError::NoAdapter),
        };

        let info = adapter.get_info();
        log::info!(
            "Selected GPU: {} ({:?}, {:?})",
            info.name,
            info.backend,
            info.device_type
        );

        // Large tracks need the adapter's full texture size, not the downlevel default.
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("lapmap-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }

    /// Largest width or height an offscreen target may have on this device.
    pub fn max_target_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }
}

/// Initialize the headless GPU synchronously using `pollster`.
pub fn init_headless_context_blocking() -> Result<HeadlessContext, MapRenderError> {
    pollster::block_on(HeadlessContext::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_context_fields_exist() {
        // Compile-time check of the struct layout.
        #[allow(dead_code)]
        fn assert_fields(ctx: &HeadlessContext) {
            let _: &wgpu::Instance = &ctx.instance;
            let _: &wgpu::Adapter = &ctx.adapter;
            let _: &wgpu::Device = &ctx.device;
            let _: &wgpu::Queue = &ctx.queue;
        }
    }

    #[test]
    fn test_headless_context_reports_texture_limit() {
        let Ok(ctx) = init_headless_context_blocking() else {
            return;
        };
        assert!(ctx.max_target_dimension() >= wgpu::Limits::downlevel_defaults().max_texture_dimension_2d);
    }
}
