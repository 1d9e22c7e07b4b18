//! Field overlay compositor.

use lapmap_config::{ChannelMode, OverlayConfig};
use lapmap_field::NavigationField;
use lapmap_image::PixelBuffer;

use crate::blend::{DEFAULT_OPACITY, blend_rgb};
use crate::encode::encode_lap_position;
use crate::progress::ProgressObserver;

/// The field doesn't cover the buffer it is composited onto.
#[derive(Debug, thiserror::Error)]
pub enum FieldLookupError {
    #[error(
        "navigation field is {field_width}x{field_height} but the image is {buffer_width}x{buffer_height}"
    )]
    DimensionMismatch {
        field_width: u32,
        field_height: u32,
        buffer_width: u32,
        buffer_height: u32,
    },
}

/// Counters from one compositing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompositeStats {
    /// Pixels that had a lap position and were blended.
    pub blended: usize,
    /// Pixels left as rasterized.
    pub untouched: usize,
}

/// Progress percentage after logical row `y` of `height`.
///
/// `100 * y / (height - 1)` in integer arithmetic; a single-row image reports 100.
pub fn row_percent(y: u32, height: u32) -> u32 {
    if height <= 1 {
        return 100;
    }
    (100 * u64::from(y) / u64::from(height - 1)) as u32
}

/// Blends lap-position colors over a rasterized map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compositor {
    opacity: f32,
    channel_mode: ChannelMode,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(DEFAULT_OPACITY, ChannelMode::Wrap)
    }
}

impl Compositor {
    pub fn new(opacity: f32, channel_mode: ChannelMode) -> Self {
        Self {
            opacity,
            channel_mode,
        }
    }

    pub fn from_config(config: &OverlayConfig) -> Self {
        Self::new(config.opacity, config.channel_mode)
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn channel_mode(&self) -> ChannelMode {
        self.channel_mode
    }

    /// Blend every sampled pixel of `field` into `buffer`.
    ///
    /// Logical rows are walked top to bottom; logical row `y` lives in physical
    /// row `height - 1 - y` of the buffer. `progress` hears about every row and is
    /// told when the pass ends. Dimensions are checked before any pixel changes.
    pub fn composite<F, P>(
        &self,
        buffer: &mut PixelBuffer,
        field: &F,
        progress: &mut P,
    ) -> Result<CompositeStats, FieldLookupError>
    where
        F: NavigationField + ?Sized,
        P: ProgressObserver + ?Sized,
    {
        let width = buffer.width();
        let height = buffer.height();
        if field.width() != width || field.height() != height {
            return Err(FieldLookupError::DimensionMismatch {
                field_width: field.width(),
                field_height: field.height(),
                buffer_width: width,
                buffer_height: height,
            });
        }

        let section_count = field.section_count();
        let mut stats = CompositeStats::default();
        for y in 0..height {
            progress.row_progress(row_percent(y, height));
            let row = buffer.logical_row(y);
            for x in 0..width {
                let Some(pos) = field.get(x, y) else {
                    stats.untouched += 1;
                    continue;
                };
                let target = encode_lap_position(&pos, section_count, self.channel_mode);
                let blended = blend_rgb(buffer.pixel(x, row), target, self.opacity);
                buffer.set_pixel(x, row, blended);
                stats.blended += 1;
            }
        }
        progress.finished();

        log::debug!(
            "Composited {} of {} pixels",
            stats.blended,
            stats.blended + stats.untouched
        );
        Ok(stats)
    }
}
