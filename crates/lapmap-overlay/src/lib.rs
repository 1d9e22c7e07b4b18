//! Lap-position overlay: color encoding, blending, and the field compositor.
//!
//! Every pixel with a [`LapPosition`](lapmap_field::LapPosition) is tinted toward a
//! color whose channels carry its three values:
//!
//! | channel | value                                  |
//! |---------|----------------------------------------|
//! | red     | closeness to the centerline            |
//! | green   | section index relative to the count    |
//! | blue    | progress through the section           |
//!
//! Pixels off the drivable surface keep the rasterized map color.

mod blend;
mod compositor;
mod encode;
mod progress;

pub use blend::{DEFAULT_OPACITY, blend_rgb, lerp_channel};
pub use compositor::{CompositeStats, Compositor, FieldLookupError, row_percent};
pub use encode::encode_lap_position;
pub use progress::{ConsoleProgress, NoProgress, ProgressObserver};
