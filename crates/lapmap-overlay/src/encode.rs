//! Lap position to RGB encoding.

use lapmap_config::ChannelMode;
use lapmap_field::LapPosition;
use lapmap_image::Rgb;

/// Encode a lap position as a color.
///
/// - red: `round((1 - |center_distance|) * 255)`
/// - green: `section_id * 255 / section_count`, integer division
/// - blue: `round(section_distance * 255)`
///
/// In [`ChannelMode::Wrap`] out-of-range results wrap modulo 256, which is what
/// existing diagnostic images were produced with. A zero `section_count` encodes
/// green as 0.
pub fn encode_lap_position(pos: &LapPosition, section_count: u32, mode: ChannelMode) -> Rgb {
    let r = ((1.0 - pos.center_distance.abs()) * 255.0).round() as i64;
    let g = if section_count == 0 {
        0
    } else {
        i64::from(pos.section_id) * 255 / i64::from(section_count)
    };
    let b = (pos.section_distance * 255.0).round() as i64;

    [to_byte(r, mode), to_byte(g, mode), to_byte(b, mode)]
}

fn to_byte(value: i64, mode: ChannelMode) -> u8 {
    match mode {
        ChannelMode::Wrap => value as u8,
        ChannelMode::Clamp => value.clamp(0, 255) as u8,
    }
}
