use lapmap_image::Rgb;

/// Blend factor toward the encoded color used by diagnostic images.
pub const DEFAULT_OPACITY: f32 = 0.7;

/// `from + (to - from) * k`, truncated toward zero.
pub fn lerp_channel(from: u8, to: u8, k: f32) -> u8 {
    let from = f32::from(from);
    (from + (f32::from(to) - from) * k) as u8
}

/// Per-channel [`lerp_channel`].
pub fn blend_rgb(map: Rgb, target: Rgb, k: f32) -> Rgb {
    [
        lerp_channel(map[0], target[0], k),
        lerp_channel(map[1], target[1], k),
        lerp_channel(map[2], target[2], k),
    ]
}
