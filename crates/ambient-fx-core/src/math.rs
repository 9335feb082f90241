/// Smallest pool a sizing pass ever allocates.
pub const MIN_FLAKES: usize = 25;

/// Backing-store resolution is never scaled beyond this ratio.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Pool size for a sizing pass: `floor(max_flakes * intensity)` clamped to
/// `[MIN_FLAKES, max_flakes]`, with `MIN_FLAKES` winning when `max_flakes`
/// is below it. NaN intensity counts as zero.
pub fn pool_size(max_flakes: i32, intensity: f32) -> usize {
    let desired = (max_flakes as f32 * intensity).floor();
    let desired = if desired.is_nan() || desired < 0.0 {
        0
    } else {
        desired as usize
    };
    let upper = usize::try_from(max_flakes).unwrap_or(0);
    desired.min(upper).max(MIN_FLAKES)
}

/// Device pixel ratio capped at [`MAX_PIXEL_RATIO`]. Missing or nonsense
/// ratios fall back to 1.
pub fn capped_pixel_ratio(device_pixel_ratio: f32) -> f32 {
    if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}
