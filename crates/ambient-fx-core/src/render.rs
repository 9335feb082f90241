use crate::particle::FlakeSet;
use crate::platform::ColorMode;

/// Flake fill opacity on a dark page.
pub const DARK_ALPHA: f32 = 0.55;
/// Flake fill opacity on a light page.
pub const LIGHT_ALPHA: f32 = 0.42;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn white(a: f32) -> Self {
        Self {
            r: 255,
            g: 255,
            b: 255,
            a,
        }
    }

    /// CSS `rgba()` notation, as accepted by canvas fill styles.
    pub fn to_css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

/// Snow is always white; only its opacity follows the page theme.
pub fn flake_fill(mode: ColorMode) -> Rgba {
    match mode {
        ColorMode::Dark => Rgba::white(DARK_ALPHA),
        ColorMode::Light => Rgba::white(LIGHT_ALPHA),
    }
}

/// Flat per-flake record for hosts that draw the pool themselves:
/// 16 bytes, four f32 lanes.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FlakeInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub alpha: f32,
}

/// Rewrite `out` with one instance per flake.
pub fn write_instances(flakes: &FlakeSet, alpha: f32, out: &mut Vec<FlakeInstance>) {
    out.clear();
    out.extend((0..flakes.count).map(|i| FlakeInstance {
        center: flakes.position[i].to_array(),
        radius: flakes.radius[i],
        alpha,
    }));
}
