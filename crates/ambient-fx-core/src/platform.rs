//! Ports for everything the field reads from or draws to the host page.

use glam::Vec2;

use crate::math::capped_pixel_ratio;
use crate::render::Rgba;

/// Viewport dimensions in CSS pixels plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Surface sizing for this viewport: backing store at the capped
    /// pixel ratio, on-screen box at viewport size.
    pub fn layout(&self) -> SurfaceLayout {
        let width = self.width.max(0.0);
        let height = self.height.max(0.0);
        let scale = capped_pixel_ratio(self.device_pixel_ratio);
        SurfaceLayout {
            backing_width: (width * scale).floor() as u32,
            backing_height: (height * scale).floor() as u32,
            css_width: width,
            css_height: height,
            scale,
        }
    }
}

/// How a surface should be sized after a viewport change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceLayout {
    pub backing_width: u32,
    pub backing_height: u32,
    pub css_width: f32,
    pub css_height: f32,
    /// Uniform transform applied so drawing coordinates stay in CSS pixels.
    pub scale: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    #[default]
    Light,
    Dark,
}

/// Read-only platform signals. Hosts without media-query support report
/// motion allowed and light mode.
pub trait Environment {
    fn viewport(&self) -> Viewport;
    fn prefers_reduced_motion(&self) -> bool;
    fn color_mode(&self) -> ColorMode;
}

/// A 2D raster target in viewport coordinates.
pub trait Surface {
    fn resize(&mut self, layout: &SurfaceLayout);
    fn clear(&mut self, width: f32, height: f32);
    fn set_fill(&mut self, color: Rgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32);
}
