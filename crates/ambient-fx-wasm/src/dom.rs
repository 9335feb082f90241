use ambient_fx_core::platform::{ColorMode, Environment, Surface, SurfaceLayout, Viewport};
use ambient_fx_core::render::Rgba;
use glam::Vec2;
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MediaQueryList, Window};

use crate::error::HostError;

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Class toggled on `<html>` by the page's theme switcher.
const DARK_CLASS: &str = "dark";

pub fn window() -> Result<Window, HostError> {
    web_sys::window().ok_or(HostError::NoWindow)
}

/// `None` when the browser has no media-query support.
pub fn media_query(window: &Window, query: &str) -> Option<MediaQueryList> {
    window.match_media(query).ok().flatten()
}

pub fn set_styles(el: &HtmlElement, decls: &[(&str, &str)]) -> Result<(), HostError> {
    let style = el.style();
    for (name, value) in decls {
        style.set_property(name, value)?;
    }
    Ok(())
}

fn css_px(value: f32) -> String {
    format!("{value}px")
}

/// Live view of the window's viewport, theme class and media queries.
pub struct WebEnvironment {
    window: Window,
}

impl WebEnvironment {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Environment for WebEnvironment {
    fn viewport(&self) -> Viewport {
        let dimension = |v: Result<wasm_bindgen::JsValue, _>| {
            v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
        };
        Viewport::new(
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
            self.window.device_pixel_ratio() as f32,
        )
    }

    fn prefers_reduced_motion(&self) -> bool {
        media_query(&self.window, REDUCED_MOTION_QUERY).is_some_and(|q| q.matches())
    }

    fn color_mode(&self) -> ColorMode {
        let dark = self
            .window
            .document()
            .and_then(|d| d.document_element())
            .is_some_and(|root| root.class_list().contains(DARK_CLASS));
        if dark {
            ColorMode::Dark
        } else {
            ColorMode::Light
        }
    }
}

/// Canvas 2D context behind the [`Surface`] port.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Turn `canvas` into a fixed, pointer-transparent, decorative layer and
    /// grab its 2D context.
    pub fn attach(canvas: HtmlCanvasElement) -> Result<Self, HostError> {
        canvas.set_attribute("aria-hidden", "true")?;
        set_styles(
            &canvas,
            &[
                ("position", "fixed"),
                ("inset", "0"),
                ("pointer-events", "none"),
                ("z-index", "0"),
            ],
        )?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or(HostError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| HostError::NoContext)?;
        Ok(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, layout: &SurfaceLayout) {
        self.canvas.set_width(layout.backing_width);
        self.canvas.set_height(layout.backing_height);
        let width = css_px(layout.css_width);
        let height = css_px(layout.css_height);
        let size = [("width", width.as_str()), ("height", height.as_str())];
        if let Err(err) = set_styles(&self.canvas, &size) {
            log::warn!("canvas size rejected: {err}");
        }
        let scale = f64::from(layout.scale);
        if let Err(err) = self.ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0) {
            log::warn!("canvas transform rejected: {:?}", err);
        }
    }

    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, f64::from(width), f64::from(height));
    }

    fn set_fill(&mut self, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        if let Err(err) = self.ctx.arc(
            f64::from(center.x),
            f64::from(center.y),
            f64::from(radius),
            0.0,
            TAU,
        ) {
            log::warn!("arc rejected: {:?}", err);
            return;
        }
        self.ctx.fill();
    }
}
