#![allow(dead_code)]

use std::cell::Cell;

use ambient_fx_core::config::TypewriterConfig;
use ambient_fx_core::platform::{ColorMode, Environment, Surface, SurfaceLayout, Viewport};
use ambient_fx_core::render::Rgba;
use ambient_fx_core::schedule::ManualScheduler;
use ambient_fx_core::typewriter::Typewriter;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Environment whose signals can be flipped mid-test.
pub struct FakeEnv {
    pub viewport: Cell<Viewport>,
    pub reduced_motion: Cell<bool>,
    pub dark: Cell<bool>,
}

impl FakeEnv {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Cell::new(Viewport::new(width, height, 1.0)),
            reduced_motion: Cell::new(false),
            dark: Cell::new(false),
        }
    }

    pub fn resize(&self, width: f32, height: f32) {
        let dpr = self.viewport.get().device_pixel_ratio;
        self.viewport.set(Viewport::new(width, height, dpr));
    }
}

impl Environment for FakeEnv {
    fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion.get()
    }

    fn color_mode(&self) -> ColorMode {
        if self.dark.get() {
            ColorMode::Dark
        } else {
            ColorMode::Light
        }
    }
}

/// Draw call captured by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Resize(SurfaceLayout),
    Clear(f32, f32),
    Fill(Rgba),
    Circle(Vec2, f32),
}

#[derive(Default)]
pub struct RecordingSurface {
    pub ops: Vec<Op>,
}

impl RecordingSurface {
    pub fn circles(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, Op::Circle(..))).count()
    }

    pub fn last_fill(&self) -> Option<Rgba> {
        self.ops.iter().rev().find_map(|op| match op {
            Op::Fill(c) => Some(*c),
            _ => None,
        })
    }

    pub fn last_resize(&self) -> Option<SurfaceLayout> {
        self.ops.iter().rev().find_map(|op| match op {
            Op::Resize(l) => Some(*l),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, layout: &SurfaceLayout) {
        self.ops.push(Op::Resize(*layout));
    }

    fn clear(&mut self, width: f32, height: f32) {
        self.ops.push(Op::Clear(width, height));
    }

    fn set_fill(&mut self, color: Rgba) {
        self.ops.push(Op::Fill(color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32) {
        self.ops.push(Op::Circle(center, radius));
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Typewriter config with the given typing delay and defaults otherwise.
pub fn typing_at(typing_delay_ms: u32) -> TypewriterConfig {
    TypewriterConfig {
        typing_delay_ms,
        ..TypewriterConfig::default()
    }
}

/// Advance virtual time, delivering every timer that comes due.
pub fn advance(tw: &mut Typewriter, sched: &mut ManualScheduler, ms: u64) {
    sched.advance_by(ms, |id, s| {
        tw.on_timer(id, s);
    });
}
