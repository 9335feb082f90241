//! Host-independent core of the portfolio's ambient effects: a snowfall
//! particle field and a typewriter text cycler.
//!
//! Platform access (viewport, drawing surface, frame and timer scheduling,
//! media queries) goes through the ports in [`platform`] and [`schedule`],
//! so everything here runs natively under test.

pub mod config;
pub mod field;
pub mod math;
pub mod particle;
pub mod platform;
pub mod render;
pub mod schedule;
pub mod typewriter;
