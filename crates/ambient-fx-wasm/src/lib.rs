//! Browser bindings for the ambient effects.
//!
//! JavaScript constructs a [`Snowfall`] over a canvas and a
//! [`TypewriterText`] over an element; each drives itself with
//! `requestAnimationFrame` / `setTimeout` until `unmount()` or `free()`.

mod console;
mod dom;
mod error;
mod snowfall;
mod typewriter;

pub use error::HostError;
pub use snowfall::Snowfall;
pub use typewriter::TypewriterText;
