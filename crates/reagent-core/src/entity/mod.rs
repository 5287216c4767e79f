//! Input model - per-tick intents and the brush they drive

pub mod input;
pub mod tools;

pub use input::{IdleInput, InputIntent, InputSource};
pub use tools::{Brush, MAX_BRUSH_RADIUS};
