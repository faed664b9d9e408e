//! Presentation
//!
//! `render` is a pure function of the session; `Screen` implementations
//! decide where the resulting frame is written.

pub mod render;
pub mod screen;

pub use render::{render, terminal_id, RenderOptions};
pub use screen::{Screen, TerminalScreen};
