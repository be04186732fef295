//! Rendering module
//!
//! `scene` builds draw commands from the simulation; `canvas` paints them with
//! the browser's Canvas 2D API.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;
pub use scene::{
    DrawCmd, Scene, TextAlign, build, chaos_indicator_text, high_text, log_line, score_text,
};
