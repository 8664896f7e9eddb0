//! Core types for the backdrop background animations.
//!
//! Shared by the engine, the configuration layer and the terminal front-end:
//! geometry in logical pixels, colors, per-background settings and the keys
//! that name every background.

mod color;
mod geometry;
mod kind;
mod settings;

pub use color::{Paint, Rgb, hsl_to_rgb};
pub use geometry::{CELL_HEIGHT_PX, CELL_WIDTH_PX, Point, Viewport};
pub use kind::{BackgroundKind, UnknownBackground};
pub use settings::{SettingSpec, SettingValue, Settings};
