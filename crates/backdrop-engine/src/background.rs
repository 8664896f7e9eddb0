//! The strategy interface every background implements.

use std::fmt;

use backdrop_core::{BackgroundKind, Point, Rgb, SettingSpec, SettingValue, Viewport};
use rand::rngs::StdRng;

use crate::input::{CoordinateSpace, ListenerKind, PointerEvent};
use crate::surface::Surface;

/// Per-frame state handed to a background.
pub struct FrameContext<'a> {
    pub viewport: Viewport,
    /// Pointer position in logical pixels, if one is known.
    pub pointer: Option<Point>,
    pub pressed: bool,
    /// Frame-relative clock, advanced by a fixed step every frame.
    pub phase: f32,
    /// Frames fired since mount.
    pub frame: u64,
    /// Host clock in milliseconds, for interval-based spawning only.
    pub now_ms: u64,
    /// Accumulated scroll offset in logical pixels.
    pub scroll_y: f32,
    pub rng: &'a mut StdRng,
}

impl fmt::Debug for FrameContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameContext")
            .field("viewport", &self.viewport)
            .field("pointer", &self.pointer)
            .field("pressed", &self.pressed)
            .field("phase", &self.phase)
            .field("frame", &self.frame)
            .field("now_ms", &self.now_ms)
            .finish_non_exhaustive()
    }
}

/// One background: the elements it owns and how they move and draw.
///
/// The engine calls the per-frame hooks in a fixed order: `advance`,
/// `interact`, `cull`, `spawn`, `paint_background`, `render`.
pub trait Background: fmt::Debug {
    fn kind(&self) -> BackgroundKind;

    /// How pointer positions are stored for this background.
    fn coordinate_space(&self) -> CoordinateSpace {
        CoordinateSpace::Pixels
    }

    /// Event channels to subscribe to besides resize.
    fn listeners(&self) -> &'static [ListenerKind] {
        &[ListenerKind::PointerMove]
    }

    /// Clock increment per frame.
    fn phase_step(&self) -> f32 {
        0.01
    }

    /// Adjustable settings this background reads.
    fn schema(&self) -> &'static [SettingSpec] {
        &[]
    }

    /// (Re)generate every layout-dependent element for `viewport`. Called on
    /// mount and after every real resize.
    fn seed(&mut self, viewport: Viewport, rng: &mut StdRng);

    fn advance(&mut self, _ctx: &mut FrameContext<'_>) {}

    fn interact(&mut self, _ctx: &mut FrameContext<'_>) {}

    fn cull(&mut self) {}

    fn spawn(&mut self, _ctx: &mut FrameContext<'_>) {}

    fn paint_background(&self, surface: &mut Surface) {
        surface.clear(Rgb::new(10, 10, 20));
    }

    fn render(&self, surface: &mut Surface, ctx: &FrameContext<'_>);

    /// React to a pointer event after the tracker recorded it.
    fn on_pointer(&mut self, _event: &PointerEvent, _ctx: &mut FrameContext<'_>) {}

    /// Apply a changed setting, to live elements where that makes sense.
    fn apply_setting(&mut self, _key: &str, _value: &SettingValue) {}

    /// Number of live elements in the primary store.
    fn population(&self) -> usize;

    /// Positions of the primary store's elements, in store order.
    fn positions(&self) -> Vec<Point>;
}
