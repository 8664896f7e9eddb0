//! Pointer input tracking.
//!
//! The tracker only remembers the latest state. Intermediate positions between
//! two frames are overwritten.

use backdrop_core::{Point, Viewport};

/// A pointer event delivered by the host, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move(Point),
    Press(Point),
    Release(Point),
    Click(Point),
    /// Vertical scroll by `delta` logical pixels (positive is down).
    Scroll(f32),
}

impl PointerEvent {
    /// The kind of listener that receives this event.
    pub fn listener(&self) -> ListenerKind {
        match self {
            PointerEvent::Move(_) => ListenerKind::PointerMove,
            PointerEvent::Press(_) => ListenerKind::PointerDown,
            PointerEvent::Release(_) => ListenerKind::PointerUp,
            PointerEvent::Click(_) => ListenerKind::Click,
            PointerEvent::Scroll(_) => ListenerKind::Scroll,
        }
    }
}

/// Event channels an engine can subscribe to on its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListenerKind {
    Resize,
    PointerMove,
    PointerDown,
    PointerUp,
    Click,
    Scroll,
}

/// How an engine stores pointer positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateSpace {
    /// Raw logical pixels.
    #[default]
    Pixels,
    /// Fractions of the surface size at the time of the event.
    Normalized,
}

/// Latest pointer state as seen by the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pointer {
    /// Last known position in the tracker's coordinate space, `None` until
    /// the first event carrying a position.
    pub position: Option<Point>,
    /// Whether the primary button is held.
    pub pressed: bool,
}

/// Records pointer state between frames.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    space: CoordinateSpace,
    pointer: Pointer,
    scroll_y: f32,
}

impl InputTracker {
    pub fn new(space: CoordinateSpace) -> Self {
        Self {
            space,
            ..Self::default()
        }
    }

    pub fn space(&self) -> CoordinateSpace {
        self.space
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    /// Accumulated vertical scroll offset.
    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    /// Pointer position in logical pixels for the given viewport.
    pub fn position_px(&self, viewport: Viewport) -> Option<Point> {
        let p = self.pointer.position?;
        Some(match self.space {
            CoordinateSpace::Pixels => p,
            CoordinateSpace::Normalized => Point::new(p.x * viewport.width, p.y * viewport.height),
        })
    }

    /// Overwrite state from `event`.
    pub fn track(&mut self, event: &PointerEvent, viewport: Viewport) {
        match *event {
            PointerEvent::Move(p) | PointerEvent::Click(p) => {
                self.pointer.position = Some(self.convert(p, viewport));
            }
            PointerEvent::Press(p) => {
                self.pointer.position = Some(self.convert(p, viewport));
                self.pointer.pressed = true;
            }
            PointerEvent::Release(p) => {
                self.pointer.position = Some(self.convert(p, viewport));
                self.pointer.pressed = false;
            }
            PointerEvent::Scroll(delta) => self.scroll_y += delta,
        }
    }

    fn convert(&self, p: Point, viewport: Viewport) -> Point {
        match self.space {
            CoordinateSpace::Pixels => p,
            CoordinateSpace::Normalized => Point::new(
                p.x / viewport.width.max(1.0),
                p.y / viewport.height.max(1.0),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_position_is_kept() {
        let vp = Viewport::new(800.0, 600.0);
        let mut input = InputTracker::new(CoordinateSpace::Pixels);
        assert_eq!(input.pointer().position, None);
        input.track(&PointerEvent::Move(Point::new(10.0, 10.0)), vp);
        input.track(&PointerEvent::Move(Point::new(20.0, 30.0)), vp);
        assert_eq!(input.pointer().position, Some(Point::new(20.0, 30.0)));
    }

    #[test]
    fn test_press_and_release_toggle_flag() {
        let vp = Viewport::new(800.0, 600.0);
        let mut input = InputTracker::default();
        input.track(&PointerEvent::Press(Point::new(1.0, 1.0)), vp);
        assert!(input.pointer().pressed);
        input.track(&PointerEvent::Move(Point::new(2.0, 2.0)), vp);
        assert!(input.pointer().pressed);
        input.track(&PointerEvent::Release(Point::new(2.0, 2.0)), vp);
        assert!(!input.pointer().pressed);
    }

    #[test]
    fn test_normalized_space() {
        let vp = Viewport::new(800.0, 600.0);
        let mut input = InputTracker::new(CoordinateSpace::Normalized);
        input.track(&PointerEvent::Move(Point::new(400.0, 150.0)), vp);
        assert_eq!(input.pointer().position, Some(Point::new(0.5, 0.25)));
        let wider = Viewport::new(1600.0, 600.0);
        assert_eq!(input.position_px(wider), Some(Point::new(800.0, 150.0)));
    }

    #[test]
    fn test_scroll_accumulates() {
        let vp = Viewport::new(10.0, 10.0);
        let mut input = InputTracker::default();
        input.track(&PointerEvent::Scroll(48.0), vp);
        input.track(&PointerEvent::Scroll(-16.0), vp);
        assert_eq!(input.scroll_y(), 32.0);
        assert_eq!(input.pointer().position, None);
    }
}
