//! The engine: one mounted background and its frame loop.

use std::time::{SystemTime, UNIX_EPOCH};

use backdrop_core::{SettingValue, Viewport};
use rand::{SeedableRng, rngs::StdRng};

use crate::background::{Background, FrameContext};
use crate::input::{InputTracker, ListenerKind, PointerEvent};
use crate::scheduler::{EngineState, FrameHandle, FrameHost, ListenerId};
use crate::surface::Surface;

/// One running instance of a background bound to one surface.
#[derive(Debug)]
pub struct Engine {
    background: Box<dyn Background>,
    /// Present while mounted.
    surface: Option<Surface>,
    viewport: Viewport,
    input: InputTracker,
    clock_phase: f32,
    frame: u64,
    now_ms: u64,
    state: EngineState,
    scheduled_frame: Option<FrameHandle>,
    listeners: Vec<ListenerId>,
    rng: StdRng,
}

impl Engine {
    /// Create an idle engine seeded from the system clock.
    pub fn new(background: Box<dyn Background>) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::with_seed(background, seed)
    }

    /// Create an idle engine with a fixed random seed.
    pub fn with_seed(background: Box<dyn Background>, seed: u64) -> Self {
        let input = InputTracker::new(background.coordinate_space());
        Self {
            background,
            surface: None,
            viewport: Viewport::default(),
            input,
            clock_phase: 0.0,
            frame: 0,
            now_ms: 0,
            state: EngineState::Idle,
            scheduled_frame: None,
            listeners: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn background(&self) -> &dyn Background {
        self.background.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn clock_phase(&self) -> f32 {
        self.clock_phase
    }

    pub fn frames(&self) -> u64 {
        self.frame
    }

    pub fn scheduled_frame(&self) -> Option<FrameHandle> {
        self.scheduled_frame
    }

    pub fn input(&self) -> &InputTracker {
        &self.input
    }

    /// Create the surface, seed elements, subscribe to events and request the
    /// first frame. Only an idle engine can be mounted.
    pub fn mount(&mut self, host: &mut dyn FrameHost, viewport: Viewport) {
        if self.state != EngineState::Idle {
            tracing::warn!(state = ?self.state, "mount ignored");
            return;
        }
        self.viewport = viewport;
        self.surface = Some(Surface::new(viewport));
        self.background.seed(viewport, &mut self.rng);

        self.listeners.push(host.add_listener(ListenerKind::Resize));
        for kind in self.background.listeners() {
            self.listeners.push(host.add_listener(*kind));
        }
        self.scheduled_frame = Some(host.request_frame());
        self.state = EngineState::Running;
        tracing::debug!(
            background = %self.background.kind(),
            width = viewport.width,
            height = viewport.height,
            elements = self.background.population(),
            "engine mounted"
        );
    }

    /// Match the surface to a new viewport and reseed the layout. Resizing to
    /// the current dimensions does nothing.
    pub fn resize(&mut self, viewport: Viewport) {
        if self.state != EngineState::Running {
            return;
        }
        if self.surface.is_some() && viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.surface = Some(Surface::new(viewport));
        self.background.seed(viewport, &mut self.rng);
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            elements = self.background.population(),
            "surface resized"
        );
    }

    /// Record a pointer event and let the background react to it.
    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        if self.state != EngineState::Running {
            return;
        }
        self.input.track(event, self.viewport);
        let pointer = self.input.pointer();
        let mut ctx = FrameContext {
            viewport: self.viewport,
            pointer: self.input.position_px(self.viewport),
            pressed: pointer.pressed,
            phase: self.clock_phase,
            frame: self.frame,
            now_ms: self.now_ms,
            scroll_y: self.input.scroll_y(),
            rng: &mut self.rng,
        };
        self.background.on_pointer(event, &mut ctx);
    }

    /// Run one frame for `handle` and request the next one.
    ///
    /// Returns `false` without doing anything when the engine is not running,
    /// the handle is not the pending one, or the surface is gone. In the last
    /// case no further frame is requested.
    pub fn run_frame(&mut self, handle: FrameHandle, now_ms: u64, host: &mut dyn FrameHost) -> bool {
        if self.state != EngineState::Running || self.scheduled_frame != Some(handle) {
            return false;
        }
        self.scheduled_frame = None;
        let Some(surface) = self.surface.as_mut() else {
            tracing::debug!("surface detached, frame skipped");
            return false;
        };

        self.now_ms = now_ms;
        self.frame += 1;
        self.clock_phase += self.background.phase_step();

        let pointer = self.input.pointer();
        let mut ctx = FrameContext {
            viewport: self.viewport,
            pointer: self.input.position_px(self.viewport),
            pressed: pointer.pressed,
            phase: self.clock_phase,
            frame: self.frame,
            now_ms,
            scroll_y: self.input.scroll_y(),
            rng: &mut self.rng,
        };
        self.background.advance(&mut ctx);
        self.background.interact(&mut ctx);
        self.background.cull();
        self.background.spawn(&mut ctx);
        self.background.paint_background(surface);
        self.background.render(surface, &ctx);

        self.scheduled_frame = Some(host.request_frame());
        true
    }

    /// Push one changed setting into the running background.
    pub fn update_setting(&mut self, key: &str, value: &SettingValue) {
        if self.state == EngineState::Destroyed {
            return;
        }
        self.background.apply_setting(key, value);
    }

    /// Drop the surface while leaving the engine running, as when the host
    /// container disappears. The next fired frame notices and stops.
    pub fn detach_surface(&mut self) {
        self.surface = None;
    }

    /// Cancel the pending frame and remove every listener. Safe to call any
    /// number of times.
    pub fn destroy(&mut self, host: &mut dyn FrameHost) {
        if let Some(handle) = self.scheduled_frame.take() {
            host.cancel_frame(handle);
        }
        for id in self.listeners.drain(..) {
            host.remove_listener(id);
        }
        if self.state != EngineState::Destroyed {
            tracing::debug!(background = %self.background.kind(), "engine destroyed");
        }
        self.surface = None;
        self.state = EngineState::Destroyed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animations::{self, crack_injection::CrackInjection, grid::Dots};
    use crate::scheduler::RefreshLoop;
    use backdrop_core::{BackgroundKind, Point, Settings};

    fn mounted(background: Box<dyn Background>, viewport: Viewport) -> (Engine, RefreshLoop) {
        let mut host = RefreshLoop::new();
        let mut engine = Engine::with_seed(background, 42);
        engine.mount(&mut host, viewport);
        (engine, host)
    }

    fn tick(engine: &mut Engine, host: &mut RefreshLoop, now_ms: u64) {
        for handle in host.take_due() {
            engine.run_frame(handle, now_ms, host);
        }
    }

    #[test]
    fn test_mount_requests_one_frame_and_subscribes() {
        let (engine, host) = mounted(Box::new(Dots::new()), Viewport::new(400.0, 200.0));
        assert_eq!(engine.state(), EngineState::Running);
        assert_eq!(host.pending_frames(), 1);
        assert!(host.is_listening(ListenerKind::Resize));
        assert!(host.is_listening(ListenerKind::PointerMove));
    }

    #[test]
    fn test_frames_reschedule_and_advance_phase() {
        let (mut engine, mut host) = mounted(Box::new(Dots::new()), Viewport::new(400.0, 200.0));
        for i in 0..5 {
            tick(&mut engine, &mut host, i * 16);
            assert_eq!(host.pending_frames(), 1);
        }
        assert_eq!(engine.frames(), 5);
        assert!((engine.clock_phase() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_destroy_twice_leaves_nothing_scheduled() {
        let (mut engine, mut host) = mounted(Box::new(Dots::new()), Viewport::new(400.0, 200.0));
        tick(&mut engine, &mut host, 16);
        engine.destroy(&mut host);
        engine.destroy(&mut host);
        assert_eq!(engine.state(), EngineState::Destroyed);
        assert_eq!(host.pending_frames(), 0);
        assert_eq!(host.listener_count(), 0);
        assert!(engine.surface().is_none());
    }

    #[test]
    fn test_no_restart_after_destroy() {
        let (mut engine, mut host) = mounted(Box::new(Dots::new()), Viewport::new(400.0, 200.0));
        let handle = engine.scheduled_frame().unwrap();
        engine.destroy(&mut host);
        assert!(!engine.run_frame(handle, 0, &mut host));
        engine.mount(&mut host, Viewport::new(400.0, 200.0));
        assert_eq!(engine.state(), EngineState::Destroyed);
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn test_missing_surface_skips_without_rescheduling() {
        let (mut engine, mut host) = mounted(Box::new(Dots::new()), Viewport::new(400.0, 200.0));
        engine.detach_surface();
        tick(&mut engine, &mut host, 16);
        assert_eq!(engine.frames(), 0);
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn test_stale_handle_is_ignored() {
        let (mut engine, mut host) = mounted(Box::new(Dots::new()), Viewport::new(400.0, 200.0));
        let stale = engine.scheduled_frame().unwrap();
        tick(&mut engine, &mut host, 16);
        assert!(!engine.run_frame(stale, 32, &mut host));
        assert_eq!(engine.frames(), 1);
    }

    #[test]
    fn test_zero_viewport_then_resize_fills_layout() {
        let (mut engine, mut host) = mounted(Box::new(Dots::new()), Viewport::new(0.0, 0.0));
        assert_eq!(engine.background().population(), 0);
        let viewport = Viewport::new(800.0, 600.0);
        engine.resize(viewport);
        let positions = engine.background().positions();
        assert!(!positions.is_empty());
        assert!(positions.iter().all(|p| viewport.contains(*p)));
        assert_eq!(engine.surface().map(Surface::viewport), Some(viewport));
        tick(&mut engine, &mut host, 16);
        assert_eq!(engine.frames(), 1);
    }

    #[test]
    fn test_grid_resize_is_idempotent() {
        for kind in [
            BackgroundKind::Dots,
            BackgroundKind::Hexagon,
            BackgroundKind::StructuralMesh,
        ] {
            let (mut engine, _host) =
                mounted(animations::build(kind, &Settings::new()), Viewport::new(320.0, 240.0));
            engine.resize(Viewport::new(1024.0, 768.0));
            let first = engine.background().positions();
            engine.resize(Viewport::new(1024.0, 768.0));
            assert_eq!(engine.background().positions(), first, "{kind}");
        }
    }

    #[test]
    fn test_resize_regenerates_stale_layout() {
        let (mut engine, _host) = mounted(Box::new(Dots::new()), Viewport::new(400.0, 200.0));
        let small = engine.background().population();
        engine.resize(Viewport::new(800.0, 400.0));
        assert!(engine.background().population() > small);
        engine.resize(Viewport::new(400.0, 200.0));
        assert_eq!(engine.background().population(), small);
    }

    #[test]
    fn test_crack_count_update_shrinks_oldest_first() {
        let settings = Settings::new().with("crackCount", 30.0);
        let (mut engine, mut host) = mounted(
            Box::new(CrackInjection::new(BackgroundKind::CrackInjection, &settings)),
            Viewport::new(800.0, 600.0),
        );
        for _ in 0..6 {
            engine.handle_pointer(&PointerEvent::Scroll(480.0));
        }
        tick(&mut engine, &mut host, 16);
        let before = engine.background().population();
        assert!(before >= 8);
        let survivors: Vec<Point> = engine.background().positions()[before - 3..].to_vec();

        engine.update_setting("crackCount", &SettingValue::Number(3.0));
        assert_eq!(engine.background().population(), 3);
        assert_eq!(engine.background().positions(), survivors);

        engine.update_setting("crackCount", &SettingValue::Number(40.0));
        assert_eq!(engine.background().population(), 3);
    }

    #[test]
    fn test_pointer_events_ignored_when_not_running() {
        let mut engine = Engine::with_seed(Box::new(Dots::new()), 1);
        engine.handle_pointer(&PointerEvent::Move(Point::new(5.0, 5.0)));
        assert_eq!(engine.input().pointer().position, None);
    }
}
