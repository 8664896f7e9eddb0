//! Expanding rings: large ones on click, small ones now and then on move.

use backdrop_core::{BackgroundKind, Paint, Point, Rgb, Viewport};
use rand::{Rng, rngs::StdRng};

use crate::background::{Background, FrameContext};
use crate::input::{ListenerKind, PointerEvent};
use crate::store::{ElementStore, Lifetime};
use crate::surface::Surface;

const GROWTH: f32 = 2.0;
const DECAY: f32 = 0.01;
const MOVE_SPAWN_PROBABILITY: f64 = 0.05;
const MOVE_RIPPLE_RADIUS: f32 = 100.0;
/// Click ripples grow to this fraction of the longer viewport side.
const CLICK_REACH: f32 = 0.8;
const INNER_GAP: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Ring {
    center: Point,
    radius: f32,
    max_radius: f32,
    life: f32,
}

impl Ring {
    fn new(center: Point, max_radius: f32) -> Self {
        Self {
            center,
            radius: 0.0,
            max_radius,
            life: 1.0,
        }
    }
}

impl Lifetime for Ring {
    fn is_expired(&self) -> bool {
        self.life <= 0.0 || self.radius > self.max_radius
    }
}

#[derive(Debug, Default)]
pub struct Ripple {
    rings: ElementStore<Ring>,
}

impl Ripple {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Background for Ripple {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::Ripple
    }

    fn listeners(&self) -> &'static [ListenerKind] {
        &[ListenerKind::PointerMove, ListenerKind::Click]
    }

    /// Rings do not depend on the layout and survive a resize.
    fn seed(&mut self, _viewport: Viewport, _rng: &mut StdRng) {}

    fn advance(&mut self, _ctx: &mut FrameContext<'_>) {
        for ring in &mut self.rings {
            ring.radius += GROWTH;
            ring.life -= DECAY;
        }
    }

    fn cull(&mut self) {
        self.rings.cull();
    }

    fn paint_background(&self, surface: &mut Surface) {
        surface.fill_vertical_gradient(Rgb::new(26, 26, 46), Rgb::new(22, 33, 62));
    }

    fn render(&self, surface: &mut Surface, _ctx: &FrameContext<'_>) {
        for ring in &self.rings {
            surface.stroke_circle(
                ring.center,
                ring.radius,
                2.0,
                Paint::rgba(100, 200, 255, ring.life * 0.6),
            );
            if ring.radius > INNER_GAP {
                surface.stroke_circle(
                    ring.center,
                    ring.radius - INNER_GAP,
                    1.0,
                    Paint::rgba(150, 150, 255, ring.life * 0.4),
                );
            }
        }
    }

    fn on_pointer(&mut self, event: &PointerEvent, ctx: &mut FrameContext<'_>) {
        match *event {
            PointerEvent::Click(p) => {
                let reach = ctx.viewport.width.max(ctx.viewport.height) * CLICK_REACH;
                self.rings.spawn(Ring::new(p, reach));
            }
            PointerEvent::Move(p) if ctx.rng.gen_bool(MOVE_SPAWN_PROBABILITY) => {
                self.rings.spawn(Ring::new(p, MOVE_RIPPLE_RADIUS));
            }
            _ => {}
        }
    }

    fn population(&self) -> usize {
        self.rings.len()
    }

    fn positions(&self) -> Vec<Point> {
        self.rings.iter().map(|r| r.center).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn ctx<'a>(rng: &'a mut StdRng) -> FrameContext<'a> {
        FrameContext {
            viewport: Viewport::new(1000.0, 500.0),
            pointer: None,
            pressed: false,
            phase: 0.0,
            frame: 0,
            now_ms: 0,
            scroll_y: 0.0,
            rng,
        }
    }

    #[test]
    fn test_click_ripple_reaches_most_of_the_screen() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut ripple = Ripple::new();
        ripple.on_pointer(&PointerEvent::Click(Point::new(10.0, 10.0)), &mut ctx(&mut rng));
        assert_eq!(ripple.rings.as_slice()[0].max_radius, 800.0);
    }

    #[test]
    fn test_rings_fade_out_and_are_culled() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut ripple = Ripple::new();
        ripple.on_pointer(&PointerEvent::Click(Point::new(10.0, 10.0)), &mut ctx(&mut rng));
        ripple.rings.spawn(Ring::new(Point::new(0.0, 0.0), MOVE_RIPPLE_RADIUS));
        let mut frames = 0;
        while ripple.population() > 0 && frames < 500 {
            ripple.advance(&mut ctx(&mut rng));
            ripple.cull();
            assert!(ripple.rings.iter().all(|r| r.life > 0.0 && r.radius <= r.max_radius));
            frames += 1;
        }
        assert_eq!(ripple.population(), 0);
        // Life runs out after about 100 frames, well before 800 px.
        assert!((99..=101).contains(&frames));
    }

    #[test]
    fn test_moves_spawn_occasionally() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut ripple = Ripple::new();
        for i in 0..1000 {
            let p = Point::new(i as f32, 0.0);
            ripple.on_pointer(&PointerEvent::Move(p), &mut ctx(&mut rng));
        }
        let n = ripple.population();
        assert!(n > 10 && n < 120, "{n}");
        assert!(ripple.rings.iter().all(|r| r.max_radius == MOVE_RIPPLE_RADIUS));
    }
}
