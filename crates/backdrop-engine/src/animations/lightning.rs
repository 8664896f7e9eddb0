//! Lightning: jagged bolts struck top to bottom by recursive midpoint
//! displacement, fading out quickly.

use backdrop_core::{BackgroundKind, Paint, Point, Rgb, Viewport};
use rand::rngs::StdRng;

use super::uniform;
use crate::background::{Background, FrameContext};
use crate::input::ListenerKind;
use crate::store::{ElementStore, Lifetime, SpawnPolicy};
use crate::surface::Surface;

/// Recursion stops below this depth.
pub const MAX_DEPTH: u32 = 8;
const MAX_OFFSET: f32 = 15.0;
const DECAY: f32 = 0.02;
const SPAWN: SpawnPolicy = SpawnPolicy::Random {
    probability: 0.05,
    cap: 16,
};

#[derive(Debug, Clone, PartialEq)]
struct Bolt {
    points: Vec<Point>,
    life: f32,
    hue: f32,
}

impl Lifetime for Bolt {
    fn is_expired(&self) -> bool {
        self.life <= 0.0
    }
}

/// Points of a bolt from `from` to `to`, displacing every midpoint.
fn strike(from: Point, to: Point, depth: u32, rng: &mut StdRng, out: &mut Vec<Point>) {
    if depth > MAX_DEPTH {
        out.push(to);
        return;
    }
    let mid = Point::new(
        (from.x + to.x) / 2.0 + uniform(rng, -MAX_OFFSET, MAX_OFFSET),
        (from.y + to.y) / 2.0 + uniform(rng, -MAX_OFFSET, MAX_OFFSET),
    );
    out.push(from);
    strike(from, mid, depth + 1, rng, out);
    strike(mid, to, depth + 1, rng, out);
}

#[derive(Debug, Default)]
pub struct Lightning {
    bolts: ElementStore<Bolt>,
}

impl Lightning {
    pub fn new() -> Self {
        Self::default()
    }

    fn bolt(viewport: Viewport, rng: &mut StdRng) -> Bolt {
        let x = uniform(rng, 0.0, viewport.width);
        let top = Point::new(x, 0.0);
        let bottom = Point::new(x + uniform(rng, -100.0, 100.0), viewport.height);
        let mut points = Vec::new();
        strike(top, bottom, 0, rng, &mut points);
        Bolt {
            points,
            life: 1.0,
            hue: uniform(rng, 200.0, 260.0),
        }
    }
}

impl Background for Lightning {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::Lightning
    }

    fn listeners(&self) -> &'static [ListenerKind] {
        &[]
    }

    fn seed(&mut self, _viewport: Viewport, _rng: &mut StdRng) {
        self.bolts.clear();
    }

    fn advance(&mut self, _ctx: &mut FrameContext<'_>) {
        for bolt in &mut self.bolts {
            bolt.life -= DECAY;
        }
    }

    fn cull(&mut self) {
        self.bolts.cull();
    }

    fn spawn(&mut self, ctx: &mut FrameContext<'_>) {
        if self.bolts.is_empty() || SPAWN.frame_spawn(self.bolts.len(), ctx.rng) {
            self.bolts.spawn(Self::bolt(ctx.viewport, ctx.rng));
        }
    }

    fn paint_background(&self, surface: &mut Surface) {
        surface.clear(Rgb::new(10, 10, 30));
    }

    fn render(&self, surface: &mut Surface, _ctx: &FrameContext<'_>) {
        for bolt in &self.bolts {
            let core = Paint::hsla(bolt.hue, 1.0, 0.7, bolt.life);
            surface.stroke_path(&bolt.points, 6.0, core.fade(0.3));
            surface.stroke_path(&bolt.points, 2.0, core);
        }
    }

    fn population(&self) -> usize {
        self.bolts.len()
    }

    fn positions(&self) -> Vec<Point> {
        self.bolts
            .iter()
            .filter_map(|b| b.points.first().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_strike_is_bounded_by_depth_cap() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut points = Vec::new();
        strike(Point::new(0.0, 0.0), Point::new(0.0, 600.0), 0, &mut rng, &mut points);
        // Each level emits its start point and recurses twice; leaves emit the end.
        assert_eq!(points.len(), (1 << (MAX_DEPTH + 2)) - 1);
        assert_eq!(points[0], Point::new(0.0, 0.0));
        assert_eq!(*points.last().unwrap(), Point::new(0.0, 600.0));
    }

    #[test]
    fn test_always_one_bolt_and_never_above_cap() {
        let viewport = Viewport::new(400.0, 300.0);
        let mut rng = StdRng::seed_from_u64(2);
        let mut lightning = Lightning::new();
        lightning.seed(viewport, &mut rng);
        for frame in 0..2000 {
            let mut ctx = FrameContext {
                viewport,
                pointer: None,
                pressed: false,
                phase: 0.0,
                frame,
                now_ms: 0,
                scroll_y: 0.0,
                rng: &mut rng,
            };
            lightning.advance(&mut ctx);
            lightning.cull();
            lightning.spawn(&mut ctx);
            assert!(lightning.population() >= 1);
            assert!(lightning.population() <= 17);
            assert!(lightning.bolts.iter().all(|b| b.life > 0.0));
        }
    }
}
