//! Falling resin drops drawn toward the pointer, linked while close.

use backdrop_core::{BackgroundKind, Paint, Point, Rgb, Viewport};
use rand::rngs::StdRng;

use super::{random_point, uniform};
use crate::background::{Background, FrameContext};
use crate::interaction::{Influence, for_each_link};
use crate::store::ElementStore;
use crate::surface::Surface;

const RESIN: Rgb = Rgb::new(200, 180, 150);

/// Constants distinguishing the two flow flavours.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tuning {
    kind: BackgroundKind,
    count: usize,
    size: (f32, f32),
    pull: Influence,
    glow_step: f32,
    glow_swing: f32,
    /// Horizontal velocity factor when a drop hits a side wall.
    wall_bounce: f32,
    damping: f32,
    link_distance: f32,
    link_width: f32,
}

const INJECTION: Tuning = Tuning {
    kind: BackgroundKind::InjectionFlow,
    count: 100,
    size: (1.0, 4.0),
    pull: Influence::new(150.0, 0.05),
    glow_step: 0.01,
    glow_swing: 0.3,
    wall_bounce: -1.0,
    damping: 1.0,
    link_distance: 80.0,
    link_width: 1.0,
};

const POLYURETHANE: Tuning = Tuning {
    kind: BackgroundKind::PolyurethaneFlow,
    count: 80,
    size: (2.0, 6.0),
    pull: Influence::new(120.0, 0.08),
    glow_step: 0.005,
    glow_swing: 0.2,
    wall_bounce: -0.8,
    damping: 0.99,
    link_distance: 70.0,
    link_width: 1.5,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bead {
    at: Point,
    vx: f32,
    vy: f32,
    size: f32,
    /// Phase of the opacity shimmer.
    glow: f32,
}

#[derive(Debug)]
pub struct Flow {
    tuning: Tuning,
    viewport: Viewport,
    drops: ElementStore<Bead>,
}

impl Flow {
    pub fn injection() -> Self {
        Self::with_tuning(INJECTION)
    }

    pub fn polyurethane() -> Self {
        Self::with_tuning(POLYURETHANE)
    }

    fn with_tuning(tuning: Tuning) -> Self {
        Self {
            tuning,
            viewport: Viewport::default(),
            drops: ElementStore::new(),
        }
    }
}

impl Background for Flow {
    fn kind(&self) -> BackgroundKind {
        self.tuning.kind
    }

    fn seed(&mut self, viewport: Viewport, rng: &mut StdRng) {
        self.viewport = viewport;
        let (lo, hi) = self.tuning.size;
        let drops: Vec<Bead> = (0..self.tuning.count)
            .map(|_| Bead {
                at: random_point(rng, viewport),
                vx: uniform(rng, -0.15, 0.15),
                vy: uniform(rng, 0.2, 0.7),
                size: uniform(rng, lo, hi),
                glow: uniform(rng, 0.0, 1.0),
            })
            .collect();
        self.drops.replace(drops);
    }

    fn advance(&mut self, ctx: &mut FrameContext<'_>) {
        let viewport = self.viewport;
        for drop in &mut self.drops {
            drop.at.x += drop.vx;
            drop.at.y += drop.vy;
            drop.glow += self.tuning.glow_step;
            // Drops leaving the bottom re-enter from the top.
            if drop.at.y > viewport.height {
                drop.at.y = -drop.size;
                drop.at.x = uniform(ctx.rng, 0.0, viewport.width);
            }
            if drop.at.x < 0.0 || drop.at.x > viewport.width {
                drop.vx *= self.tuning.wall_bounce;
            }
        }
    }

    fn interact(&mut self, ctx: &mut FrameContext<'_>) {
        for drop in &mut self.drops {
            if let Some(pointer) = ctx.pointer
                && let Some((dx, dy)) = self.tuning.pull.toward(drop.at, pointer)
            {
                drop.vx += dx;
                drop.vy += dy;
            }
            drop.vx *= self.tuning.damping;
            drop.vy *= self.tuning.damping;
        }
    }

    fn paint_background(&self, surface: &mut Surface) {
        surface.clear(Rgb::new(50, 50, 50));
    }

    fn render(&self, surface: &mut Surface, _ctx: &FrameContext<'_>) {
        let points: Vec<Point> = self.drops.iter().map(|d| d.at).collect();
        for_each_link(&points, self.tuning.link_distance, 0.2, |i, j, opacity| {
            surface.stroke_line(
                points[i],
                points[j],
                self.tuning.link_width,
                Paint::from(RESIN).with_alpha(opacity),
            );
        });
        for drop in &self.drops {
            let alpha = drop.glow.sin() * self.tuning.glow_swing + 0.7;
            surface.fill_circle(drop.at, drop.size, Paint::from(RESIN).with_alpha(alpha));
        }
    }

    fn population(&self) -> usize {
        self.drops.len()
    }

    fn positions(&self) -> Vec<Point> {
        self.drops.iter().map(|d| d.at).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn ctx<'a>(rng: &'a mut StdRng, pointer: Option<Point>) -> FrameContext<'a> {
        FrameContext {
            viewport: Viewport::new(400.0, 300.0),
            pointer,
            pressed: false,
            phase: 0.0,
            frame: 0,
            now_ms: 0,
            scroll_y: 0.0,
            rng,
        }
    }

    #[test]
    fn test_flavours_seed_their_counts() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut a = Flow::injection();
        let mut b = Flow::polyurethane();
        a.seed(Viewport::new(400.0, 300.0), &mut rng);
        b.seed(Viewport::new(400.0, 300.0), &mut rng);
        assert_eq!(a.population(), 100);
        assert_eq!(b.population(), 80);
        assert_eq!(b.kind(), BackgroundKind::PolyurethaneFlow);
    }

    #[test]
    fn test_drop_past_bottom_reenters_above_top() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut flow = Flow::injection();
        flow.viewport = Viewport::new(400.0, 300.0);
        flow.drops.replace([Bead {
            at: Point::new(100.0, 299.9),
            vx: 0.0,
            vy: 0.5,
            size: 3.0,
            glow: 0.0,
        }]);
        flow.advance(&mut ctx(&mut rng, None));
        let drop = flow.drops.as_slice()[0];
        assert_eq!(drop.at.y, -3.0);
        assert!((0.0..400.0).contains(&drop.at.x));
    }

    #[test]
    fn test_pointer_pulls_drops_in() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut flow = Flow::polyurethane();
        flow.viewport = Viewport::new(400.0, 300.0);
        flow.drops.replace([Bead {
            at: Point::new(100.0, 100.0),
            vx: 0.0,
            vy: 0.0,
            size: 3.0,
            glow: 0.0,
        }]);
        flow.interact(&mut ctx(&mut rng, Some(Point::new(160.0, 100.0))));
        let drop = flow.drops.as_slice()[0];
        assert!(drop.vx > 0.0);
        assert_eq!(drop.vy, 0.0);
    }
}
