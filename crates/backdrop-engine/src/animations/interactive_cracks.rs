//! Concrete slab whose cracks flex toward the pointer. Clicks open new cracks
//! and moving the pointer sheds dust.

use backdrop_core::{BackgroundKind, Paint, Point, Rgb, Viewport};
use rand::{Rng, rngs::StdRng};

use super::{random_point, uniform};
use crate::background::{Background, FrameContext};
use crate::input::{ListenerKind, PointerEvent};
use crate::interaction::Influence;
use crate::store::{ElementStore, Lifetime, SpawnPolicy};
use crate::surface::Surface;

const SEED_CRACKS: usize = 8;
const FLEX: Influence = Influence::new(120.0, 8.0);
const DUST_SPAWN_PROBABILITY: f64 = 0.2;
const DUST_DECAY: f32 = 0.02;
const DUST_CAP: usize = 100;
const DUST_DAMPING: f32 = 0.98;
const CLICK_CRACKS: SpawnPolicy = SpawnPolicy::OnPress { cap: 40 };

#[derive(Debug, Clone, PartialEq)]
struct Crack {
    points: Vec<Point>,
    width: f32,
    paint: Paint,
}

/// Walk a crack downward from `start`, stopping at the bottom or a side edge.
fn walk(
    start: Point,
    segments: usize,
    drift: f32,
    viewport: Viewport,
    rng: &mut StdRng,
) -> Vec<Point> {
    let mut at = start;
    let mut points = Vec::with_capacity(segments);
    for _ in 0..segments {
        points.push(at);
        at.x += uniform(rng, -drift, drift);
        at.y += uniform(rng, 5.0, 25.0);
        if at.y > viewport.height || at.x < 0.0 || at.x > viewport.width {
            break;
        }
    }
    points
}

fn gray(rng: &mut StdRng, lo: f32, spread: f32) -> Paint {
    let mut channel = || uniform(rng, lo, lo + spread) as u8;
    Paint::rgba(channel(), channel(), channel(), 0.7)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Dust {
    at: Point,
    vx: f32,
    vy: f32,
    size: f32,
    life: f32,
}

impl Lifetime for Dust {
    fn is_expired(&self) -> bool {
        self.life <= 0.0
    }
}

#[derive(Debug, Default)]
pub struct InteractiveCracks {
    viewport: Viewport,
    cracks: ElementStore<Crack>,
    dust: ElementStore<Dust>,
}

impl InteractiveCracks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dust_count(&self) -> usize {
        self.dust.len()
    }
}

impl Background for InteractiveCracks {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::InteractiveCracks
    }

    fn listeners(&self) -> &'static [ListenerKind] {
        &[ListenerKind::PointerMove, ListenerKind::Click]
    }

    fn seed(&mut self, viewport: Viewport, rng: &mut StdRng) {
        self.viewport = viewport;
        let cracks: Vec<Crack> = (0..SEED_CRACKS)
            .map(|_| {
                let start = random_point(rng, viewport);
                Crack {
                    points: walk(start, 18, 17.5, viewport, rng),
                    width: uniform(rng, 1.0, 4.0),
                    paint: gray(rng, 90.0, 40.0),
                }
            })
            .collect();
        self.cracks.replace(cracks);
    }

    fn advance(&mut self, _ctx: &mut FrameContext<'_>) {
        for mote in &mut self.dust {
            mote.at.x += mote.vx;
            mote.at.y += mote.vy;
            mote.life -= DUST_DECAY;
            mote.vx *= DUST_DAMPING;
            mote.vy *= DUST_DAMPING;
        }
    }

    fn cull(&mut self) {
        self.dust.cull();
    }

    fn paint_background(&self, surface: &mut Surface) {
        surface.clear(Rgb::new(74, 74, 74));
    }

    fn render(&self, surface: &mut Surface, ctx: &FrameContext<'_>) {
        for crack in &self.cracks {
            let flexed: Vec<Point> = crack
                .points
                .iter()
                .map(|&p| match ctx.pointer.and_then(|m| FLEX.toward(p, m)) {
                    Some((dx, dy)) => Point::new(p.x + dx, p.y + dy),
                    None => p,
                })
                .collect();
            surface.stroke_path(&flexed, crack.width, crack.paint);
        }
        for mote in &self.dust {
            surface.fill_circle(mote.at, mote.size, Paint::rgba(200, 180, 150, 0.8 * mote.life));
        }
    }

    fn on_pointer(&mut self, event: &PointerEvent, ctx: &mut FrameContext<'_>) {
        match *event {
            PointerEvent::Move(at) if ctx.rng.gen_bool(DUST_SPAWN_PROBABILITY) => {
                let mote = Dust {
                    at,
                    vx: uniform(ctx.rng, -1.0, 1.0),
                    vy: uniform(ctx.rng, -1.0, 1.0),
                    size: uniform(ctx.rng, 2.0, 6.0),
                    life: 1.0,
                };
                self.dust.spawn_evicting(mote, DUST_CAP);
            }
            PointerEvent::Click(at) if CLICK_CRACKS.press_spawn(self.cracks.len()) => {
                let crack = Crack {
                    points: walk(at, 15, 20.0, ctx.viewport, ctx.rng),
                    width: uniform(ctx.rng, 1.0, 4.0),
                    paint: gray(ctx.rng, 100.0, 50.0),
                };
                self.cracks.spawn(crack);
            }
            _ => {}
        }
    }

    fn population(&self) -> usize {
        self.cracks.len()
    }

    fn positions(&self) -> Vec<Point> {
        self.cracks
            .iter()
            .filter_map(|c| c.points.first().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn ctx<'a>(rng: &'a mut StdRng, viewport: Viewport) -> FrameContext<'a> {
        FrameContext {
            viewport,
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
    fn test_click_opens_crack_at_pointer_until_cap() {
        let viewport = Viewport::new(640.0, 480.0);
        let mut rng = StdRng::seed_from_u64(3);
        let mut bg = InteractiveCracks::new();
        bg.seed(viewport, &mut rng);
        assert_eq!(bg.population(), SEED_CRACKS);
        let at = Point::new(320.0, 100.0);
        bg.on_pointer(&PointerEvent::Click(at), &mut ctx(&mut rng, viewport));
        assert_eq!(bg.positions().last(), Some(&at));
        for _ in 0..100 {
            bg.on_pointer(&PointerEvent::Click(at), &mut ctx(&mut rng, viewport));
        }
        assert_eq!(bg.population(), 40);
    }

    #[test]
    fn test_dust_is_capped_and_fades() {
        let viewport = Viewport::new(640.0, 480.0);
        let mut rng = StdRng::seed_from_u64(3);
        let mut bg = InteractiveCracks::new();
        bg.seed(viewport, &mut rng);
        for i in 0..2000 {
            let at = Point::new((i % 640) as f32, 10.0);
            bg.on_pointer(&PointerEvent::Move(at), &mut ctx(&mut rng, viewport));
            assert!(bg.dust_count() <= DUST_CAP);
        }
        assert!(bg.dust_count() > 0);
        for _ in 0..51 {
            bg.advance(&mut ctx(&mut rng, viewport));
            bg.cull();
        }
        assert_eq!(bg.dust_count(), 0);
    }

    #[test]
    fn test_walk_stays_in_viewport() {
        let viewport = Viewport::new(200.0, 200.0);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let points = walk(Point::new(100.0, 0.0), 18, 17.5, viewport, &mut rng);
            assert!(!points.is_empty() && points.len() <= 18);
            assert!(points.iter().all(|p| p.y <= 200.0 && (0.0..=200.0).contains(&p.x)));
        }
    }
}
