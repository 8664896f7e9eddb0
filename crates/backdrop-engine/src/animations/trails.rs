//! Colourful particles drawn to the pointer, each dragging a short trail.

use std::collections::VecDeque;

use backdrop_core::{BackgroundKind, Paint, Point, Rgb, Viewport};
use rand::rngs::StdRng;

use super::{random_point, uniform};
use crate::background::{Background, FrameContext};
use crate::interaction::Influence;
use crate::store::ElementStore;
use crate::surface::Surface;

const COUNT: usize = 150;
const ATTRACTION: Influence = Influence::new(200.0, 0.1);
const DAMPING: f32 = 0.98;
/// Positions remembered per particle, newest last.
pub const TRAIL_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq)]
struct Mote {
    at: Point,
    vx: f32,
    vy: f32,
    size: f32,
    hue: f32,
    trail: VecDeque<Point>,
}

#[derive(Debug)]
pub struct Trails {
    viewport: Viewport,
    motes: ElementStore<Mote>,
}

impl Default for Trails {
    fn default() -> Self {
        Self::new()
    }
}

impl Trails {
    pub fn new() -> Self {
        Self {
            viewport: Viewport::default(),
            motes: ElementStore::new(),
        }
    }
}

/// Wrap `v` into `[0, extent]`, jumping to the opposite edge.
fn wrap(v: f32, extent: f32) -> f32 {
    if v < 0.0 {
        extent
    } else if v > extent {
        0.0
    } else {
        v
    }
}

impl Background for Trails {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::Particles2
    }

    fn seed(&mut self, viewport: Viewport, rng: &mut StdRng) {
        self.viewport = viewport;
        let motes: Vec<Mote> = (0..COUNT)
            .map(|_| Mote {
                at: random_point(rng, viewport),
                vx: uniform(rng, -1.0, 1.0),
                vy: uniform(rng, -1.0, 1.0),
                size: uniform(rng, 1.0, 5.0),
                hue: uniform(rng, 0.0, 360.0),
                trail: VecDeque::with_capacity(TRAIL_LEN + 1),
            })
            .collect();
        self.motes.replace(motes);
    }

    fn advance(&mut self, _ctx: &mut FrameContext<'_>) {
        let viewport = self.viewport;
        for mote in &mut self.motes {
            mote.at.x = wrap(mote.at.x + mote.vx, viewport.width);
            mote.at.y = wrap(mote.at.y + mote.vy, viewport.height);
            mote.trail.push_back(mote.at);
            if mote.trail.len() > TRAIL_LEN {
                mote.trail.pop_front();
            }
        }
    }

    fn interact(&mut self, ctx: &mut FrameContext<'_>) {
        for mote in &mut self.motes {
            if let Some(pointer) = ctx.pointer
                && let Some((dx, dy)) = ATTRACTION.toward(mote.at, pointer)
            {
                mote.vx += dx;
                mote.vy += dy;
            }
            mote.vx *= DAMPING;
            mote.vy *= DAMPING;
        }
    }

    fn paint_background(&self, surface: &mut Surface) {
        surface.clear(Rgb::new(10, 10, 20));
    }

    fn render(&self, surface: &mut Surface, _ctx: &FrameContext<'_>) {
        for mote in &self.motes {
            let len = mote.trail.len() as f32;
            for (i, point) in mote.trail.iter().enumerate() {
                let fresh = i as f32 / len;
                surface.fill_circle(
                    *point,
                    mote.size * fresh,
                    Paint::hsla(mote.hue, 0.7, 0.6, fresh * 0.5),
                );
            }
        }
    }

    fn population(&self) -> usize {
        self.motes.len()
    }

    fn positions(&self) -> Vec<Point> {
        self.motes.iter().map(|m| m.at).collect()
    }
}
