//! Charged particles steered by magnets the user drops with clicks.

use backdrop_core::{BackgroundKind, Paint, Point, Rgb, Viewport};
use rand::{Rng, rngs::StdRng};

use super::{random_point, uniform};
use crate::background::{Background, FrameContext};
use crate::input::{ListenerKind, PointerEvent};
use crate::store::ElementStore;
use crate::surface::Surface;

const PARTICLES: usize = 150;
/// Most recent magnets kept; older ones are evicted.
pub const MAGNET_CAP: usize = 5;
const FIELD_RADIUS: f32 = 200.0;
const STRENGTH: f32 = 100.0;
const FORCE_SCALE: f32 = 0.01;
const WALL_BOUNCE: f32 = -0.8;
const DAMPING: f32 = 0.99;
const MAGNET_RADIUS: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Magnet {
    at: Point,
    strength: f32,
    /// `1.0` or `-1.0`.
    polarity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Charge {
    at: Point,
    vx: f32,
    vy: f32,
    size: f32,
    /// `1.0` or `-1.0`.
    sign: f32,
}

fn random_sign(rng: &mut StdRng) -> f32 {
    if rng.gen_bool(0.5) { 1.0 } else { -1.0 }
}

/// Inverse-square pull of `magnet` on `charge`, or `None` outside the field
/// and on the magnet itself.
fn field_force(magnet: &Magnet, charge: &Charge) -> Option<(f32, f32)> {
    let dx = magnet.at.x - charge.at.x;
    let dy = magnet.at.y - charge.at.y;
    let d = (dx * dx + dy * dy).sqrt();
    if d <= 0.0 || d >= FIELD_RADIUS {
        return None;
    }
    let force = magnet.strength / (d * d) * magnet.polarity * charge.sign * FORCE_SCALE;
    Some((dx / d * force, dy / d * force))
}

#[derive(Debug)]
pub struct Magnetic {
    viewport: Viewport,
    particles: ElementStore<Charge>,
    magnets: ElementStore<Magnet>,
}

impl Default for Magnetic {
    fn default() -> Self {
        Self::new()
    }
}

impl Magnetic {
    pub fn new() -> Self {
        Self {
            viewport: Viewport::default(),
            particles: ElementStore::new(),
            magnets: ElementStore::new(),
        }
    }

    pub fn magnet_count(&self) -> usize {
        self.magnets.len()
    }
}

impl Background for Magnetic {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::Magnetic
    }

    fn listeners(&self) -> &'static [ListenerKind] {
        &[ListenerKind::PointerMove, ListenerKind::Click]
    }

    fn seed(&mut self, viewport: Viewport, rng: &mut StdRng) {
        self.viewport = viewport;
        let particles: Vec<Charge> = (0..PARTICLES)
            .map(|_| Charge {
                at: random_point(rng, viewport),
                vx: uniform(rng, -0.25, 0.25),
                vy: uniform(rng, -0.25, 0.25),
                size: uniform(rng, 1.0, 3.0),
                sign: random_sign(rng),
            })
            .collect();
        self.particles.replace(particles);
        let y = viewport.height * 0.5;
        self.magnets.replace([
            Magnet {
                at: Point::new(viewport.width * 0.25, y),
                strength: STRENGTH,
                polarity: 1.0,
            },
            Magnet {
                at: Point::new(viewport.width * 0.75, y),
                strength: STRENGTH,
                polarity: -1.0,
            },
        ]);
    }

    fn interact(&mut self, _ctx: &mut FrameContext<'_>) {
        for particle in &mut self.particles {
            for magnet in &self.magnets {
                if let Some((fx, fy)) = field_force(magnet, particle) {
                    particle.vx += fx;
                    particle.vy += fy;
                }
            }
        }
    }

    fn advance(&mut self, _ctx: &mut FrameContext<'_>) {
        let viewport = self.viewport;
        for particle in &mut self.particles {
            particle.at.x += particle.vx;
            particle.at.y += particle.vy;
            if particle.at.x < 0.0 || particle.at.x > viewport.width {
                particle.vx *= WALL_BOUNCE;
            }
            if particle.at.y < 0.0 || particle.at.y > viewport.height {
                particle.vy *= WALL_BOUNCE;
            }
            particle.vx *= DAMPING;
            particle.vy *= DAMPING;
        }
    }

    fn paint_background(&self, surface: &mut Surface) {
        surface.clear(Rgb::new(10, 10, 20));
    }

    fn render(&self, surface: &mut Surface, _ctx: &FrameContext<'_>) {
        for magnet in &self.magnets {
            let paint = if magnet.polarity > 0.0 {
                Paint::rgba(255, 100, 100, 0.3)
            } else {
                Paint::rgba(100, 100, 255, 0.3)
            };
            surface.fill_circle(magnet.at, MAGNET_RADIUS, paint);
        }
        for particle in &self.particles {
            let paint = if particle.sign > 0.0 {
                Paint::rgba(255, 150, 150, 0.8)
            } else {
                Paint::rgba(150, 150, 255, 0.8)
            };
            surface.fill_circle(particle.at, particle.size, paint);
        }
    }

    fn on_pointer(&mut self, event: &PointerEvent, ctx: &mut FrameContext<'_>) {
        // Clicks always place a magnet; the oldest goes past the cap.
        if let PointerEvent::Click(at) = *event {
            let magnet = Magnet {
                at,
                strength: STRENGTH,
                polarity: random_sign(ctx.rng),
            };
            self.magnets.spawn_evicting(magnet, MAGNET_CAP);
        }
    }

    fn population(&self) -> usize {
        self.particles.len()
    }

    fn positions(&self) -> Vec<Point> {
        self.particles.iter().map(|p| p.at).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_click_adds_magnets_up_to_cap() {
        let viewport = Viewport::new(400.0, 300.0);
        let mut rng = StdRng::seed_from_u64(5);
        let mut magnetic = Magnetic::new();
        magnetic.seed(viewport, &mut rng);
        assert_eq!(magnetic.magnet_count(), 2);
        for i in 0..8 {
            let mut ctx = FrameContext {
                viewport,
                pointer: None,
                pressed: false,
                phase: 0.0,
                frame: 0,
                now_ms: 0,
                scroll_y: 0.0,
                rng: &mut rng,
            };
            let at = Point::new(i as f32 * 10.0, 5.0);
            magnetic.on_pointer(&PointerEvent::Click(at), &mut ctx);
        }
        assert_eq!(magnetic.magnet_count(), MAGNET_CAP);
        assert_eq!(magnetic.magnets.as_slice()[0].at, Point::new(30.0, 5.0));
    }

    #[test]
    fn test_force_direction_follows_charge_product() {
        let magnet = Magnet {
            at: Point::new(100.0, 0.0),
            strength: STRENGTH,
            polarity: 1.0,
        };
        let mut charge = Charge {
            at: Point::new(90.0, 0.0),
            vx: 0.0,
            vy: 0.0,
            size: 1.0,
            sign: 1.0,
        };
        let (fx, _) = field_force(&magnet, &charge).unwrap();
        assert!((fx - 0.01).abs() < 1e-6);
        charge.sign = -1.0;
        assert!(field_force(&magnet, &charge).unwrap().0 < 0.0);
        charge.at = magnet.at;
        assert_eq!(field_force(&magnet, &charge), None);
    }
}
