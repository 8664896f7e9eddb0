//! Drifting nodes joined by distance-faded links.
//!
//! `Particle` is the configurable flavour used as the default background;
//! `Network` is the fixed one with velocity repulsion and damping.

use backdrop_core::{
    BackgroundKind, Paint, Point, Rgb, SettingSpec, SettingValue, Settings, Viewport,
};
use rand::rngs::StdRng;

use super::{random_point, uniform};
use crate::background::{Background, FrameContext};
use crate::interaction::{Influence, for_each_link};
use crate::store::ElementStore;
use crate::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Node {
    at: Point,
    vx: f32,
    vy: f32,
    radius: f32,
}

impl Node {
    /// Move by the velocity scaled by `speed`.
    fn step(&mut self, speed: f32) {
        self.at.x += self.vx * speed;
        self.at.y += self.vy * speed;
    }

    /// Reverse velocity components that carry the node outside `viewport`.
    fn bounce(&mut self, viewport: Viewport) {
        if self.at.x < 0.0 || self.at.x > viewport.width {
            self.vx = -self.vx;
        }
        if self.at.y < 0.0 || self.at.y > viewport.height {
            self.vy = -self.vy;
        }
    }
}

fn scatter(viewport: Viewport, count: usize, speed: f32, size: (f32, f32), rng: &mut StdRng) -> Vec<Node> {
    (0..count)
        .map(|_| Node {
            at: random_point(rng, viewport),
            vx: uniform(rng, -0.5, 0.5) * speed,
            vy: uniform(rng, -0.5, 0.5) * speed,
            radius: uniform(rng, size.0, size.1),
        })
        .collect()
}

fn render_nodes(
    surface: &mut Surface,
    nodes: &ElementStore<Node>,
    link_distance: f32,
    link_color: Rgb,
    link_alpha: f32,
    node_paint: Paint,
    radius_scale: f32,
) {
    let points: Vec<Point> = nodes.iter().map(|n| n.at).collect();
    for_each_link(&points, link_distance, link_alpha, |i, j, opacity| {
        surface.stroke_line(points[i], points[j], 1.0, Paint::from(link_color).with_alpha(opacity));
    });
    for node in nodes {
        surface.fill_circle(node.at, node.radius * radius_scale, node_paint);
    }
}

const PARTICLE_COUNT: SettingSpec = SettingSpec {
    key: "particleCount",
    label: "Particles",
    min: 20.0,
    max: 300.0,
    step: 10.0,
    default: 100.0,
};

const PARTICLE_SCHEMA: &[SettingSpec] = &[
    PARTICLE_COUNT,
    SettingSpec {
        key: "connectionDistance",
        label: "Link distance",
        min: 50.0,
        max: 200.0,
        step: 10.0,
        default: 120.0,
    },
    SettingSpec {
        key: "mouseInteraction",
        label: "Pointer radius",
        min: 50.0,
        max: 300.0,
        step: 10.0,
        default: 150.0,
    },
    SettingSpec {
        key: "particleSpeed",
        label: "Speed",
        min: 0.1,
        max: 2.0,
        step: 0.1,
        default: 0.5,
    },
    SettingSpec {
        key: "particleSize",
        label: "Size",
        min: 0.5,
        max: 5.0,
        step: 0.5,
        default: 1.5,
    },
];

const PARTICLE_COLOR: Rgb = Rgb::new(100, 200, 255);

/// Configurable particle network; the pointer pushes particles aside.
/// Node velocities and radii are stored at unit speed and size and scaled
/// when used, so speed and size changes reach live particles.
#[derive(Debug)]
pub struct Particle {
    count: usize,
    link_distance: f32,
    pointer_radius: f32,
    speed: f32,
    size: f32,
    /// Translucent wash painted each frame, leaving short trails.
    backdrop: Paint,
    viewport: Viewport,
    nodes: ElementStore<Node>,
}

impl Particle {
    pub fn new(settings: &Settings) -> Self {
        Self {
            count: PARTICLE_COUNT.count(settings),
            link_distance: settings.number("connectionDistance", 120.0),
            pointer_radius: settings.number("mouseInteraction", 150.0),
            speed: settings.number("particleSpeed", 0.5),
            size: settings.number("particleSize", 1.5),
            backdrop: settings.paint("backgroundColor", Paint::rgba(10, 10, 20, 0.1)),
            viewport: Viewport::default(),
            nodes: ElementStore::new(),
        }
    }

    fn reseed(&mut self, rng: &mut StdRng) {
        let nodes = scatter(self.viewport, self.count, 2.0, (0.5, 1.5), rng);
        self.nodes.replace(nodes);
    }
}

impl Background for Particle {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::Particle
    }

    fn schema(&self) -> &'static [SettingSpec] {
        PARTICLE_SCHEMA
    }

    fn seed(&mut self, viewport: Viewport, rng: &mut StdRng) {
        self.viewport = viewport;
        self.reseed(rng);
    }

    fn advance(&mut self, _ctx: &mut FrameContext<'_>) {
        for node in &mut self.nodes {
            node.step(self.speed);
            node.bounce(self.viewport);
        }
    }

    fn interact(&mut self, ctx: &mut FrameContext<'_>) {
        let Some(pointer) = ctx.pointer else {
            return;
        };
        let push = Influence::new(self.pointer_radius, 2.0);
        for node in &mut self.nodes {
            if let Some((dx, dy)) = push.away(node.at, pointer) {
                node.at.x += dx;
                node.at.y += dy;
            }
        }
    }

    fn paint_background(&self, surface: &mut Surface) {
        surface.fill(self.backdrop);
    }

    fn render(&self, surface: &mut Surface, _ctx: &FrameContext<'_>) {
        render_nodes(
            surface,
            &self.nodes,
            self.link_distance,
            PARTICLE_COLOR,
            0.3,
            Paint::from(PARTICLE_COLOR).with_alpha(0.8),
            self.size,
        );
    }

    fn apply_setting(&mut self, key: &str, value: &SettingValue) {
        if key == "backgroundColor" {
            if let Some(paint) = value.as_paint() {
                self.backdrop = paint;
            }
            return;
        }
        let Some(n) = value.as_number() else {
            return;
        };
        let n = n as f32;
        match key {
            "particleCount" => {
                self.count = PARTICLE_COUNT.clamp_count(f64::from(n));
                self.nodes.truncate_oldest(self.count);
            }
            "connectionDistance" => self.link_distance = n,
            "mouseInteraction" => self.pointer_radius = n,
            "particleSpeed" => self.speed = n,
            "particleSize" => self.size = n,
            _ => {}
        }
    }

    fn population(&self) -> usize {
        self.nodes.len()
    }

    fn positions(&self) -> Vec<Point> {
        self.nodes.iter().map(|n| n.at).collect()
    }
}

const NETWORK_NODES: usize = 50;
const NETWORK_REPULSION: Influence = Influence::new(150.0, 0.1);
const NETWORK_DAMPING: f32 = 0.99;
const NETWORK_LINK_DISTANCE: f32 = 150.0;

/// Fixed network of 50 nodes repelled by the pointer.
#[derive(Debug, Default)]
pub struct Network {
    viewport: Viewport,
    nodes: ElementStore<Node>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Background for Network {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::Network
    }

    fn seed(&mut self, viewport: Viewport, rng: &mut StdRng) {
        self.viewport = viewport;
        self.nodes
            .replace(scatter(viewport, NETWORK_NODES, 1.0, (2.0, 5.0), rng));
    }

    fn advance(&mut self, _ctx: &mut FrameContext<'_>) {
        for node in &mut self.nodes {
            node.step(1.0);
        }
    }

    fn interact(&mut self, ctx: &mut FrameContext<'_>) {
        for node in &mut self.nodes {
            if let Some(pointer) = ctx.pointer
                && let Some((dx, dy)) = NETWORK_REPULSION.away(node.at, pointer)
            {
                node.vx += dx;
                node.vy += dy;
            }
            node.bounce(self.viewport);
            node.vx *= NETWORK_DAMPING;
            node.vy *= NETWORK_DAMPING;
        }
    }

    fn render(&self, surface: &mut Surface, _ctx: &FrameContext<'_>) {
        render_nodes(
            surface,
            &self.nodes,
            NETWORK_LINK_DISTANCE,
            PARTICLE_COLOR,
            0.3,
            Paint::from(PARTICLE_COLOR).with_alpha(0.8),
            1.0,
        );
    }

    fn population(&self) -> usize {
        self.nodes.len()
    }

    fn positions(&self) -> Vec<Point> {
        self.nodes.iter().map(|n| n.at).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn frame<'a>(rng: &'a mut StdRng, viewport: Viewport, pointer: Option<Point>) -> FrameContext<'a> {
        FrameContext {
            viewport,
            pointer,
            pressed: false,
            phase: 0.0,
            frame: 1,
            now_ms: 0,
            scroll_y: 0.0,
            rng,
        }
    }

    #[test]
    fn test_particle_settings_control_population() {
        let viewport = Viewport::new(640.0, 480.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut bg = Particle::new(&Settings::new().with("particleCount", 40.0));
        bg.seed(viewport, &mut rng);
        assert_eq!(bg.population(), 40);
        assert!(bg.positions().iter().all(|p| viewport.contains(*p)));

        bg.apply_setting("particleCount", &SettingValue::Number(25.0));
        assert_eq!(bg.population(), 25);
    }

    #[test]
    fn test_particle_count_is_bounded_by_schema() {
        let bg = Particle::new(&Settings::new().with("particleCount", 1e20));
        assert_eq!(bg.count, 300);
    }

    #[test]
    fn test_particle_speed_recovers_from_zero() {
        let viewport = Viewport::new(640.0, 480.0);
        let mut rng = StdRng::seed_from_u64(4);
        let mut bg = Particle::new(&Settings::new());
        bg.seed(viewport, &mut rng);

        bg.apply_setting("particleSpeed", &SettingValue::Number(0.0));
        let before = bg.positions();
        bg.advance(&mut frame(&mut rng, viewport, None));
        assert_eq!(bg.positions(), before);

        bg.apply_setting("particleSpeed", &SettingValue::Number(1.0));
        bg.advance(&mut frame(&mut rng, viewport, None));
        let moved = bg
            .positions()
            .iter()
            .zip(&before)
            .filter(|(now, then)| now != then)
            .count();
        assert!(moved > 90, "only {moved} of 100 particles moved");
    }

    #[test]
    fn test_particle_size_reaches_live_nodes() {
        let viewport = Viewport::new(64.0, 64.0);
        let mut rng = StdRng::seed_from_u64(5);
        let mut bg = Particle::new(&Settings::new().with("backgroundColor", "#000000"));
        bg.viewport = viewport;
        bg.nodes.replace([Node {
            at: Point::new(32.0, 32.0),
            vx: 0.0,
            vy: 0.0,
            radius: 1.0,
        }]);
        let lit = |bg: &Particle, rng: &mut StdRng| {
            let mut surface = Surface::new(viewport);
            let ctx = frame(rng, viewport, None);
            bg.paint_background(&mut surface);
            bg.render(&mut surface, &ctx);
            let (cols, rows) = surface.raster_size();
            (0..rows)
                .flat_map(|r| (0..cols).map(move |c| (c, r)))
                .filter(|&(c, r)| surface.pixel(c, r) != Some(Rgb::BLACK))
                .count()
        };
        let small = lit(&bg, &mut rng);
        bg.apply_setting("particleSize", &SettingValue::Number(20.0));
        let large = lit(&bg, &mut rng);
        assert!(large > small, "{large} <= {small}");
    }

    #[test]
    fn test_particle_backdrop_accepts_css_color() {
        let mut bg = Particle::new(&Settings::new());
        assert_eq!(bg.backdrop, Paint::rgba(10, 10, 20, 0.1));
        bg.apply_setting("backgroundColor", &SettingValue::from("#ff0000"));
        assert_eq!(bg.backdrop, Paint::rgb(255, 0, 0));
    }

    #[test]
    fn test_particle_pushed_away_from_pointer() {
        let viewport = Viewport::new(640.0, 480.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut bg = Particle::new(&Settings::new());
        bg.viewport = viewport;
        bg.nodes.replace([Node {
            at: Point::new(100.0, 100.0),
            vx: 0.0,
            vy: 0.0,
            radius: 1.0,
        }]);
        let mut ctx = frame(&mut rng, viewport, Some(Point::new(150.0, 100.0)));
        bg.interact(&mut ctx);
        assert!(bg.positions()[0].x < 100.0);
    }

    #[test]
    fn test_network_ignores_pointer_on_top_of_node() {
        let viewport = Viewport::new(640.0, 480.0);
        let mut rng = StdRng::seed_from_u64(2);
        let mut bg = Network::new();
        bg.viewport = viewport;
        let at = Point::new(200.0, 200.0);
        bg.nodes.replace([Node {
            at,
            vx: 0.0,
            vy: 0.0,
            radius: 3.0,
        }]);
        let mut ctx = frame(&mut rng, viewport, Some(at));
        bg.interact(&mut ctx);
        let node = bg.nodes.as_slice()[0];
        assert!(node.vx.is_finite() && node.vy.is_finite());
        assert_eq!((node.vx, node.vy), (0.0, 0.0));
    }

    #[test]
    fn test_network_seeds_fifty_nodes() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut bg = Network::new();
        bg.seed(Viewport::new(800.0, 600.0), &mut rng);
        assert_eq!(bg.population(), NETWORK_NODES);
    }
}
