//! Crack injection: cracks appear over time and fill where the pointer
//! injects resin. Five palettes share one simulation.

use std::f32::consts::PI;

use backdrop_core::{
    BackgroundKind, Paint, Point, Rgb, SettingSpec, SettingValue, Settings, Viewport,
};
use rand::{Rng, rngs::StdRng};

use super::{random_angle, random_point, uniform};
use crate::background::{Background, FrameContext};
use crate::input::{ListenerKind, PointerEvent};
use crate::interaction::Influence;
use crate::store::{ElementStore, Lifetime, SpawnTimer};
use crate::surface::Surface;

const SEED_CRACKS: usize = 8;
const INJECTION_DECAY: f32 = 0.008;
const INJECTION_PARTICLES: usize = 5;
const AGE_STEP: f32 = 0.02;
/// Scroll deltas at or below this many pixels never spawn a crack.
const SCROLL_THRESHOLD: f32 = 10.0;
/// Chance that an elapsed interval actually produces a crack.
const INTERVAL_SPAWN_PROBABILITY: f64 = 0.7;
const POINTER_PULL: Influence = Influence::new(100.0, 4.0);

const CRACK_COUNT: SettingSpec = SettingSpec {
    key: "crackCount",
    label: "Max cracks",
    min: 5.0,
    max: 50.0,
    step: 5.0,
    default: 30.0,
};

const SCHEMA: &[SettingSpec] = &[
    SettingSpec {
        key: "crackInterval",
        label: "Crack interval (ms)",
        min: 1000.0,
        max: 5000.0,
        step: 500.0,
        default: 2000.0,
    },
    CRACK_COUNT,
    SettingSpec {
        key: "injectionRadius",
        label: "Injection radius",
        min: 50.0,
        max: 150.0,
        step: 10.0,
        default: 80.0,
    },
    SettingSpec {
        key: "injectionSpeed",
        label: "Injection speed",
        min: 0.5,
        max: 3.0,
        step: 0.5,
        default: 1.5,
    },
    SettingSpec {
        key: "scrollSensitivity",
        label: "Scroll sensitivity",
        min: 0.3,
        max: 1.0,
        step: 0.1,
        default: 0.7,
    },
];

/// Colors of one crack injection theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Rgb,
    pub crack: Rgb,
    pub filled: Rgb,
    /// Radial stops of an injection: center, 60% and rim.
    pub injection: [Rgb; 3],
}

impl Palette {
    pub fn for_kind(kind: BackgroundKind) -> Self {
        match kind {
            BackgroundKind::CrackInjectionBlue => Palette {
                background: Rgb::new(26, 42, 58),
                crack: Rgb::new(80, 120, 180),
                filled: Rgb::new(120, 200, 255),
                injection: [
                    Rgb::new(100, 180, 255),
                    Rgb::new(80, 160, 240),
                    Rgb::new(60, 140, 220),
                ],
            },
            BackgroundKind::CrackInjectionGreen => Palette {
                background: Rgb::new(24, 40, 30),
                crack: Rgb::new(70, 130, 90),
                filled: Rgb::new(130, 240, 160),
                injection: [
                    Rgb::new(110, 230, 140),
                    Rgb::new(80, 200, 110),
                    Rgb::new(50, 170, 90),
                ],
            },
            BackgroundKind::CrackInjectionPurple => Palette {
                background: Rgb::new(36, 26, 52),
                crack: Rgb::new(130, 90, 180),
                filled: Rgb::new(210, 150, 255),
                injection: [
                    Rgb::new(190, 130, 255),
                    Rgb::new(160, 100, 230),
                    Rgb::new(130, 80, 200),
                ],
            },
            BackgroundKind::CrackInjectionOrange => Palette {
                background: Rgb::new(48, 32, 22),
                crack: Rgb::new(170, 110, 60),
                filled: Rgb::new(255, 190, 110),
                injection: [
                    Rgb::new(255, 170, 80),
                    Rgb::new(240, 140, 50),
                    Rgb::new(220, 110, 30),
                ],
            },
            _ => Palette {
                background: Rgb::new(42, 42, 42),
                crack: Rgb::new(110, 110, 110),
                filled: Rgb::new(255, 215, 120),
                injection: [
                    Rgb::new(255, 200, 100),
                    Rgb::new(240, 180, 80),
                    Rgb::new(220, 160, 60),
                ],
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CrackPoint {
    at: Point,
    filled: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct Crack {
    points: Vec<CrackPoint>,
    width: f32,
    /// Grows from 0; the crack draws itself in until it reaches 1.
    age: f32,
}

impl Crack {
    fn random(viewport: Viewport, rng: &mut StdRng) -> Self {
        let mut at = random_point(rng, viewport);
        let segments = rng.gen_range(15..35);
        let main_angle = uniform(rng, 0.0, PI * 0.5) + PI * 0.25;
        let mut points = Vec::with_capacity(segments);
        for _ in 0..segments {
            points.push(CrackPoint { at, filled: false });
            let angle = main_angle + uniform(rng, -0.3, 0.3);
            at = at.offset_polar(angle, uniform(rng, 12.0, 32.0));
            if !viewport.contains(at) {
                break;
            }
        }
        Crack {
            points,
            width: uniform(rng, 1.0, 4.0),
            age: 0.0,
        }
    }

    /// Draw-in progress of point `i`.
    fn progress(&self, i: usize) -> f32 {
        let appear = self.age.min(1.0);
        (i as f32 / self.points.len() as f32 * appear * 1.2).min(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Droplet {
    angle: f32,
    distance: f32,
    max_distance: f32,
    speed: f32,
    size: f32,
}

#[derive(Debug, Clone, PartialEq)]
struct Injection {
    center: Point,
    radius: f32,
    max_radius: f32,
    life: f32,
    speed: f32,
    droplets: Vec<Droplet>,
}

impl Lifetime for Injection {
    fn is_expired(&self) -> bool {
        self.life <= 0.0 || self.radius > self.max_radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tuning {
    crack_interval: f32,
    crack_count: usize,
    injection_radius: f32,
    injection_speed: f32,
    scroll_sensitivity: f32,
}

/// Crack injection background in one of five palettes.
#[derive(Debug)]
pub struct CrackInjection {
    kind: BackgroundKind,
    palette: Palette,
    tuning: Tuning,
    viewport: Viewport,
    cracks: ElementStore<Crack>,
    injections: ElementStore<Injection>,
    timer: SpawnTimer,
}

impl CrackInjection {
    pub fn new(kind: BackgroundKind, settings: &Settings) -> Self {
        let tuning = Tuning {
            crack_interval: settings.number("crackInterval", 2000.0),
            crack_count: CRACK_COUNT.count(settings),
            injection_radius: settings.number("injectionRadius", 80.0),
            injection_speed: settings.number("injectionSpeed", 1.5),
            scroll_sensitivity: settings.number("scrollSensitivity", 0.7),
        };
        Self {
            kind,
            palette: Palette::for_kind(kind),
            tuning,
            viewport: Viewport::default(),
            cracks: ElementStore::new(),
            injections: ElementStore::new(),
            timer: SpawnTimer::new(tuning.crack_interval, 0.5),
        }
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn injection_count(&self) -> usize {
        self.injections.len()
    }

    fn add_crack(&mut self, rng: &mut StdRng) {
        let crack = Crack::random(self.viewport, rng);
        self.cracks.spawn_evicting(crack, self.tuning.crack_count);
    }

    fn add_injection(&mut self, center: Point, rng: &mut StdRng) {
        let droplets = (0..INJECTION_PARTICLES)
            .map(|_| Droplet {
                angle: random_angle(rng),
                distance: 0.0,
                max_distance: uniform(rng, 20.0, 60.0),
                speed: uniform(rng, 0.5, 1.5),
                size: uniform(rng, 1.0, 4.0),
            })
            .collect();
        self.injections.spawn(Injection {
            center,
            radius: 0.0,
            max_radius: self.tuning.injection_radius,
            life: 1.0,
            speed: self.tuning.injection_speed,
            droplets,
        });
    }

    fn render_injections(&self, surface: &mut Surface) {
        let [center, middle, rim] = self.palette.injection;
        for injection in &self.injections {
            surface.fill_radial_gradient(
                injection.center,
                injection.radius,
                &[
                    (0.0, Paint::from(center).with_alpha(injection.life * 0.8)),
                    (0.6, Paint::from(middle).with_alpha(injection.life * 0.6)),
                    (1.0, Paint::from(rim).with_alpha(0.0)),
                ],
            );
            let paint = Paint::from(center).with_alpha(injection.life * 0.7);
            for droplet in &injection.droplets {
                if droplet.distance < droplet.max_distance {
                    let at = injection.center.offset_polar(droplet.angle, droplet.distance);
                    surface.fill_circle(at, droplet.size, paint);
                }
            }
        }
    }

    fn render_cracks(&self, surface: &mut Surface, pointer: Option<Point>) {
        let displaced = |p: Point| match pointer.and_then(|m| POINTER_PULL.toward(p, m)) {
            Some((dx, dy)) => Point::new(p.x + dx, p.y + dy),
            None => p,
        };
        let filled_paint = Paint::from(self.palette.filled).with_alpha(0.5);
        for crack in &self.cracks {
            let paint = Paint::from(self.palette.crack).with_alpha(0.6 * crack.age.min(1.0));
            for (i, pair) in crack.points.windows(2).enumerate() {
                let (a, b) = (pair[0], pair[1]);
                if a.filled && b.filled {
                    surface.stroke_line(a.at, b.at, crack.width * 1.5, filled_paint);
                } else if !a.filled
                    && !b.filled
                    && crack.progress(i) > 0.1
                    && crack.progress(i + 1) > 0.1
                {
                    surface.stroke_line(displaced(a.at), displaced(b.at), crack.width, paint);
                }
            }
        }
    }
}

impl Background for CrackInjection {
    fn kind(&self) -> BackgroundKind {
        self.kind
    }

    fn listeners(&self) -> &'static [ListenerKind] {
        &[
            ListenerKind::PointerMove,
            ListenerKind::PointerDown,
            ListenerKind::PointerUp,
            ListenerKind::Click,
            ListenerKind::Scroll,
        ]
    }

    fn schema(&self) -> &'static [SettingSpec] {
        SCHEMA
    }

    fn seed(&mut self, viewport: Viewport, rng: &mut StdRng) {
        self.viewport = viewport;
        self.cracks.clear();
        for _ in 0..SEED_CRACKS {
            self.add_crack(rng);
        }
    }

    fn advance(&mut self, _ctx: &mut FrameContext<'_>) {
        for injection in &mut self.injections {
            injection.radius += injection.speed;
            injection.life -= INJECTION_DECAY;
            for droplet in &mut injection.droplets {
                droplet.distance += droplet.speed;
            }
        }
        for crack in &mut self.cracks {
            crack.age += AGE_STEP;
        }
    }

    fn interact(&mut self, _ctx: &mut FrameContext<'_>) {
        for injection in &self.injections {
            for crack in self.cracks.iter_mut() {
                for point in &mut crack.points {
                    if point.at.distance_to(injection.center) < injection.radius {
                        point.filled = true;
                    }
                }
            }
        }
    }

    fn cull(&mut self) {
        self.injections.cull();
    }

    fn spawn(&mut self, ctx: &mut FrameContext<'_>) {
        if self.timer.poll(ctx.now_ms, ctx.rng) && ctx.rng.gen_bool(INTERVAL_SPAWN_PROBABILITY) {
            self.add_crack(ctx.rng);
        }
    }

    fn paint_background(&self, surface: &mut Surface) {
        surface.clear(self.palette.background);
    }

    fn render(&self, surface: &mut Surface, ctx: &FrameContext<'_>) {
        self.render_injections(surface);
        self.render_cracks(surface, ctx.pointer);
    }

    fn on_pointer(&mut self, event: &PointerEvent, ctx: &mut FrameContext<'_>) {
        match *event {
            PointerEvent::Move(p) if ctx.pressed => self.add_injection(p, ctx.rng),
            PointerEvent::Press(p) | PointerEvent::Click(p) => self.add_injection(p, ctx.rng),
            PointerEvent::Scroll(delta) if delta.abs() > SCROLL_THRESHOLD => {
                let p = f64::from(self.tuning.scroll_sensitivity).clamp(0.0, 1.0);
                if ctx.rng.gen_bool(p) {
                    self.add_crack(ctx.rng);
                }
            }
            _ => {}
        }
    }

    fn apply_setting(&mut self, key: &str, value: &SettingValue) {
        let Some(n) = value.as_number() else {
            return;
        };
        let n = n as f32;
        match key {
            "crackInterval" => {
                self.tuning.crack_interval = n;
                self.timer.set_interval(n);
            }
            "crackCount" => {
                self.tuning.crack_count = CRACK_COUNT.clamp_count(f64::from(n));
                self.cracks.truncate_oldest(self.tuning.crack_count);
            }
            "injectionRadius" | "injectionSpeed" => {
                if key == "injectionRadius" {
                    self.tuning.injection_radius = n;
                } else {
                    self.tuning.injection_speed = n;
                }
                for injection in &mut self.injections {
                    injection.max_radius = self.tuning.injection_radius;
                    injection.speed = self.tuning.injection_speed;
                }
            }
            "scrollSensitivity" => self.tuning.scroll_sensitivity = n,
            _ => {}
        }
    }

    fn population(&self) -> usize {
        self.cracks.len()
    }

    fn positions(&self) -> Vec<Point> {
        self.cracks
            .iter()
            .filter_map(|c| c.points.first().map(|p| p.at))
            .collect()
    }
}
