//! Snowfall (stateful). Flakes swing as they fall and scatter from the pointer.

use backdrop_core::{
    BackgroundKind, Paint, Point, Rgb, SettingSpec, SettingValue, Settings, Viewport,
};
use rand::rngs::StdRng;

use super::{random_angle, random_point, uniform};
use crate::background::{Background, FrameContext};
use crate::interaction::Influence;
use crate::store::ElementStore;
use crate::surface::Surface;

const SCATTER: Influence = Influence::new(100.0, 2.0);

const FLAKE_COUNT: SettingSpec = SettingSpec {
    key: "flakeCount",
    label: "Flakes",
    min: 50.0,
    max: 300.0,
    step: 50.0,
    default: 150.0,
};

const SCHEMA: &[SettingSpec] = &[
    FLAKE_COUNT,
    SettingSpec {
        key: "flakeSpeed",
        label: "Fall speed",
        min: 0.5,
        max: 3.0,
        step: 0.5,
        default: 1.0,
    },
    SettingSpec {
        key: "flakeSize",
        label: "Flake size",
        min: 1.0,
        max: 5.0,
        step: 0.5,
        default: 2.0,
    },
];

/// A single snowflake.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Flake {
    at: Point,
    size: f32,
    /// Base fall speed, scaled by the `flakeSpeed` setting.
    speed: f32,
    /// Horizontal swing phase.
    swing: f32,
    swing_speed: f32,
}

#[derive(Debug)]
pub struct Snow {
    count: usize,
    speed: f32,
    size: f32,
    viewport: Viewport,
    flakes: ElementStore<Flake>,
}

impl Snow {
    pub fn new(settings: &Settings) -> Self {
        Self {
            count: FLAKE_COUNT.count(settings),
            speed: settings.number("flakeSpeed", 1.0),
            size: settings.number("flakeSize", 2.0),
            viewport: Viewport::default(),
            flakes: ElementStore::new(),
        }
    }

    fn flake(&self, rng: &mut StdRng) -> Flake {
        Flake {
            at: random_point(rng, self.viewport),
            // Sizes spread around the configured mean, as 1..4 does around 2.
            size: uniform(rng, 0.5, 2.0) * self.size,
            speed: uniform(rng, 0.5, 1.5),
            swing: random_angle(rng),
            swing_speed: uniform(rng, 0.01, 0.03),
        }
    }
}

impl Background for Snow {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::Snow
    }

    fn schema(&self) -> &'static [SettingSpec] {
        SCHEMA
    }

    fn seed(&mut self, viewport: Viewport, rng: &mut StdRng) {
        self.viewport = viewport;
        let flakes: Vec<Flake> = (0..self.count).map(|_| self.flake(rng)).collect();
        self.flakes.replace(flakes);
    }

    fn advance(&mut self, _ctx: &mut FrameContext<'_>) {
        for flake in &mut self.flakes {
            flake.at.y += flake.speed * self.speed;
            flake.swing += flake.swing_speed;
            flake.at.x += flake.swing.sin() * 0.5;
        }
    }

    fn interact(&mut self, ctx: &mut FrameContext<'_>) {
        let viewport = self.viewport;
        for flake in &mut self.flakes {
            if let Some(pointer) = ctx.pointer
                && let Some((dx, dy)) = SCATTER.away(flake.at, pointer)
            {
                flake.at.x += dx;
                flake.at.y += dy;
            }
            if flake.at.y > viewport.height {
                flake.at.y = -flake.size;
                flake.at.x = uniform(ctx.rng, 0.0, viewport.width);
            }
            // Wrap horizontally.
            if flake.at.x < 0.0 {
                flake.at.x = viewport.width;
            } else if flake.at.x > viewport.width {
                flake.at.x = 0.0;
            }
        }
    }

    fn paint_background(&self, surface: &mut Surface) {
        surface.clear(Rgb::new(10, 10, 30));
    }

    fn render(&self, surface: &mut Surface, _ctx: &FrameContext<'_>) {
        let paint = Paint::rgba(255, 255, 255, 0.8);
        for flake in &self.flakes {
            surface.fill_circle(flake.at, flake.size, paint);
        }
    }

    fn apply_setting(&mut self, key: &str, value: &SettingValue) {
        let Some(n) = value.as_number() else {
            return;
        };
        let n = n as f32;
        match key {
            "flakeCount" => {
                self.count = FLAKE_COUNT.clamp_count(f64::from(n));
                self.flakes.truncate_oldest(self.count);
            }
            "flakeSpeed" => self.speed = n,
            "flakeSize" => {
                let ratio = if self.size > 0.0 { n / self.size } else { 1.0 };
                self.size = n;
                for flake in &mut self.flakes {
                    flake.size *= ratio;
                }
            }
            _ => {}
        }
    }

    fn population(&self) -> usize {
        self.flakes.len()
    }

    fn positions(&self) -> Vec<Point> {
        self.flakes.iter().map(|f| f.at).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_flakes_stay_within_horizontal_bounds() {
        let viewport = Viewport::new(300.0, 200.0);
        let mut rng = StdRng::seed_from_u64(8);
        let mut snow = Snow::new(&Settings::new());
        snow.seed(viewport, &mut rng);
        assert_eq!(snow.population(), 150);
        for _ in 0..500 {
            let mut ctx = FrameContext {
                viewport,
                pointer: Some(Point::new(150.0, 100.0)),
                pressed: false,
                phase: 0.0,
                frame: 0,
                now_ms: 0,
                scroll_y: 0.0,
                rng: &mut rng,
            };
            snow.advance(&mut ctx);
            snow.interact(&mut ctx);
        }
        assert!(snow.positions().iter().all(|p| (0.0..=300.0).contains(&p.x)));
        assert!(snow.positions().iter().all(|p| p.y <= 200.0));
    }

    #[test]
    fn test_settings_shape_the_flakes() {
        let settings = Settings::new().with("flakeCount", 50.0).with("flakeSize", 4.0);
        let mut snow = Snow::new(&settings);
        snow.seed(Viewport::new(300.0, 200.0), &mut StdRng::seed_from_u64(1));
        assert_eq!(snow.population(), 50);
        assert!(snow.flakes.iter().all(|f| f.size >= 2.0 && f.size < 8.0));

        snow.apply_setting("flakeCount", &SettingValue::Number(20.0));
        assert_eq!(snow.population(), 20);
        snow.apply_setting("flakeSize", &SettingValue::Number(2.0));
        assert!(snow.flakes.iter().all(|f| f.size >= 1.0 && f.size < 4.0));
    }

    #[test]
    fn test_huge_flake_count_is_capped() {
        let mut snow = Snow::new(&Settings::new().with("flakeCount", 1e20));
        snow.seed(Viewport::new(300.0, 200.0), &mut StdRng::seed_from_u64(2));
        assert_eq!(snow.population(), 300);

        snow.apply_setting("flakeCount", &SettingValue::Number(f64::INFINITY));
        assert_eq!(snow.count, 300);
        snow.apply_setting("flakeCount", &SettingValue::Number(-10.0));
        assert_eq!(snow.population(), 0);
    }
}
