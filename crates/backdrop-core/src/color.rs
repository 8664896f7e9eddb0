//! Color types and conversions.

use ratatui::style::Color;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let mut it = digits.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                Some(Self::new(it.next()??, it.next()??, it.next()??))
            }
            6 => Some(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => None,
        }
    }

    /// Source-over blend of `over` onto `self` with the given opacity.
    pub fn blend(self, over: Rgb, alpha: f32) -> Rgb {
        let a = alpha.clamp(0.0, 1.0);
        let mix = |under: u8, over: u8| {
            (under as f32 + (over as f32 - under as f32) * a).round() as u8
        };
        Rgb::new(mix(self.r, over.r), mix(self.g, over.g), mix(self.b, over.b))
    }

    /// Scale brightness, saturating at white.
    pub fn scale(self, factor: f32) -> Rgb {
        let s = |c: u8| (c as f32 * factor).clamp(0.0, 255.0) as u8;
        Rgb::new(s(self.r), s(self.g), s(self.b))
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb.r, rgb.g, rgb.b)
    }
}

/// A color with opacity, the unit every draw command takes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Paint {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            rgb: Rgb::new(r, g, b),
            alpha: 1.0,
        }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self {
            rgb: Rgb::new(r, g, b),
            alpha,
        }
    }

    /// HSL with hue in degrees and saturation/lightness in `0.0..=1.0`.
    pub fn hsla(h: f32, s: f32, l: f32, alpha: f32) -> Self {
        Self {
            rgb: hsl_to_rgb(h, s, l),
            alpha,
        }
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Multiply the existing opacity.
    pub fn fade(self, factor: f32) -> Self {
        Self {
            alpha: self.alpha * factor,
            ..self
        }
    }

    /// Parse a CSS color: `#rrggbb`, `#rgb`, `rgb(r, g, b)` or `rgba(r, g, b, a)`.
    pub fn parse(css: &str) -> Option<Self> {
        let css = css.trim();
        if css.starts_with('#') {
            return Rgb::from_hex(css).map(|rgb| Paint { rgb, alpha: 1.0 });
        }
        let (name, rest) = css.split_once('(')?;
        let args = rest.strip_suffix(')')?;
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        let channel = |s: &str| s.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0) as u8);
        match (name.trim(), parts.as_slice()) {
            ("rgb", [r, g, b]) => Some(Paint::rgb(channel(r)?, channel(g)?, channel(b)?)),
            ("rgba", [r, g, b, a]) => Some(Paint::rgba(
                channel(r)?,
                channel(g)?,
                channel(b)?,
                a.parse::<f32>().ok()?.clamp(0.0, 1.0),
            )),
            _ => None,
        }
    }
}

impl From<Rgb> for Paint {
    fn from(rgb: Rgb) -> Self {
        Paint { rgb, alpha: 1.0 }
    }
}

/// Convert HSL to RGB. Hue in degrees (any range), saturation and lightness in `0.0..=1.0`.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgb {
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    if s == 0.0 {
        let v = (l * 255.0) as u8;
        return Rgb::new(v, v, v);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let h = h.rem_euclid(360.0) / 360.0;

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    Rgb::new((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
