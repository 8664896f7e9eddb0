//! Slowly shifting concrete texture written pixel by pixel.

use backdrop_core::{BackgroundKind, Point, Rgb, Viewport};
use rand::rngs::StdRng;

use crate::background::{Background, FrameContext};
use crate::input::ListenerKind;
use crate::surface::{DOT_PX, PixelBuffer, Surface};

/// Gray level of the texture at logical position `(x, y)` and time `t`.
pub fn concrete_gray(x: f32, y: f32, t: f32) -> u8 {
    let coarse = (x * 0.02 + t).sin() * (y * 0.02 + t).cos();
    let grain = (x * 0.05).sin() * (y * 0.05).cos();
    let fine = (x * 0.1 + t * 0.5).sin() * (y * 0.1).cos();
    let value = (coarse + grain * 0.5 + fine * 0.3) / 3.0;
    (80.0 + value * 30.0).round().clamp(0.0, 255.0) as u8
}

#[derive(Debug)]
pub struct Concrete {
    /// Reallocated whenever the surface is.
    pixels: PixelBuffer,
}

impl Default for Concrete {
    fn default() -> Self {
        Self::new()
    }
}

impl Concrete {
    pub fn new() -> Self {
        Self {
            pixels: PixelBuffer::new(0, 0),
        }
    }
}

impl Background for Concrete {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::Concrete
    }

    fn listeners(&self) -> &'static [ListenerKind] {
        &[]
    }

    fn phase_step(&self) -> f32 {
        0.005
    }

    fn seed(&mut self, viewport: Viewport, _rng: &mut StdRng) {
        self.pixels = PixelBuffer::for_viewport(viewport);
    }

    fn advance(&mut self, ctx: &mut FrameContext<'_>) {
        let (cols, rows) = self.pixels.size();
        for row in 0..rows {
            for col in 0..cols {
                let x = (col as f32 + 0.5) * DOT_PX;
                let y = (row as f32 + 0.5) * DOT_PX;
                let gray = concrete_gray(x, y, ctx.phase);
                self.pixels.set(col, row, Rgb::new(gray, gray, gray));
            }
        }
    }

    fn paint_background(&self, surface: &mut Surface) {
        surface.put_pixels(&self.pixels);
    }

    fn render(&self, _surface: &mut Surface, _ctx: &FrameContext<'_>) {}

    fn population(&self) -> usize {
        0
    }

    fn positions(&self) -> Vec<Point> {
        Vec::new()
    }
}
