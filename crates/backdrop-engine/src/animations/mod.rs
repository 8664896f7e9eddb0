//! Background variants.
//!
//! Each variant is a [`Background`] strategy over the shared engine. Stateful
//! variants keep their elements in [`ElementStore`](crate::store::ElementStore)s
//! and regenerate layout-dependent ones in `seed`.

pub mod concrete;
pub mod crack_injection;
pub mod flow;
pub mod fractal;
pub mod grid;
pub mod interactive_cracks;
pub mod lightning;
pub mod magnetic;
pub mod mesh;
pub mod network;
pub mod ripple;
pub mod snow;
pub mod trails;

use backdrop_core::{BackgroundKind, Point, Settings, Viewport};
use rand::Rng;

use crate::background::Background;

/// Construct the variant for `kind`, reading its settings from `settings`.
pub fn build(kind: BackgroundKind, settings: &Settings) -> Box<dyn Background> {
    match kind {
        BackgroundKind::Particle => Box::new(network::Particle::new(settings)),
        BackgroundKind::Network => Box::new(network::Network::new()),
        BackgroundKind::StructuralMesh => Box::new(mesh::StructuralMesh::new()),
        BackgroundKind::PolyurethaneFlow => Box::new(flow::Flow::polyurethane()),
        BackgroundKind::InjectionFlow => Box::new(flow::Flow::injection()),
        BackgroundKind::CrackInjection
        | BackgroundKind::CrackInjectionBlue
        | BackgroundKind::CrackInjectionGreen
        | BackgroundKind::CrackInjectionPurple
        | BackgroundKind::CrackInjectionOrange => {
            Box::new(crack_injection::CrackInjection::new(kind, settings))
        }
        BackgroundKind::Dots => Box::new(grid::Dots::new()),
        BackgroundKind::Hexagon => Box::new(grid::Hexagons::new()),
        BackgroundKind::Snow => Box::new(snow::Snow::new(settings)),
        BackgroundKind::Ripple => Box::new(ripple::Ripple::new()),
        BackgroundKind::Lightning => Box::new(lightning::Lightning::new()),
        BackgroundKind::Fractal => Box::new(fractal::Fractal::new()),
        BackgroundKind::Concrete => Box::new(concrete::Concrete::new()),
        BackgroundKind::Particles2 => Box::new(trails::Trails::new()),
        BackgroundKind::InteractiveCracks => Box::new(interactive_cracks::InteractiveCracks::new()),
        BackgroundKind::Magnetic => Box::new(magnetic::Magnetic::new()),
    }
}

/// Uniform sample in `[lo, hi)`, or `lo` when the range is empty.
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.gen_range(lo..hi) } else { lo }
}

/// Uniform point inside `viewport`. The origin for an empty viewport.
pub(crate) fn random_point<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport) -> Point {
    Point::new(
        uniform(rng, 0.0, viewport.width),
        uniform(rng, 0.0, viewport.height),
    )
}

/// Uniform angle in `[0, 2π)`.
pub(crate) fn random_angle<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(0.0..std::f32::consts::TAU)
}

/// Deterministic value in `[0, 1)` for a grid cell, so a relayout at the same
/// size reproduces the same grid.
pub(crate) fn cell_noise(col: usize, row: usize, salt: usize) -> f32 {
    let mixed = col
        .wrapping_mul(31)
        .wrapping_add(row.wrapping_mul(17))
        .wrapping_add(salt.wrapping_mul(7919));
    let hashed = mixed.wrapping_mul(2_654_435_761) >> 8;
    (hashed % 1000) as f32 / 1000.0
}

/// Number of grid cells of `spacing` needed to cover `extent`.
pub(crate) fn cells(extent: f32, spacing: f32) -> usize {
    if extent <= 0.0 || spacing <= 0.0 {
        0
    } else {
        (extent / spacing).ceil() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::input::PointerEvent;
    use crate::scheduler::RefreshLoop;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_every_kind_builds_and_runs() {
        let viewport = Viewport::new(640.0, 480.0);
        for kind in BackgroundKind::ALL {
            let mut host = RefreshLoop::new();
            let mut engine = Engine::with_seed(build(kind, &Settings::new()), 5);
            assert_eq!(engine.background().kind(), kind);
            engine.mount(&mut host, viewport);
            for i in 0..120u64 {
                if i % 10 == 0 {
                    engine.handle_pointer(&PointerEvent::Move(Point::new(
                        (i * 5) as f32,
                        (i * 3) as f32,
                    )));
                }
                if i == 50 {
                    engine.handle_pointer(&PointerEvent::Press(Point::new(320.0, 240.0)));
                    engine.handle_pointer(&PointerEvent::Release(Point::new(320.0, 240.0)));
                    engine.handle_pointer(&PointerEvent::Click(Point::new(320.0, 240.0)));
                }
                for handle in host.take_due() {
                    assert!(engine.run_frame(handle, i * 33, &mut host), "{kind}");
                }
            }
            engine.destroy(&mut host);
            assert_eq!(host.pending_frames(), 0, "{kind}");
            assert_eq!(host.listener_count(), 0, "{kind}");
        }
    }

    #[test]
    fn test_every_kind_survives_empty_viewport() {
        for kind in BackgroundKind::ALL {
            let mut host = RefreshLoop::new();
            let mut engine = Engine::with_seed(build(kind, &Settings::new()), 9);
            engine.mount(&mut host, Viewport::new(0.0, 0.0));
            engine.handle_pointer(&PointerEvent::Click(Point::new(0.0, 0.0)));
            for handle in host.take_due() {
                engine.run_frame(handle, 16, &mut host);
            }
            engine.destroy(&mut host);
            assert_eq!(host.pending_frames(), 0, "{kind}");
        }
    }

    #[test]
    fn test_cell_noise_is_stable_and_bounded() {
        for col in 0..50 {
            for row in 0..50 {
                let v = cell_noise(col, row, 3);
                assert!((0.0..1.0).contains(&v));
                assert_eq!(v, cell_noise(col, row, 3));
            }
        }
    }

    #[test]
    fn test_uniform_handles_empty_range() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(uniform(&mut rng, 4.0, 4.0), 4.0);
        assert_eq!(cells(0.0, 40.0), 0);
        assert_eq!(cells(801.0, 40.0), 21);
    }
}
