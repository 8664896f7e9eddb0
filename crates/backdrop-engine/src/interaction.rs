//! The pointer interaction law and adjacency links.
//!
//! Every pointer-reactive background uses the same proximity rule: inside an
//! influence radius `R` the effect scales with `(R - d) / R`, which is `1` at
//! the pointer and falls linearly to exactly `0` at the boundary.

use backdrop_core::Point;

/// Linear falloff factor for a point `distance` away inside `radius`.
pub fn falloff(distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 || distance >= radius {
        return 0.0;
    }
    (radius - distance.max(0.0)) / radius
}

/// A pointer influence: radius and the force at zero distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Influence {
    pub radius: f32,
    pub strength: f32,
}

impl Influence {
    pub const fn new(radius: f32, strength: f32) -> Self {
        Self { radius, strength }
    }

    /// Force magnitude at `distance`.
    pub fn force_at(&self, distance: f32) -> f32 {
        falloff(distance, self.radius) * self.strength
    }

    /// Displacement pulling `at` toward `source`, scaled by the falloff.
    ///
    /// Returns `None` outside the radius and when the points coincide, where
    /// the direction is undefined.
    pub fn toward(&self, at: Point, source: Point) -> Option<(f32, f32)> {
        let dx = source.x - at.x;
        let dy = source.y - at.y;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance <= 0.0 {
            return None;
        }
        let force = self.force_at(distance);
        (force > 0.0).then(|| (dx / distance * force, dy / distance * force))
    }

    /// Displacement pushing `at` away from `source`.
    pub fn away(&self, at: Point, source: Point) -> Option<(f32, f32)> {
        self.toward(at, source).map(|(x, y)| (-x, -y))
    }
}

/// Opacity of a link between two points `distance` apart.
///
/// Boundary-inclusive zero: at `distance >= link_distance` the result is
/// exactly `0.0`.
pub fn link_opacity(distance: f32, link_distance: f32, max_alpha: f32) -> f32 {
    max_alpha * falloff(distance, link_distance)
}

/// Visit every unordered pair `(i, j)` with `i < j` closer than
/// `link_distance`, in store order, with the link opacity.
pub fn for_each_link(
    points: &[Point],
    link_distance: f32,
    max_alpha: f32,
    mut visit: impl FnMut(usize, usize, f32),
) {
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let opacity = link_opacity(points[i].distance_to(points[j]), link_distance, max_alpha);
            if opacity > 0.0 {
                visit(i, j, opacity);
            }
        }
    }
}
