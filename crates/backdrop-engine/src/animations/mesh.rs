//! Structural mesh: a square lattice whose nodes lean toward the pointer and
//! spring back when it leaves.

use backdrop_core::{BackgroundKind, Paint, Point, Rgb, Viewport};
use rand::rngs::StdRng;

use super::cells;
use crate::background::{Background, FrameContext};
use crate::interaction::Influence;
use crate::store::ElementStore;
use crate::surface::Surface;

const SPACING: f32 = 60.0;
const PULL: Influence = Influence::new(200.0, 30.0);
const SPRING: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
struct MeshNode {
    at: Point,
    rest: Point,
}

/// Lattice of `cols` x `rows` nodes stored row-major.
#[derive(Debug, Default)]
pub struct StructuralMesh {
    /// Column count the lattice was built with; row and column of node `i`
    /// derive from it, never from the live viewport.
    cols: usize,
    rows: usize,
    nodes: ElementStore<MeshNode>,
}

impl StructuralMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index pairs of every lattice edge: right and down neighbours.
    fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (cols, rows) = (self.cols, self.rows);
        (0..self.nodes.len()).flat_map(move |i| {
            let (row, col) = (i / cols.max(1), i % cols.max(1));
            let right = (col + 1 < cols).then_some((i, i + 1));
            let down = (row + 1 < rows).then_some((i, i + cols));
            right.into_iter().chain(down)
        })
    }
}

impl Background for StructuralMesh {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::StructuralMesh
    }

    fn seed(&mut self, viewport: Viewport, _rng: &mut StdRng) {
        self.cols = cells(viewport.width, SPACING);
        self.rows = cells(viewport.height, SPACING);
        let cols = self.cols;
        self.nodes.replace((0..self.rows).flat_map(|row| {
            (0..cols).map(move |col| {
                let rest = Point::new(col as f32 * SPACING, row as f32 * SPACING);
                MeshNode { at: rest, rest }
            })
        }));
    }

    fn interact(&mut self, ctx: &mut FrameContext<'_>) {
        for node in &mut self.nodes {
            let lean = ctx.pointer.and_then(|p| PULL.toward(node.rest, p));
            match lean {
                Some((dx, dy)) => node.at = Point::new(node.rest.x + dx, node.rest.y + dy),
                None => {
                    node.at.x += (node.rest.x - node.at.x) * SPRING;
                    node.at.y += (node.rest.y - node.at.y) * SPRING;
                }
            }
        }
    }

    fn paint_background(&self, surface: &mut Surface) {
        surface.clear(Rgb::new(40, 40, 40));
    }

    fn render(&self, surface: &mut Surface, _ctx: &FrameContext<'_>) {
        let nodes = self.nodes.as_slice();
        let beam = Paint::rgba(120, 120, 120, 0.4);
        for (a, b) in self.edges() {
            surface.stroke_line(nodes[a].at, nodes[b].at, 1.0, beam);
        }
        let joint = Paint::rgba(150, 150, 150, 0.8);
        for node in nodes {
            surface.fill_circle(node.at, 3.0, joint);
        }
    }

    fn population(&self) -> usize {
        self.nodes.len()
    }

    fn positions(&self) -> Vec<Point> {
        self.nodes.iter().map(|n| n.at).collect()
    }
}
