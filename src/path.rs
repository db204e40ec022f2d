//! Glyph Path Builder
//!
//! Turns a node sequence into edges and then into one open path whose
//! revisited vertices get a jittered in-tangent, giving the stroke a
//! hand-drawn loop wherever the glyph crosses back over a node.

use kurbo::{Point, Vec2};
use rand::Rng;
use std::collections::HashSet;

use crate::geometry::{node_index, round2, round_point, NODE_COUNT};
use crate::glyphs::{GlyphCode, GlyphError};

/// Directed segment between two projected nodes, rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub start: Point,
    pub end: Point,
}

/// Build edges from a raw code string.
///
/// Only checks that every character names a node; adjacency is the caller's concern.
pub fn build_edges(code: &str, nodes: &[Point; NODE_COUNT]) -> Result<Vec<Edge>, GlyphError> {
    let indices = code
        .chars()
        .map(|ch| {
            node_index(ch).ok_or_else(|| GlyphError::MalformedCode {
                code: code.to_string(),
                ch,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(edges_between(&indices, nodes))
}

/// Edges of an already validated code.
pub fn glyph_edges(code: &GlyphCode, nodes: &[Point; NODE_COUNT]) -> Vec<Edge> {
    let indices: Vec<usize> = code.nodes().collect();
    edges_between(&indices, nodes)
}

fn edges_between(indices: &[usize], nodes: &[Point; NODE_COUNT]) -> Vec<Edge> {
    indices
        .windows(2)
        .map(|pair| Edge {
            start: round_point(nodes[pair[0]]),
            end: round_point(nodes[pair[1]]),
        })
        .collect()
}

/// Open cubic path: vertices plus per-vertex in/out tangents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathShape {
    pub vertices: Vec<Point>,
    pub in_tangents: Vec<Vec2>,
    pub out_tangents: Vec<Vec2>,
}

impl PathShape {
    /// Glyph strokes are never closed.
    pub fn is_closed(&self) -> bool {
        false
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

pub fn build_path_shape<R: Rng + ?Sized>(edges: &[Edge], rng: &mut R) -> PathShape {
    let Some(last) = edges.last() else {
        return PathShape::default();
    };

    let vertices: Vec<Point> = edges
        .iter()
        .map(|edge| edge.start)
        .chain(std::iter::once(last.end))
        .collect();

    let mut seen = HashSet::with_capacity(vertices.len());
    let in_tangents = vertices
        .iter()
        .map(|v| {
            if seen.insert(vertex_key(*v)) {
                Vec2::ZERO
            } else {
                jitter_tangent(rng)
            }
        })
        .collect();

    PathShape {
        out_tangents: vec![Vec2::ZERO; vertices.len()],
        in_tangents,
        vertices,
    }
}

// Vertices are already rounded to 2 decimals, so hundredths identify them exactly.
fn vertex_key(p: Point) -> (i64, i64) {
    ((p.x * 100.0).round() as i64, (p.y * 100.0).round() as i64)
}

fn jitter_tangent<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let x = round2(21.0 * rng.random::<f64>() - 9.0);
    let y = round2(21.0 * rng.random::<f64>() - 9.0);
    Vec2::new(x, y)
}
