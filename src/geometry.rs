//! Geometry Model - Calibration Grid Projection
//!
//! ```text
//!          0
//!    5            1
//!       9      6
//!          a
//!       8      7
//!    4            2
//!          3
//! ```

use kurbo::Point;
use serde::{Deserialize, Serialize};

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static PROJECTION_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn projection_count() -> u32 {
    PROJECTION_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_projection_count() {
    PROJECTION_COUNT.store(0, Ordering::SeqCst);
}

pub const NODE_COUNT: usize = 11;

/// A calibration node in polar form (angle in degrees, counter-clockwise from +X).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationNode {
    pub index: u8,
    pub magnitude: f64,
    pub degrees: f64,
}

/// Outer ring 0-5, inner ring 6-9, origin `a`.
pub const CALIBRATION_NODES: [CalibrationNode; NODE_COUNT] = [
    CalibrationNode { index: 0, magnitude: 1.0, degrees: 90.0 },
    CalibrationNode { index: 1, magnitude: 1.0, degrees: 30.0 },
    CalibrationNode { index: 2, magnitude: 1.0, degrees: -30.0 },
    CalibrationNode { index: 3, magnitude: 1.0, degrees: -90.0 },
    CalibrationNode { index: 4, magnitude: 1.0, degrees: -150.0 },
    CalibrationNode { index: 5, magnitude: 1.0, degrees: 150.0 },
    CalibrationNode { index: 6, magnitude: 0.5, degrees: 30.0 },
    CalibrationNode { index: 7, magnitude: 0.5, degrees: -30.0 },
    CalibrationNode { index: 8, magnitude: 0.5, degrees: -150.0 },
    CalibrationNode { index: 9, magnitude: 0.5, degrees: 150.0 },
    CalibrationNode { index: 10, magnitude: 0.0, degrees: 0.0 },
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasConfig {
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default = "default_origin")]
    pub origin_x: f64,
    #[serde(default = "default_origin")]
    pub origin_y: f64,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_font_spacing")]
    pub font_spacing: f64,
}

fn default_scale() -> f64 { 200.0 }
fn default_origin() -> f64 { 256.0 }
fn default_font_size() -> f64 { 20.0 }
fn default_font_spacing() -> f64 { 5.0 }

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            origin_x: default_origin(),
            origin_y: default_origin(),
            font_size: default_font_size(),
            font_spacing: default_font_spacing(),
        }
    }
}

impl CanvasConfig {
    /// Canvas used for an input of `line_count` lines.
    ///
    /// A single line leaves room for a caption above the grid by moving the
    /// origin down one font-size unit.
    pub fn for_line_count(&self, line_count: usize) -> Self {
        let shift = if line_count == 1 { self.font_size } else { 0.0 };
        Self {
            origin_y: self.origin_y + shift,
            ..*self
        }
    }
}

/// Project every calibration node onto the canvas (Y grows downward).
pub fn project(config: &CanvasConfig) -> [Point; NODE_COUNT] {
    #[cfg(feature = "test-hooks")]
    PROJECTION_COUNT.fetch_add(1, Ordering::SeqCst);

    CALIBRATION_NODES.map(|node| {
        let rad = node.degrees.to_radians();
        Point::new(
            config.origin_x + node.magnitude * rad.cos() * config.scale,
            config.origin_y - node.magnitude * rad.sin() * config.scale,
        )
    })
}

/// Map a code character to its node index (`0`-`9`, `a`/`A` = 10).
pub fn node_index(c: char) -> Option<usize> {
    match c {
        '0'..='9' => Some(c as usize - '0' as usize),
        'a' | 'A' => Some(10),
        _ => None,
    }
}

/// Round to two decimal places, the precision of every emitted coordinate.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn round_point(p: Point) -> Point {
    Point::new(round2(p.x), round2(p.y))
}

/// Projected node positions, cached against the config they were derived from.
#[derive(Debug, Clone)]
pub struct NodeLayout {
    config: CanvasConfig,
    points: [Point; NODE_COUNT],
}

impl NodeLayout {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            points: project(&config),
            config,
        }
    }

    /// Re-project only when the config actually changed. Returns whether it did.
    pub fn reconfigure(&mut self, config: CanvasConfig) -> bool {
        if config == self.config {
            return false;
        }
        self.points = project(&config);
        self.config = config;
        true
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn points(&self) -> &[Point; NODE_COUNT] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }
}

impl Default for NodeLayout {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_projection_is_distinct() {
        let points = project(&CanvasConfig::default());
        for i in 0..NODE_COUNT {
            for j in (i + 1)..NODE_COUNT {
                assert!(
                    points[i].distance(points[j]) > 1.0,
                    "nodes {} and {} coincide",
                    i,
                    j
                );
            }
        }
    }

    #[test]
    fn test_projection_orientation() {
        let points = project(&CanvasConfig::default());
        // top, bottom, centre
        assert_eq!(round_point(points[0]), Point::new(256.0, 56.0));
        assert_eq!(round_point(points[3]), Point::new(256.0, 456.0));
        assert_eq!(points[10], Point::new(256.0, 256.0));
        assert_eq!(round_point(points[1]), Point::new(429.21, 156.0));
    }

    #[test]
    fn test_single_line_shifts_origin() {
        let base = CanvasConfig::default();
        assert_eq!(base.for_line_count(1).origin_y, 276.0);
        assert_eq!(base.for_line_count(3).origin_y, 256.0);
        assert_eq!(base.for_line_count(1).origin_x, base.origin_x);
    }

    #[test]
    fn test_node_index() {
        assert_eq!(node_index('0'), Some(0));
        assert_eq!(node_index('9'), Some(9));
        assert_eq!(node_index('a'), Some(10));
        assert_eq!(node_index('A'), Some(10));
        assert_eq!(node_index('b'), None);
    }

    #[test]
    fn test_reconfigure_only_on_change() {
        let mut layout = NodeLayout::default();
        assert!(!layout.reconfigure(CanvasConfig::default()));
        let shifted = CanvasConfig::default().for_line_count(1);
        assert!(layout.reconfigure(shifted));
        assert_eq!(layout.point(10), Some(Point::new(256.0, 276.0)));
    }
}
