//! Caption Font - single-stroke vector shapes
//!
//! Each character is a set of open polylines in a 20-unit tall cell with the
//! origin at the top-left. Lowercase input is drawn with capital forms.

use kurbo::Point;

type Stroke = &'static [(i8, i8)];

const RING: Stroke = &[(2, 0), (8, 0), (10, 2), (10, 18), (8, 20), (2, 20), (0, 18), (0, 2), (2, 0)];
const BOWL: Stroke = &[(0, 20), (0, 0), (8, 0), (10, 2), (10, 8), (8, 10), (0, 10)];

fn strokes(c: char) -> Option<&'static [Stroke]> {
    let strokes: &'static [Stroke] = match c {
        'a' => &[&[(0, 20), (5, 0), (10, 20)], &[(2, 10), (8, 10)]],
        'b' => &[
            &[(0, 0), (0, 20), (7, 20), (10, 17), (10, 13), (7, 10), (0, 10)],
            &[(0, 0), (6, 0), (9, 3), (9, 7), (6, 10)],
        ],
        'c' => &[&[(10, 2), (8, 0), (2, 0), (0, 2), (0, 18), (2, 20), (8, 20), (10, 18)]],
        'd' => &[&[(0, 0), (0, 20), (6, 20), (10, 16), (10, 4), (6, 0), (0, 0)]],
        'e' => &[&[(10, 0), (0, 0), (0, 20), (10, 20)], &[(0, 10), (7, 10)]],
        'f' => &[&[(10, 0), (0, 0), (0, 20)], &[(0, 10), (7, 10)]],
        'g' => &[&[(10, 2), (8, 0), (2, 0), (0, 2), (0, 18), (2, 20), (8, 20), (10, 18), (10, 11), (5, 11)]],
        'h' => &[&[(0, 0), (0, 20)], &[(10, 0), (10, 20)], &[(0, 10), (10, 10)]],
        'i' => &[&[(0, 0), (4, 0)], &[(2, 0), (2, 20)], &[(0, 20), (4, 20)]],
        'j' => &[&[(3, 0), (10, 0)], &[(8, 0), (8, 17), (5, 20), (2, 20), (0, 17)]],
        'k' => &[&[(0, 0), (0, 20)], &[(10, 0), (0, 12)], &[(3, 9), (10, 20)]],
        'l' => &[&[(0, 0), (0, 20), (9, 20)]],
        'm' => &[&[(0, 20), (0, 0), (6, 10), (12, 0), (12, 20)]],
        'n' => &[&[(0, 20), (0, 0), (10, 20), (10, 0)]],
        'o' => &[RING],
        'p' => &[BOWL],
        'q' => &[RING, &[(6, 14), (10, 20)]],
        'r' => &[BOWL, &[(4, 10), (10, 20)]],
        's' => &[&[(10, 2), (8, 0), (2, 0), (0, 2), (0, 8), (2, 10), (8, 10), (10, 12), (10, 18), (8, 20), (2, 20), (0, 18)]],
        't' => &[&[(0, 0), (10, 0)], &[(5, 0), (5, 20)]],
        'u' => &[&[(0, 0), (0, 18), (2, 20), (8, 20), (10, 18), (10, 0)]],
        'v' => &[&[(0, 0), (5, 20), (10, 0)]],
        'w' => &[&[(0, 0), (3, 20), (6, 8), (9, 20), (12, 0)]],
        'x' => &[&[(0, 0), (10, 20)], &[(10, 0), (0, 20)]],
        'y' => &[&[(0, 0), (5, 10), (10, 0)], &[(5, 10), (5, 20)]],
        'z' => &[&[(0, 0), (10, 0), (0, 20), (10, 20)]],
        '0' => &[RING, &[(9, 3), (1, 17)]],
        '1' => &[&[(2, 4), (6, 0), (6, 20)], &[(2, 20), (10, 20)]],
        '2' => &[&[(0, 3), (3, 0), (7, 0), (10, 3), (10, 8), (0, 20), (10, 20)]],
        '3' => &[
            &[(0, 2), (2, 0), (8, 0), (10, 2), (10, 8), (8, 10), (10, 12), (10, 18), (8, 20), (2, 20), (0, 18)],
            &[(4, 10), (8, 10)],
        ],
        '4' => &[&[(8, 20), (8, 0), (0, 14), (10, 14)]],
        '5' => &[&[(10, 0), (0, 0), (0, 9), (8, 9), (10, 11), (10, 18), (8, 20), (0, 20)]],
        '6' => &[&[(9, 0), (3, 0), (0, 4), (0, 18), (2, 20), (8, 20), (10, 18), (10, 12), (8, 10), (0, 10)]],
        '7' => &[&[(0, 0), (10, 0), (3, 20)]],
        '8' => &[
            &[(2, 0), (8, 0), (10, 2), (10, 8), (8, 10), (2, 10), (0, 8), (0, 2), (2, 0)],
            &[(2, 10), (8, 10), (10, 12), (10, 18), (8, 20), (2, 20), (0, 18), (0, 12), (2, 10)],
        ],
        '9' => &[&[(10, 10), (2, 10), (0, 8), (0, 2), (2, 0), (8, 0), (10, 2), (10, 16), (7, 20), (1, 20)]],
        '-' => &[&[(0, 10), (6, 10)]],
        '\'' => &[&[(1, 0), (1, 5)]],
        _ => return None,
    };
    Some(strokes)
}

/// Vector shape of one caption character.
#[derive(Debug, Clone, PartialEq)]
pub struct CharShape {
    pub strokes: Vec<Vec<Point>>,
}

impl CharShape {
    /// Advance width: the largest X among all vertices.
    pub fn width(&self) -> f64 {
        self.strokes
            .iter()
            .flatten()
            .map(|p| p.x)
            .fold(0.0, f64::max)
    }
}

/// Character -> shape table used by the caption typesetter.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrokeFont;

impl StrokeFont {
    pub fn new() -> Self {
        Self
    }

    pub fn shape(&self, c: char) -> Option<CharShape> {
        let strokes = strokes(c.to_ascii_lowercase())?;
        Some(CharShape {
            strokes: strokes
                .iter()
                .map(|stroke| {
                    stroke
                        .iter()
                        .map(|&(x, y)| Point::new(f64::from(x), f64::from(y)))
                        .collect()
                })
                .collect(),
        })
    }
}
