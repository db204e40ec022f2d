//! Caption Typesetter
//!
//! Lays a word out left to right, one layer per drawable character.
//! Characters without a shape still advance the cursor.

use kurbo::Point;

use crate::document::Layer;
use crate::font::StrokeFont;
use crate::geometry::CanvasConfig;
use crate::schedule::FrameWindow;

const MISSING_ADVANCE_FACTOR: f64 = 3.0;

/// Total caption width: the final cursor position minus the trailing spacing.
pub fn measure_caption(word: &str, font: &StrokeFont, canvas: &CanvasConfig) -> f64 {
    let advance: f64 = word
        .chars()
        .map(|c| match font.shape(c) {
            Some(shape) => shape.width() + canvas.font_spacing,
            None => canvas.font_spacing * MISSING_ADVANCE_FACTOR,
        })
        .sum();
    (advance - canvas.font_spacing).max(0.0)
}

/// Caption layers for `word`, starting at `origin` (left edge, top of the text band).
pub fn layout_caption(
    word: &str,
    origin: Point,
    window: FrameWindow,
    font: &StrokeFont,
    canvas: &CanvasConfig,
) -> Vec<Layer> {
    let y = origin.y + canvas.font_size / 2.0;
    let mut cursor = 0.0;
    let mut layers = Vec::with_capacity(word.len());

    for c in word.chars() {
        match font.shape(c) {
            Some(shape) => {
                let width = shape.width();
                let position = Point::new(origin.x + cursor + width / 2.0, y);
                layers.push(Layer::caption(c, shape, position, window));
                cursor += width + canvas.font_spacing;
            }
            None => cursor += canvas.font_spacing * MISSING_ADVANCE_FACTOR,
        }
    }
    layers
}

/// Caption layers centered horizontally on a canvas `canvas_width` wide.
pub fn layout_centered(
    word: &str,
    canvas_width: f64,
    top: f64,
    window: FrameWindow,
    font: &StrokeFont,
    canvas: &CanvasConfig,
) -> Vec<Layer> {
    let x = (canvas_width - measure_caption(word, font, canvas)) / 2.0;
    layout_caption(word, Point::new(x, top), window, font, canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::LayerKind;

    fn positions(layers: &[Layer]) -> Vec<f64> {
        layers
            .iter()
            .map(|l| match &l.kind {
                LayerKind::Caption(c) => c.position.x,
                _ => panic!("not a caption layer"),
            })
            .collect()
    }

    #[test]
    fn test_measure_digits() {
        // '0','1','2','3' are all 10 wide, spaced by 5
        let width = measure_caption("0123", &StrokeFont::new(), &CanvasConfig::default());
        assert_eq!(width, 55.0);
    }

    #[test]
    fn test_cursor_advances_by_width_and_spacing() {
        let layers = layout_caption("mi", Point::new(100.0, 30.0), FrameWindow::full(180), &StrokeFont::new(), &CanvasConfig::default());
        // m: 12 wide at 100..112, i: 4 wide at 117..121
        assert_eq!(positions(&layers), vec![106.0, 119.0]);
    }

    #[test]
    fn test_unknown_character_skips_triple_spacing() {
        let layers = layout_caption("a?a", Point::ZERO, FrameWindow::full(180), &StrokeFont::new(), &CanvasConfig::default());
        assert_eq!(layers.len(), 2);
        // second 'a' starts at 10 + 5 + 15
        assert_eq!(positions(&layers), vec![5.0, 35.0]);
    }

    #[test]
    fn test_layers_share_window() {
        let window = FrameWindow::new(90, 180);
        let layers = layout_caption("01", Point::ZERO, window, &StrokeFont::new(), &CanvasConfig::default());
        assert!(layers.iter().all(|l| l.window == window));
    }

    #[test]
    fn test_centered_layout_is_symmetric() {
        let layers = layout_centered("0123", 512.0, 30.0, FrameWindow::full(180), &StrokeFont::new(), &CanvasConfig::default());
        let xs = positions(&layers);
        // left edge at (512 - 55) / 2 = 228.5, right edge at 283.5
        assert_eq!(xs[0] - 5.0, 228.5);
        assert_eq!(xs[3] + 5.0, 283.5);
    }
}
