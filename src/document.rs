//! Animation Document - typed layers and their Lottie encoding
//!
//! Layers are built as tagged variants and only flattened into the wire
//! schema on serialization. Index 0 of `layers` renders on top.

use kurbo::{Point, Vec2};
use serde::Serialize;

use crate::font::CharShape;
use crate::geometry::{round2, NODE_COUNT};
use crate::lottie::{self, Bezier, Easing, Keyframe, Property, ShapeItem};
use crate::palette::Rgb;
use crate::path::PathShape;
use crate::schedule::FrameWindow;

pub const LOTTIE_VERSION: &str = "5.7.0";
pub const DOCUMENT_NAME: &str = "GlyphSticker";

const GRID_NODE_DIAMETER: f64 = 20.0;
const GRID_STROKE_WIDTH: f64 = 3.0;
const CAPTION_STROKE_WIDTH: f64 = 2.0;
const WHITE: [f64; 4] = [1.0, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, Serialize)]
#[serde(into = "lottie::Animation")]
pub struct AnimationDocument {
    pub version: String,
    pub name: String,
    pub generator: String,
    pub frame_rate: f64,
    pub total_frames: u32,
    pub width: u32,
    pub height: u32,
    pub layers: Vec<Layer>,
}

impl AnimationDocument {
    pub fn layers_of<'a>(&'a self, pred: impl Fn(&LayerKind) -> bool + 'a) -> impl Iterator<Item = &'a Layer> + 'a {
        self.layers.iter().filter(move |l| pred(&l.kind))
    }

    pub fn stroke_layers(&self) -> impl Iterator<Item = &Layer> + '_ {
        self.layers_of(|k| matches!(k, LayerKind::Stroke(_)))
    }

    pub fn caption_layers(&self) -> impl Iterator<Item = &Layer> + '_ {
        self.layers_of(|k| matches!(k, LayerKind::Caption(_)))
    }

    pub fn to_lottie(&self) -> lottie::Animation {
        self.clone().into()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub window: FrameWindow,
    pub kind: LayerKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    Grid(GridLayer),
    Background(BackgroundLayer),
    Stroke(StrokeLayer),
    Caption(CaptionLayer),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLayer {
    pub nodes: [Point; NODE_COUNT],
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundLayer {
    pub color: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrokeLayer {
    pub path: PathShape,
    pub color: Rgb,
    pub width: f64,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptionLayer {
    pub character: char,
    pub shape: CharShape,
    pub anchor: Point,
    pub position: Point,
}

/// Per-stroke animation effects, both driven by the layer's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// End of the trim path eases 0 -> 100 % across the window.
    TrimPath,
    /// Opacity snaps on one frame after the start and off one frame after the end.
    Opacity,
}

impl Layer {
    pub fn grid(nodes: [Point; NODE_COUNT], total_frames: u32) -> Self {
        Self {
            name: "CalibrationGrid".to_string(),
            window: FrameWindow::full(total_frames),
            kind: LayerKind::Grid(GridLayer { nodes }),
        }
    }

    /// Background hidden on the last frame, which makes the sticker blink once per loop.
    pub fn background(color: impl Into<String>, width: u32, height: u32, total_frames: u32) -> Self {
        Self {
            name: "Background".to_string(),
            window: FrameWindow::new(0, total_frames.saturating_sub(1)),
            kind: LayerKind::Background(BackgroundLayer {
                color: color.into(),
                width,
                height,
            }),
        }
    }

    pub fn stroke(name: impl Into<String>, window: FrameWindow, path: PathShape, color: Rgb, width: f64, animated: bool) -> Self {
        let effects = if animated {
            vec![Effect::TrimPath, Effect::Opacity]
        } else {
            vec![]
        };
        Self {
            name: name.into(),
            window,
            kind: LayerKind::Stroke(StrokeLayer { path, color, width, effects }),
        }
    }

    pub fn caption(character: char, shape: CharShape, position: Point, window: FrameWindow) -> Self {
        let anchor = Point::new(shape.width() / 2.0, 0.0);
        Self {
            name: format!("char {}", character),
            window,
            kind: LayerKind::Caption(CaptionLayer {
                character,
                shape,
                anchor,
                position,
            }),
        }
    }
}

impl From<AnimationDocument> for lottie::Animation {
    fn from(doc: AnimationDocument) -> Self {
        Self {
            v: doc.version,
            fr: doc.frame_rate,
            ip: 0,
            op: doc.total_frames,
            nm: doc.name,
            ddd: 0,
            h: doc.height,
            w: doc.width,
            meta: lottie::Meta { g: doc.generator },
            layers: doc.layers.into_iter().map(lottie::Layer::from).collect(),
        }
    }
}

impl From<Layer> for lottie::Layer {
    fn from(layer: Layer) -> Self {
        let FrameWindow { start, end } = layer.window;
        match layer.kind {
            LayerKind::Grid(grid) => lottie::Layer::shape(layer.name, start, end, 0, grid_shapes(&grid)),
            LayerKind::Background(bg) => lottie::Layer::solid(layer.name, start, end, bg.color, bg.width, bg.height),
            LayerKind::Stroke(stroke) => {
                lottie::Layer::shape(layer.name, start, end, start, stroke_shapes(&stroke, layer.window))
            }
            LayerKind::Caption(caption) => {
                let mut out = lottie::Layer::shape(layer.name, start, end, 0, caption_shapes(&caption));
                out.ddd = Some(0);
                out.ind = Some(0);
                out.sr = Some(1.0);
                out.ao = Some(0);
                out.bm = Some(0);
                out
            }
        }
    }
}

fn point2(p: Point) -> [f64; 2] {
    [p.x, p.y]
}

fn vec2(v: Vec2) -> [f64; 2] {
    [v.x, v.y]
}

fn stroke_style(color: [f64; 4], width: f64, line_join: u8) -> ShapeItem {
    ShapeItem::Stroke {
        c: Property::fixed(color),
        o: Property::fixed(100.0),
        w: Property::fixed(width),
        lc: 2,
        lj: line_join,
        ml: 10.0,
        bm: 0,
        nm: "Stroke".to_string(),
    }
}

fn open_path(strokes: &[Point]) -> ShapeItem {
    ShapeItem::Path {
        ks: Property::fixed(Bezier {
            i: vec![[0.0, 0.0]; strokes.len()],
            o: vec![[0.0, 0.0]; strokes.len()],
            v: strokes.iter().copied().map(point2).collect(),
            c: false,
        }),
        nm: None,
    }
}

fn grid_shapes(grid: &GridLayer) -> Vec<ShapeItem> {
    grid.nodes
        .iter()
        .map(|node| ShapeItem::Ellipse {
            p: Property::fixed([round2(node.x), round2(node.y)]),
            s: Property::fixed([GRID_NODE_DIAMETER, GRID_NODE_DIAMETER]),
            nm: "Circle Path".to_string(),
        })
        .chain(std::iter::once(stroke_style(WHITE, GRID_STROKE_WIDTH, 1)))
        .collect()
}

fn stroke_shapes(stroke: &StrokeLayer, window: FrameWindow) -> Vec<ShapeItem> {
    let path = &stroke.path;
    let mut shapes = vec![
        ShapeItem::Path {
            ks: Property::fixed(Bezier {
                i: path.in_tangents.iter().copied().map(vec2).collect(),
                o: path.out_tangents.iter().copied().map(vec2).collect(),
                v: path.vertices.iter().copied().map(point2).collect(),
                c: path.is_closed(),
            }),
            nm: None,
        },
        stroke_style(stroke.color.to_unit_rgba(), stroke.width, 2),
    ];
    shapes.extend(stroke.effects.iter().map(|effect| effect_shape(*effect, window)));
    shapes
}

fn effect_shape(effect: Effect, window: FrameWindow) -> ShapeItem {
    let FrameWindow { start, end } = window;
    match effect {
        Effect::TrimPath => ShapeItem::Trim {
            nm: "TrimPath".to_string(),
            ix: 3,
            hd: false,
            s: Property::fixed(0.0).with_index(1),
            e: Property::animated(vec![
                Keyframe::eased(start, 0.0, Easing::new(0.3, 1.0), Easing::new(0.333, 0.0)),
                Keyframe::hold(end, 100.0),
            ])
            .with_index(2),
            o: Property::fixed(0.0).with_index(3),
            m: 1,
        },
        Effect::Opacity => {
            let mut transform = lottie::Transform::identity();
            let mut keyframes = vec![Keyframe::hold(start, 0.0), Keyframe::hold(start + 1, 100.0)];
            // keyframe times must strictly increase
            if end > start + 1 {
                keyframes.push(Keyframe::hold(end, 100.0));
            }
            keyframes.push(Keyframe::hold(end.max(start + 1) + 1, 0.0));
            transform.o = Property::animated(keyframes).with_index(11);
            ShapeItem::Transform { transform }
        }
    }
}

fn caption_shapes(caption: &CaptionLayer) -> Vec<ShapeItem> {
    let mut transform = lottie::Transform::identity();
    transform.a = Property::fixed([round2(caption.anchor.x), round2(caption.anchor.y)]);
    transform.p = Property::fixed([round2(caption.position.x), round2(caption.position.y)]);

    let mut items: Vec<ShapeItem> = caption.shape.strokes.iter().map(|s| open_path(s)).collect();
    items.push(stroke_style(WHITE, CAPTION_STROKE_WIDTH, 2));
    items.push(ShapeItem::Transform { transform });

    vec![ShapeItem::Group { it: items, nm: None }]
}
