//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees.

use std::io::Write;

use glyphsticker_core::{
    build_edges, build_path_shape, canonical_json,
    document::{AnimationDocument, LayerKind},
    geometry::{project, CanvasConfig, NODE_COUNT},
    glyphs::GlyphTable,
    palette::PALETTE,
    stroke_width, CompileOptions, FrameWindow, GlyphCompiler, PipelineError, StickerConfig,
};
use kurbo::{Point, Vec2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn compile(input: &str, options: CompileOptions) -> Option<AnimationDocument> {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    GlyphCompiler::default().compile_with_rng(input, &options, &mut rng)
}

fn stroke_windows(doc: &AnimationDocument) -> Vec<FrameWindow> {
    doc.stroke_layers().map(|l| l.window).collect()
}

fn stroke_vertices(doc: &AnimationDocument) -> Vec<Vec<Point>> {
    doc.stroke_layers()
        .map(|l| match &l.kind {
            LayerKind::Stroke(s) => s.path.vertices.clone(),
            _ => unreachable!(),
        })
        .collect()
}

#[test]
fn invariant_default_grid_has_distinct_nodes() {
    let points = project(&CanvasConfig::default());
    assert_eq!(points.len(), NODE_COUNT);
    for i in 0..NODE_COUNT {
        for j in (i + 1)..NODE_COUNT {
            assert_ne!(points[i], points[j]);
        }
    }
}

#[test]
fn invariant_projection_is_idempotent() {
    let config = CanvasConfig::default().for_line_count(1);
    assert_eq!(project(&config), project(&config));
}

#[test]
fn invariant_edge_and_vertex_counts() {
    let nodes = project(&CanvasConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    for code in ["01", "0a3", "01234", "5a8732", "0123450a"] {
        let edges = build_edges(code, &nodes).unwrap();
        assert_eq!(edges.len(), code.len() - 1);
        let path = build_path_shape(&edges, &mut rng);
        assert_eq!(path.vertices.len(), code.len());
        assert_eq!(path.in_tangents.len(), code.len());
        assert!(!path.is_closed());
    }
}

#[test]
fn invariant_tangent_zero_iff_first_occurrence() {
    let nodes = project(&CanvasConfig::default());
    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let edges = build_edges("0a3a06a", &nodes).unwrap();
        let path = build_path_shape(&edges, &mut rng);
        for (j, v) in path.vertices.iter().enumerate() {
            let first = path.vertices.iter().position(|p| p == v).unwrap();
            if first == j {
                assert_eq!(path.in_tangents[j], Vec2::ZERO);
            } else {
                assert_eq!(path.in_tangents[first], Vec2::ZERO);
                assert_ne!(path.in_tangents[j], Vec2::ZERO);
            }
        }
    }
}

#[test]
fn invariant_single_code_document() {
    let doc = compile("0123", CompileOptions::default()).unwrap();

    let strokes: Vec<_> = doc.stroke_layers().collect();
    assert_eq!(strokes.len(), 1);
    assert_eq!(stroke_vertices(&doc)[0].len(), 4);
    assert_eq!(strokes[0].window, FrameWindow::new(0, 180));

    let captions: Vec<_> = doc.caption_layers().collect();
    assert_eq!(captions.len(), 4);
    assert!(captions.iter().all(|l| l.window == FrameWindow::new(0, 180)));

    assert!(matches!(doc.layers[doc.layers.len() - 2].kind, LayerKind::Grid(_)));
    assert!(matches!(doc.layers[doc.layers.len() - 1].kind, LayerKind::Background(_)));
    assert_eq!(doc.layers.len(), 1 + 4 + 2);

    // captions render above their glyph
    assert!(matches!(doc.layers[0].kind, LayerKind::Caption(_)));
    assert!(matches!(doc.layers[4].kind, LayerKind::Stroke(_)));
}

#[test]
fn invariant_no_caption_when_disabled() {
    let options = CompileOptions { show_caption: false, ..CompileOptions::default() };
    let doc = compile("0123", options).unwrap();
    assert_eq!(doc.caption_layers().count(), 0);
    assert_eq!(doc.layers.len(), 3);
}

#[test]
fn invariant_invalid_tokens_yield_nothing() {
    assert!(compile("!!!, zz", CompileOptions::default()).is_none());
    assert!(compile("!!!\nzz\n11", CompileOptions::default()).is_none());
    assert!(compile("", CompileOptions::default()).is_none());
    assert!(compile("   \n\n", CompileOptions::default()).is_none());
}

#[test]
fn invariant_named_glyph_matches_literal_code() {
    let table = GlyphTable::builtin();
    assert_eq!(table.get("truth").map(|c| c.as_str()), Some("049"));

    let named = compile("truth", CompileOptions::default()).unwrap();
    let literal = compile("049", CompileOptions::default()).unwrap();
    assert_eq!(stroke_vertices(&named), stroke_vertices(&literal));

    let names: Vec<_> = named.stroke_layers().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["truth"]);
}

#[test]
fn invariant_two_words_split_timeline() {
    let doc = compile("01,23", CompileOptions::default()).unwrap();
    // newest first
    let mut windows = stroke_windows(&doc);
    windows.reverse();
    assert_eq!(windows, vec![FrameWindow::new(0, 90), FrameWindow::new(90, 180)]);
}

#[test]
fn invariant_lines_share_timeline() {
    let doc = compile("01 23 45\n0a\n9a7", CompileOptions::default()).unwrap();
    let windows = stroke_windows(&doc);
    assert_eq!(windows.len(), 5);
    assert!(windows.iter().all(|w| w.end <= 180));
    assert_eq!(windows.iter().filter(|w| w.end == 180).count(), 3);
}

#[test]
fn invariant_palette_advances_once_per_line() {
    let doc = compile("01 23 45\n0a\n9a7 12", CompileOptions::default()).unwrap();
    let mut colors: Vec<_> = doc
        .stroke_layers()
        .map(|l| match &l.kind {
            LayerKind::Stroke(s) => s.color,
            _ => unreachable!(),
        })
        .collect();
    colors.reverse();
    assert_eq!(
        colors,
        vec![PALETTE[0], PALETTE[0], PALETTE[0], PALETTE[1], PALETTE[2], PALETTE[2]]
    );
}

#[test]
fn invariant_palette_wraps() {
    let input: Vec<String> = (0..PALETTE.len() + 1).map(|_| "01".to_string()).collect();
    let doc = compile(&input.join("\n"), CompileOptions::default()).unwrap();
    let first = doc.stroke_layers().last().unwrap();
    let newest = doc.stroke_layers().next().unwrap();
    match (&first.kind, &newest.kind) {
        (LayerKind::Stroke(a), LayerKind::Stroke(b)) => assert_eq!(a.color, b.color),
        _ => unreachable!(),
    }
}

#[test]
fn invariant_background_blinks_before_end() {
    for input in ["0123", "01 23\n45", "harmony xm"] {
        let doc = compile(input, CompileOptions::default()).unwrap();
        let background = doc.layers.last().unwrap();
        assert!(matches!(background.kind, LayerKind::Background(_)));
        assert_eq!(background.window.end, doc.total_frames - 1);
    }
}

#[test]
fn invariant_every_window_within_timeline() {
    let doc = compile("01 23 45 67 89 0a 12\n0a3", CompileOptions::default()).unwrap();
    let wire = doc.to_lottie();
    for layer in &wire.layers {
        assert!(layer.ip < layer.op);
        assert!(layer.op <= wire.op);
    }
}

fn keyframe_times(value: &serde_json::Value, out: &mut Vec<Vec<u64>>) {
    match value {
        serde_json::Value::Object(map) => {
            if map.get("a") == Some(&serde_json::json!(1)) {
                if let Some(frames) = map.get("k").and_then(|k| k.as_array()) {
                    out.push(frames.iter().filter_map(|f| f["t"].as_u64()).collect());
                }
            }
            map.values().for_each(|v| keyframe_times(v, out));
        }
        serde_json::Value::Array(items) => items.iter().for_each(|v| keyframe_times(v, out)),
        _ => {}
    }
}

#[test]
fn invariant_crowded_line_shows_every_word() {
    let input = vec!["01"; 200].join(" ");
    let doc = compile(&input, CompileOptions::default()).unwrap();
    assert_eq!(doc.stroke_layers().count(), 200);

    let wire = doc.to_lottie();
    for layer in &wire.layers {
        assert!(layer.ip < layer.op, "{} has an empty window", layer.nm);
        assert!(layer.op <= wire.op);
    }

    let mut sequences = vec![];
    keyframe_times(&serde_json::to_value(&doc).unwrap(), &mut sequences);
    assert_eq!(sequences.len(), 400);
    for times in &sequences {
        assert!(times.windows(2).all(|pair| pair[0] < pair[1]), "{:?}", times);
    }
}

#[test]
fn invariant_unusable_lines_keep_index_but_not_color() {
    let doc = compile("zz\n01\n!!\n23", CompileOptions::default()).unwrap();
    let mut strokes: Vec<_> = doc
        .stroke_layers()
        .map(|l| match &l.kind {
            LayerKind::Stroke(s) => (s.color, s.width),
            _ => unreachable!(),
        })
        .collect();
    strokes.reverse();
    assert_eq!(strokes, vec![(PALETTE[0], 7.8), (PALETTE[1], 6.6)]);
    assert_eq!(stroke_width(1, 4), 7.8);
    assert_eq!(stroke_width(3, 4), 6.6);
}

#[test]
fn invariant_static_mode_has_no_keyframes() {
    let options = CompileOptions { animated: false, ..CompileOptions::default() };
    let doc = compile("0123", options).unwrap();
    let json = serde_json::to_value(&doc).unwrap();
    let text = json.to_string();
    assert!(!text.contains("\"tm\""));
    assert!(!text.contains("\"a\":1"));
}

#[test]
fn invariant_document_metadata() {
    let doc = compile("0123", CompileOptions::default()).unwrap();
    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json["v"], "5.7.0");
    assert_eq!(json["fr"], 60.0);
    assert_eq!(json["ip"], 0);
    assert_eq!(json["op"], 180);
    assert_eq!(json["w"], 512);
    assert_eq!(json["h"], 512);
    assert_eq!(json["layers"].as_array().map(Vec::len), Some(7));
}

#[test]
fn invariant_stroke_width_first_line_and_taper() {
    let doc = compile("01\n23\n45", CompileOptions::default()).unwrap();
    let mut widths: Vec<f64> = doc
        .stroke_layers()
        .map(|l| match &l.kind {
            LayerKind::Stroke(s) => s.width,
            _ => unreachable!(),
        })
        .collect();
    widths.reverse();
    assert_eq!(widths, vec![8.0, 7.2, 6.6]);
}

#[test]
fn invariant_seeded_compile_is_reproducible() {
    let a = compile("0a3a0 harmony", CompileOptions::default()).unwrap();
    let b = compile("0a3a0 harmony", CompileOptions::default()).unwrap();
    assert_eq!(canonical_json(&a).unwrap(), canonical_json(&b).unwrap());
}

#[test]
fn invariant_single_line_grid_shifted_for_caption() {
    let single = compile("0123", CompileOptions::default()).unwrap();
    let multi = compile("0123\n45", CompileOptions::default()).unwrap();
    let centre = |doc: &AnimationDocument| match &doc.layers[doc.layers.len() - 2].kind {
        LayerKind::Grid(g) => g.nodes[10],
        _ => unreachable!(),
    };
    assert_eq!(centre(&single), Point::new(256.0, 276.0));
    assert_eq!(centre(&multi), Point::new(256.0, 256.0));
    assert_eq!(multi.caption_layers().count(), 0);
}

#[test]
fn invariant_dictionary_file_extends_table() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"version": "1.1.0", "engineMinVersion": "1.0.0", "glyphs": {{"Spiral": "0a94"}}}}"#
    )
    .unwrap();

    let table = GlyphTable::load_from_path(file.path()).unwrap();
    assert_eq!(table.get("spiral").map(|c| c.as_str()), Some("0a94"));
    assert!(table.contains("truth"));

    let compiler = GlyphCompiler::new(table, StickerConfig::default());
    let doc = compiler.compile("spiral", &CompileOptions::default()).unwrap();
    assert_eq!(doc.stroke_layers().count(), 1);
}

#[test]
fn invariant_malformed_dictionary_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"version": "1.0.0", "glyphs": {{"broken": "0bb"}}}}"#).unwrap();

    let err = GlyphTable::load_from_path(file.path()).unwrap_err();
    assert!(matches!(err, PipelineError::Glyph(_)));
    assert!(err.to_string().contains("Glyph error"));
}

#[test]
fn invariant_missing_dictionary_error() {
    let err = GlyphTable::load_from_path(std::path::Path::new("/nonexistent/glyphs.json")).unwrap_err();
    assert!(err.to_string().contains("Glyph dictionary not found"));
}
