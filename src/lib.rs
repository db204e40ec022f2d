//! Glyph Sticker Core - Glyph to Animated Sticker Compiler
//!
//! # The Rules
//! 1. Validation Before Geometry
//! 2. No Glyph, No Document
//! 3. One Projection Per Compile
//! 4. Coordinates Are Rounded To Hundredths
//! 5. Newest Layers Render On Top

pub mod geometry;
pub mod glyphs;
pub mod path;
pub mod schedule;
pub mod font;
pub mod typeset;
pub mod palette;
pub mod validation;
pub mod lottie;
pub mod document;
pub mod hashing;
pub mod export;
pub mod pipeline;

pub use geometry::{CanvasConfig, NodeLayout, project};
pub use glyphs::{GlyphCode, GlyphError, GlyphTable};
pub use path::{Edge, PathShape, build_edges, build_path_shape};
pub use schedule::{FrameWindow, schedule_words};
pub use document::{AnimationDocument, Effect, Layer, LayerKind};
pub use validation::{ValidationReport, Validator};
pub use hashing::{compute_document_hash, compute_sticker_key, canonical_json};
pub use export::{decode_tgs, encode_tgs};
pub use pipeline::{stroke_width, CompileOptions, CompileRequest, CompiledSticker, GlyphCompiler, PipelineError, StickerConfig};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const MIN_DICTIONARY_VERSION: &str = "1.0.0";
