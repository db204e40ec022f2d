//! Compilation Pipeline - Single Entry Point
//!
//! CRITICAL: compile MUST validate its input first. A document is only
//! produced when at least one token resolved to a glyph.

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

use crate::document::{AnimationDocument, Layer, DOCUMENT_NAME, LOTTIE_VERSION};
use crate::export::{encode_tgs, TGS_MEDIA_TYPE};
use crate::font::StrokeFont;
use crate::geometry::{round2, CanvasConfig, NodeLayout};
use crate::glyphs::{GlyphError, GlyphTable};
use crate::hashing::{compute_document_hash, compute_sticker_key};
use crate::palette::PaletteCursor;
use crate::path::{build_path_shape, glyph_edges};
use crate::schedule::schedule_words;
use crate::typeset::layout_centered;
use crate::validation::{ValidationReport, Validator};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Glyph dictionary not found: {0}")]
    DictionaryNotFound(String),

    #[error("Invalid glyph dictionary: {0}")]
    DictionaryInvalid(String),

    #[error("Dictionary version {0} requires engine >= {1}, current is {2}")]
    EngineVersionMismatch(String, String, String),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Glyph error: {0}")]
    Glyph(#[from] GlyphError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOptions {
    #[serde(default = "default_true")]
    pub animated: bool,
    #[serde(default = "default_true")]
    pub show_caption: bool,
}

fn default_true() -> bool { true }

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            animated: true,
            show_caption: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerConfig {
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default = "default_total_frames")]
    pub total_frames: u32,
    #[serde(default = "default_size")]
    pub width: u32,
    #[serde(default = "default_size")]
    pub height: u32,
    #[serde(default = "default_caption_top")]
    pub caption_top: f64,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_name")]
    pub name: String,
}

fn default_total_frames() -> u32 { 180 }
fn default_size() -> u32 { 512 }
fn default_caption_top() -> f64 { 30.0 }
fn default_background() -> String { "#000000".to_string() }
fn default_name() -> String { DOCUMENT_NAME.to_string() }

impl Default for StickerConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            total_frames: default_total_frames(),
            width: default_size(),
            height: default_size(),
            caption_top: default_caption_top(),
            background: default_background(),
            name: default_name(),
        }
    }
}

impl StickerConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, PipelineError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| PipelineError::ConfigInvalid(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded sticker config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.total_frames < 2 {
            return Err(PipelineError::ConfigInvalid(format!(
                "totalFrames must be at least 2, got {}",
                self.total_frames
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(PipelineError::ConfigInvalid("canvas size must be non-zero".into()));
        }
        if self.canvas.scale <= 0.0 {
            return Err(PipelineError::ConfigInvalid("scale must be positive".into()));
        }
        Ok(())
    }

    pub fn frame_rate(&self) -> f64 {
        f64::from(self.total_frames) / 3.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileRequest {
    pub text: String,
    #[serde(default)]
    pub options: CompileOptions,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledSticker {
    pub id: String,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
    pub cache_key: String,
    pub document_hash: String,
    pub media_type: String,
    pub size_bytes: usize,
    pub validation: ValidationReport,
    pub data_base64: String,
}

/// Stroke width for a line: the first line is always 8, later lines taper with distance from the end.
pub fn stroke_width(line_index: usize, total_lines: usize) -> f64 {
    if line_index == 0 {
        return 8.0;
    }
    let distance = total_lines.saturating_sub(line_index) % 20;
    round2(6.0 + distance as f64 * 0.6)
}

/// The glyph compiler - single entry point for all sticker operations
pub struct GlyphCompiler {
    glyphs: GlyphTable,
    font: StrokeFont,
    config: StickerConfig,
    validator: Validator,
}

impl GlyphCompiler {
    pub fn new(glyphs: GlyphTable, config: StickerConfig) -> Self {
        Self {
            glyphs,
            font: StrokeFont::new(),
            config,
            validator: Validator::new(),
        }
    }

    pub fn glyphs(&self) -> &GlyphTable {
        &self.glyphs
    }

    pub fn config(&self) -> &StickerConfig {
        &self.config
    }

    /// Validate input text
    ///
    /// This is the ONLY validation entry point.
    pub fn validate(&self, input: &str) -> ValidationReport {
        self.validator.validate(input, &self.glyphs)
    }

    /// Compile text into a document using the thread-local random source.
    ///
    /// Returns `None` when no token on any line is a usable glyph.
    pub fn compile(&self, input: &str, options: &CompileOptions) -> Option<AnimationDocument> {
        self.compile_with_rng(input, options, &mut rand::rng())
    }

    /// Compile with an explicit random source for the tangent jitter.
    pub fn compile_with_rng<R: Rng + ?Sized>(
        &self,
        input: &str,
        options: &CompileOptions,
        rng: &mut R,
    ) -> Option<AnimationDocument> {
        // MANDATORY: Validation is always called.
        let report = self.validate(input);
        if !report.valid {
            tracing::info!("no usable glyph found");
            return None;
        }
        Some(self.assemble(&report, options, rng))
    }

    /// Lay out the usable lines of an already validated input.
    #[tracing::instrument(skip_all, fields(lines = report.lines.len()))]
    fn assemble<R: Rng + ?Sized>(
        &self,
        report: &ValidationReport,
        options: &CompileOptions,
        rng: &mut R,
    ) -> AnimationDocument {
        let line_count = report.lines.len();
        let canvas = self.config.canvas.for_line_count(line_count);
        let layout = NodeLayout::new(canvas);
        let total_frames = self.config.total_frames;
        let with_caption = options.show_caption && line_count == 1;

        let mut layers = VecDeque::new();
        let mut palette = PaletteCursor::new();

        for line in report.lines.iter().filter(|l| l.is_usable()) {
            let width = stroke_width(line.index, line_count);
            let windows = schedule_words(line.glyphs.len(), total_frames);
            tracing::debug!(line = line.index, words = line.glyphs.len(), width, "laying out line");

            for (glyph, window) in line.glyphs.iter().zip(windows) {
                let edges = glyph_edges(&glyph.code, layout.points());
                let path = build_path_shape(&edges, rng);
                layers.push_front(Layer::stroke(
                    glyph.label(),
                    window,
                    path,
                    palette.current(),
                    width,
                    options.animated,
                ));

                if with_caption {
                    let caption = layout_centered(
                        glyph.label(),
                        f64::from(self.config.width),
                        self.config.caption_top,
                        window,
                        &self.font,
                        layout.config(),
                    );
                    for layer in caption.into_iter().rev() {
                        layers.push_front(layer);
                    }
                }
            }
            palette.advance();
        }

        layers.push_back(Layer::grid(*layout.points(), total_frames));
        layers.push_back(Layer::background(
            self.config.background.clone(),
            self.config.width,
            self.config.height,
            total_frames,
        ));

        tracing::info!(layers = layers.len(), glyphs = report.glyph_count(), "compiled sticker");

        AnimationDocument {
            version: LOTTIE_VERSION.to_string(),
            name: self.config.name.clone(),
            generator: format!("glyphsticker-core {}", ENGINE_VERSION),
            frame_rate: self.config.frame_rate(),
            total_frames,
            width: self.config.width,
            height: self.config.height,
            layers: layers.into(),
        }
    }

    /// Validate a request once and assemble it, keeping the report for the manifest.
    fn compile_checked(&self, request: &CompileRequest) -> Option<(ValidationReport, AnimationDocument)> {
        // MANDATORY: Validation is always called.
        let report = self.validate(&request.text);
        if !report.valid {
            tracing::info!("no usable glyph found");
            return None;
        }
        let document = match request.seed {
            Some(seed) => self.assemble(&report, &request.options, &mut ChaCha8Rng::seed_from_u64(seed)),
            None => self.assemble(&report, &request.options, &mut rand::rng()),
        };
        Some((report, document))
    }

    /// Compile a request, seeding the jitter when the request carries a seed.
    pub fn compile_request(&self, request: &CompileRequest) -> Option<AnimationDocument> {
        self.compile_checked(request).map(|(_, document)| document)
    }

    /// Compile a request into a sticker payload with its manifest.
    ///
    /// `Ok(None)` means no usable glyph; the caller answers with a text message instead.
    pub fn compile_sticker(&self, request: &CompileRequest) -> Result<Option<CompiledSticker>, PipelineError> {
        let Some((validation, document)) = self.compile_checked(request) else {
            return Ok(None);
        };

        let payload = encode_tgs(&document)?;
        let document_hash = compute_document_hash(&document)?;

        Ok(Some(CompiledSticker {
            id: Uuid::new_v4().to_string(),
            engine_version: ENGINE_VERSION.to_string(),
            created_at: Utc::now(),
            cache_key: compute_sticker_key(&request.text, &request.options, ENGINE_VERSION),
            document_hash,
            media_type: TGS_MEDIA_TYPE.to_string(),
            size_bytes: payload.len(),
            validation,
            data_base64: base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &payload),
        }))
    }
}

impl Default for GlyphCompiler {
    fn default() -> Self {
        Self::new(GlyphTable::builtin(), StickerConfig::default())
    }
}
