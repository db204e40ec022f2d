//! Glyph Sticker CLI - Bridge interface for the bot transport
//!
//! Commands: glyphs, validate, compile
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 when no usable glyph was found

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glyphsticker_core::{
    export::{encode_tgs, to_json},
    glyphs::GlyphTable,
    CompileOptions, CompileRequest, GlyphCompiler, StickerConfig,
};

#[derive(Parser)]
#[command(name = "glyphsticker-cli")]
#[command(about = "Glyph Sticker CLI - glyph sequences to animated stickers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Extra glyph dictionary (JSON) merged over the built-in glyphs
    #[arg(short, long)]
    glyphs: Option<PathBuf>,

    /// Sticker config (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List known glyph names
    Glyphs,

    /// Validate input text
    Validate {
        /// Glyph names or node codes; lines separated by \n
        #[arg(short, long)]
        input: String,
    },

    /// Compile input text into a sticker
    Compile {
        /// Glyph names or node codes; lines separated by \n
        #[arg(short, long)]
        input: String,

        /// Draw strokes without animation
        #[arg(long = "static")]
        still: bool,

        /// Omit the caption under single-line stickers
        #[arg(long)]
        no_caption: bool,

        /// Seed for the stroke jitter
        #[arg(long)]
        seed: Option<u64>,

        /// Write the document to this file (.tgs is gzipped, anything else is JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json(value: &serde_json::Value, pretty: bool) {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match text {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!(r#"{{"error": "Failed to serialize output: {}"}}"#, e),
    }
}

fn load_compiler(cli: &Cli) -> Result<GlyphCompiler, String> {
    let glyphs = match &cli.glyphs {
        Some(path) => GlyphTable::load_from_path(path).map_err(|e| format!("Failed to load glyphs: {}", e))?,
        None => GlyphTable::builtin(),
    };
    let config = match &cli.config {
        Some(path) => StickerConfig::load_from_path(path).map_err(|e| format!("Failed to load config: {}", e))?,
        None => StickerConfig::default(),
    };
    Ok(GlyphCompiler::new(glyphs, config))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let compiler = match load_compiler(&cli) {
        Ok(c) => c,
        Err(e) => {
            print_json(&serde_json::json!({ "error": e }), false);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Glyphs => {
            let glyphs: Vec<_> = compiler.glyphs()
                .list()
                .into_iter()
                .map(|(name, code)| serde_json::json!({
                    "name": name,
                    "code": code,
                }))
                .collect();

            print_json(&serde_json::Value::Array(glyphs), true);
            ExitCode::SUCCESS
        }

        Commands::Validate { input } => {
            let report = compiler.validate(&input);
            match serde_json::to_value(&report) {
                Ok(value) => print_json(&value, true),
                Err(e) => {
                    print_json(&serde_json::json!({ "valid": false, "error": e.to_string() }), false);
                    return ExitCode::FAILURE;
                }
            }
            if report.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)  // No usable glyph
            }
        }

        Commands::Compile { input, still, no_caption, seed, output } => {
            let request = CompileRequest {
                text: input,
                options: CompileOptions {
                    animated: !still,
                    show_caption: !no_caption,
                },
                seed,
            };

            if let Some(path) = output {
                return write_document(&compiler, &request, &path);
            }

            match compiler.compile_sticker(&request) {
                Ok(Some(sticker)) => {
                    print_json(&serde_json::json!({ "success": true, "sticker": sticker }), true);
                    ExitCode::SUCCESS
                }
                Ok(None) => {
                    print_json(&serde_json::json!({ "success": false, "error": "No glyphs found" }), false);
                    ExitCode::from(2)
                }
                Err(e) => {
                    print_json(&serde_json::json!({ "success": false, "error": e.to_string() }), false);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn write_document(compiler: &GlyphCompiler, request: &CompileRequest, path: &Path) -> ExitCode {
    let Some(document) = compiler.compile_request(request) else {
        print_json(&serde_json::json!({ "success": false, "error": "No glyphs found" }), false);
        return ExitCode::from(2);
    };

    let gzip = path.extension().is_some_and(|ext| ext == glyphsticker_core::export::TGS_EXTENSION);
    let bytes = if gzip { encode_tgs(&document) } else { to_json(&document) };
    let result = bytes.and_then(|b| fs::write(path, &b).map(|_| b.len()).map_err(Into::into));

    match result {
        Ok(size) => {
            print_json(&serde_json::json!({
                "success": true,
                "path": path.display().to_string(),
                "sizeBytes": size,
            }), false);
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_json(&serde_json::json!({ "success": false, "error": e.to_string() }), false);
            ExitCode::FAILURE
        }
    }
}
