//! Projection counting (requires `--features test-hooks`).
//!
//! Kept in its own test binary so no other test touches the counter.

#![cfg(feature = "test-hooks")]

use glyphsticker_core::{
    geometry::{projection_count, reset_projection_count},
    CompileOptions, GlyphCompiler,
};

#[test]
fn invariant_one_projection_per_compile() {
    let compiler = GlyphCompiler::default();

    reset_projection_count();
    let doc = compiler.compile("01 23\n45\nharmony", &CompileOptions::default());
    assert!(doc.is_some());
    assert_eq!(projection_count(), 1);

    reset_projection_count();
    assert!(compiler.compile("zz", &CompileOptions::default()).is_none());
    assert_eq!(projection_count(), 0);
}
