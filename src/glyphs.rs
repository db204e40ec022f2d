//! Glyph Codes and the Named-Glyph Dictionary

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::geometry::node_index;
use crate::pipeline::PipelineError;
use crate::ENGINE_VERSION;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlyphError {
    #[error("Glyph code too short: {0:?} (needs at least two nodes)")]
    TooShort(String),

    #[error("Malformed glyph code {code:?}: {ch:?} is not a calibration node")]
    MalformedCode { code: String, ch: char },

    #[error("Glyph code {code:?} repeats a node at position {position}")]
    RepeatedNode { code: String, position: usize },
}

/// A normalized node sequence: `0-9a`, length >= 2, no node repeated back to back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GlyphCode(String);

impl GlyphCode {
    pub fn parse(raw: &str) -> Result<Self, GlyphError> {
        let code = raw.to_ascii_lowercase();
        let mut previous = None;
        for (position, ch) in code.chars().enumerate() {
            if node_index(ch).is_none() {
                return Err(GlyphError::MalformedCode { code, ch });
            }
            if previous == Some(ch) {
                return Err(GlyphError::RepeatedNode { code, position });
            }
            previous = Some(ch);
        }
        if code.len() < 2 {
            return Err(GlyphError::TooShort(code));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Node indices in drawing order.
    pub fn nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.chars().filter_map(node_index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for GlyphCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for GlyphCode {
    type Error = GlyphError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<GlyphCode> for String {
    fn from(code: GlyphCode) -> Self {
        code.0
    }
}

/// Built-in dictionary of named glyphs.
pub const BUILTIN_GLYPHS: &[(&str, &str)] = &[
    ("abandon", "5a8732"),
    ("adapt", "a76"),
    ("advance", "580"),
    ("again", "9a87a6"),
    ("all", "0123450"),
    ("answer", "9a67"),
    ("attack", "598a71"),
    ("avoid", "5967a1"),
    ("balance", "0a3"),
    ("barrier", "0a72"),
    ("before", "069a"),
    ("begin", "0a97"),
    ("body", "69a6"),
    ("breathe", "59a61"),
    ("capture", "1698a72"),
    ("change", "9a62"),
    ("chaos", "05987a612"),
    ("clear", "0a3"),
    ("complex", "9a8"),
    ("conflict", "5976a2"),
    ("courage", "59a7"),
    ("create", "498a67"),
    ("danger", "0967"),
    ("defend", "0678"),
    ("destroy", "59a72"),
    ("die", "4a72"),
    ("discover", "5094"),
    ("easy", "8a61"),
    ("end", "6a9"),
    ("equal", "9687"),
    ("escape", "59a61"),
    ("fear", "9a6"),
    ("follow", "4961"),
    ("future", "6712"),
    ("gain", "9a7"),
    ("harmony", "49a72"),
    ("help", "59a721"),
    ("hide", "986"),
    ("human", "6a98"),
    ("idea", "597a8"),
    ("journey", "594a72"),
    ("knowledge", "3a798"),
    ("lead", "40"),
    ("less", "986"),
    ("liberate", "4a61"),
    ("lose", "278"),
    ("mind", "8a976"),
    ("more", "8a7"),
    ("nature", "49a76"),
    ("new", "672"),
    ("open", "8a7"),
    ("past", "5984"),
    ("path", "40a3"),
    ("peace", "89a67"),
    ("portal", "05987612"),
    ("pure", "0a8"),
    ("question", "0a3a7"),
    ("recharge", "0a671"),
    ("resist", "59a87"),
    ("save", "8a76"),
    ("search", "5a97"),
    ("see", "1a"),
    ("self", "4a6"),
    ("simple", "87"),
    ("soul", "59a7"),
    ("strong", "9867"),
    ("struggle", "598a"),
    ("together", "5967a"),
    ("truth", "049"),
    ("victory", "59a61"),
    ("want", "2a87"),
    ("we", "5a1"),
    ("xm", "96798"),
    ("you", "6a31"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphDictionary {
    pub version: String,
    #[serde(default = "default_min_version")]
    pub engine_min_version: String,
    pub glyphs: HashMap<String, String>,
}

fn default_min_version() -> String {
    crate::MIN_DICTIONARY_VERSION.to_string()
}

/// Named-glyph lookup table (lowercase name -> code).
#[derive(Debug, Clone)]
pub struct GlyphTable {
    glyphs: HashMap<String, GlyphCode>,
}

impl GlyphTable {
    pub fn new() -> Self {
        Self { glyphs: HashMap::new() }
    }

    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (name, code) in BUILTIN_GLYPHS {
            match GlyphCode::parse(code) {
                Ok(code) => table.register(name, code),
                Err(e) => tracing::warn!(glyph = name, error = %e, "skipping built-in glyph"),
            }
        }
        table
    }

    /// Load a JSON dictionary on top of the built-in glyphs.
    pub fn load_from_path(path: &Path) -> Result<Self, PipelineError> {
        if !path.exists() {
            return Err(PipelineError::DictionaryNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        let dictionary: GlyphDictionary = serde_json::from_str(&content)
            .map_err(|e| PipelineError::DictionaryInvalid(format!("{}: {}", path.display(), e)))?;
        let mut table = Self::builtin();
        table.merge(dictionary)?;
        Ok(table)
    }

    /// Merge a dictionary. Any malformed code rejects the whole dictionary.
    pub fn merge(&mut self, dictionary: GlyphDictionary) -> Result<usize, PipelineError> {
        check_engine_version(&dictionary)?;

        let mut parsed = Vec::with_capacity(dictionary.glyphs.len());
        for (name, code) in &dictionary.glyphs {
            let name = name.trim().to_lowercase();
            if name.is_empty() || name.contains(|c: char| c.is_whitespace() || c == ',') {
                return Err(PipelineError::DictionaryInvalid(format!(
                    "glyph name {:?} cannot be a single token",
                    name
                )));
            }
            parsed.push((name, GlyphCode::parse(code)?));
        }

        let count = parsed.len();
        for (name, code) in parsed {
            self.glyphs.insert(name, code);
        }
        tracing::debug!(count, version = %dictionary.version, "merged glyph dictionary");
        Ok(count)
    }

    pub fn get(&self, name: &str) -> Option<&GlyphCode> {
        self.glyphs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.glyphs.contains_key(name)
    }

    pub fn register(&mut self, name: &str, code: GlyphCode) {
        self.glyphs.insert(name.to_lowercase(), code);
    }

    /// All entries sorted by name.
    pub fn list(&self) -> Vec<(&str, &GlyphCode)> {
        let mut entries: Vec<_> = self.glyphs.iter().map(|(k, v)| (k.as_str(), v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl Default for GlyphTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn check_engine_version(dictionary: &GlyphDictionary) -> Result<(), PipelineError> {
    let engine_ver = semver::Version::parse(ENGINE_VERSION)
        .map_err(|_| PipelineError::DictionaryInvalid("Invalid engine version".into()))?;
    let min_ver = semver::Version::parse(&dictionary.engine_min_version)
        .map_err(|_| PipelineError::DictionaryInvalid("Invalid dictionary min version".into()))?;

    if engine_ver < min_ver {
        return Err(PipelineError::EngineVersionMismatch(
            dictionary.version.clone(),
            dictionary.engine_min_version.clone(),
            ENGINE_VERSION.to_string(),
        ));
    }
    Ok(())
}
