//! Input Validation - Token Rules and Line Reports
//!
//! Rules produce structured violations.
//! A token is usable when it names a known glyph or is a well-formed node code.

use serde::{Deserialize, Serialize};
#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

use crate::glyphs::{GlyphCode, GlyphError, GlyphTable};

#[cfg(feature = "test-hooks")]
static VALIDATION_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn validation_count() -> u32 {
    VALIDATION_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_validation_count() {
    VALIDATION_COUNT.store(0, Ordering::SeqCst);
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenViolation {
    pub token: String,
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub remediation: Vec<String>,
}

/// How a usable token was recognized.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GlyphSource {
    Named,
    Raw,
}

/// A usable token and the code it compiles to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedGlyph {
    pub token: String,
    pub code: GlyphCode,
    pub source: GlyphSource,
}

impl ResolvedGlyph {
    /// Layer name: the glyph name for named glyphs, the code otherwise.
    pub fn label(&self) -> &str {
        match self.source {
            GlyphSource::Named => &self.token,
            GlyphSource::Raw => self.code.as_str(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineReport {
    pub index: usize,
    pub glyphs: Vec<ResolvedGlyph>,
    pub violations: Vec<TokenViolation>,
}

impl LineReport {
    pub fn is_usable(&self) -> bool {
        !self.glyphs.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub lines: Vec<LineReport>,
    pub violations: Vec<TokenViolation>,
}

impl ValidationReport {
    pub fn glyph_count(&self) -> usize {
        self.lines.iter().map(|l| l.glyphs.len()).sum()
    }

    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }
}

/// Token rule - either resolves a token or explains the rejection.
pub trait TokenRule {
    fn name(&self) -> &'static str;
    fn resolve(&self, token: &str, table: &GlyphTable) -> Result<ResolvedGlyph, TokenViolation>;
}

/// Trimmed, non-empty lines.
pub fn split_lines(input: &str) -> Vec<&str> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Tokens separated by whitespace, commas or backspace characters.
pub fn split_tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c.is_whitespace() || c == ',' || c == '\u{8}')
        .filter(|token| !token.is_empty())
}

fn strip_non_ascii(token: &str) -> String {
    token.chars().filter(char::is_ascii).collect()
}

// --- Concrete Rules ---

pub struct NamedGlyphRule;

impl TokenRule for NamedGlyphRule {
    fn name(&self) -> &'static str { "named_glyph" }

    fn resolve(&self, token: &str, table: &GlyphTable) -> Result<ResolvedGlyph, TokenViolation> {
        let name = token.to_lowercase();
        table
            .get(&name)
            .map(|code| ResolvedGlyph {
                token: name.clone(),
                code: code.clone(),
                source: GlyphSource::Named,
            })
            .ok_or_else(|| TokenViolation {
                token: token.to_string(),
                rule: self.name().to_string(),
                severity: ViolationSeverity::Warning,
                message: format!("{:?} is not a known glyph name", name),
                remediation: vec!["Use a glyph name from the dictionary".to_string()],
            })
    }
}

pub struct NodeCodeRule;

impl TokenRule for NodeCodeRule {
    fn name(&self) -> &'static str { "node_code" }

    fn resolve(&self, token: &str, _table: &GlyphTable) -> Result<ResolvedGlyph, TokenViolation> {
        GlyphCode::parse(token)
            .map(|code| ResolvedGlyph {
                token: token.to_string(),
                code,
                source: GlyphSource::Raw,
            })
            .map_err(|e| {
                let remediation = match e {
                    GlyphError::TooShort(_) => "Connect at least two nodes",
                    GlyphError::MalformedCode { .. } => "Use only nodes 0-9 and a",
                    GlyphError::RepeatedNode { .. } => "Do not repeat a node back to back",
                };
                TokenViolation {
                    token: token.to_string(),
                    rule: self.name().to_string(),
                    severity: ViolationSeverity::Warning,
                    message: e.to_string(),
                    remediation: vec![remediation.to_string()],
                }
            })
    }
}

/// Validator tries each rule in order; the first that resolves wins.
pub struct Validator {
    rules: Vec<Box<dyn TokenRule + Send + Sync>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![Box::new(NamedGlyphRule), Box::new(NodeCodeRule)],
        }
    }

    pub fn resolve_token(&self, token: &str, table: &GlyphTable) -> Result<ResolvedGlyph, TokenViolation> {
        let stripped = strip_non_ascii(token);
        if stripped.is_empty() {
            return Err(TokenViolation {
                token: token.to_string(),
                rule: "ascii".to_string(),
                severity: ViolationSeverity::Warning,
                message: "Token has no ASCII characters".to_string(),
                remediation: vec!["Type glyph names or node numbers".to_string()],
            });
        }

        let mut last = None;
        for rule in &self.rules {
            match rule.resolve(&stripped, table) {
                Ok(glyph) => return Ok(glyph),
                Err(violation) => last = Some(violation),
            }
        }
        Err(last.unwrap_or_else(|| TokenViolation {
            token: token.to_string(),
            rule: "none".to_string(),
            severity: ViolationSeverity::Warning,
            message: "No validation rules configured".to_string(),
            remediation: vec![],
        }))
    }

    pub fn validate(&self, input: &str, table: &GlyphTable) -> ValidationReport {
        #[cfg(feature = "test-hooks")]
        VALIDATION_COUNT.fetch_add(1, Ordering::SeqCst);

        let mut all_violations = vec![];
        let lines: Vec<LineReport> = split_lines(input)
            .into_iter()
            .enumerate()
            .map(|(index, line)| {
                let mut report = LineReport {
                    index,
                    glyphs: vec![],
                    violations: vec![],
                };
                for token in split_tokens(line) {
                    match self.resolve_token(token, table) {
                        Ok(glyph) => report.glyphs.push(glyph),
                        Err(violation) => {
                            tracing::debug!(line = index, token, rule = %violation.rule, "rejected token");
                            report.violations.push(violation);
                        }
                    }
                }
                all_violations.extend(report.violations.iter().cloned());
                report
            })
            .collect();

        let valid = lines.iter().any(LineReport::is_usable);
        if !valid {
            all_violations.push(TokenViolation {
                token: input.trim().to_string(),
                rule: "no_usable_glyph".to_string(),
                severity: ViolationSeverity::Error,
                message: "No glyphs found".to_string(),
                remediation: vec![
                    "Provide a glyph name or a node sequence such as 0123".to_string(),
                ],
            });
        }

        ValidationReport {
            valid,
            lines,
            violations: all_violations,
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
