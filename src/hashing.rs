//! Hashing System - SHA-256 for Cache Keys and Documents
//!
//! Sticker cache keys must be stable for identical requests; document hashes
//! let two compilations be compared without diffing the JSON.

use sha2::{Sha256, Digest};
use serde::Serialize;
use serde_json::{Value, to_string};

use crate::pipeline::CompileOptions;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    let sorted = sort_value(&v);
    to_string(&sorted)
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            let sorted_map: serde_json::Map<String, Value> = sorted
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_value(v)))
                .collect();
            Value::Object(sorted_map)
        }
        Value::Array(arr) => {
            Value::Array(arr.iter().map(sort_value).collect())
        }
        _ => v.clone()
    }
}

/// Hash of a compiled document's canonical JSON.
pub fn compute_document_hash<T: Serialize>(document: &T) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(document)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

/// Key prefix used by the sticker cache: static stickers are cached apart.
pub fn cache_prefix(options: &CompileOptions) -> &'static str {
    if options.animated { "" } else { "static:" }
}

/// Sticker cache key
/// key = sha256(prefix + text + caption flag + engine_version)
pub fn compute_sticker_key(text: &str, options: &CompileOptions, engine_version: &str) -> String {
    let combined = format!(
        "{}{}:{}:{}",
        cache_prefix(options),
        text.trim(),
        options.show_caption,
        engine_version
    );
    sha256_hex(combined.as_bytes())
}

// We need hex encoding
mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}
