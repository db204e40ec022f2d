//! Sticker Payload - gzip-compressed Lottie JSON (`.tgs`)

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

use crate::document::AnimationDocument;
use crate::lottie;
use crate::pipeline::PipelineError;

pub const TGS_MEDIA_TYPE: &str = "application/x-tgsticker";
pub const TGS_EXTENSION: &str = "tgs";

/// Compact JSON of the document.
pub fn to_json(document: &AnimationDocument) -> Result<Vec<u8>, PipelineError> {
    Ok(serde_json::to_vec(document)?)
}

/// Serialize and gzip a document into a sticker payload.
pub fn encode_tgs(document: &AnimationDocument) -> Result<Vec<u8>, PipelineError> {
    let json = to_json(document)?;
    let mut encoder = GzEncoder::new(Vec::with_capacity(json.len() / 4), Compression::best());
    encoder.write_all(&json)?;
    Ok(encoder.finish()?)
}

/// Inflate and parse a sticker payload.
pub fn decode_tgs(payload: &[u8]) -> Result<lottie::Animation, PipelineError> {
    let mut json = Vec::new();
    GzDecoder::new(payload).read_to_end(&mut json)?;
    Ok(serde_json::from_slice(&json)?)
}
