//! Payload codec for captured session data.
//!
//! Captured bytes are zlib-compressed and then base64-encoded (standard
//! alphabet) so they can be embedded in a single structured log line. The
//! transform round-trips: `decode(encode(b)) == b` for any input, including
//! the empty buffer (an empty input still yields a valid zlib stream).

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error_handling::types::LogError;

/// Compresses `bytes` with zlib and encodes the result as base64 text.
pub fn encode(bytes: &[u8]) -> Result<String, LogError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).map_err(LogError::DeflateError)?;
    let compressed = encoder.finish().map_err(LogError::DeflateError)?;

    Ok(STANDARD.encode(compressed))
}

/// Inverts [`encode`]: base64-decodes `text` and inflates the zlib stream.
///
/// The relay path never decodes; this exists for tests and for consumers of
/// the emitted records.
pub fn decode(text: &str) -> Result<Vec<u8>, LogError> {
    let compressed = STANDARD.decode(text)?;

    let mut decoder = ZlibDecoder::new(compressed.as_slice());
    let mut bytes = Vec::new();
    decoder
        .read_to_end(&mut bytes)
        .map_err(LogError::InflateError)?;

    Ok(bytes)
}
