//! Debug helpers for shipping text through size-limited channels.
//!
//! Text is gzip-compressed and then standard-base64 encoded. Failures are
//! logged and reported as `None`; nothing here returns an error.

use std::io::{Read, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tracing::warn;

/// Gzip `text` and encode it as standard base64.
#[must_use]
pub fn compress_text(text: &str) -> Option<String> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    let compressed = encoder
        .write_all(text.as_bytes())
        .and_then(|()| encoder.finish());

    match compressed {
        Ok(bytes) => Some(STANDARD.encode(bytes)),
        Err(e) => {
            warn!(error = %e, "Failed to compress text");
            None
        }
    }
}

/// Reverse [`compress_text`].
///
/// Returns `None` (and logs why) when `data` is not base64, not gzip, or
/// does not decompress to UTF-8.
#[must_use]
pub fn decompress_text(data: &str) -> Option<String> {
    let bytes = match STANDARD.decode(data.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "Compressed text is not valid base64");
            return None;
        }
    };

    let mut text = String::new();
    match GzDecoder::new(bytes.as_slice()).read_to_string(&mut text) {
        Ok(_) => Some(text),
        Err(e) => {
            warn!(error = %e, "Failed to decompress text");
            None
        }
    }
}
