use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use kvpress_core::{Codec, CodecId, Error, Result};

/// Gzip codec, the always-available deflate-family compressor.
///
/// Callers see a whole-buffer interface; the encoder and decoder stream
/// internally, so input size is bounded only by memory. A gzip stream embeds
/// header metadata, so `compress` output is not deterministic; only the
/// round trip is.
///
/// Best for: portable default compression with no optional dependency.
#[derive(Debug)]
pub struct GzipCodec {
    /// Compression level (0 = none, 9 = smallest; default 6).
    pub level: u32,
}

impl Default for GzipCodec {
    fn default() -> Self {
        Self { level: 6 }
    }
}

impl GzipCodec {
    pub fn new(level: u32) -> Self {
        Self { level }
    }
}

impl Codec for GzipCodec {
    fn id(&self) -> CodecId {
        CodecId::Gzip
    }

    fn name(&self) -> &'static str {
        "gzip"
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(
            Vec::with_capacity(raw.len() / 2 + 32),
            Compression::new(self.level),
        );
        encoder.write_all(raw)?;
        Ok(encoder.finish()?)
    }

    fn decompress(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = GzDecoder::new(encoded);
        let mut raw = Vec::new();
        decoder
            .read_to_end(&mut raw)
            .map_err(|source| Error::Decode {
                codec: CodecId::Gzip,
                source,
            })?;
        Ok(raw)
    }
}
