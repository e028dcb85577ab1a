use kvpress_core::{Codec, CodecId, Error, Result};

/// Zstandard codec, the optional high-ratio compressor.
///
/// Compiled only with the `zstd` feature; the registry reports availability
/// through the capability probe, and resolution fails with
/// `CodecUnavailable` when the capability is absent.
///
/// Best for: large cacheable values where ratio matters more than portability.
#[derive(Debug)]
pub struct ZstdCodec {
    /// Compression level (1 = fast / larger, 22 = slow / smallest).
    pub level: i32,
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self { level: 3 }
    }
}

impl ZstdCodec {
    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

impl Codec for ZstdCodec {
    fn id(&self) -> CodecId {
        CodecId::Zstd
    }

    fn name(&self) -> &'static str {
        "zstd"
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>> {
        Ok(zstd::bulk::compress(raw, self.level)?)
    }

    fn decompress(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        // The zstd frame carries its own content size, so decoding does not
        // need the original length as a hint.
        zstd::decode_all(encoded).map_err(|source| Error::Decode {
            codec: CodecId::Zstd,
            source,
        })
    }
}
