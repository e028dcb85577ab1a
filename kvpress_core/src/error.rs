use thiserror::Error;

use crate::codec::CodecId;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by stores and codecs.
///
/// Nothing is recovered locally: every failure propagates to the immediate
/// caller of the store operation that triggered it. In particular a decode
/// failure is never reported as a cache miss, and an unavailable codec is
/// never swapped for another one.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration named a compressor id outside the known enumeration.
    #[error("unknown compressor id {0}")]
    UnknownCodec(u16),

    /// The configured codec's runtime capability is absent in this environment.
    #[error("codec '{0}' is not available in this environment")]
    CodecUnavailable(CodecId),

    /// Bytes handed to `decompress` are not a valid stream for the configured
    /// codec: corrupt, truncated, or written under a different codec.
    #[error("'{codec}' stream did not decode")]
    Decode {
        codec: CodecId,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure from the physical store or a codec's encoder.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
