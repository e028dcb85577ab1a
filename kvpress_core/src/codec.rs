use std::fmt;

use crate::error::{Error, Result};

/// Stable identifier for a compression codec.
///
/// The numeric value is what a store's persisted configuration carries, so the
/// discriminants are never renumbered: entries written under id 1 by one
/// process must decode under id 1 in any later process. The configured id is
/// the sole source of truth for the decode path; stored payloads carry no
/// self-describing magic bytes.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecId {
    /// Values are stored verbatim.
    None = 0,
    /// Deflate-family gzip compression, always available.
    Gzip = 1,
    /// Zstandard compression, available only when the host capability is present.
    Zstd = 2,
}

impl CodecId {
    /// The raw value persisted in store configurations.
    pub const fn as_raw(self) -> u16 {
        self as u16
    }

    /// Parse a persisted identifier, rejecting anything outside the enumeration.
    pub fn from_raw(raw: u16) -> Result<Self> {
        match raw {
            0 => Ok(CodecId::None),
            1 => Ok(CodecId::Gzip),
            2 => Ok(CodecId::Zstd),
            other => Err(Error::UnknownCodec(other)),
        }
    }

    /// Short machine-facing name, also the CLI spelling.
    pub const fn name(self) -> &'static str {
        match self {
            CodecId::None => "none",
            CodecId::Gzip => "gzip",
            CodecId::Zstd => "zstd",
        }
    }

    /// Human-readable label for configuration listings.
    pub const fn label(self) -> &'static str {
        match self {
            CodecId::None => "No compression",
            CodecId::Gzip => "Gzip (deflate)",
            CodecId::Zstd => "Zstandard",
        }
    }
}

impl fmt::Display for CodecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Core compression abstraction.
///
/// Each `Codec` implementation:
/// - Is identified by a stable [`CodecId`] carried out-of-band in the store's
///   configuration, never embedded in the payload.
/// - Must uphold `decompress(compress(x)) == x` for every byte sequence `x`,
///   including the empty one. `compress` output itself need not be
///   deterministic (gzip embeds header metadata).
/// - Holds no per-call mutable state, so one instance may be shared across
///   all operations of a store instance.
pub trait Codec: Send + Sync + fmt::Debug {
    /// Stable codec identifier matching the store configuration.
    fn id(&self) -> CodecId;

    /// Human-readable codec name for listings and error context.
    fn name(&self) -> &'static str;

    /// Encode a raw value for persistence.
    ///
    /// Accepts the empty input; compressing codecs may expand it into a small
    /// non-empty header, which must still decode back to zero length.
    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>>;

    /// Decode a previously persisted value.
    ///
    /// Fails with [`Error::Decode`] when `encoded` is not a valid stream for
    /// this codec: corruption, truncation, or bytes written under a
    /// different codec.
    fn decompress(&self, encoded: &[u8]) -> Result<Vec<u8>>;
}
