use serde::{Deserialize, Serialize};

use crate::codec::CodecId;
use crate::error::Result;

/// File name of the persisted store configuration inside a store directory.
pub const STORE_CONFIG_FILE: &str = "store.json";

const CONFIG_VERSION: u32 = 1;

/// Per-store-instance compression configuration.
///
/// Holds the selected codec identifier, immutable for the lifetime of the
/// store instance. Reconfiguring a store under a different codec implicitly
/// invalidates previously written entries; cross-codec reads are not
/// supported and surface as decode errors.
///
/// Configuration does not consult the live capability probe: a policy may
/// name a codec whose runtime capability has not been confirmed yet.
/// Unavailability surfaces on first actual use, at codec resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionPolicy {
    codec: CodecId,
}

impl CompressionPolicy {
    pub fn new(codec: CodecId) -> Self {
        Self { codec }
    }

    /// Validate a raw persisted identifier into a policy.
    ///
    /// Values outside the known enumeration fail with
    /// [`crate::Error::UnknownCodec`]. There is no silent default.
    pub fn configure(raw: u16) -> Result<Self> {
        Ok(Self {
            codec: CodecId::from_raw(raw)?,
        })
    }

    pub fn codec_id(&self) -> CodecId {
        self.codec
    }
}

impl Default for CompressionPolicy {
    fn default() -> Self {
        Self {
            codec: CodecId::None,
        }
    }
}

/// Persisted shape of a store's configuration.
///
/// Written next to the entry files at store creation and read back on every
/// open, so a later process decodes entries with the codec they were written
/// under. The compressor is stored as its raw id; [`StoreConfig::policy`]
/// re-validates it on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub version: u32,
    pub compressor: u16,
}

impl StoreConfig {
    pub fn new(policy: CompressionPolicy) -> Self {
        Self {
            version: CONFIG_VERSION,
            compressor: policy.codec_id().as_raw(),
        }
    }

    pub fn policy(&self) -> Result<CompressionPolicy> {
        CompressionPolicy::configure(self.compressor)
    }
}
