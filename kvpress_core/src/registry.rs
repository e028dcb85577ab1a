use crate::codec::CodecId;
use crate::probe::{Capability, CapabilityProbe};

/// One row of the codec listing: identifier, display label, and whether the
/// codec is usable in the current environment. Derived at query time, never
/// persisted.
#[derive(Debug, Clone)]
pub struct CodecOption {
    pub id: CodecId,
    pub label: &'static str,
    pub available: bool,
}

/// Enumerate every known codec in stable order with its availability.
///
/// `none` and `gzip` carry no external dependency and are always available.
/// `zstd` is reported from the injected probe. Unavailable codecs stay in the
/// listing with `available: false` so a configuration surface can pre-filter
/// them without probing twice.
pub fn list_codecs(probe: &dyn CapabilityProbe) -> Vec<CodecOption> {
    vec![
        CodecOption {
            id: CodecId::None,
            label: CodecId::None.label(),
            available: true,
        },
        CodecOption {
            id: CodecId::Gzip,
            label: CodecId::Gzip.label(),
            available: true,
        },
        CodecOption {
            id: CodecId::Zstd,
            label: CodecId::Zstd.label(),
            available: probe.has(Capability::Zstd),
        },
    ]
}
