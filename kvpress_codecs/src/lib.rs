mod gzip;
mod passthrough;
#[cfg(feature = "zstd")]
mod zstd_codec;

pub use gzip::GzipCodec;
pub use passthrough::PassthroughCodec;
#[cfg(feature = "zstd")]
pub use zstd_codec::ZstdCodec;

use std::sync::Arc;

use kvpress_core::{Capability, CapabilityProbe, Codec, CodecId, CompressionPolicy, Error};

/// Probe answering from the compiled feature set of this crate.
///
/// Zstandard support is a build-time property here, so the probe is a pure
/// constant lookup, cheap enough to run once per configuration-form render
/// and once per store construction.
pub struct HostProbe;

impl CapabilityProbe for HostProbe {
    fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Zstd => cfg!(feature = "zstd"),
        }
    }
}

/// Resolve a policy's configured codec into a concrete instance.
///
/// This is the single variant-dispatch point; every call site above treats
/// the result as a uniform `Arc<dyn Codec>`. Resolving a codec whose
/// capability the probe reports absent fails with
/// [`Error::CodecUnavailable`]; it is never substituted with another codec,
/// since entries already persisted under the configured codec would become
/// unreadable (and raw entries would decode as garbage).
pub fn resolve(
    policy: &CompressionPolicy,
    probe: &dyn CapabilityProbe,
) -> kvpress_core::Result<Arc<dyn Codec>> {
    match policy.codec_id() {
        CodecId::None => Ok(Arc::new(PassthroughCodec)),
        CodecId::Gzip => Ok(Arc::new(GzipCodec::default())),
        CodecId::Zstd if !probe.has(Capability::Zstd) => {
            Err(Error::CodecUnavailable(CodecId::Zstd))
        }
        #[cfg(feature = "zstd")]
        CodecId::Zstd => Ok(Arc::new(ZstdCodec::default())),
        // A probe may claim the capability even when this build lacks it.
        #[cfg(not(feature = "zstd"))]
        CodecId::Zstd => Err(Error::CodecUnavailable(CodecId::Zstd)),
    }
}
