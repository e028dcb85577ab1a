use kvpress_core::{Codec, CodecId, Result};

/// No-op codec: stores values verbatim, with no compression.
///
/// The default for every store, and the right choice for values that are
/// already compressed (images, archives) where another pass would only
/// expand them.
#[derive(Debug)]
pub struct PassthroughCodec;

impl Codec for PassthroughCodec {
    fn id(&self) -> CodecId {
        CodecId::None
    }

    fn name(&self) -> &'static str {
        "none"
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>> {
        Ok(raw.to_vec())
    }

    fn decompress(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        Ok(encoded.to_vec())
    }
}
