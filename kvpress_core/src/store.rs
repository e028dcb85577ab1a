use std::sync::Arc;

use crate::codec::Codec;
use crate::error::Result;

/// Physical key-value store interface.
///
/// Implementations own durability and concurrency control; the value
/// pipeline layers strictly above them and treats the stored bytes as
/// opaque. `get` distinguishes an absent entry (`None`) from every valid
/// value, including the empty one (`Some(vec![])`).
pub trait Store: Send + Sync {
    /// Persist `value` under `key`, replacing any previous entry.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Fetch the bytes stored under `key`, or `None` if no entry exists.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Remove the entry under `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;

    /// Remove every entry in the store.
    fn purge(&self) -> Result<()>;
}

/// Value pipeline: a physical store composed with a resolved codec.
///
/// Every write runs compress-then-persist, every read runs
/// retrieve-then-decompress. The codec is resolved once from the store's
/// compression policy and shared read-only across operations; the pipeline
/// itself holds no locks and performs no I/O beyond the byte transformation.
///
/// `CompressedStore` implements [`Store`] itself, so it can wrap any backend
/// and be used wherever a plain store is expected.
pub struct CompressedStore<S: Store> {
    inner: S,
    codec: Arc<dyn Codec>,
}

impl<S: Store> CompressedStore<S> {
    pub fn new(inner: S, codec: Arc<dyn Codec>) -> Self {
        Self { inner, codec }
    }

    /// The codec this store encodes and decodes values with.
    pub fn codec(&self) -> &dyn Codec {
        self.codec.as_ref()
    }
}

impl<S: Store> Store for CompressedStore<S> {
    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let encoded = self.codec.compress(value)?;
        // Underlying write failures propagate unchanged; no retry here.
        self.inner.set(key, &encoded)
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.inner.get(key)? {
            // Absent entries short-circuit before the codec is touched.
            None => Ok(None),
            // A decode failure is a read error, never a miss and never a
            // fallback to the raw stored bytes.
            Some(encoded) => Ok(Some(self.codec.decompress(&encoded)?)),
        }
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.inner.delete(key)
    }

    fn purge(&self) -> Result<()> {
        self.inner.purge()
    }
}
