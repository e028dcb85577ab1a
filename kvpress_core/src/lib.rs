pub mod codec;
pub mod error;
pub mod policy;
pub mod probe;
pub mod registry;
pub mod store;
pub mod stores;

pub use codec::{Codec, CodecId};
pub use error::{Error, Result};
pub use policy::{CompressionPolicy, StoreConfig, STORE_CONFIG_FILE};
pub use probe::{Capability, CapabilityProbe};
pub use registry::{list_codecs, CodecOption};
pub use store::{CompressedStore, Store};
pub use stores::{FileStore, MemoryStore};
