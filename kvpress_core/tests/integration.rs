//! Codec and pipeline behavior: round-trip laws for every available codec,
//! the absent-value short-circuit, mismatch and corruption detection,
//! availability gating via an injected probe, and end-to-end store scenarios
//! against the file backend.
use std::sync::Arc;

use kvpress_codecs::{resolve, GzipCodec, HostProbe, PassthroughCodec, ZstdCodec};
use kvpress_core::{
    list_codecs, Capability, CapabilityProbe, Codec, CodecId, CompressedStore, CompressionPolicy,
    Error, FileStore, MemoryStore, Result, Store, StoreConfig,
};
use xxhash_rust::xxh3::xxh3_64;

/// Generate `len` deterministic bytes using a simple LCG.
fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = seed;
    (0..len)
        .map(|_| {
            rng = rng
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (rng >> 56) as u8
        })
        .collect()
}

/// Every byte value 0–255, several times over.
fn all_byte_values() -> Vec<u8> {
    (0u16..=255).cycle().take(1024).map(|b| b as u8).collect()
}

/// Probe simulating an environment without any optional capability.
struct NoOptionalCaps;

impl CapabilityProbe for NoOptionalCaps {
    fn has(&self, _capability: Capability) -> bool {
        false
    }
}

/// Codec stub that proves it was never invoked.
#[derive(Debug)]
struct FailingCodec;

impl Codec for FailingCodec {
    fn id(&self) -> CodecId {
        CodecId::None
    }

    fn name(&self) -> &'static str {
        "failing"
    }

    fn compress(&self, _raw: &[u8]) -> Result<Vec<u8>> {
        panic!("compress invoked");
    }

    fn decompress(&self, _encoded: &[u8]) -> Result<Vec<u8>> {
        panic!("decompress invoked");
    }
}

fn available_codecs() -> Vec<Arc<dyn Codec>> {
    list_codecs(&HostProbe)
        .into_iter()
        .filter(|opt| opt.available)
        .map(|opt| resolve(&CompressionPolicy::new(opt.id), &HostProbe).unwrap())
        .collect()
}

// ── Round-trip laws ────────────────────────────────────────────────────────

#[test]
fn roundtrip_all_available_codecs() {
    let inputs: Vec<Vec<u8>> = vec![
        Vec::new(),
        b"hello world".to_vec(),
        all_byte_values(),
        pseudo_random_bytes(1024 * 1024, 0xDEAD_BEEF),
    ];
    for codec in available_codecs() {
        for input in &inputs {
            let encoded = codec.compress(input).unwrap();
            let decoded = codec.decompress(&encoded).unwrap();
            assert_eq!(
                &decoded,
                input,
                "codec '{}' failed to round-trip {} bytes",
                codec.name(),
                input.len()
            );
        }
    }
}

#[test]
fn gzip_empty_input_expands_but_decodes_to_empty() {
    let codec = GzipCodec::default();
    let encoded = codec.compress(b"").unwrap();
    assert!(
        !encoded.is_empty(),
        "gzip wraps even a zero-length input in a stream header"
    );
    assert_eq!(codec.decompress(&encoded).unwrap(), Vec::<u8>::new());
}

#[test]
fn passthrough_is_the_identity() {
    let codec = PassthroughCodec;
    let all = all_byte_values();
    for input in [&b""[..], &b"x"[..], all.as_slice()] {
        assert_eq!(codec.compress(input).unwrap(), input);
        assert_eq!(codec.decompress(input).unwrap(), input);
    }
}

// ── Corruption and mismatch detection ──────────────────────────────────────

#[test]
fn decoding_under_the_wrong_codec_fails() {
    let gzip = GzipCodec::default();
    let zstd = ZstdCodec::default();
    let payload = b"written under one codec, read under another";

    let gzip_bytes = gzip.compress(payload).unwrap();
    let err = zstd.decompress(&gzip_bytes).unwrap_err();
    assert!(matches!(err, Error::Decode { codec: CodecId::Zstd, .. }));

    let zstd_bytes = zstd.compress(payload).unwrap();
    let err = gzip.decompress(&zstd_bytes).unwrap_err();
    assert!(matches!(err, Error::Decode { codec: CodecId::Gzip, .. }));
}

#[test]
fn garbage_and_truncated_streams_fail_to_decode() {
    let gzip = GzipCodec::default();
    let zstd = ZstdCodec::default();

    let garbage = pseudo_random_bytes(64, 0x0BAD_F00D);
    assert!(matches!(
        gzip.decompress(&garbage).unwrap_err(),
        Error::Decode { .. }
    ));
    assert!(matches!(
        zstd.decompress(&garbage).unwrap_err(),
        Error::Decode { .. }
    ));

    let truncated = {
        let mut encoded = gzip.compress(&pseudo_random_bytes(4096, 7)).unwrap();
        encoded.truncate(encoded.len() / 2);
        encoded
    };
    assert!(matches!(
        gzip.decompress(&truncated).unwrap_err(),
        Error::Decode { .. }
    ));
}

// ── Availability gating ────────────────────────────────────────────────────

#[test]
fn registry_reflects_probe_results() {
    let listing = list_codecs(&NoOptionalCaps);
    assert_eq!(listing.len(), 3);
    assert!(listing[0].id == CodecId::None && listing[0].available);
    assert!(listing[1].id == CodecId::Gzip && listing[1].available);
    assert!(listing[2].id == CodecId::Zstd && !listing[2].available);

    let with_host = list_codecs(&HostProbe);
    assert_eq!(
        with_host[2].available,
        HostProbe.has(Capability::Zstd),
        "listing must agree with the probe it was given"
    );
}

#[test]
fn resolving_an_unavailable_codec_is_a_checked_error() {
    let policy = CompressionPolicy::new(CodecId::Zstd);
    let err = resolve(&policy, &NoOptionalCaps).unwrap_err();
    assert!(matches!(err, Error::CodecUnavailable(CodecId::Zstd)));

    // Always-available codecs resolve regardless of the probe.
    assert!(resolve(&CompressionPolicy::new(CodecId::None), &NoOptionalCaps).is_ok());
    assert!(resolve(&CompressionPolicy::new(CodecId::Gzip), &NoOptionalCaps).is_ok());
}

// ── Policy and configuration ───────────────────────────────────────────────

#[test]
fn unknown_compressor_id_is_rejected_at_configuration() {
    assert!(matches!(
        CompressionPolicy::configure(9).unwrap_err(),
        Error::UnknownCodec(9)
    ));
    assert!(matches!(
        CodecId::from_raw(u16::MAX).unwrap_err(),
        Error::UnknownCodec(u16::MAX)
    ));
}

#[test]
fn policy_defaults_to_no_compression_and_persists_by_raw_id() {
    assert_eq!(CompressionPolicy::default().codec_id(), CodecId::None);

    let policy = CompressionPolicy::configure(1).unwrap();
    assert_eq!(policy.codec_id(), CodecId::Gzip);

    let config = StoreConfig::new(policy);
    assert_eq!(config.compressor, 1);
    assert_eq!(config.policy().unwrap(), policy);
}

// ── Pipeline behavior ──────────────────────────────────────────────────────

#[test]
fn absent_keys_short_circuit_without_touching_the_codec() {
    let store = CompressedStore::new(MemoryStore::new(), Arc::new(FailingCodec));

    // Never written: the FailingCodec would panic if decompress ran.
    assert_eq!(store.get("missing").unwrap(), None);
    assert_eq!(store.get("also-missing").unwrap(), None);
}

#[test]
fn deleted_keys_are_absent_not_decode_errors() {
    let backend = MemoryStore::new();
    backend.set("k", b"raw bytes").unwrap();
    backend.delete("k").unwrap();

    // A lingering entry would reach the failing codec and panic; a clean
    // delete short-circuits before the codec.
    let store = CompressedStore::new(backend, Arc::new(FailingCodec));
    assert_eq!(store.get("k").unwrap(), None);
}

#[test]
fn empty_value_is_a_value_not_a_miss() {
    for codec in available_codecs() {
        let name = codec.name();
        let store = CompressedStore::new(MemoryStore::new(), codec);
        store.set("empty", b"").unwrap();
        assert_eq!(
            store.get("empty").unwrap(),
            Some(Vec::new()),
            "codec '{}' must round-trip the empty value",
            name
        );
    }
}

#[test]
fn large_payload_roundtrips_through_every_available_codec() {
    let payload = pseudo_random_bytes(1024 * 1024, 0x1234_5678);
    for codec in available_codecs() {
        let name = codec.name();
        let store = CompressedStore::new(MemoryStore::new(), codec);
        store.set("blob", &payload).unwrap();
        assert_eq!(
            store.get("blob").unwrap().as_deref(),
            Some(payload.as_slice()),
            "codec '{}' corrupted a 1 MB payload",
            name
        );
    }
}

#[test]
fn corrupt_stored_bytes_surface_as_a_read_error_not_a_miss() {
    let backend = MemoryStore::new();
    backend.set("k", &pseudo_random_bytes(128, 42)).unwrap();

    let store = CompressedStore::new(backend, Arc::new(GzipCodec::default()));
    let err = store.get("k").unwrap_err();
    assert!(matches!(err, Error::Decode { codec: CodecId::Gzip, .. }));
}

// ── File-backed end-to-end scenarios ───────────────────────────────────────

#[test]
fn end_to_end_gzip_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let codec = resolve(&CompressionPolicy::new(CodecId::Gzip), &HostProbe).unwrap();
    let store = CompressedStore::new(FileStore::open(dir.path()).unwrap(), codec);

    store.set("k", b"hello world").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some(&b"hello world"[..]));

    store.delete("k").unwrap();
    assert_eq!(store.get("k").unwrap(), None);

    store.set("k", b"hello again").unwrap();
    store.purge().unwrap();
    assert_eq!(store.get("k").unwrap(), None);
}

#[test]
fn entries_survive_a_store_reopen_under_the_same_codec() {
    let dir = tempfile::tempdir().unwrap();
    let payload = pseudo_random_bytes(64 * 1024, 0xFEED);

    {
        let store = CompressedStore::new(
            FileStore::open(dir.path()).unwrap(),
            Arc::new(GzipCodec::default()),
        );
        store.set("persisted", &payload).unwrap();
    }

    // A fresh process would do exactly this: reopen the directory and decode
    // with the codec named by the persisted configuration.
    let reopened = CompressedStore::new(
        FileStore::open(dir.path()).unwrap(),
        Arc::new(GzipCodec::default()),
    );
    assert_eq!(
        reopened.get("persisted").unwrap().as_deref(),
        Some(payload.as_slice())
    );
}

#[test]
fn foreign_entry_file_is_a_logged_miss_not_wrong_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();

    // Plant a file exactly where the entry for "victim" would live, but with
    // bytes that do not frame that key.
    let bogus = dir
        .path()
        .join(format!("{:016x}.bin", xxh3_64(b"victim")));
    std::fs::write(&bogus, b"\xff\xff\xff\xff not an entry").unwrap();

    assert_eq!(store.get("victim").unwrap(), None);
}

#[test]
fn file_store_accepts_awkward_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();

    for key in ["a/b/c", "spaces and tabs\t", "ünïcode-ключ", ""] {
        store.set(key, key.as_bytes()).unwrap();
        assert_eq!(store.get(key).unwrap().as_deref(), Some(key.as_bytes()));
    }
}
