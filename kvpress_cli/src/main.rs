use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use kvpress_codecs::{resolve, HostProbe};
use kvpress_core::{
    list_codecs, Codec, CodecId, CompressedStore, CompressionPolicy, FileStore, Store,
    StoreConfig, STORE_CONFIG_FILE,
};

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "kvpress",
    about = "File-backed key-value cache store with per-store value compression",
    version
)]
struct Cli {
    /// Store directory
    #[arg(short, long, default_value = "kvpress_store")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a store directory and persist its compressor configuration
    Init {
        /// Compressor for every value written to this store: none | gzip | zstd
        #[arg(short, long, default_value = "none")]
        compressor: String,
    },
    /// Store a value under a key
    Set {
        key: String,
        /// Value as a literal argument; omit to read from --file or stdin
        value: Option<String>,
        /// Read the value from a file instead
        #[arg(short, long, conflicts_with = "value")]
        file: Option<PathBuf>,
    },
    /// Fetch the value stored under a key
    Get {
        key: String,
        /// Write raw bytes to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Remove the entry under a key
    Delete { key: String },
    /// Remove every entry in the store (configuration survives)
    Purge,
    /// List known codecs with their availability in this environment
    Codecs,
    /// Measure ratio and throughput for each available codec
    Bench {
        /// Payload size in bytes
        #[arg(short, long, default_value_t = 4 * 1024 * 1024)]
        size: usize,
    },
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn compressor_from_name(name: &str) -> anyhow::Result<CodecId> {
    match name {
        "none" | "raw" => Ok(CodecId::None),
        "gzip" | "gz" => Ok(CodecId::Gzip),
        "zstd" | "z" => Ok(CodecId::Zstd),
        other => bail!(
            "unknown compressor '{}'. Valid options: none, gzip, zstd",
            other
        ),
    }
}

fn config_path(dir: &Path) -> PathBuf {
    dir.join(STORE_CONFIG_FILE)
}

fn load_config(dir: &Path) -> anyhow::Result<StoreConfig> {
    let path = config_path(dir);
    let data = fs::read(&path)
        .with_context(|| format!("reading store config {:?} (run `init` first?)", path))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing store config {:?}", path))
}

/// Open the store with the codec its persisted configuration names.
///
/// An unknown persisted id or an unavailable codec is a hard error here:
/// entries on disk were written under that codec, and writing or reading
/// through any other would corrupt the round trip.
fn open_store(dir: &Path) -> anyhow::Result<CompressedStore<FileStore>> {
    let config = load_config(dir)?;
    let policy = config.policy()?;
    let codec = resolve(&policy, &HostProbe)?;
    Ok(CompressedStore::new(FileStore::open(dir)?, codec))
}

fn human_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut v = n as f64;
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{:.2} {}", v, UNITS[unit])
    }
}

// ── Subcommand implementations ─────────────────────────────────────────────

fn run_init(dir: &Path, compressor: &str) -> anyhow::Result<()> {
    let codec = compressor_from_name(compressor)?;
    let path = config_path(dir);
    if path.exists() {
        bail!("store at {:?} is already initialised", dir);
    }

    // Configuration time does not require the capability to be present yet,
    // but an early heads-up beats a failing first `set`.
    let listing = list_codecs(&HostProbe);
    if let Some(opt) = listing.iter().find(|o| o.id == codec) {
        if !opt.available {
            log::warn!(
                "compressor '{}' is not available in this environment; \
                 set/get will fail until it is",
                codec
            );
        }
    }

    fs::create_dir_all(dir).with_context(|| format!("creating store directory {:?}", dir))?;
    let config = StoreConfig::new(CompressionPolicy::new(codec));
    fs::write(&path, serde_json::to_vec_pretty(&config)?)
        .with_context(|| format!("writing store config {:?}", path))?;

    println!("initialised {:?} with compressor '{}'", dir, codec);
    Ok(())
}

fn run_set(
    dir: &Path,
    key: &str,
    value: Option<String>,
    file: Option<PathBuf>,
) -> anyhow::Result<()> {
    // clap rejects a literal value combined with --file.
    let raw: Vec<u8> = if let Some(v) = value {
        v.into_bytes()
    } else if let Some(path) = file {
        fs::read(&path).with_context(|| format!("reading value file {:?}", path))?
    } else {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        buf
    };

    let store = open_store(dir)?;
    store.set(key, &raw)?;
    println!(
        "stored {} under '{}' ({})",
        human_bytes(raw.len() as u64),
        key,
        store.codec().name()
    );
    Ok(())
}

fn run_get(dir: &Path, key: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    let store = open_store(dir)?;
    let raw = match store.get(key)? {
        Some(raw) => raw,
        None => bail!("no entry for key '{}'", key),
    };

    match output {
        Some(path) => {
            fs::write(&path, &raw).with_context(|| format!("writing value to {:?}", path))?;
            eprintln!("wrote {} to {:?}", human_bytes(raw.len() as u64), path);
        }
        None => {
            io::stdout().lock().write_all(&raw)?;
        }
    }
    Ok(())
}

fn run_delete(dir: &Path, key: &str) -> anyhow::Result<()> {
    let store = open_store(dir)?;
    store.delete(key)?;
    println!("deleted '{}'", key);
    Ok(())
}

fn run_purge(dir: &Path) -> anyhow::Result<()> {
    let store = open_store(dir)?;
    store.purge()?;
    println!("purged store at {:?}", dir);
    Ok(())
}

fn run_codecs(dir: &Path) -> anyhow::Result<()> {
    println!("  {:>3}  {:<6}  {:<16}  {}", "id", "name", "label", "available");
    println!("  {}", "-".repeat(44));
    for opt in list_codecs(&HostProbe) {
        println!(
            "  {:>3}  {:<6}  {:<16}  {}",
            opt.id.as_raw(),
            opt.id.name(),
            opt.label,
            if opt.available { "yes" } else { "no" }
        );
    }

    // Listing layer only: a legacy or foreign configuration is reported, not
    // fatal; the hot get/set path still fails hard on it.
    if config_path(dir).exists() {
        let config = load_config(dir)?;
        match config.policy() {
            Ok(policy) => println!("\nstore {:?} is configured with '{}'", dir, policy.codec_id()),
            Err(e) => {
                log::warn!("store {:?} carries an invalid compressor: {}", dir, e);
                println!("\nstore {:?} is configured with unknown id {}", dir, config.compressor);
            }
        }
    }
    Ok(())
}

fn run_bench(size: usize) -> anyhow::Result<()> {
    // Compressible text and incompressible pseudo-random bytes bracket the
    // realistic range of cache payloads.
    let pattern = b"the quick brown fox jumps over the lazy dog. ";
    let text: Vec<u8> = (0..size).map(|i| pattern[i % pattern.len()]).collect();
    let random: Vec<u8> = {
        let mut rng: u64 = 0x5EED_CAFE;
        (0..size)
            .map(|_| {
                rng = rng
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                (rng >> 56) as u8
            })
            .collect()
    };

    for (label, data) in [("compressible text", &text), ("pseudo-random", &random)] {
        println!("=== {} ({}) ===", label, human_bytes(data.len() as u64));
        println!(
            "  {:<6}  {:>10}  {:>7}  {:>12}  {:>12}",
            "codec", "encoded", "ratio", "compress", "decompress"
        );
        for opt in list_codecs(&HostProbe).into_iter().filter(|o| o.available) {
            let codec = resolve(&CompressionPolicy::new(opt.id), &HostProbe)?;

            let t0 = Instant::now();
            let encoded = codec.compress(data)?;
            let c_elapsed = t0.elapsed();

            let t1 = Instant::now();
            let decoded = codec.decompress(&encoded)?;
            let d_elapsed = t1.elapsed();

            if decoded != *data {
                bail!("codec '{}' failed to round-trip the benchmark payload", opt.id);
            }

            println!(
                "  {:<6}  {:>10}  {:>6.2}x  {:>10}/s  {:>10}/s",
                opt.id.name(),
                human_bytes(encoded.len() as u64),
                data.len() as f64 / encoded.len() as f64,
                human_bytes((data.len() as f64 / c_elapsed.as_secs_f64()) as u64),
                human_bytes((data.len() as f64 / d_elapsed.as_secs_f64()) as u64),
            );
        }
        println!();
    }
    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Init { compressor } => run_init(&cli.dir, &compressor),
        Commands::Set { key, value, file } => run_set(&cli.dir, &key, value, file),
        Commands::Get { key, output } => run_get(&cli.dir, &key, output),
        Commands::Delete { key } => run_delete(&cli.dir, &key),
        Commands::Purge => run_purge(&cli.dir),
        Commands::Codecs => run_codecs(&cli.dir),
        Commands::Bench { size } => run_bench(size),
    }
}
