use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use xxhash_rust::xxh3::xxh3_64;

use crate::error::Result;
use crate::store::Store;

/// File-backed store: one file per entry under a single directory.
///
/// The file name is the xxh3-64 hash of the key in hex, so arbitrary keys
/// (slashes, spaces, anything filesystem-hostile) map to safe names.
/// Because the hash is not injective, each file opens with a key frame:
///
/// ```text
/// [key_len: u32 LE][key bytes][payload]
/// ```
///
/// A hash collision or a foreign file therefore surfaces as a key mismatch
/// and is treated as a miss (a dropped entry, which a cache may do), never
/// as wrong payload bytes.
///
/// Writes go to a `.tmp` sibling first and are renamed into place, so a
/// concurrent reader never observes a partially written entry.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) the store directory at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{:016x}.bin", xxh3_64(key.as_bytes())))
    }

    /// Split an entry file into its key frame and payload.
    ///
    /// Returns `None` for files that are too short or frame a different key.
    fn unframe<'a>(data: &'a [u8], key: &str) -> Option<&'a [u8]> {
        if data.len() < 4 {
            return None;
        }
        let key_len = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
        let payload_start = 4usize.checked_add(key_len)?;
        if data.len() < payload_start {
            return None;
        }
        if &data[4..payload_start] != key.as_bytes() {
            return None;
        }
        Some(&data[payload_start..])
    }
}

impl Store for FileStore {
    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.entry_path(key);
        let tmp = path.with_extension("bin.tmp");

        let mut framed = Vec::with_capacity(4 + key.len() + value.len());
        framed.extend_from_slice(&(key.len() as u32).to_le_bytes());
        framed.extend_from_slice(key.as_bytes());
        framed.extend_from_slice(value);

        fs::write(&tmp, &framed)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.entry_path(key);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match Self::unframe(&data, key) {
            Some(payload) => Ok(Some(payload.to_vec())),
            None => {
                log::warn!(
                    "entry file {:?} does not frame key {:?}; treating as a miss",
                    path,
                    key
                );
                Ok(None)
            }
        }
    }

    fn delete(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn purge(&self) -> Result<()> {
        let mut removed = 0usize;
        for dirent in fs::read_dir(&self.dir)? {
            let path = dirent?.path();
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };
            // Entry files and any leftover tmp files; the store config and
            // anything else in the directory survive a purge.
            if name.ends_with(".bin") || name.ends_with(".bin.tmp") {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        log::debug!("purged {} entries from {:?}", removed, self.dir);
        Ok(())
    }
}
