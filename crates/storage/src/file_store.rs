//! JSON-file-backed key-value store for desktop hosts.
//!
//! All records live in one small JSON document that is rewritten on every
//! change, so each put or delete is durable once it returns.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::kv::{Key, KeyValueStore};

const FILE_VERSION: u32 = 1;

#[derive(Debug, Default, Deserialize)]
struct StoreFile {
    version: u32,
    #[serde(default)]
    records: BTreeMap<Key, Vec<u8>>,
}

/// Write-side view of [`StoreFile`]
#[derive(Serialize)]
struct StoreFileRef<'a> {
    version: u32,
    records: &'a BTreeMap<Key, Vec<u8>>,
}

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: BTreeMap<Key, Vec<u8>>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(contents) => {
                let file = serde_json::from_str::<StoreFile>(&contents)?;
                if file.version != FILE_VERSION {
                    log::warn!("{} has file version {}", path.display(), file.version);
                }
                file.records
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        log::debug!("opened {} with {} records", path.display(), records.len());
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = StoreFileRef {
            version: FILE_VERSION,
            records: &self.records,
        };
        let contents = serde_json::to_string(&file)?;
        // Write then rename so a crash never leaves a half-written document
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: Key) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.records.get(&key).cloned())
    }

    fn put(&mut self, key: Key, value: &[u8]) -> Result<(), StoreError> {
        let previous = self.records.insert(key, value.to_vec());
        if let Err(e) = self.flush() {
            match previous {
                Some(old) => self.records.insert(key, old),
                None => self.records.remove(&key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn delete(&mut self, key: Key) -> Result<(), StoreError> {
        let Some(previous) = self.records.remove(&key) else {
            return Ok(());
        };
        if let Err(e) = self.flush() {
            self.records.insert(key, previous);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("blocktris-{}-{}.json", name, std::process::id()));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_missing_file_is_empty() {
        let path = temp_path("missing");
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get(1).unwrap(), None);
    }

    #[test]
    fn test_records_survive_reopen() {
        let path = temp_path("reopen");
        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store.put(16, &[1, 0, 0, 0]).unwrap();
            store.put(33, &[7; 35]).unwrap();
            store.delete(33).unwrap();
        }
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get(16).unwrap(), Some(vec![1, 0, 0, 0]));
        assert_eq!(store.get(33).unwrap(), None);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_written_document_reads_back() {
        let path = temp_path("document");
        let mut store = JsonFileStore::open(&path).unwrap();
        store.put(15, &[2, 0, 0, 0]).unwrap();
        let file: StoreFile = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(file.version, FILE_VERSION);
        assert_eq!(file.records.get(&15), Some(&vec![2, 0, 0, 0]));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_garbage_file_is_an_error() {
        let path = temp_path("garbage");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StoreError::Json(_))
        ));
        let _ = fs::remove_file(&path);
    }
}
