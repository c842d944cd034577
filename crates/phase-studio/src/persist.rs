//! Key-value persistence for the gradient collection.
//!
//! The collection lives under a single key as the full JSON form of every
//! gradient (ids and timestamps included, no rounding).

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use phase_mesh::Gradient;
use phase_mesh::validate::validate;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("stored gradients are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// String-valued key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage for tests and throwaway sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a state directory.
///
/// Writes go to a temp file that is then renamed over the target, so a crash
/// mid-write leaves the previous value in place.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let temp = path.with_extension("json.tmp");

        let mut file = fs::File::create(&temp)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Gradients read back from storage.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoadedGradients {
    pub gradients: Vec<Gradient>,
    /// Stored entries that failed validation or did not parse.
    pub dropped: usize,
}

/// Reads the gradient list stored under `key`. A missing key is an empty list.
///
/// Each entry is validated on its own; bad entries are dropped and counted
/// while the rest load. Only a value that is not a JSON array is an error.
pub fn load_gradients<S: KeyValueStore + ?Sized>(storage: &S, key: &str) -> Result<LoadedGradients, StorageError> {
    let Some(json) = storage.get(key)? else {
        return Ok(LoadedGradients::default());
    };
    let entries: Vec<Value> = serde_json::from_str(&json)?;

    let mut loaded = LoadedGradients::default();
    for (i, entry) in entries.into_iter().enumerate() {
        if !validate(&entry) {
            log::warn!("dropping stored gradient #{i}: out of range or malformed");
            loaded.dropped += 1;
            continue;
        }
        match serde_json::from_value::<Gradient>(entry) {
            Ok(gradient) => loaded.gradients.push(gradient),
            Err(e) => {
                log::warn!("dropping stored gradient #{i}: {e}");
                loaded.dropped += 1;
            }
        }
    }
    Ok(loaded)
}

/// Writes `gradients` under `key`, replacing whatever was there.
pub fn save_gradients<S: KeyValueStore + ?Sized>(
    storage: &mut S,
    key: &str,
    gradients: &[Gradient],
) -> Result<(), StorageError> {
    let json = serde_json::to_string(gradients)?;
    storage.set(key, &json)
}
