use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::store::MIN_OPTIONS;
use crate::types::{CommentLog, PersistedState};

pub const STATE_KEY: &str = "voting-app-state";
pub const COMMENTS_KEY: &str = "voting-app-comments";
pub const USERNAME_KEY: &str = "voting-app-username";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid blob key: {0}")]
    InvalidKey(String),
}

/// Get/set-by-key access to a durable blob store.
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key inside a data directory.
#[derive(Clone, Debug)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes through a temporary file and an atomic rename to avoid
    /// partial blobs.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let temp = path.with_extension("tmp");
        let mut f = File::create(&temp)?;
        f.write_all(value.as_bytes())?;
        f.sync_all()?;
        fs::rename(temp, &path)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, String>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads and writes the voting entries on top of a [`BlobStore`].
///
/// Loading never fails: absent, unreadable or malformed entries are replaced
/// by defaults. Writes are best-effort and failures are only logged.
pub struct Persistence<B> {
    blobs: B,
}

impl<B: BlobStore> Persistence<B> {
    pub fn new(blobs: B) -> Self {
        Self { blobs }
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    pub fn into_inner(self) -> B {
        self.blobs
    }

    pub fn load_state(&self) -> PersistedState {
        self.read(STATE_KEY)
            .and_then(|value| match parse_state(value) {
                Ok(state) => Some(state),
                Err(reason) => {
                    tracing::warn!(key = STATE_KEY, %reason, "discarding stored state");
                    None
                }
            })
            .unwrap_or_default()
    }

    pub fn load_comments(&self) -> CommentLog {
        self.read(COMMENTS_KEY)
            .and_then(|value| match parse_comments(value) {
                Ok(log) => Some(log),
                Err(reason) => {
                    tracing::warn!(key = COMMENTS_KEY, %reason, "discarding stored comments");
                    None
                }
            })
            .unwrap_or_default()
    }

    pub fn load_username(&self) -> Option<String> {
        self.read(USERNAME_KEY)
            .and_then(|value| value.as_str().map(str::trim).map(str::to_string))
            .filter(|name| !name.is_empty())
    }

    pub fn save_state(&mut self, state: &PersistedState) {
        self.write(STATE_KEY, state);
    }

    pub fn save_comments(&mut self, comments: &CommentLog) {
        self.write(COMMENTS_KEY, comments);
    }

    pub fn save_username(&mut self, name: &str) {
        self.write(USERNAME_KEY, &name);
    }

    fn read(&self, key: &str) -> Option<Value> {
        let raw = match self.blobs.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read blob");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "stored blob is not valid JSON");
                None
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(StorageError::from)
            .and_then(|raw| self.blobs.set(key, &raw));
        match result {
            Ok(()) => tracing::debug!(key, "blob written"),
            Err(e) => tracing::warn!(key, error = %e, "failed to write blob"),
        }
    }
}

fn parse_state(value: Value) -> Result<PersistedState, String> {
    let object = value
        .as_object()
        .ok_or_else(|| "state is not an object".to_string())?;
    if let Some(missing) = ["issues", "voted", "theme"]
        .into_iter()
        .find(|field| !object.contains_key(*field))
    {
        return Err(format!("missing field `{missing}`"));
    }
    let state: PersistedState = serde_json::from_value(value).map_err(|e| e.to_string())?;
    if state.issues.is_empty() {
        return Err("no issues".to_string());
    }
    if let Some(issue) = state.issues.iter().find(|i| i.options.len() < MIN_OPTIONS) {
        return Err(format!("issue {} has fewer than {MIN_OPTIONS} options", issue.id));
    }
    Ok(state)
}

fn parse_comments(value: Value) -> Result<CommentLog, String> {
    if !value.is_object() {
        return Err("comments are not an object".to_string());
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}
