use crate::application::StorageManager;
use crate::domain::{StorageError, StorageResult};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info};

type Entries = Map<String, Value>;

fn loaded(entries: &RefCell<Option<Entries>>) -> StorageResult<std::cell::RefMut<'_, Entries>> {
    let guard = entries.borrow_mut();
    std::cell::RefMut::filter_map(guard, Option::as_mut).map_err(|_| StorageError::NotInitialized)
}

/// Store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<Option<Entries>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait(?Send)]
impl StorageManager for MemoryStorage {
    async fn init(&self) -> StorageResult<()> {
        self.entries.borrow_mut().get_or_insert_with(Entries::new);
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        Ok(loaded(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> StorageResult<()> {
        loaded(&self.entries)?.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store persisted as one JSON object; every write rewrites the file.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    entries: RefCell<Option<Entries>>,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: RefCell::new(None),
        }
    }

    fn read_file(&self) -> StorageResult<Entries> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => Err(self.corrupt("top level is not an object")),
            Err(e) => Err(self.corrupt(e.to_string())),
        }
    }

    fn corrupt(&self, reason: impl Into<String>) -> StorageError {
        StorageError::Corrupt {
            path: self.path.display().to_string(),
            reason: reason.into(),
        }
    }
}

#[async_trait(?Send)]
impl StorageManager for JsonFileStorage {
    async fn init(&self) -> StorageResult<()> {
        let entries = self.read_file()?;
        info!(path = %self.path.display(), keys = entries.len(), "storage loaded");
        *self.entries.borrow_mut() = Some(entries);
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        Ok(loaded(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> StorageResult<()> {
        let mut entries = loaded(&self.entries)?;
        let mut next = entries.clone();
        next.insert(key.to_string(), value);
        fs::write(&self.path, serde_json::to_string_pretty(&next)?)?;
        *entries = next;
        debug!(key, path = %self.path.display(), "storage written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_memory_storage_requires_init() {
        let storage = MemoryStorage::new();
        assert!(matches!(storage.get("k"), Err(StorageError::NotInitialized)));
        assert!(matches!(storage.set("k", json!(1)), Err(StorageError::NotInitialized)));

        storage.init().await.unwrap();
        storage.set("k", json!(1)).unwrap();
        assert_eq!(storage.get("k").unwrap(), Some(json!(1)));
        assert_eq!(storage.get("missing").unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("store.json"));
        storage.init().await.unwrap();
        assert_eq!(storage.get("cart").unwrap(), None);
    }

    #[tokio::test]
    async fn test_values_survive_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let storage = JsonFileStorage::new(&path);
        storage.init().await.unwrap();
        storage.set("cart", json!({"items": []})).unwrap();
        storage.set("till", json!("front")).unwrap();

        let reopened = JsonFileStorage::new(&path);
        reopened.init().await.unwrap();
        assert_eq!(reopened.get("cart").unwrap(), Some(json!({"items": []})));
        assert_eq!(reopened.get("till").unwrap(), Some(json!("front")));
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_entries() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("data");
        fs::create_dir(&data_dir).unwrap();

        let storage = JsonFileStorage::new(data_dir.join("store.json"));
        storage.init().await.unwrap();
        storage.set("till", json!("front")).unwrap();

        fs::remove_dir_all(&data_dir).unwrap();
        assert!(matches!(storage.set("till", json!("back")), Err(StorageError::Io(_))));
        assert!(matches!(storage.set("cart", json!({})), Err(StorageError::Io(_))));
        assert_eq!(storage.get("till").unwrap(), Some(json!("front")));
        assert_eq!(storage.get("cart").unwrap(), None);
    }

    #[tokio::test]
    async fn test_non_object_file_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let storage = JsonFileStorage::new(&path);
        assert!(matches!(storage.init().await, Err(StorageError::Corrupt { .. })));
        assert!(matches!(storage.get("cart"), Err(StorageError::NotInitialized)));
    }

    #[tokio::test]
    async fn test_malformed_file_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();

        let storage = JsonFileStorage::new(&path);
        assert!(matches!(storage.init().await, Err(StorageError::Corrupt { .. })));
    }
}
