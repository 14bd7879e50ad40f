//! Contact store module
//!
//! Persists contact-form submissions as a single pretty-printed JSON array on
//! disk. Records are append-only: the store never updates or removes entries.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

/// One persisted contact-form submission.
///
/// Field names on disk match the site's original storage format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub submitted_at: String,
    pub client_ip: String,
    pub user_agent: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("contact store I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("contact store encoding failure: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Append-only contact store over an injected file path.
///
/// Appends are serialized through an internal mutex so that two concurrent
/// submissions cannot race on the read-modify-write cycle and drop each
/// other's record.
pub struct ContactStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ContactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Idempotently create the backing file with an empty array if absent.
    pub async fn ensure(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        if !fs::try_exists(&self.path).await? {
            self.write_array(&[]).await?;
        }

        Ok(())
    }

    /// Append one record and rewrite the whole array atomically.
    pub async fn append(&self, record: &ContactRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut contacts = self.read_raw().await?;
        contacts.push(serde_json::to_value(record)?);
        self.write_array(&contacts).await
    }

    /// Read all records currently on disk, in insertion order.
    pub async fn read_all(&self) -> Result<Vec<ContactRecord>, StoreError> {
        let values = self.read_raw().await?;
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(StoreError::from))
            .collect()
    }

    /// Read the raw array, treating a missing file, unparsable content, or
    /// non-array content as empty. Corrupt content is repaired to `[]` on
    /// disk so later reads start from a clean state.
    async fn read_raw(&self) -> Result<Vec<serde_json::Value>, StoreError> {
        let raw = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Array(items)) => Ok(items),
            _ => {
                self.write_array(&[]).await?;
                Ok(Vec::new())
            }
        }
    }

    /// Rewrite the backing file via a temp file and rename, so a crash
    /// mid-write cannot leave a truncated array behind.
    async fn write_array(&self, items: &[serde_json::Value]) -> Result<(), StoreError> {
        let mut payload = serde_json::to_string_pretty(items)?;
        payload.push('\n');

        let temp_path = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        fs::write(&temp_path, payload).await?;
        fs::rename(&temp_path, &self.path).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(id: &str) -> ContactRecord {
        ContactRecord {
            id: id.to_string(),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            message: "Hello there".to_string(),
            submitted_at: "2026-01-01T00:00:00+00:00".to_string(),
            client_ip: "127.0.0.1".to_string(),
            user_agent: "test-agent".to_string(),
        }
    }

    #[tokio::test]
    async fn ensure_creates_empty_array() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ContactStore::new(dir.path().join("data/contacts.json"));

        store.ensure().await.expect("ensure");

        let content = std::fs::read_to_string(store.path()).expect("read");
        assert_eq!(content, "[]\n");
    }

    #[tokio::test]
    async fn ensure_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ContactStore::new(dir.path().join("contacts.json"));

        store.ensure().await.expect("first ensure");
        store.append(&sample_record("a")).await.expect("append");
        store.ensure().await.expect("second ensure");

        let records = store.read_all().await.expect("read_all");
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn append_preserves_insertion_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ContactStore::new(dir.path().join("contacts.json"));
        store.ensure().await.expect("ensure");

        store.append(&sample_record("first")).await.expect("append");
        store.append(&sample_record("second")).await.expect("append");

        let records = store.read_all().await.expect("read_all");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "first");
        assert_eq!(records[1].id, "second");
    }

    #[tokio::test]
    async fn appended_record_round_trips_unmodified() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ContactStore::new(dir.path().join("contacts.json"));
        store.ensure().await.expect("ensure");

        let record = sample_record("round-trip");
        store.append(&record).await.expect("append");

        let records = store.read_all().await.expect("read_all");
        assert_eq!(records.last(), Some(&record));

        let content = std::fs::read_to_string(store.path()).expect("read");
        assert!(content.ends_with('\n'));
    }

    #[tokio::test]
    async fn corrupt_content_is_repaired() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("contacts.json");
        std::fs::write(&path, "this is not json").expect("write corrupt");

        let store = ContactStore::new(&path);
        store.append(&sample_record("only")).await.expect("append");

        let records = store.read_all().await.expect("read_all");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "only");
    }

    #[tokio::test]
    async fn non_array_content_is_treated_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("contacts.json");
        std::fs::write(&path, "{\"not\": \"an array\"}").expect("write object");

        let store = ContactStore::new(&path);
        store.append(&sample_record("only")).await.expect("append");

        let records = store.read_all().await.expect("read_all");
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_appends_keep_both_records() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = std::sync::Arc::new(ContactStore::new(dir.path().join("contacts.json")));
        store.ensure().await.expect("ensure");

        let a = {
            let store = std::sync::Arc::clone(&store);
            tokio::spawn(async move { store.append(&sample_record("a")).await })
        };
        let b = {
            let store = std::sync::Arc::clone(&store);
            tokio::spawn(async move { store.append(&sample_record("b")).await })
        };

        a.await.expect("join").expect("append a");
        b.await.expect("join").expect("append b");

        let records = store.read_all().await.expect("read_all");
        assert_eq!(records.len(), 2);
    }
}
