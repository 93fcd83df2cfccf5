//! On-disk slots for the ambient icon pool.
//!
//! Two files live in the store directory:
//!
//! - `icon_urls.json`: JSON array of artwork URLs
//! - `icon_urls.timestamp`: milliseconds since the Unix epoch, as text
//!
//! Both are written after a successful warm. A missing or unreadable slot
//! reads as "nothing stored", which forces a fresh warm.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{AppError, Result};

const URLS_FILE: &str = "icon_urls.json";
const TIMESTAMP_FILE: &str = "icon_urls.timestamp";

/// Filesystem-backed slot pair.
#[derive(Debug, Clone)]
pub struct AssetStore {
    dir: PathBuf,
}

impl AssetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn urls_path(&self) -> PathBuf {
        self.dir.join(URLS_FILE)
    }

    pub fn timestamp_path(&self) -> PathBuf {
        self.dir.join(TIMESTAMP_FILE)
    }

    /// Persisted URL set, or `None` if the slot is missing or corrupt.
    pub fn read_urls(&self) -> Option<Vec<String>> {
        let path = self.urls_path();
        let bytes = read_slot(&path)?;
        match serde_json::from_slice::<Vec<String>>(&bytes) {
            Ok(urls) => Some(urls),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt icon URL slot");
                None
            }
        }
    }

    /// Time of the last successful warm, or `None` if missing or corrupt.
    pub fn read_timestamp(&self) -> Option<DateTime<Utc>> {
        let path = self.timestamp_path();
        let bytes = read_slot(&path)?;
        let parsed = std::str::from_utf8(&bytes)
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single());
        if parsed.is_none() {
            tracing::warn!(path = %path.display(), "ignoring corrupt icon timestamp slot");
        }
        parsed
    }

    /// Write both slots. The URL slot is written first so a crash between
    /// the two writes leaves a stale timestamp, never a fresh one.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or either file cannot be written.
    pub fn write(&self, urls: &[String], stored_at: DateTime<Utc>) -> Result<()> {
        let json = serde_json::to_string(urls)
            .map_err(|e| AppError::Asset(format!("cannot serialize icon URLs: {e}")))?;
        write_atomic(&self.urls_path(), &json)?;
        write_atomic(&self.timestamp_path(), &stored_at.timestamp_millis().to_string())?;
        Ok(())
    }

    /// Remove both slots. Missing files are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing slot cannot be removed.
    pub fn clear(&self) -> Result<()> {
        for path in [self.urls_path(), self.timestamp_path()] {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

fn read_slot(path: &Path) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read asset slot");
            None
        }
    }
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_name = format!(
        ".{}.tmp-{}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("slot"),
        std::process::id()
    );
    let tmp_path = path
        .parent()
        .map(|p| p.join(&tmp_name))
        .unwrap_or_else(|| PathBuf::from(&tmp_name));

    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn empty_store_reads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path());
        assert!(store.read_urls().is_none());
        assert!(store.read_timestamp().is_none());
    }

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path().join("assets"));
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).single().unwrap();
        let urls = vec!["https://a.example/1.jpg".to_owned(), "https://a.example/2.jpg".to_owned()];

        store.write(&urls, at).unwrap();

        assert_eq!(store.read_urls().unwrap(), urls);
        assert_eq!(store.read_timestamp().unwrap(), at);
        let raw = std::fs::read_to_string(store.timestamp_path()).unwrap();
        assert_eq!(raw, "1700000000123");
    }

    #[test]
    fn corrupt_slots_read_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path());
        std::fs::write(store.urls_path(), "{not json").unwrap();
        std::fs::write(store.timestamp_path(), "yesterday").unwrap();
        assert!(store.read_urls().is_none());
        assert!(store.read_timestamp().is_none());
    }

    #[test]
    fn clear_removes_slots_and_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path());
        store.write(&["https://a.example/x.jpg".to_owned()], Utc::now()).unwrap();
        store.clear().unwrap();
        assert!(!store.urls_path().exists());
        store.clear().unwrap();
    }

    #[test]
    fn no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path());
        store.write(&[], Utc::now()).unwrap();
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.iter().all(|n| !n.contains(".tmp-")));
    }
}
