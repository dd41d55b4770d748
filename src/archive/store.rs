// src/archive/store.rs
// =============================================================================
// Write-once snapshot storage on disk.
//
// Layout: one file per snapshot, `<archive_dir>/<fingerprint>`, holding the
// captured markup verbatim. The existence of that file is the only signal
// that a link is archived. Records are never updated or removed here.
// =============================================================================

use crate::error::{Error, Result};
use crate::fingerprint::Fingerprint;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ArchiveStore {
    root: PathBuf,
}

impl ArchiveStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, fp: &Fingerprint) -> PathBuf {
        self.root.join(fp.as_str())
    }

    // Hidden, per-process name so concurrent runs never share a temp file
    fn temp_path_for(&self, fp: &Fingerprint) -> PathBuf {
        self.root
            .join(format!(".{}.{}.tmp", fp.as_str(), std::process::id()))
    }

    // The idempotency gate. An unreadable directory counts as "absent", so
    // the link is fetched again and the write reports the real problem.
    pub async fn contains(&self, fp: &Fingerprint) -> bool {
        fs::try_exists(self.path_for(fp)).await.unwrap_or(false)
    }

    // Persists a snapshot, creating the archive directory on first use.
    pub async fn write(&self, fp: &Fingerprint, markup: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Error::io(&self.root, e))?;

        // Write next to the target, then rename. A crash or a full disk
        // leaves only a temp file, which `contains` never sees.
        let path = self.path_for(fp);
        let tmp = self.temp_path_for(fp);
        if let Err(e) = fs::write(&tmp, markup).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(Error::io(&tmp, e));
        }
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(Error::io(&path, e));
        }

        debug!(path = %path.display(), bytes = markup.len(), "snapshot written");
        Ok(path)
    }

    pub async fn read(&self, fp: &Fingerprint) -> Result<Option<String>> {
        let path = self.path_for(fp);
        match fs::read_to_string(&path).await {
            Ok(markup) => Ok(Some(markup)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io(&path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::fingerprint;

    #[tokio::test]
    async fn test_missing_record_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArchiveStore::new(dir.path().join("archives"));
        let fp = fingerprint("https://example.com");

        assert!(!store.contains(&fp).await);
        assert_eq!(store.read(&fp).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArchiveStore::new(dir.path().join("nested/archives"));
        let fp = fingerprint("https://example.com");

        let path = store.write(&fp, "<html>hi</html>").await.unwrap();

        assert_eq!(path.file_name().unwrap().to_str().unwrap(), fp.as_str());
        assert!(store.contains(&fp).await);
        assert_eq!(store.read(&fp).await.unwrap().as_deref(), Some("<html>hi</html>"));
    }

    #[tokio::test]
    async fn test_records_are_keyed_by_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArchiveStore::new(dir.path());
        let a = fingerprint("https://a.example");
        let b = fingerprint("https://b.example");

        store.write(&a, "a").await.unwrap();

        assert!(store.contains(&a).await);
        assert!(!store.contains(&b).await);
    }

    #[tokio::test]
    async fn test_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArchiveStore::new(dir.path());
        let fp = fingerprint("https://example.com");

        store.write(&fp, "<html>done</html>").await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![fp.as_str().to_string()]);
        assert_eq!(store.read(&fp).await.unwrap().as_deref(), Some("<html>done</html>"));
    }

    #[tokio::test]
    async fn test_leftover_temp_file_is_not_archived() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArchiveStore::new(dir.path());
        let fp = fingerprint("https://example.com");

        // What an interrupted write leaves behind
        std::fs::write(store.temp_path_for(&fp), "<html>trunc").unwrap();

        assert!(!store.contains(&fp).await);
        store.write(&fp, "<html>full</html>").await.unwrap();
        assert_eq!(store.read(&fp).await.unwrap().as_deref(), Some("<html>full</html>"));
    }
}
