// File Store - filesystem collaborator for uploaded media
// References stored in content look like `/uploads/<filename>`; the store maps them
// onto disk below its base directory.

use async_trait::async_trait;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use super::uploads::UPLOADS_DIR;

/// Outcome of a single removal attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRemoval {
    Deleted,
    /// Nothing was on disk; treated as success
    Missing,
}

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Write `data` into the uploads directory as `filename`
    async fn save(&self, filename: &str, data: &[u8]) -> io::Result<()>;

    /// Remove the file behind a site-relative reference such as `/uploads/a.jpg`
    async fn remove(&self, reference: &str) -> io::Result<FileRemoval>;
}

/// Local disk implementation rooted at the process' uploads base directory
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    base_dir: PathBuf,
}

impl LocalFileStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.base_dir.join(UPLOADS_DIR)
    }

    /// Strip a single leading `/` and join the remainder under the base directory.
    /// References that would escape the base directory are rejected.
    pub fn resolve(&self, reference: &str) -> io::Result<PathBuf> {
        let relative = reference.strip_prefix('/').unwrap_or(reference);
        if relative.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "empty file reference",
            ));
        }

        let relative = Path::new(relative);
        if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("file reference '{}' leaves the uploads root", reference),
            ));
        }

        Ok(self.base_dir.join(relative))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save(&self, filename: &str, data: &[u8]) -> io::Result<()> {
        let name = Path::new(filename);
        let mut components = name.components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is not a plain file name", filename),
            ));
        }

        let dir = self.uploads_dir();
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(name);
        tokio::fs::write(&path, data).await?;
        debug!("Stored upload at {}", path.display());
        Ok(())
    }

    async fn remove(&self, reference: &str) -> io::Result<FileRemoval> {
        let path = self.resolve(reference)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(FileRemoval::Deleted),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(FileRemoval::Missing),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_strips_single_leading_slash() {
        let store = LocalFileStore::new("/srv/site");
        assert_eq!(
            store.resolve("/uploads/a.jpg").unwrap(),
            PathBuf::from("/srv/site/uploads/a.jpg")
        );
        assert_eq!(
            store.resolve("uploads/a.jpg").unwrap(),
            PathBuf::from("/srv/site/uploads/a.jpg")
        );
        assert!(store.resolve("//etc/passwd").is_err());
        assert!(store.resolve("/uploads/../secret").is_err());
        assert!(store.resolve("/").is_err());
    }

    #[tokio::test]
    async fn test_save_and_remove() {
        let dir = tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());

        store.save("photo.jpg", b"jpeg").await.unwrap();
        assert!(dir.path().join("uploads/photo.jpg").exists());

        assert_eq!(store.remove("/uploads/photo.jpg").await.unwrap(), FileRemoval::Deleted);
        assert_eq!(store.remove("/uploads/photo.jpg").await.unwrap(), FileRemoval::Missing);
    }

    #[tokio::test]
    async fn test_save_rejects_nested_names() {
        let dir = tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());

        assert!(store.save("../escape.jpg", b"x").await.is_err());
        assert!(store.save("a/b.jpg", b"x").await.is_err());
    }
}
