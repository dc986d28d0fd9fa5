//! Upload storage on the local filesystem.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use easel_core::domain::IncomingFile;
use easel_core::domain::upload::check_image;
use easel_core::ports::{FileStore, StoredFile, UploadError};

/// Stores accepted images in one flat directory.
pub struct DiskFileStore {
    root: PathBuf,
}

impl DiskFileStore {
    /// Use `root` as the upload directory, creating it if needed.
    pub async fn open(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<unix-millis>-<8 hex chars><ext>`: time-ordered, and unique even for
    /// uploads landing in the same millisecond.
    fn generate_name(ext: &str) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!(
            "{}-{}{}",
            Utc::now().timestamp_millis(),
            &suffix[..8],
            ext
        )
    }
}

#[async_trait]
impl FileStore for DiskFileStore {
    async fn store(&self, file: IncomingFile) -> Result<StoredFile, UploadError> {
        let ext = check_image(&file)?;
        let filename = Self::generate_name(&ext);
        let size = file.bytes.len();

        tokio::fs::write(self.root.join(&filename), &file.bytes)
            .await
            .map_err(|e| UploadError::Io(e.to_string()))?;

        tracing::info!(
            original = %file.original_name,
            stored = %filename,
            size,
            "Stored upload"
        );

        Ok(StoredFile { filename, size })
    }

    async fn remove(&self, filename: &str) -> Result<(), UploadError> {
        // Only names this store generated; never a path.
        if filename.contains(['/', '\\']) || filename.starts_with('.') {
            return Err(UploadError::Rejected(format!("Invalid file name: {filename}")));
        }

        match tokio::fs::remove_file(self.root.join(filename)).await {
            Ok(()) => {
                tracing::info!(stored = %filename, "Removed upload");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(UploadError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> DiskFileStore {
        let dir = std::env::temp_dir().join(format!("easel-uploads-{}", Uuid::new_v4()));
        DiskFileStore::open(dir).await.unwrap()
    }

    fn png(name: &str) -> IncomingFile {
        IncomingFile {
            original_name: name.to_string(),
            content_type: Some("image/png".to_string()),
            bytes: b"\x89PNG fake".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_store_png_under_new_name() {
        let store = temp_store().await;

        let stored = store.store(png("Cat.PNG")).await.unwrap();

        assert_ne!(stored.filename, "Cat.PNG");
        assert!(stored.filename.ends_with(".png"));
        let (millis, _) = stored.filename.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());

        let written = tokio::fs::read(store.root().join(&stored.filename))
            .await
            .unwrap();
        assert_eq!(written, b"\x89PNG fake");
    }

    #[tokio::test]
    async fn test_names_are_unique() {
        let store = temp_store().await;
        let a = store.store(png("a.png")).await.unwrap();
        let b = store.store(png("a.png")).await.unwrap();
        assert_ne!(a.filename, b.filename);
    }

    #[tokio::test]
    async fn test_text_file_rejected_and_not_written() {
        let store = temp_store().await;

        let err = store
            .store(IncomingFile {
                original_name: "notes.txt".to_string(),
                content_type: Some("text/plain".to_string()),
                bytes: b"hello".to_vec(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Rejected(_)));
        let mut entries = tokio::fs::read_dir(store.root()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = temp_store().await;
        let stored = store.store(png("a.png")).await.unwrap();

        store.remove(&stored.filename).await.unwrap();
        assert!(!store.root().join(&stored.filename).exists());

        // Gone already.
        store.remove(&stored.filename).await.unwrap();
        assert!(matches!(
            store.remove("../escape.png").await,
            Err(UploadError::Rejected(_))
        ));
    }
}
