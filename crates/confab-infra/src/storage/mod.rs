//! Filesystem adapters: data directory resolution and local upload storage.
//!
//! Implements the `UploadStore` trait from `confab-core` for real filesystem
//! I/O. All operations go through `tokio::fs`.

use std::path::{Path, PathBuf};

use confab_core::storage::{StoredUpload, UploadStore};
use confab_types::error::UploadError;
use confab_types::llm::ImageMediaType;
use uuid::Uuid;

/// File extensions accepted for image uploads.
const ALLOWED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `CONFAB_DATA_DIR` environment variable
/// 2. Platform-specific data directory (e.g., `~/.confab` on macOS/Linux)
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CONFAB_DATA_DIR") {
        return PathBuf::from(dir);
    }

    // Use home directory fallback: ~/.confab
    if let Some(home) = dirs::home_dir() {
        return home.join(".confab");
    }

    // Last resort: current directory
    PathBuf::from(".confab")
}

/// Local filesystem implementation of the `UploadStore` trait.
///
/// Uploads land in a flat directory under generated `{uuid}.{ext}` names,
/// so client filenames never touch the filesystem.
pub struct LocalUploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl LocalUploadStore {
    /// Create a store rooted at `dir` with the given per-file size cap.
    pub fn new(dir: PathBuf, max_bytes: usize) -> Self {
        Self { dir, max_bytes }
    }

    /// The directory uploads are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Extract the extension from a client filename, lowercased.
///
/// A name with no dot yields the whole name, which then fails the
/// allow-list with the full string in the error.
fn extension(filename_hint: &str) -> String {
    filename_hint
        .rsplit('.')
        .next()
        .unwrap_or(filename_hint)
        .to_lowercase()
}

impl UploadStore for LocalUploadStore {
    async fn save(&self, data: &[u8], filename_hint: &str) -> Result<StoredUpload, UploadError> {
        // Validate before any byte hits the disk.
        let ext = extension(filename_hint);
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(UploadError::InvalidFileType(ext));
        }
        if data.len() > self.max_bytes {
            return Err(UploadError::FileTooLarge {
                size: data.len(),
                max: self.max_bytes,
            });
        }

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| UploadError::Io(e.to_string()))?;

        let filename = format!("{}.{ext}", Uuid::new_v4());
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| UploadError::Io(e.to_string()))?;

        Ok(StoredUpload {
            filename,
            media_type: ImageMediaType::from_extension(&ext),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &Path) -> LocalUploadStore {
        LocalUploadStore::new(dir.join("uploads"), 64)
    }

    #[tokio::test]
    async fn test_save_writes_generated_name() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        let stored = store.save(b"fakepng", "photo.png").await.unwrap();

        assert!(stored.filename.ends_with(".png"));
        assert_eq!(stored.media_type, ImageMediaType::Png);

        // The stem is a fresh UUID, not the client's name.
        let stem = stored.filename.strip_suffix(".png").unwrap();
        assert!(Uuid::parse_str(stem).is_ok());

        let on_disk = tokio::fs::read(store.dir().join(&stored.filename))
            .await
            .unwrap();
        assert_eq!(on_disk, b"fakepng");
    }

    #[tokio::test]
    async fn test_extension_is_lowercased() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        let stored = store.save(b"x", "SHOUTY.JPG").await.unwrap();
        assert!(stored.filename.ends_with(".jpg"));
        assert_eq!(stored.media_type, ImageMediaType::Jpeg);
    }

    #[tokio::test]
    async fn test_disallowed_extension_writes_nothing() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        let err = store.save(b"MZ", "malware.exe").await.unwrap_err();
        assert!(matches!(err, UploadError::InvalidFileType(ref ext) if ext == "exe"));

        // Validation failed before the upload dir was even created.
        assert!(!store.dir().exists());
    }

    #[tokio::test]
    async fn test_missing_extension_is_rejected() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        let err = store.save(b"data", "noextension").await.unwrap_err();
        assert!(matches!(err, UploadError::InvalidFileType(ref ext) if ext == "noextension"));
    }

    #[tokio::test]
    async fn test_oversized_upload_writes_nothing() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        let big = vec![0u8; 65];
        let err = store.save(&big, "big.png").await.unwrap_err();
        assert!(matches!(err, UploadError::FileTooLarge { size: 65, max: 64 }));
        assert!(!store.dir().exists());
    }

    #[test]
    fn test_resolve_data_dir_from_env() {
        // SAFETY: This test is single-threaded and restores the env var immediately.
        unsafe {
            std::env::set_var("CONFAB_DATA_DIR", "/tmp/test-confab");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-confab"));
        unsafe {
            std::env::remove_var("CONFAB_DATA_DIR");
        }
    }
}
