//! UploadStore trait for persisting image blobs.
//!
//! Defined in confab-core so the turn orchestrator can store uploads
//! without coupling to a filesystem. The `LocalUploadStore` adapter lives
//! in confab-infra.

use confab_types::error::UploadError;
use confab_types::llm::ImageMediaType;

/// A stored upload: the generated object name and its validated media type.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    /// Object name under the upload root (`<uuid>.<ext>`), never derived
    /// from client input.
    pub filename: String,
    pub media_type: ImageMediaType,
}

/// Abstraction over durable image blob storage.
pub trait UploadStore: Send + Sync {
    /// Validate and persist an image blob.
    ///
    /// `filename_hint` is the client's name, used only to take the
    /// extension for validation; the stored name is generated. Validation
    /// (extension allow-list, size cap) runs before any byte is written.
    fn save(
        &self,
        data: &[u8],
        filename_hint: &str,
    ) -> impl std::future::Future<Output = Result<StoredUpload, UploadError>> + Send;
}
