use async_trait::async_trait;

use crate::domain::{models::StoredAvatar, AvatarError};

#[async_trait]
pub trait AvatarStorage: Send + Sync + 'static {
    /// Writes `bytes` under `file_name`, replacing any file already there.
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<StoredAvatar, AvatarError>;

    /// Removes the file a public URL points at. URLs that were not produced
    /// by this storage (such as the placeholder) are ignored, as are files
    /// that no longer exist.
    async fn remove(&self, public_url: &str) -> Result<(), AvatarError>;

    /// Whether `public_url` refers to a file managed by this storage.
    fn owns(&self, public_url: &str) -> bool;
}
