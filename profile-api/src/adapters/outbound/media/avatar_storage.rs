use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;

use crate::domain::{models::StoredAvatar, ports::outbound::AvatarStorage, AvatarError};

/// Stores avatars as plain files in one directory, served back under
/// `public_path` by the static file layer.
pub struct DiskAvatarStorage {
    directory: PathBuf,
    public_path: String,
}

impl DiskAvatarStorage {
    pub fn new(directory: impl Into<PathBuf>, public_path: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            public_path: public_path.into().trim_end_matches('/').to_string(),
        }
    }

    /// Maps a public URL back to a bare file name inside the directory.
    /// Anything with a path separator or a parent reference is refused.
    fn file_name<'a>(&self, public_url: &'a str) -> Option<&'a str> {
        public_url
            .strip_prefix(&self.public_path)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| {
                !name.is_empty() && !name.contains(['/', '\\']) && *name != "." && *name != ".."
            })
    }
}

#[async_trait]
impl AvatarStorage for DiskAvatarStorage {
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<StoredAvatar, AvatarError> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|err| AvatarError::Storage(err.to_string()))?;

        let path = self.directory.join(file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|err| AvatarError::Storage(format!("{}: {err}", path.display())))?;

        Ok(StoredAvatar {
            file_name: file_name.to_string(),
            public_url: format!("{}/{file_name}", self.public_path),
        })
    }

    async fn remove(&self, public_url: &str) -> Result<(), AvatarError> {
        let Some(file_name) = self.file_name(public_url) else {
            return Ok(());
        };

        match tokio::fs::remove_file(self.directory.join(file_name)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AvatarError::Storage(err.to_string())),
        }
    }

    fn owns(&self, public_url: &str) -> bool {
        self.file_name(public_url).is_some()
    }
}
