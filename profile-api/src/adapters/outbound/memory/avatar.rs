use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use async_trait::async_trait;

use crate::domain::{models::StoredAvatar, ports::outbound::AvatarStorage, AvatarError};

/// Mock avatar storage that keeps files in a map keyed by file name.
#[derive(Clone)]
pub struct InMemoryAvatarStorage {
    files: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
    public_path: String,
}

impl InMemoryAvatarStorage {
    pub fn new(public_path: impl Into<String>) -> Self {
        Self {
            files: Arc::default(),
            public_path: public_path.into().trim_end_matches('/').to_string(),
        }
    }

    /// Stored file names in sorted order (for test assertions).
    pub fn file_names(&self) -> Vec<String> {
        self.files.read().unwrap().keys().cloned().collect()
    }

    fn file_name<'a>(&self, public_url: &'a str) -> Option<&'a str> {
        public_url
            .strip_prefix(&self.public_path)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains('/'))
    }
}

#[async_trait]
impl AvatarStorage for InMemoryAvatarStorage {
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<StoredAvatar, AvatarError> {
        self.files
            .write()
            .unwrap()
            .insert(file_name.to_string(), bytes.to_vec());

        Ok(StoredAvatar {
            file_name: file_name.to_string(),
            public_url: format!("{}/{file_name}", self.public_path),
        })
    }

    async fn remove(&self, public_url: &str) -> Result<(), AvatarError> {
        if let Some(name) = self.file_name(public_url) {
            self.files.write().unwrap().remove(name);
        }
        Ok(())
    }

    fn owns(&self, public_url: &str) -> bool {
        self.file_name(public_url).is_some()
    }
}
