use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use async_trait::async_trait;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::instrument;

use crate::domain::{
    models::{AvatarUpload, ImageKind, UserId},
    ports::{
        inbound::UserService,
        outbound::{AvatarStorage, UserRepository},
    },
    AvatarError, NewUser, ProfilePatch, User, UserError, UserFilter, UserPatch,
    PLACEHOLDER_PROFILE_URL,
};

const MAX_AVATAR_SIZE: usize = 5 * 1024 * 1024;

/// Implementation of the UserService inbound port.
///
/// Record changes go through the repository; avatar files go through the
/// storage. Whenever a user's `profileUrl` moves away from an uploaded file,
/// that file is removed so replaced avatars do not pile up on disk.
///
/// Changes to one user's avatar are serialized: the file write, the record
/// update and the cleanup of the previous file happen under a per-user lock,
/// and the previous URL is read from the repository inside that lock.
pub struct UserServiceImpl<R, S> {
    repository: Arc<R>,
    storage: Arc<S>,
    avatar_locks: Mutex<HashMap<UserId, Arc<AsyncMutex<()>>>>,
}

impl<R, S> UserServiceImpl<R, S> {
    pub fn new(repository: Arc<R>, storage: Arc<S>) -> Self {
        Self {
            repository,
            storage,
            avatar_locks: Mutex::default(),
        }
    }

    async fn lock_avatar(&self, id: UserId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self
                .avatar_locks
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(id).or_default())
        };
        lock.lock_owned().await
    }

    fn forget_avatar_lock(&self, id: UserId) {
        self.avatar_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }
}

impl<R: UserRepository, S: AvatarStorage> UserServiceImpl<R, S> {
    async fn discard_previous_avatar(&self, previous_url: &str, current_url: &str) {
        if previous_url == current_url || !self.storage.owns(previous_url) {
            return;
        }

        // The record already points elsewhere, so a failed cleanup only leaks a file.
        if let Err(err) = self.storage.remove(previous_url).await {
            tracing::warn!("failed to remove previous avatar {previous_url}: {err}");
        }
    }

    /// Current record for `id`. Callers hold the avatar lock for `id`.
    async fn current_user(&self, id: UserId) -> Result<User, UserError> {
        self.repository
            .find_one(&UserFilter::by_id(id))
            .await?
            .ok_or(UserError::NotFound)
    }

    /// Points `previous` at `url` and drops the file it used to point at.
    /// Callers hold the avatar lock for `previous.id`.
    async fn commit_profile_url(&self, previous: &User, url: &str) -> Result<User, UserError> {
        let patch = UserPatch::profile_url(url).validated()?;
        let updated = self
            .repository
            .find_one_and_update(&UserFilter::by_id(previous.id), &patch)
            .await?
            .ok_or(UserError::NotFound)?;

        self.discard_previous_avatar(&previous.profile_url, &updated.profile_url)
            .await;

        Ok(updated)
    }

    async fn set_profile_url(&self, id: UserId, url: &str) -> Result<User, UserError> {
        let _guard = self.lock_avatar(id).await;
        let previous = self.current_user(id).await?;
        self.commit_profile_url(&previous, url).await
    }
}

fn check_avatar(upload: &AvatarUpload) -> Result<ImageKind, AvatarError> {
    let kind = upload
        .content_type
        .as_deref()
        .ok_or(AvatarError::UnsupportedMediaType)
        .and_then(ImageKind::from_mime)?;

    if upload.bytes.len() > MAX_AVATAR_SIZE {
        return Err(AvatarError::PayloadTooLarge);
    }

    let format = image::guess_format(&upload.bytes).map_err(|_| AvatarError::InvalidImage)?;
    if !kind.matches(format) {
        return Err(AvatarError::InvalidImage);
    }

    Ok(kind)
}

#[async_trait]
impl<R: UserRepository, S: AvatarStorage> UserService for UserServiceImpl<R, S> {
    #[instrument(skip(self))]
    async fn create_user(&self, new_user: NewUser) -> Result<User, UserError> {
        let new_user = new_user.validated()?;
        let user = self.repository.insert(&new_user).await?;
        tracing::info!(user_id = %user.id, "user created");
        Ok(user)
    }

    async fn get_users(&self, filter: &UserFilter) -> Result<Vec<User>, UserError> {
        self.repository.find_many(filter).await
    }

    async fn get_user_by_filter(&self, filter: &UserFilter) -> Result<Option<User>, UserError> {
        self.repository.find_one(filter).await
    }

    async fn get_user_by_id(
        &self,
        id: UserId,
        filter: &UserFilter,
    ) -> Result<Option<User>, UserError> {
        self.get_user_by_filter(&filter.clone().with_id(id)).await
    }

    #[instrument(skip(self, patch))]
    async fn update_user_by_id(
        &self,
        id: UserId,
        patch: UserPatch,
        filter: &UserFilter,
    ) -> Result<User, UserError> {
        let patch = patch.validated()?;
        self.repository
            .find_one_and_update(&filter.clone().with_id(id), &patch)
            .await?
            .ok_or(UserError::NotFound)
    }

    #[instrument(skip_all, fields(user_id = %user.id))]
    async fn update_user_profile(
        &self,
        user: &User,
        patch: ProfilePatch,
    ) -> Result<User, UserError> {
        self.update_user_by_id(user.id, patch.into(), &UserFilter::all())
            .await
    }

    #[instrument(skip_all, fields(user_id = %user.id))]
    async fn upload_profile_image(&self, url: &str, user: &User) -> Result<User, UserError> {
        self.set_profile_url(user.id, url).await
    }

    #[instrument(skip_all, fields(user_id = %user.id))]
    async fn upload_avatar(&self, user: &User, upload: AvatarUpload) -> Result<User, UserError> {
        let kind = check_avatar(&upload)?;
        let file_name = upload.file_name(&user.id, kind);

        let _guard = self.lock_avatar(user.id).await;
        let previous = self.current_user(user.id).await?;
        let stored = self.storage.store(&file_name, &upload.bytes).await?;
        tracing::info!(file_name = %stored.file_name, "avatar stored");

        match self.commit_profile_url(&previous, &stored.public_url).await {
            Err(UserError::NotFound) => {
                // The user disappeared while the file was being written.
                if let Err(err) = self.storage.remove(&stored.public_url).await {
                    tracing::warn!("failed to remove orphaned avatar {file_name}: {err}");
                }
                Err(UserError::NotFound)
            }
            result => result,
        }
    }

    #[instrument(skip_all, fields(user_id = %user.id))]
    async fn remove_profile_image(&self, user: &User) -> Result<User, UserError> {
        self.set_profile_url(user.id, PLACEHOLDER_PROFILE_URL).await
    }

    #[instrument(skip(self))]
    async fn delete_user_by_id(&self, id: UserId, filter: &UserFilter) -> Result<User, UserError> {
        let guard = self.lock_avatar(id).await;
        let removed = self
            .repository
            .find_one_and_remove(&filter.clone().with_id(id))
            .await?
            .ok_or(UserError::NotFound)?;

        self.discard_previous_avatar(&removed.profile_url, PLACEHOLDER_PROFILE_URL)
            .await;
        drop(guard);
        self.forget_avatar_lock(id);
        tracing::info!(user_id = %removed.id, "user deleted");

        Ok(removed)
    }
}
