use async_trait::async_trait;

use crate::domain::{
    models::{AvatarUpload, UserId},
    NewUser, ProfilePatch, User, UserError, UserFilter, UserPatch,
};

#[async_trait]
pub trait UserService: Send + Sync + 'static {
    async fn create_user(&self, new_user: NewUser) -> Result<User, UserError>;

    async fn get_users(&self, filter: &UserFilter) -> Result<Vec<User>, UserError>;

    async fn get_user_by_filter(&self, filter: &UserFilter) -> Result<Option<User>, UserError>;

    async fn get_user_by_id(
        &self,
        id: UserId,
        filter: &UserFilter,
    ) -> Result<Option<User>, UserError>;

    async fn update_user_by_id(
        &self,
        id: UserId,
        patch: UserPatch,
        filter: &UserFilter,
    ) -> Result<User, UserError>;

    async fn update_user_profile(&self, user: &User, patch: ProfilePatch)
        -> Result<User, UserError>;

    async fn upload_profile_image(&self, url: &str, user: &User) -> Result<User, UserError>;

    async fn upload_avatar(&self, user: &User, upload: AvatarUpload) -> Result<User, UserError>;

    async fn remove_profile_image(&self, user: &User) -> Result<User, UserError>;

    async fn delete_user_by_id(&self, id: UserId, filter: &UserFilter)
        -> Result<User, UserError>;
}
