use async_trait::async_trait;

use crate::domain::{NewUser, User, UserError, UserFilter, UserPatch};

/// Record-level access to the user collection.
///
/// Lookups return `Ok(None)` rather than an error when nothing matches; it is
/// up to the caller to decide whether absence is a failure.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    async fn insert(&self, user: &NewUser) -> Result<User, UserError>;

    async fn find_many(&self, filter: &UserFilter) -> Result<Vec<User>, UserError>;

    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, UserError>;

    /// Applies `patch` to the first matching record in a single atomic step.
    /// A constraint violation leaves the record untouched.
    async fn find_one_and_update(
        &self,
        filter: &UserFilter,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserError>;

    /// Deletes the first matching record and returns it as it was.
    async fn find_one_and_remove(&self, filter: &UserFilter) -> Result<Option<User>, UserError>;
}
