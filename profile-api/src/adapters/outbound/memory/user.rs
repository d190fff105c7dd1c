//! In-memory user repository for testing.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::domain::{
    models::UserId, ports::outbound::UserRepository, NewUser, User, UserError, UserFilter,
    UserPatch, PLACEHOLDER_PROFILE_URL,
};

#[derive(Default)]
struct State {
    users: Vec<User>,
    next_id: i32,
}

/// Mock user repository backed by a `Vec`, kept in insertion order.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(users: &[User], email: &str, except: Option<UserId>) -> bool {
    users
        .iter()
        .any(|user| user.email == email && Some(user.id) != except)
}

fn duplicate_email() -> UserError {
    UserError::validation("email", "email is already taken")
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, new_user: &NewUser) -> Result<User, UserError> {
        let mut state = self.state.write().unwrap();
        if email_taken(&state.users, &new_user.email, None) {
            return Err(duplicate_email());
        }

        state.next_id += 1;
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: UserId::new(state.next_id),
            email: new_user.email.clone(),
            full_name: new_user.full_name.clone(),
            bio: new_user.bio.clone(),
            role: new_user.role,
            profile_url: PLACEHOLDER_PROFILE_URL.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());

        Ok(user)
    }

    async fn find_many(&self, filter: &UserFilter) -> Result<Vec<User>, UserError> {
        let state = self.state.read().unwrap();
        Ok(state
            .users
            .iter()
            .filter(|user| filter.matches(user))
            .cloned()
            .collect())
    }

    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, UserError> {
        let state = self.state.read().unwrap();
        Ok(state.users.iter().find(|user| filter.matches(user)).cloned())
    }

    async fn find_one_and_update(
        &self,
        filter: &UserFilter,
        patch: &UserPatch,
    ) -> Result<Option<User>, UserError> {
        let mut state = self.state.write().unwrap();
        let Some(index) = state.users.iter().position(|user| filter.matches(user)) else {
            return Ok(None);
        };

        let mut updated = state.users[index].clone();
        patch.apply_to(&mut updated);
        if email_taken(&state.users, &updated.email, Some(updated.id)) {
            return Err(duplicate_email());
        }
        updated.updated_at = OffsetDateTime::now_utc();
        state.users[index] = updated.clone();

        Ok(Some(updated))
    }

    async fn find_one_and_remove(&self, filter: &UserFilter) -> Result<Option<User>, UserError> {
        let mut state = self.state.write().unwrap();
        let position = state.users.iter().position(|user| filter.matches(user));
        Ok(position.map(|index| state.users.remove(index)))
    }
}
