use std::ops::Deref;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    app_state::AppState,
    domain::{models::UserId, User, UserError, UserFilter},
    routes::ApiError,
};

use super::{AuthError, Principal};

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
    AppState: axum::extract::FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AuthError::MissingToken)?;

        let app_state = <AppState as axum::extract::FromRef<S>>::from_ref(state);
        Ok(app_state.jwt.decode(bearer.token())?)
    }
}

/// The authenticated [`User`], loaded fresh for the current request.
///
/// Handlers receive it as an explicit argument instead of reading it off the
/// request. If the token is valid but the user no longer exists, extraction
/// fails with the regular "user not found" error.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    user: User,
}

impl AuthUser {
    pub fn into_inner(self) -> User {
        self.user
    }
}

impl Deref for AuthUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: axum::extract::FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let principal = Principal::from_request_parts(parts, state).await?;
        let app_state = <AppState as axum::extract::FromRef<S>>::from_ref(state);

        let user = app_state
            .user_service
            .get_user_by_id(principal.user_id, &UserFilter::all())
            .await?
            .ok_or(UserError::NotFound)?;

        Ok(AuthUser { id: user.id, user })
    }
}
