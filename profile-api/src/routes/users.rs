use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use tracing::instrument;

use crate::{
    adapters::inbound::http::{ApiResponse, EmptyResponse, UserMessage, UserResponse},
    app_state::AppState,
    auth::AuthUser,
    domain::{
        models::{AvatarUpload, AVATAR_FIELD_NAME},
        ProfilePatch, UserFilter,
    },
    routes::{not_found, ApiError},
};

// Allow multipart overhead while keeping the actual avatar payload policy at 5 MiB.
const AVATAR_UPLOAD_BODY_LIMIT: usize = 6 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(get_user_profile)
                .patch(update_user_profile)
                .put(update_user_profile)
                .delete(delete_user_profile)
                .fallback(not_found),
        )
        .route(
            "/avatar",
            post(upload_user_avatar)
                .delete(remove_avatar)
                .fallback(not_found),
        )
        .route_layer(DefaultBodyLimit::max(AVATAR_UPLOAD_BODY_LIMIT))
}

#[instrument(name = "GET /users/profile", skip_all, fields(user_id = %user.id))]
async fn get_user_profile(user: AuthUser) -> Result<ApiResponse<UserResponse>, ApiError> {
    Ok(ApiResponse::ok(
        UserMessage::ProfileFetched,
        user.into_inner().into(),
    ))
}

#[instrument(name = "PATCH|PUT /users/profile", skip_all, fields(user_id = %user.id))]
async fn update_user_profile(
    user: AuthUser,
    State(app_state): State<AppState>,
    WithRejection(Json(patch), _): WithRejection<Json<ProfilePatch>, ApiError>,
) -> Result<ApiResponse<UserResponse>, ApiError> {
    let updated = app_state
        .user_service
        .update_user_profile(&user, patch)
        .await?;

    Ok(ApiResponse::ok(UserMessage::ProfileUpdated, updated.into()))
}

#[instrument(name = "POST /users/avatar", skip_all, fields(user_id = %user.id))]
async fn upload_user_avatar(
    user: AuthUser,
    State(app_state): State<AppState>,
    WithRejection(mut multipart, _): WithRejection<Multipart, ApiError>,
) -> Result<ApiResponse<UserResponse>, ApiError> {
    let upload = extract_avatar_from_multipart(&mut multipart).await?;

    let updated = app_state.user_service.upload_avatar(&user, upload).await?;

    Ok(ApiResponse::created(UserMessage::AvatarUploaded, updated.into()))
}

#[instrument(name = "DELETE /users/avatar", skip_all, fields(user_id = %user.id))]
async fn remove_avatar(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<ApiResponse<UserResponse>, ApiError> {
    let updated = app_state.user_service.remove_profile_image(&user).await?;

    Ok(ApiResponse::created(UserMessage::AvatarRemoved, updated.into()))
}

#[instrument(name = "DELETE /users/profile", skip_all, fields(user_id = %user.id))]
async fn delete_user_profile(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<ApiResponse<EmptyResponse>, ApiError> {
    app_state
        .user_service
        .delete_user_by_id(user.id, &UserFilter::all())
        .await?;

    Ok(ApiResponse::ok(
        UserMessage::ProfileDeleted,
        EmptyResponse::default(),
    ))
}

/// Reads the single `avatar` file out of the form. Other fields are skipped;
/// a second `avatar` file is refused.
async fn extract_avatar_from_multipart(
    multipart: &mut Multipart,
) -> Result<AvatarUpload, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(AVATAR_FIELD_NAME) {
            continue;
        }

        if upload.is_some() {
            return Err(ApiError::bad_request("only one avatar file is allowed"));
        }

        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        upload = Some(AvatarUpload::new(
            AVATAR_FIELD_NAME,
            content_type,
            bytes.to_vec(),
        ));
    }

    upload.ok_or_else(|| ApiError::bad_request("missing avatar file field"))
}

#[cfg(test)]
mod tests;
