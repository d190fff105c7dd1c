//! Response envelope shared by every endpoint.
//!
//! Successful responses serialize as
//! `{ "success": true, "statusCode": 200, "message": "...", "data": {...} }`.
//! Failures use the same shape with `success: false` and no `data`; see
//! [`crate::routes::ApiError`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::User;

use super::UserMessage;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    success: bool,
    status_code: u16,
    message: String,
    data: T,
}

/// A successful response: status, catalog message and payload.
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    message: UserMessage,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: UserMessage, data: T) -> Self {
        Self::new(StatusCode::OK, message, data)
    }

    pub fn created(message: UserMessage, data: T) -> Self {
        Self::new(StatusCode::CREATED, message, data)
    }

    fn new(status: StatusCode, message: UserMessage, data: T) -> Self {
        Self {
            status,
            message,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            success: true,
            status_code: self.status.as_u16(),
            message: self.message.to_string(),
            data: self.data,
        };
        (self.status, Json(body)).into_response()
    }
}

/// `data` payload for endpoints that return the affected user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self { user }
    }
}

/// `data` payload for endpoints that return nothing; serializes as `{}`.
#[derive(Debug, Default, Serialize)]
pub struct EmptyResponse {}
