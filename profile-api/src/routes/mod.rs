pub(crate) mod error;
pub(crate) mod users;

use std::any::Any;

use axum::response::{IntoResponse, Response};

pub(crate) use error::ApiError;

/// Fallback for every path and method without a handler.
pub(crate) async fn not_found() -> ApiError {
    ApiError::not_found(error::PAGE_NOT_FOUND)
}

/// Turns a panic inside a handler into the regular 500 envelope.
pub(crate) fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {}", detail);

    ApiError::internal().into_response()
}
