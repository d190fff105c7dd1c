use axum::{
    handler::HandlerWithoutStateExt,
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{
    app_state::AppState,
    config::StorageSettings,
    routes::{self, handle_panic},
};

pub fn create(app_state: AppState, storage: &StorageSettings, app_url: String) -> Router<()> {
    let api = Router::new().nest("/users", routes::users::router());

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            origin.to_str().unwrap_or_default() == app_url
        }));

    // Missing files and non-GET/HEAD methods fall through to the 404 envelope.
    let avatars = ServeDir::new(&storage.avatar_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(routes::not_found.into_service());

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api/v1", api)
        .nest_service(storage.public_path.trim_end_matches('/'), avatars)
        .fallback(routes::not_found)
        .with_state(app_state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
