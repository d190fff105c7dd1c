//! Router wired to in-memory users and a temporary avatar directory.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{
    adapters::outbound::{media::DiskAvatarStorage, memory::InMemoryUserRepository},
    app_state::AppState,
    auth::JwtKeys,
    config::StorageSettings,
    domain::{models::UserId, ports::inbound::UserService, services::UserServiceImpl, NewUser, User},
    router,
};

pub const TEST_SECRET: &str = "test-secret";
pub const BOUNDARY: &str = "profile-api-test-boundary";
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

pub struct TestApp {
    pub router: Router,
    pub service: Arc<dyn UserService>,
    pub avatar_dir: TempDir,
    jwt: JwtKeys,
}

impl TestApp {
    pub fn new() -> Self {
        let avatar_dir = tempfile::tempdir().unwrap();
        let storage = StorageSettings {
            avatar_dir: avatar_dir.path().to_path_buf(),
            public_path: "/avatar".to_string(),
        };

        let service: Arc<dyn UserService> = Arc::new(UserServiceImpl::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(DiskAvatarStorage::new(
                &storage.avatar_dir,
                &storage.public_path,
            )),
        ));
        let app_state = AppState::new(Arc::clone(&service), JwtKeys::new(TEST_SECRET));
        let router = router::create(app_state, &storage, "http://localhost:3000".to_string());

        Self {
            router,
            service,
            avatar_dir,
            jwt: JwtKeys::new(TEST_SECRET),
        }
    }

    pub async fn create_user(&self, email: &str) -> User {
        self.service
            .create_user(NewUser::new(email, "Test User"))
            .await
            .unwrap()
    }

    pub fn token(&self, user_id: UserId) -> String {
        self.jwt
            .issue(user_id, time::Duration::minutes(5))
            .unwrap()
    }

    pub fn avatar_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.avatar_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub fn authed(&self, method: &str, uri: &str, user_id: UserId) -> axum::http::request::Builder {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token(user_id)))
    }

    pub fn avatar_request(&self, user_id: UserId, content_type: &str, bytes: &[u8]) -> Request<Body> {
        self.authed("POST", "/api/v1/users/avatar", user_id)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body("avatar", content_type, bytes)))
            .unwrap()
    }
}

pub fn multipart_body(field_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field_name}\"; filename=\"upload\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}
