use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;

use crate::{
    domain::{models::UserId, UserFilter, PLACEHOLDER_PROFILE_URL},
    routes::error::{PAGE_NOT_FOUND, UNSUPPORTED_IMAGE, USER_NOT_FOUND},
    test_utils::{TestApp, PNG_BYTES},
};

#[tokio::test]
async fn get_profile_returns_the_authenticated_user() {
    let app = TestApp::new();
    let user = app.create_user("ada@example.com").await;

    let request = app
        .authed("GET", "/api/v1/users/profile", user.id)
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["statusCode"], 200);
    assert_eq!(body["message"], "User profile fetched successfully");
    assert_eq!(body["data"]["user"]["email"], "ada@example.com");
    assert_eq!(body["data"]["user"]["profileUrl"], PLACEHOLDER_PROFILE_URL);
}

#[tokio::test]
async fn requests_without_a_token_are_unauthorized() {
    let app = TestApp::new();

    let request = Request::builder()
        .uri("/api/v1/users/profile")
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 401);
}

#[tokio::test]
async fn patch_applies_allowed_fields() {
    let app = TestApp::new();
    let user = app.create_user("ada@example.com").await;

    let request = app
        .authed("PATCH", "/api/v1/users/profile", user.id)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "fullName": "Ada King", "bio": "Analyst" }).to_string()))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User profile updated successfully");
    assert_eq!(body["data"]["user"]["fullName"], "Ada King");
    assert_eq!(body["data"]["user"]["bio"], "Analyst");
    assert_eq!(body["data"]["user"]["email"], "ada@example.com");
}

#[tokio::test]
async fn put_is_an_alias_for_patch() {
    let app = TestApp::new();
    let user = app.create_user("ada@example.com").await;

    let request = app
        .authed("PUT", "/api/v1/users/profile", user.id)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "email": "ada.king@example.com" }).to_string()))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], "ada.king@example.com");
}

#[tokio::test]
async fn patch_rejects_protected_fields_and_changes_nothing() {
    let app = TestApp::new();
    let user = app.create_user("ada@example.com").await;

    let request = app
        .authed("PATCH", "/api/v1/users/profile", user.id)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "fullName": "Root", "role": "Admin" }).to_string()))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["errors"][0]["field"], "body");

    let stored = app
        .service
        .get_user_by_id(user.id, &UserFilter::all())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, user);
}

#[tokio::test]
async fn patch_with_invalid_values_reports_fields() {
    let app = TestApp::new();
    let user = app.create_user("ada@example.com").await;

    let request = app
        .authed("PATCH", "/api/v1/users/profile", user.id)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "email": "nope" }).to_string()))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"][0]["field"], "email");
}

#[tokio::test]
async fn avatar_upload_stores_a_deterministic_file() {
    let app = TestApp::new();
    let user = app.create_user("ada@example.com").await;
    let expected = format!("avatar-{}.png", user.id);

    let (status, body) = app
        .send(app.avatar_request(user.id, "image/png", PNG_BYTES))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["statusCode"], 201);
    assert_eq!(body["message"], "Profile image uploaded successfully");
    assert_eq!(
        body["data"]["user"]["profileUrl"],
        format!("/avatar/{expected}")
    );
    assert_eq!(app.avatar_files(), vec![expected.clone()]);

    let (status, _) = app
        .send(app.avatar_request(user.id, "image/png", PNG_BYTES))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.avatar_files(), vec![expected]);
}

#[tokio::test]
async fn uploaded_avatars_are_served_back() {
    let app = TestApp::new();
    let user = app.create_user("ada@example.com").await;
    let (_, body) = app
        .send(app.avatar_request(user.id, "image/png", PNG_BYTES))
        .await;
    let url = body["data"]["user"]["profileUrl"].as_str().unwrap().to_string();

    let response = tower::ServiceExt::oneshot(
        app.router.clone(),
        Request::builder().uri(url).body(Body::empty()).unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
}

#[tokio::test]
async fn gif_avatars_are_rejected() {
    let app = TestApp::new();
    let user = app.create_user("ada@example.com").await;

    let (status, body) = app
        .send(app.avatar_request(user.id, "image/gif", b"GIF89a"))
        .await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["message"], UNSUPPORTED_IMAGE);
    assert!(app.avatar_files().is_empty());

    let stored = app
        .service
        .get_user_by_id(user.id, &UserFilter::all())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.profile_url, PLACEHOLDER_PROFILE_URL);
}

#[tokio::test]
async fn upload_without_avatar_field_is_a_bad_request() {
    let app = TestApp::new();
    let user = app.create_user("ada@example.com").await;

    let request = app
        .authed("POST", "/api/v1/users/avatar", user.id)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", crate::test_utils::BOUNDARY),
        )
        .body(Body::from(crate::test_utils::multipart_body(
            "picture",
            "image/png",
            PNG_BYTES,
        )))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "missing avatar file field");
}

#[tokio::test]
async fn removing_the_avatar_restores_the_placeholder() {
    let app = TestApp::new();
    let user = app.create_user("ada@example.com").await;
    app.send(app.avatar_request(user.id, "image/png", PNG_BYTES))
        .await;

    let request = app
        .authed("DELETE", "/api/v1/users/avatar", user.id)
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Profile image removed successfully");
    assert_eq!(body["data"]["user"]["profileUrl"], PLACEHOLDER_PROFILE_URL);
    assert!(app.avatar_files().is_empty());
}

#[tokio::test]
async fn deleted_profiles_are_gone() {
    let app = TestApp::new();
    let user = app.create_user("ada@example.com").await;

    let request = app
        .authed("DELETE", "/api/v1/users/profile", user.id)
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "statusCode": 200,
            "message": "User profile deleted successfully",
            "data": {}
        })
    );

    let request = app
        .authed("GET", "/api/v1/users/profile", user.id)
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], USER_NOT_FOUND);
}

#[tokio::test]
async fn tokens_for_unknown_users_are_not_found() {
    let app = TestApp::new();

    let request = app
        .authed("GET", "/api/v1/users/profile", UserId::new(99))
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], USER_NOT_FOUND);
}

#[tokio::test]
async fn unmatched_routes_are_404() {
    let app = TestApp::new();

    for (method, uri) in [
        ("GET", "/nonexistent"),
        ("POST", "/api/v1/anything/else"),
        ("GET", "/api/v1/users/avatar"),
        ("POST", "/api/v1/users/profile"),
        ("GET", "/avatar/missing.png"),
        ("DELETE", "/avatar/x.png"),
        ("POST", "/avatar/avatar-1.png"),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, body) = app.send(request).await;

        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(
            body,
            json!({ "success": false, "statusCode": 404, "message": PAGE_NOT_FOUND })
        );
    }
}
