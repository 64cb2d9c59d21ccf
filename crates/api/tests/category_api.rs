//! Integration tests for `GET /api/v1/categories`.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with, get, get_authed, get_with_cookie,
    MemoryStore, ADMIN_TOKEN, EDITOR_TOKEN,
};

#[tokio::test]
async fn lists_categories_for_any_signed_in_user() {
    let dir = tempfile::tempdir().unwrap();
    let response = get_authed(build_test_app(dir.path()), "/api/v1/categories", EDITOR_TOKEN).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Science", "Technology", "Laptops"]);
    assert_eq!(json["data"][2]["parent_id"], 7);
    assert_eq!(json["data"][2]["level"], 2);
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let response =
        get_with_cookie(build_test_app(dir.path()), "/api/v1/categories", ADMIN_TOKEN).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn listing_requires_a_session() {
    let dir = tempfile::tempdir().unwrap();
    let response = get(build_test_app(dir.path()), "/api/v1/categories").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn unknown_token_is_unauthorized() {
    let dir = tempfile::tempdir().unwrap();
    let response =
        get_authed(build_test_app(dir.path()), "/api/v1/categories", "expired-token").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn store_failure_is_a_sanitized_500() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore {
        broken: true,
        ..MemoryStore::seeded()
    };
    let response =
        get_authed(build_test_app_with(store, dir.path()), "/api/v1/categories", ADMIN_TOKEN).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "An internal error occurred");
}
